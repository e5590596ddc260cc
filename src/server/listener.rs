use std::net::SocketAddr;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::device::{DeviceController, OutputPin};
use crate::http::connection::Connection;
use crate::http::responder::Responder;
use crate::net::LinkHandle;

/// The accept loop: one client at a time, in arrival order.
pub struct Server<P> {
    listener: TcpListener,
    controller: DeviceController<P>,
    responder: Responder,
    link: Option<LinkHandle>,
}

impl<P: OutputPin> Server<P> {
    pub async fn bind(addr: &str, controller: DeviceController<P>) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        Ok(Self::new(listener, controller))
    }

    pub fn new(listener: TcpListener, controller: DeviceController<P>) -> Self {
        Self {
            listener,
            controller,
            responder: Responder::new(),
            link: None,
        }
    }

    /// Reports the link state alongside every accepted connection.
    pub fn with_link(mut self, link: LinkHandle) -> Self {
        self.link = Some(link);
        self
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves clients until accepting fails.
    ///
    /// An accept error ends the loop and is returned; errors on a single
    /// connection are logged and the next client is accepted. A requested
    /// level is applied even when the page could not be delivered.
    pub async fn run(mut self) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        loop {
            let (socket, peer) = self.listener.accept().await.context("accept failed")?;

            match &self.link {
                Some(link) => info!(peer = %peer, link = ?link.state(), "accepted connection"),
                None => info!(peer = %peer, "accepted connection"),
            }

            let served = Connection::new(socket).serve(&self.responder).await;

            if let Err(e) = served.result {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
            if let Some(on) = served.side_effect {
                self.controller.set_output(on);
            }
        }
    }
}
