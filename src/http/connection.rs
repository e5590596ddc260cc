use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::parse;
use crate::http::request::ParsedRequest;
use crate::http::responder::Responder;
use crate::http::writer::ResponseWriter;

/// Bytes read from a client. The request line is expected within the first segment.
pub const REQUEST_BUFFER_SIZE: usize = 1024;

/// One client, one request, one response.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    side_effect: Option<bool>,
}

pub enum ConnectionState {
    Reading,
    Processing(ParsedRequest),
    Writing(ResponseWriter),
    Closed,
}

/// How a connection ended.
#[derive(Debug)]
pub struct Served {
    /// Output level the client asked for, whether or not the page got out
    pub side_effect: Option<bool>,
    /// First I/O error hit while reading the request or writing the page
    pub result: anyhow::Result<()>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(REQUEST_BUFFER_SIZE),
            state: ConnectionState::Reading,
            side_effect: None,
        }
    }

    /// Serves the connection to completion and closes it.
    ///
    /// The requested level is taken from the request before the page is
    /// written, so a client that hangs up early still switches the output.
    pub async fn serve(mut self, responder: &Responder) -> Served {
        let result = self.drive(responder).await;

        // Server closes in HTTP; a client that already hung up is not an error
        if let Err(e) = self.stream.shutdown().await {
            tracing::debug!(error = %e, "shutdown after response failed");
        }

        Served {
            side_effect: self.side_effect,
            result,
        }
    }

    async fn drive(&mut self, responder: &Responder) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => match self.read_request().await? {
                    Some(req) => self.state = ConnectionState::Processing(req),
                    None => self.state = ConnectionState::Closed,
                },

                ConnectionState::Processing(req) => {
                    let reply = responder.respond(req);
                    self.side_effect = reply.side_effect;
                    self.state = ConnectionState::Writing(ResponseWriter::new(&reply.response));
                }

                ConnectionState::Writing(writer) => {
                    let written = writer.write_to_stream(&mut self.stream).await;
                    self.state = ConnectionState::Closed;
                    written?;
                }

                ConnectionState::Closed => return Ok(()),
            }
        }
    }

    /// Reads a single segment and parses its request line.
    ///
    /// `None` means there is nothing to answer: the client closed without
    /// sending anything, or sent something that is not a GET.
    async fn read_request(&mut self) -> anyhow::Result<Option<ParsedRequest>> {
        let n = self.stream.read_buf(&mut self.buffer).await?;

        if n == 0 {
            tracing::debug!("client closed before sending a request");
            return Ok(None);
        }

        match parse(&self.buffer) {
            Ok(req) => {
                tracing::debug!(
                    method = req.method.as_str(),
                    path = %req.path,
                    flag = ?req.query_flag,
                    "request parsed"
                );
                Ok(Some(req))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    request = %String::from_utf8_lossy(&self.buffer[..n.min(32)]),
                    "ignoring request"
                );
                Ok(None)
            }
        }
    }
}
