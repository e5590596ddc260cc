//! Station-mode link lifecycle.
//!
//! The radio reports [`LinkEvent`]s on a channel; [`NetworkLink`] folds them
//! into a [`LinkState`] and tells the driver when to (re)associate. The link
//! is the only writer of the state; everyone else reads it through a
//! [`LinkHandle`].

use std::fmt;
use std::net::Ipv4Addr;
use std::time::Duration;

use tokio::sync::{mpsc, watch};

/// Connectivity as seen by the rest of the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Connecting,
    Connected,
}

/// Addressing handed out when the station got its lease.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpInfo {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub gateway: Ipv4Addr,
}

impl fmt::Display for IpInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ip {} netmask {} gw {}", self.ip, self.netmask, self.gateway)
    }
}

/// Events reported by the radio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// Station interface is up and may associate
    StationStarted,
    /// Associated and got an address
    GotIp(IpInfo),
    /// Association lost or failed
    Disconnected,
}

/// What the link asks of the driver after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkAction {
    Associate,
}

impl LinkState {
    /// Transition for `event`, and the driver action it calls for.
    ///
    /// A drop always triggers a new association attempt.
    pub fn on_event(self, event: &LinkEvent) -> (LinkState, Option<LinkAction>) {
        match event {
            LinkEvent::StationStarted => (LinkState::Connecting, Some(LinkAction::Associate)),
            LinkEvent::GotIp(_) => (LinkState::Connected, None),
            LinkEvent::Disconnected => (LinkState::Connecting, Some(LinkAction::Associate)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),

    #[error("station driver failed: {0}")]
    Driver(String),

    #[error("no connection after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("link event source closed")]
    EventsClosed,
}

/// Network name and key for station mode.
#[derive(Clone)]
pub struct Credentials {
    pub ssid: String,
    pub password: String,
}

impl Credentials {
    pub fn new(ssid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("ssid", &self.ssid)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The radio side of station mode.
///
/// Both calls only issue requests; their outcome arrives later as a
/// [`LinkEvent`] on the channel the driver was built with.
pub trait StationDriver: Send {
    /// Configure station mode with `credentials` and bring the interface up.
    fn start(&mut self, credentials: &Credentials) -> Result<(), LinkError>;

    /// Ask for an association with the configured network.
    fn associate(&mut self) -> Result<(), LinkError>;
}

/// Station for hosts whose network is managed by the operating system.
///
/// It is always associated: starting reports [`LinkEvent::StationStarted`]
/// and every association request is answered with [`LinkEvent::GotIp`].
pub struct LoopbackStation {
    events: mpsc::UnboundedSender<LinkEvent>,
    ip: IpInfo,
}

impl LoopbackStation {
    pub fn new(events: mpsc::UnboundedSender<LinkEvent>, ip: IpInfo) -> Self {
        Self { events, ip }
    }

    fn emit(&self, event: LinkEvent) -> Result<(), LinkError> {
        self.events.send(event).map_err(|_| LinkError::EventsClosed)
    }
}

impl StationDriver for LoopbackStation {
    fn start(&mut self, credentials: &Credentials) -> Result<(), LinkError> {
        tracing::debug!(ssid = %credentials.ssid, "loopback station started");
        self.emit(LinkEvent::StationStarted)
    }

    fn associate(&mut self) -> Result<(), LinkError> {
        self.emit(LinkEvent::GotIp(self.ip))
    }
}

/// Retry policy for bringing the link up.
#[derive(Debug, Clone, Copy)]
pub struct LinkSettings {
    /// Failed association attempts tolerated by [`NetworkLink::connect`]
    pub max_retries: u32,
    /// Pause before each new association attempt
    pub retry_delay: Duration,
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self {
            max_retries: 5,
            retry_delay: Duration::from_secs(2),
        }
    }
}

/// Read side of the link state.
#[derive(Debug, Clone)]
pub struct LinkHandle {
    state: watch::Receiver<LinkState>,
}

impl LinkHandle {
    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    /// Waits until the link reports Connected.
    ///
    /// Returns `false` if the link went away first.
    pub async fn wait_connected(&mut self) -> bool {
        self.state
            .wait_for(|s| *s == LinkState::Connected)
            .await
            .is_ok()
    }
}

pub struct NetworkLink<D> {
    driver: D,
    events: mpsc::UnboundedReceiver<LinkEvent>,
    state: watch::Sender<LinkState>,
    settings: LinkSettings,
}

impl<D: StationDriver> NetworkLink<D> {
    pub fn new(
        driver: D,
        events: mpsc::UnboundedReceiver<LinkEvent>,
        settings: LinkSettings,
    ) -> Self {
        let (state, _) = watch::channel(LinkState::Disconnected);
        Self {
            driver,
            events,
            state,
            settings,
        }
    }

    pub fn handle(&self) -> LinkHandle {
        LinkHandle {
            state: self.state.subscribe(),
        }
    }

    pub fn state(&self) -> LinkState {
        *self.state.borrow()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == LinkState::Connected
    }

    /// Starts the station and waits for the first Connected.
    ///
    /// Gives up with [`LinkError::RetriesExhausted`] once more than
    /// `max_retries` association attempts have failed.
    pub async fn connect(&mut self, ssid: &str, password: &str) -> Result<(), LinkError> {
        if ssid.is_empty() {
            return Err(LinkError::InvalidCredentials("empty ssid"));
        }

        tracing::info!(ssid, "starting station");
        self.driver.start(&Credentials::new(ssid, password))?;

        let mut failures = 0u32;

        loop {
            let event = self.events.recv().await.ok_or(LinkError::EventsClosed)?;
            let action = self.apply(&event);

            match event {
                LinkEvent::GotIp(_) => return Ok(()),
                LinkEvent::Disconnected => {
                    failures += 1;
                    if failures > self.settings.max_retries {
                        self.publish(LinkState::Disconnected);
                        return Err(LinkError::RetriesExhausted { attempts: failures });
                    }
                    tracing::warn!(
                        attempt = failures,
                        max_retries = self.settings.max_retries,
                        "association failed, retrying"
                    );
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
                LinkEvent::StationStarted => {}
            }

            if let Some(LinkAction::Associate) = action {
                self.driver.associate()?;
            }
        }
    }

    /// Keeps the link up until the event source goes away.
    ///
    /// Reconnects after every drop, without limit.
    pub async fn run(&mut self) {
        while let Some(event) = self.events.recv().await {
            let action = self.apply(&event);

            if event == LinkEvent::Disconnected {
                tokio::time::sleep(self.settings.retry_delay).await;
            }

            if let Some(LinkAction::Associate) = action {
                if let Err(e) = self.driver.associate() {
                    tracing::warn!(error = %e, "reconnect request failed");
                }
            }
        }

        self.publish(LinkState::Disconnected);
        tracing::info!("link event source closed");
    }

    /// Task body: connect, retrying setup forever, then hold the link.
    pub async fn maintain(mut self, ssid: String, password: String) {
        loop {
            match self.connect(&ssid, &password).await {
                Ok(()) => break,
                Err(LinkError::EventsClosed) => {
                    tracing::info!("link event source closed before connecting");
                    return;
                }
                Err(e) => {
                    tracing::error!(error = %e, "link setup failed, starting over");
                    tokio::time::sleep(self.settings.retry_delay).await;
                }
            }
        }

        self.run().await;
    }

    fn apply(&mut self, event: &LinkEvent) -> Option<LinkAction> {
        let (next, action) = self.state().on_event(event);

        if let LinkEvent::GotIp(info) = event {
            tracing::info!(%info, "got ip");
        } else if *event == LinkEvent::Disconnected && self.is_connected() {
            tracing::warn!("link lost");
        }

        self.publish(next);
        action
    }

    fn publish(&self, next: LinkState) {
        self.state.send_if_modified(|state| {
            let changed = *state != next;
            *state = next;
            changed
        });
    }
}
