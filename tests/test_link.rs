//! Link lifecycle against a scripted radio

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::time::Duration;

use ledswitch::net::{
    Credentials, IpInfo, LinkAction, LinkError, LinkEvent, LinkSettings, LinkState,
    LoopbackStation, NetworkLink, StationDriver,
};
use tokio::sync::mpsc;

fn ip() -> IpInfo {
    IpInfo {
        ip: Ipv4Addr::new(192, 168, 1, 50),
        netmask: Ipv4Addr::new(255, 255, 255, 0),
        gateway: Ipv4Addr::new(192, 168, 1, 1),
    }
}

fn settings(max_retries: u32) -> LinkSettings {
    LinkSettings {
        max_retries,
        retry_delay: Duration::from_millis(1),
    }
}

/// Answers each association request with the next scripted outcome:
/// `false` reports a disconnect, `true` an address. Runs out as failures.
struct ScriptedStation {
    events: mpsc::UnboundedSender<LinkEvent>,
    outcomes: VecDeque<bool>,
    associations: mpsc::UnboundedSender<()>,
}

impl StationDriver for ScriptedStation {
    fn start(&mut self, _credentials: &Credentials) -> Result<(), LinkError> {
        self.events
            .send(LinkEvent::StationStarted)
            .map_err(|_| LinkError::EventsClosed)
    }

    fn associate(&mut self) -> Result<(), LinkError> {
        let _ = self.associations.send(());
        let event = match self.outcomes.pop_front() {
            Some(true) => LinkEvent::GotIp(ip()),
            _ => LinkEvent::Disconnected,
        };
        self.events.send(event).map_err(|_| LinkError::EventsClosed)
    }
}

fn scripted(
    outcomes: &[bool],
    max_retries: u32,
) -> (
    NetworkLink<ScriptedStation>,
    mpsc::UnboundedSender<LinkEvent>,
    mpsc::UnboundedReceiver<()>,
) {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (assoc_tx, assoc_rx) = mpsc::unbounded_channel();
    let station = ScriptedStation {
        events: events_tx.clone(),
        outcomes: outcomes.iter().copied().collect(),
        associations: assoc_tx,
    };
    (
        NetworkLink::new(station, events_rx, settings(max_retries)),
        events_tx,
        assoc_rx,
    )
}

#[test]
fn test_transitions() {
    let started = LinkState::Disconnected.on_event(&LinkEvent::StationStarted);
    assert_eq!(started, (LinkState::Connecting, Some(LinkAction::Associate)));

    let up = LinkState::Connecting.on_event(&LinkEvent::GotIp(ip()));
    assert_eq!(up, (LinkState::Connected, None));

    let lost = LinkState::Connected.on_event(&LinkEvent::Disconnected);
    assert_eq!(lost, (LinkState::Connecting, Some(LinkAction::Associate)));

    let failed = LinkState::Connecting.on_event(&LinkEvent::Disconnected);
    assert_eq!(failed, (LinkState::Connecting, Some(LinkAction::Associate)));
}

#[tokio::test]
async fn test_connect_first_try() {
    let (mut link, _events, _assoc) = scripted(&[true], 3);
    let handle = link.handle();

    assert_eq!(handle.state(), LinkState::Disconnected);
    link.connect("home", "pw").await.unwrap();

    assert!(link.is_connected());
    assert!(handle.is_connected());
}

#[tokio::test]
async fn test_connect_after_failures() {
    let (mut link, _events, mut assoc) = scripted(&[false, false, true], 3);

    link.connect("home", "pw").await.unwrap();

    assert!(link.is_connected());
    let mut attempts = 0;
    while assoc.try_recv().is_ok() {
        attempts += 1;
    }
    assert_eq!(attempts, 3);
}

#[tokio::test]
async fn test_connect_gives_up_after_max_retries() {
    let (mut link, _events, _assoc) = scripted(&[false, false, false, true], 2);

    let err = link.connect("home", "pw").await.unwrap_err();

    assert!(matches!(err, LinkError::RetriesExhausted { attempts: 3 }));
    assert_eq!(link.state(), LinkState::Disconnected);
}

#[tokio::test]
async fn test_connect_rejects_empty_ssid() {
    let (mut link, _events, _assoc) = scripted(&[true], 3);

    let err = link.connect("", "pw").await.unwrap_err();
    assert!(matches!(err, LinkError::InvalidCredentials(_)));
}

#[tokio::test]
async fn test_connect_fails_when_events_close() {
    // The station reports into a channel nobody reads any more
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    drop(events_rx);
    let station = LoopbackStation::new(events_tx, ip());
    let (_idle_tx, idle_rx) = mpsc::unbounded_channel();
    let mut link = NetworkLink::new(station, idle_rx, settings(3));

    let err = link.connect("home", "pw").await.unwrap_err();
    assert!(matches!(err, LinkError::EventsClosed));
}

#[tokio::test]
async fn test_loopback_station_connects() {
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let station = LoopbackStation::new(events_tx, ip());
    let mut link = NetworkLink::new(station, events_rx, settings(3));

    link.connect("anything", "").await.unwrap();
    assert!(link.is_connected());
}

#[tokio::test]
async fn test_reconnects_after_link_loss() {
    // First association succeeds, the one after the drop succeeds too
    let (mut link, events, mut assoc) = scripted(&[true, true], 3);
    let mut handle = link.handle();

    link.connect("home", "pw").await.unwrap();
    while assoc.try_recv().is_ok() {}

    let task = tokio::spawn(async move {
        link.run().await;
    });

    events.send(LinkEvent::Disconnected).unwrap();

    // The reconnect request is issued by the link itself
    tokio::time::timeout(Duration::from_secs(2), assoc.recv())
        .await
        .expect("no reconnect attempt")
        .unwrap();
    assert!(
        tokio::time::timeout(Duration::from_secs(2), handle.wait_connected())
            .await
            .unwrap()
    );
    assert!(handle.is_connected());

    task.abort();
}

#[tokio::test]
async fn test_reconnect_retries_without_limit() {
    // Far more failures than max_retries, then success
    let mut outcomes = vec![true];
    outcomes.extend(std::iter::repeat(false).take(10));
    outcomes.push(true);
    let (mut link, events, _assoc) = scripted(&outcomes, 1);
    let mut handle = link.handle();

    link.connect("home", "pw").await.unwrap();
    let task = tokio::spawn(async move {
        link.run().await;
    });

    events.send(LinkEvent::Disconnected).unwrap();
    // wait_for sees the current value first, so wait for the drop before the recovery
    tokio::time::timeout(Duration::from_secs(2), async {
        while handle.is_connected() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    assert!(
        tokio::time::timeout(Duration::from_secs(5), handle.wait_connected())
            .await
            .unwrap()
    );

    task.abort();
}

#[tokio::test]
async fn test_maintain_starts_over_after_setup_failure() {
    // Setup fails once (two disconnects with max_retries = 1), then connects
    let (link, _events, _assoc) = scripted(&[false, false, true], 1);
    let mut handle = link.handle();

    let task = tokio::spawn(link.maintain("home".to_string(), "pw".to_string()));

    assert!(
        tokio::time::timeout(Duration::from_secs(5), handle.wait_connected())
            .await
            .unwrap()
    );

    task.abort();
}

#[test]
fn test_credentials_debug_redacts_password() {
    let creds = Credentials::new("home", "hunter22");
    let debug = format!("{:?}", creds);

    assert!(debug.contains("home"));
    assert!(!debug.contains("hunter22"));
}

#[test]
fn test_ip_info_display() {
    assert_eq!(
        ip().to_string(),
        "ip 192.168.1.50 netmask 255.255.255.0 gw 192.168.1.1"
    );
}
