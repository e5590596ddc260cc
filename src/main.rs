use std::net::Ipv4Addr;

use ledswitch::config::Config;
use ledswitch::device::{DeviceController, LogPin};
use ledswitch::net::{IpInfo, LoopbackStation, NetworkLink};
use ledswitch::server::Server;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load()?;
    tracing::info!(config = ?cfg, "configuration loaded");

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let station = LoopbackStation::new(
        events_tx,
        IpInfo {
            ip: Ipv4Addr::LOCALHOST,
            netmask: Ipv4Addr::new(255, 0, 0, 0),
            gateway: Ipv4Addr::UNSPECIFIED,
        },
    );
    let link = NetworkLink::new(station, events_rx, cfg.link_settings());
    let link_handle = link.handle();

    tokio::spawn(link.maintain(cfg.wifi.ssid.clone(), cfg.wifi.password.clone()));

    // The server does not wait for the link; clients simply cannot reach it yet
    let controller = DeviceController::new(LogPin::new(cfg.device.output_pin));
    let server = Server::bind(&cfg.server.listen_addr, controller)
        .await?
        .with_link(link_handle);

    tokio::select! {
        res = server.run() => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
