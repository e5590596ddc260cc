//! Network connectivity
//!
//! Station-mode link management. The HTTP side never touches the radio; it
//! only reads the link state through a [`LinkHandle`].

pub mod link;

pub use link::{
    Credentials, IpInfo, LinkAction, LinkError, LinkEvent, LinkHandle, LinkSettings, LinkState,
    LoopbackStation, NetworkLink, StationDriver,
};
