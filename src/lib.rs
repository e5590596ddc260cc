//! ledswitch - Wi-Fi output switch
//!
//! Joins a network in station mode and serves a one-page HTTP interface
//! that turns a single digital output on and off.

pub mod config;
pub mod device;
pub mod http;
pub mod net;
pub mod server;
