//! Connection loop
//!
//! Accepts clients one at a time and applies the output level each request
//! asks for.

pub mod listener;

pub use listener::Server;
