//! HTTP protocol implementation.
//!
//! Just enough HTTP/1.1 for a one-page switch: the request line is parsed,
//! headers are ignored, and every connection gets at most one response
//! before the server closes it.
//!
//! # Architecture
//!
//! - **`connection`**: Serves one client through the request-response state machine
//! - **`parser`**: Parses the request line out of the first received segment
//! - **`request`**: The parsed request and its method
//! - **`responder`**: Maps a request to the page and the output change it asks for
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes responses to the client
//! - **`page`**: The HTML page itself
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← One read of the request
//!        └──────┬──────┘
//!               │ GET parsed          (anything else → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Page + requested output level
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send page to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Stream shut down, level handed back
//!        └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use ledswitch::http::connection::Connection;
//! use ledswitch::http::responder::Responder;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let responder = Responder::new();
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let served = Connection::new(socket).serve(&responder).await;
//!         if let Some(on) = served.side_effect {
//!             println!("output -> {on}");
//!         }
//!     }
//! }
//! ```

pub mod connection;
pub mod page;
pub mod parser;
pub mod request;
pub mod responder;
pub mod response;
pub mod writer;
