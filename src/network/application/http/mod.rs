//! HTTP/1.1 request/response engine for embedded systems.
//!
//! This module issues one request per connection and reads the answer back
//! under a wall-clock budget. It is written for `no_std` targets: every
//! buffer is a fixed-capacity `heapless` container and nothing is allocated.
//!
//! # Pipeline
//!
//! ```text
//! Request ──▶ request::encode ──▶ Connection ──▶ Framer ──▶ status::extract_status_code
//!                                  (one per call)  (state machine)
//! ```
//!
//! - [`request`] builds the request line and fixed header block.
//! - [`framer`] consumes response bytes and recognizes the status line, the
//!   header block (watching for `Content-Length`) and the body.
//! - [`status`] turns the status line into a number, or `-1`.
//! - [`client`] owns the configuration and drives one exchange per call,
//!   always closing the connection before returning.
//!
//! # Failure model
//!
//! Only problems detectable before any I/O are returned as [`Error`]. Once a
//! connection is attempted, every failure (refused connection, failed write,
//! disconnect, timeout) comes back as a [`Response`] whose
//! [`outcome`](Response::outcome) says what happened, with status `-1` and an
//! empty body when no complete header block was received.
//!
//! # Responses without `Content-Length`
//!
//! HTTP/1.1 gives no end-of-body marker for such responses other than the
//! peer closing. The framer keeps reading until the transport reports an
//! error or the timeout elapses, so a slow sender can still be cut short.
//!
//! ```rust,no_run
//! use liboctoprint::network::application::http::{Client, Config, Request};
//! # use liboctoprint::network::{Close, Connect, Connection, Read, Write};
//! # use liboctoprint::system::clock::Clock;
//! # struct Net;
//! # struct Conn;
//! # impl Connection for Conn {}
//! # impl Read for Conn {
//! #     type Error = ();
//! #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
//! # }
//! # impl Write for Conn {
//! #     type Error = ();
//! #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
//! #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Close for Conn {
//! #     type Error = ();
//! #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # impl Connect for Net {
//! #     type Connection = Conn;
//! #     type Error = ();
//! #     fn connect(&mut self, _remote: &str) -> Result<Conn, ()> { Ok(Conn) }
//! # }
//! # struct Millis;
//! # impl Clock for Millis { fn now_ms(&self) -> u64 { 0 } }
//!
//! let config = Config::with_ip([192, 168, 1, 20], 80, "0123456789ABCDEF").unwrap();
//! let mut client = Client::new(Net, Millis, config);
//!
//! let response = client.request(&Request::get("/api/version")).unwrap();
//! if response.is_success() {
//!     let _json = response.body_str();
//! }
//! ```

/// Client driving one request/response exchange per call.
pub mod client;

/// Connection target and session settings.
pub mod config;

/// Request-level errors.
pub mod error;

/// Incremental response framing.
pub mod framer;

/// Request types and encoder.
pub mod request;

/// Decoded responses and exchange outcomes.
pub mod response;

/// Status line parsing.
pub mod status;

#[cfg(feature = "async")]
pub use client::AsyncClient;
pub use client::Client;
pub use config::{Config, Target};
pub use error::Error;
pub use framer::{Framer, State};
pub use request::{Method, Request};
pub use response::{Outcome, Response};
pub use status::{SENTINEL_STATUS, extract_status_code};

/// Value of the `User-Agent` header sent with every request.
pub const USER_AGENT: &str = concat!("liboctoprint/", env!("CARGO_PKG_VERSION"), " (embedded)");

/// Overall budget for reading a response, measured once the request is sent.
pub const DEFAULT_TIMEOUT_MS: u32 = 3000;

/// Capacity of the encoded request (request line, headers and body).
pub const MAX_REQUEST_LEN: usize = 1024;

/// Longest status or header line kept; longer lines are truncated.
pub const MAX_LINE_LEN: usize = 128;

/// Number of response header lines kept; later lines are inspected then dropped.
pub const MAX_HEADERS: usize = 16;

/// Largest response body kept; further body bytes are counted but discarded.
pub const MAX_BODY_LEN: usize = 2048;
