//! # Application Layer Network Protocols
//!
//! Application layer (OSI Layer 7) protocols built on the transport traits in
//! [`crate::network`].
//!
//! - **[`http`]**: a minimal HTTP/1.1 request/response engine with explicit
//!   framing and a wall-clock budget per request
//! - **[`octoprint`]**: the OctoPrint REST API on top of [`http`]
//!
//! ## Usage Pattern
//!
//! 1. Implement [`Connect`](crate::network::Connect) for your network stack
//! 2. Implement [`Clock`](crate::system::clock::Clock) for your timer
//! 3. Build a client with a [`Config`](http::Config) and issue requests
//!
//! ```rust,no_run
//! use liboctoprint::network::application::octoprint::OctoPrint;
//! use liboctoprint::network::application::http::Config;
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
//! let config = Config::with_hostname("octopi.local", 80, "0123456789ABCDEF").unwrap();
//! let mut printer = OctoPrint::new(Net, Millis, config);
//!
//! // let stats = printer.printer_statistics()?;
//! // printer.set_bed_temperature(60)?;
//! ```

/// HTTP/1.1 client engine.
///
/// Encodes requests, frames responses byte by byte under a timeout and
/// extracts the status code.
pub mod http;

/// OctoPrint REST API endpoints and records.
pub mod octoprint;
