//! OctoPrint REST endpoints on top of the [`http`](super::http) client.
//!
//! [`OctoPrint`] knows the printer server's paths, builds the JSON command
//! bodies and decodes the JSON replies into fixed-capacity records. Every
//! call is one fresh exchange; nothing is cached between calls.
//!
//! ```rust,no_run
//! use liboctoprint::network::application::http::Config;
//! use liboctoprint::network::application::octoprint::OctoPrint;
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
//! let config = Config::with_ip([192, 168, 1, 20], 80, "API_KEY").unwrap();
//! let mut printer = OctoPrint::new(Net, Millis, config);
//!
//! let stats = printer.printer_statistics().unwrap();
//! if stats.operational && !stats.printing {
//!     printer.set_bed_temperature(60).unwrap();
//! }
//! ```

mod client;
mod types;

pub use client::{Axis, JobCommand, OctoPrint, SystemAction};
pub use types::*;

use super::http::{self, Outcome};

/// Capacity of rendered request paths.
pub const MAX_PATH_LEN: usize = 128;
/// Capacity of serialized JSON command bodies.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Errors returned by the endpoint calls.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// The request was rejected before any I/O.
    Http(http::Error),
    /// No status line was received; the outcome says why.
    NoResponse(Outcome),
    /// The server answered with a status this call does not accept.
    UnexpectedStatus(i16),
    /// The reply body was not the expected JSON.
    Parse,
    /// A path or command body does not fit its buffer.
    PayloadTooLarge,
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Http(e) => write!(f, "request rejected: {e}"),
            Error::NoResponse(outcome) => write!(f, "no response ({})", outcome.as_str()),
            Error::UnexpectedStatus(code) => write!(f, "unexpected status {code}"),
            Error::Parse => write!(f, "malformed response body"),
            Error::PayloadTooLarge => write!(f, "payload too large"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::Http(e) => defmt::write!(f, "Http({})", e),
            Error::NoResponse(outcome) => defmt::write!(f, "NoResponse({})", outcome),
            Error::UnexpectedStatus(code) => defmt::write!(f, "UnexpectedStatus({=i16})", code),
            Error::Parse => defmt::write!(f, "Parse"),
            Error::PayloadTooLarge => defmt::write!(f, "PayloadTooLarge"),
        }
    }
}
