//! # liboctoprint - OctoPrint client for embedded devices
//!
//! A small HTTP/1.1 client and the OctoPrint REST endpoints built on it,
//! written for microcontrollers that talk to a printer server over whatever
//! TCP stack they have. The crate is `no_std`, never allocates and uses
//! fixed-capacity `heapless` buffers throughout.
//!
//! ## Layers
//!
//! - **Transport** ([`network`]): `Connect`/`Read`/`Write`/`Close` traits you
//!   implement for your network stack (a `std::net` implementation ships
//!   behind the `std` feature)
//! - **HTTP** ([`network::application::http`]): request encoding, response
//!   framing, status extraction and a per-request read deadline
//! - **OctoPrint** ([`network::application::octoprint`]): printer paths, JSON
//!   command bodies and typed records decoded from the replies
//!
//! Every request opens a fresh connection and closes it before returning.
//! A response whose status line never arrived carries the status `-1`.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! liboctoprint = "0.1.0"
//! ```
//!
//! ```rust,no_run
//! # #[cfg(feature = "std")]
//! # fn main() {
//! use liboctoprint::network::application::http::Config;
//! use liboctoprint::network::application::octoprint::OctoPrint;
//! use liboctoprint::network::tcp::TcpConnector;
//! use liboctoprint::system::clock::StdClock;
//!
//! let config = Config::with_hostname("octopi.local", 80, "API_KEY")
//!     .unwrap()
//!     .timeout_ms(5000);
//! let mut printer = OctoPrint::new(TcpConnector::default(), StdClock::new(), config);
//!
//! let job = printer.print_job().unwrap();
//! # let _ = job;
//! # }
//! # #[cfg(not(feature = "std"))]
//! # fn main() {}
//! ```
//!
//! ## Optional Features
//!
//! - `std`: `std::net` transport and a `std::time` clock
//! - `async`: async transport traits and `AsyncClient`
//! - `defmt`: `defmt::Format` for public enums, diagnostics through `defmt`
//! - `log`: diagnostics through the `log` facade

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

mod log;

/// Transport traits and the application protocols built on them.
pub mod network;

/// Time sources for embedded firmware.
pub mod system;
