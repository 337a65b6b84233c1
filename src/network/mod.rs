//! A network abstraction layer for embedded systems
//!
//! This module provides the transport traits the HTTP engine is written
//! against. A host environment supplies the concrete connection type (a
//! smoltcp socket, a modem AT-command driver, `std::net::TcpStream`, ...)
//! by implementing [`Connect`] and [`Connection`].
//!
//! # Read semantics
//!
//! The HTTP engine polls: [`Read::read`] returning `Ok(0)` means "no bytes are
//! available right now" and the caller will ask again until its own deadline
//! expires. Returning `Err(_)` means the link is gone (peer closed, reset,
//! driver failure) and ends the exchange.

#![allow(async_fn_in_trait)]
#![deny(unsafe_code)]

/// Common error types for network operations
pub mod error;

/// Application layer protocols built on the transport traits
pub mod application;

/// `std::net` backed transport
#[cfg(feature = "std")]
pub mod tcp;

/// Re-exports of common traits
pub mod prelude {
    #[cfg(feature = "async")]
    pub use super::{AsyncClose, AsyncConnect, AsyncConnection, AsyncRead, AsyncWrite};
    pub use super::{Close, Connect, Connection, Read, Write};
}

/// Non-blocking byte source.
pub trait Read {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read whatever is available into `buf`; `Ok(0)` when nothing is pending
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Byte sink.
pub trait Write {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Teardown of a connection.
pub trait Close {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection
    fn close(self) -> Result<(), Self::Error>;
}

/// A synchronous connection
pub trait Connection: Read + Write + Close {}

/// A synchronous connector (client)
pub trait Connect {
    /// Associated connection type
    type Connection: Connection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection to `remote`, formatted as `host:port`
    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}

/// Asynchronous byte source, see [`Read`] for the `Ok(0)` convention.
#[cfg(feature = "async")]
pub trait AsyncRead {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Read data from the connection asynchronously
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// Asynchronous byte sink.
#[cfg(feature = "async")]
pub trait AsyncWrite {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Write data to the connection asynchronously
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
    /// Flush the write buffer asynchronously
    async fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Asynchronous teardown of a connection.
#[cfg(feature = "async")]
pub trait AsyncClose {
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Close the connection asynchronously
    async fn close(self) -> Result<(), Self::Error>;
}

/// An asynchronous connection
#[cfg(feature = "async")]
pub trait AsyncConnection: AsyncRead + AsyncWrite + AsyncClose {}

/// An asynchronous connector (client)
#[cfg(feature = "async")]
pub trait AsyncConnect {
    /// Associated connection type
    type Connection: AsyncConnection;
    /// Associated error type
    type Error: core::fmt::Debug;
    /// Open a connection asynchronously
    async fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error>;
}
