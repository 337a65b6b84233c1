//! Transport over `std::net::TcpStream` for hosted targets (Linux gateways,
//! Raspberry Pi class devices, tests).

use super::error::Error;
use super::{Close, Connect, Connection, Read, Write};
use std::io::{ErrorKind, Read as StdRead, Write as StdWrite};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

/// Opens [`TcpConnection`]s.
#[derive(Debug, Clone, Copy)]
pub struct TcpConnector {
    /// Upper bound for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// How long a single `read` may block before reporting "nothing yet".
    ///
    /// Keep this well below the HTTP client's timeout so its deadline is
    /// checked often.
    pub poll_interval: Duration,
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(3),
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl Connect for TcpConnector {
    type Connection = TcpConnection;
    type Error = Error;

    fn connect(&mut self, remote: &str) -> Result<Self::Connection, Self::Error> {
        let addrs = remote.to_socket_addrs().map_err(|_| Error::InvalidAddress)?;
        // Reported when every address fails; the last failure wins.
        let mut failure = Error::InvalidAddress;
        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.connect_timeout) {
                Ok(stream) => {
                    stream
                        .set_read_timeout(Some(self.poll_interval))
                        .map_err(|_| Error::ConnectionRefused)?;
                    let _ = stream.set_nodelay(true);
                    return Ok(TcpConnection { stream });
                }
                Err(e) => failure = connect_error(e.kind()),
            }
        }
        Err(failure)
    }
}

fn connect_error(kind: ErrorKind) -> Error {
    match kind {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => Error::Timeout,
        _ => Error::ConnectionRefused,
    }
}

/// A connected TCP stream with polling reads.
#[derive(Debug)]
pub struct TcpConnection {
    stream: TcpStream,
}

impl Read for TcpConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.stream.read(buf) {
            Ok(0) if !buf.is_empty() => Err(Error::ConnectionClosed),
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => Ok(0),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(0),
            Err(_) => Err(Error::ReadError),
        }
    }
}

impl Write for TcpConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.stream.write(buf).map_err(|_| Error::WriteError)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.stream.flush().map_err(|_| Error::WriteError)
    }
}

impl Close for TcpConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        match self.stream.shutdown(Shutdown::Both) {
            Ok(()) => Ok(()),
            // Peer already went away; the socket is released on drop either way.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(_) => Err(Error::NotOpen),
        }
    }
}

impl Connection for TcpConnection {}
