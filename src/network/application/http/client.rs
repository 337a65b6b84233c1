//! Request/response driver.
//!
//! A [`Client`] owns its configuration, a connector and a clock. Every call
//! opens a fresh connection, writes the encoded request, feeds the
//! [`Framer`] until the body is complete, the peer goes away or the timeout
//! elapses, and closes the connection before returning.

use super::config::{Config, MAX_REMOTE_LEN};
use super::framer::{Framer, State};
use super::request::{self, Request, RequestBuffer};
use super::response::{Outcome, Response};
use super::status::{SENTINEL_STATUS, is_quiet};
use super::Error;
use crate::log::{debug, warning};
use crate::network::{Close, Connect, Read, Write};
use crate::system::clock::Clock;
use heapless::String;

/// Size of the stack buffer reads are issued with.
const READ_CHUNK: usize = 64;

/// Blocking HTTP/1.1 client, one connection per request.
///
/// # Examples
///
/// ```rust,no_run
/// use liboctoprint::network::application::http::{Client, Config, Method, Request};
/// # use liboctoprint::network::{Close, Connect, Connection, Read, Write};
/// # use liboctoprint::system::clock::Clock;
/// # struct Net;
/// # struct Conn;
/// # impl Connection for Conn {}
/// # impl Read for Conn {
/// #     type Error = ();
/// #     fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> { Ok(0) }
/// # }
/// # impl Write for Conn {
/// #     type Error = ();
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { Ok(buf.len()) }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl Close for Conn {
/// #     type Error = ();
/// #     fn close(self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # impl Connect for Net {
/// #     type Connection = Conn;
/// #     type Error = ();
/// #     fn connect(&mut self, _remote: &str) -> Result<Conn, ()> { Ok(Conn) }
/// # }
/// # struct Millis;
/// # impl Clock for Millis { fn now_ms(&self) -> u64 { 0 } }
///
/// let config = Config::with_hostname("octopi.local", 80, "API_KEY").unwrap();
/// let mut client = Client::new(Net, Millis, config);
///
/// let response = client
///     .request(&Request::post("/api/job", br#"{"command": "start"}"#))
///     .unwrap();
/// if response.status_code == 204 {
///     // started
/// }
/// ```
#[derive(Debug)]
pub struct Client<N: Connect, K: Clock> {
    network: N,
    clock: K,
    config: Config,
}

impl<N: Connect, K: Clock> Client<N, K> {
    /// Creates a client; nothing is connected until the first request.
    pub fn new(network: N, clock: K, config: Config) -> Self {
        Self {
            network,
            clock,
            config,
        }
    }

    /// The session configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The connector.
    pub fn network(&self) -> &N {
        &self.network
    }

    /// The connector, mutably (e.g. to reconfigure a modem between calls).
    pub fn network_mut(&mut self) -> &mut N {
        &mut self.network
    }

    /// Sends a `GET` for `path`.
    pub fn get(&mut self, path: &str) -> Result<Response, Error> {
        self.request(&Request::get(path))
    }

    /// Sends a `POST` of `body` to `path`.
    pub fn post(&mut self, path: &str, body: &[u8]) -> Result<Response, Error> {
        self.request(&Request::post(path, body))
    }

    /// Performs one exchange.
    ///
    /// Returns `Err` only for problems found before any I/O (unsupported
    /// method, invalid path, request too large). Everything after that is
    /// reported through the returned [`Response`].
    pub fn request(&mut self, request: &Request<'_>) -> Result<Response, Error> {
        let (request_buf, remote) = prepare(&self.config, request)?;
        let debug = self.config.debug;

        // --- Connect ---
        let mut connection = match self.network.connect(&remote) {
            Ok(connection) => connection,
            Err(_) => {
                if debug {
                    warning!("connection to {} failed", remote.as_str());
                }
                return Ok(self.report(Response::failed(Outcome::ConnectionFailed)));
            }
        };

        // --- Send Request ---
        if !send(&mut connection, &request_buf) {
            close(connection, debug);
            if debug {
                warning!("writing request to {} failed", remote.as_str());
            }
            return Ok(self.report(Response::failed(Outcome::WriteFailed)));
        }

        // --- Receive Response ---
        let mut framer = Framer::new();
        let outcome = receive(
            &mut connection,
            &mut framer,
            &self.clock,
            self.config.timeout_ms,
        );
        close(connection, debug);

        Ok(self.report(framer.finish(outcome)))
    }

    fn report(&self, response: Response) -> Response {
        if self.config.debug {
            log_response(&response);
        }
        response
    }
}

/// Validates and encodes `request`, and renders the connect address.
fn prepare(
    config: &Config,
    request: &Request<'_>,
) -> Result<(RequestBuffer, String<MAX_REMOTE_LEN>), Error> {
    let mut request_buf = RequestBuffer::new();
    request::encode(request, &config.host(), &config.api_key, &mut request_buf)?;
    if config.debug {
        debug!("{} {}", request.method.as_str(), request.path);
    }
    Ok((request_buf, config.remote()))
}

/// Writes the whole buffer and flushes. A zero-length write counts as a
/// failure so a wedged driver cannot spin forever.
fn send<C: Write>(connection: &mut C, mut buf: &[u8]) -> bool {
    while !buf.is_empty() {
        match connection.write(buf) {
            Ok(0) | Err(_) => return false,
            Ok(n) => buf = &buf[n..],
        }
    }
    connection.flush().is_ok()
}

/// Polls `connection` into `framer` until the body is complete, the
/// connection errors or `timeout_ms` elapses.
fn receive<C: Read, K: Clock>(
    connection: &mut C,
    framer: &mut Framer,
    clock: &K,
    timeout_ms: u32,
) -> Outcome {
    let mut receiver = Receiver::new(framer, clock, timeout_ms);
    loop {
        let read = match receiver.buffer() {
            Ok(buf) => connection.read(buf),
            Err(outcome) => return outcome,
        };
        if let Err(outcome) = receiver.consume(read) {
            return outcome;
        }
    }
}

/// Read loop state shared by the blocking and async clients. The deadline
/// starts when the receiver is created and is checked before every read.
struct Receiver<'a, K: Clock> {
    framer: &'a mut Framer,
    clock: &'a K,
    started: u64,
    timeout_ms: u32,
    chunk: [u8; READ_CHUNK],
}

impl<'a, K: Clock> Receiver<'a, K> {
    fn new(framer: &'a mut Framer, clock: &'a K, timeout_ms: u32) -> Self {
        Self {
            framer,
            started: clock.now_ms(),
            clock,
            timeout_ms,
            chunk: [0; READ_CHUNK],
        }
    }

    /// Where the next read goes, or how the exchange ended.
    fn buffer(&mut self) -> Result<&mut [u8], Outcome> {
        if self.framer.state() == State::Done {
            return Err(Outcome::Complete);
        }
        if self.clock.elapsed_ms(self.started) >= u64::from(self.timeout_ms) {
            return Err(Outcome::Timeout);
        }
        let want = read_size(self.framer);
        Ok(&mut self.chunk[..want])
    }

    /// Feeds the result of a read into the framer. `Ok(0)` means nothing
    /// yet; an error ends the exchange.
    fn consume<E>(&mut self, read: Result<usize, E>) -> Result<(), Outcome> {
        match read {
            Ok(n) => {
                self.framer.feed(&self.chunk[..n]);
                Ok(())
            }
            Err(_) => Err(Outcome::Disconnected),
        }
    }
}

fn read_size(framer: &Framer) -> usize {
    framer
        .remaining()
        .map_or(READ_CHUNK, |left| left.clamp(1, READ_CHUNK))
}

fn close<C: Close>(connection: C, debug: bool) {
    log_close(connection.close().is_ok(), debug);
}

fn log_close(closed: bool, debug: bool) {
    if !closed && debug {
        debug!("closing connection failed");
    }
}

fn log_response(response: &Response) {
    if response.status_code == SENTINEL_STATUS {
        debug!("no valid status line ({})", response.outcome.as_str());
    } else if !is_quiet(response.status_code) {
        let body = response.body_str().unwrap_or("");
        warning!(
            "server response code: {} - {}",
            response.status_line.as_str(),
            body
        );
    }
    if response.is_truncated() {
        debug!(
            "body truncated: {} of {} bytes",
            response.body_received,
            response.content_length.unwrap_or(0)
        );
    }
}

#[cfg(feature = "async")]
pub use self::nonblocking::AsyncClient;

#[cfg(feature = "async")]
mod nonblocking {
    use super::*;
    use crate::network::{AsyncClose, AsyncConnect, AsyncRead, AsyncWrite};

    /// Async twin of [`Client`], driving the same encoder and framer over
    /// [`AsyncConnect`] connections.
    ///
    /// The deadline is checked between awaited reads, so a read future that
    /// never resolves is not interrupted; use a transport whose reads return
    /// `Ok(0)` or time out on their own.
    #[derive(Debug)]
    pub struct AsyncClient<N: AsyncConnect, K: Clock> {
        network: N,
        clock: K,
        config: Config,
    }

    impl<N: AsyncConnect, K: Clock> AsyncClient<N, K> {
        /// Creates a client; nothing is connected until the first request.
        pub fn new(network: N, clock: K, config: Config) -> Self {
            Self {
                network,
                clock,
                config,
            }
        }

        /// The session configuration.
        pub fn config(&self) -> &Config {
            &self.config
        }

        /// Sends a `GET` for `path`.
        pub async fn get(&mut self, path: &str) -> Result<Response, Error> {
            self.request(&Request::get(path)).await
        }

        /// Sends a `POST` of `body` to `path`.
        pub async fn post(&mut self, path: &str, body: &[u8]) -> Result<Response, Error> {
            self.request(&Request::post(path, body)).await
        }

        /// Performs one exchange, see [`Client::request`].
        pub async fn request(&mut self, request: &Request<'_>) -> Result<Response, Error> {
            let (request_buf, remote) = prepare(&self.config, request)?;
            let debug = self.config.debug;

            let mut connection = match self.network.connect(&remote).await {
                Ok(connection) => connection,
                Err(_) => {
                    if debug {
                        warning!("connection to {} failed", remote.as_str());
                    }
                    return Ok(self.report(Response::failed(Outcome::ConnectionFailed)));
                }
            };

            if !send_async(&mut connection, &request_buf).await {
                log_close(connection.close().await.is_ok(), debug);
                if debug {
                    warning!("writing request to {} failed", remote.as_str());
                }
                return Ok(self.report(Response::failed(Outcome::WriteFailed)));
            }

            let mut framer = Framer::new();
            let outcome = receive_async(
                &mut connection,
                &mut framer,
                &self.clock,
                self.config.timeout_ms,
            )
            .await;
            log_close(connection.close().await.is_ok(), debug);

            Ok(self.report(framer.finish(outcome)))
        }

        fn report(&self, response: Response) -> Response {
            if self.config.debug {
                log_response(&response);
            }
            response
        }
    }

    async fn receive_async<C: AsyncRead, K: Clock>(
        connection: &mut C,
        framer: &mut Framer,
        clock: &K,
        timeout_ms: u32,
    ) -> Outcome {
        let mut receiver = Receiver::new(framer, clock, timeout_ms);
        loop {
            let read = match receiver.buffer() {
                Ok(buf) => connection.read(buf).await,
                Err(outcome) => return outcome,
            };
            if let Err(outcome) = receiver.consume(read) {
                return outcome;
            }
        }
    }

    async fn send_async<C: AsyncWrite>(connection: &mut C, mut buf: &[u8]) -> bool {
        while !buf.is_empty() {
            match connection.write(buf).await {
                Ok(0) | Err(_) => return false,
                Ok(n) => buf = &buf[n..],
            }
        }
        connection.flush().await.is_ok()
    }
}
