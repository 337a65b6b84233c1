use super::{DEFAULT_TIMEOUT_MS, Error};
use core::fmt::Write;
use core::net::{IpAddr, SocketAddr};
use heapless::String;

/// Longest hostname accepted by [`Config::with_hostname`].
pub const MAX_HOST_LEN: usize = 64;
/// Longest API key accepted.
pub const MAX_API_KEY_LEN: usize = 64;
/// Capacity of rendered `host` / `host:port` strings.
pub const MAX_REMOTE_LEN: usize = 80;

/// Where the server lives.
///
/// The two forms are exclusive: the `Host` header and the connect address are
/// both derived from whichever one the client was built with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A literal IPv4 or IPv6 address.
    Ip(IpAddr),
    /// A DNS name resolved by the connector.
    Hostname(String<MAX_HOST_LEN>),
}

/// Session settings, fixed for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Server address.
    pub target: Target,
    /// TCP port, usually 80.
    pub port: u16,
    /// Value sent in the `X-Api-Key` header.
    pub api_key: String<MAX_API_KEY_LEN>,
    /// Budget for reading each response, in milliseconds.
    pub timeout_ms: u32,
    /// Emit diagnostics through the `log`/`defmt` backends.
    pub debug: bool,
}

impl Config {
    /// Targets a server by IP address.
    pub fn with_ip(ip: impl Into<IpAddr>, port: u16, api_key: &str) -> Result<Self, Error> {
        Ok(Self {
            target: Target::Ip(ip.into()),
            port,
            api_key: header_value(api_key)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debug: false,
        })
    }

    /// Targets a server by hostname.
    pub fn with_hostname(host: &str, port: u16, api_key: &str) -> Result<Self, Error> {
        if host.is_empty() || host.bytes().any(|b| b == b':' || b == b'/') {
            return Err(Error::InvalidConfig);
        }
        Ok(Self {
            target: Target::Hostname(header_value(host)?),
            port,
            api_key: header_value(api_key)?,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            debug: false,
        })
    }

    /// Overrides the response timeout.
    pub fn timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Turns diagnostics on or off.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Value of the `Host` header.
    pub fn host(&self) -> String<MAX_REMOTE_LEN> {
        let mut out = String::new();
        // Capacity covers the longest IPv6 literal and MAX_HOST_LEN.
        let _ = match &self.target {
            Target::Ip(IpAddr::V4(ip)) => write!(out, "{}", ip),
            Target::Ip(IpAddr::V6(ip)) => write!(out, "[{}]", ip),
            Target::Hostname(name) => out.push_str(name).map_err(|_| core::fmt::Error),
        };
        out
    }

    /// Address handed to [`Connect::connect`](crate::network::Connect::connect).
    pub fn remote(&self) -> String<MAX_REMOTE_LEN> {
        let mut out = String::new();
        let _ = match &self.target {
            Target::Ip(ip) => write!(out, "{}", SocketAddr::new(*ip, self.port)),
            Target::Hostname(name) => write!(out, "{}:{}", name, self.port),
        };
        out
    }
}

fn header_value<const N: usize>(value: &str) -> Result<String<N>, Error> {
    if value.chars().any(|c| c.is_control()) {
        return Err(Error::InvalidConfig);
    }
    String::try_from(value).map_err(|_| Error::InvalidConfig)
}
