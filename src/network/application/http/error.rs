use core::fmt;

/// Failures detected before any network I/O takes place.
///
/// Transport trouble is never reported through this type; see
/// [`Outcome`](super::Outcome).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// Only `GET` and `POST` can be sent.
    UnsupportedMethod,
    /// The encoded request does not fit in [`MAX_REQUEST_LEN`](super::MAX_REQUEST_LEN).
    RequestTooLarge,
    /// The path is empty or contains whitespace or control characters.
    InvalidPath,
    /// A configuration string is too long or contains forbidden characters.
    InvalidConfig,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::UnsupportedMethod => "only GET and POST are supported",
            Error::RequestTooLarge => "request does not fit in the request buffer",
            Error::InvalidPath => "request path is empty or contains whitespace",
            Error::InvalidConfig => "invalid client configuration",
        };
        f.write_str(msg)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Error::UnsupportedMethod => defmt::write!(f, "UnsupportedMethod"),
            Error::RequestTooLarge => defmt::write!(f, "RequestTooLarge"),
            Error::InvalidPath => defmt::write!(f, "InvalidPath"),
            Error::InvalidConfig => defmt::write!(f, "InvalidConfig"),
        }
    }
}
