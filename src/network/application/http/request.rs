use super::{Error, MAX_REQUEST_LEN, USER_AGENT};
use core::fmt::Write;
use core::str::FromStr;
use heapless::{String, Vec};

/// HTTP request methods.
///
/// Only [`Method::Get`] and [`Method::Post`] can be encoded; the others exist
/// so callers that take a method from configuration or user input get a
/// typed rejection instead of a silently altered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
}

impl Method {
    /// Token used on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
        }
    }

    /// Whether the encoder accepts this method.
    pub fn is_supported(&self) -> bool {
        matches!(self, Method::Get | Method::Post)
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "PATCH" => Ok(Method::Patch),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            _ => Err(Error::UnsupportedMethod),
        }
    }
}

/// A single request, built fresh for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    /// Request method.
    pub method: Method,
    /// Absolute path, query string included.
    pub path: &'a str,
    /// JSON payload; adds `Content-Type` and `Content-Length` when present.
    pub body: Option<&'a [u8]>,
}

impl<'a> Request<'a> {
    /// A `GET` without body.
    pub fn get(path: &'a str) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    /// A `POST` carrying a JSON body.
    pub fn post(path: &'a str, body: &'a [u8]) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }
}

/// Buffer sized for one encoded request.
pub type RequestBuffer = Vec<u8, MAX_REQUEST_LEN>;

/// Encodes `request` into `out`.
///
/// The header block is always `Host`, `X-Api-Key`, `User-Agent` and
/// `Connection: keep-alive`, followed by `Content-Type` and `Content-Length`
/// when a body is present. The body, if any, is followed by a final CRLF.
///
/// Validation happens before anything is written, so a rejected request
/// leaves `out` empty.
pub fn encode<const N: usize>(
    request: &Request<'_>,
    host: &str,
    api_key: &str,
    out: &mut Vec<u8, N>,
) -> Result<(), Error> {
    if !request.method.is_supported() {
        return Err(Error::UnsupportedMethod);
    }
    if request.path.is_empty()
        || request
            .path
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
    {
        return Err(Error::InvalidPath);
    }

    out.clear();
    let result = encode_into(request, host, api_key, out);
    if result.is_err() {
        out.clear();
    }
    result
}

fn encode_into<const N: usize>(
    request: &Request<'_>,
    host: &str,
    api_key: &str,
    out: &mut Vec<u8, N>,
) -> Result<(), Error> {
    // Request line
    put(out, request.method.as_str().as_bytes())?;
    put(out, b" ")?;
    put(out, request.path.as_bytes())?;
    put(out, b" HTTP/1.1\r\n")?;

    // Headers
    header(out, "Host", host)?;
    header(out, "X-Api-Key", api_key)?;
    header(out, "User-Agent", USER_AGENT)?;
    header(out, "Connection", "keep-alive")?;

    match request.body {
        Some(body) => {
            let mut len_str: String<20> = String::new();
            write!(len_str, "{}", body.len()).map_err(|_| Error::RequestTooLarge)?;
            header(out, "Content-Type", "application/json")?;
            header(out, "Content-Length", &len_str)?;
            put(out, b"\r\n")?;
            put(out, body)?;
            put(out, b"\r\n")
        }
        None => put(out, b"\r\n"),
    }
}

fn header<const N: usize>(out: &mut Vec<u8, N>, name: &str, value: &str) -> Result<(), Error> {
    put(out, name.as_bytes())?;
    put(out, b": ")?;
    put(out, value.as_bytes())?;
    put(out, b"\r\n")
}

fn put<const N: usize>(out: &mut Vec<u8, N>, bytes: &[u8]) -> Result<(), Error> {
    out.extend_from_slice(bytes)
        .map_err(|_| Error::RequestTooLarge)
}
