use super::{MAX_BODY_LEN, MAX_HEADERS, MAX_LINE_LEN, SENTINEL_STATUS};
use heapless::{String, Vec};

/// How an exchange ended.
///
/// The outcome never changes what [`Response::status_code`] and
/// [`Response::body`] mean; it only explains them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The framer reached the end of a length-delimited body.
    Complete,
    /// The connector could not open a connection.
    ConnectionFailed,
    /// The request could not be written or flushed.
    WriteFailed,
    /// The read budget elapsed.
    ///
    /// This is also how a response without `Content-Length` normally ends.
    Timeout,
    /// The transport reported an error while reading.
    Disconnected,
}

impl Outcome {
    /// Short lowercase name, for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Complete => "complete",
            Outcome::ConnectionFailed => "connection failed",
            Outcome::WriteFailed => "write failed",
            Outcome::Timeout => "timeout",
            Outcome::Disconnected => "disconnected",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Outcome {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Numeric status, or [`SENTINEL_STATUS`] when none could be determined.
    pub status_code: i16,
    /// Status line without its line terminator.
    pub status_line: String<MAX_LINE_LEN>,
    /// Raw header lines in arrival order, without terminators.
    pub headers: Vec<String<MAX_LINE_LEN>, MAX_HEADERS>,
    /// `Content-Length` as declared by the server.
    pub content_length: Option<usize>,
    /// Body bytes, at most [`MAX_BODY_LEN`].
    pub body: Vec<u8, MAX_BODY_LEN>,
    /// Body bytes received, including any discarded past [`MAX_BODY_LEN`].
    pub body_received: usize,
    /// How the exchange ended.
    pub outcome: Outcome,
}

impl Response {
    /// An empty response carrying the sentinel status.
    pub fn failed(outcome: Outcome) -> Self {
        Self {
            status_code: SENTINEL_STATUS,
            status_line: String::new(),
            headers: Vec::new(),
            content_length: None,
            body: Vec::new(),
            body_received: 0,
            outcome,
        }
    }

    /// Whether a status code could be parsed.
    pub fn has_status(&self) -> bool {
        self.status_code != SENTINEL_STATUS
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// The body as text, if it is valid UTF-8.
    pub fn body_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.body).ok()
    }

    /// Fewer body bytes arrived than `Content-Length` announced.
    pub fn is_truncated(&self) -> bool {
        self.content_length
            .is_some_and(|expected| self.body_received < expected)
    }

    /// Body bytes were dropped because they exceeded [`MAX_BODY_LEN`].
    pub fn is_overflowed(&self) -> bool {
        self.body_received > self.body.len()
    }

    /// Value of the first header called `name` (ASCII case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim())
        })
    }
}
