//! Incremental HTTP/1.1 response framing.
//!
//! The [`Framer`] is a pure state machine: it is fed bytes and never touches
//! a connection or a clock, so it can be driven by the blocking client, the
//! async client or a test directly.
//!
//! ```text
//! AwaitingStatusLine ──\n──▶ AwaitingHeaders ──blank line──▶ AwaitingBody ──Content-Length reached──▶ Done
//!                                        └──── blank line with Content-Length: 0 ─────────────────────▶ Done
//! ```

use super::response::{Outcome, Response};
use super::status::{SENTINEL_STATUS, extract_status_code};
use super::{MAX_BODY_LEN, MAX_HEADERS, MAX_LINE_LEN};
use heapless::{String, Vec};

const CONTENT_LENGTH_PREFIX: &str = "Content-Length: ";

/// Position of the framer within a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum State {
    /// Accumulating the first line.
    AwaitingStatusLine,
    /// Accumulating header lines until a blank line.
    AwaitingHeaders,
    /// Counting body bytes.
    AwaitingBody,
    /// The declared body length has been reached.
    Done,
}

/// Turns a response byte stream into status line, headers and body.
#[derive(Debug, Clone)]
pub struct Framer {
    state: State,
    line: Vec<u8, MAX_LINE_LEN>,
    line_truncated: bool,
    status_line: String<MAX_LINE_LEN>,
    headers: Vec<String<MAX_LINE_LEN>, MAX_HEADERS>,
    content_length: Option<usize>,
    body: Vec<u8, MAX_BODY_LEN>,
    body_received: usize,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    /// A framer waiting for the status line.
    pub fn new() -> Self {
        Self {
            state: State::AwaitingStatusLine,
            line: Vec::new(),
            line_truncated: false,
            status_line: String::new(),
            headers: Vec::new(),
            content_length: None,
            body: Vec::new(),
            body_received: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Whether the header block has been fully received.
    pub fn headers_complete(&self) -> bool {
        self.state >= State::AwaitingBody
    }

    /// `Content-Length` seen so far.
    pub fn content_length(&self) -> Option<usize> {
        self.content_length
    }

    /// Body bytes still expected, when the length is known and the body has
    /// started.
    ///
    /// Drivers use this to avoid reading past the end of the body.
    pub fn remaining(&self) -> Option<usize> {
        match (self.state, self.content_length) {
            (State::AwaitingBody, Some(expected)) => Some(expected - self.body_received),
            (State::Done, _) => Some(0),
            _ => None,
        }
    }

    /// Feeds a chunk, stopping at [`State::Done`]. Returns the number of
    /// bytes consumed; anything after the end of the body is left untouched.
    pub fn feed(&mut self, bytes: &[u8]) -> usize {
        let mut consumed = 0;
        for &byte in bytes {
            if self.state == State::Done {
                break;
            }
            self.push(byte);
            consumed += 1;
        }
        consumed
    }

    /// Feeds a single byte and returns the resulting state.
    pub fn push(&mut self, byte: u8) -> State {
        match self.state {
            State::AwaitingStatusLine | State::AwaitingHeaders => {
                if byte == b'\n' {
                    self.end_line();
                } else if self.line.push(byte).is_err() {
                    self.line_truncated = true;
                }
            }
            State::AwaitingBody => self.push_body(byte),
            State::Done => {}
        }
        self.state
    }

    /// Builds the response for an exchange that ended with `outcome`.
    ///
    /// Without a complete header block the result carries the sentinel status
    /// and an empty body, whatever was buffered.
    pub fn finish(self, outcome: Outcome) -> Response {
        if !self.headers_complete() {
            return Response::failed(outcome);
        }
        Response {
            status_code: extract_status_code(&self.status_line),
            status_line: self.status_line,
            headers: self.headers,
            content_length: self.content_length,
            body: self.body,
            body_received: self.body_received,
            outcome,
        }
    }

    fn end_line(&mut self) {
        if self.line.last() == Some(&b'\r') {
            self.line.pop();
        }
        let blank = self.line.is_empty() && !self.line_truncated;
        let text = utf8_prefix(&self.line);

        match self.state {
            State::AwaitingStatusLine => {
                self.status_line = String::try_from(text).unwrap_or_default();
                self.state = State::AwaitingHeaders;
            }
            State::AwaitingHeaders if blank => {
                self.state = match self.content_length {
                    Some(0) => State::Done,
                    _ => State::AwaitingBody,
                };
            }
            State::AwaitingHeaders => {
                if let Some(length) = parse_content_length(text) {
                    self.content_length = Some(length);
                }
                if let Ok(header) = String::try_from(text) {
                    // A full header table only loses the raw line.
                    let _ = self.headers.push(header);
                }
            }
            State::AwaitingBody | State::Done => {}
        }

        self.line.clear();
        self.line_truncated = false;
    }

    fn push_body(&mut self, byte: u8) {
        self.body_received += 1;
        // Past MAX_BODY_LEN the byte is dropped but still counted.
        let _ = self.body.push(byte);
        if self.content_length == Some(self.body_received) {
            self.state = State::Done;
        }
    }
}

/// Leading digits after a case-sensitive `Content-Length: ` prefix.
fn parse_content_length(line: &str) -> Option<usize> {
    let value = line
        .strip_prefix(CONTENT_LENGTH_PREFIX)?
        .trim_start_matches(|c: char| c == ' ' || c == '\t');
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// The longest valid UTF-8 prefix; truncation can split a character.
fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    }
}
