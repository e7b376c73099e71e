//! Wire payloads exchanged between nodes
//!
//! Two kinds of payload travel on the bus: the presence sentinel, and the
//! decimal index of the line the sender just spoke. Anything else is noise.

use std::fmt;

/// Reserved liveness marker; never parses as an index
pub const HELLO: &str = "::hello::";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    Hello,
    /// Index of the line the sender has just spoken
    Index(usize),
}

/// Why a payload was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    Empty,
    NotDecimal(String),
    OutOfRange(String),
}

impl fmt::Display for Malformed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Malformed::Empty => f.write_str("empty payload"),
            Malformed::NotDecimal(raw) => write!(f, "not a decimal index: {raw:?}"),
            Malformed::OutOfRange(raw) => write!(f, "index out of range: {raw:?}"),
        }
    }
}

impl Payload {
    /// Classify a raw payload. Whitespace is not trimmed: `" 3"` is malformed.
    pub fn decode(raw: &str) -> Result<Self, Malformed> {
        if raw == HELLO {
            return Ok(Payload::Hello);
        }
        if raw.is_empty() {
            return Err(Malformed::Empty);
        }
        // `usize::from_str` would also accept a leading '+'
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Malformed::NotDecimal(raw.to_string()));
        }
        raw.parse()
            .map(Payload::Index)
            .map_err(|_| Malformed::OutOfRange(raw.to_string()))
    }

    pub fn encode(&self) -> String {
        match self {
            Payload::Hello => HELLO.to_string(),
            Payload::Index(index) => index.to_string(),
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
