//! Line Protocol Parser
//!
//! Requests are newline-terminated lines of text. The parser reads from a
//! buffer and returns either:
//! - `Ok(Some((line, consumed)))` - A complete line, `consumed` bytes were used
//!   (including the terminator)
//! - `Ok(None)` - Need more data, no newline yet
//! - `Err(ParseError)` - The front of the buffer is not a usable line
//!
//! A line that is not valid UTF-8 is still a complete line: the error carries
//! its length so the caller can skip it and answer the lines behind it. An
//! over-long line has no reliable end, so it is fatal to the connection.
//!
//! This lets the caller append incoming network data to a buffer, pull out
//! every complete line, and keep the incomplete tail for the next read.

use thiserror::Error;

/// The request terminator.
pub const LF: u8 = b'\n';

/// Maximum length of a single request line (64 KB)
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Errors that can occur while extracting a request line.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The line is not valid UTF-8; `consumed` bytes (terminator included)
    /// make up the rejected line
    #[error("invalid UTF-8 in request line")]
    InvalidUtf8 { consumed: usize },

    /// The line exceeds the maximum allowed length
    #[error("line too long: {size} bytes (max: {max})")]
    LineTooLong { size: usize, max: usize },
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Extracts newline-delimited request lines from a byte buffer.
///
/// # Example
///
/// ```
/// use linekv::protocol::LineParser;
///
/// let parser = LineParser::new();
/// let (line, consumed) = parser.parse(b"SET a 1\r\nGET a").unwrap().unwrap();
///
/// assert_eq!(line, "SET a 1");
/// assert_eq!(consumed, 9);
/// ```
#[derive(Debug, Clone)]
pub struct LineParser {
    max_line_length: usize,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Creates a parser with the default line length limit.
    pub fn new() -> Self {
        Self::with_max_line_length(MAX_LINE_LENGTH)
    }

    /// Creates a parser that rejects lines longer than `max_line_length`.
    pub fn with_max_line_length(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    /// Attempts to extract one line from the front of the buffer.
    ///
    /// Surrounding whitespace, including a `\r` before the newline, is trimmed
    /// from the returned line.
    pub fn parse(&self, buf: &[u8]) -> ParseResult<Option<(String, usize)>> {
        let end = match buf.iter().position(|&b| b == LF) {
            Some(end) => end,
            None if buf.len() > self.max_line_length => {
                return Err(ParseError::LineTooLong {
                    size: buf.len(),
                    max: self.max_line_length,
                });
            }
            None => return Ok(None),
        };

        if end > self.max_line_length {
            return Err(ParseError::LineTooLong {
                size: end,
                max: self.max_line_length,
            });
        }

        let line = std::str::from_utf8(&buf[..end])
            .map_err(|_| ParseError::InvalidUtf8 { consumed: end + 1 })?;

        Ok(Some((line.trim().to_string(), end + 1)))
    }
}
