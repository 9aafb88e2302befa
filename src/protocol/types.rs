//! Line Protocol Reply Types
//!
//! Every request line gets exactly one reply line.
//!
//! ## Protocol Format
//!
//! Success: `<response>\n`
//! Error: `Error process your command <message>\n`
//!
//! ## Examples
//!
//! ```text
//! SET a 1      ->  OK
//! GET a        ->  1
//! GET missing  ->  (nil)
//! SET onlykey  ->  Error process your command ERR wrong number of arguments for SET
//! ```

use std::fmt;

/// The reply terminator.
pub const NEWLINE: &[u8] = b"\n";

/// Prefix written before every error message.
pub const ERROR_PREFIX: &str = "Error process your command ";

/// A single reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A successful command response
    Value(String),

    /// A command that failed; the connection stays open
    Error(String),
}

impl Reply {
    /// Creates a success reply.
    pub fn value(s: impl Into<String>) -> Self {
        Reply::Value(s.into())
    }

    /// Creates an error reply from anything displayable.
    ///
    /// # Example
    /// ```
    /// use linekv::protocol::Reply;
    /// let err = Reply::error("empty command");
    /// assert_eq!(err.serialize(), b"Error process your command empty command\n");
    /// ```
    pub fn error(message: impl fmt::Display) -> Self {
        Reply::Error(message.to_string())
    }

    /// Serializes the reply to bytes for sending over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the reply into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Reply::Value(s) => {
                buf.extend_from_slice(s.as_bytes());
            }
            Reply::Error(message) => {
                buf.extend_from_slice(ERROR_PREFIX.as_bytes());
                buf.extend_from_slice(message.as_bytes());
            }
        }
        buf.extend_from_slice(NEWLINE);
    }

    /// Returns true if this reply is an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }
}

impl<E: fmt::Display> From<Result<String, E>> for Reply {
    fn from(result: Result<String, E>) -> Self {
        match result {
            Ok(value) => Reply::Value(value),
            Err(e) => Reply::error(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_serialize() {
        assert_eq!(Reply::value("OK").serialize(), b"OK\n");
        assert_eq!(Reply::value("(nil)").serialize(), b"(nil)\n");
    }

    #[test]
    fn test_empty_value_serialize() {
        assert_eq!(Reply::value("").serialize(), b"\n");
    }

    #[test]
    fn test_error_serialize() {
        let reply = Reply::error("unknown command: FOO");
        assert_eq!(
            reply.serialize(),
            b"Error process your command unknown command: FOO\n"
        );
        assert!(reply.is_error());
    }

    #[test]
    fn test_from_result() {
        let ok: Result<String, String> = Ok("PONG".to_string());
        assert_eq!(Reply::from(ok), Reply::value("PONG"));

        let err: Result<String, String> = Err("empty command".to_string());
        assert_eq!(Reply::from(err), Reply::error("empty command"));
    }
}
