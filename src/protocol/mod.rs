//! Line Protocol Implementation
//!
//! Clients send one command per newline-terminated line:
//!
//! ```text
//! COMMAND [arg1] [arg2] ...\n
//! ```
//!
//! and the server answers with exactly one line per command. There is no
//! framing beyond the newline and no quoting, so keys and values cannot
//! contain whitespace.
//!
//! ## Modules
//!
//! - `parser`: Extracts complete lines from a read buffer
//! - `types`: Defines the `Reply` enum and serialization
//!
//! ## Example
//!
//! ```
//! use linekv::protocol::{LineParser, Reply};
//!
//! let (line, consumed) = LineParser::new().parse(b"GET name\n").unwrap().unwrap();
//! assert_eq!((line.as_str(), consumed), ("GET name", 9));
//!
//! assert_eq!(Reply::value("alice").serialize(), b"alice\n");
//! ```

pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use parser::{LineParser, ParseError, ParseResult, MAX_LINE_LENGTH};
pub use types::{Reply, ERROR_PREFIX};
