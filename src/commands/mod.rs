//! Command Handler Module
//!
//! This module turns a request line into a store operation and a reply string.
//!
//! ## Architecture
//!
//! ```text
//! Request line
//!       │
//!       ▼
//! ┌─────────────────┐
//! │     Router      │  split on whitespace, upper-case the name,
//! │                 │  look up the handler
//! └────────┬────────┘
//!          │ args
//!          ▼
//! ┌─────────────────┐
//! │    Command      │  check arity, parse arguments,
//! │                 │  format the reply
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  KeyValueStore  │  (storage module)
//! └─────────────────┘
//! ```
//!
//! ## Supported Commands
//!
//! - `PING`, `ECHO`, `UPPER`
//! - `GET`, `SET`, `SET_WITH_TTL`, `DELETE`

pub mod handler;
pub mod router;

pub use handler::{Command, CommandError, CommandHandler, CommandResult, NIL};
pub use router::{default_router, register_defaults, Router};
