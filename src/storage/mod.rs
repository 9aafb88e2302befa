//! Storage Engine Module
//!
//! This module provides the core storage functionality for linekv:
//! a thread-safe key-value store with TTL support and a background
//! expiry sweeper.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               StorageEngine                 │
//! │        RwLock<HashMap<String, Entry>>       │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!                       │ cleanup_expired()
//!          ┌────────────┴──────────────┐
//!          │       ExpirySweeper       │
//!          │  (Background Tokio Task)  │
//!          └───────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use linekv::storage::{KeyValueStore, StorageEngine};
//! use std::sync::Arc;
//!
//! let engine = Arc::new(StorageEngine::new());
//!
//! engine.set("name".to_string(), "alice".to_string());
//! assert_eq!(engine.get("name"), Some("alice".to_string()));
//!
//! engine.set_with_ttl("session".to_string(), "token123".to_string(), 3600);
//! assert!(engine.delete("session"));
//! ```

pub mod engine;
pub mod expiry;

// Re-export commonly used types
pub use engine::{Entry, KeyValueStore, StorageEngine, StorageStats};
pub use expiry::{ExpiryConfig, ExpirySweeper};
