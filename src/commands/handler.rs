//! Command Handlers
//!
//! Each command is a variant of [`Command`]. Variants that touch data carry
//! the store they operate on, injected at registration time, so tests can
//! hand them any [`KeyValueStore`] implementation.
//!
//! ## Commands
//!
//! - `PING` - Returns `PONG`, ignores arguments
//! - `ECHO [arg ...]` - Returns the arguments joined by a single space
//! - `UPPER [arg ...]` - Like `ECHO`, upper-cased
//! - `GET key` - Returns the value, or `(nil)` if absent or expired
//! - `SET key value` - Stores a value without expiry, returns `OK`
//! - `SET_WITH_TTL key value seconds` - Stores a value that expires, returns `OK (TTL: <seconds>)`
//! - `DELETE key` - Removes a key, returns `true` or `false`
//!
//! Every handler checks its own arity; the router never does.

use crate::storage::KeyValueStore;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Reply for a missing or expired key.
pub const NIL: &str = "(nil)";

/// Errors a command can return. None of them close the connection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line had no tokens
    #[error("empty command")]
    EmptyCommand,

    /// No handler is registered under this name
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// Wrong number of arguments for the named command
    #[error("ERR wrong number of arguments for {0}")]
    WrongArity(String),

    /// An argument that must be an integer is not one
    #[error("Cannot convert int: {0}")]
    InvalidInteger(String),
}

/// Result type for command execution.
pub type CommandResult = Result<String, CommandError>;

/// Something the [`Router`](super::Router) can dispatch arguments to.
///
/// Implemented by [`Command`] and by any plain function or closure with the
/// matching signature.
pub trait CommandHandler: Send + Sync {
    /// Runs the command with its arguments (the command name excluded).
    fn call(&self, args: &[&str]) -> CommandResult;
}

impl<F> CommandHandler for F
where
    F: Fn(&[&str]) -> CommandResult + Send + Sync,
{
    fn call(&self, args: &[&str]) -> CommandResult {
        self(args)
    }
}

/// The built-in commands.
#[derive(Clone)]
pub enum Command {
    Ping,
    Echo,
    Upper,
    Get(Arc<dyn KeyValueStore>),
    Set(Arc<dyn KeyValueStore>),
    SetWithTtl(Arc<dyn KeyValueStore>),
    Delete(Arc<dyn KeyValueStore>),
}

impl Command {
    /// The canonical name of this command, as used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Ping => "PING",
            Command::Echo => "ECHO",
            Command::Upper => "UPPER",
            Command::Get(_) => "GET",
            Command::Set(_) => "SET",
            Command::SetWithTtl(_) => "SET_WITH_TTL",
            Command::Delete(_) => "DELETE",
        }
    }

    fn check_arity(&self, args: &[&str], expected: usize) -> Result<(), CommandError> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(CommandError::WrongArity(self.name().to_string()))
        }
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Command").field(&self.name()).finish()
    }
}

impl CommandHandler for Command {
    fn call(&self, args: &[&str]) -> CommandResult {
        match self {
            Command::Ping => Ok("PONG".to_string()),

            Command::Echo => Ok(args.join(" ")),

            Command::Upper => Ok(args.join(" ").to_uppercase()),

            Command::Get(store) => {
                self.check_arity(args, 1)?;
                Ok(store.get(args[0]).unwrap_or_else(|| NIL.to_string()))
            }

            Command::Set(store) => {
                self.check_arity(args, 2)?;
                store.set(args[0].to_string(), args[1].to_string());
                Ok("OK".to_string())
            }

            Command::SetWithTtl(store) => {
                self.check_arity(args, 3)?;
                let ttl: i64 = args[2]
                    .parse()
                    .map_err(|_| CommandError::InvalidInteger(args[2].to_string()))?;
                store.set_with_ttl(args[0].to_string(), args[1].to_string(), ttl);
                Ok(format!("OK (TTL: {})", args[2]))
            }

            Command::Delete(store) => {
                self.check_arity(args, 1)?;
                Ok(store.delete(args[0]).to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageEngine;
    use std::sync::Mutex;

    /// Records every call and answers GET/DELETE from a fixed script.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        get_reply: Option<String>,
        delete_reply: bool,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl KeyValueStore for RecordingStore {
        fn set(&self, key: String, value: String) {
            self.record(format!("set {} {}", key, value));
        }

        fn set_with_ttl(&self, key: String, value: String, ttl_seconds: i64) {
            self.record(format!("set_with_ttl {} {} {}", key, value, ttl_seconds));
        }

        fn get(&self, key: &str) -> Option<String> {
            self.record(format!("get {}", key));
            self.get_reply.clone()
        }

        fn delete(&self, key: &str) -> bool {
            self.record(format!("delete {}", key));
            self.delete_reply
        }
    }

    fn engine() -> Arc<dyn KeyValueStore> {
        Arc::new(StorageEngine::new())
    }

    #[test]
    fn test_ping_ignores_arguments() {
        assert_eq!(Command::Ping.call(&[]), Ok("PONG".to_string()));
        assert_eq!(Command::Ping.call(&["hello", "world"]), Ok("PONG".to_string()));
    }

    #[test]
    fn test_echo_and_upper() {
        assert_eq!(Command::Echo.call(&["hello", "World"]), Ok("hello World".to_string()));
        assert_eq!(Command::Echo.call(&[]), Ok(String::new()));
        assert_eq!(Command::Upper.call(&["hello", "World"]), Ok("HELLO WORLD".to_string()));
    }

    #[test]
    fn test_set_get_delete() {
        let store = engine();

        let set = Command::Set(Arc::clone(&store));
        let get = Command::Get(Arc::clone(&store));
        let delete = Command::Delete(Arc::clone(&store));

        assert_eq!(set.call(&["a", "1"]), Ok("OK".to_string()));
        assert_eq!(get.call(&["a"]), Ok("1".to_string()));
        assert_eq!(delete.call(&["a"]), Ok("true".to_string()));
        assert_eq!(delete.call(&["a"]), Ok("false".to_string()));
        assert_eq!(get.call(&["a"]), Ok(NIL.to_string()));
    }

    #[test]
    fn test_set_with_ttl() {
        let store = engine();

        let set_with_ttl = Command::SetWithTtl(Arc::clone(&store));
        let get = Command::Get(Arc::clone(&store));

        assert_eq!(
            set_with_ttl.call(&["live", "v", "100"]),
            Ok("OK (TTL: 100)".to_string())
        );
        assert_eq!(get.call(&["live"]), Ok("v".to_string()));

        assert_eq!(
            set_with_ttl.call(&["dead", "v", "0"]),
            Ok("OK (TTL: 0)".to_string())
        );
        assert_eq!(get.call(&["dead"]), Ok(NIL.to_string()));

        assert_eq!(
            set_with_ttl.call(&["gone", "v", "-3"]),
            Ok("OK (TTL: -3)".to_string())
        );
        assert_eq!(get.call(&["gone"]), Ok(NIL.to_string()));
    }

    #[test]
    fn test_set_with_ttl_rejects_non_integer() {
        let store = Arc::new(RecordingStore::default());
        let cmd = Command::SetWithTtl(store.clone());

        assert_eq!(
            cmd.call(&["k", "v", "soon"]),
            Err(CommandError::InvalidInteger("soon".to_string()))
        );
        assert_eq!(
            cmd.call(&["k", "v", "1.5"]),
            Err(CommandError::InvalidInteger("1.5".to_string()))
        );
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_arity() {
        let store = Arc::new(RecordingStore::default());

        let cases: Vec<(Command, Vec<&str>)> = vec![
            (Command::Get(store.clone()), vec![]),
            (Command::Get(store.clone()), vec!["a", "b"]),
            (Command::Set(store.clone()), vec!["onlykey"]),
            (Command::Set(store.clone()), vec!["a", "b", "c"]),
            (Command::SetWithTtl(store.clone()), vec!["a", "b"]),
            (Command::Delete(store.clone()), vec![]),
        ];

        for (cmd, args) in cases {
            assert_eq!(
                cmd.call(&args),
                Err(CommandError::WrongArity(cmd.name().to_string()))
            );
        }

        // No store operation ran on an error path
        assert!(store.calls().is_empty());
    }

    #[test]
    fn test_commands_use_injected_store() {
        let store = Arc::new(RecordingStore {
            get_reply: Some("scripted".to_string()),
            delete_reply: true,
            ..Default::default()
        });

        assert_eq!(Command::Get(store.clone()).call(&["k"]), Ok("scripted".to_string()));
        assert_eq!(Command::Set(store.clone()).call(&["k", "v"]), Ok("OK".to_string()));
        assert_eq!(
            Command::SetWithTtl(store.clone()).call(&["k", "v", "7"]),
            Ok("OK (TTL: 7)".to_string())
        );
        assert_eq!(Command::Delete(store.clone()).call(&["k"]), Ok("true".to_string()));

        assert_eq!(
            store.calls(),
            vec!["get k", "set k v", "set_with_ttl k v 7", "delete k"]
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CommandError::EmptyCommand.to_string(), "empty command");
        assert_eq!(
            CommandError::UnknownCommand("FOO".to_string()).to_string(),
            "unknown command: FOO"
        );
        assert_eq!(
            CommandError::WrongArity("SET".to_string()).to_string(),
            "ERR wrong number of arguments for SET"
        );
        assert_eq!(
            CommandError::InvalidInteger("x".to_string()).to_string(),
            "Cannot convert int: x"
        );
    }
}
