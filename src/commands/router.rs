//! Command Router
//!
//! Maps an upper-cased command name to its handler. The router is built once
//! at startup and shared read-only by every connection.

use crate::commands::handler::{Command, CommandError, CommandHandler, CommandResult};
use crate::storage::KeyValueStore;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Dispatches request lines to registered handlers.
#[derive(Clone, Default)]
pub struct Router {
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl Router {
    /// Creates a router with no commands registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` under `name`, case-insensitively.
    ///
    /// Registering a name twice silently replaces the earlier handler.
    pub fn register(&mut self, name: &str, handler: impl CommandHandler + 'static) {
        self.handlers.insert(name.to_uppercase(), Arc::new(handler));
    }

    /// Splits `line` on whitespace and dispatches it.
    ///
    /// The first token names the command (case-insensitive); the rest are
    /// passed to the handler verbatim. Handler results, errors included, are
    /// returned unchanged.
    pub fn handle(&self, line: &str) -> CommandResult {
        let mut parts = line.split_whitespace();

        let name = parts
            .next()
            .ok_or(CommandError::EmptyCommand)?
            .to_uppercase();
        let args: Vec<&str> = parts.collect();

        let handler = self
            .handlers
            .get(&name)
            .ok_or_else(|| CommandError::UnknownCommand(name.clone()))?;

        trace!(command = %name, args = args.len(), "Dispatching command");
        handler.call(&args)
    }

    /// Returns the registered command names, sorted.
    pub fn commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("commands", &self.commands())
            .finish()
    }
}

/// Registers every built-in command against `store`.
pub fn register_defaults(router: &mut Router, store: Arc<dyn KeyValueStore>) {
    router.register("PING", Command::Ping);
    router.register("ECHO", Command::Echo);
    router.register("UPPER", Command::Upper);
    router.register("GET", Command::Get(Arc::clone(&store)));
    router.register("SET_WITH_TTL", Command::SetWithTtl(Arc::clone(&store)));
    router.register("SET", Command::Set(Arc::clone(&store)));
    router.register("DELETE", Command::Delete(store));
}

/// Builds a router with every built-in command registered against `store`.
pub fn default_router(store: Arc<dyn KeyValueStore>) -> Router {
    let mut router = Router::new();
    register_defaults(&mut router, store);
    router
}
