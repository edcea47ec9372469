//! Command registration and lookup.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use crate::api::Api;
use crate::error::BotError;
use crate::types::{Chat, User};

/// Everything a command handler gets to see about one invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Handle on the outbound API, for sending a response.
    pub api: Api,
    pub message_id: i64,
    pub from: User,
    pub chat: Chat,
    pub date: i64,
    /// Space-separated tokens after the command name, percent-decoded.
    pub args: Vec<String>,
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type CommandHandler = Box<dyn Fn(CommandContext) -> HandlerFuture + Send + Sync>;

/// Name-to-handler table. Populated at startup, read-only afterwards; there
/// is no unregistration.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a handler under `name`. First registration wins: a duplicate
    /// name is rejected and the original handler stays in effect.
    pub fn register(&mut self, name: &str, handler: CommandHandler) -> Result<(), BotError> {
        if self.handlers.contains_key(name) {
            return Err(BotError::RegistrationConflict(name.to_string()));
        }
        self.handlers.insert(name.to_string(), handler);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandHandler> {
        self.handlers.get(name)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> CommandHandler {
        Box::new(|_ctx| Box::pin(async {}))
    }

    #[test]
    fn register_then_lookup() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", noop()).unwrap();
        assert!(registry.lookup("echo").is_some());
        assert!(registry.lookup("missing").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", noop()).unwrap();
        let err = registry.register("echo", noop()).unwrap_err();
        assert!(matches!(err, BotError::RegistrationConflict(ref name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn command_names_are_case_sensitive() {
        let mut registry = CommandRegistry::new();
        registry.register("echo", noop()).unwrap();
        assert!(registry.lookup("Echo").is_none());
    }
}
