//! Built-in command modules.
//!
//! Each module exposes a single `register` entry point taking the bot
//! instance, invoked once at startup.

pub mod echo;

use crate::dispatch::Bot;
use crate::error::BotError;

/// Registers every built-in command. A duplicate name is a startup failure
/// rather than a silent shadow.
pub fn register_all(bot: &mut Bot) -> Result<(), BotError> {
    echo::register(bot)?;
    Ok(())
}
