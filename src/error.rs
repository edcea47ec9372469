//! Error types shared across the framework.

use thiserror::Error;

/// Everything that can go wrong inside the bot framework.
///
/// Outbound call failures stay local to the caller that issued them; the
/// dispatcher itself never returns an error. Unknown commands, unready
/// state and unmatched content are absorbed (and logged), not surfaced.
#[derive(Debug, Error)]
pub enum BotError {
    /// Network or connection failure on an outbound API call.
    #[error("transport failure on outbound API call")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be parsed as JSON.
    #[error("malformed API response body")]
    MalformedResponse(#[from] serde_json::Error),

    /// A command name was registered twice. The first handler stays in
    /// effect; the second registration has no observable effect on dispatch.
    #[error("command `{0}` is already registered")]
    RegistrationConflict(String),

    /// The bot has not yet confirmed its own identity with the platform.
    #[error("bot identity not yet established")]
    NotReady,
}
