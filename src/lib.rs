//! # Hookbot
//!
//! A minimal webhook-driven Telegram bot framework: receives update
//! payloads over an HTTPS webhook, classifies each update, routes
//! recognized `/commands` to registered handlers, and exposes thin
//! wrappers over the outbound Bot API methods.

pub mod api;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod types;
pub mod uri;
pub mod webhook;

pub use api::Api;
pub use config::Config;
pub use dispatch::{Bot, DispatchOutcome};
pub use error::BotError;
