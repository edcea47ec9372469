//! Process configuration, read once at startup.
//!
//! Values come from the environment (a `.env` file is honored when present).
//! A missing required value is fatal: the process must not accept traffic
//! half-configured.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Port the webhook listener binds on when `WEBHOOK_PORT` is unset.
pub const DEFAULT_PORT: u16 = 8443;

/// Everything the process needs before it can accept traffic.
#[derive(Debug, Clone)]
pub struct Config {
    /// Opaque bearer token embedded in every outbound API URL.
    pub token: String,
    /// PEM certificate for the HTTPS listener.
    pub tls_cert_path: PathBuf,
    /// PEM private key for the HTTPS listener.
    pub tls_key_path: PathBuf,
    /// Port the webhook listener binds on.
    pub port: u16,
    /// When set, `setWebhook` is called with this URL at startup.
    pub webhook_url: Option<String>,
}

impl Config {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        let token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let tls_cert_path =
            env::var("TLS_CERT_PATH").context("TLS_CERT_PATH must be set")?.into();
        let tls_key_path =
            env::var("TLS_KEY_PATH").context("TLS_KEY_PATH must be set")?.into();
        let port = match env::var("WEBHOOK_PORT") {
            Ok(raw) => raw.parse().context("WEBHOOK_PORT must be a port number")?,
            Err(_) => DEFAULT_PORT,
        };
        let webhook_url = env::var("WEBHOOK_URL").ok();

        Ok(Config {
            token,
            tls_cert_path,
            tls_key_path,
            port,
            webhook_url,
        })
    }
}
