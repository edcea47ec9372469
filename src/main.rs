use std::sync::Arc;

use anyhow::Result;
use log::info;

use hookbot::api::Api;
use hookbot::commands;
use hookbot::config::Config;
use hookbot::dispatch::Bot;
use hookbot::webhook;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    // Load environment variables from a .env file when present
    dotenv::dotenv().ok();

    let config = Config::from_env()?;

    info!("Starting webhook bot on port {}", config.port);

    let api = Api::new(&config.token);
    let mut bot = Bot::new(api.clone());

    // Load the command modules before any traffic can arrive
    commands::register_all(&mut bot)?;

    // The bot refuses to dispatch anything until this succeeds
    let identity = bot.fetch_identity().await?.clone();
    info!("Authorized as @{} (id {})", identity.username, identity.id);

    if let Some(url) = &config.webhook_url {
        info!("Registering webhook URL {url}");
        api.set_webhook(url).await?;
    }

    webhook::serve(Arc::new(bot), &config).await
}
