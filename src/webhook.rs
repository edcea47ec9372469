//! Webhook receiver: the HTTPS listener feeding inbound updates into the
//! dispatcher.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use log::{debug, info};

use crate::config::Config;
use crate::dispatch::Bot;
use crate::types::Update;

/// Builds the router serving `POST /webhook`.
pub fn router(bot: Arc<Bot>) -> Router {
    Router::new()
        .route("/webhook", post(receive_update))
        .with_state(bot)
}

/// Acknowledges with an empty 200 regardless of what dispatch decided; the
/// platform only needs to know the delivery landed.
async fn receive_update(State(bot): State<Arc<Bot>>, Json(update): Json<Update>) -> StatusCode {
    let update_id = update.update_id;
    let outcome = bot.handle_update(update).await;
    debug!("Update {update_id} dispatched: {outcome:?}");
    StatusCode::OK
}

/// Serves the webhook over HTTPS with the configured certificate pair.
/// Runs until the listener fails.
pub async fn serve(bot: Arc<Bot>, config: &Config) -> anyhow::Result<()> {
    let tls = RustlsConfig::from_pem_file(&config.tls_cert_path, &config.tls_key_path)
        .await
        .context("failed to load TLS certificate/key pair")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening for webhook deliveries on {addr}");

    axum_server::bind_rustls(addr, tls)
        .serve(router(bot).into_make_service())
        .await
        .context("webhook listener failed")
}
