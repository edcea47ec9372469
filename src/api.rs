//! Outbound Bot API surface.
//!
//! Every remote method is a thin URL-builder over the same HTTP GET
//! pattern: assemble the parameters, build the request target, perform one
//! GET, parse the body as JSON. The remote service is the sole validator
//! of chat identifiers, file identifiers and markup payloads.

use std::future::Future;

use log::warn;
use serde_json::Value;

use crate::error::BotError;
use crate::uri::build_uri;

/// Host the production Bot API lives on.
pub const DEFAULT_API_HOST: &str = "https://api.telegram.org";

/// Optional parameters for `sendMessage`.
#[derive(Debug, Clone, Default)]
pub struct SendMessageOptions {
    pub disable_web_page_preview: Option<bool>,
    pub reply_to_message_id: Option<i64>,
    pub reply_markup: Option<String>,
}

/// Optional parameters for `sendPhoto`.
#[derive(Debug, Clone, Default)]
pub struct SendPhotoOptions {
    pub caption: Option<String>,
    pub reply_to_message_id: Option<i64>,
    pub reply_markup: Option<String>,
}

/// Optional parameters shared by the audio/document/video/sticker senders.
#[derive(Debug, Clone, Default)]
pub struct ReplyOptions {
    pub reply_to_message_id: Option<i64>,
    pub reply_markup: Option<String>,
}

/// Handle on the outbound API for one bot token.
///
/// Cheap to clone; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct Api {
    client: reqwest::Client,
    base_url: String,
}

impl Api {
    pub fn new(token: &str) -> Self {
        Self::with_host(DEFAULT_API_HOST, token)
    }

    /// Points the client at a different API host (local Bot API server,
    /// tests).
    pub fn with_host(host: &str, token: &str) -> Self {
        Api {
            client: reqwest::Client::new(),
            base_url: format!("{host}/bot{token}"),
        }
    }

    /// Performs one GET against the API and parses the body as JSON.
    ///
    /// Each call is independent: no retry, no timeout policy beyond the
    /// client defaults, no validation of the response shape.
    async fn call(&self, resource: &str, params: &[(&str, String)]) -> Result<Value, BotError> {
        let target = build_uri(&self.base_url, resource, params);
        let body = self.client.get(&target).send().await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// `getMe`: the self-describe call used to establish readiness.
    pub async fn get_me(&self) -> Result<Value, BotError> {
        self.call("getMe", &[]).await
    }

    /// `setWebhook`: registers the URL the platform should deliver updates to.
    pub async fn set_webhook(&self, url: &str) -> Result<Value, BotError> {
        self.call("setWebhook", &[("url", url.to_string())]).await
    }

    /// `sendMessage`: sends chat text.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        options: &SendMessageOptions,
    ) -> Result<Value, BotError> {
        let mut params = vec![
            ("chat_id", chat_id.to_string()),
            ("text", text.to_string()),
        ];
        if let Some(disable) = options.disable_web_page_preview {
            params.push(("disable_web_page_preview", disable.to_string()));
        }
        if let Some(message_id) = options.reply_to_message_id {
            params.push(("reply_to_message_id", message_id.to_string()));
        }
        if let Some(markup) = &options.reply_markup {
            params.push(("reply_markup", markup.clone()));
        }
        self.call("sendMessage", &params).await
    }

    /// `forwardMessage`: forwards a message of any kind.
    pub async fn forward_message(
        &self,
        chat_id: i64,
        from_chat_id: i64,
        message_id: i64,
    ) -> Result<Value, BotError> {
        let params = [
            ("chat_id", chat_id.to_string()),
            ("from_chat_id", from_chat_id.to_string()),
            ("message_id", message_id.to_string()),
        ];
        self.call("forwardMessage", &params).await
    }

    /// `sendPhoto`: sends a photo by file identifier.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        photo: &str,
        options: &SendPhotoOptions,
    ) -> Result<Value, BotError> {
        let mut params = vec![
            ("chat_id", chat_id.to_string()),
            ("photo", photo.to_string()),
        ];
        if let Some(caption) = &options.caption {
            params.push(("caption", caption.clone()));
        }
        if let Some(message_id) = options.reply_to_message_id {
            params.push(("reply_to_message_id", message_id.to_string()));
        }
        if let Some(markup) = &options.reply_markup {
            params.push(("reply_markup", markup.clone()));
        }
        self.call("sendPhoto", &params).await
    }

    /// `sendAudio`: sends an audio file by file identifier.
    pub async fn send_audio(
        &self,
        chat_id: i64,
        audio: &str,
        options: &ReplyOptions,
    ) -> Result<Value, BotError> {
        self.send_media("sendAudio", "audio", chat_id, audio, options).await
    }

    /// `sendDocument`: sends a general file by file identifier.
    pub async fn send_document(
        &self,
        chat_id: i64,
        document: &str,
        options: &ReplyOptions,
    ) -> Result<Value, BotError> {
        self.send_media("sendDocument", "document", chat_id, document, options)
            .await
    }

    /// `sendVideo`: sends a video by file identifier.
    pub async fn send_video(
        &self,
        chat_id: i64,
        video: &str,
        options: &ReplyOptions,
    ) -> Result<Value, BotError> {
        self.send_media("sendVideo", "video", chat_id, video, options).await
    }

    /// `sendSticker`: sends a sticker by file identifier.
    pub async fn send_sticker(
        &self,
        chat_id: i64,
        sticker: &str,
        options: &ReplyOptions,
    ) -> Result<Value, BotError> {
        self.send_media("sendSticker", "sticker", chat_id, sticker, options)
            .await
    }

    /// `sendChatAction`: tells the chat something is happening bot-side.
    pub async fn send_chat_action(&self, chat_id: i64, action: &str) -> Result<Value, BotError> {
        let params = [
            ("chat_id", chat_id.to_string()),
            ("action", action.to_string()),
        ];
        self.call("sendChatAction", &params).await
    }

    // The four media senders only differ in the resource name and the name
    // of the file-identifier parameter.
    async fn send_media(
        &self,
        resource: &str,
        field: &'static str,
        chat_id: i64,
        file_id: &str,
        options: &ReplyOptions,
    ) -> Result<Value, BotError> {
        let mut params = vec![
            ("chat_id", chat_id.to_string()),
            (field, file_id.to_string()),
        ];
        if let Some(message_id) = options.reply_to_message_id {
            params.push(("reply_to_message_id", message_id.to_string()));
        }
        if let Some(markup) = &options.reply_markup {
            params.push(("reply_markup", markup.clone()));
        }
        self.call(resource, &params).await
    }
}

/// Spawns an outbound call whose reply the caller does not care about.
///
/// The explicit fire-and-forget marker: a failure is logged instead of
/// surfaced, and the triggering webhook response is never held up by it.
pub fn detach<F>(call: F)
where
    F: Future<Output = Result<Value, BotError>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = call.await {
            warn!("Detached API call failed: {e}");
        }
    });
}
