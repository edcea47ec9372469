//! Update classification and command dispatch.
//!
//! One inbound update flows through a single-pass decision tree: readiness
//! gate, text-or-content classification, command parsing, then either a
//! registry lookup or one typed content callback. The dispatcher never
//! fails; everything it cannot place is logged and absorbed.

use std::future::Future;
use std::pin::Pin;
use std::sync::OnceLock;

use log::{debug, warn};
use serde::Deserialize;

use crate::api::Api;
use crate::error::BotError;
use crate::registry::{CommandContext, CommandRegistry};
use crate::types::{
    Audio, BotIdentity, Chat, Contact, Document, Location, Message, MessageContent, PhotoSize,
    Sticker, Update, User, Video,
};

/// Default character marking a text message as a command invocation.
pub const DEFAULT_COMMAND_PREFIX: char = '/';

/// Invocation metadata handed to every content callback.
#[derive(Debug, Clone)]
pub struct UpdateContext {
    /// Handle on the outbound API, for sending a response.
    pub api: Api,
    pub message_id: i64,
    pub from: User,
    pub chat: Chat,
    pub date: i64,
}

pub type CallbackFuture = Pin<Box<dyn Future<Output = ()> + Send>>;
pub type ContentCallback<T> = Box<dyn Fn(UpdateContext, T) -> CallbackFuture + Send + Sync>;

/// What the dispatcher did with one inbound update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Dropped: the bot's identity is not yet established. Not an error;
    /// nothing is queued or retried.
    NotReady,
    /// The payload carried no message object.
    NoMessage,
    /// A registered command handler ran.
    Command,
    /// Command syntax, but no handler registered under that name.
    UnknownCommand,
    /// Plain chat text; the plain-text callback ran if one was set.
    PlainText,
    /// A typed content field matched; its callback ran if one was set.
    Content,
    /// No recognizable content; nothing was invoked.
    NoContent,
}

#[derive(Default)]
struct Callbacks {
    plain_text: Option<ContentCallback<String>>,
    audio: Option<ContentCallback<Audio>>,
    document: Option<ContentCallback<Document>>,
    photo: Option<ContentCallback<Vec<PhotoSize>>>,
    sticker: Option<ContentCallback<Sticker>>,
    video: Option<ContentCallback<Video>>,
    contact: Option<ContentCallback<Contact>>,
    location: Option<ContentCallback<Location>>,
    new_participant: Option<ContentCallback<User>>,
    left_participant: Option<ContentCallback<User>>,
}

/// Envelope `getMe` wraps the identity in.
#[derive(Debug, Deserialize)]
struct GetMeEnvelope {
    ok: bool,
    #[serde(default)]
    result: Option<BotIdentity>,
}

/// The bot object: owns the command registry, the content callbacks and the
/// readiness state, and classifies every inbound update.
pub struct Bot {
    api: Api,
    command_prefix: char,
    registry: CommandRegistry,
    callbacks: Callbacks,
    // Written exactly once; read on every dispatch. No lock needed since
    // there are no concurrent writers.
    identity: OnceLock<BotIdentity>,
}

impl Bot {
    pub fn new(api: Api) -> Self {
        Bot {
            api,
            command_prefix: DEFAULT_COMMAND_PREFIX,
            registry: CommandRegistry::new(),
            callbacks: Callbacks::default(),
            identity: OnceLock::new(),
        }
    }

    pub fn with_command_prefix(mut self, prefix: char) -> Self {
        self.command_prefix = prefix;
        self
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    /// Registers a command handler. First registration wins; a duplicate
    /// name is surfaced as [`BotError::RegistrationConflict`].
    pub fn register_command<F, Fut>(&mut self, name: &str, handler: F) -> Result<(), BotError>
    where
        F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.registry
            .register(name, Box::new(move |ctx| Box::pin(handler(ctx))))
    }

    pub fn on_plain_text<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.plain_text = Some(Box::new(move |ctx, text| Box::pin(callback(ctx, text))));
    }

    pub fn on_audio<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Audio) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.audio = Some(Box::new(move |ctx, audio| Box::pin(callback(ctx, audio))));
    }

    pub fn on_document<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Document) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.document =
            Some(Box::new(move |ctx, document| Box::pin(callback(ctx, document))));
    }

    pub fn on_photo<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Vec<PhotoSize>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.photo = Some(Box::new(move |ctx, photo| Box::pin(callback(ctx, photo))));
    }

    pub fn on_sticker<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Sticker) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.sticker =
            Some(Box::new(move |ctx, sticker| Box::pin(callback(ctx, sticker))));
    }

    pub fn on_video<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Video) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.video = Some(Box::new(move |ctx, video| Box::pin(callback(ctx, video))));
    }

    pub fn on_contact<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Contact) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.contact =
            Some(Box::new(move |ctx, contact| Box::pin(callback(ctx, contact))));
    }

    pub fn on_location<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, Location) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.location =
            Some(Box::new(move |ctx, location| Box::pin(callback(ctx, location))));
    }

    pub fn on_new_participant<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, User) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.new_participant =
            Some(Box::new(move |ctx, user| Box::pin(callback(ctx, user))));
    }

    pub fn on_left_participant<F, Fut>(&mut self, callback: F)
    where
        F: Fn(UpdateContext, User) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.callbacks.left_participant =
            Some(Box::new(move |ctx, user| Box::pin(callback(ctx, user))));
    }

    /// Fetches the bot's own identity via `getMe` and marks the bot ready.
    ///
    /// A refused envelope (`ok: false` or a missing result) leaves the bot
    /// unready and returns [`BotError::NotReady`].
    pub async fn fetch_identity(&self) -> Result<&BotIdentity, BotError> {
        let value = self.api.get_me().await?;
        let envelope: GetMeEnvelope = serde_json::from_value(value)?;
        match (envelope.ok, envelope.result) {
            (true, Some(identity)) => Ok(self.mark_ready(identity)),
            _ => {
                warn!("getMe did not confirm an identity; bot stays unready");
                Err(BotError::NotReady)
            }
        }
    }

    /// Marks the bot ready without a network round-trip. A later call keeps
    /// the identity that was set first.
    pub fn mark_ready(&self, identity: BotIdentity) -> &BotIdentity {
        self.identity.get_or_init(move || identity)
    }

    pub fn identity(&self) -> Result<&BotIdentity, BotError> {
        self.identity.get().ok_or(BotError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.identity.get().is_some()
    }

    /// Classifies one inbound update and runs whatever it maps to.
    pub async fn handle_update(&self, update: Update) -> DispatchOutcome {
        if !self.is_ready() {
            debug!(
                "Dropping update {}: identity not yet established",
                update.update_id
            );
            return DispatchOutcome::NotReady;
        }

        let Some(message) = update.message else {
            debug!("Update {} carried no message", update.update_id);
            return DispatchOutcome::NoMessage;
        };

        let Message {
            message_id,
            from,
            chat,
            date,
            content,
        } = message;
        let ctx = UpdateContext {
            api: self.api.clone(),
            message_id,
            from,
            chat,
            date,
        };

        match content {
            MessageContent::Text(text) => self.dispatch_text(ctx, text).await,
            MessageContent::Audio(audio) => Self::invoke(&self.callbacks.audio, ctx, audio).await,
            MessageContent::Document(document) => {
                Self::invoke(&self.callbacks.document, ctx, document).await
            }
            MessageContent::Photo(photo) => Self::invoke(&self.callbacks.photo, ctx, photo).await,
            MessageContent::Sticker(sticker) => {
                Self::invoke(&self.callbacks.sticker, ctx, sticker).await
            }
            MessageContent::Video(video) => Self::invoke(&self.callbacks.video, ctx, video).await,
            MessageContent::Contact(contact) => {
                Self::invoke(&self.callbacks.contact, ctx, contact).await
            }
            MessageContent::Location(location) => {
                Self::invoke(&self.callbacks.location, ctx, location).await
            }
            MessageContent::NewParticipant(user) => {
                Self::invoke(&self.callbacks.new_participant, ctx, user).await
            }
            MessageContent::LeftParticipant(user) => {
                Self::invoke(&self.callbacks.left_participant, ctx, user).await
            }
            MessageContent::Empty => DispatchOutcome::NoContent,
        }
    }

    async fn dispatch_text(&self, ctx: UpdateContext, text: String) -> DispatchOutcome {
        let Some((name, args)) = parse_command(&text, self.command_prefix) else {
            if let Some(callback) = &self.callbacks.plain_text {
                callback(ctx, text).await;
            }
            return DispatchOutcome::PlainText;
        };

        match self.registry.lookup(&name) {
            Some(handler) => {
                handler(CommandContext {
                    api: ctx.api,
                    message_id: ctx.message_id,
                    from: ctx.from,
                    chat: ctx.chat,
                    date: ctx.date,
                    args,
                })
                .await;
                DispatchOutcome::Command
            }
            None => {
                debug!(
                    "No handler registered for command {}{name}",
                    self.command_prefix
                );
                DispatchOutcome::UnknownCommand
            }
        }
    }

    async fn invoke<T>(
        slot: &Option<ContentCallback<T>>,
        ctx: UpdateContext,
        payload: T,
    ) -> DispatchOutcome {
        if let Some(callback) = slot {
            callback(ctx, payload).await;
        }
        DispatchOutcome::Content
    }
}

/// Splits command text into its name and decoded arguments, or `None` when
/// the text does not start with `prefix` (including the empty string).
///
/// Tokenization splits on single spaces. The command name is the first
/// token with the prefix stripped and is deliberately left percent-encoded,
/// matching the wire behavior callers rely on; every remaining token is
/// decoded independently. A token whose decoding fails falls back to its
/// raw form rather than failing the dispatch.
pub fn parse_command(text: &str, prefix: char) -> Option<(String, Vec<String>)> {
    let rest = text.strip_prefix(prefix)?;
    let mut tokens = rest.split(' ');
    let name = tokens.next().unwrap_or_default().to_string();
    let args = tokens
        .map(|token| match urlencoding::decode(token) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => token.to_string(),
        })
        .collect();
    Some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_name_and_args_are_split_on_spaces() {
        let (name, args) = parse_command("/echo hello world", '/').unwrap();
        assert_eq!(name, "echo");
        assert_eq!(args, vec!["hello", "world"]);
    }

    #[test]
    fn command_name_is_not_percent_decoded() {
        let (name, args) = parse_command("/echo%20test", '/').unwrap();
        assert_eq!(name, "echo%20test");
        assert!(args.is_empty());
    }

    #[test]
    fn arguments_are_percent_decoded() {
        let (_, args) = parse_command("/echo hello%20world", '/').unwrap();
        assert_eq!(args, vec!["hello world"]);
    }

    #[test]
    fn non_command_text_is_rejected() {
        assert!(parse_command("hello", '/').is_none());
    }

    #[test]
    fn empty_text_is_not_a_command() {
        assert!(parse_command("", '/').is_none());
    }

    #[test]
    fn bare_prefix_yields_empty_name() {
        let (name, args) = parse_command("/", '/').unwrap();
        assert_eq!(name, "");
        assert!(args.is_empty());
    }

    #[test]
    fn custom_prefix_is_honored() {
        let (name, _) = parse_command("!echo hi", '!').unwrap();
        assert_eq!(name, "echo");
        assert!(parse_command("/echo hi", '!').is_none());
    }
}
