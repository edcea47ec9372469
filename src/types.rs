//! Inbound update data model.
//!
//! The platform sends a message with at most one content field populated.
//! Rather than carrying nine optional fields around, decoding collapses
//! them into the closed [`MessageContent`] variant once, so dispatch is a
//! plain `match` instead of a chain of presence checks.

use serde::Deserialize;

/// One inbound event payload from the messaging platform.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// Sender descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

/// Chat descriptor.
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Audio {
    pub file_id: String,
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sticker {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
    #[serde(default)]
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    pub first_name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub longitude: f64,
    pub latitude: f64,
}

/// The bot's own identity, confirmed via `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotIdentity {
    pub id: i64,
    pub username: String,
}

/// One inbound message with its content already classified.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawMessage")]
pub struct Message {
    pub message_id: i64,
    pub from: User,
    pub chat: Chat,
    /// Unix timestamp assigned by the platform.
    pub date: i64,
    pub content: MessageContent,
}

/// The single content field a message may carry.
#[derive(Debug, Clone)]
pub enum MessageContent {
    Text(String),
    Audio(Audio),
    Document(Document),
    Photo(Vec<PhotoSize>),
    Sticker(Sticker),
    Video(Video),
    Contact(Contact),
    Location(Location),
    NewParticipant(User),
    LeftParticipant(User),
    /// No recognized content field was present.
    Empty,
}

/// Wire shape of a message: one optional slot per possible content field.
#[derive(Debug, Deserialize)]
struct RawMessage {
    message_id: i64,
    from: User,
    chat: Chat,
    date: i64,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    audio: Option<Audio>,
    #[serde(default)]
    document: Option<Document>,
    #[serde(default)]
    photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    sticker: Option<Sticker>,
    #[serde(default)]
    video: Option<Video>,
    #[serde(default)]
    contact: Option<Contact>,
    #[serde(default)]
    location: Option<Location>,
    #[serde(default)]
    new_chat_participant: Option<User>,
    #[serde(default)]
    left_chat_participant: Option<User>,
}

impl From<RawMessage> for Message {
    fn from(raw: RawMessage) -> Self {
        // Fixed priority order. The platform guarantees at most one content
        // field per message; the order only settles malformed payloads.
        // An empty text field counts as no content, so the command-prefix
        // check downstream never indexes into an empty string.
        let content = if let Some(text) = raw.text.filter(|text| !text.is_empty()) {
            MessageContent::Text(text)
        } else if let Some(audio) = raw.audio {
            MessageContent::Audio(audio)
        } else if let Some(document) = raw.document {
            MessageContent::Document(document)
        } else if let Some(photo) = raw.photo {
            MessageContent::Photo(photo)
        } else if let Some(sticker) = raw.sticker {
            MessageContent::Sticker(sticker)
        } else if let Some(video) = raw.video {
            MessageContent::Video(video)
        } else if let Some(contact) = raw.contact {
            MessageContent::Contact(contact)
        } else if let Some(location) = raw.location {
            MessageContent::Location(location)
        } else if let Some(user) = raw.new_chat_participant {
            MessageContent::NewParticipant(user)
        } else if let Some(user) = raw.left_chat_participant {
            MessageContent::LeftParticipant(user)
        } else {
            MessageContent::Empty
        };

        Message {
            message_id: raw.message_id,
            from: raw.from,
            chat: raw.chat,
            date: raw.date,
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_json(extra: &str) -> String {
        format!(
            r#"{{
                "message_id": 10,
                "from": {{"id": 7, "first_name": "Ada", "last_name": "Lovelace"}},
                "chat": {{"id": 99, "type": "private"}},
                "date": 1700000000,
                {extra}
            }}"#
        )
    }

    #[test]
    fn text_field_decodes_to_text_content() {
        let message: Message =
            serde_json::from_str(&message_json(r#""text": "/echo hello""#)).unwrap();
        assert!(matches!(message.content, MessageContent::Text(ref t) if t == "/echo hello"));
    }

    #[test]
    fn photo_field_decodes_to_photo_content() {
        let json = message_json(
            r#""photo": [{"file_id": "abc", "width": 90, "height": 60}]"#,
        );
        let message: Message = serde_json::from_str(&json).unwrap();
        match message.content {
            MessageContent::Photo(sizes) => {
                assert_eq!(sizes.len(), 1);
                assert_eq!(sizes[0].file_id, "abc");
            }
            other => panic!("expected photo content, got {other:?}"),
        }
    }

    #[test]
    fn left_participant_decodes_to_left_participant_content() {
        let json = message_json(r#""left_chat_participant": {"id": 3, "first_name": "Bob"}"#);
        let message: Message = serde_json::from_str(&json).unwrap();
        assert!(matches!(message.content, MessageContent::LeftParticipant(ref u) if u.id == 3));
    }

    #[test]
    fn empty_text_counts_as_no_content() {
        let message: Message = serde_json::from_str(&message_json(r#""text": """#)).unwrap();
        assert!(matches!(message.content, MessageContent::Empty));
    }

    #[test]
    fn message_without_content_fields_is_empty() {
        let message: Message =
            serde_json::from_str(&message_json(r#""unknown_field": 1"#)).unwrap();
        assert!(matches!(message.content, MessageContent::Empty));
    }

    #[test]
    fn update_without_message_decodes() {
        let update: Update = serde_json::from_str(r#"{"update_id": 5}"#).unwrap();
        assert_eq!(update.update_id, 5);
        assert!(update.message.is_none());
    }
}
