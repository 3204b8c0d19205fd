//! Canonical request/response types
//!
//! The canonical protocol is the Messages-style shape the client speaks. Every
//! adapter converts to and from these structures. The design prioritizes:
//! - Type safety for the fields the adapters actually read
//! - Forward compatibility through flattened `extra` maps, so fields this crate
//!   does not know about survive a clone-then-patch transform
//! - Cheap structural cloning (`Clone`) in place of serialize/deserialize copies

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Client input
    User,
    /// Model output
    Assistant,
}

/// Source of an image content part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// Source encoding, `"base64"` for every image this crate produces
    #[serde(rename = "type")]
    pub source_type: String,

    /// MIME type, e.g. `image/png`
    pub media_type: String,

    /// Base64 payload
    pub data: String,

    /// Fields this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageSource {
    /// Create a base64 image source
    pub fn base64(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            source_type: "base64".to_string(),
            media_type: media_type.into(),
            data: data.into(),
            extra: Map::new(),
        }
    }
}

/// Individual content part of a message or response
///
/// Recognised kinds are typed. Anything else (including a recognised `type`
/// whose fields do not match) is kept verbatim as [`ContentPart::Other`] so it
/// can pass through adapters that do not need to understand it.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    /// Text content part
    Text { text: String },

    /// Inline image
    Image { source: ImageSource },

    /// Tool invocation emitted by the assistant
    ToolUse {
        id: Option<String>,
        name: String,
        input: Value,
    },

    /// Any other part kind, stored as the original JSON object
    Other(Map<String, Value>),
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create a base64 image part
    pub fn image(media_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::Image {
            source: ImageSource::base64(media_type, data),
        }
    }

    /// The `type` tag of this part
    pub fn kind(&self) -> &str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::ToolUse { .. } => "tool_use",
            Self::Other(map) => map.get("type").and_then(Value::as_str).unwrap_or("unknown"),
        }
    }

    /// Text of a text part, typed or kept verbatim
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other(map) if self.kind() == "text" => map.get("text").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for ContentPart {
    fn from(map: Map<String, Value>) -> Self {
        let only = |keys: &[&str]| map.keys().all(|key| key == "type" || keys.contains(&key.as_str()));
        let typed = match map.get("type").and_then(Value::as_str) {
            // Known kinds carrying extra fields (e.g. `cache_control`) stay verbatim
            Some("text") if !only(&["text"]) => None,
            Some("image") if !only(&["source"]) => None,
            Some("tool_use") if !only(&["id", "name", "input"]) => None,
            Some("text") => map
                .get("text")
                .and_then(Value::as_str)
                .map(|text| Self::text(text)),
            Some("image") => map
                .get("source")
                .cloned()
                .and_then(|source| serde_json::from_value(source).ok())
                .map(|source| Self::Image { source }),
            Some("tool_use") => match (map.get("name").and_then(Value::as_str), map.get("input")) {
                // A part without `input` stays verbatim so re-serialization adds nothing
                (Some(name), Some(input)) => Some(Self::ToolUse {
                    id: map.get("id").and_then(Value::as_str).map(str::to_string),
                    name: name.to_string(),
                    input: input.clone(),
                }),
                _ => None,
            },
            _ => None,
        };

        typed.unwrap_or(Self::Other(map))
    }
}

impl From<ContentPart> for Map<String, Value> {
    fn from(part: ContentPart) -> Self {
        let mut map = Map::new();
        match part {
            ContentPart::Text { text } => {
                map.insert("type".to_string(), Value::from("text"));
                map.insert("text".to_string(), Value::from(text));
            }
            ContentPart::Image { source } => {
                map.insert("type".to_string(), Value::from("image"));
                let mut fields = source.extra;
                fields.insert("type".to_string(), Value::from(source.source_type));
                fields.insert("media_type".to_string(), Value::from(source.media_type));
                fields.insert("data".to_string(), Value::from(source.data));
                map.insert("source".to_string(), Value::Object(fields));
            }
            ContentPart::ToolUse { id, name, input } => {
                map.insert("type".to_string(), Value::from("tool_use"));
                if let Some(id) = id {
                    map.insert("id".to_string(), Value::from(id));
                }
                map.insert("name".to_string(), Value::from(name));
                map.insert("input".to_string(), input);
            }
            ContentPart::Other(other) => return other,
        }
        map
    }
}

impl Serialize for ContentPart {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Map::from(self.clone()).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, Value>::deserialize(deserializer).map(ContentPart::from)
    }
}

/// Content of a message - a plain string or a list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// Plain text content
    Text(String),
    /// Structured content parts (for multimodal support)
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Join every text part with `\n`, ignoring non-text parts
    pub fn joined_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Parts(parts) => parts
                .iter()
                .filter_map(ContentPart::as_text)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// View the content as a list of parts, promoting plain text to one part
    pub fn to_parts(&self) -> Vec<ContentPart> {
        match self {
            Self::Text(text) => vec![ContentPart::text(text.clone())],
            Self::Parts(parts) => parts.clone(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(parts: Vec<ContentPart>) -> Self {
        Self::Parts(parts)
    }
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl CanonicalMessage {
    /// Create a user message
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Canonical chat request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRequest {
    /// Model identifier requested by the client
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<CanonicalMessage>,

    /// Maximum tokens to generate
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,

    /// System prompt, either a string or a list of text blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<MessageContent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,

    /// Fields this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CanonicalRequest {
    /// Create a new request with the required fields
    pub fn new(model: impl Into<String>, messages: Vec<CanonicalMessage>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages,
            max_tokens,
            temperature: None,
            top_p: None,
            top_k: None,
            stream: None,
            system: None,
            stop_sequences: None,
            extra: Map::new(),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn with_system(mut self, system: impl Into<MessageContent>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_stop_sequences(mut self, stop: Vec<String>) -> Self {
        self.stop_sequences = Some(stop);
        self
    }

    /// Attach a field this crate does not model
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// System prompt flattened to plain text, if present and non-empty
    pub fn system_text(&self) -> Option<String> {
        self.system
            .as_ref()
            .map(|system| match system {
                MessageContent::Text(text) => text.clone(),
                MessageContent::Parts(parts) => parts
                    .iter()
                    .filter_map(ContentPart::as_text)
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            })
            .filter(|text| !text.is_empty())
    }
}

/// Reason generation stopped, normalized across providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
    ToolUse,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EndTurn => "end_turn",
            Self::MaxTokens => "max_tokens",
            Self::StopSequence => "stop_sequence",
            Self::ToolUse => "tool_use",
        }
    }

    /// Parse a canonical reason name
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "end_turn" => Some(Self::EndTurn),
            "max_tokens" => Some(Self::MaxTokens),
            "stop_sequence" => Some(Self::StopSequence),
            "tool_use" => Some(Self::ToolUse),
            _ => None,
        }
    }
}

/// Unknown reasons (`refusal`, `pause_turn`, ...) and non-string values read as `None`
fn lenient_stop_reason<'de, D>(deserializer: D) -> Result<Option<StopReason>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(StopReason::parse))
}

/// Token accounting
///
/// Counters this crate does not model (cache reads and writes) are kept in
/// `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub input_tokens: u64,
    #[serde(default)]
    pub output_tokens: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Usage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            extra: Map::new(),
        }
    }
}

/// Constant `type` tag of a canonical response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    #[default]
    Message,
}

/// Canonical chat response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResponse {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type", default)]
    pub message_type: MessageType,

    /// Always [`Role::Assistant`] for responses
    #[serde(default = "assistant_role")]
    pub role: Role,

    #[serde(default)]
    pub content: Vec<ContentPart>,

    #[serde(default)]
    pub model: String,

    /// `None` for a reason outside the canonical vocabulary
    #[serde(default, deserialize_with = "lenient_stop_reason")]
    pub stop_reason: Option<StopReason>,

    #[serde(default)]
    pub stop_sequence: Option<String>,

    #[serde(default)]
    pub usage: Usage,

    /// Fields this crate does not model, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn assistant_role() -> Role {
    Role::Assistant
}

impl CanonicalResponse {
    /// An assistant response with no content and no stop reason
    pub fn empty(id: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message_type: MessageType::Message,
            role: Role::Assistant,
            content: Vec::new(),
            model: model.into(),
            stop_reason: None,
            stop_sequence: None,
            usage: Usage::default(),
            extra: Map::new(),
        }
    }

    /// Read a response out of a parsed JSON body without cloning it
    pub fn deserialize_from(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Concatenated text of all text parts
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(ContentPart::as_text)
            .collect::<Vec<_>>()
            .concat()
    }
}
