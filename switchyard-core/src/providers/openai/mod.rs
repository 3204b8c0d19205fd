//! OpenAI-style adapters
//!
//! One implementation serves every provider with the `/chat/completions`
//! wire shape. Provider differences live in an [`OpenAiProfile`]; `openai`
//! and `deepseek` are built in.

pub mod converter;
mod profile;
mod streaming;
mod transformer;
pub mod types;

pub use profile::{OpenAiProfile, DEEPSEEK, DEEPSEEK_PROFILE, OPENAI, OPENAI_PROFILE};
pub use streaming::reframe_line;
pub use transformer::OpenAiCompatTransformer;
pub use types::{ChatCompletionRequest, ChatContent, ChatContentPart, ChatMessage};
