//! Per-provider parameters of the OpenAI-style adapters
//!
//! Both providers share the wire format. What differs is captured here:
//! model table, `max_tokens` bounds, which sampling fields survive, whether
//! non-text content can be sent, and the configuration conventions.

use crate::config::ProviderConventions;
use crate::providers::support::ModelMap;

/// Registry name of the multimodal OpenAI adapter
pub const OPENAI: &str = "openai";

/// Registry name of the text-only DeepSeek adapter
pub const DEEPSEEK: &str = "deepseek";

/// Constraints of one OpenAI-style provider
#[derive(Debug, Clone, Copy)]
pub struct OpenAiProfile {
    pub name: &'static str,
    pub models: ModelMap,
    /// Whether image parts can be sent
    pub multimodal: bool,
    /// Lower bound applied to `max_tokens`
    pub max_tokens_floor: u32,
    /// Upper bound applied to `max_tokens`, if any
    pub max_tokens_ceiling: Option<u32>,
    /// Whether `temperature` is forwarded
    pub forwards_temperature: bool,
    pub default_base_url: &'static str,
    pub default_timeout_ms: u64,
    pub conventions: ProviderConventions,
}

impl OpenAiProfile {
    /// Apply the `max_tokens` bounds
    pub fn bound_max_tokens(&self, requested: u32) -> u32 {
        let floored = requested.max(self.max_tokens_floor);
        match self.max_tokens_ceiling {
            Some(ceiling) => floored.min(ceiling),
            None => floored,
        }
    }
}

/// OpenAI: multimodal, no ceiling on `max_tokens`
pub const OPENAI_PROFILE: OpenAiProfile = OpenAiProfile {
    name: OPENAI,
    models: ModelMap::new(
        &[
            ("claude-3-5-sonnet-20241022", "gpt-4o"),
            ("claude-3-5-sonnet-latest", "gpt-4o"),
            ("claude-3-7-sonnet-20250219", "gpt-4.1"),
            ("claude-3-opus-20240229", "gpt-4-turbo"),
            ("claude-3-5-haiku-20241022", "gpt-4o-mini"),
            ("claude-3-haiku-20240307", "gpt-4o-mini"),
        ],
        "gpt-4o-mini",
    ),
    multimodal: true,
    max_tokens_floor: 1,
    max_tokens_ceiling: None,
    forwards_temperature: true,
    default_base_url: "https://api.openai.com/v1",
    default_timeout_ms: 60_000,
    conventions: ProviderConventions {
        url_marker: Some("openai.com"),
        key_prefix: Some("sk-"),
    },
};

/// DeepSeek: text only, `max_tokens` capped at 4096, sampling temperature
/// not forwarded (the reasoning model rejects it)
pub const DEEPSEEK_PROFILE: OpenAiProfile = OpenAiProfile {
    name: DEEPSEEK,
    models: ModelMap::new(
        &[
            ("claude-3-5-sonnet-20241022", "deepseek-chat"),
            ("claude-3-5-sonnet-latest", "deepseek-chat"),
            ("claude-3-5-haiku-20241022", "deepseek-chat"),
            ("claude-3-haiku-20240307", "deepseek-chat"),
            ("claude-3-7-sonnet-20250219", "deepseek-reasoner"),
            ("claude-3-opus-20240229", "deepseek-reasoner"),
        ],
        "deepseek-chat",
    ),
    multimodal: false,
    max_tokens_floor: 1,
    max_tokens_ceiling: Some(4096),
    forwards_temperature: false,
    default_base_url: "https://api.deepseek.com/v1",
    default_timeout_ms: 120_000,
    conventions: ProviderConventions {
        url_marker: Some("deepseek.com"),
        key_prefix: Some("sk-"),
    },
};
