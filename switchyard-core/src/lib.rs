//! Switchyard Core Library
//!
//! Adapters that let a client speaking one canonical chat protocol talk to
//! upstream LLM providers with different request, response, streaming and
//! error formats. Nothing here performs I/O: the HTTP layer calls the
//! adapters before sending and after receiving.
//!
//! ```
//! use switchyard_core::config::ProviderConfig;
//! use switchyard_core::protocol::{CanonicalMessage, CanonicalRequest};
//! use switchyard_core::providers::{Transformer, TransformerRegistry};
//!
//! let registry = TransformerRegistry::new();
//! let provider = ProviderConfig::new("ds", "deepseek", "https://api.deepseek.com/v1", "sk-xxxx")
//!     .with_transformer("deepseek");
//! let request = CanonicalRequest::new("claude-3-5-sonnet-20241022", vec![CanonicalMessage::user("hi")], 8192);
//!
//! let upstream = registry.resolve_for(&provider).transform_request(&request, &provider);
//! assert_eq!(upstream.upstream_model(), "deepseek-chat");
//! ```

pub mod config;
pub mod protocol;
pub mod providers;

pub use config::{ProviderConfig, ProviderDefaults};
pub use protocol::{CanonicalRequest, CanonicalResponse, ErrorEnvelope, ErrorKind};
pub use providers::{ProviderRequest, Transformer, TransformerRegistry, UpstreamError};

/// Returns the version of the Switchyard Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
