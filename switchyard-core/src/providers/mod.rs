//! Provider adapters
//!
//! Every upstream family gets a [`Transformer`] that converts canonical
//! requests into its wire shape and converts replies, stream units and errors
//! back. [`TransformerRegistry`] picks the adapter named by a provider's
//! configuration.

pub mod adapter;
pub mod error;
pub mod gemini;
pub mod openai;
pub mod passthrough;
pub mod registry;
pub mod support;

pub use adapter::{ProviderRequest, Transformer, UpstreamError};
pub use error::{TransformError, TransformResult};
pub use gemini::{GeminiTransformer, GEMINI};
pub use openai::{OpenAiCompatTransformer, OpenAiProfile, DEEPSEEK, OPENAI};
pub use passthrough::{PassthroughTransformer, PASSTHROUGH};
pub use registry::TransformerRegistry;
pub use support::{transform_stream_body, ModelMap, DONE_FRAME};
