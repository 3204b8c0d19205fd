//! Name to adapter lookup
//!
//! Resolution never fails: an unknown or missing transformer name resolves to
//! the passthrough adapter so a misconfigured provider still gets its
//! requests forwarded.

use std::sync::{Arc, OnceLock};

use dashmap::DashMap;

use crate::config::ProviderConfig;
use crate::providers::adapter::Transformer;
use crate::providers::gemini::GeminiTransformer;
use crate::providers::openai::OpenAiCompatTransformer;
use crate::providers::passthrough::{PassthroughTransformer, PASSTHROUGH};

/// Registered adapters, keyed by transformer name
///
/// Built-ins (`passthrough`, `openai`, `deepseek`, `gemini`) are installed on
/// first access. Share one registry between tasks with an `Arc`.
#[derive(Default)]
pub struct TransformerRegistry {
    transformers: DashMap<String, Arc<dyn Transformer>>,
    builtins: OnceLock<()>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_builtins(&self) {
        self.builtins.get_or_init(|| {
            let builtins: [Arc<dyn Transformer>; 4] = [
                Arc::new(PassthroughTransformer::new()),
                Arc::new(OpenAiCompatTransformer::openai()),
                Arc::new(OpenAiCompatTransformer::deepseek()),
                Arc::new(GeminiTransformer::new()),
            ];
            for transformer in builtins {
                self.transformers.insert(transformer.name().to_string(), transformer);
            }
        });
    }

    /// Adapter registered under `name`, or passthrough
    pub fn resolve(&self, name: Option<&str>) -> Arc<dyn Transformer> {
        self.ensure_builtins();

        let requested = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(found) = requested.and_then(|n| self.transformers.get(n)) {
            return Arc::clone(found.value());
        }

        match requested {
            Some(unknown) => {
                tracing::warn!(transformer = unknown, "unknown transformer, falling back to passthrough")
            }
            None => tracing::debug!("no transformer configured, using passthrough"),
        }
        self.passthrough()
    }

    /// Adapter for a provider's configured `transformer`
    pub fn resolve_for(&self, provider: &ProviderConfig) -> Arc<dyn Transformer> {
        self.resolve(provider.transformer.as_deref())
    }

    /// Register an adapter under `name`, replacing any existing one
    pub fn register(&self, name: impl Into<String>, transformer: Arc<dyn Transformer>) {
        self.ensure_builtins();
        let name = name.into();
        if self.transformers.insert(name.clone(), transformer).is_some() {
            tracing::warn!(transformer = %name, "replaced registered transformer");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ensure_builtins();
        self.transformers.contains_key(name)
    }

    /// Registered names, sorted
    pub fn list_names(&self) -> Vec<String> {
        self.ensure_builtins();
        let mut names: Vec<String> = self.transformers.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    fn passthrough(&self) -> Arc<dyn Transformer> {
        self.transformers
            .get(PASSTHROUGH)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| Arc::new(PassthroughTransformer::new()))
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerRegistry")
            .field("transformers", &self.list_names())
            .finish()
    }
}
