//! Provider configuration and factory.
//!
//! Credentials come from the environment: the server never crashes over a
//! missing key. A provider built without one fails authentication at request
//! time, which the tutor gateway degrades to its per-operation fallbacks.

use std::sync::Arc;

use bacprep_core::traits::ChatModel;

use crate::openai::OpenAiProvider;

/// Environment variable holding the text-generation service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Optional override for the service base URL (testing, proxies).
pub const BASE_URL_ENV: &str = "BACPREP_OPENAI_BASE_URL";
/// Optional override for the model id.
pub const MODEL_ENV: &str = "BACPREP_MODEL";

/// Configuration for the text-generation provider.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure
/// in logs.
#[derive(Clone, Default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl ProviderConfig {
    /// Read the provider configuration from the environment.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            base_url: std::env::var(BASE_URL_ENV).ok().filter(|u| !u.is_empty()),
            model: std::env::var(MODEL_ENV).ok().filter(|m| !m.is_empty()),
        }
    }
}

/// Build the chat backend from its configuration.
pub fn create_model(config: &ProviderConfig) -> Arc<dyn ChatModel> {
    let api_key = match &config.api_key {
        Some(key) => key.clone(),
        None => {
            tracing::warn!(
                "no {API_KEY_ENV} set; AI operations will degrade to their fallback behavior"
            );
            String::new()
        }
    };

    Arc::new(OpenAiProvider::new(
        &api_key,
        config.base_url.clone(),
        config.model.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_masks_the_key() {
        let config = ProviderConfig {
            api_key: Some("sk-secret".into()),
            base_url: None,
            model: Some("gpt-4o".into()),
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn missing_key_still_builds_a_model() {
        let config = ProviderConfig::default();
        let model = create_model(&config);
        assert_eq!(model.name(), "openai");
    }

    #[test]
    fn from_env_ignores_empty_values() {
        std::env::set_var(API_KEY_ENV, "");
        std::env::set_var(MODEL_ENV, "gpt-4o-mini");
        let config = ProviderConfig::from_env();
        // An empty key behaves like an unset one.
        assert!(config.api_key.is_none());
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        std::env::remove_var(API_KEY_ENV);
        std::env::remove_var(MODEL_ENV);
    }
}
