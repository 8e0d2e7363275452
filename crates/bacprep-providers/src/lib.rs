//! bacprep-providers — text-generation provider integrations.
//!
//! Implements the `ChatModel` trait for an OpenAI-compatible HTTP backend,
//! plus a scriptable mock for tests, and the env-based provider factory the
//! server boots from.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{create_model, ProviderConfig};
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
