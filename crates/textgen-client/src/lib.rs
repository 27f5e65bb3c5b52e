//! `textgen-client` — the upstream side of goalsmith.
//!
//! Wraps the external text-generation providers behind the
//! [`goalsmith_core::TextGen`] trait: a primary chat-completions API and a
//! fallback inference endpoint, composed as an ordered chain of attempts.
//! Failure here is always soft; the normalizer downstream is built for it.

pub mod chain;
pub mod config;
pub mod huggingface;
pub mod mistral;

pub use chain::ProviderChain;
pub use config::ProviderConfig;
pub use huggingface::HuggingFaceClient;
pub use mistral::MistralClient;
