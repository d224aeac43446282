//! LLM provider implementations for DocuForge.
//!
//! All providers implement the `docuforge_core::Provider` trait.
//! [`build_from_config`] assembles the provider the rest of the system uses.

pub mod fallback;
pub mod openai_compat;
pub mod router;

pub use fallback::FallbackProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
