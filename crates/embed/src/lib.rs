//! Embedding integration crate for faqdesk.
//!
//! This crate provides a provider-agnostic abstraction for turning text into
//! fixed-length dense vectors. The knowledge engine consumes it as an
//! injected capability; it never cares which backend produced the vector.
//!
//! # Providers
//! - **trigram**: deterministic local hashing provider (default, offline)
//! - **ollama**: local embedding model runtime over HTTP
//!
//! # Example
//! ```no_run
//! use faqdesk_embed::{create_provider, EmbeddingConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = create_provider(&EmbeddingConfig::default())?;
//! let vector = provider.embed("как настроить роутер").await?;
//! assert_eq!(vector.len(), provider.dimensions());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod provider;
pub mod providers;

// Re-export main types
pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
pub use providers::{OllamaProvider, TrigramProvider};
