//! Faqdesk Core Library
//!
//! This crate provides the foundational utilities shared by the faqdesk
//! workspace:
//! - Error handling (`AppError`, `AppResult`)
//! - Logging infrastructure
//! - Configuration management (search tunables, cache layout, provider
//!   selection)

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{AppConfig, SearchConfig};
pub use error::{AppError, AppResult};
