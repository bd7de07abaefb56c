//! Prompt assembly for faqdesk.
//!
//! Turns ranked knowledge entries into a context block and wraps it in a
//! persona-driven system prompt. This crate produces text only; it never
//! calls a model.

pub mod builder;
pub mod context;
pub mod loader;
pub mod types;

// Re-export main types
pub use builder::{build_prompt, build_system_prompt};
pub use context::render_context;
pub use loader::load_persona;
pub use types::{BuiltPrompt, Persona};
