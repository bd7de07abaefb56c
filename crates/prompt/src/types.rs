//! Prompt domain types.

use serde::{Deserialize, Serialize};

/// The assistant persona injected into the system prompt.
///
/// Loaded from `.faqdesk/persona.yaml`; every field has a usable default so
/// a fresh workspace works without any persona file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    /// Display name the assistant refers to itself by
    #[serde(default = "default_name")]
    pub name: String,

    /// One-line role description
    #[serde(default = "default_role")]
    pub role: String,

    /// What the assistant is trying to achieve
    #[serde(default = "default_goal")]
    pub goal: String,

    /// Behavioral rules, rendered as a bullet list
    #[serde(default = "default_behavior")]
    pub behavior: Vec<String>,

    /// Hard restrictions, rendered as a bullet list
    #[serde(default = "default_restrictions")]
    pub restrictions: Vec<String>,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: default_name(),
            role: default_role(),
            goal: default_goal(),
            behavior: default_behavior(),
            restrictions: default_restrictions(),
        }
    }
}

fn default_name() -> String {
    "Помощник".to_string()
}

fn default_role() -> String {
    "виртуальный помощник службы поддержки".to_string()
}

fn default_goal() -> String {
    "помогать сотрудникам находить ответы на вопросы по базе знаний".to_string()
}

fn default_behavior() -> Vec<String> {
    vec![
        "Всегда отвечать только на русском языке".to_string(),
        "Отвечать вежливо, кратко и по делу".to_string(),
        "Если ответа нет в базе знаний, честно сообщать об этом".to_string(),
        "Если запрос неясен, просить уточнить".to_string(),
    ]
}

fn default_restrictions() -> Vec<String> {
    vec![
        "Не выдумывать факты, отсутствующие в базе знаний".to_string(),
        "Не давать медицинских и юридических советов".to_string(),
    ]
}

/// A fully assembled prompt pair, ready to hand to a chat model.
#[derive(Debug, Clone, Serialize)]
pub struct BuiltPrompt {
    /// System message carrying the persona and the knowledge context
    pub system: String,

    /// User message (the original query, untouched)
    pub user: String,

    /// Whether a knowledge context block was injected
    #[serde(rename = "contextIncluded")]
    pub context_included: bool,
}
