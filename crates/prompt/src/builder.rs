//! System prompt building from a persona and an optional knowledge context.

use crate::context::render_context;
use crate::types::{BuiltPrompt, Persona};
use faqdesk_core::{AppError, AppResult};
use faqdesk_knowledge::ScoredEntry;
use handlebars::Handlebars;
use serde::Serialize;

/// Handlebars source for the system prompt.
///
/// Tildes trim the whitespace the block helpers would otherwise leave behind,
/// so each rule renders as exactly one `- ` line.
const SYSTEM_TEMPLATE: &str = "\
Ты {{name}}, {{role}}. Твоя цель: {{goal}}.
Поведение:
{{#each behavior~}}
- {{this}}
{{/each~}}
Ограничения:
{{#each restrictions~}}
- {{this}}
{{/each~}}
{{#if context}}
Релевантные записи из базы знаний:
{{context}}
{{~/if}}";

#[derive(Serialize)]
struct TemplateData<'a> {
    name: &'a str,
    role: &'a str,
    goal: &'a str,
    behavior: &'a [String],
    restrictions: &'a [String],
    context: Option<&'a str>,
}

/// Render the system prompt for a persona, injecting the knowledge context
/// block when one is provided.
pub fn build_system_prompt(persona: &Persona, context: Option<&str>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Plain text output, no HTML escaping
    handlebars.register_escape_fn(handlebars::no_escape);
    handlebars
        .register_template_string("system", SYSTEM_TEMPLATE)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let data = TemplateData {
        name: &persona.name,
        role: &persona.role,
        goal: &persona.goal,
        behavior: &persona.behavior,
        restrictions: &persona.restrictions,
        context: context.filter(|c| !c.is_empty()),
    };

    handlebars
        .render("system", &data)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))
}

/// Assemble the full prompt pair for a query and its ranked entries.
///
/// The query passes through as the user message untouched; ranked entries
/// become the context block inside the system message. No entries means no
/// context block, so the model is told nothing rather than an empty section.
pub fn build_prompt(
    persona: &Persona,
    query: &str,
    entries: &[ScoredEntry],
) -> AppResult<BuiltPrompt> {
    let context = render_context(entries);
    let context_included = !context.is_empty();

    let system = build_system_prompt(
        persona,
        if context_included {
            Some(context.as_str())
        } else {
            None
        },
    )?;

    tracing::debug!(
        "Built prompt: {} context entries, system prompt {} chars",
        entries.len(),
        system.chars().count()
    );

    Ok(BuiltPrompt {
        system,
        user: query.to_string(),
        context_included,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(question: &str, answer: &str) -> ScoredEntry {
        ScoredEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            score: 0.9,
            matched_keywords: vec![],
            matched_question_words: vec![],
            matched_answer_words: vec![],
        }
    }

    #[test]
    fn test_system_prompt_lists_rules() {
        let persona = Persona::default();
        let system = build_system_prompt(&persona, None).unwrap();

        assert!(system.starts_with(&format!("Ты {},", persona.name)));
        assert!(system.contains("Поведение:"));
        assert!(system.contains("Ограничения:"));
        for rule in &persona.behavior {
            assert!(system.contains(&format!("- {}", rule)));
        }
        assert!(!system.contains("Релевантные записи"));
    }

    #[test]
    fn test_context_block_injected() {
        let persona = Persona::default();
        let system =
            build_system_prompt(&persona, Some("Запись 1:\nВопрос: В?\nОтвет: О.\n\n")).unwrap();

        assert!(system.contains("Релевантные записи из базы знаний:"));
        assert!(system.contains("Вопрос: В?"));
    }

    #[test]
    fn test_empty_context_omits_block() {
        let persona = Persona::default();
        let system = build_system_prompt(&persona, Some("")).unwrap();
        assert!(!system.contains("Релевантные записи"));
    }

    #[test]
    fn test_build_prompt_wires_context() {
        let persona = Persona::default();
        let built = build_prompt(
            &persona,
            "как вернуть товар",
            &[entry("Как вернуть товар?", "Обратитесь в магазин.")],
        )
        .unwrap();

        assert_eq!(built.user, "как вернуть товар");
        assert!(built.context_included);
        assert!(built.system.contains("Запись 1:"));
    }

    #[test]
    fn test_build_prompt_without_entries() {
        let persona = Persona::default();
        let built = build_prompt(&persona, "вопрос", &[]).unwrap();
        assert!(!built.context_included);
        assert!(!built.system.contains("Запись"));
    }
}
