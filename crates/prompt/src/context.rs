//! Knowledge context block rendering.

use faqdesk_knowledge::ScoredEntry;

/// Render ranked entries as a numbered context block.
///
/// Format, one block per entry:
///
/// ```text
/// Запись 1:
/// Вопрос: ...
/// Ответ: ...
/// ```
///
/// Entries arrive already truncated to the answer preview length; this
/// renders them as-is. An empty slice renders as an empty string.
pub fn render_context(entries: &[ScoredEntry]) -> String {
    let mut context = String::new();
    for (i, entry) in entries.iter().enumerate() {
        context.push_str(&format!(
            "Запись {}:\nВопрос: {}\nОтвет: {}\n\n",
            i + 1,
            entry.question,
            entry.answer
        ));
    }
    context
}
