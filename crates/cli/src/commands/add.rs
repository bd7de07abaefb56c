//! Add command handler.

use clap::Args;
use faqdesk_core::{config::AppConfig, AppError, AppResult};

/// Add a question/answer entry
#[derive(Args, Debug)]
pub struct AddCommand {
    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Comma-separated keywords
    #[arg(short, long, default_value = "")]
    pub keywords: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AddCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing add command: {:?}", self.question);

        let service = super::build_service(config)?;
        service.load().await;

        if !service
            .append(&self.question, &self.keywords, &self.answer)
            .await
        {
            return Err(AppError::Other(
                "Entry was not added; see the log for the reason".to_string(),
            ));
        }

        let stats = service.stats().await;
        if self.json {
            let output = serde_json::json!({
                "question": self.question,
                "entries": stats.entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Added entry ({} entries total)", stats.entries);
        }

        Ok(())
    }
}
