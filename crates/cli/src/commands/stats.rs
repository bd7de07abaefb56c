//! Stats command handler.

use clap::Args;
use faqdesk_core::{config::AppConfig, AppResult};

/// Show knowledge base statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// List every entry's question with its zero-based position
    #[arg(long)]
    pub entries: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let service = super::build_service(config)?;
        service.load().await;

        let stats = service.stats().await;
        let questions = if self.entries {
            Some(service.questions().await)
        } else {
            None
        };

        if self.json {
            let mut output = serde_json::to_value(&stats)?;
            if let Some(questions) = &questions {
                output["questions"] = serde_json::json!(questions);
            }
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Entries: {}", stats.entries);
            println!("Vectors: {}", stats.vectors);
            println!("Loaded: {}", stats.loaded);
            if let Some(tag) = &stats.snapshot_tag {
                println!("Snapshot tag: {}", tag);
            }
            if let Some(questions) = &questions {
                for (position, question) in questions.iter().enumerate() {
                    println!("{:4}  {}", position, question);
                }
            }
        }

        Ok(())
    }
}
