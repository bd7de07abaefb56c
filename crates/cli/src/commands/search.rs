//! Search command handler.

use clap::Args;
use faqdesk_core::{config::AppConfig, AppError, AppResult};
use faqdesk_knowledge::SearchOutcome;
use faqdesk_prompt::{build_prompt, load_persona};

/// Search the knowledge base
#[derive(Args, Debug)]
pub struct SearchCommand {
    /// Query text
    pub query: String,

    /// Print the assembled system prompt instead of raw results
    #[arg(long)]
    pub prompt: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing search command: {:?}", self.query);

        let service = super::build_service(config)?;
        service.load().await;

        let outcome = service.search(&self.query).await?;

        if self.prompt {
            let persona = load_persona(&config.workspace)?;
            let built = build_prompt(&persona, &self.query, outcome.entries())?;

            if self.json {
                println!("{}", serde_json::to_string_pretty(&built)?);
            } else {
                println!("{}", built.system);
            }
            return Ok(());
        }

        match &outcome {
            SearchOutcome::Found(entries) => {
                if self.json {
                    let output = serde_json::json!({
                        "query": self.query,
                        "results": entries,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                } else {
                    for (i, entry) in entries.iter().enumerate() {
                        println!("{}. {} (score {:.2})", i + 1, entry.question, entry.score);
                        println!("   {}", entry.answer);
                        if !entry.matched_keywords.is_empty() {
                            println!("   keywords: {}", entry.matched_keywords.join(", "));
                        }
                    }
                }
                Ok(())
            }
            SearchOutcome::NoMatch => {
                if self.json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&serde_json::json!({
                            "query": self.query,
                            "results": [],
                        }))?
                    );
                } else {
                    println!("No relevant entries found. Try rephrasing the query.");
                }
                Ok(())
            }
            SearchOutcome::Unavailable => Err(AppError::Source(
                "Knowledge base is unavailable; check the record source and retry".to_string(),
            )),
        }
    }
}
