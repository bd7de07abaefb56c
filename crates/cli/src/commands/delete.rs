//! Delete command handler.

use clap::Args;
use faqdesk_core::{config::AppConfig, AppError, AppResult};

/// Delete an entry by position
#[derive(Args, Debug)]
pub struct DeleteCommand {
    /// Zero-based entry position (see `faqdesk stats --entries`)
    pub position: usize,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl DeleteCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing delete command: position {}", self.position);

        let service = super::build_service(config)?;
        service.load().await;

        if !service.delete(self.position).await {
            return Err(AppError::Other(format!(
                "Entry {} was not deleted; see the log for the reason",
                self.position
            )));
        }

        let stats = service.stats().await;
        if self.json {
            let output = serde_json::json!({
                "position": self.position,
                "entries": stats.entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Deleted entry {} ({} entries remaining)",
                self.position, stats.entries
            );
        }

        Ok(())
    }
}
