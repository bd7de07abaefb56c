//! Refresh command handler.

use clap::Args;
use faqdesk_core::{config::AppConfig, AppResult};

/// Rebuild the knowledge base from the source of truth
#[derive(Args, Debug)]
pub struct RefreshCommand {
    /// Only refresh when the source changed since the last snapshot
    #[arg(long)]
    pub if_stale: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl RefreshCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing refresh command (if_stale: {})", self.if_stale);

        let service = super::build_service(config)?;

        let refreshed = if self.if_stale {
            let refreshed = service.refresh_if_stale().await;
            if !refreshed {
                // A skipped refresh leaves the service unloaded; load the
                // kept snapshot so the reported entry count is real
                service.load().await;
            }
            refreshed
        } else {
            service.refresh().await;
            true
        };

        let stats = service.stats().await;
        if self.json {
            let output = serde_json::json!({
                "refreshed": refreshed,
                "entries": stats.entries,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if refreshed {
            println!("Refreshed: {} entries", stats.entries);
        } else {
            println!("Source unchanged, snapshot kept ({} entries)", stats.entries);
        }

        Ok(())
    }
}
