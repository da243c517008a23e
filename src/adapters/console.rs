use crate::core::{Campaign, CampaignListSink, CampaignSummary, ReconcileReport};
use crate::utils::error::SyncError;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// 將對帳結果輸出到 writer（預設 stdout）
pub struct ConsoleSink<W: Write + Send> {
    format: OutputFormat,
    out: Mutex<W>,
}

impl ConsoleSink<std::io::Stdout> {
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_output(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", text) {
            tracing::error!("Failed to write output: {}", e);
        }
    }
}

pub fn render_json(report: &ReconcileReport) -> Result<String, serde_json::Error> {
    let summary = CampaignSummary::from_campaigns(&report.campaigns);
    serde_json::to_string_pretty(&serde_json::json!({
        "campaigns": report.campaigns,
        "summary": summary,
        "failures": report.failures,
    }))
}

pub fn render_table(campaigns: &[Campaign]) -> String {
    if campaigns.is_empty() {
        return "No campaigns found".to_string();
    }

    let mut lines = vec![format!(
        "{:<28} {:<10} {:>9} {:>22} {:>8} {:<10}",
        "Campaign Name", "Status", "Audience", "Delivery Progress", "Success", "Created"
    )];
    for campaign in campaigns {
        let progress = format!(
            "{} of {} ({:.0}%)",
            campaign.total_processed(),
            campaign.audience_size,
            campaign.delivery_progress()
        );
        lines.push(format!(
            "{:<28} {:<10} {:>9} {:>22} {:>7}% {:<10}",
            truncate(&campaign.name, 28),
            campaign.status,
            campaign.audience_size,
            progress,
            campaign.success_rate(),
            campaign.created_at.format("%Y-%m-%d")
        ));
    }
    lines.join("\n")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

impl<W: Write + Send> CampaignListSink for ConsoleSink<W> {
    fn publish(&self, report: ReconcileReport) {
        for failure in &report.failures {
            tracing::warn!(
                "⚠️ Stats unavailable for {}: {}",
                failure.campaign_id,
                failure.message
            );
        }

        match self.format {
            OutputFormat::Json => match render_json(&report) {
                Ok(json) => self.write_output(&json),
                Err(e) => tracing::error!("Failed to serialize report: {}", e),
            },
            OutputFormat::Table => {
                let summary = CampaignSummary::from_campaigns(&report.campaigns);
                self.write_output(&render_table(&report.campaigns));
                self.write_output(&format!(
                    "\n{} campaigns, {} sent, {} failed",
                    summary.total_campaigns, summary.total_sent, summary.total_failed
                ));
            }
        }
    }

    fn publish_error(&self, error: &SyncError) {
        tracing::error!("❌ {}", error.user_friendly_message());
    }

    fn stats_loading(&self, loading: bool) {
        if loading {
            tracing::info!("⏳ Fetching latest campaign statistics...");
        }
    }
}
