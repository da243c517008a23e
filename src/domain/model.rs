use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignId(String);

impl CampaignId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CampaignId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CampaignId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Completed,
    Cancelled,
}

impl CampaignStatus {
    pub const ALL: [CampaignStatus; 4] = [
        CampaignStatus::Draft,
        CampaignStatus::Active,
        CampaignStatus::Completed,
        CampaignStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Completed => "completed",
            CampaignStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStats {
    pub sent: u64,
    pub failed: u64,
}

impl DeliveryStats {
    pub fn total_processed(&self) -> u64 {
        self.sent.saturating_add(self.failed)
    }
}

/// Campaign 記錄
///
/// 只有 `delivery_stats`、`audience_size` 與 `status` 會被對帳流程改寫；
/// 其餘欄位（包含 `extra` 內未知的欄位）原樣保留。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(rename = "_id")]
    pub id: CampaignId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub audience_size: u64,
    #[serde(default)]
    pub delivery_stats: DeliveryStats,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Campaign {
    pub fn total_processed(&self) -> u64 {
        self.delivery_stats.total_processed()
    }

    /// 投遞進度百分比，audience 為 0 時回傳 0
    pub fn delivery_progress(&self) -> f64 {
        if self.audience_size == 0 {
            return 0.0;
        }
        self.total_processed() as f64 / self.audience_size as f64 * 100.0
    }

    /// 成功率（四捨五入到整數百分比）
    pub fn success_rate(&self) -> u32 {
        let total = self.total_processed();
        if total == 0 {
            return 0;
        }
        (self.delivery_stats.sent as f64 / total as f64 * 100.0).round() as u32
    }
}

/// 外部統計來源在抓取當下的快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub sent: u64,
    pub failed: u64,
    pub audience_size: u64,
}

impl StatsSnapshot {
    pub fn total_processed(&self) -> u64 {
        self.sent.saturating_add(self.failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatFetchFailure {
    pub campaign_id: CampaignId,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconcileReport {
    pub campaigns: Vec<Campaign>,
    pub failures: Vec<StatFetchFailure>,
}

impl ReconcileReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub total_campaigns: usize,
    pub by_status: BTreeMap<String, usize>,
    pub total_audience: u64,
    pub total_sent: u64,
    pub total_failed: u64,
}

impl CampaignSummary {
    pub fn from_campaigns(campaigns: &[Campaign]) -> Self {
        let mut summary = CampaignSummary {
            total_campaigns: campaigns.len(),
            ..Default::default()
        };
        for status in CampaignStatus::ALL {
            summary.by_status.insert(status.to_string(), 0);
        }

        for campaign in campaigns {
            *summary
                .by_status
                .entry(campaign.status.to_string())
                .or_insert(0) += 1;
            summary.total_audience += campaign.audience_size;
            summary.total_sent += campaign.delivery_stats.sent;
            summary.total_failed += campaign.delivery_stats.failed;
        }

        summary
    }
}
