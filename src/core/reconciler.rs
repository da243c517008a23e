use crate::core::merge::{is_eligible, merge_snapshot};
use crate::core::{Campaign, ReconcileReport, StatFetchFailure, StatsFetcher};
use crate::utils::error::SyncError;
use futures::future::join_all;

/// 並行刷新 campaign 投遞統計並合併回原清單
pub struct Reconciler<F: StatsFetcher> {
    fetcher: F,
}

impl<F: StatsFetcher> Reconciler<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// 對整批 campaign 執行一次對帳
    ///
    /// 每個符合條件的 campaign 同時發出一次統計請求，全部結束後才回傳。
    /// 輸出順序與輸入一致；單一請求失敗只保留該筆原紀錄。
    pub async fn reconcile(&self, campaigns: Vec<Campaign>) -> ReconcileReport {
        let eligible = campaigns.iter().filter(|c| is_eligible(c)).count();
        tracing::debug!(
            "🔄 Reconciling {} campaigns ({} eligible, {} pass-through)",
            campaigns.len(),
            eligible,
            campaigns.len() - eligible
        );

        let outcomes = join_all(campaigns.into_iter().map(|c| self.refresh_one(c))).await;

        let mut merged = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (campaign, failure) in outcomes {
            merged.push(campaign);
            failures.extend(failure);
        }

        if !failures.is_empty() {
            tracing::warn!(
                "⚠️ {} of {} stat fetches failed; previous numbers kept for those campaigns",
                failures.len(),
                eligible
            );
        }

        ReconcileReport {
            campaigns: merged,
            failures,
        }
    }

    async fn refresh_one(&self, campaign: Campaign) -> (Campaign, Option<StatFetchFailure>) {
        if !is_eligible(&campaign) {
            return (campaign, None);
        }

        match self.fetcher.get_campaign_stats(&campaign.id).await {
            Ok(snapshot) => {
                tracing::debug!(
                    "📡 {}: sent={} failed={} audience={}",
                    campaign.id,
                    snapshot.sent,
                    snapshot.failed,
                    snapshot.audience_size
                );
                (merge_snapshot(campaign, &snapshot), None)
            }
            Err(e) => {
                let message = match e {
                    SyncError::StatFetch { message, .. } => message,
                    other => other.to_string(),
                };
                tracing::warn!(
                    campaign_id = %campaign.id,
                    "Error fetching stats for campaign {}: {}",
                    campaign.id,
                    message
                );
                let failure = StatFetchFailure {
                    campaign_id: campaign.id.clone(),
                    message,
                };
                (campaign, Some(failure))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CampaignId, CampaignStatus, DeliveryStats, StatsSnapshot};
    use crate::utils::error::Result;
    use chrono::{TimeZone, Utc};
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    struct MockFetcher {
        snapshots: HashMap<String, StatsSnapshot>,
        delays_ms: HashMap<String, u64>,
        calls: AtomicUsize,
    }

    impl MockFetcher {
        fn new() -> Self {
            Self {
                snapshots: HashMap::new(),
                delays_ms: HashMap::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn with(mut self, id: &str, sent: u64, failed: u64, audience_size: u64) -> Self {
            self.snapshots.insert(
                id.to_string(),
                StatsSnapshot {
                    sent,
                    failed,
                    audience_size,
                },
            );
            self
        }

        fn delayed(mut self, id: &str, ms: u64) -> Self {
            self.delays_ms.insert(id.to_string(), ms);
            self
        }
    }

    #[async_trait::async_trait]
    impl StatsFetcher for MockFetcher {
        async fn get_campaign_stats(&self, campaign_id: &CampaignId) -> Result<StatsSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(ms) = self.delays_ms.get(campaign_id.as_str()) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.snapshots
                .get(campaign_id.as_str())
                .copied()
                .ok_or_else(|| SyncError::stat_fetch(campaign_id.as_str(), "HTTP 404"))
        }
    }

    fn campaign(id: &str, status: CampaignStatus, audience_size: u64) -> Campaign {
        Campaign {
            id: CampaignId::new(id),
            name: format!("Campaign {}", id),
            description: None,
            status,
            audience_size,
            delivery_stats: DeliveryStats::default(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            extra: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn test_pass_through_campaigns_are_not_fetched() {
        let fetcher = Arc::new(MockFetcher::new());
        let reconciler = Reconciler::new(fetcher.clone());
        let input = vec![
            campaign("draft", CampaignStatus::Draft, 0),
            campaign("cancelled", CampaignStatus::Cancelled, 0),
        ];

        let report = reconciler.reconcile(input.clone()).await;

        assert_eq!(report.campaigns, input);
        assert!(report.failures.is_empty());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_order_preserved_when_fetches_finish_out_of_order() {
        let fetcher = MockFetcher::new()
            .with("a", 1, 0, 10)
            .with("b", 2, 0, 10)
            .with("c", 3, 0, 10)
            .delayed("a", 60)
            .delayed("b", 30);
        let reconciler = Reconciler::new(fetcher);
        let input = vec![
            campaign("a", CampaignStatus::Active, 10),
            campaign("skip", CampaignStatus::Draft, 0),
            campaign("b", CampaignStatus::Active, 10),
            campaign("c", CampaignStatus::Active, 10),
        ];

        let report = reconciler.reconcile(input).await;

        let ids: Vec<&str> = report.campaigns.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "skip", "b", "c"]);
        assert_eq!(report.campaigns[0].delivery_stats.sent, 1);
        assert_eq!(report.campaigns[2].delivery_stats.sent, 2);
        assert_eq!(report.campaigns[3].delivery_stats.sent, 3);
    }

    #[tokio::test]
    async fn test_fetches_run_concurrently() {
        let fetcher = MockFetcher::new()
            .with("a", 1, 0, 10)
            .with("b", 1, 0, 10)
            .with("c", 1, 0, 10)
            .delayed("a", 200)
            .delayed("b", 200)
            .delayed("c", 200);
        let reconciler = Reconciler::new(fetcher);
        let input = vec![
            campaign("a", CampaignStatus::Active, 10),
            campaign("b", CampaignStatus::Active, 10),
            campaign("c", CampaignStatus::Active, 10),
        ];

        let started = std::time::Instant::now();
        reconciler.reconcile(input).await;

        assert!(started.elapsed() < Duration::from_millis(550));
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_attributed() {
        let fetcher = MockFetcher::new().with("a", 5, 1, 10).with("c", 7, 0, 10);
        let reconciler = Reconciler::new(fetcher);
        let input = vec![
            campaign("a", CampaignStatus::Active, 10),
            campaign("b", CampaignStatus::Active, 10),
            campaign("c", CampaignStatus::Active, 10),
        ];

        let report = reconciler.reconcile(input.clone()).await;

        assert_eq!(report.campaigns[0].delivery_stats.sent, 5);
        assert_eq!(report.campaigns[1], input[1]);
        assert_eq!(report.campaigns[2].delivery_stats.sent, 7);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].campaign_id, CampaignId::new("b"));
        assert_eq!(report.failures[0].message, "HTTP 404");
        assert!(!report.is_complete());
    }

    #[tokio::test]
    async fn test_completed_inferred_from_snapshot() {
        let fetcher = MockFetcher::new()
            .with("done", 80, 20, 100)
            .with("almost", 79, 20, 100);
        let reconciler = Reconciler::new(fetcher);

        let report = reconciler
            .reconcile(vec![
                campaign("done", CampaignStatus::Active, 100),
                campaign("almost", CampaignStatus::Active, 100),
            ])
            .await;

        assert_eq!(report.campaigns[0].status, CampaignStatus::Completed);
        assert_eq!(report.campaigns[1].status, CampaignStatus::Active);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let reconciler = Reconciler::new(MockFetcher::new());
        let report = reconciler.reconcile(Vec::new()).await;
        assert!(report.campaigns.is_empty());
        assert!(report.is_complete());
    }
}
