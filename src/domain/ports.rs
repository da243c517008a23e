use crate::domain::model::{Campaign, CampaignId, ReconcileReport, StatsSnapshot};
use crate::utils::error::{Result, SyncError};
use async_trait::async_trait;
use std::sync::Arc;

/// 基礎 campaign 清單來源；失敗時整個 pass 中止
#[async_trait]
pub trait CampaignSource: Send + Sync {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>>;
}

/// 單一 campaign 的即時投遞統計來源
///
/// 不做重試也不設逾時，失敗應以 [`SyncError::StatFetch`] 帶回 campaign id。
#[async_trait]
pub trait StatsFetcher: Send + Sync {
    async fn get_campaign_stats(&self, campaign_id: &CampaignId) -> Result<StatsSnapshot>;
}

/// 對帳結果的接收端（通常是列表畫面）
pub trait CampaignListSink: Send + Sync {
    fn publish(&self, report: ReconcileReport);

    fn publish_error(&self, error: &SyncError);

    fn stats_loading(&self, _loading: bool) {}
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn api_token(&self) -> Option<&str>;
}

#[async_trait]
impl<T: CampaignSource + ?Sized> CampaignSource for Arc<T> {
    async fn get_campaigns(&self) -> Result<Vec<Campaign>> {
        (**self).get_campaigns().await
    }
}

#[async_trait]
impl<T: StatsFetcher + ?Sized> StatsFetcher for Arc<T> {
    async fn get_campaign_stats(&self, campaign_id: &CampaignId) -> Result<StatsSnapshot> {
        (**self).get_campaign_stats(campaign_id).await
    }
}

impl<T: CampaignListSink + ?Sized> CampaignListSink for Arc<T> {
    fn publish(&self, report: ReconcileReport) {
        (**self).publish(report)
    }

    fn publish_error(&self, error: &SyncError) {
        (**self).publish_error(error)
    }

    fn stats_loading(&self, loading: bool) {
        (**self).stats_loading(loading)
    }
}
