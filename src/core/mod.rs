pub mod lifecycle;
pub mod merge;
pub mod reconciler;
pub mod sync;

pub use crate::domain::model::{
    Campaign, CampaignId, CampaignStatus, CampaignSummary, DeliveryStats, ReconcileReport,
    StatFetchFailure, StatsSnapshot,
};
pub use crate::domain::ports::{CampaignListSink, CampaignSource, ConfigProvider, StatsFetcher};
pub use crate::utils::error::Result;
