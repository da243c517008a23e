pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{
    console::{ConsoleSink, OutputFormat},
    http::HttpCampaignApi,
};
pub use config::{toml_config::TomlConfig, SyncSettings};
pub use core::{
    lifecycle::{LifecycleGuard, PassToken},
    reconciler::Reconciler,
    sync::{CampaignSync, PassOutcome},
};
pub use domain::model::{
    Campaign, CampaignId, CampaignStatus, CampaignSummary, DeliveryStats, ReconcileReport,
    StatFetchFailure, StatsSnapshot,
};
pub use domain::ports::{CampaignListSink, CampaignSource, ConfigProvider, StatsFetcher};
pub use utils::error::{Result, SyncError};
