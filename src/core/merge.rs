use crate::core::{Campaign, CampaignStatus, DeliveryStats, StatsSnapshot};

/// 是否需要刷新統計：進行中的 campaign，或已有目標受眾的 campaign
pub fn is_eligible(campaign: &Campaign) -> bool {
    campaign.status == CampaignStatus::Active || campaign.audience_size > 0
}

/// 快照顯示已處理完整個受眾
pub fn is_completed(snapshot: &StatsSnapshot) -> bool {
    snapshot.audience_size > 0 && snapshot.total_processed() >= snapshot.audience_size
}

/// 將快照合併回 campaign
///
/// 只覆寫 `delivery_stats`、`audience_size`，以及在 active 且已完成時把
/// `status` 改為 completed。其餘欄位維持原值。
pub fn merge_snapshot(campaign: Campaign, snapshot: &StatsSnapshot) -> Campaign {
    let status = if campaign.status == CampaignStatus::Active && is_completed(snapshot) {
        CampaignStatus::Completed
    } else {
        campaign.status
    };

    Campaign {
        delivery_stats: DeliveryStats {
            sent: snapshot.sent,
            failed: snapshot.failed,
        },
        audience_size: snapshot.audience_size,
        status,
        ..campaign
    }
}
