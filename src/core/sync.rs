use crate::core::lifecycle::LifecycleGuard;
use crate::core::reconciler::Reconciler;
use crate::core::{CampaignListSink, CampaignSource, StatsFetcher};
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    Published { campaigns: usize, failures: usize },
    /// 接收端已失效或被較新的 pass 取代，結果未發布
    Discarded,
    /// guard 不存活，pass 沒有開始
    NotStarted,
    /// 第二次 teardown 時 pass 仍未結束，直接放棄等待
    Abandoned,
}

/// 一次完整刷新：取清單、對帳、檢查存活、發布
pub struct CampaignSync<S: CampaignSource, F: StatsFetcher> {
    source: S,
    reconciler: Reconciler<F>,
    guard: Arc<LifecycleGuard>,
}

impl<S: CampaignSource, F: StatsFetcher> CampaignSync<S, F> {
    pub fn new(source: S, fetcher: F) -> Self {
        Self::with_guard(source, fetcher, Arc::new(LifecycleGuard::new()))
    }

    pub fn with_guard(source: S, fetcher: F, guard: Arc<LifecycleGuard>) -> Self {
        Self {
            source,
            reconciler: Reconciler::new(fetcher),
            guard,
        }
    }

    /// 供接收端在自身生命週期邊界呼叫 `start()` / `invalidate()`
    pub fn guard(&self) -> Arc<LifecycleGuard> {
        Arc::clone(&self.guard)
    }

    pub async fn refresh<K: CampaignListSink + ?Sized>(&self, sink: &K) -> Result<PassOutcome> {
        let Some(pass) = self.guard.begin_pass() else {
            tracing::debug!("Consumer is not live; skipping refresh");
            return Ok(PassOutcome::NotStarted);
        };
        tracing::info!("🚀 Starting campaign refresh (pass {})", pass.generation());

        let campaigns = match self.source.get_campaigns().await {
            Ok(campaigns) => campaigns,
            Err(e) => {
                tracing::error!("❌ Error fetching campaigns: {}", e);
                if self.guard.accepts(&pass) {
                    sink.publish_error(&e);
                }
                return Err(e);
            }
        };
        tracing::info!("📥 Fetched {} campaigns", campaigns.len());

        let report = if campaigns.is_empty() {
            crate::core::ReconcileReport {
                campaigns,
                failures: Vec::new(),
            }
        } else {
            if self.guard.accepts(&pass) {
                sink.stats_loading(true);
            }
            self.reconciler.reconcile(campaigns).await
        };

        if !self.guard.accepts(&pass) {
            tracing::info!(
                "🗑️ Discarding results of pass {} (consumer gone or superseded)",
                pass.generation()
            );
            return Ok(PassOutcome::Discarded);
        }

        let outcome = PassOutcome::Published {
            campaigns: report.campaigns.len(),
            failures: report.failures.len(),
        };
        sink.publish(report);
        sink.stats_loading(false);
        tracing::info!("✅ Pass {} published: {:?}", pass.generation(), outcome);

        Ok(outcome)
    }

    /// 與 `teardown` 競速的 refresh
    ///
    /// 第一次 teardown 使 guard 失效，之後只等待 pass 收尾（結果不會發布）；
    /// pass 卡在抓取時，第二次 teardown 直接放棄並回傳 [`PassOutcome::Abandoned`]。
    pub async fn refresh_until<K, T, Fut>(&self, sink: &K, mut teardown: T) -> Result<PassOutcome>
    where
        K: CampaignListSink + ?Sized,
        T: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let pass = self.refresh(sink);
        tokio::pin!(pass);

        tokio::select! {
            result = &mut pass => return result,
            _ = teardown() => {
                tracing::warn!("🛑 Teardown requested; pending results will be dropped");
                self.guard.invalidate();
            }
        }

        tokio::select! {
            result = &mut pass => result,
            _ = teardown() => {
                tracing::warn!("🛑 Teardown requested again; abandoning the running pass");
                Ok(PassOutcome::Abandoned)
            }
        }
    }
}
