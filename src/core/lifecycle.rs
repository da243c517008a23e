use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

/// 追蹤結果接收端是否仍存活
///
/// 每個 pass 透過 [`LifecycleGuard::begin_pass`] 取得自己的 [`PassToken`]。
/// 發布前以 [`LifecycleGuard::accepts`] 再檢查一次：接收端已失效，或之後又
/// 開始了更新的 pass，結果都會被丟棄。進行中的請求不會被中斷。
#[derive(Debug)]
pub struct LifecycleGuard {
    root: Mutex<CancellationToken>,
    generation: AtomicU64,
}

/// 單一 pass 的存活憑證
#[derive(Debug, Clone)]
pub struct PassToken {
    generation: u64,
    token: CancellationToken,
}

impl PassToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl LifecycleGuard {
    /// 建立時即為存活狀態
    pub fn new() -> Self {
        Self {
            root: Mutex::new(CancellationToken::new()),
            generation: AtomicU64::new(0),
        }
    }

    fn root(&self) -> MutexGuard<'_, CancellationToken> {
        self.root.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_live(&self) -> bool {
        !self.root().is_cancelled()
    }

    /// 接收端重新掛載；已存活時不做任何事
    pub fn start(&self) {
        let mut root = self.root();
        if root.is_cancelled() {
            *root = CancellationToken::new();
            tracing::debug!("lifecycle guard restarted");
        }
    }

    /// 接收端卸載；所有進行中的 pass 結果都不再發布
    pub fn invalidate(&self) {
        self.root().cancel();
        tracing::debug!("lifecycle guard invalidated");
    }

    /// 開始新的 pass；不存活時回傳 `None`
    pub fn begin_pass(&self) -> Option<PassToken> {
        let root = self.root();
        if root.is_cancelled() {
            return None;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Some(PassToken {
            generation,
            token: root.child_token(),
        })
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// pass 仍存活且是最近一次開始的 pass
    pub fn accepts(&self, pass: &PassToken) -> bool {
        !pass.is_cancelled() && pass.generation == self.current_generation()
    }
}

impl Default for LifecycleGuard {
    fn default() -> Self {
        Self::new()
    }
}
