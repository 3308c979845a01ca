use std::sync::atomic::{AtomicU64, Ordering};

/// 访问计数
#[derive(Debug, Default)]
pub struct VisitCounter {
    today: AtomicU64,
    total: AtomicU64,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次访问，返回今日访问数
    pub fn record(&self) -> u64 {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.today.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn today(&self) -> u64 {
        self.today.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    /// 取出今日访问数并清零
    pub fn take_daily(&self) -> u64 {
        self.today.swap(0, Ordering::Relaxed)
    }
}
