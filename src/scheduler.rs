//! 后台定时任务
//!
//! 这些任务与会话生命周期无关，只操作词库、访问计数和会话存储。

use crate::analytics::VisitCounter;
use crate::store::SessionStore;
use crate::word_bank::WordBank;
use chrono::{DateTime, Days, Local, TimeZone};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// 距离下一个本地零点的时长
pub fn until_next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Duration {
    let tomorrow = now.date_naive().checked_add_days(Days::new(1));
    let next = tomorrow
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| now.timezone().from_local_datetime(&naive).earliest());

    match next {
        Some(next) => next
            .signed_duration_since(now.clone())
            .to_std()
            .unwrap_or(Duration::from_secs(1)),
        // 零点不存在（夏令时切换）时一小时后再算
        None => Duration::from_secs(3600),
    }
}

/// 每天零点刷新词池，并记录当天的访问数
pub fn spawn_daily_rotation(word_bank: Arc<WordBank>, visits: Arc<VisitCounter>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_midnight(&Local::now());
            debug!("距离下次词池刷新还有 {:?}", wait);
            tokio::time::sleep(wait).await;

            info!("零点到了, 刷新词池");
            let size = word_bank.refresh();
            if size == 0 {
                warn!("刷新后词池为空, 新会话将无法创建");
            }

            let daily = visits.take_daily();
            info!("昨日访问统计: {} 次 (累计 {} 次)", daily, visits.total());
        }
    })
}

/// 定期清理闲置会话
pub fn spawn_session_sweeper(
    store: Arc<SessionStore>,
    ttl: Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(ttl);
            if evicted > 0 {
                info!("清理闲置会话 {} 个, 剩余 {} 个", evicted, store.len());
            }
        }
    })
}
