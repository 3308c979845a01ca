use crate::session::{Session, SessionId};
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// 会话存储
///
/// 每个会话有自己的锁：同一会话的猜测串行执行，不同会话互不影响。
/// 会话只保存在进程内存中，重启后全部丢失。
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, Arc<Mutex<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// 保存会话，返回会话ID
    pub fn insert(&self, session: Session) -> SessionId {
        let id = session.id().to_string();
        self.sessions
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    /// 获取会话句柄；返回时已释放 map 的分片锁
    pub fn get(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// 清理闲置超过 `ttl` 的会话，返回清理数量
    ///
    /// 正在处理猜测（锁被占用）的会话跳过。
    pub fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let before = self.sessions.len();

        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(session) => !session.is_idle(ttl, now),
            Err(_) => true,
        });

        before.saturating_sub(self.sessions.len())
    }
}
