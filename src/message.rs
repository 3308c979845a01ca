use crate::scoring::Feedback;
use crate::session::{Mode, SessionId};
use crate::word::{WORD_LENGTH, Word};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    #[serde(default)]
    pub mode: Option<String>,
}

/// 创建会话的结果
///
/// `gameId` 与 `sessionId` 相同，供旧版前端读取。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTicket {
    pub session_id: SessionId,
    pub game_id: SessionId,
    pub mode: Mode,
}

impl SessionTicket {
    pub fn new(session_id: SessionId, mode: Mode) -> Self {
        SessionTicket {
            game_id: session_id.clone(),
            session_id,
            mode,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRequest {
    #[serde(alias = "gameId")]
    pub session_id: SessionId,
    /// 保留原始JSON值：缺失或非字符串的猜测由业务层报 `InvalidGuess`
    #[serde(default)]
    pub guess: serde_json::Value,
}

/// 单个面板对一次猜测的结果
///
/// 已经猜中的面板没有 `feedback`，前端应跳过它的动画。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<[Feedback; WORD_LENGTH]>,
    pub solved: bool,
}

impl BoardResult {
    pub fn frozen() -> Self {
        BoardResult {
            feedback: None,
            solved: true,
        }
    }

    pub fn scored(feedback: [Feedback; WORD_LENGTH], solved: bool) -> Self {
        BoardResult {
            feedback: Some(feedback),
            solved,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessOutcome {
    pub results: Vec<BoardResult>,
    pub game_over: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// 总是附带答案，方便调用方在次数用完时直接揭晓
    pub solution: Vec<Word>,
    pub attempts: u32,
    pub max_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub retryable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub visits_today: u64,
    pub active_sessions: usize,
    pub pool_size: usize,
}
