pub mod analytics;
pub mod config;
pub mod game;
pub mod message;
pub mod network;
pub mod scheduler;
pub mod scoring;
pub mod session;
pub mod store;
pub mod word;
pub mod word_bank;

pub use analytics::VisitCounter;
pub use config::Config;
pub use game::GameService;
pub use message::{BoardResult, GuessOutcome, SessionTicket};
pub use network::HttpServer;
pub use scoring::{Feedback, score};
pub use session::{Mode, Session};
pub use store::SessionStore;
pub use word::Word;
pub use word_bank::{WordBank, WordSupply};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("词库不足: 需要 {required} 个单词, 当前仅有 {available} 个")]
    SupplyUnavailable { required: usize, available: usize },
    #[error("抽取单词失败: 抽取 {draws} 次后仍凑不齐 {required} 个不同单词")]
    WordSelectionFailed { required: usize, draws: usize },
    #[error("会话不存在或已过期: {0}")]
    SessionNotFound(String),
    #[error("无效的猜测: {0}")]
    InvalidGuess(String),
    #[error("尝试次数已用完 (最多 {0} 次)")]
    AttemptsExhausted(u32),
    #[error("网络错误: {0}")]
    Network(#[from] anyhow::Error),
    #[error("存储错误: {0}")]
    Storage(String),
    #[error("配置错误: {0}")]
    Config(String),
}

impl Error {
    /// 给客户端区分错误类型用的机器可读代码
    pub fn code(&self) -> &'static str {
        match self {
            Error::SupplyUnavailable { .. } => "SupplyUnavailable",
            Error::WordSelectionFailed { .. } => "WordSelectionFailed",
            Error::SessionNotFound(_) => "SessionNotFound",
            Error::InvalidGuess(_) => "InvalidGuess",
            Error::AttemptsExhausted(_) => "AttemptsExhausted",
            Error::Network(_) => "NetworkError",
            Error::Storage(_) => "StorageError",
            Error::Config(_) => "ConfigError",
        }
    }

    /// 调用方稍后重试即可恢复的错误
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::SupplyUnavailable { .. } | Error::WordSelectionFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
