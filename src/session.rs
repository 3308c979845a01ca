use crate::message::BoardResult;
use crate::scoring::{is_perfect, score};
use crate::word::Word;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// 会话ID类型
pub type SessionId = String;

/// 游戏模式：决定同时猜几个单词
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Single,
    Dual,
    Quad,
}

impl Mode {
    /// 解析模式名称，无法识别时退回单词模式
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "dual" | "dueto" => Mode::Dual,
            "quad" | "quarteto" => Mode::Quad,
            _ => Mode::Single,
        }
    }

    pub fn board_count(self) -> usize {
        match self {
            Mode::Single => 1,
            Mode::Dual => 2,
            Mode::Quad => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Single => "single",
            Mode::Dual => "dual",
            Mode::Quad => "quad",
        }
    }

    /// 全部猜中时展示给玩家的消息
    pub fn victory_message(self) -> &'static str {
        match self {
            Mode::Single => "Parabéns! Você acertou!",
            Mode::Dual => "Incrível! Dupla vencida!",
            Mode::Quad => "UAU! Você dominou o Quarteto!",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一局游戏
///
/// 单词集合创建后不再变化；每个面板的 `solved` 只会从 false 变成 true。
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    mode: Mode,
    words: Vec<Word>,
    solved: Vec<bool>,
    attempts: u32,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl Session {
    /// `words` 的数量必须与模式的面板数一致
    pub fn new(mode: Mode, words: Vec<Word>) -> Self {
        debug_assert_eq!(words.len(), mode.board_count());
        let now = Utc::now();

        Session {
            id: Uuid::new_v4().to_string(),
            mode,
            solved: vec![false; words.len()],
            words,
            attempts: 0,
            created_at: now,
            last_active: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn solved(&self) -> &[bool] {
        &self.solved
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 所有面板都已猜中
    pub fn is_won(&self) -> bool {
        self.solved.iter().all(|s| *s)
    }

    /// 对每个面板评分并更新状态
    ///
    /// 已猜中的面板不再评分，直接返回冻结结果。
    pub fn apply_guess(&mut self, guess: &Word) -> Vec<BoardResult> {
        if !self.is_won() {
            self.attempts += 1;
        }
        self.last_active = Utc::now();

        self.words
            .iter()
            .zip(self.solved.iter_mut())
            .map(|(secret, solved)| {
                if *solved {
                    return BoardResult::frozen();
                }

                let feedback = score(guess, secret);
                if is_perfect(&feedback) {
                    *solved = true;
                }
                BoardResult::scored(feedback, *solved)
            })
            .collect()
    }

    /// 闲置时间超过 `ttl`
    pub fn is_idle(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let idle = now.signed_duration_since(self.last_active);
        idle.to_std().map(|idle| idle > ttl).unwrap_or(false)
    }
}
