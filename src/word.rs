use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 单词长度
pub const WORD_LENGTH: usize = 5;

/// 经过校验的单词：恰好5个大写ASCII字母
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word([u8; WORD_LENGTH]);

impl Word {
    /// 规范化并校验输入（去除首尾空白、转大写）
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        // 先拒绝非ASCII，避免 ß -> SS 这类大写展开改变长度
        if !trimmed.is_ascii() {
            return Err(Error::InvalidGuess(format!(
                "单词只能包含字母 A-Z: {}",
                trimmed
            )));
        }
        let normalized = trimmed.to_ascii_uppercase();

        let count = normalized.chars().count();
        if count != WORD_LENGTH {
            return Err(Error::InvalidGuess(format!(
                "单词必须是 {} 个字母, 实际为 {} 个",
                WORD_LENGTH, count
            )));
        }

        if !normalized.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidGuess(format!(
                "单词只能包含字母 A-Z: {}",
                normalized
            )));
        }

        let mut letters = [0u8; WORD_LENGTH];
        letters.copy_from_slice(normalized.as_bytes());
        Ok(Word(letters))
    }

    pub fn letters(&self) -> &[u8; WORD_LENGTH] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        // 构造时保证全部是ASCII
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Word {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Word::parse(s)
    }
}

impl TryFrom<String> for Word {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Word::parse(&value)
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.as_str().to_string()
    }
}
