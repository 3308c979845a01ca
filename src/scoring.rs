//! 猜测评分
//!
//! 两轮匹配：
//! 1. 先标出位置完全正确的字母，并把它们从双方的剩余字母中移除
//! 2. 再对剩下的猜测字母，从左到右在剩余的答案字母中找第一个相同字母，
//!    找到则标为 `Partial` 并消耗掉，否则为 `Absent`
//!
//! 这样同一字母出现的次数不会超过它在答案中出现的次数。

use crate::word::{WORD_LENGTH, Word};
use serde::{Deserialize, Serialize};

/// 单个字母的反馈
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    /// 字母和位置都正确
    Exact,
    /// 字母存在但位置不对
    Partial,
    /// 字母不存在（或已被其他位置用完）
    Absent,
}

/// 计算 `guess` 相对 `secret` 的反馈
pub fn score(guess: &Word, secret: &Word) -> [Feedback; WORD_LENGTH] {
    let mut result = [Feedback::Absent; WORD_LENGTH];
    let mut guess_left: [Option<u8>; WORD_LENGTH] = guess.letters().map(Some);
    let mut secret_left: [Option<u8>; WORD_LENGTH] = secret.letters().map(Some);

    for i in 0..WORD_LENGTH {
        if guess_left[i] == secret_left[i] {
            result[i] = Feedback::Exact;
            guess_left[i] = None;
            secret_left[i] = None;
        }
    }

    for i in 0..WORD_LENGTH {
        let Some(letter) = guess_left[i] else {
            continue;
        };

        if let Some(slot) = secret_left.iter_mut().find(|s| **s == Some(letter)) {
            result[i] = Feedback::Partial;
            *slot = None;
        }
    }

    result
}

/// 所有位置都是 `Exact`
pub fn is_perfect(feedback: &[Feedback; WORD_LENGTH]) -> bool {
    feedback.iter().all(|f| *f == Feedback::Exact)
}
