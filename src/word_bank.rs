use crate::config::WordBankConfig;
use crate::word::Word;
use crate::{Error, Result};
use anyhow::Context;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::RwLock;
use tracing::{debug, info, warn};

/// 单词来源
///
/// 会话创建时只需要从中随机抽词；不重复抽取由 [`WordSupply::pick`] 负责。
pub trait WordSupply: Send + Sync {
    /// 当前可抽取的单词数量
    fn pool_size(&self) -> usize;

    /// 随机抽取一个单词（可能与之前抽到的重复）
    fn draw(&self) -> Option<Word>;

    /// 抽取 `count` 个不重复的单词，最多抽 `max_draws` 次
    fn pick(&self, count: usize, max_draws: usize) -> Result<Vec<Word>> {
        let mut picked: Vec<Word> = Vec::with_capacity(count);
        let mut draws = 0;

        while picked.len() < count && draws < max_draws {
            draws += 1;
            if let Some(word) = self.draw() {
                if !picked.contains(&word) {
                    picked.push(word);
                }
            }
        }

        if picked.len() < count {
            return Err(Error::WordSelectionFailed {
                required: count,
                draws,
            });
        }

        Ok(picked)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WordFile {
    pub words: Vec<String>,
}

/// 词库：完整词表 + 每日词池
///
/// 词池是从词表中随机抽取的 `target_pool_size` 个单词，每天零点由调度任务刷新。
#[derive(Debug)]
pub struct WordBank {
    lexicon: Vec<Word>,
    pool: RwLock<Vec<Word>>,
    config: WordBankConfig,
}

impl WordBank {
    /// 按配置加载词表并生成词池，加载失败时使用内置词表
    pub fn new(config: WordBankConfig) -> Self {
        let lexicon = match Self::read_lexicon(&config.file_path) {
            Ok(words) if !words.is_empty() => words,
            Ok(_) => {
                warn!("词库文件 {} 为空, 使用默认词库", config.file_path);
                default_words()
            }
            Err(e) => {
                warn!("无法加载词库文件: {}, 使用默认词库", e);
                default_words()
            }
        };

        Self::from_words(lexicon, config)
    }

    /// 用给定单词构建词库，重复的单词只保留一个
    pub fn from_words(words: Vec<Word>, config: WordBankConfig) -> Self {
        let lexicon: Vec<Word> = words
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let word_bank = WordBank {
            lexicon,
            pool: RwLock::new(Vec::new()),
            config,
        };
        word_bank.refresh();
        word_bank
    }

    /// 读取词库文件，跳过不合法的条目
    pub fn read_lexicon(path: &str) -> Result<Vec<Word>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("无法读取词库文件: {}", path))
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        let data: WordFile = serde_json::from_str(&content)
            .with_context(|| "无法解析词库文件格式")
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        let mut words = Vec::with_capacity(data.words.len());
        for raw in &data.words {
            match Word::parse(raw) {
                Ok(word) => words.push(word),
                Err(_) => debug!("跳过不合法的单词: {}", raw),
            }
        }

        Ok(words)
    }

    /// 保存词表到文件
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let data = WordFile {
            words: self.lexicon.iter().map(|w| w.to_string()).collect(),
        };

        let content = serde_json::to_string_pretty(&data)
            .with_context(|| "无法序列化词库")
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        std::fs::write(path, content)
            .with_context(|| format!("无法写入词库文件: {}", path))
            .map_err(|e| Error::Storage(format!("{:#}", e)))?;

        Ok(())
    }

    /// 重新抽取每日词池，返回词池大小
    pub fn refresh(&self) -> usize {
        let mut rng = rand::rng();
        let fresh: Vec<Word> = self
            .lexicon
            .choose_multiple(&mut rng, self.config.target_pool_size)
            .copied()
            .collect();

        let size = fresh.len();
        *self.pool.write().unwrap_or_else(|e| e.into_inner()) = fresh;
        info!("词池已刷新: {} 个单词 (词表共 {} 个)", size, self.lexicon.len());
        size
    }

    /// 添加单词到词表，已存在时返回 false
    pub fn add_word(&mut self, word: Word) -> bool {
        match self.lexicon.binary_search(&word) {
            Ok(_) => false,
            Err(index) => {
                self.lexicon.insert(index, word);
                true
            }
        }
    }

    pub fn lexicon(&self) -> &[Word] {
        &self.lexicon
    }

    /// 获取词库统计信息
    pub fn get_stats(&self) -> WordBankStats {
        let mut letter_stats = [0usize; 26];
        for word in &self.lexicon {
            for letter in word.letters() {
                letter_stats[usize::from(letter - b'A')] += 1;
            }
        }

        WordBankStats {
            total_words: self.lexicon.len(),
            pool_size: self.pool_size(),
            letter_stats,
        }
    }

    /// 验证词库：返回问题列表
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.lexicon.is_empty() {
            errors.push("词表为空".to_string());
        }

        if self.lexicon.len() < self.config.target_pool_size {
            errors.push(format!(
                "词表只有 {} 个单词, 少于每日词池大小 {}",
                self.lexicon.len(),
                self.config.target_pool_size
            ));
        }

        errors
    }

    pub fn get_config(&self) -> &WordBankConfig {
        &self.config
    }
}

impl WordSupply for WordBank {
    fn pool_size(&self) -> usize {
        self.pool.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn draw(&self) -> Option<Word> {
        let pool = self.pool.read().unwrap_or_else(|e| e.into_inner());
        let mut rng = rand::rng();
        pool.choose(&mut rng).copied()
    }
}

#[derive(Debug, Clone)]
pub struct WordBankStats {
    pub total_words: usize,
    pub pool_size: usize,
    /// A-Z 每个字母在词表中出现的次数
    pub letter_stats: [usize; 26],
}

/// 内置词表，词库文件不可用时使用
fn default_words() -> Vec<Word> {
    [
        "TERMO", "NOBRE", "SUTIL", "VIGOR", "AMIGO", "FAZER", "MORAL", "SONHO", "TEMPO",
        "FORTE", "PRAIA", "LIMPO", "CAMPO", "LEITE", "CARTA", "MUNDO", "PEDRA", "NORTE",
        "VERDE", "PORTA", "FESTA", "CLARO", "LIVRO", "NOITE", "PLANO", "SALTO", "TROCA",
        "GRATO", "BRAVO", "FUNDO",
    ]
    .iter()
    .filter_map(|w| Word::parse(w).ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn config(target_pool_size: usize) -> WordBankConfig {
        WordBankConfig {
            file_path: "does-not-exist.json".to_string(),
            target_pool_size,
        }
    }

    fn words(list: &[&str]) -> Vec<Word> {
        list.iter().map(|w| Word::parse(w).unwrap()).collect()
    }

    /// 按顺序循环返回单词
    struct CyclingSupply {
        words: Vec<Word>,
        next: AtomicUsize,
    }

    impl WordSupply for CyclingSupply {
        fn pool_size(&self) -> usize {
            self.words.len()
        }

        fn draw(&self) -> Option<Word> {
            if self.words.is_empty() {
                return None;
            }
            let i = self.next.fetch_add(1, Ordering::SeqCst);
            Some(self.words[i % self.words.len()])
        }
    }

    #[test]
    fn pick_returns_distinct_words_in_draw_order() {
        let supply = CyclingSupply {
            words: words(&["AAAAA", "AAAAA", "BBBBB", "CCCCC"]),
            next: AtomicUsize::new(0),
        };

        let picked = supply.pick(3, 200).unwrap();
        assert_eq!(picked, words(&["AAAAA", "BBBBB", "CCCCC"]));
    }

    #[test]
    fn pick_fails_after_budget() {
        let supply = CyclingSupply {
            words: words(&["AAAAA"]),
            next: AtomicUsize::new(0),
        };

        match supply.pick(2, 10) {
            Err(Error::WordSelectionFailed { required, draws }) => {
                assert_eq!(required, 2);
                assert_eq!(draws, 10);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert_eq!(supply.next.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn duplicates_are_collapsed() {
        let bank = WordBank::from_words(words(&["TERMO", "termo", "NOBRE"]), config(10));
        assert_eq!(bank.lexicon().len(), 2);
        assert_eq!(bank.pool_size(), 2);
    }

    #[test]
    fn refresh_limits_pool_to_target_size() {
        let bank = WordBank::from_words(default_words(), config(5));
        assert_eq!(bank.pool_size(), 5);

        let drawn: BTreeSet<_> = (0..200).filter_map(|_| bank.draw()).collect();
        assert_eq!(drawn.len(), 5);
        assert!(drawn.iter().all(|w| bank.lexicon().contains(w)));

        assert_eq!(bank.refresh(), 5);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let bank = WordBank::new(config(200));
        assert_eq!(bank.lexicon().len(), default_words().len());
        assert_eq!(bank.pool_size(), default_words().len());
        assert!(!bank.validate().is_empty());
    }

    #[test]
    fn file_round_trip_skips_invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");
        std::fs::write(&path, r#"{"words": ["termo", "xyz", "NOBRE", "AB1DE", "nobre"]}"#).unwrap();
        let path = path.to_string_lossy().to_string();

        let loaded = WordBank::read_lexicon(&path).unwrap();
        assert_eq!(loaded, words(&["TERMO", "NOBRE", "NOBRE"]));

        let mut bank = WordBank::from_words(loaded, config(1));
        assert!(bank.add_word(Word::parse("SUTIL").unwrap()));
        assert!(!bank.add_word(Word::parse("TERMO").unwrap()));
        bank.save_to_file(&path).unwrap();

        let reloaded = WordBank::read_lexicon(&path).unwrap();
        assert_eq!(reloaded, words(&["NOBRE", "SUTIL", "TERMO"]));
    }

    #[test]
    fn unreadable_file_is_a_storage_error() {
        assert!(matches!(
            WordBank::read_lexicon("does-not-exist.json"),
            Err(Error::Storage(_))
        ));
    }

    #[test]
    fn stats_count_letters() {
        let bank = WordBank::from_words(words(&["AAAAB", "CCCCC"]), config(10));
        let stats = bank.get_stats();
        assert_eq!(stats.total_words, 2);
        assert_eq!(stats.letter_stats[0], 4);
        assert_eq!(stats.letter_stats[1], 1);
        assert_eq!(stats.letter_stats[2], 5);
    }
}
