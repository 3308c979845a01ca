use crate::config::GameConfig;
use crate::message::{GuessOutcome, SessionTicket};
use crate::session::{Mode, Session};
use crate::store::SessionStore;
use crate::word::Word;
use crate::word_bank::WordSupply;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// 会话生命周期：开局抽词、处理猜测
pub struct GameService {
    store: Arc<SessionStore>,
    supply: Arc<dyn WordSupply>,
    config: GameConfig,
}

impl GameService {
    pub fn new(store: Arc<SessionStore>, supply: Arc<dyn WordSupply>, config: GameConfig) -> Self {
        GameService {
            store,
            supply,
            config,
        }
    }

    /// 创建新会话
    ///
    /// 词池不足时返回 `SupplyUnavailable`，抽不齐不同单词时返回
    /// `WordSelectionFailed`；两种情况都不会保存会话。
    pub fn create_session(&self, mode: Mode) -> Result<SessionTicket> {
        let required = mode.board_count();
        let available = self.supply.pool_size();

        if available < required.max(self.config.min_pool_size) {
            return Err(Error::SupplyUnavailable {
                required: required.max(self.config.min_pool_size),
                available,
            });
        }

        let words = self.supply.pick(required, self.config.selection_budget)?;
        let session = Session::new(mode, words);
        debug!("会话 [{}] 单词: {:?}", session.id(), session.words());

        let session_id = self.store.insert(session);
        info!("新会话 [{}] 模式: {}", session_id, mode);

        Ok(SessionTicket::new(session_id, mode))
    }

    /// 提交一次猜测
    ///
    /// 整个评分与更新过程持有该会话的锁，同一会话的并发猜测依次处理。
    pub async fn submit_guess(&self, session_id: &str, raw_guess: &str) -> Result<GuessOutcome> {
        let handle = self.find_session(session_id)?;
        let guess = Word::parse(raw_guess)?;

        let mut session = handle.lock().await;

        if self.config.enforce_attempt_limit
            && !session.is_won()
            && session.attempts() >= self.config.max_attempts
        {
            return Err(Error::AttemptsExhausted(self.config.max_attempts));
        }

        let results = session.apply_guess(&guess);
        let game_over = session.is_won();
        let message = game_over.then(|| session.mode().victory_message().to_string());

        debug!(
            "会话 [{}] 第 {} 次猜测 {}: 已解决 {:?}",
            session_id,
            session.attempts(),
            guess,
            session.solved()
        );
        if game_over {
            info!("会话 [{}] 完成, 共 {} 次", session_id, session.attempts());
        }

        Ok(GuessOutcome {
            results,
            game_over,
            message,
            solution: session.words().to_vec(),
            attempts: session.attempts(),
            max_attempts: self.config.max_attempts,
        })
    }

    /// 查找会话，不存在时返回 `SessionNotFound`
    pub fn find_session(&self, session_id: &str) -> Result<Arc<Mutex<Session>>> {
        self.store
            .get(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    pub fn pool_size(&self) -> usize {
        self.supply.pool_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WordBankConfig;
    use crate::message::BoardResult;
    use crate::scoring::Feedback;
    use crate::word_bank::WordBank;
    use std::collections::HashSet;

    const WORDS: [&str; 6] = ["TERMO", "NOBRE", "SUTIL", "VIGOR", "AMIGO", "FAZER"];

    fn bank(words: &[&str]) -> Arc<WordBank> {
        let words = words.iter().map(|w| Word::parse(w).unwrap()).collect();
        Arc::new(WordBank::from_words(
            words,
            WordBankConfig {
                file_path: String::new(),
                target_pool_size: 200,
            },
        ))
    }

    fn service_with(words: &[&str], config: GameConfig) -> GameService {
        GameService::new(Arc::new(SessionStore::new()), bank(words), config)
    }

    fn service() -> GameService {
        service_with(&WORDS, GameConfig::default())
    }

    async fn secrets(service: &GameService, id: &str) -> Vec<Word> {
        let handle = service.store().get(id).unwrap();
        let session = handle.lock().await;
        session.words().to_vec()
    }

    /// 一个不在词池中的猜测
    fn miss() -> &'static str {
        "QQQQQ"
    }

    #[tokio::test]
    async fn quad_session_has_four_distinct_words() {
        let service = service();
        for _ in 0..20 {
            let ticket = service.create_session(Mode::Quad).unwrap();
            assert_eq!(ticket.mode, Mode::Quad);

            let words = secrets(&service, &ticket.session_id).await;
            assert_eq!(words.len(), 4);
            assert_eq!(words.iter().collect::<HashSet<_>>().len(), 4);
        }
        assert_eq!(service.store().len(), 20);
    }

    #[test]
    fn undersupplied_pool_fails_without_storing() {
        let service = service_with(&WORDS[..3], GameConfig::default());

        match service.create_session(Mode::Single) {
            Err(Error::SupplyUnavailable { required, available }) => {
                assert_eq!(required, 5);
                assert_eq!(available, 3);
            }
            other => panic!("unexpected: {:?}", other),
        }
        assert!(service.store().is_empty());
    }

    #[test]
    fn quad_needs_four_words_even_with_low_minimum() {
        let config = GameConfig {
            min_pool_size: 1,
            ..GameConfig::default()
        };
        let service = service_with(&WORDS[..3], config);

        assert!(matches!(
            service.create_session(Mode::Quad),
            Err(Error::SupplyUnavailable { required: 4, available: 3 })
        ));
        assert!(service.create_session(Mode::Dual).is_ok());
    }

    #[test]
    fn selection_budget_exhaustion_is_reported() {
        let config = GameConfig {
            selection_budget: 0,
            ..GameConfig::default()
        };
        let service = service_with(&WORDS, config);

        assert!(matches!(
            service.create_session(Mode::Dual),
            Err(Error::WordSelectionFailed { required: 2, draws: 0 })
        ));
        assert!(service.store().is_empty());
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let service = service();
        let id = service.create_session(Mode::Single).unwrap().session_id;

        assert!(matches!(
            service.submit_guess("nope", "TERMO").await,
            Err(Error::SessionNotFound(_))
        ));

        let handle = service.store().get(&id).unwrap();
        assert_eq!(handle.lock().await.attempts(), 0);
        assert_eq!(service.store().len(), 1);
    }

    #[tokio::test]
    async fn invalid_guess_does_not_count() {
        let service = service();
        let id = service.create_session(Mode::Single).unwrap().session_id;

        for bad in ["TERM", "TERMOS", "T3RMO", "", "ßabc"] {
            assert!(matches!(
                service.submit_guess(&id, bad).await,
                Err(Error::InvalidGuess(_))
            ));
        }

        let handle = service.store().get(&id).unwrap();
        assert_eq!(handle.lock().await.attempts(), 0);

        let outcome = service.submit_guess(&id, miss()).await.unwrap();
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn single_game_reports_victory() {
        let service = service();
        let id = service.create_session(Mode::Single).unwrap().session_id;
        let secret = secrets(&service, &id).await[0];

        let outcome = service.submit_guess(&id, miss()).await.unwrap();
        assert!(!outcome.game_over);
        assert!(outcome.message.is_none());
        assert_eq!(outcome.solution, vec![secret]);
        assert_eq!(outcome.results[0].feedback, Some([Feedback::Absent; 5]));

        let outcome = service
            .submit_guess(&id, &secret.to_string().to_lowercase())
            .await
            .unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.message.as_deref(), Some(Mode::Single.victory_message()));
        assert_eq!(outcome.results[0].feedback, Some([Feedback::Exact; 5]));
        assert_eq!(outcome.attempts, 2);
    }

    #[tokio::test]
    async fn quad_game_over_is_monotonic() {
        let service = service();
        let id = service.create_session(Mode::Quad).unwrap().session_id;
        let words = secrets(&service, &id).await;

        for (i, word) in words.iter().enumerate() {
            let outcome = service.submit_guess(&id, word.as_str()).await.unwrap();

            // 之前猜中的面板全部冻结
            for solved in &outcome.results[..i] {
                assert_eq!(*solved, BoardResult::frozen());
            }
            assert_eq!(outcome.results[i].feedback, Some([Feedback::Exact; 5]));
            assert!(outcome.results[i].solved);
            for open in &outcome.results[i + 1..] {
                assert!(!open.solved);
                assert!(open.feedback.is_some());
            }

            assert_eq!(outcome.game_over, i == 3);
            assert_eq!(outcome.solution, words);
        }

        let outcome = service.submit_guess(&id, miss()).await.unwrap();
        assert!(outcome.game_over);
        assert_eq!(outcome.message.as_deref(), Some(Mode::Quad.victory_message()));
        assert!(outcome.results.iter().all(|r| *r == BoardResult::frozen()));
        assert_eq!(outcome.attempts, 4);
    }

    #[tokio::test]
    async fn attempts_are_unlimited_by_default() {
        let service = service();
        let id = service.create_session(Mode::Single).unwrap().session_id;

        for n in 1..=12 {
            let outcome = service.submit_guess(&id, miss()).await.unwrap();
            assert_eq!(outcome.attempts, n);
            assert_eq!(outcome.max_attempts, 9);
        }
    }

    #[tokio::test]
    async fn attempt_limit_can_be_enforced() {
        let config = GameConfig {
            max_attempts: 3,
            enforce_attempt_limit: true,
            ..GameConfig::default()
        };
        let service = service_with(&WORDS, config);
        let id = service.create_session(Mode::Single).unwrap().session_id;
        let secret = secrets(&service, &id).await[0];

        for _ in 0..3 {
            service.submit_guess(&id, miss()).await.unwrap();
        }

        assert!(matches!(
            service.submit_guess(&id, secret.as_str()).await,
            Err(Error::AttemptsExhausted(3))
        ));

        let handle = service.store().get(&id).unwrap();
        let session = handle.lock().await;
        assert_eq!(session.attempts(), 3);
        assert_eq!(session.solved(), &[false]);
    }

    #[tokio::test]
    async fn concurrent_winning_guesses_score_once() {
        let service = Arc::new(service());
        let id = service.create_session(Mode::Single).unwrap().session_id;
        let secret = secrets(&service, &id).await[0];

        let tasks = (0..16).map(|_| {
            let service = service.clone();
            let id = id.clone();
            tokio::spawn(async move { service.submit_guess(&id, secret.as_str()).await })
        });

        let outcomes: Vec<GuessOutcome> = futures_util::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| joined.unwrap().unwrap())
            .collect();

        let scored = outcomes
            .iter()
            .filter(|o| o.results[0].feedback.is_some())
            .count();
        assert_eq!(scored, 1);
        assert!(outcomes.iter().all(|o| o.game_over));
    }
}
