use crate::prefs::PreferenceStore;
use tracing::info;

pub const HIGH_SCORE_KEY: &str = "HighScore";

/// Current score plus the persisted best.
pub struct ScoreBoard {
    score: u32,
    high_score: u32,
    store: Box<dyn PreferenceStore>,
}

impl ScoreBoard {
    /// Reads the high score once; a negative stored value counts as 0.
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let high_score = u32::try_from(store.get_int(HIGH_SCORE_KEY, 0)).unwrap_or(0);
        Self { score: 0, high_score, store }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }

    pub fn add_point(&mut self) {
        self.score += 1;
    }

    /// Called on the transition to game over. Returns true when a new best
    /// was stored.
    pub fn commit(&mut self) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        let stored = i32::try_from(self.high_score).unwrap_or(i32::MAX);
        self.store.set_int(HIGH_SCORE_KEY, stored);
        info!(high_score = self.high_score, "new high score");
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::prefs::MemoryStore;
    use std::sync::{Arc, Mutex};

    /// Records every write so tests can count them.
    #[derive(Clone, Default)]
    pub(crate) struct SpyStore {
        pub writes: Arc<Mutex<Vec<(String, i32)>>>,
        pub initial: i32,
    }

    impl PreferenceStore for SpyStore {
        fn get_int(&self, _key: &str, _default: i32) -> i32 {
            self.initial
        }

        fn set_int(&mut self, key: &str, value: i32) {
            self.writes.lock().unwrap().push((key.to_string(), value));
        }
    }

    #[test]
    fn loads_stored_high_score() {
        let board = ScoreBoard::load(Box::new(MemoryStore::with(HIGH_SCORE_KEY, 17)));
        assert_eq!(board.high_score(), 17);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn negative_stored_value_is_zero() {
        let board = ScoreBoard::load(Box::new(MemoryStore::with(HIGH_SCORE_KEY, -3)));
        assert_eq!(board.high_score(), 0);
    }

    #[test]
    fn commit_only_writes_improvements() {
        let spy = SpyStore { initial: 2, ..Default::default() };
        let writes = spy.writes.clone();
        let mut board = ScoreBoard::load(Box::new(spy));

        board.add_point();
        board.add_point();
        assert!(!board.commit(), "tie is not an improvement");
        board.add_point();
        assert!(board.commit());
        assert_eq!(board.high_score(), 3);

        board.reset();
        assert!(!board.commit());
        assert_eq!(board.high_score(), 3);
        assert_eq!(*writes.lock().unwrap(), vec![(HIGH_SCORE_KEY.to_string(), 3)]);
    }
}
