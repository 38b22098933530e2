//! Persisted high score
//!
//! A single integer stored as decimal text, so the value stays readable by
//! anything that looks at the store.

use serde::{Deserialize, Serialize};

use crate::persistence::Store;

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub score: i64,
}

impl HighScore {
    const STORAGE_KEY: &'static str = "dodge_blast_high_score";

    pub fn new(score: i64) -> Self {
        Self { score }
    }

    /// Check if a score beats the stored one
    pub fn qualifies(&self, score: i64) -> bool {
        score > self.score
    }

    /// Record a score; returns true if it became the new best
    pub fn submit(&mut self, score: i64) -> bool {
        if self.qualifies(score) {
            self.score = score;
            true
        } else {
            false
        }
    }

    /// Load from the store, falling back to 0 on anything unreadable
    pub fn load(store: &impl Store) -> Self {
        match store.get_item(Self::STORAGE_KEY) {
            Ok(Some(text)) => match text.trim().parse::<i64>() {
                Ok(score) => {
                    log::info!("Loaded high score {}", score);
                    Self::new(score)
                }
                Err(e) => {
                    log::warn!("Ignoring unreadable high score {:?}: {}", text, e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("No high score found, starting fresh");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to read high score: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, store: &mut impl Store) {
        match store.set_item(Self::STORAGE_KEY, &self.score.to_string()) {
            Ok(()) => log::debug!("High score saved ({})", self.score),
            Err(e) => log::warn!("Failed to save high score: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_submit_only_raises() {
        let mut best = HighScore::new(50);
        assert!(!best.submit(50));
        assert!(!best.submit(-5));
        assert!(best.submit(60));
        assert_eq!(best.score, 60);
    }

    #[test]
    fn test_load_missing_is_zero() {
        let store = MemoryStore::new();
        assert_eq!(HighScore::load(&store), HighScore::default());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        HighScore::new(320).save(&mut store);
        assert_eq!(HighScore::load(&store).score, 320);
    }

    #[test]
    fn test_garbage_falls_back_to_zero() {
        let mut store = MemoryStore::new();
        store.set_item("dodge_blast_high_score", "lots").unwrap();
        assert_eq!(HighScore::load(&store).score, 0);
    }
}
