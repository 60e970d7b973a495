//! High score leaderboard system
//!
//! Persisted through a `KeyValueStore`, tracks the top 10 scores.

use serde::{Deserialize, Serialize};

use crate::consts::HIGH_SCORES_KEY;
use crate::persistence::KeyValueStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Number of letters in a set of initials
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Three uppercase letters
    pub initials: String,
    /// Player's score
    pub score: u64,
    /// Date achieved, display-formatted
    pub date: String,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must beat the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new score to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, initials: &str, score: u64, date: &str) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            initials: initials.to_uppercase(),
            score,
            date: date.to_string(),
        };

        // Insert after any equal scores so earlier entries keep their place
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        // Trim to max size
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Restore ordering and size after loading untrusted data
    fn normalize(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_HIGH_SCORES);
    }

    /// Load high scores; a missing, unreadable or corrupt blob yields an empty board
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(HIGH_SCORES_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<HighScores>(&json) {
                Ok(mut scores) => {
                    scores.normalize();
                    log::info!("Loaded {} high scores", scores.entries.len());
                    scores
                }
                Err(e) => {
                    log::warn!("Discarding corrupt high scores: {e}");
                    Self::new()
                }
            },
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("High score store unavailable: {e}");
                Self::new()
            }
        }
    }

    /// Save high scores; failures are logged and otherwise ignored
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(HIGH_SCORES_KEY, &json) {
                Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
                Err(e) => log::warn!("High scores not saved: {e}"),
            },
            Err(e) => log::warn!("High scores not serialized: {e}"),
        }
    }
}

/// Today's date as `M/D/YYYY`
#[cfg(target_arch = "wasm32")]
pub fn today() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{}/{}/{}",
        date.get_month() + 1,
        date.get_date(),
        date.get_full_year()
    )
}

/// Today's date (UTC) as `M/D/YYYY`
#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> String {
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format_unix_date(secs)
}

/// Format a unix timestamp (seconds) as a UTC `M/D/YYYY` date
pub fn format_unix_date(secs: u64) -> String {
    // Days-to-civil conversion over 400-year eras
    let days = (secs / 86_400) as i64 + 719_468;
    let era = days.div_euclid(146_097);
    let doe = days.rem_euclid(146_097);
    let yoe = (doe - doe / 1_460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    format!("{month}/{day}/{year}")
}
