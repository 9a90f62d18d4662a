use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Store key for the one record this game keeps.
pub const SCORE_KEY: &str = "best_scores";

/// Score-slot selector. Only the best-score bookkeeping distinguishes
/// tiers; the grid stays 4x4 for all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium => Difficulty::Hard,
            Difficulty::Hard => Difficulty::Easy,
        }
    }
}

/// Best result for one tier; both fields absent until a first solve lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScore {
    pub moves: Option<u32>,
    pub time: Option<u64>,
}

impl BestScore {
    /// Moves decide; equal moves fall back to the lower time. A slot
    /// without a complete prior result always loses.
    fn beaten_by(&self, moves: u32, time: u64) -> bool {
        match (self.moves, self.time) {
            (Some(best_moves), Some(best_time)) => {
                moves < best_moves || (moves == best_moves && time < best_time)
            }
            _ => true,
        }
    }
}

/// The full persisted record, one slot per tier. Absent slots serialize as
/// explicit nulls: `{"easy":{"moves":null,"time":null},...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestScores {
    pub easy: BestScore,
    pub medium: BestScore,
    pub hard: BestScore,
}

impl BestScores {
    fn slot(&self, tier: Difficulty) -> &BestScore {
        match tier {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn slot_mut(&mut self, tier: Difficulty) -> &mut BestScore {
        match tier {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

/// Key-value persistence collaborator. Keys are bare names; where the value
/// lives is the store's business.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Filesystem store: one `<key>.json` file per key under a data directory.
/// I/O failures degrade to absent reads and dropped writes; gameplay never
/// notices.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: PathBuf) -> Self {
        DirStore { dir }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl ScoreStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Err(err) = fs::create_dir_all(&self.dir) {
            tracing::warn!(dir = %self.dir.display(), %err, "score directory unavailable");
            return;
        }
        if let Err(err) = fs::write(self.path(key), value) {
            tracing::warn!(path = %self.path(key).display(), %err, "failed to persist scores");
        }
    }
}

/// Owns the best-score record across sessions and mirrors every change back
/// to the store.
pub struct ScoreTracker<S> {
    store: S,
    scores: BestScores,
}

impl<S: ScoreStore> ScoreTracker<S> {
    /// Adopt the stored record verbatim when present and well-formed.
    /// Anything else, including malformed JSON, starts from empty defaults.
    pub fn load(store: S) -> Self {
        let scores = match store.get(SCORE_KEY) {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(scores) => scores,
                Err(err) => {
                    tracing::warn!(%err, "stored best scores are malformed, starting fresh");
                    BestScores::default()
                }
            },
            None => BestScores::default(),
        };
        ScoreTracker { store, scores }
    }

    pub fn best(&self, tier: Difficulty) -> BestScore {
        *self.scores.slot(tier)
    }

    /// Record a finished game. The tier's slot is replaced only when the
    /// result beats it; other tiers are untouched. Returns whether the
    /// record changed, in which case the full record was pushed out.
    pub fn record(&mut self, tier: Difficulty, moves: u32, seconds: u64) -> bool {
        if !self.scores.slot(tier).beaten_by(moves, seconds) {
            return false;
        }
        *self.scores.slot_mut(tier) = BestScore {
            moves: Some(moves),
            time: Some(seconds),
        };
        tracing::info!(tier = tier.label(), moves, seconds, "new best score");
        self.flush();
        true
    }

    fn flush(&mut self) {
        match serde_json::to_string(&self.scores) {
            Ok(raw) => self.store.set(SCORE_KEY, &raw),
            Err(err) => tracing::warn!(%err, "failed to serialize best scores"),
        }
    }
}
