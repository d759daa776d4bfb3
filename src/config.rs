use std::path::PathBuf;

use serde::Deserialize;

use crate::names;

/// Runtime knobs for an embedding application. Deserializable so it can be
/// loaded from a config file; `Default` matches the stock deployment.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Directory holding the JSON collection files.
    pub data_dir: PathBuf,
    /// Countdown allotted to each question of an attempt.
    pub question_seconds: u64,
    /// How many quizzes the popularity list returns.
    pub leaderboard_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(names::DEFAULT_DATA_DIR),
            question_seconds: names::DEFAULT_QUESTION_SECONDS,
            leaderboard_size: names::DEFAULT_LEADERBOARD_SIZE,
        }
    }
}

impl Config {
    pub fn with_data_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: dir.into(),
            ..Self::default()
        }
    }
}
