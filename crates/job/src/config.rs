//! Job configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//! ```json
//! { "als": { "rank": 20 }, "top_n": 5, "ranking": "predicted_descending" }
//! ```

use als::AlsParams;
use anyhow::{Context, Result};
use data_loader::JoinPolicy;
use pipeline::{RankingPolicy, SplitStrategy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub movies_path: PathBuf,
    pub ratings_path: PathBuf,
    pub als: AlsParams,
    /// Relative training / validation / test weights
    pub split_weights: [f64; 3],
    pub split_seed: u64,
    pub split_strategy: SplitStrategy,
    /// Maximum number of titles returned per user
    pub top_n: usize,
    pub ranking: RankingPolicy,
    pub join_policy: JoinPolicy,
    /// Worker threads for the session pool; 0 uses one per core
    pub num_threads: usize,
    /// Minimum rating count for the popular-movies table
    pub min_popular_count: u32,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            movies_path: PathBuf::from("data/movies.csv"),
            ratings_path: PathBuf::from("data/ratings.csv"),
            als: AlsParams::default(),
            split_weights: [6.0, 2.0, 2.0],
            split_seed: 4,
            split_strategy: SplitStrategy::default(),
            top_n: pipeline::query::DEFAULT_LIMIT,
            ranking: RankingPolicy::default(),
            join_policy: JoinPolicy::default(),
            num_threads: 0,
            min_popular_count: 500,
        }
    }
}

impl JobConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Point both input paths at `movies.csv` / `ratings.csv` under `dir`
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.movies_path = dir.join("movies.csv");
        self.ratings_path = dir.join("ratings.csv");
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"{ "als": { "rank": 4 }, "top_n": 3, "ranking": "predicted_descending" }"#,
        )
        .unwrap();

        let config = JobConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.als.rank, 4);
        assert_eq!(config.als.max_iter, 5);
        assert_eq!(config.top_n, 3);
        assert_eq!(config.ranking, RankingPolicy::PredictedDescending);
        assert_eq!(config.split_weights, [6.0, 2.0, 2.0]);
        assert_eq!(config.join_policy, JoinPolicy::Inner);
    }

    #[test]
    fn test_invalid_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(JobConfig::from_json_file(file.path()).is_err());
        assert!(JobConfig::from_json_file(Path::new("/no/such/config.json")).is_err());
    }

    #[test]
    fn test_with_data_dir() {
        let config = JobConfig::default().with_data_dir(Path::new("/data/ml"));
        assert_eq!(config.movies_path, PathBuf::from("/data/ml/movies.csv"));
        assert_eq!(config.ratings_path, PathBuf::from("/data/ml/ratings.csv"));
    }
}
