//! # Recommendation Job
//!
//! This module runs the whole batch pipeline for one user:
//! 1. Load movies and ratings (in parallel)
//! 2. Split ratings into training / validation / test
//! 3. Fit ALS on the training split
//! 4. Score validation and test, dropping NaN predictions
//! 5. Compute validation and test RMSE
//! 6. Pick the user's top titles from the test predictions
//!
//! ## Learning Goals
//!
//! - Async coordination with tokio::join!
//! - Using spawn_blocking for CPU-bound work
//! - Error handling across async boundaries
//! - Instrumentation and timing

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, instrument, warn};

use data_loader::{aggregate, parser, MovieCatalog, MovieLensData, MovieStats, UserId};
use pipeline::{
    train_model, Evaluator, FilterPipeline, Metric, PipelineError, RecommendationQuery,
    Recommendation, Session, Split, Splitter, ValidPredictionFilter,
};

use storage::MountTable;

use crate::config::JobConfig;

/// Input paths with this prefix are read through the mount table
pub const DBFS_SCHEME: &str = "dbfs:";

/// Everything one run produces
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub user_id: UserId,
    /// (training, validation, test) sizes
    pub split_sizes: (usize, usize, usize),
    /// `None` when no validation row could be scored
    pub validation_rmse: Option<f64>,
    pub test_rmse: f64,
    pub recommendations: Vec<Recommendation>,
}

/// Runs the pipeline stages in order on a shared session
#[derive(Clone)]
pub struct RecommendationJob {
    config: Arc<JobConfig>,
    session: Arc<Session>,
    mounts: Option<Arc<MountTable>>,
}

impl RecommendationJob {
    /// Build the job and its session pool
    pub fn new(config: JobConfig) -> Result<Self> {
        let session = Session::builder()
            .num_threads(config.num_threads)
            .build()
            .context("Failed to start session")?;
        info!(
            "Session {} started with {} threads",
            session.app_name(),
            session.num_threads()
        );

        Ok(Self {
            config: Arc::new(config),
            session: Arc::new(session),
            mounts: None,
        })
    }

    /// Resolve `dbfs:` input paths through `mounts`
    pub fn with_mounts(mut self, mounts: Arc<MountTable>) -> Self {
        self.mounts = Some(mounts);
        self
    }

    /// True if either input path has to go through a mount
    pub fn needs_mounts(&self) -> bool {
        is_dbfs(&self.config.movies_path) || is_dbfs(&self.config.ratings_path)
    }

    /// Local file for an input path; plain paths are returned unchanged
    pub fn input_path(&self, path: &Path) -> Result<PathBuf> {
        if !is_dbfs(path) {
            return Ok(path.to_path_buf());
        }
        let text = path.to_string_lossy();
        let mounts = self
            .mounts
            .as_ref()
            .with_context(|| format!("{} needs a mount, but none is attached", text))?;
        mounts
            .resolve(&text)
            .with_context(|| format!("Failed to resolve {}", text))
    }

    pub fn config(&self) -> &JobConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Load both input files concurrently
    pub async fn load_data(&self) -> Result<MovieLensData> {
        let start = Instant::now();
        let movies_path = self.input_path(&self.config.movies_path)?;
        let ratings_path = self.input_path(&self.config.ratings_path)?;

        let (movies_result, ratings_result) = tokio::join!(
            tokio::task::spawn_blocking(move || parser::parse_movies(&movies_path)),
            tokio::task::spawn_blocking(move || parser::parse_ratings(&ratings_path))
        );

        // Outer ? is the join, inner ? is the parse
        let movies = movies_result
            .context("Movie loading task panicked")?
            .context("Failed to load movies")?;
        let ratings = ratings_result
            .context("Rating loading task panicked")?
            .context("Failed to load ratings")?;

        info!(
            "Loaded {} movies and {} ratings in {:.2?}",
            movies.len(),
            ratings.len(),
            start.elapsed()
        );
        Ok(MovieLensData::from_parts(movies, ratings))
    }

    /// Load the inputs, then run every stage for `user_id`
    pub async fn run(&self, user_id: UserId) -> Result<JobReport> {
        let data = self.load_data().await?;
        self.run_on(data, user_id).await
    }

    /// Run every stage on already loaded data
    #[instrument(skip(self, data), fields(ratings = data.ratings.len()))]
    pub async fn run_on(&self, data: MovieLensData, user_id: UserId) -> Result<JobReport> {
        let start_time = Instant::now();
        let config = self.config.clone();

        // Split
        let stage = Instant::now();
        let splitter = Splitter::new(config.split_weights, config.split_seed)
            .context("Invalid split configuration")?
            .with_strategy(config.split_strategy);
        let split: Arc<Split> = {
            let session = self.session.clone();
            let ratings = data.ratings.clone();
            tokio::task::spawn_blocking(move || session.install(|| splitter.split(&ratings)))
                .await
                .context("Split task panicked")?
                .into()
        };
        let split_sizes = split.sizes();
        info!("Split finished in {:.2?}", stage.elapsed());

        // Train
        let stage = Instant::now();
        let model = {
            let session = self.session.clone();
            let split = split.clone();
            let params = config.als;
            tokio::task::spawn_blocking(move || train_model(&session, params, &split))
                .await
                .context("Training task panicked")?
                .context("Training failed")?
        };
        info!(
            "Trained model ({} users, {} items) in {:.2?}",
            model.user_count(),
            model.item_count(),
            stage.elapsed()
        );

        // Score held-out splits
        let stage = Instant::now();
        let (validation, test) = {
            let session = self.session.clone();
            let split = split.clone();
            tokio::task::spawn_blocking(move || {
                session.install(|| {
                    let valid_only = FilterPipeline::new().add_filter(ValidPredictionFilter);
                    (
                        valid_only.apply(model.transform(&split.validation)),
                        valid_only.apply(model.transform(&split.test)),
                    )
                })
            })
            .await
            .context("Scoring task panicked")?
        };
        info!(
            "Scored {} validation and {} test rows in {:.2?}",
            validation.len(),
            test.len(),
            stage.elapsed()
        );

        // Evaluate
        let evaluator = Evaluator::new(Metric::Rmse);
        let validation_rmse = match evaluator.evaluate(&validation) {
            Ok(rmse) => {
                info!("Validation RMSE = {:.4}", rmse);
                Some(rmse)
            }
            Err(PipelineError::NoValidPredictions) => {
                warn!("No valid validation predictions, skipping validation RMSE");
                None
            }
            Err(e) => return Err(e).context("Validation evaluation failed"),
        };
        let test_rmse = evaluator
            .evaluate(&test)
            .context("Test evaluation failed")?;
        info!("Root-mean-square error = {:.4}", test_rmse);

        // Query
        let catalog = MovieCatalog::from_movies(&data.movies);
        let recommendations =
            RecommendationQuery::new(config.top_n, config.ranking).run(user_id, &test, &catalog);
        if recommendations.is_empty() {
            warn!("No test predictions for user {}", user_id);
        }

        info!(
            "Job finished for user {} in {:.2?}",
            user_id,
            start_time.elapsed()
        );

        Ok(JobReport {
            user_id,
            split_sizes,
            validation_rmse,
            test_rmse,
            recommendations,
        })
    }

    /// Movies with at least `min_popular_count` ratings, best average first
    pub fn popular_movies(&self, data: &MovieLensData) -> Vec<MovieStats> {
        let catalog = MovieCatalog::from_movies(&data.movies);
        let stats = self.session.install(|| {
            aggregate::join_with_titles(
                &aggregate::movie_rating_stats(&data.ratings),
                &catalog,
                self.config.join_policy,
            )
        });
        aggregate::popular_movies(&stats, self.config.min_popular_count)
    }
}

fn is_dbfs(path: &Path) -> bool {
    path.to_str().is_some_and(|p| p.starts_with(DBFS_SCHEME))
}
