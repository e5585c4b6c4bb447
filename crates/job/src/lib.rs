//! Batch job for the MovieLens recommender.
//!
//! This crate contains the orchestrator that runs every stage of the
//! pipeline, plus the JSON configuration it reads. Input paths starting
//! with `dbfs:` are resolved through an attached `storage::MountTable`.

pub mod config;
pub mod orchestrator;

pub use config::JobConfig;
pub use orchestrator::{JobReport, RecommendationJob, DBFS_SCHEME};
