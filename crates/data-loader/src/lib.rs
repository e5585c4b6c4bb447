//! # Data Loader Crate
//!
//! This crate handles loading the MovieLens CSV dataset and deriving the
//! movie-level views the pipeline reports on.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Rating, Movie, MovieStats)
//! - **parser**: Parse the CSV files into Rust structs against a fixed schema
//! - **index**: Load both files in parallel and index the movie catalogue
//! - **features**: Year extraction, per-year counts, genre rows
//! - **aggregate**: Per-movie rating count/average and the title join
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::{aggregate, JoinPolicy, MovieCatalog, MovieLensData};
//! use std::path::Path;
//!
//! let data = MovieLensData::load_from_dir(Path::new("data/ml-20m"))?;
//! let catalog = MovieCatalog::from_movies(&data.movies);
//!
//! let stats = aggregate::movie_rating_stats(&data.ratings);
//! let named = aggregate::join_with_titles(&stats, &catalog, JoinPolicy::Inner);
//! let popular = aggregate::popular_movies(&named, 500);
//! ```

// Public modules
pub mod aggregate;
pub mod error;
pub mod features;
pub mod index;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use aggregate::JoinPolicy;
pub use error::{DataLoadError, Result};
pub use features::extract_year;
pub use index::{MovieCatalog, MovieLensData};
pub use types::{
    // Type aliases
    MovieId,
    UserId,
    // Core types
    Movie,
    MovieGenre,
    MovieStats,
    MovieWithYear,
    Rating,
    RatingAggregate,
};
