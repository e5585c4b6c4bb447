//! Loading the dataset and indexing the movie catalogue.
//!
//! This module builds the in-memory structures the pipeline reads from:
//! - `MovieLensData`: the raw movies and ratings, loaded in parallel
//! - `MovieCatalog`: movie id -> movie lookups used by every join
//!
//! Rust concepts you'll learn:
//! - Using Rayon's `join` for fork/join parallelism
//! - `Arc<[T]>` for immutable datasets shared between stages
//! - Borrowing: lookups return `&Movie`, never clones

use crate::error::Result;
use crate::parser;
use crate::types::*;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// The two source tables of a run
///
/// Both are immutable once loaded and cheap to clone (`Arc`), so stages can
/// hold on to them without copying.
#[derive(Debug, Clone)]
pub struct MovieLensData {
    pub movies: Arc<[Movie]>,
    pub ratings: Arc<[Rating]>,
}

impl MovieLensData {
    /// Load movies and ratings from explicit file paths
    ///
    /// Both files are parsed IN PARALLEL with `rayon::join`; the first error
    /// from either side aborts the load.
    pub fn load_from_files(movies_path: &Path, ratings_path: &Path) -> Result<Self> {
        info!(
            "Loading MovieLens dataset from {:?} and {:?}",
            movies_path, ratings_path
        );

        let (movies, ratings) = rayon::join(
            || parser::parse_movies(movies_path),
            || parser::parse_ratings(ratings_path),
        );

        // The ? operator works because both return Result<Vec<T>>
        let movies = movies?;
        let ratings = ratings?;

        info!("Loaded {} movies, {} ratings", movies.len(), ratings.len());

        Ok(Self {
            movies: movies.into(),
            ratings: ratings.into(),
        })
    }

    /// Load `movies.csv` and `ratings.csv` from one directory
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        Self::load_from_files(&data_dir.join("movies.csv"), &data_dir.join("ratings.csv"))
    }

    /// Build from already-parsed records (tests, synthetic data)
    pub fn from_parts(movies: Vec<Movie>, ratings: Vec<Rating>) -> Self {
        Self {
            movies: movies.into(),
            ratings: ratings.into(),
        }
    }

    /// Get counts for debugging/validation
    pub fn counts(&self) -> (usize, usize) {
        (self.movies.len(), self.ratings.len())
    }
}

/// Movie id -> movie lookups
///
/// Rust concept: HashMap<K, V> for O(1) lookups. When an id appears twice in
/// the source file the last row wins, like a keyed upsert.
#[derive(Debug, Default, Clone)]
pub struct MovieCatalog {
    movies: HashMap<MovieId, Movie>,
}

impl MovieCatalog {
    /// Creates a new, empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a slice of movies
    pub fn from_movies(movies: &[Movie]) -> Self {
        let mut catalog = Self::new();
        for movie in movies {
            catalog.insert(movie.clone());
        }
        catalog
    }

    /// Insert a movie into the catalogue
    pub fn insert(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Get a movie by ID
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    /// Get a movie's title by ID
    pub fn title(&self, id: MovieId) -> Option<&str> {
        self.get(id).map(|m| m.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
