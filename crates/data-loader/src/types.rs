//! Core domain types for the MovieLens CSV dataset.
//!
//! This module defines the fundamental records that flow through the batch
//! pipeline. Key Rust concepts demonstrated here:
//! - Type aliases for domain clarity (UserId, MovieId)
//! - Small `Copy` structs for hot records (Rating)
//! - `Option<T>` for derived attributes that may be absent

use serde::{Deserialize, Serialize};

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user IDs with movie IDs

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Source Records
// =============================================================================

/// A single observation of a user rating a movie.
///
/// One record per (user, movie) observation. Uniqueness is not enforced;
/// duplicates in the source file are kept as-is.
///
/// Rust concepts:
/// - Small, copyable struct (all fields are Copy)
/// - Datasets of ratings are passed around as slices (`&[Rating]`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
}

impl Rating {
    pub fn new(user_id: UserId, movie_id: MovieId, rating: f32) -> Self {
        Self {
            user_id,
            movie_id,
            rating,
        }
    }
}

/// Represents a movie in the catalogue
///
/// The release year is *not* stored: it's derived from the title on demand
/// via [`crate::features::extract_year`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Pipe-separated genres split into a list.
    ///
    /// Empty when the source file has no genres column.
    pub genres: Vec<String>,
}

// =============================================================================
// Derived Records
// =============================================================================

/// `(id, title, year)` projection of a movie
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieWithYear {
    pub id: MovieId,
    pub title: String,
    pub year: Option<String>,
}

/// One row per (movie, genre) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieGenre {
    pub movie_id: MovieId,
    pub title: String,
    pub genre: String,
}

/// Count and mean rating for one movie, before joining with titles
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingAggregate {
    pub movie_id: MovieId,
    pub count: u32,
    pub average: f64,
}

/// Human-readable aggregate: the rating aggregate joined with the catalogue
///
/// `title` is `None` only when the join was done with
/// [`crate::aggregate::JoinPolicy::KeepMissing`] and the movie id has no
/// catalogue entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieStats {
    pub movie_id: MovieId,
    pub count: u32,
    pub average: f64,
    pub title: Option<String>,
}
