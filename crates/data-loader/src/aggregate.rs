//! Per-movie rating aggregates.
//!
//! Two steps, kept separate so the join is an explicit decision:
//! 1. `movie_rating_stats` groups ratings by movie (count + mean)
//! 2. `join_with_titles` attaches titles from the catalogue under a
//!    `JoinPolicy`

use crate::index::MovieCatalog;
use crate::types::{MovieId, MovieStats, Rating, RatingAggregate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with aggregates whose movie id isn't in the catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Drop rows without a catalogue entry (inner join)
    #[default]
    Inner,
    /// Keep them with `title: None` (left join)
    KeepMissing,
}

/// Group ratings by movie and compute count and mean rating
///
/// The mean uses plain f64 summation. Output is sorted by movie id.
/// Each rayon worker folds into a local map, then the maps are merged.
pub fn movie_rating_stats(ratings: &[Rating]) -> Vec<RatingAggregate> {
    let sums: HashMap<MovieId, (f64, u32)> = ratings
        .par_iter()
        .fold(HashMap::new, |mut local: HashMap<MovieId, (f64, u32)>, r| {
            let entry = local.entry(r.movie_id).or_insert((0.0, 0));
            entry.0 += f64::from(r.rating);
            entry.1 += 1;
            local
        })
        .reduce(HashMap::new, |mut acc, local| {
            for (movie_id, (sum, count)) in local {
                let entry = acc.entry(movie_id).or_insert((0.0, 0));
                entry.0 += sum;
                entry.1 += count;
            }
            acc
        });

    let mut stats: Vec<RatingAggregate> = sums
        .into_iter()
        .map(|(movie_id, (sum, count))| RatingAggregate {
            movie_id,
            count,
            average: sum / f64::from(count),
        })
        .collect();
    stats.sort_unstable_by_key(|s| s.movie_id);
    stats
}

/// Attach catalogue titles to rating aggregates
pub fn join_with_titles(
    aggregates: &[RatingAggregate],
    catalog: &MovieCatalog,
    policy: JoinPolicy,
) -> Vec<MovieStats> {
    aggregates
        .iter()
        .filter_map(|agg| {
            let title = catalog.title(agg.movie_id).map(str::to_string);
            if title.is_none() && policy == JoinPolicy::Inner {
                return None;
            }
            Some(MovieStats {
                movie_id: agg.movie_id,
                count: agg.count,
                average: agg.average,
                title,
            })
        })
        .collect()
}

/// Movies with at least `min_count` ratings, best average first
///
/// Ties on the average fall back to the higher rating count.
pub fn popular_movies(stats: &[MovieStats], min_count: u32) -> Vec<MovieStats> {
    let mut popular: Vec<MovieStats> = stats
        .iter()
        .filter(|s| s.count >= min_count)
        .cloned()
        .collect();
    popular.sort_by(|a, b| {
        b.average
            .partial_cmp(&a.average)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.count.cmp(&a.count))
    });
    popular
}
