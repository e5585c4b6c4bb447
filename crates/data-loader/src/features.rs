//! Movie-level derived attributes.
//!
//! Everything here is a pure transform over borrowed movies; nothing is
//! mutated and no I/O happens.

use crate::types::{Movie, MovieGenre, MovieWithYear};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// First parenthesized run of digits, e.g. the `1995` in "Toy Story (1995)"
static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("year pattern is a valid regex"));

/// Extract the release year from a movie title
///
/// Example: "Toy Story (1995)" -> Some("1995")
///          "Untitled" -> None
///
/// Only the first match counts, so "Nineteen Eighty-Four (1984) (1956)"
/// yields "1984". A title without the pattern simply has no year.
pub fn extract_year(title: &str) -> Option<&str> {
    YEAR_PATTERN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Project movies to `(id, title, year)`
pub fn movies_with_year(movies: &[Movie]) -> Vec<MovieWithYear> {
    movies
        .iter()
        .map(|movie| MovieWithYear {
            id: movie.id,
            title: movie.title.clone(),
            year: extract_year(&movie.title).map(str::to_string),
        })
        .collect()
}

/// Count movies per release year, most prolific year first
///
/// Movies without a year are counted under `None`. Ties are broken by year
/// so the output is stable.
pub fn movies_per_year(movies: &[Movie]) -> Vec<(Option<String>, usize)> {
    let mut counts: HashMap<Option<&str>, usize> = HashMap::new();
    for movie in movies {
        *counts.entry(extract_year(&movie.title)).or_insert(0) += 1;
    }

    let mut counts: Vec<(Option<String>, usize)> = counts
        .into_iter()
        .map(|(year, count)| (year.map(str::to_string), count))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// One row per (movie, genre)
///
/// Movies without genres produce no rows.
pub fn explode_genres(movies: &[Movie]) -> Vec<MovieGenre> {
    movies
        .iter()
        .flat_map(|movie| {
            movie.genres.iter().map(move |genre| MovieGenre {
                movie_id: movie.id,
                title: movie.title.clone(),
                genre: genre.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u32, title: &str, genres: &[&str]) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    #[test]
    fn test_extract_year() {
        assert_eq!(extract_year("Toy Story (1995)"), Some("1995"));
        assert_eq!(extract_year("Untitled"), None);
    }

    #[test]
    fn test_extract_year_first_match_wins() {
        assert_eq!(extract_year("Paths (1957) (a.k.a. Foo) (1960)"), Some("1957"));
        // Non-digit parentheses are skipped
        assert_eq!(extract_year("City of Lost Children, The (Cité des) (1995)"), Some("1995"));
        assert_eq!(extract_year("Empty ()"), None);
    }

    #[test]
    fn test_movies_per_year() {
        let movies = vec![
            movie(1, "A (1995)", &[]),
            movie(2, "B (1995)", &[]),
            movie(3, "C (2000)", &[]),
            movie(4, "D", &[]),
        ];
        let counts = movies_per_year(&movies);
        assert_eq!(counts[0], (Some("1995".to_string()), 2));
        assert_eq!(counts.len(), 3);
        assert!(counts.contains(&(None, 1)));
    }

    #[test]
    fn test_explode_genres() {
        let movies = vec![
            movie(1, "Toy Story (1995)", &["Animation", "Comedy"]),
            movie(2, "No Genres", &[]),
        ];
        let rows = explode_genres(&movies);
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.movie_id == 1));
        assert_eq!(rows[1].genre, "Comedy");
    }

    #[test]
    fn test_movies_with_year() {
        let rows = movies_with_year(&[movie(1, "Heat (1995)", &[]), movie(2, "Untitled", &[])]);
        assert_eq!(rows[0].year.as_deref(), Some("1995"));
        assert_eq!(rows[1].year, None);
    }
}
