//! Parser for MovieLens CSV files.
//!
//! This module handles parsing the two delimited input files:
//! - movies.csv: movieId,title[,genres]
//! - ratings.csv: userId,movieId,rating[,timestamp]
//!
//! Both files carry a header row. Columns are read *positionally* against a
//! fixed schema, so header names don't matter, only column order does. Extra
//! trailing columns (like `timestamp`) are ignored.
//!
//! Rust concepts you'll learn here:
//! - Generic readers (`R: Read`) so tests can parse in-memory strings
//! - Error handling with `?` and `map_err`
//! - Converting between types with `str::parse`

use crate::error::{DataLoadError, Result};
use crate::types::*;
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Number of columns a movies row must have (id, title)
const MOVIE_REQUIRED_COLUMNS: usize = 2;

/// Number of columns a ratings row must have (userId, movieId, rating)
const RATING_REQUIRED_COLUMNS: usize = 3;

/// Open a data file, turning "not found" into a friendlier error
fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })
}

/// File name used in error messages
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Build a CSV reader for a file with a header row.
///
/// `flexible(true)` lets rows have more columns than the header; we check
/// the minimum column count ourselves so the error can name the schema.
fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Line number of a record for error messages (1-based, header is line 1)
fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

/// Fetch a column and convert it to `T`, reporting schema mismatches
fn field<T>(record: &StringRecord, idx: usize, name: &str, file: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = record.get(idx).ok_or_else(|| DataLoadError::SchemaMismatch {
        file: file.to_string(),
        line: line_of(record),
        reason: format!("Missing {}", name),
    })?;

    raw.parse().map_err(|e| DataLoadError::SchemaMismatch {
        file: file.to_string(),
        line: line_of(record),
        reason: format!("Invalid {} '{}': {}", name, raw, e),
    })
}

/// Reject rows that don't have enough columns for the schema
fn check_width(record: &StringRecord, required: usize, file: &str) -> Result<()> {
    if record.len() < required {
        return Err(DataLoadError::SchemaMismatch {
            file: file.to_string(),
            line: line_of(record),
            reason: format!(
                "Expected at least {} columns but found {}",
                required,
                record.len()
            ),
        });
    }
    Ok(())
}

/// Parse the movies.csv file
///
/// Format: movieId,title[,genres]
///
/// Titles containing commas are quoted in the source file; the CSV reader
/// takes care of that. Genres are pipe-separated: "Animation|Children|Comedy"
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let file = open(path)?;
    parse_movies_from_reader(file, &display_name(path))
}

/// Parse movies from any reader (used by `parse_movies` and by tests)
pub fn parse_movies_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Movie>> {
    let mut rdr = csv_reader(reader);
    let mut movies = Vec::new();

    for result in rdr.records() {
        let record = result?;
        check_width(&record, MOVIE_REQUIRED_COLUMNS, file)?;

        let movie = Movie {
            id: field(&record, 0, "movieId", file)?,
            title: record[1].to_string(),
            genres: record.get(2).map(parse_genres).unwrap_or_default(),
        };

        movies.push(movie);
    }

    Ok(movies)
}

/// Parse the ratings.csv file
///
/// Format: userId,movieId,rating[,timestamp]
///
/// The timestamp column is dropped.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let file = open(path)?;
    parse_ratings_from_reader(file, &display_name(path))
}

/// Parse ratings from any reader (used by `parse_ratings` and by tests)
pub fn parse_ratings_from_reader<R: Read>(reader: R, file: &str) -> Result<Vec<Rating>> {
    let mut rdr = csv_reader(reader);
    let mut ratings = Vec::new();

    for result in rdr.records() {
        let record = result?;
        check_width(&record, RATING_REQUIRED_COLUMNS, file)?;

        let value: f32 = field(&record, 2, "rating", file)?;
        // f32::from_str accepts "NaN" and "inf"
        if !value.is_finite() {
            return Err(DataLoadError::SchemaMismatch {
                file: file.to_string(),
                line: line_of(&record),
                reason: format!("Invalid rating '{}': must be finite", &record[2]),
            });
        }

        let rating = Rating {
            user_id: field(&record, 0, "userId", file)?,
            movie_id: field(&record, 1, "movieId", file)?,
            rating: value,
        };

        ratings.push(rating);
    }

    Ok(ratings)
}

/// Split a pipe-separated genre list
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
