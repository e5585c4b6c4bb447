//! End-to-end tests for the batch job, reading CSV files from disk.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use job::{JobConfig, RecommendationJob};
use pipeline::RankingPolicy;
use storage::{MountSpec, MountTable, OAuthCredentials};
use tempfile::TempDir;

/// 40 users x 30 movies in two taste groups, written as MovieLens CSVs
fn write_dataset(dir: &Path) {
    let mut movies = String::from("movieId,title,genres\n");
    for id in 1..=30u32 {
        // Quoted titles with commas, as in the real files
        writeln!(movies, "{},\"Movie {}, The ({})\",Drama|Comedy", id, id, 1980 + id).unwrap();
    }

    let mut ratings = String::from("userId,movieId,rating,timestamp\n");
    for user in 1..=40u32 {
        for movie in 1..=30u32 {
            let likes_low = user <= 20;
            let rating = if (movie <= 15) == likes_low { 4.5 } else { 1.5 };
            writeln!(ratings, "{},{},{},964982703", user, movie, rating).unwrap();
        }
    }

    std::fs::write(dir.join("movies.csv"), movies).unwrap();
    std::fs::write(dir.join("ratings.csv"), ratings).unwrap();
}

fn job_for(dir: &Path) -> RecommendationJob {
    let config = JobConfig {
        num_threads: 2,
        ranking: RankingPolicy::PredictedDescending,
        ..JobConfig::default()
    }
    .with_data_dir(dir);
    RecommendationJob::new(config).unwrap()
}

#[tokio::test]
async fn test_job_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());

    let report = job_for(dir.path()).run(5).await.unwrap();

    let (training, validation, test) = report.split_sizes;
    assert_eq!(training + validation + test, 40 * 30);
    assert!(report.test_rmse >= 0.0 && report.test_rmse < 1.5);
    assert!(report.validation_rmse.is_some());

    assert!(!report.recommendations.is_empty());
    assert!(report.recommendations.len() <= 10);
    assert!(report
        .recommendations
        .iter()
        .all(|r| r.title.starts_with("Movie ")));
    assert!(report
        .recommendations
        .windows(2)
        .all(|w| w[0].predicted_rating >= w[1].predicted_rating));
}

#[tokio::test]
async fn test_unknown_user_gets_empty_list() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());

    let report = job_for(dir.path()).run(9999).await.unwrap();
    assert!(report.recommendations.is_empty());
}

#[tokio::test]
async fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let result = job_for(dir.path()).run(5).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_schema_mismatch_fails() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());
    std::fs::write(
        dir.path().join("ratings.csv"),
        "userId,movieId,rating\n1,1,not-a-number\n",
    )
    .unwrap();

    let err = job_for(dir.path()).run(5).await.unwrap_err();
    assert!(format!("{:#}", err).contains("ratings"));
}

#[tokio::test]
async fn test_popular_movies() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());

    let job = RecommendationJob::new(
        JobConfig {
            num_threads: 1,
            min_popular_count: 40,
            ..JobConfig::default()
        }
        .with_data_dir(dir.path()),
    )
    .unwrap();
    let data = job.load_data().await.unwrap();

    let popular = job.popular_movies(&data);
    assert_eq!(popular.len(), 30);
    assert!(popular.windows(2).all(|w| w[0].average >= w[1].average));
    assert_eq!(popular[0].title.as_deref().map(|t| t.ends_with(")")), Some(true));
}

fn mounted_at_validated(root: &Path) -> Arc<MountTable> {
    let table = MountTable::new();
    let spec = MountSpec {
        account_name: "moviedata983940".to_string(),
        container_name: "validated".to_string(),
        folder_name: "Data".to_string(),
        mount_point: "/mnt/Files/Validated".to_string(),
        local_root: root.to_path_buf(),
    };
    let credentials = OAuthCredentials {
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        tenant_id: "tenant".to_string(),
    };
    table.mount(&spec, &credentials).unwrap();
    Arc::new(table)
}

fn dbfs_config() -> JobConfig {
    JobConfig {
        num_threads: 2,
        ..JobConfig::default()
    }
    .with_data_dir(Path::new("dbfs:/mnt/Files/Validated"))
}

#[tokio::test]
async fn test_job_reads_through_mount() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());

    let job = RecommendationJob::new(dbfs_config())
        .unwrap()
        .with_mounts(mounted_at_validated(dir.path()));
    assert!(job.needs_mounts());
    assert_eq!(
        job.input_path(&PathBuf::from("dbfs:/mnt/Files/Validated/ratings.csv"))
            .unwrap(),
        dir.path().join("ratings.csv")
    );

    let data = job.load_data().await.unwrap();
    assert_eq!(data.counts(), (30, 40 * 30));
}

#[tokio::test]
async fn test_dbfs_path_without_mount_fails() {
    let job = RecommendationJob::new(dbfs_config()).unwrap();
    assert!(job.needs_mounts());

    let err = job.load_data().await.unwrap_err();
    assert!(format!("{:#}", err).contains("needs a mount"));
}

#[tokio::test]
async fn test_plain_paths_skip_mounts() {
    let dir = TempDir::new().unwrap();
    write_dataset(dir.path());

    let job = job_for(dir.path());
    assert!(!job.needs_mounts());
    assert_eq!(
        job.input_path(&dir.path().join("movies.csv")).unwrap(),
        dir.path().join("movies.csv")
    );
}
