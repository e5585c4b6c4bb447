use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use data_loader::{features, UserId};
use job::{JobConfig, JobReport, RecommendationJob};
use pipeline::{RankingPolicy, SplitStrategy, Splitter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use storage::{
    EnvSecretStore, MountOutcome, MountSettings, MountSpec, MountTable, OAuthCredentials,
};
use tracing::info;

/// MovieLens ALS - batch recommender over the MovieLens ratings
#[derive(Parser)]
#[command(name = "movielens-als")]
#[command(about = "Train an ALS recommender on MovieLens and recommend movies", long_about = None)]
struct Cli {
    /// Directory holding movies.csv and ratings.csv (`dbfs:/mnt/...` reads through the mount)
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// JSON job configuration
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads (0 = one per core)
    #[arg(short, long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train, evaluate and recommend movies for a user
    Recommend {
        /// User ID to get recommendations for
        #[arg(long, default_value = "5")]
        user_id: UserId,

        /// Number of recommendations to return
        #[arg(long)]
        limit: Option<usize>,

        /// Order of the returned titles
        #[arg(long, value_enum)]
        rank_by: Option<RankBy>,
    },

    /// Show the best rated movies with many ratings
    Stats {
        /// Minimum number of ratings
        #[arg(long)]
        min_count: Option<u32>,

        /// Number of rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Show how many movies were released each year
    Years {
        /// Number of rows to print
        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Print the training / validation / test split sizes
    Split {
        /// Split seed
        #[arg(long)]
        seed: Option<u64>,

        /// Derive each draw from the rating instead of a random stream
        #[arg(long)]
        hashed: bool,
    },

    /// Mount the configured storage container and list its files
    Mount,
}

#[derive(Clone, Copy, ValueEnum)]
enum RankBy {
    Source,
    Predicted,
}

impl From<RankBy> for RankingPolicy {
    fn from(rank_by: RankBy) -> Self {
        match rank_by {
            RankBy::Source => RankingPolicy::SourceOrder,
            RankBy::Predicted => RankingPolicy::PredictedDescending,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Recommend {
            user_id,
            limit,
            rank_by,
        } => {
            let mut config = config;
            if let Some(limit) = limit {
                config.top_n = limit;
            }
            if let Some(rank_by) = rank_by {
                config.ranking = rank_by.into();
            }
            handle_recommend(config, user_id).await?
        }
        Commands::Stats { min_count, limit } => {
            let mut config = config;
            if let Some(min_count) = min_count {
                config.min_popular_count = min_count;
            }
            handle_stats(config, limit).await?
        }
        Commands::Years { limit } => handle_years(config, limit).await?,
        Commands::Split { seed, hashed } => {
            let mut config = config;
            if let Some(seed) = seed {
                config.split_seed = seed;
            }
            if hashed {
                config.split_strategy = SplitStrategy::Hashed;
            }
            handle_split(config).await?
        }
        Commands::Mount => handle_mount()?,
    }

    Ok(())
}

/// Config file (or defaults), then command-line overrides
fn load_config(cli: &Cli) -> Result<JobConfig> {
    let mut config = match &cli.config {
        Some(path) => JobConfig::from_json_file(path)?,
        None => JobConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(threads) = cli.threads {
        config.num_threads = threads;
    }
    Ok(config)
}

/// Create the job, mounting storage first when an input is a `dbfs:` path
fn build_job(config: JobConfig) -> Result<RecommendationJob> {
    let job = RecommendationJob::new(config)?;
    if !job.needs_mounts() {
        return Ok(job);
    }
    let (table, _) = mount_from_env()?;
    Ok(job.with_mounts(Arc::new(table)))
}

/// Mount the container described by the `MOVIELENS_*` environment
fn mount_from_env() -> Result<(MountTable, MountSpec)> {
    let settings = MountSettings::from_env().context("Failed to read storage settings")?;
    let credentials = OAuthCredentials::from_secrets(&EnvSecretStore, &settings.secret_scope)
        .context("Failed to read storage credentials")?;

    let spec = settings.mount_spec();
    let table = MountTable::new();
    match table.mount(&spec, &credentials)? {
        MountOutcome::Mounted => println!(
            "{} Mounted {} at {}",
            "✓".green(),
            spec.source(),
            spec.mount_point
        ),
        MountOutcome::AlreadyMounted => {
            println!("{} already mounted", spec.mount_point.yellow())
        }
    }
    Ok((table, spec))
}

/// Handle the 'recommend' command
async fn handle_recommend(config: JobConfig, user_id: UserId) -> Result<()> {
    let start = Instant::now();
    let job = build_job(config)?;
    let report = job.run(user_id).await?;

    println!("{} Finished in {:.2?}", "✓".green(), start.elapsed());
    print_report(&report);
    Ok(())
}

/// Handle the 'stats' command
async fn handle_stats(config: JobConfig, limit: usize) -> Result<()> {
    let min_count = config.min_popular_count;
    let job = build_job(config)?;
    let data = job.load_data().await?;

    let popular = job.popular_movies(&data);
    println!(
        "{}",
        format!("Movies with at least {} ratings:", min_count)
            .bold()
            .blue()
    );
    for (rank, stats) in popular.iter().take(limit).enumerate() {
        println!(
            "{}. {} - avg {:.2} ({} ratings)",
            (rank + 1).to_string().green(),
            stats.title.as_deref().unwrap_or("<unknown>"),
            stats.average,
            stats.count
        );
    }
    Ok(())
}

/// Handle the 'years' command
async fn handle_years(config: JobConfig, limit: usize) -> Result<()> {
    let job = build_job(config)?;
    let data = job.load_data().await?;

    println!("{}", "Movies per year:".bold().blue());
    for (year, count) in features::movies_per_year(&data.movies).iter().take(limit) {
        println!(
            "{}{}: {}",
            "• ".green(),
            year.as_deref().unwrap_or("(no year)"),
            count
        );
    }
    Ok(())
}

/// Handle the 'split' command
async fn handle_split(config: JobConfig) -> Result<()> {
    let splitter = Splitter::new(config.split_weights, config.split_seed)
        .context("Invalid split configuration")?
        .with_strategy(config.split_strategy);
    let job = build_job(config)?;
    let data = job.load_data().await?;

    let split = job.session().install(|| splitter.split(&data.ratings));
    let (training, validation, test) = split.sizes();

    println!("{}", "Split sizes:".bold().blue());
    println!("{}Training:   {}", "• ".cyan(), training);
    println!("{}Validation: {}", "• ".cyan(), validation);
    println!("{}Test:       {}", "• ".cyan(), test);
    Ok(())
}

/// Handle the 'mount' command
fn handle_mount() -> Result<()> {
    let (table, spec) = mount_from_env()?;

    let files = table.list(&spec.mount_point)?;
    info!("Listed {} entries", files.len());
    for file in files {
        println!("  - {}", file.display());
    }
    Ok(())
}

/// Print the evaluation results and recommended titles
fn print_report(report: &JobReport) {
    let (training, validation, test) = report.split_sizes;
    println!(
        "Split: training={}, validation={}, test={}",
        training, validation, test
    );
    if let Some(rmse) = report.validation_rmse {
        println!("Validation RMSE = {:.4}", rmse);
    }
    println!(
        "{}",
        format!("Root-mean-square error = {:.4}", report.test_rmse).bold()
    );

    if report.recommendations.is_empty() {
        println!(
            "{}",
            format!("No recommendations for user {}", report.user_id).yellow()
        );
        return;
    }

    println!(
        "{}",
        format!("Recommendations for user {}:", report.user_id)
            .bold()
            .blue()
    );
    for (rank, rec) in report.recommendations.iter().enumerate() {
        println!(
            "{}. {} (predicted {:.2})",
            (rank + 1).to_string().green(),
            rec.title,
            rec.predicted_rating
        );
    }
}
