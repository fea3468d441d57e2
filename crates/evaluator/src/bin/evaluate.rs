use clap::{Parser, Subcommand};
use evaluator::{
    CorrectnessPolicy, Evaluator, EvaluatorConfig, EvaluatorError, decode_source, score_submission,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use storage::{
    CsvLeaderboardStore, LeaderboardStore,
    dto::{
        leaderboard::{EMPTY_LEADERBOARD_MESSAGE, LeaderboardQuery, SortDirection, SortKey},
        submission::EvaluateRequest,
    },
    models::format_timestamp,
    services::leaderboard_view::export_csv,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "evaluate")]
#[command(about = "Score Python snippets and browse the leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "LEADERBOARD_PATH", default_value = "leaderboard.csv")]
    leaderboard: PathBuf,

    #[arg(long, env = "PYTHON_BIN", default_value = "python3")]
    python: String,

    #[arg(long, env = "CORRECTNESS_POLICY", default_value_t = CorrectnessPolicy::FunctionCount)]
    policy: CorrectnessPolicy,

    #[arg(long, env = "CORRECTNESS_TIMEOUT_SECS", default_value_t = 5)]
    correctness_timeout: u64,

    #[arg(long, env = "EFFICIENCY_TIMEOUT_SECS", default_value_t = 3)]
    efficiency_timeout: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a Python file and record it on the leaderboard
    Score {
        file: PathBuf,

        #[arg(short, long)]
        name: String,

        /// Print the result without appending it to the leaderboard
        #[arg(long)]
        no_save: bool,
    },
    /// Show or export the leaderboard
    Leaderboard {
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, default_value_t = SortKey::Score)]
        sort: SortKey,

        #[arg(long, default_value_t = SortDirection::Descending)]
        direction: SortDirection,

        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Write the page as CSV instead of printing it
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("evaluate={},evaluator={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = CsvLeaderboardStore::new(&cli.leaderboard);

    match cli.command {
        Commands::Score {
            file,
            name,
            no_save,
        } => {
            let config = EvaluatorConfig {
                interpreter: cli.python.clone(),
                policy: cli.policy,
                correctness_timeout: Duration::from_secs(cli.correctness_timeout),
                efficiency_timeout: Duration::from_secs(cli.efficiency_timeout),
            };
            handle_score(&file, &name, no_save, config, &store).await?;
        }
        Commands::Leaderboard {
            search,
            sort,
            direction,
            limit,
            export,
        } => {
            let query = LeaderboardQuery {
                name: search,
                sort,
                direction,
                limit,
            };
            handle_leaderboard(query, export, &store).await?;
        }
    }

    Ok(())
}

async fn handle_score(
    file: &Path,
    name: &str,
    no_save: bool,
    config: EvaluatorConfig,
    store: &CsvLeaderboardStore,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading snippet from: {}", file.display());

    let bytes = tokio::fs::read(file).await?;
    let request = EvaluateRequest {
        name: name.to_string(),
        code: decode_source(&bytes),
        file_name: file
            .file_name()
            .map(|file_name| file_name.to_string_lossy().into_owned()),
    };

    tracing::info!("Scoring with the {} correctness policy", config.policy);
    let evaluator = Evaluator::new(config);

    let evaluation = if no_save {
        validator::Validate::validate(&request).map_err(EvaluatorError::from)?;
        evaluator.evaluate(&request.code).await
    } else {
        let scored = score_submission(&evaluator, store, &request).await?;
        tracing::info!(
            "✓ Recorded on leaderboard at {} ({})",
            store.path().display(),
            format_timestamp(&scored.submission.timestamp)
        );
        scored.evaluation
    };

    println!("{:<12} {:>6}", "Metric", "Score");
    for (metric, score) in evaluation.metric_scores.as_pairs() {
        println!("{:<12} {:>6.2}", metric, score);
    }
    println!();
    println!("Final score: {}/100", evaluation.final_score);

    Ok(())
}

async fn handle_leaderboard(
    query: LeaderboardQuery,
    export: Option<PathBuf>,
    store: &CsvLeaderboardStore,
) -> Result<(), Box<dyn std::error::Error>> {
    query.validate()?;

    let records = match store.load_all().await {
        Ok(records) => records,
        Err(e) if e.is_unavailable() => {
            tracing::debug!("Leaderboard not readable: {}", e);
            println!("{}", EMPTY_LEADERBOARD_MESSAGE);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let page = query.page(records);

    if let Some(path) = export {
        let bytes = export_csv(&page.submissions)?;
        tokio::fs::write(&path, bytes).await?;
        tracing::info!(
            "✓ Exported {} entries to {}",
            page.submissions.len(),
            path.display()
        );
        return Ok(());
    }

    if let Some(last_updated) = page.last_updated {
        println!("Last updated: {}", format_timestamp(&last_updated));
    }
    println!(
        "{:>4}  {:<24} {:<24} {:>7}  {}",
        "#", "Name", "File", "Score", "Timestamp"
    );
    for (index, submission) in page.submissions.iter().enumerate() {
        println!(
            "{:>4}  {:<24} {:<24} {:>7}  {}",
            index + 1,
            submission.name,
            submission.file_name,
            submission.score,
            format_timestamp(&submission.timestamp)
        );
    }
    println!(
        "Showing {} of {} matching submissions",
        page.submissions.len(),
        page.total_items
    );

    Ok(())
}
