use clap::{Parser, Subcommand};
use review_lens::config::constants::{
    MIN_QUERIES, MODEL_NAME_POLARITY, MODEL_NAME_STARS, WORDCLOUD_MAX_WORDS,
};
use review_lens::config::{clamp_query_count, Settings};
use review_lens::engine::{
    Dashboard, DashboardOptions, LabelScheme, LexiconClassifier, RatingPrecision,
    SentimentClassifier,
};
use review_lens::network::{ApifyClient, DatasetFile, InferenceClassifier, ReviewSource};
use review_lens::ops::telemetry;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "review-lens", version, about = "Review sentiment dashboard for product searches")]
struct Cli {
    /// Human-readable logs instead of JSON
    #[arg(long, global = true)]
    pretty: bool,

    /// Print Prometheus metrics to stderr before exiting
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Search for a product and aggregate its reviews
    Search {
        /// Product to search for, e.g. "PS5 Console"
        query: String,

        /// Number of search results to request (100..=1000, step 100)
        #[arg(long, default_value_t = MIN_QUERIES)]
        num_results: u32,

        /// Rating display precision: continuous, 5 or 10
        #[arg(long, default_value = "continuous")]
        precision: RatingPrecision,

        /// Read result pages from a saved dataset instead of the scraping service
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Terms kept per word cloud bucket
        #[arg(long, default_value_t = WORDCLOUD_MAX_WORDS)]
        max_words: usize,

        /// Use the offline lexicon classifier even when HF_TOKEN is set
        #[arg(long)]
        offline: bool,
    },
    /// Show this month's scraping usage
    Usage,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.pretty {
        telemetry::init_tracing_pretty();
    } else {
        telemetry::init_tracing();
    }

    let outcome = run(cli.command).await;

    if cli.metrics {
        eprintln!("{}", telemetry::get_metrics_string());
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "review-lens failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    match command {
        Command::Search {
            query,
            num_results,
            precision,
            dataset,
            max_words,
            offline,
        } => {
            let query = query.trim().to_string();
            if query.is_empty() {
                return Err("search query must not be empty".into());
            }

            let source: Box<dyn ReviewSource> = match dataset {
                Some(path) => Box::new(DatasetFile::new(path)),
                None => Box::new(ApifyClient::new(&settings.scraper)?),
            };

            let dashboard = Dashboard::new(source, build_classifiers(&settings, offline)?);
            let options = DashboardOptions {
                num_results: clamp_query_count(num_results),
                precision,
                max_words,
            };

            let report = dashboard.run(&query, &options).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Usage => {
            let client = ApifyClient::new(&settings.scraper)?;
            let usage = client.usage().await?;
            println!("{}", usage);
        }
    }

    Ok(())
}

fn build_classifiers(
    settings: &Settings,
    offline: bool,
) -> Result<Vec<Box<dyn SentimentClassifier>>, Box<dyn std::error::Error>> {
    if offline || settings.inference.api_token.is_none() {
        if !offline {
            tracing::warn!("HF_TOKEN not set, falling back to the lexicon classifier");
        }
        return Ok(vec![
            Box::new(LexiconClassifier::new(LabelScheme::stars())),
            Box::new(LexiconClassifier::new(LabelScheme::polarity())),
        ]);
    }

    Ok(vec![
        Box::new(InferenceClassifier::new(
            &settings.inference,
            MODEL_NAME_STARS,
            LabelScheme::stars(),
        )?),
        Box::new(InferenceClassifier::new(
            &settings.inference,
            MODEL_NAME_POLARITY,
            LabelScheme::polarity(),
        )?),
    ])
}
