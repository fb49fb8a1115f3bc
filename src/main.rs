use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use lullaby::{
    AnthropicClient, AnthropicConfig, LoopConfig, RetryPolicy, RetryingService, UserRequest,
    format_report, judge_only, prompt_for_request, read_story_file, run_story_loop, verdict_json,
};

#[derive(Parser)]
#[command(name = "lullaby")]
#[command(author, version, about = "Bedtime story generator with an LLM judge", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a story, judge it, and revise until it passes
    Tell {
        /// What the story should be about (prompted for when omitted)
        request: Option<String>,

        /// Minimum overall score for acceptance
        #[arg(long, default_value = "8.5")]
        min_score: f64,

        /// Maximum number of judge-and-revise rounds
        #[arg(long, default_value = "3")]
        max_rounds: u32,

        /// Re-evaluations allowed when the judge returns malformed output
        #[arg(long, default_value = "0")]
        malformed_retries: u32,

        /// Print the full result as JSON instead of the report
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        service: ServiceArgs,
    },

    /// Judge an existing story without revising it
    Judge {
        /// Story text file
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[derive(Args)]
struct ServiceArgs {
    /// Model to use
    #[arg(long, default_value = "claude-sonnet-4-20250514")]
    model: String,

    /// Timeout per service call in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Retries for transient service faults
    #[arg(long, default_value = "3")]
    max_retries: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tell {
            request,
            min_score,
            max_rounds,
            malformed_retries,
            json,
            service,
        } => {
            setup_logging(service.verbose);
            let config = LoopConfig {
                min_score,
                max_rounds,
                malformed_retries,
            };
            tell_story(request, config, json, &service).await
        }
        Commands::Judge { input, service } => {
            setup_logging(service.verbose);
            judge_story(input, &service).await
        }
    }
}

/// Logs go to stderr so stdout carries only the story and report
fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn build_service(args: &ServiceArgs) -> Result<RetryingService<AnthropicClient>> {
    let timeout = Duration::from_secs(args.timeout_secs);
    let config = AnthropicConfig::from_env()?
        .with_model(args.model.clone())
        .with_timeout(timeout);
    let client = AnthropicClient::new(config).context("Failed to create API client")?;

    let policy = RetryPolicy {
        max_retries: args.max_retries,
        attempt_timeout: Some(timeout),
        ..Default::default()
    };
    Ok(RetryingService::new(client, policy))
}

async fn tell_story(
    request: Option<String>,
    config: LoopConfig,
    json: bool,
    args: &ServiceArgs,
) -> Result<()> {
    let request = match request {
        Some(text) => UserRequest::new(text).context("A story request is required")?,
        None => prompt_for_request(&mut io::stdin().lock(), &mut io::stderr())?,
    };
    config.validate()?;

    let service = build_service(args)?;
    info!(model = %service.inner().model(), "Using model");

    let result = run_story_loop(&service, &request, &config)
        .await
        .context("Story loop failed")?;

    info!(
        state = ?result.state,
        rounds = result.rounds,
        evaluations = result.evaluations,
        revisions = result.revisions,
        "Story loop finished"
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        print!("{}", format_report(&result)?);
    }
    Ok(())
}

async fn judge_story(input: PathBuf, args: &ServiceArgs) -> Result<()> {
    info!("Judging story from {:?}", input);
    let candidate = read_story_file(&input)?;

    let service = build_service(args)?;
    let verdict = judge_only(&service, &candidate)
        .await
        .context("Failed to judge story")?;

    println!("{}", verdict_json(&verdict)?);
    Ok(())
}
