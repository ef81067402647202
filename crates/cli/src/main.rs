//! `adrelay` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   : start the job submission API.
//! - `run`     : trigger one job, wait for it, and deliver the result.
//! - `search`  : send a diagnostic query to the search API.
//! - `validate`: validate a project or generation JSON file.

mod config;
mod search;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::PipelineArgs;
use domain::{CreateGenerationInput, CreateProjectInput, Generation};
use engine::{JobMetadata, JobRequest};
use webhook::CallbackTarget;

#[derive(Parser)]
#[command(
    name = "adrelay",
    about = "Runs ad-copy jobs and relays their results to callbacks",
    version
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the job submission API.
    Serve {
        #[arg(long, env = "BIND", default_value = "0.0.0.0:8080")]
        bind: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Trigger one job and block until its result is delivered.
    Run {
        /// URL the result is POSTed to.
        #[arg(long)]
        callback_url: String,
        /// Sent as `x-api-key` with the callback.
        #[arg(long, env = "CALLBACK_API_KEY", hide_env_values = true)]
        callback_api_key: Option<String>,
        /// Job identifier echoed in the callback; generated when omitted.
        #[arg(long)]
        job_id: Option<String>,
        #[arg(long)]
        deliverable_id: Option<String>,
        #[arg(long)]
        contract_id: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// JSON file used as the run's input.
        #[arg(long)]
        input: Option<PathBuf>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Query the search API and print the results.
    Search(search::SearchArgs),
    /// Validate a JSON document against one of the domain schemas.
    Validate {
        #[arg(value_enum)]
        kind: DocumentKind,
        /// Path to the JSON file.
        path: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DocumentKind {
    /// A project create request.
    Project,
    /// A generation create request.
    GenerationInput,
    /// A full generation record, including its ad copy.
    Generation,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json);

    match cli.command {
        Command::Serve { bind, pipeline } => {
            info!(task_id = %pipeline.task_id, "Starting API server on {bind}");
            let watcher = pipeline.watcher()?;
            api::serve(&bind, api::AppState::new(watcher))
                .await
                .with_context(|| format!("API server on {bind} failed"))?;
        }
        Command::Run {
            callback_url,
            callback_api_key,
            job_id,
            deliverable_id,
            contract_id,
            title,
            input,
            pipeline,
        } => {
            let input = match input {
                Some(path) => read_json(&path)?,
                None => Value::Object(Default::default()),
            };
            let request = JobRequest {
                job_id: job_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                callback: CallbackTarget::new(callback_url, callback_api_key),
                metadata: JobMetadata { deliverable_id, contract_id, title },
                input,
            };

            let run = pipeline.watcher()?.run_to_completion(&request).await?;
            info!(job_id = %request.job_id, run_id = %run.id, "job finished and delivered");
        }
        Command::Search(args) => {
            if let Err(e) = search::run(&args).await {
                eprintln!("❌ {e}");
                std::process::exit(1);
            }
        }
        Command::Validate { kind, path } => {
            let document = read_json(&path)?;
            match validate(kind, document) {
                Ok(summary) => println!("✅ {summary}"),
                Err(e) => {
                    eprintln!("❌ Validation failed: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Check `document` against the schema for `kind` and describe the result.
fn validate(kind: DocumentKind, document: Value) -> anyhow::Result<String> {
    match kind {
        DocumentKind::Project => {
            let input: CreateProjectInput = serde_json::from_value(document)?;
            let project = input.into_project()?;
            Ok(format!("Project '{}' for {} is valid", project.name, project.company_name))
        }
        DocumentKind::GenerationInput => {
            let input: CreateGenerationInput = serde_json::from_value(document)?;
            let per_platform = input.variations_per_platform;
            let generation = input.into_generation()?;
            Ok(format!(
                "Generation request is valid: {} platform(s), {} variation(s) each",
                generation.platforms.len(),
                per_platform
            ))
        }
        DocumentKind::Generation => {
            let generation: Generation = serde_json::from_value(document)?;
            for ad in &generation.variations.google {
                ad.validate_limits()?;
            }
            Ok(format!(
                "Generation {} ({}) is valid: {} variation(s), {} tokens",
                generation.id,
                generation.status,
                generation.variations.total(),
                generation.token_usage.total()
            ))
        }
    }
}
