use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use patterns_core::{CapabilityTier, ModelCapability, PatternsConfig};
use patterns_llm::LlmClient;
use patterns_pipeline::{
    FeatureOrchestrator, OneShot, ParallelReview, Router, SequentialGate, TranslationLoop,
};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "patterns")]
#[command(about = "Run agent coordination patterns against an OpenAI-compatible model", long_about = None)]
struct Cli {
    #[command(flatten)]
    model: ModelArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for values otherwise read from `PATTERNS_*` environment variables.
#[derive(Args)]
struct ModelArgs {
    /// Model used for the light capability tier
    #[arg(long, global = true)]
    light_model: Option<String>,

    /// Model used for the standard capability tier
    #[arg(long, global = true)]
    standard_model: Option<String>,

    /// OpenAI-compatible API base URL
    #[arg(long, global = true)]
    api_base: Option<String>,

    /// Per-call timeout in seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Maximum concurrent worker calls for `implement`
    #[arg(long, global = true)]
    max_workers: Option<usize>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Tier {
    Light,
    Standard,
}

impl From<Tier> for CapabilityTier {
    fn from(tier: Tier) -> Self {
        match tier {
            Tier::Light => CapabilityTier::Light,
            Tier::Standard => CapabilityTier::Standard,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Single text generation call
    Generate {
        #[arg(short, long)]
        prompt: String,

        /// System instruction
        #[arg(short, long)]
        system: Option<String>,

        #[arg(long, value_enum, default_value = "standard")]
        tier: Tier,
    },

    /// Single structured call producing a random weather report
    Weather {
        /// Date the report is for, e.g. 2025-06-01
        #[arg(short, long)]
        date: String,
    },

    /// Write marketing copy, check it, and rewrite once if it falls short
    Sequential {
        #[arg(short, long)]
        topic: String,
    },

    /// Classify a customer query and answer it with the matching specialist
    Route {
        #[arg(short, long)]
        query: String,
    },

    /// Run security, performance and maintainability reviews in parallel
    Review {
        /// File to review (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Plan a feature and implement each planned file concurrently
    Implement {
        #[arg(short, long)]
        goal: String,
    },

    /// Translate with an evaluate-and-refine loop
    Translate {
        #[arg(short, long)]
        text: String,

        /// Target language, e.g. "Spanish"
        #[arg(short = 'l', long)]
        target: String,
    },
}

fn load_config(args: ModelArgs) -> Result<PatternsConfig> {
    let mut config = PatternsConfig::from_env().context("Invalid PATTERNS_* environment")?;

    if let Some(model) = args.light_model {
        config.models.light = model;
    }
    if let Some(model) = args.standard_model {
        config.models.standard = model;
    }
    if let Some(base) = args.api_base {
        config.api_base = Some(base);
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(max) = args.max_workers {
        config.max_concurrent_workers = max;
    }

    config.validate()?;
    Ok(config)
}

fn read_artifact(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.model)?;
    info!(
        "Using models light={} standard={}",
        config.models.light, config.models.standard
    );

    let capability: Arc<dyn ModelCapability> = Arc::new(LlmClient::new(&config)?);

    match cli.command {
        Commands::Generate { prompt, system, tier } => {
            let text = OneShot::new(capability)
                .text(&prompt, system.as_deref(), tier.into())
                .await?;
            print_json(&serde_json::json!({ "text": text }))?
        }
        Commands::Weather { date } => print_json(&OneShot::new(capability).weather_report(&date).await?)?,
        Commands::Sequential { topic } => {
            print_json(&SequentialGate::new(capability).run(&topic).await?)?
        }
        Commands::Route { query } => print_json(&Router::new(capability).run(&query).await?)?,
        Commands::Review { file } => {
            let artifact = read_artifact(file)?;
            print_json(&ParallelReview::new(capability).run(&artifact).await?)?
        }
        Commands::Implement { goal } => {
            let orchestrator = FeatureOrchestrator::new(capability)
                .with_max_concurrent_workers(config.max_concurrent_workers);
            print_json(&orchestrator.run(&goal).await?)?
        }
        Commands::Translate { text, target } => {
            print_json(&TranslationLoop::new(capability).run(&text, &target).await?)?
        }
    }

    Ok(())
}
