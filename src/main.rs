use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use gigstress::api::{start_api_server, AppState};
use gigstress::config::{AppConfig, LoggingConfig};
use gigstress::error::{GigstressError, Result};
use gigstress::services::ensure_model_available;
use gigstress::{StressPredictor, WorkerFeatures};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Financial stress prediction service
#[derive(Parser, Debug)]
#[command(name = "gigstress")]
#[command(author, version, about = "Financial stress prediction API for gig economy workers")]
struct Cli {
    /// Configuration directory
    #[arg(short, long, default_value = "config")]
    config: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the prediction API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// One-shot prediction from a JSON payload file
    Predict {
        /// Path to a worker-features JSON file
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print model information
    Info,
    /// Download the model artifact if it is missing
    FetchModel,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match AppConfig::load_from(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration ({e}); using defaults");
            AppConfig::default()
        }
    };
    init_logging(&config.logging);

    if let Err(errors) = config.validate() {
        for msg in &errors {
            error!("Invalid configuration: {msg}");
        }
        return Err(GigstressError::Validation(errors.join("; ")));
    }

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => run_serve(config, port).await,
        Commands::Predict { input } => run_predict(config, &input),
        Commands::Info => run_info(config),
        Commands::FetchModel => run_fetch(config).await,
    }
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));
    if config.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn run_serve(config: AppConfig, port_override: Option<u16>) -> Result<()> {
    info!("Starting financial stress prediction service");

    if !ensure_model_available(&config.model).await? {
        return Err(GigstressError::ArtifactMissing(format!(
            "{} (set model.url or GIGSTRESS_MODEL__URL to enable download)",
            config.model.path
        )));
    }

    let predictor = Arc::new(StressPredictor::load(&config.model.path)?);
    let state = AppState::new(predictor, config.limits.max_batch_size);

    let port = port_override.unwrap_or(config.server.port);
    start_api_server(state, &config.server.host, port).await
}

fn run_predict(config: AppConfig, input: &PathBuf) -> Result<()> {
    let payload = std::fs::read_to_string(input)?;
    let features: WorkerFeatures = serde_json::from_str(&payload)?;

    if let Err(violations) = features.validate() {
        return Err(GigstressError::Validation(violations.join("; ")));
    }

    let predictor = StressPredictor::load(&config.model.path)?;
    let prediction = predictor.predict_single(&features)?;

    let output = serde_json::json!({
        "worker_id": features.worker_id,
        "predicted_stress_level": prediction.stress_level,
        "prediction_probabilities": prediction.probabilities,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run_info(config: AppConfig) -> Result<()> {
    let predictor = StressPredictor::load(&config.model.path)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&predictor.model_info())?
    );
    Ok(())
}

async fn run_fetch(config: AppConfig) -> Result<()> {
    if ensure_model_available(&config.model).await? {
        info!("Model artifact ready at {}", config.model.path);
        Ok(())
    } else {
        Err(GigstressError::ArtifactMissing(format!(
            "{} (no model.url configured)",
            config.model.path
        )))
    }
}
