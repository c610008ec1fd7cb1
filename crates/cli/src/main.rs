use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use imagemesh_core::{
    load_config, validate_config, ImageUpload, JobApi, OpusClient, Orchestrator, PipelineReport,
    SanitizedConfig, Stage, StageOutcome,
};

/// Command-line arguments for imagemesh
#[derive(Parser, Debug)]
#[command(name = "imagemesh")]
#[command(about = "Turn an image into a GLB mesh and a Gaussian splat via the Opus API")]
#[command(version)]
struct Args {
    /// Image to upload
    image: PathBuf,

    /// Configuration file
    #[arg(short, long, default_value = "imagemesh.toml", env = "IMAGEMESH_CONFIG")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,imagemesh_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    // Load configuration
    info!("Loading configuration from {:?}", args.config);
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let sanitized = SanitizedConfig::from(&config);
    info!("Configuration loaded successfully");
    info!("API: {} (key configured: {})", sanitized.api.base_url, sanitized.api.api_key_configured);
    info!(
        "Polling every {} ms (max attempts: {})",
        config.polling.interval_ms, config.polling.max_attempts
    );

    let image = ImageUpload::from_path(&args.image)
        .await
        .with_context(|| format!("Failed to read image {:?}", args.image))?;

    let client: Arc<dyn JobApi> =
        Arc::new(OpusClient::new(&config.api).context("Failed to create API client")?);

    let orchestrator = Orchestrator::new(config.pipeline.clone(), config.polling.clone(), client);

    let report = tokio::select! {
        result = orchestrator.run(image) => result.context("Pipeline failed")?,
        _ = signal::ctrl_c() => {
            warn!("Interrupted, abandoning pipeline run");
            anyhow::bail!("interrupted");
        }
    };

    log_summary(&report);

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}

fn log_summary(report: &PipelineReport) {
    for stage in [Stage::Image, Stage::Glb, Stage::Gaussian] {
        match report.outcome(stage) {
            Some(StageOutcome::Completed) => {}
            Some(StageOutcome::Skipped) => info!("{} stage skipped", stage),
            Some(StageOutcome::Failed) => warn!("{} job failed on the remote service", stage),
            Some(StageOutcome::NoArtifact) => warn!("{} job finished without an asset", stage),
            None => {}
        }
    }

    if let Some(ref url) = report.preview_url {
        info!("Preview URL: {}", url);
    }
    if let Some(ref url) = report.glb_url {
        info!("GLB URL: {}", url);
    }
    if let Some(ref url) = report.gaussian_url {
        info!("Gaussian PLY URL: {}", url);
    }
}
