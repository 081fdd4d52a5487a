use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use wellbeing_assess::config::{CliOverrides, Config, OutputFormat, RuntimeConfig, load_env_file};
use wellbeing_assess::inference::load_artifacts;
use wellbeing_assess::questionnaire::ReaderInput;
use wellbeing_assess::session::run_session;

#[derive(Parser)]
#[command(name = "wellbeing-assess")]
#[command(about = "Interactive mental health self-assessment")]
struct Cli {
    /// TOML configuration file (default: $WELLBEING_CONFIG or wellbeing.toml)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Trained model artifact (JSON)
    #[arg(long)]
    model: Option<PathBuf>,
    /// Label encoder artifact (JSON)
    #[arg(long)]
    encoder: Option<PathBuf>,
    /// Report format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
    /// Skip the welcome banner
    #[arg(long)]
    quiet_banner: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    load_env_file();
    let runtime = RuntimeConfig::load_from_env();
    tracing_subscriber::fmt()
        .with_env_filter(runtime.log_level.as_str())
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let overrides = CliOverrides {
        model_path: cli.model,
        encoder_path: cli.encoder,
        format: cli.format,
        hide_banner: cli.quiet_banner,
    };
    let config = Config::load(cli.config.as_deref(), &overrides)?;
    debug!(?config, "Configuration resolved");

    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, cancelling assessment");
            signal_token.cancel();
        }
    });

    let artifacts = config.artifacts.clone();
    let output = config.output.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        run_session(
            || load_artifacts(&artifacts),
            ReaderInput::stdin(),
            &mut out,
            cancel,
            &output,
        )
    })
    .await
    .map_err(|_| anyhow::anyhow!("Assessment task panicked"))?;

    debug!(?outcome, "Session finished");
    Ok(())
}
