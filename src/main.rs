use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use juanuru_core::{AppError, Config, ConfigError, DeviceError};
use juanuru_live::{FileStore, HtmlFileTarget, LiveDataWidget, LiveView, RenderTarget, TerminalTarget};
use juanuru_ui::{
    Badge, Clipboard, CommandClipboard, CommandRecognizer, CostBinding, CostEstimator,
    ShareComposer, StdoutNotifier, StdoutSink, VoiceCapture,
};

/// JuaNuru - solar feasibility companion
#[derive(Debug, Parser)]
#[command(name = "juanuru", version, about)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch and show live solar data, falling back to the last good reading
    Live {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Override `live.base_url`
        #[arg(long)]
        base_url: Option<String>,
        /// Write the HTML fragment here instead of printing text
        #[arg(long)]
        html_out: Option<PathBuf>,
    },
    /// Copy share text for a solar score to the clipboard
    Share {
        #[arg(long)]
        score: String,
        #[arg(long)]
        place: String,
        /// Defaults to the badge earned by a whole-number score
        #[arg(long)]
        badge: Option<String>,
    },
    /// Estimate the monthly cost of a system size
    Cost {
        #[arg(long, allow_hyphen_values = true)]
        size: String,
    },
    /// Fill the place field by voice
    Voice,
}

/// Used when no clipboard command is configured; sharing still acknowledges.
struct UnconfiguredClipboard;

impl Clipboard for UnconfiguredClipboard {
    fn write_text(&self, _text: &str) -> Result<(), DeviceError> {
        Err(DeviceError::NotConfigured("devices.clipboard_command"))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = juanuru_core::init_logging(cli.verbose) {
        eprintln!("{}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if let Some(path) = &cli.config {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()).into());
        }
    }
    let (mut config, _) = Config::load_validated(cli.config.as_deref())?;

    match cli.command {
        Command::Live {
            lat,
            lon,
            base_url,
            html_out,
        } => {
            if let Some(url) = base_url {
                config.live.base_url = url;
                let validation = config.validate();
                if !validation.is_valid() {
                    return Err(ConfigError::Invalid(validation.error_summary()).into());
                }
            }

            let store = FileStore::new(&config.storage.data_dir);
            tracing::debug!("Cache slot directory: {}", store.dir().display());

            let target: Arc<dyn RenderTarget> = match html_out {
                Some(path) => Arc::new(HtmlFileTarget::new(path)),
                None => Arc::new(TerminalTarget),
            };

            let widget = LiveDataWidget::from_config(&config.live, Arc::new(store), target)?;

            let view = widget.fetch_and_render(lat, lon).await;
            match view {
                LiveView::Live(_) => tracing::info!("Live data updated"),
                LiveView::Cached(_) => tracing::info!("Showing cached live data"),
                LiveView::Unavailable => tracing::info!("Live data unavailable"),
            }
            if let Some(reading) = view.reading() {
                tracing::debug!(?reading, "Rendered reading");
            }
        }
        Command::Share {
            score,
            place,
            badge,
        } => {
            let badge = match badge {
                Some(b) => b,
                None => score
                    .trim()
                    .parse::<u32>()
                    .map(|s| Badge::for_score(s).to_string())
                    .map_err(|_| {
                        anyhow::anyhow!("--badge is required when the score is not a whole number")
                    })?,
            };

            let clipboard: Arc<dyn Clipboard> = match config
                .devices
                .clipboard_command
                .clone()
                .and_then(CommandClipboard::new)
            {
                Some(c) => Arc::new(c),
                None => Arc::new(UnconfiguredClipboard),
            };

            let composer =
                ShareComposer::new(config.share.app_name.clone(), clipboard, Arc::new(StdoutNotifier));
            composer.share_results(&score, &badge, &place);
        }
        Command::Cost { size } => {
            let estimator = CostEstimator::new(config.cost.rate_per_kw);
            tracing::debug!("Cost rate: {} per kW", estimator.rate_per_kw());
            let binding = CostBinding::new(
                estimator,
                Arc::new(StdoutSink::new("Monthly cost")),
            );
            if binding.on_input(&size).is_none() {
                return Err(anyhow::anyhow!("System size must be a number, got {:?}", size).into());
            }
        }
        Command::Voice => {
            let recognizer = config
                .devices
                .speech_command
                .clone()
                .and_then(CommandRecognizer::new)
                .ok_or(DeviceError::NotConfigured("devices.speech_command"))?;

            let capture = VoiceCapture::new(Arc::new(recognizer), Arc::new(StdoutSink::new("place")));
            capture.activate()?;
        }
    }

    Ok(())
}
