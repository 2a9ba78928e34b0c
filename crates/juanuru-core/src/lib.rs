pub mod config;
pub mod error;

pub use config::{
    Config, CostConfig, DeviceConfig, LiveConfig, MissingFieldPolicy, ShareConfig,
    StorageConfig, ValidationResult,
};
pub use error::{
    AppError, ConfigError, DeviceError, NetworkError, ReqwestErrorExt, StorageError,
};

use anyhow::Result;

/// Initialize tracing/logging.
///
/// Honors `RUST_LOG`; otherwise logs at `info` (or `debug` when `verbose`).
/// Output goes to stderr so rendered widget output on stdout stays clean.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("JuaNuru logging initialized");
    Ok(())
}
