//! Tracing subscriber setup.
//!
//! JSON lines by default; `LOG_DEVELOP_MODE=true` switches to the pretty
//! human-readable formatter. `RUST_LOG`, when set, overrides `LOG_LEVEL`.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(log: &LogConfig) -> anyhow::Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&log.level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if log.develop_mode {
        builder
            .pretty()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize pretty logger: {e}"))?;
    } else {
        builder
            .json()
            .with_current_span(true)
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize JSON logger: {e}"))?;
    }

    tracing::info!(level = %log.level, develop_mode = log.develop_mode, "Logging initialized");
    Ok(())
}

/// Filter directives for `level`, keeping sqlx's per-statement logs quiet.
fn default_directives(level: &str) -> String {
    format!("{level},sqlx=warn")
}
