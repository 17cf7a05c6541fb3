use anyhow::{Context, Result};
use std::{fs::File, path::Path, sync::Mutex};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directives, e.g. `RIPPLEFISH_LOG=ripplefish=debug`.
pub(crate) const LOG_ENV: &str = "RIPPLEFISH_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a file-backed subscriber. Without a path nothing is installed and
/// events are discarded, since the terminal belongs to the renderer.
pub(crate) fn init_tracing(path: Option<&Path>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file));
    Registry::default()
        .with(filter())
        .with(fmt_layer)
        .try_init()
        .context("tracing has already been initialised")?;
    Ok(())
}
