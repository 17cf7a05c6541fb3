mod app;
mod chain;
mod config;
mod glyph;
mod input;
mod logging;
mod model;
mod render;
mod sim;
mod target;
mod wave;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = config::Args::parse();
    let settings = config::resolve_settings(&args)?;
    logging::init_tracing(args.log_file.as_deref())?;
    app::run(settings)
}
