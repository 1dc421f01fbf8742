mod album;
mod app;
mod cli;
mod ffmpeg;
mod logging;
mod media;
mod plan;
mod timecode;

use anyhow::Result;
use clap::{Parser, error::ErrorKind};

fn main() -> Result<()> {
    let args = match cli::Args::try_parse() {
        Ok(args) => args,
        // Running without arguments shows the help and is not an error.
        Err(e) if e.kind() == ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            e.print()?;
            return Ok(());
        }
        Err(e) => e.exit(),
    };

    let level = std::env::var(logging::LOG_LEVEL_VAR).ok();
    logging::init(logging::LogLevel::from_var(level.as_deref())?);

    app::run(args)
}
