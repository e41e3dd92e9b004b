use std::process::ExitCode;

use clap::Parser;

mod app;
mod config;

use config::Args;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    env_logger::init();

    let args = Args::parse();
    let outcome = app::run(&args)?;

    if outcome.agrees() {
        Ok(ExitCode::SUCCESS)
    } else {
        log::error!("{} mismatched pixels", outcome.mismatches);
        Ok(ExitCode::FAILURE)
    }
}
