//! `mailtodo` - turn a stored email into a VTODO task.
//!
//! Reads one message, derives a task from its subject, date and body, and
//! writes `<uid>.ics` into a calendar folder (for example a vdirsyncer or
//! Nextcloud Tasks directory).

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mailtodo_core::{Converter, write_todo};

use cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "mailtodo=debug,mailtodo_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    debug!(?config, email_file = %cli.email_file.display(), "Starting conversion");

    let conversion = Converter::new(&config)
        .convert_file(&cli.email_file)
        .context("Cannot convert email")?;
    for diagnostic in &conversion.diagnostics {
        debug!(%diagnostic, "Degraded");
    }

    let path = write_todo(&cli.cal_path, &conversion).context("Cannot create todo file")?;
    debug!(path = %path.display(), uid = %conversion.record.uid, "Done");

    Ok(())
}
