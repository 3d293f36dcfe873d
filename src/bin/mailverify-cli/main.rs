mod args;
mod input;
mod output;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::warn;

use mailverify_lib::{BatchOptions, CancelHandle, Verifier, VerifierConfig};

use crate::args::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = match &cli.config {
        Some(path) => VerifierConfig::from_path(path)?,
        None => VerifierConfig::default(),
    };
    if let Some(workers) = cli.workers {
        config.batch.workers = workers;
    }

    let addresses = input::read_addresses(&cli)?;
    let verifier = Verifier::new(config).context("invalid configuration")?;

    let cancel = CancelHandle::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupted, waiting for in-flight addresses");
                cancel.cancel();
            }
        })
    };

    let bar = ProgressBar::new(addresses.len() as u64);
    if cli.no_progress {
        bar.set_draw_target(ProgressDrawTarget::hidden());
    }
    bar.set_style(ProgressStyle::with_template(
        "{spinner} [{bar:40}] {pos}/{len} ({percent}%) {elapsed_precise}",
    )?);
    let sink = |done: usize, _total: usize| bar.set_position(done as u64);

    let options = BatchOptions { smtp: !cli.no_smtp };
    let report = verifier
        .verify_batch(addresses, options, &sink, &cancel)
        .await;
    interrupt.abort();
    bar.finish_and_clear();

    output::write_report(&report, cli.format, cli.out.as_deref())?;

    // codes de sortie : 0 tout Valid, 2 sinon, 1 fatal
    if report.all_valid() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(2))
    }
}
