//! `run` command implementation.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info};

use contracts::{PublishSink, RelayConfig};
use dispatcher::{Dispatcher, DispatcherConfig};
use filtering::LineFilter;
use nsq_producer::NsqProducer;

use crate::cli::RunArgs;
use crate::commands::build_config;

/// Execute the `run` command
pub async fn run_relay(args: &RunArgs) -> Result<()> {
    let cfg = build_config(&args.config, &args.overrides)?;

    info!(
        topic = %cfg.topic,
        nsqd_addr = %cfg.nsqd_addr,
        regex = cfg.regex.as_deref().unwrap_or("<none>"),
        contains = cfg.contains.as_deref().unwrap_or("<none>"),
        mirror = cfg.stderr_mirror,
        echo = cfg.debug_echo,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&cfg);
        return Ok(());
    }

    let filter = LineFilter::from_config(&cfg).context("Failed to compile line filter")?;

    let producer = NsqProducer::connect(&cfg.nsqd_addr)
        .await
        .with_context(|| format!("Failed to connect to nsqd at {}", cfg.nsqd_addr))?;

    let dispatcher = Dispatcher::new(DispatcherConfig::from_relay_config(&cfg), filter, producer);

    relay_stdin(dispatcher).await
}

/// Consume stdin line by line until EOF, dispatching each line.
///
/// Publish failures are reported per line and the relay keeps going; the
/// broker connection is closed once stdin is exhausted.
async fn relay_stdin<S: PublishSink>(mut dispatcher: Dispatcher<S>) -> Result<()> {
    let stdin = tokio::io::stdin();
    let mut segments = BufReader::new(stdin).split(b'\n');

    let mut lines: u64 = 0;
    let mut dispatch_errors: u64 = 0;

    while let Some(mut line) = segments
        .next_segment()
        .await
        .context("Failed to read from stdin")?
    {
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        lines += 1;

        if let Err(e) = dispatcher.write(&line).await {
            dispatch_errors += 1;
            error!(error = %e, bytes = e.bytes_written(), "Line dispatch failed");
        }
    }

    info!(lines, dispatch_errors, "Stdin closed, stopping relay");

    dispatcher
        .stop()
        .await
        .context("Failed to close broker connection")?;

    info!("logrelay finished");
    Ok(())
}

/// Print configuration summary for dry-run mode
fn print_config_summary(cfg: &RelayConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Broker:");
    println!("  nsqd: {}", cfg.nsqd_addr);
    println!("  Topic: {}", cfg.topic);
    println!("\nFilters:");
    println!("  Regex: {}", cfg.regex.as_deref().unwrap_or("<none>"));
    println!("  Contains: {}", cfg.contains.as_deref().unwrap_or("<none>"));
    println!("\nLocal output:");
    println!("  Mirror to stderr: {}", cfg.stderr_mirror);
    println!("  Echo to stdout: {}", cfg.debug_echo);
    println!();
}
