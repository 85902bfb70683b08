//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// logrelay - filtered log-line relay into an NSQ topic
#[derive(Parser, Debug)]
#[command(
    name = "logrelay",
    author,
    version,
    about = "Relay log lines from stdin to an NSQ topic",
    long_about = "Reads log lines from stdin and relays them to an nsqd daemon.\n\n\
                  Every line can be mirrored verbatim to stderr; lines that pass the\n\
                  configured regex and substring filters are published to the given\n\
                  topic, and optionally echoed to stdout for debugging."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "LOGRELAY_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "LOGRELAY_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Relay stdin to the configured NSQ topic
    Run(RunArgs),

    /// Validate the merged configuration without connecting
    Validate(ValidateArgs),
}

/// Configuration values shared by all commands; flags and environment
/// variables override the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Topic to send log lines to (required)
    #[arg(short, long, env = "LOGRELAY_TOPIC")]
    pub topic: Option<String>,

    /// TCP address of an nsqd daemon (e.g. `127.0.0.1:4150`)
    #[arg(short = 'a', long = "nsqd-tcp-address", env = "LOGRELAY_NSQD_ADDR")]
    pub nsqd_tcp_address: Option<String>,

    /// Reject log lines that do not match the regex
    #[arg(short = 'r', long = "regex-filter", env = "LOGRELAY_REGEX")]
    pub regex_filter: Option<String>,

    /// Reject lines without the substring; prefix with `!` to invert
    #[arg(short = 'c', long = "contains-filter", env = "LOGRELAY_CONTAINS")]
    pub contains_filter: Option<String>,

    /// Mirror all incoming lines to stderr as well
    #[arg(short = 'p', long = "print-log", env = "LOGRELAY_STDERR_LOGS")]
    pub print_log: bool,

    /// Echo published lines to stdout
    #[arg(short = 'e', long = "echo", env = "LOGRELAY_ECHO")]
    pub echo: bool,
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(long, env = "LOGRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Validate configuration and exit without connecting
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(long, env = "LOGRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
