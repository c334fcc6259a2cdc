//! CLI command definitions for the `gwire` binary.

pub mod alert;
pub mod sign;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// GuardDuty alerting and one-click EC2 quarantine.
#[derive(Parser)]
#[command(name = "gwire", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a TOML config file (defaults to ./guardwire.toml if present).
    #[arg(long, global = true, env = "GUARDWIRE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log errors only. `alert` prints failed deliveries instead of the full report.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export spans to stdout via OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on.
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },

    /// Run the alert pipeline once for a finding event file.
    Alert {
        /// JSON file holding `{"detail": {...}}`.
        file: PathBuf,
    },

    /// Print the request signature for a body (debugging aid).
    Sign {
        /// Request timestamp in seconds (defaults to now).
        #[arg(long)]
        timestamp: Option<i64>,

        /// Raw request body, exactly as it will be sent.
        body: String,
    },
}
