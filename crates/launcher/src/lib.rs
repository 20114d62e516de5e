//! Launcher - command line entry point for dataflow worker processes
//!
//! Parses the process arguments, resolves them against the environment
//! and hostfile, and emits the resulting configuration as JSON for the
//! execution engine that runs the dataflow.

pub mod cli;

use std::io::Write;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use worker_config::{Config, ConfigResolver, ConfigSource};

pub use cli::Args;

const DEFAULT_LOG_FILTER: &str = "launcher=info,worker_config=info";

/// Install a stderr subscriber; stdout carries the resolved config
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve `args` against `source`
pub fn resolve<S: ConfigSource>(args: &Args, source: S) -> worker_config::Result<Config> {
    ConfigResolver::new(source)
        .env_keys(args.env_keys())
        .resolve(&args.flags())
}

/// Write `config` as pretty JSON followed by a newline
pub fn write_config<W: Write>(config: &Config, mut out: W) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut out, config)?;
    writeln!(out)?;
    Ok(())
}
