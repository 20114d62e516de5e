//! Command line surface of `dataflow-run`
//!
//! Values are captured as raw strings and handed to the resolver
//! untouched, so parse failures report exactly what was typed.

use std::path::PathBuf;

use clap::Parser;
use worker_config::{EnvKeys, Flags};

#[derive(Parser, Debug)]
#[command(
    name = "dataflow-run",
    about = "Resolve the startup configuration of a dataflow worker process"
)]
pub struct Args {
    /// Dataflow to run, as `<file or module>:<attribute>`,
    /// e.g. `examples/basic.py:flow` or `examples.basic:flow`
    #[arg(value_name = "IMPORT_STR")]
    pub import_str: String,

    /// Index of this process in the cluster
    #[arg(short = 'p', long, allow_hyphen_values = true)]
    pub process_id: Option<String>,

    /// Addresses of every process in the cluster, joined with `;`
    #[arg(short = 'a', long)]
    pub addresses: Option<String>,

    /// Directory holding recovery state; recovery is off without it
    #[arg(short = 'r', long)]
    pub recovery_directory: Option<PathBuf>,

    /// Seconds between state snapshots
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub snapshot_interval: Option<String>,

    /// Seconds between backups; 0 disables backups
    #[arg(short = 'b', long, allow_hyphen_values = true)]
    pub backup_interval: Option<String>,

    /// Worker threads to start in this process
    #[arg(short = 'w', long, allow_hyphen_values = true)]
    pub workers_per_process: Option<String>,

    /// Prefix for HOSTFILE_PATH, POD_NAME and STATEFULSET_NAME
    #[arg(long, value_name = "PREFIX")]
    pub env_prefix: Option<String>,
}

impl Args {
    /// Raw flag values for the resolver
    pub fn flags(&self) -> Flags {
        Flags {
            import_str: self.import_str.clone(),
            process_id: self.process_id.clone(),
            addresses: self.addresses.clone(),
            recovery_directory: self.recovery_directory.clone(),
            snapshot_interval: self.snapshot_interval.clone(),
            backup_interval: self.backup_interval.clone(),
            workers_per_process: self.workers_per_process.clone(),
        }
    }

    /// Environment keys to read, honoring `--env-prefix`
    pub fn env_keys(&self) -> EnvKeys {
        EnvKeys::prefixed(self.env_prefix.as_deref().unwrap_or_default())
    }
}
