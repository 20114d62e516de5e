//! Resolved worker configuration types

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Separator used when an address list travels as a single string
pub const ADDRESS_SEPARATOR: &str = ";";

/// Snapshot interval used when recovery is on but no interval was given
pub const DEFAULT_SNAPSHOT_INTERVAL: Duration = Duration::from_secs(10);

/// Raw command line values, before any parsing
///
/// Everything except the recovery directory is kept as the string the
/// user typed so that failures can report it verbatim.
#[derive(Debug, Clone, Default)]
pub struct Flags {
    /// `<location>:<attribute>` naming the dataflow to run
    pub import_str: String,

    /// `--process-id`
    pub process_id: Option<String>,

    /// `--addresses`, `;`-joined `host:port` entries
    pub addresses: Option<String>,

    /// `--recovery-directory`
    pub recovery_directory: Option<PathBuf>,

    /// `--snapshot-interval`, seconds
    pub snapshot_interval: Option<String>,

    /// `--backup-interval`, seconds; `0` disables backups
    pub backup_interval: Option<String>,

    /// `--workers-per-process`
    pub workers_per_process: Option<String>,
}

impl Flags {
    /// Flags with only the import specifier set
    pub fn new(import_str: impl Into<String>) -> Self {
        Self {
            import_str: import_str.into(),
            ..Self::default()
        }
    }
}

/// Fully resolved configuration for one worker process
///
/// Built once at startup by [`crate::resolve`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    process_id: usize,
    addresses: Option<Vec<String>>,
    workers_per_process: usize,
    recovery_directory: Option<PathBuf>,
    #[serde(with = "seconds_serde")]
    snapshot_interval: Option<Duration>,
    #[serde(with = "seconds_serde")]
    backup_interval: Option<Duration>,
    import_module: String,
    import_attribute: String,
}

/// Everything the resolver assembles, handed over in one piece
#[derive(Debug)]
pub(crate) struct ConfigParts {
    pub process_id: usize,
    pub addresses: Option<Vec<String>>,
    pub workers_per_process: usize,
    pub recovery_directory: Option<PathBuf>,
    pub snapshot_interval: Option<Duration>,
    pub backup_interval: Option<Duration>,
    pub import_module: String,
    pub import_attribute: String,
}

impl From<ConfigParts> for Config {
    fn from(parts: ConfigParts) -> Self {
        Self {
            process_id: parts.process_id,
            addresses: parts.addresses,
            workers_per_process: parts.workers_per_process,
            recovery_directory: parts.recovery_directory,
            snapshot_interval: parts.snapshot_interval,
            backup_interval: parts.backup_interval,
            import_module: parts.import_module,
            import_attribute: parts.import_attribute,
        }
    }
}

impl Config {
    /// This worker's index within the cluster
    pub fn process_id(&self) -> usize {
        self.process_id
    }

    /// Every peer's `host:port`, in discovery order; `None` for single process runs
    pub fn addresses(&self) -> Option<&[String]> {
        self.addresses.as_deref()
    }

    /// Addresses joined with `;`, the form the network layer takes
    pub fn addresses_joined(&self) -> Option<String> {
        self.addresses
            .as_ref()
            .map(|addrs| addrs.join(ADDRESS_SEPARATOR))
    }

    /// Number of processes in the cluster
    pub fn cluster_size(&self) -> usize {
        self.addresses.as_ref().map_or(1, Vec::len)
    }

    pub fn is_single_process(&self) -> bool {
        self.cluster_size() == 1
    }

    /// Worker threads started in this process
    pub fn workers_per_process(&self) -> usize {
        self.workers_per_process
    }

    /// Worker threads across the whole cluster
    pub fn worker_count(&self) -> usize {
        self.workers_per_process * self.cluster_size()
    }

    pub fn recovery_directory(&self) -> Option<&Path> {
        self.recovery_directory.as_deref()
    }

    /// Snapshot interval as given; `None` means the engine default
    pub fn snapshot_interval(&self) -> Option<Duration> {
        self.snapshot_interval
    }

    /// Backup interval as given; `Some(Duration::ZERO)` means disabled
    pub fn backup_interval(&self) -> Option<Duration> {
        self.backup_interval
    }

    pub fn backup_policy(&self) -> BackupPolicy {
        BackupPolicy::from_interval(self.backup_interval)
    }

    /// Dotted module locator holding the dataflow
    pub fn import_module(&self) -> &str {
        &self.import_module
    }

    /// Attribute within [`Config::import_module`]
    pub fn import_attribute(&self) -> &str {
        &self.import_attribute
    }

    /// Recovery settings, present only when a recovery directory was given
    pub fn recovery(&self) -> Option<RecoveryConfig> {
        let directory = self.recovery_directory.clone()?;
        Some(RecoveryConfig {
            directory,
            snapshot_interval: self.snapshot_interval.unwrap_or(DEFAULT_SNAPSHOT_INTERVAL),
            backup: self.backup_policy(),
        })
    }
}

/// What the recovery subsystem needs to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Where recovery partitions live
    pub directory: PathBuf,

    /// How often state snapshots are taken
    pub snapshot_interval: Duration,

    /// Backup schedule
    pub backup: BackupPolicy,
}

/// How often recovery state is backed up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupPolicy {
    /// No interval given; use the recovery subsystem's default
    Default,

    /// Interval of exactly zero: backups are turned off
    Disabled,

    /// Back up on this interval
    Every(Duration),
}

impl BackupPolicy {
    /// Interpret a parsed `--backup-interval`
    pub fn from_interval(interval: Option<Duration>) -> Self {
        match interval {
            None => BackupPolicy::Default,
            Some(d) if d.is_zero() => BackupPolicy::Disabled,
            Some(d) => BackupPolicy::Every(d),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, BackupPolicy::Disabled)
    }
}

/// Optional durations serialized as whole seconds
mod seconds_serde {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(d) => serializer.serialize_some(&d.as_secs()),
            None => serializer.serialize_none(),
        }
    }
}
