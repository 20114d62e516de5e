//! Configuration resolution
//!
//! Merges command line flags, orchestration environment variables and an
//! optional hostfile into a [`Config`]. Per field, the first source that
//! has a value wins:
//!
//! 1. explicit flag
//! 2. environment variable
//! 3. hostfile contents
//! 4. built-in default
//!
//! Every value is parsed before the `Config` is built, and the first
//! failure aborts resolution.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::config::{Config, ConfigParts, Flags, ADDRESS_SEPARATOR};
use crate::duration::parse_seconds;
use crate::hostfile::read_hostfile;
use crate::identity::{PodIdentity, ProcessIdentity};
use crate::import_spec::parse_import_spec;
use crate::source::{ConfigSource, EnvKeys};
use crate::{Error, Result};

/// Resolves [`Flags`] against a [`ConfigSource`]
pub struct ConfigResolver<S> {
    source: S,
    keys: EnvKeys,
}

impl<S: ConfigSource> ConfigResolver<S> {
    /// Create a resolver reading the default environment keys
    pub fn new(source: S) -> Self {
        Self {
            source,
            keys: EnvKeys::default(),
        }
    }

    /// Set the environment keys to read
    pub fn env_keys(mut self, keys: EnvKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Resolve a complete configuration or fail with the first error
    pub fn resolve(&self, flags: &Flags) -> Result<Config> {
        let import = parse_import_spec(&flags.import_str)?;

        let snapshot_interval = flags
            .snapshot_interval
            .as_deref()
            .map(|raw| parse_seconds("snapshot_interval", raw))
            .transpose()?;

        let backup_interval = flags
            .backup_interval
            .as_deref()
            .map(|raw| parse_seconds("backup_interval", raw))
            .transpose()?;
        if backup_interval.is_some_and(|d| d.is_zero()) {
            debug!("Backups disabled by zero backup interval");
        }

        let workers_per_process = match flags.workers_per_process.as_deref() {
            Some(raw) => parse_worker_count(raw)?,
            None => 1,
        };

        let addresses = self.resolve_addresses(flags)?;
        let cluster_size = addresses.as_ref().map_or(1, Vec::len);
        if workers_per_process.checked_mul(cluster_size).is_none() {
            return Err(Error::InvalidWorkerCount {
                value: flags.workers_per_process.clone().unwrap_or_default(),
            });
        }

        let identity = self.resolve_identity(flags)?;
        identity.validate(addresses.as_deref())?;

        info!(
            process_id = identity.process_id,
            identity_source = ?identity.source,
            cluster_size,
            workers_per_process,
            module = %import.module,
            attribute = %import.attribute,
            recovery_directory = ?flags.recovery_directory,
            "Resolved worker configuration"
        );

        Ok(ConfigParts {
            process_id: identity.process_id,
            addresses,
            workers_per_process,
            recovery_directory: flags.recovery_directory.clone(),
            snapshot_interval,
            backup_interval,
            import_module: import.module,
            import_attribute: import.attribute,
        }
        .into())
    }

    fn resolve_addresses(&self, flags: &Flags) -> Result<Option<Vec<String>>> {
        let hostfile = self.source.var(&self.keys.hostfile_path);

        if let Some(raw) = flags.addresses.as_deref() {
            if let Some(path) = hostfile {
                warn!(
                    hostfile = %path,
                    "--addresses given; ignoring {}", self.keys.hostfile_path
                );
            }
            let addresses = split_addresses(raw);
            debug!(source = "flag", count = addresses.len(), "Resolved addresses");
            return Ok(non_empty(addresses));
        }

        if let Some(path) = hostfile {
            let addresses = read_hostfile(&self.source, Path::new(&path))?;
            if addresses.is_empty() {
                warn!(hostfile = %path, "Hostfile lists no addresses");
            }
            debug!(source = "hostfile", count = addresses.len(), "Resolved addresses");
            return Ok(non_empty(addresses));
        }

        debug!(source = "default", "No addresses; running as a single process");
        Ok(None)
    }

    fn resolve_identity(&self, flags: &Flags) -> Result<ProcessIdentity> {
        if flags.process_id.is_some() {
            let shadowed: Vec<&str> = [&self.keys.pod_name, &self.keys.statefulset_name]
                .into_iter()
                .filter(|key| self.source.var(key).is_some())
                .map(String::as_str)
                .collect();
            if !shadowed.is_empty() {
                warn!(
                    shadowed = ?shadowed,
                    "--process-id given; ignoring orchestration pod identity"
                );
            }
            return ProcessIdentity::resolve(flags.process_id.as_deref(), None);
        }

        let pod_name = self.source.var(&self.keys.pod_name);
        let statefulset_name = self.source.var(&self.keys.statefulset_name);

        match (pod_name.as_deref(), statefulset_name.as_deref()) {
            (Some(pod_name), Some(statefulset_name)) => {
                let identity = ProcessIdentity::resolve(
                    None,
                    Some(PodIdentity {
                        pod_name,
                        statefulset_name,
                    }),
                )?;
                debug!(
                    source = "orchestration",
                    pod_name,
                    process_id = identity.process_id,
                    "Resolved process id"
                );
                Ok(identity)
            }
            (Some(_), None) | (None, Some(_)) => {
                warn!(
                    "Only one of {} and {} is set; defaulting process id to 0",
                    self.keys.pod_name, self.keys.statefulset_name
                );
                Ok(ProcessIdentity::DEFAULT)
            }
            (None, None) => Ok(ProcessIdentity::DEFAULT),
        }
    }
}

/// Resolve `flags` against `source` using the default environment keys
pub fn resolve<S: ConfigSource>(flags: &Flags, source: S) -> Result<Config> {
    ConfigResolver::new(source).resolve(flags)
}

/// Split a `;`-joined address list, dropping blank entries
pub fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(ADDRESS_SEPARATOR)
        .map(str::trim)
        .filter(|addr| !addr.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_empty(addresses: Vec<String>) -> Option<Vec<String>> {
    (!addresses.is_empty()).then_some(addresses)
}

fn parse_worker_count(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(Error::InvalidWorkerCount {
            value: raw.to_string(),
        }),
    }
}
