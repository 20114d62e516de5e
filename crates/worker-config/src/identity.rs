//! Process identity resolution
//!
//! A worker learns its index in the cluster either from an explicit flag
//! or from the name its orchestrator gave it. Stateful sets name pods
//! `<statefulset>-<ordinal>`, and that ordinal is the process id.

use crate::{Error, Result};

/// Where a process id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Given explicitly on the command line
    Flag,

    /// Derived from the pod name's stateful set ordinal
    Orchestration,

    /// Nothing supplied; single process default
    Default,
}

/// This process's index and how it was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessIdentity {
    pub process_id: usize,
    pub source: IdentitySource,
}

/// Pod name paired with the stateful set it belongs to
#[derive(Debug, Clone, Copy)]
pub struct PodIdentity<'a> {
    pub pod_name: &'a str,
    pub statefulset_name: &'a str,
}

impl ProcessIdentity {
    /// Identity of a process that was told nothing
    pub const DEFAULT: Self = Self {
        process_id: 0,
        source: IdentitySource::Default,
    };

    /// Resolve an identity, preferring the explicit value over the pod name.
    pub fn resolve(explicit: Option<&str>, pod: Option<PodIdentity<'_>>) -> Result<Self> {
        if let Some(raw) = explicit {
            return Ok(Self {
                process_id: parse_process_id(raw)?,
                source: IdentitySource::Flag,
            });
        }

        match pod {
            Some(pod) => Ok(Self {
                process_id: pod.ordinal()?,
                source: IdentitySource::Orchestration,
            }),
            None => Ok(Self::DEFAULT),
        }
    }

    /// Check this identity against the resolved address list.
    ///
    /// With peers the id must index into them. Without peers the cluster
    /// is a single process, so an explicit id other than 0 is rejected.
    /// Orchestration-derived ids are left alone in that case since the
    /// cluster size is not known here.
    pub fn validate(&self, addresses: Option<&[String]>) -> Result<()> {
        let cluster_size = match addresses {
            Some(addresses) if !addresses.is_empty() => addresses.len(),
            _ if self.source == IdentitySource::Flag => 1,
            _ => return Ok(()),
        };

        if self.process_id >= cluster_size {
            return Err(Error::ProcessIdOutOfRange {
                process_id: self.process_id,
                cluster_size,
            });
        }
        Ok(())
    }
}

impl PodIdentity<'_> {
    /// Extract the stateful set ordinal from the pod name
    pub fn ordinal(&self) -> Result<usize> {
        let unrecognized = || Error::UnrecognizedPodName {
            pod_name: self.pod_name.to_string(),
            statefulset_name: self.statefulset_name.to_string(),
        };

        if self.statefulset_name.is_empty() {
            return Err(unrecognized());
        }

        let suffix = self
            .pod_name
            .strip_prefix(self.statefulset_name)
            .and_then(|rest| rest.strip_prefix('-'))
            .ok_or_else(unrecognized)?;

        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unrecognized());
        }

        suffix.parse().map_err(|_| unrecognized())
    }
}

fn parse_process_id(raw: &str) -> Result<usize> {
    raw.parse().map_err(|_| Error::InvalidProcessId {
        value: raw.to_string(),
    })
}
