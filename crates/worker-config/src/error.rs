//! Error types for worker configuration resolution

use thiserror::Error;

/// Result type alias using the resolution Error
pub type Result<T> = std::result::Result<T, Error>;

/// Configuration resolution error
///
/// Every variant carries the raw input that caused it so the launch
/// command or environment can be corrected by whoever owns the process.
#[derive(Error, Debug)]
pub enum Error {
    // Interval errors
    #[error("Invalid duration for {field}: {value:?} is not a non-negative whole number of seconds")]
    InvalidDuration { field: &'static str, value: String },

    // Import errors
    #[error("Invalid import specifier {value:?}: {reason}")]
    InvalidImportSpecifier { value: String, reason: String },

    // Topology errors
    #[error("Hostfile not found or unreadable: {path} ({reason})")]
    HostfileNotFound { path: String, reason: String },

    #[error("Unrecognized pod name {pod_name:?}: expected \"{statefulset_name}-<ordinal>\"")]
    UnrecognizedPodName {
        pod_name: String,
        statefulset_name: String,
    },

    #[error("Process id {process_id} out of range for a cluster of {cluster_size} process(es)")]
    ProcessIdOutOfRange {
        process_id: usize,
        cluster_size: usize,
    },

    #[error("Invalid process id {value:?}: expected a non-negative integer")]
    InvalidProcessId { value: String },

    #[error("Invalid workers per process {value:?}: expected a positive integer")]
    InvalidWorkerCount { value: String },
}

impl Error {
    /// Configuration errors never succeed on retry
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Every resolution error aborts startup
    pub fn is_fatal(&self) -> bool {
        true
    }

    /// The offending raw input, verbatim
    pub fn raw_input(&self) -> String {
        match self {
            Error::InvalidDuration { value, .. }
            | Error::InvalidImportSpecifier { value, .. }
            | Error::InvalidProcessId { value }
            | Error::InvalidWorkerCount { value } => value.clone(),
            Error::HostfileNotFound { path, .. } => path.clone(),
            Error::UnrecognizedPodName { pod_name, .. } => pod_name.clone(),
            Error::ProcessIdOutOfRange { process_id, .. } => process_id.to_string(),
        }
    }
}
