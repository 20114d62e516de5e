//! Worker Config - Startup configuration for dataflow worker processes
//!
//! Reconciles command line flags, orchestration environment variables and
//! an optional shared hostfile into one [`Config`]: this process's index,
//! its peers' addresses, recovery settings and the dataflow to load.
//!
//! # Example
//!
//! ```
//! use worker_config::{resolve, Flags, MockSource};
//!
//! let source = MockSource::from_vars([
//!     ("POD_NAME", "workers-1"),
//!     ("STATEFULSET_NAME", "workers"),
//! ]);
//! let flags = Flags {
//!     addresses: Some("w0:2101;w1:2101".to_string()),
//!     ..Flags::new("examples/basic.py:flow")
//! };
//!
//! let config = resolve(&flags, &source)?;
//! assert_eq!(config.process_id(), 1);
//! assert_eq!(config.import_module(), "examples.basic");
//! # Ok::<(), worker_config::Error>(())
//! ```

pub mod config;
pub mod duration;
pub mod error;
pub mod hostfile;
pub mod identity;
pub mod import_spec;
pub mod resolver;
pub mod source;

pub use config::{BackupPolicy, Config, Flags, RecoveryConfig};
pub use error::{Error, Result};
pub use identity::{IdentitySource, ProcessIdentity};
pub use import_spec::{parse_import_spec, ImportLocation, ImportSpec};
pub use resolver::{resolve, ConfigResolver};
pub use source::{ConfigSource, EnvKeys, MockSource, SystemSource};
