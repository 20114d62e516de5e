//! Configuration sources
//!
//! Resolution never touches the process environment or the filesystem
//! directly. It goes through a [`ConfigSource`], so tests can hand it an
//! in-memory [`MockSource`] instead of mutating real process state.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Environment variable names consulted during resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvKeys {
    /// Path to a newline-delimited address file
    pub hostfile_path: String,

    /// Orchestration-assigned pod name, `<statefulset>-<ordinal>`
    pub pod_name: String,

    /// Stateful set base name stripped from the pod name
    pub statefulset_name: String,
}

impl Default for EnvKeys {
    fn default() -> Self {
        Self::prefixed("")
    }
}

impl EnvKeys {
    /// Keys with `prefix` prepended, e.g. `BYTEWAX_` for `BYTEWAX_POD_NAME`
    pub fn prefixed(prefix: &str) -> Self {
        Self {
            hostfile_path: format!("{prefix}HOSTFILE_PATH"),
            pod_name: format!("{prefix}POD_NAME"),
            statefulset_name: format!("{prefix}STATEFULSET_NAME"),
        }
    }
}

/// Read access to ambient process state
pub trait ConfigSource {
    /// Get the value of an environment variable by name.
    fn var(&self, name: &str) -> Option<String>;

    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Source backed by the real process environment and filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemSource;

impl ConfigSource for SystemSource {
    fn var(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) => Some(value),
            Err(std::env::VarError::NotPresent) => None,
            Err(std::env::VarError::NotUnicode(raw)) => {
                warn!(name, value = ?raw, "Ignoring environment variable that is not valid UTF-8");
                None
            }
        }
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// Source backed by in-memory maps (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    vars: HashMap<String, String>,
    files: HashMap<PathBuf, String>,
}

impl MockSource {
    /// Create a new empty mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source from an iterator of variable name/value pairs.
    pub fn from_vars<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            files: HashMap::new(),
        }
    }

    /// Set an environment variable.
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Register file contents under a path.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> &mut Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl ConfigSource for MockSource {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no mock file at {}", path.display()),
            )
        })
    }
}

impl<S: ConfigSource + ?Sized> ConfigSource for &S {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }
}
