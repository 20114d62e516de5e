//! Hostfile reading
//!
//! A hostfile lists one `host:port` address per line. Blank lines are
//! skipped. Addresses are not validated here; the network layer owns
//! address syntax.

use std::path::Path;

use tracing::debug;

use crate::source::ConfigSource;
use crate::{Error, Result};

/// Read a hostfile through `source`, returning its addresses in file order.
pub fn read_hostfile<S: ConfigSource>(source: &S, path: &Path) -> Result<Vec<String>> {
    let contents = source
        .read_to_string(path)
        .map_err(|e| Error::HostfileNotFound {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

    let addresses = parse_hostfile(&contents);
    debug!(path = %path.display(), count = addresses.len(), "Read hostfile");
    Ok(addresses)
}

/// Split hostfile contents into trimmed, non-blank lines.
pub fn parse_hostfile(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
