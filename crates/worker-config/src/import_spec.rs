//! Import specifier parsing
//!
//! A specifier names the user's dataflow as `<location>:<attribute>`. The
//! location is either a source file path (`examples/basic.py`) or an
//! importable dotted module (`examples.basic`); both resolve to the same
//! dotted module locator.

use crate::{Error, Result};

/// Separator between the location and the attribute name
pub const SEPARATOR: char = ':';

/// Source file extensions recognized in file-form locations
pub const SOURCE_EXTENSIONS: &[&str] = &[".py"];

/// Package marker module, replaced by its parent directory
const PACKAGE_INIT: &str = "__init__";

/// A resolved reference to the user's dataflow object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Dotted module locator, e.g. `examples.basic`
    pub module: String,

    /// Attribute within the module, e.g. `flow`
    pub attribute: String,
}

/// The two accepted shapes of the location half of a specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportLocation<'a> {
    /// A relative source file path
    File(&'a str),

    /// An already-dotted module path, used verbatim
    Module(&'a str),
}

impl<'a> ImportLocation<'a> {
    /// Classify a location string
    pub fn detect(location: &'a str) -> Self {
        let has_separator = location.contains(['/', '\\']);
        let has_extension = SOURCE_EXTENSIONS
            .iter()
            .any(|ext| location.ends_with(ext));

        if has_separator || has_extension {
            ImportLocation::File(location)
        } else {
            ImportLocation::Module(location)
        }
    }

    /// Turn the location into a dotted module locator
    fn into_module(self, spec: &str) -> Result<String> {
        let path = match self {
            ImportLocation::Module(module) => return Ok(module.to_string()),
            ImportLocation::File(path) => path,
        };

        let stem = SOURCE_EXTENSIONS
            .iter()
            .find_map(|ext| path.strip_suffix(ext))
            .unwrap_or(path);

        let mut parts = Vec::new();
        for part in stem.split(['/', '\\']) {
            match part {
                "" | "." => continue,
                ".." => {
                    return Err(invalid(
                        spec,
                        "parent directory components are not supported",
                    ))
                }
                _ => parts.push(part),
            }
        }

        if parts.last() == Some(&PACKAGE_INIT) {
            parts.pop();
        }

        if parts.is_empty() {
            return Err(invalid(spec, "file path does not name a module"));
        }

        Ok(parts.join("."))
    }
}

/// Parse `<location>:<attribute>` into a module locator and attribute name.
pub fn parse_import_spec(spec: &str) -> Result<ImportSpec> {
    let (location, attribute) = spec
        .split_once(SEPARATOR)
        .ok_or_else(|| invalid(spec, "missing ':' separator"))?;

    if attribute.contains(SEPARATOR) {
        return Err(invalid(spec, "expected exactly one ':' separator"));
    }
    if location.is_empty() {
        return Err(invalid(spec, "empty module or file location"));
    }
    if attribute.is_empty() {
        return Err(invalid(spec, "empty attribute name"));
    }

    let module = ImportLocation::detect(location).into_module(spec)?;

    Ok(ImportSpec {
        module,
        attribute: attribute.to_string(),
    })
}

fn invalid(spec: &str, reason: &str) -> Error {
    Error::InvalidImportSpecifier {
        value: spec.to_string(),
        reason: reason.to_string(),
    }
}
