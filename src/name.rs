//! Project name normalization
//!
//! Requirement specifiers arrive in many shapes (`requests>=2.0`,
//! `Foo_Bar[extra]; python_version < "3"`). Everything after the leading
//! run of name characters is dropped and the result is lowercased.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("Invalid project specifier '{0}'. Expected a name like 'requests' or 'requests>=2.0'")]
    InvalidSpecifier(String),
}

/// A canonical, lowercase project name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ProjectName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        just_name(s)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Strip version and extras syntax from a specifier, leaving the project name.
///
/// The name is the longest prefix made of ASCII letters, digits, `.`, `_`
/// and `-`. Applying this to an already canonical name returns it unchanged.
pub fn just_name(spec: &str) -> Result<ProjectName, NameError> {
    let end = spec.find(|c| !is_name_char(c)).unwrap_or(spec.len());
    if end == 0 {
        return Err(NameError::InvalidSpecifier(spec.to_string()));
    }
    Ok(ProjectName(spec[..end].to_lowercase()))
}

/// PEP 503 normalization: lowercase, with runs of `-`, `_` and `.` collapsed
/// into a single `-`.
pub fn canonicalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                out.push('-');
                in_separator = true;
            }
        } else {
            out.extend(c.to_lowercase());
            in_separator = false;
        }
    }
    out
}
