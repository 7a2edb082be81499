//! Requirement file reading
//!
//! Only flat `requirements.txt`-style files are understood: one specifier per
//! line, with blank lines, comments and pip options (`-e`, `--index-url`,
//! `-r other.txt`) skipped. Includes are not followed.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RequirementsError {
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read the specifiers listed in a requirements file.
pub fn read_specifiers(path: &Path) -> Result<Vec<String>, RequirementsError> {
    let content = std::fs::read_to_string(path).map_err(|source| RequirementsError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_specifiers(&content))
}

/// Extract specifiers from requirements file content.
pub fn parse_specifiers(content: &str) -> Vec<String> {
    content
        .lines()
        .map(strip_comment)
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .map(str::to_string)
        .collect()
}

fn strip_comment(line: &str) -> &str {
    if line.trim_start().starts_with('#') {
        return "";
    }
    // Inline comments need preceding whitespace; `#` alone may be part of a URL
    match line.find(" #").or_else(|| line.find("\t#")) {
        Some(idx) => &line[..idx],
        None => line,
    }
}
