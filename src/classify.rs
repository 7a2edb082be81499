//! Python 3 support classification from PyPI metadata
//!
//! Trove classifiers are the explicit signal and are consulted first. Projects
//! that never declared a `Programming Language :: Python :: ...` classifier
//! fall back to the tags of the wheels published for their newest release.
//!
//! `requires_python` is ignored: projects that set it almost always carry
//! proper classifiers too.

use crate::name::ProjectName;
use crate::support::SupportLevel;
use crate::version::Version;
use crate::wheel;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

const PYTHON_CLASSIFIER: &str = "Programming Language :: Python :: ";
const PY3_ONLY: &str = "Programming Language :: Python :: 3 :: Only";
const PY2_ONLY: &str = "Programming Language :: Python :: 2 :: Only";
const PY2_PREFIX: &str = "Programming Language :: Python :: 2";
const PY3_PREFIX: &str = "Programming Language :: Python :: 3";
const WHEEL_PACKAGETYPE: &str = "bdist_wheel";

/// PyPI JSON API response (`/pypi/<name>/json`), reduced to what
/// classification needs
#[derive(Debug, Default, Deserialize)]
pub struct RegistryResponse {
    #[serde(default)]
    pub info: Option<ProjectInfo>,
    #[serde(default)]
    pub releases: Option<BTreeMap<String, Vec<Artifact>>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub classifiers: Option<Vec<String>>,
}

/// A single file uploaded for a release
#[derive(Debug, Default, Deserialize)]
pub struct Artifact {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub packagetype: Option<String>,
}

impl RegistryResponse {
    /// Parse a response body, treating anything malformed as empty.
    ///
    /// `info` and `releases` are read independently, and artifacts that do
    /// not have the expected shape are skipped, so a bad upload never hides
    /// usable classifiers.
    pub fn from_json_lenient(body: &str) -> Self {
        let Ok(Value::Object(mut document)) = serde_json::from_str::<Value>(body) else {
            return Self::default();
        };

        Self {
            info: document
                .remove("info")
                .and_then(|info| serde_json::from_value(info).ok()),
            releases: document.remove("releases").and_then(lenient_releases),
        }
    }

    fn classifiers(&self) -> &[String] {
        self.info
            .as_ref()
            .and_then(|info| info.classifiers.as_deref())
            .unwrap_or_default()
    }
}

fn lenient_releases(releases: Value) -> Option<BTreeMap<String, Vec<Artifact>>> {
    let Value::Object(releases) = releases else {
        return None;
    };

    let releases = releases
        .into_iter()
        .map(|(version, files)| {
            let artifacts = match files {
                Value::Array(files) => files
                    .into_iter()
                    .filter_map(|file| serde_json::from_value(file).ok())
                    .collect(),
                _ => Vec::new(),
            };
            (version, artifacts)
        })
        .collect();
    Some(releases)
}

/// Classify a project's Python 3 support from its registry response.
pub fn classify(project: &ProjectName, response: &RegistryResponse) -> SupportLevel {
    let classifiers = response.classifiers();
    let has_classifier = classifiers.iter().any(|c| c.starts_with(PYTHON_CLASSIFIER));

    let (has_legacy, has_modern) = if has_classifier {
        debug!(project = %project, "has Python version classifiers");
        if classifiers.iter().any(|c| c == PY3_ONLY) {
            debug!(project = %project, "classified Python 3 only");
            return SupportLevel::ModernOnly;
        }
        if classifiers.iter().any(|c| c == PY2_ONLY) {
            debug!(project = %project, "classified Python 2 only");
            return SupportLevel::LegacyOnly;
        }
        // A missing major version classifier means that version is unsupported
        (
            classifiers.iter().any(|c| c.starts_with(PY2_PREFIX)),
            classifiers.iter().any(|c| c.starts_with(PY3_PREFIX)),
        )
    } else {
        match wheel_signals(project, response) {
            Some(signals) => signals,
            None => return SupportLevel::Unknown,
        }
    };

    debug!(project = %project, py2 = has_legacy, py3 = has_modern, "support signals");
    SupportLevel::from_signals(has_legacy, has_modern)
}

/// Parse a raw body and classify it.
pub fn classify_json(project: &ProjectName, body: &str) -> SupportLevel {
    classify(project, &RegistryResponse::from_json_lenient(body))
}

/// Read `(py2, py3)` support from the wheels of the newest release.
///
/// Returns `None` when there are no releases or the newest one has no wheels.
fn wheel_signals(project: &ProjectName, response: &RegistryResponse) -> Option<(bool, bool)> {
    let releases = response.releases.as_ref().filter(|r| !r.is_empty());
    let Some(releases) = releases else {
        debug!(project = %project, "no releases");
        return None;
    };

    let (latest, artifacts) = releases
        .iter()
        .max_by_key(|&(version, _)| (Version::parse(version), version.as_str()))?;

    let wheel_names: Vec<&str> = artifacts
        .iter()
        .filter(|a| a.packagetype.as_deref() == Some(WHEEL_PACKAGETYPE))
        .filter_map(|a| a.filename.as_deref())
        .collect();
    if wheel_names.is_empty() {
        debug!(project = %project, version = %latest, "no wheels");
        return None;
    }

    debug!(project = %project, wheels = %wheel_names.join(", "), "checking wheels");
    let mut py2 = false;
    let mut py3 = false;
    for name in wheel_names {
        for tag in wheel::parse_tags(name).unwrap_or_default() {
            if tag.python.starts_with("py2") || tag.python.starts_with("cp2") {
                py2 = true;
            } else if tag.python.starts_with("py3") || tag.python.starts_with("cp3") {
                py3 = true;
            }
        }
        if py2 && py3 {
            break;
        }
    }
    Some((py2, py3))
}
