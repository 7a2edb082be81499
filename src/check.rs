//! Batch checking of many projects
//!
//! Projects are looked up on a bounded worker pool. Overridden projects skip
//! the registry. One bad specifier only affects its own entry.

use crate::lookup::LookupService;
use crate::name::{NameError, ProjectName, just_name};
use crate::overrides::OverrideStore;
use crate::support::SupportLevel;
use rayon::prelude::*;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Failed to start worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

/// Outcome for one valid project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub project: ProjectName,
    pub level: SupportLevel,
    pub overridden: bool,
}

/// Result for one input specifier
#[derive(Debug)]
pub struct CheckEntry {
    pub spec: String,
    pub result: Result<Verdict, NameError>,
}

impl CheckEntry {
    /// A valid project that cannot be used on Python 3
    pub fn is_blocker(&self) -> bool {
        self.result
            .as_ref()
            .is_ok_and(|verdict| !verdict.level.is_usable())
    }
}

/// Check a single specifier, consulting overrides before the registry.
pub fn check_one(spec: &str, lookup: &LookupService, overrides: &OverrideStore) -> CheckEntry {
    let result = just_name(spec).and_then(|project| {
        if overrides.is_overridden(project.as_str())? {
            return Ok(Verdict {
                project,
                level: SupportLevel::ModernSupported,
                overridden: true,
            });
        }
        let level = lookup.supports_modern(project.as_str())?;
        Ok(Verdict {
            project,
            level,
            overridden: false,
        })
    });

    CheckEntry {
        spec: spec.to_string(),
        result,
    }
}

/// Check every specifier using up to `jobs` concurrent lookups.
///
/// Specifiers naming the same project are reported once, at their first
/// position. Output order follows input order.
pub fn check_all(
    specs: &[String],
    lookup: &LookupService,
    overrides: &OverrideStore,
    jobs: usize,
) -> Result<Vec<CheckEntry>, CheckError> {
    let mut seen = HashSet::new();
    let unique: Vec<&String> = specs
        .iter()
        .filter(|spec| match just_name(spec) {
            Ok(name) => seen.insert(name),
            Err(_) => true,
        })
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs.max(1))
        .build()?;

    Ok(pool.install(|| {
        unique
            .par_iter()
            .map(|spec| check_one(spec, lookup, overrides))
            .collect()
    }))
}
