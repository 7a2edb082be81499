//! Output formatting for JSON and text modes
//!
//! Provides types for structured output that can be serialized to JSON
//! for machine-readable output, or displayed as text for human consumption.

use py3ready::check::CheckEntry;
use py3ready::overrides::OverrideSet;
use py3ready::support::SupportLevel;
use serde::Serialize;

/// Result of checking a single project
#[derive(Debug, Serialize)]
pub struct ProjectResult {
    pub spec: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<SupportLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usable: Option<bool>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub overridden: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of a check operation
#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub results: Vec<ProjectResult>,
    pub blockers: usize,
    pub errors: usize,
}

/// Result of listing overrides
#[derive(Debug, Serialize)]
pub struct OverridesOutput {
    pub source: String,
    pub date: String,
    pub projects: Vec<String>,
}

impl From<&CheckEntry> for ProjectResult {
    fn from(entry: &CheckEntry) -> Self {
        match &entry.result {
            Ok(verdict) => Self {
                spec: entry.spec.clone(),
                project: Some(verdict.project.to_string()),
                level: Some(verdict.level),
                usable: Some(verdict.level.is_usable()),
                overridden: verdict.overridden,
                error: None,
            },
            Err(e) => Self {
                spec: entry.spec.clone(),
                project: None,
                level: None,
                usable: None,
                overridden: false,
                error: Some(e.to_string()),
            },
        }
    }
}

impl CheckOutput {
    pub fn new(entries: &[CheckEntry]) -> Self {
        Self {
            results: entries.iter().map(ProjectResult::from).collect(),
            blockers: entries.iter().filter(|e| e.is_blocker()).count(),
            errors: entries.iter().filter(|e| e.result.is_err()).count(),
        }
    }
}

impl OverridesOutput {
    pub fn new(set: &OverrideSet) -> Self {
        Self {
            source: set.source().to_string(),
            date: set.date().to_string(),
            projects: set.sorted().into_iter().map(String::from).collect(),
        }
    }
}

/// Render check results as text, one line per project plus a summary
pub fn render_check_text(output: &CheckOutput) -> String {
    let mut text = String::new();
    for result in &output.results {
        let line = match (&result.project, result.level, &result.error) {
            (Some(project), Some(level), _) => {
                let marker = if level.is_usable() { "ok" } else { "!!" };
                let note = if result.overridden { " (override)" } else { "" };
                format!("{} {}: {}{}", marker, project, level, note)
            }
            (_, _, Some(error)) => format!("?? {}", error),
            _ => format!("?? {}", result.spec),
        };
        text.push_str(&line);
        text.push('\n');
    }

    let checked = output.results.len() - output.errors;
    if output.blockers == 0 {
        text.push_str(&format!(
            "\nAll {} checked project(s) support Python 3.\n",
            checked
        ));
    } else {
        text.push_str(&format!(
            "\n{} of {} checked project(s) block the move to Python 3.\n",
            output.blockers, checked
        ));
    }
    text
}

/// Print JSON output to stdout
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    }
}
