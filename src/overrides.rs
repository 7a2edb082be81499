//! Manually curated projects known to support Python 3
//!
//! Some projects support Python 3 without PyPI metadata saying so (renamed
//! forks, standard library backports, stale classifiers). Their names are
//! kept in a JSON document of `{"project": "reason"}` pairs:
//!
//! ```json
//! {
//!   "pil": "Python 3 fork published as Pillow",
//!   "argparse": "Part of the standard library since Python 3.2"
//! }
//! ```
//!
//! The current document is fetched from the upstream repository. When that
//! fails for any reason, the copy bundled into the binary is used instead.
//! The bundled copy (`data/overrides.json`) is deliberately partial: it lists
//! only the best-known renamed forks and standard library backports, so an
//! offline run may report blockers that the upstream document would clear.
//! Either way the result is kept until the local date changes, so a process
//! fetches the document at most once per day.

use crate::http::HttpClient;
use crate::name::{NameError, canonicalize, just_name};
use chrono::{Local, NaiveDate};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Upstream location of the overrides document
pub const DEFAULT_OVERRIDES_URL: &str =
    "https://raw.githubusercontent.com/brettcannon/caniusepython3/master/caniusepython3/overrides.json";

const BUNDLED_OVERRIDES: &str = include_str!("../data/overrides.json");

/// Where an override set was loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideSource {
    Remote,
    Bundled,
}

impl fmt::Display for OverrideSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverrideSource::Remote => write!(f, "remote"),
            OverrideSource::Bundled => write!(f, "bundled"),
        }
    }
}

/// An immutable set of canonical project names, valid for one day
#[derive(Debug)]
pub struct OverrideSet {
    date: NaiveDate,
    source: OverrideSource,
    names: HashSet<String>,
}

impl OverrideSet {
    /// Whether the set contains `name` (already PEP 503 canonical).
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn source(&self) -> OverrideSource {
        self.source
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order
    pub fn sorted(&self) -> Vec<&str> {
        let sorted: BTreeSet<&str> = self.names.iter().map(String::as_str).collect();
        sorted.into_iter().collect()
    }
}

/// Date-keyed cache of the override set
pub struct OverrideStore {
    http: Arc<dyn HttpClient>,
    url: String,
    extra: Vec<String>,
    today: fn() -> NaiveDate,
    current: Mutex<Option<Arc<OverrideSet>>>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl OverrideStore {
    pub fn new(http: Arc<dyn HttpClient>, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            extra: Vec::new(),
            today: local_today,
            current: Mutex::new(None),
        }
    }

    /// Add names that are always treated as overridden, on top of the
    /// fetched document.
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extra
            .extend(names.into_iter().map(|n| canonicalize(n.as_ref())));
        self
    }

    /// Replace the source of "today" (used to exercise the daily refresh).
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Whether a project is known to support Python 3 regardless of its
    /// PyPI metadata. Accepts raw specifiers such as `PIL>=1.1`.
    pub fn is_overridden(&self, spec: &str) -> Result<bool, NameError> {
        let name = just_name(spec)?;
        Ok(self.current().contains(&canonicalize(name.as_str())))
    }

    /// The override set for today, loading it if needed.
    pub fn current(&self) -> Arc<OverrideSet> {
        let today = (self.today)();
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(set) = current.as_ref()
            && set.date == today
        {
            return Arc::clone(set);
        }

        let set = Arc::new(self.load(today));
        *current = Some(Arc::clone(&set));
        set
    }

    fn load(&self, date: NaiveDate) -> OverrideSet {
        let (source, mut names) = match self.fetch_remote() {
            Some(names) => {
                info!(url = %self.url, "overrides loaded from remote and cached");
                (OverrideSource::Remote, names)
            }
            None => {
                info!("overrides loaded from bundled fallback and cached");
                (OverrideSource::Bundled, bundled_names())
            }
        };
        names.extend(self.extra.iter().cloned());

        OverrideSet {
            date,
            source,
            names,
        }
    }

    /// Fetch the remote document. Any failure (transport error, non-200
    /// status, unparseable body) yields `None`.
    fn fetch_remote(&self) -> Option<HashSet<String>> {
        let response = match self.http.get(&self.url) {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "override fetch failed");
                return None;
            }
        };
        if response.status != 200 {
            debug!(status = response.status, "override fetch returned non-200");
            return None;
        }
        match parse_overrides(&response.body) {
            Ok(names) => Some(names),
            Err(e) => {
                debug!(error = %e, "override document is not valid JSON");
                None
            }
        }
    }
}

/// Parse an overrides document into canonical names. Reasons are ignored.
pub fn parse_overrides(json: &str) -> Result<HashSet<String>, serde_json::Error> {
    let document: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(document.keys().map(|name| canonicalize(name)).collect())
}

fn bundled_names() -> HashSet<String> {
    parse_overrides(BUNDLED_OVERRIDES).unwrap_or_else(|e| {
        warn!(error = %e, "bundled overrides are invalid");
        HashSet::new()
    })
}
