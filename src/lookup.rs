//! Python 3 support lookups against the PyPI JSON API
//!
//! Each distinct project is queried at most once per service: results are
//! remembered in a size-capped LRU cache. Projects whose metadata cannot be
//! fetched are assumed to be ported, so a missing, renamed or private package
//! never shows up as a false blocker.

use crate::cache::{DEFAULT_CAPACITY, LruCache};
use crate::classify::classify_json;
use crate::http::HttpClient;
use crate::name::{NameError, ProjectName, just_name};
use crate::support::SupportLevel;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Default registry base URL
pub const DEFAULT_REGISTRY_URL: &str = "https://pypi.org";

/// Classifies projects by querying the registry, with caching
pub struct LookupService {
    http: Arc<dyn HttpClient>,
    registry_url: String,
    cache: Mutex<LruCache<ProjectName, SupportLevel>>,
}

impl LookupService {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self {
            http,
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            cache: Mutex::new(LruCache::new(DEFAULT_CAPACITY)),
        }
    }

    /// Use a different registry (a PyPI mirror, or a local test server).
    pub fn with_registry_url(mut self, url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.registry_url = url;
        self
    }

    /// Cap the number of distinct projects remembered.
    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache = Mutex::new(LruCache::new(capacity));
        self
    }

    /// JSON API URL for a project
    pub fn project_url(&self, name: &ProjectName) -> String {
        format!("{}/pypi/{}/json", self.registry_url, name)
    }

    /// Check whether a project supports Python 3.
    ///
    /// Accepts raw specifiers (`Django>=1.11`) as well as canonical names.
    /// Only an invalid specifier is an error; registry failures resolve to
    /// `SupportLevel::ModernSupported`.
    pub fn supports_modern(&self, spec: &str) -> Result<SupportLevel, NameError> {
        let name = just_name(spec)?;

        if let Some(level) = self.cached(&name) {
            debug!(project = %name, level = ?level, "cache hit");
            return Ok(level);
        }

        let level = self.query(&name);
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, level);
        Ok(level)
    }

    /// Number of projects currently cached
    pub fn cached_count(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn cached(&self, name: &ProjectName) -> Option<SupportLevel> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
    }

    fn query(&self, name: &ProjectName) -> SupportLevel {
        let url = self.project_url(name);
        info!(project = %name, "checking");

        let response = match self.http.get(&url) {
            Ok(response) => response,
            Err(e) => {
                warn!(project = %name, error = %e, "problem fetching, assuming ported");
                return SupportLevel::ModernSupported;
            }
        };

        if response.is_error() {
            warn!(
                project = %name,
                status = response.status,
                "problem fetching, assuming ported"
            );
            return SupportLevel::ModernSupported;
        }

        let level = classify_json(name, &response.body);
        debug!(project = %name, level = ?level, "classified");
        level
    }
}
