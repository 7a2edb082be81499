use py3ready::check::check_all;
use py3ready::http::{HttpClient, HttpError, HttpResponse};
use py3ready::{LookupService, OverrideStore, SupportLevel, just_name};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const OVERRIDES_URL: &str = "https://overrides.test/overrides.json";

/// In-memory registry keyed by URL; unknown URLs return 404
#[derive(Default)]
struct FakeRegistry {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeRegistry {
    fn with_project(mut self, name: &str, document: serde_json::Value) -> Self {
        self.pages.insert(
            format!("https://pypi.org/pypi/{}/json", name),
            document.to_string(),
        );
        self
    }

    fn with_overrides(mut self, document: serde_json::Value) -> Self {
        self.pages
            .insert(OVERRIDES_URL.to_string(), document.to_string());
        self
    }

    fn request_count(&self, url_part: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|url| url.contains(url_part))
            .count()
    }
}

impl HttpClient for FakeRegistry {
    fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requests.lock().unwrap().push(url.to_string());
        Ok(match self.pages.get(url) {
            Some(body) => HttpResponse {
                status: 200,
                body: body.clone(),
            },
            None => HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            },
        })
    }
}

fn registry() -> FakeRegistry {
    FakeRegistry::default()
        .with_project(
            "six",
            json!({
                "info": { "classifiers": [
                    "Programming Language :: Python :: 2",
                    "Programming Language :: Python :: 3",
                ]},
                "releases": {},
            }),
        )
        .with_project(
            "httpx",
            json!({
                "info": { "classifiers": [
                    "Programming Language :: Python :: 3 :: Only",
                    "Programming Language :: Python :: 2.7",
                ]},
                "releases": {},
            }),
        )
        .with_project(
            "oldthing",
            json!({
                "info": { "classifiers": ["Programming Language :: Python :: 2.7"] },
                "releases": {},
            }),
        )
        .with_project(
            "wheelonly",
            json!({
                "info": { "classifiers": [] },
                "releases": {
                    "1.0": [{
                        "filename": "wheelonly-1.0-cp2-cp27-linux_x86_64.whl",
                        "packagetype": "bdist_wheel",
                    }],
                    "2.0": [
                        {
                            "filename": "wheelonly-2.0.tar.gz",
                            "packagetype": "sdist",
                        },
                        {
                            "filename": "wheelonly-2.0-cp3-cp38-linux_x86_64.whl",
                            "packagetype": "bdist_wheel",
                        },
                    ],
                },
            }),
        )
        .with_project(
            "sdistonly",
            json!({
                "info": { "classifiers": [] },
                "releases": {
                    "0.1": [{ "filename": "sdistonly-0.1.zip", "packagetype": "sdist" }],
                },
            }),
        )
        .with_project("bare", json!({ "info": { "classifiers": [] }, "releases": {} }))
}

#[test]
fn classifies_registry_documents() {
    let http = Arc::new(registry());
    let lookup = LookupService::new(http);

    let cases = [
        ("six", SupportLevel::ModernSupported),
        ("httpx", SupportLevel::ModernOnly),
        ("oldthing", SupportLevel::LegacyOnly),
        ("wheelonly", SupportLevel::ModernOnly),
        ("sdistonly", SupportLevel::Unknown),
        ("bare", SupportLevel::Unknown),
    ];
    for (name, expected) in cases {
        assert_eq!(lookup.supports_modern(name).unwrap(), expected, "{name}");
    }
}

#[test]
fn missing_project_is_assumed_ported() {
    let http = Arc::new(registry());
    let lookup = LookupService::new(http);

    let level = lookup.supports_modern("does-not-exist").unwrap();
    assert_eq!(level, SupportLevel::ModernSupported);
    assert!(level.is_usable());
}

#[test]
fn repeated_lookups_hit_the_network_once() {
    let http = Arc::new(registry());
    let lookup = LookupService::new(http.clone());

    for spec in ["six", "Six>=1.10", "six[extra]", "six"] {
        assert_eq!(
            lookup.supports_modern(spec).unwrap(),
            SupportLevel::ModernSupported
        );
    }
    assert_eq!(http.request_count("/pypi/six/"), 1);
}

#[test]
fn overrides_and_lookups_share_a_client() {
    let http = Arc::new(registry().with_overrides(json!({ "OldThing": "ported in a fork" })));
    let client: Arc<dyn HttpClient> = http.clone();
    let lookup = LookupService::new(Arc::clone(&client));
    let overrides = OverrideStore::new(client, OVERRIDES_URL);

    assert!(overrides.is_overridden("oldthing==1.0").unwrap());
    assert!(!overrides.is_overridden("six").unwrap());
    assert_eq!(
        lookup.supports_modern("oldthing").unwrap(),
        SupportLevel::LegacyOnly
    );
    assert_eq!(http.request_count(OVERRIDES_URL), 1);
}

#[test]
fn batch_check_reports_every_specifier() {
    let http = Arc::new(registry().with_overrides(json!({ "oldthing": "" })));
    let client: Arc<dyn HttpClient> = http.clone();
    let lookup = LookupService::new(Arc::clone(&client));
    let overrides = OverrideStore::new(client, OVERRIDES_URL);

    let specs: Vec<String> = ["six", "oldthing>=2", "sdistonly", "~~~", "missing"]
        .into_iter()
        .map(String::from)
        .collect();
    let entries = check_all(&specs, &lookup, &overrides, 3).unwrap();

    assert_eq!(entries.len(), 5);
    let blockers: Vec<&str> = entries
        .iter()
        .filter(|e| e.is_blocker())
        .map(|e| e.spec.as_str())
        .collect();
    assert_eq!(blockers, vec!["sdistonly"]);

    let oldthing = entries[1].result.as_ref().unwrap();
    assert!(oldthing.overridden);
    assert_eq!(oldthing.project, just_name("oldthing").unwrap());

    assert!(entries[3].result.is_err());
    assert_eq!(http.request_count("/pypi/oldthing/"), 0);
}
