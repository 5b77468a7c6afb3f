use std::sync::Mutex;

use catalog::{CatalogConfig, SuggestionCatalog, Suggestions};
use serde_json::json;

use crate::telemetry::{TelemetrySink, VisitListener};

pub(crate) const PROVIDER: &str = "ProviderDynamicPalmTree";
pub(crate) const FRAB_URL: &str = "https://example.com/frab";

/// Catalog matching exactly "fra" and "frab".
pub(crate) fn fra_catalog() -> SuggestionCatalog {
    let payload = json!({
        "title": "Visit %s",
        "records": {
            "0": { "term": "Fra", "url": "https://example.com/fra" },
            "1": { "term": "Frab", "url": FRAB_URL }
        },
        "tree": { "fra": { "^": 0, "b": { "^": 1 } } }
    });
    let config = CatalogConfig::default();
    let bytes = serde_json::to_vec(&payload).unwrap();
    let suggestions = Suggestions::from_slice(&bytes, "file:///qs/icons/favicon.ico", &config).unwrap();
    SuggestionCatalog::ready(config, suggestions)
}

#[derive(Default)]
pub(crate) struct Recorder {
    impressions: Mutex<Vec<(String, String, u64)>>,
    visits: Mutex<Vec<String>>,
}

impl Recorder {
    pub(crate) fn impressions(&self) -> Vec<(String, String, u64)> {
        self.impressions.lock().unwrap().clone()
    }

    pub(crate) fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }
}

impl TelemetrySink for Recorder {
    fn keyed_scalar_add(&self, scalar: &str, key: &str, amount: u64) {
        self.impressions
            .lock()
            .unwrap()
            .push((scalar.to_string(), key.to_string(), amount));
    }
}

impl VisitListener for Recorder {
    fn result_visited(&self, url: &str) {
        self.visits.lock().unwrap().push(url.to_string());
    }
}
