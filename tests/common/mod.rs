#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use quicksuggest::{NetworkError, ResourceFetcher, TelemetrySink, Url, VisitListener};
use serde_json::{json, Value};

pub const ROOT: &str = "https://cdn.example.com/quicksuggest/";
pub const DATA_URL: &str = "https://cdn.example.com/quicksuggest/data/suggestions.json";
pub const PROVIDER: &str = "ProviderDynamicPalmTree";

pub fn rabbits_payload() -> Value {
    json!({
        "title": "Visit %s",
        "records": { "0": { "term": "Rabbits Inc", "url": "https://example.com/rabbits" } },
        "tree": { "frab": { "bits": { "^": 0 } } }
    })
}

/// Serves canned bodies by URL and counts requests.
#[derive(Default)]
pub struct StaticFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn serving(url: &str, body: impl Into<Vec<u8>>) -> Self {
        let mut bodies = HashMap::new();
        bodies.insert(url.to_string(), body.into());
        Self {
            bodies,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn json(url: &str, value: &Value) -> Self {
        Self::serving(url, serde_json::to_vec(value).unwrap())
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceFetcher for StaticFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.bodies.get(url.as_str()).cloned().ok_or(NetworkError::Status {
            url: url.to_string(),
            status: 404,
        })
    }
}

/// Fetcher that never completes.
pub struct PendingFetcher;

#[async_trait]
impl ResourceFetcher for PendingFetcher {
    async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, NetworkError> {
        std::future::pending().await
    }
}

#[derive(Default)]
pub struct Recorder {
    impressions: Mutex<Vec<(String, String, u64)>>,
    visits: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn impressions(&self) -> Vec<(String, String, u64)> {
        self.impressions.lock().unwrap().clone()
    }

    pub fn visits(&self) -> Vec<String> {
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
