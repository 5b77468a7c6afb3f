use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Instant;

use keyword_tree::{KeywordTree, RecordIndex};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn, Instrument};

use crate::config::CatalogConfig;
use crate::error::{LoadError, LookupInconsistency, MalformedDataError};
use crate::fetch::ResourceFetcher;
use crate::root::SourceRoot;
use crate::types::{RecordTable, SuggestionPayload, SuggestionResult};

/// Placeholder in the title template replaced by the record term.
pub const TITLE_PLACEHOLDER: &str = "%s";

/// Loaded suggestion data: keyword tree, records, title template and icon.
///
/// Immutable once built, so one instance can be shared across any number of
/// overlapping queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestions {
    tree: KeywordTree,
    records: RecordTable,
    title: String,
    icon: String,
}

impl Suggestions {
    /// Parses a `suggestions.json` document.
    pub fn from_slice(
        bytes: &[u8],
        icon: impl Into<String>,
        config: &CatalogConfig,
    ) -> Result<Self, MalformedDataError> {
        let payload: SuggestionPayload = serde_json::from_slice(bytes)?;
        let records = RecordTable::from_json(payload.records)?;
        Self::from_parts(payload.title, records, &payload.tree, icon, config)
    }

    /// Assembles suggestions from already separated parts.
    ///
    /// Fails if the title has no placeholder, the tree is inconsistent, or
    /// (with `validate_indices`) the tree references an unknown record.
    pub fn from_parts(
        title: String,
        records: RecordTable,
        tree: &Value,
        icon: impl Into<String>,
        config: &CatalogConfig,
    ) -> Result<Self, MalformedDataError> {
        if !title.contains(TITLE_PLACEHOLDER) {
            return Err(MalformedDataError::MissingPlaceholder);
        }

        let tree = KeywordTree::from_json_with_config(tree, config.tree)?;
        if config.validate_indices {
            if let Some((phrase, index)) = tree
                .phrases()
                .into_iter()
                .find(|(_, index)| !records.contains(*index))
            {
                return Err(MalformedDataError::DanglingIndex { phrase, index });
            }
        }

        Ok(Self {
            tree,
            records,
            title,
            icon: icon.into(),
        })
    }

    /// Looks `phrase` up and hydrates the matching record.
    pub fn query(&self, phrase: &str) -> Option<SuggestionResult> {
        let index = self.tree.get(phrase)?;
        match self.hydrate(index) {
            Ok(result) => Some(result),
            Err(err) => {
                warn!(error = %err, "suggestion_lookup_inconsistency");
                None
            }
        }
    }

    fn hydrate(&self, index: RecordIndex) -> Result<SuggestionResult, LookupInconsistency> {
        let record = self
            .records
            .get(index)
            .ok_or(LookupInconsistency { index })?;
        Ok(SuggestionResult {
            title: self.title.replacen(TITLE_PLACEHOLDER, &record.term, 1),
            url: record.url.clone(),
            icon: self.icon.clone(),
        })
    }

    pub fn tree(&self) -> &KeywordTree {
        &self.tree
    }

    pub fn records(&self) -> &RecordTable {
        &self.records
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }
}

/// Observable lifecycle of a [`SuggestionCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CatalogState {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

enum Slot {
    Unloaded,
    Loading,
    Ready(Arc<Suggestions>),
    Failed,
}

impl Slot {
    fn state(&self) -> CatalogState {
        match self {
            Slot::Unloaded => CatalogState::Unloaded,
            Slot::Loading => CatalogState::Loading,
            Slot::Ready(_) => CatalogState::Ready,
            Slot::Failed => CatalogState::Failed,
        }
    }
}

/// Owner of the suggestion data for one provider instance.
///
/// A catalog is loaded at most once. Until that load succeeds every query
/// answers `None`, and if it fails the catalog stays that way for good.
pub struct SuggestionCatalog {
    config: CatalogConfig,
    slot: RwLock<Slot>,
}

impl SuggestionCatalog {
    /// Unloaded catalog.
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            config,
            slot: RwLock::new(Slot::Unloaded),
        }
    }

    /// Catalog that is ready immediately, for data obtained out of band.
    pub fn ready(config: CatalogConfig, suggestions: Suggestions) -> Self {
        Self {
            config,
            slot: RwLock::new(Slot::Ready(Arc::new(suggestions))),
        }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn state(&self) -> CatalogState {
        self.read_slot().state()
    }

    pub fn is_ready(&self) -> bool {
        self.state() == CatalogState::Ready
    }

    /// Shared handle to the loaded data, if ready.
    pub fn suggestions(&self) -> Option<Arc<Suggestions>> {
        match &*self.read_slot() {
            Slot::Ready(suggestions) => Some(Arc::clone(suggestions)),
            Slot::Unloaded | Slot::Loading | Slot::Failed => None,
        }
    }

    /// Retrieves and parses the suggestion data under `root`.
    ///
    /// The lock is never held while the fetch is pending, so concurrent
    /// queries keep answering `None` instead of blocking.
    pub async fn load(
        &self,
        root: &SourceRoot,
        fetcher: &dyn ResourceFetcher,
    ) -> Result<(), LoadError> {
        self.begin_load()?;
        let mut guard = LoadGuard {
            catalog: self,
            armed: true,
        };

        let start = Instant::now();
        let span = tracing::info_span!("catalog.load", root = %root);
        let outcome = fetch_suggestions(root, fetcher, &self.config)
            .instrument(span)
            .await;
        let elapsed_micros = start.elapsed().as_micros();
        guard.armed = false;

        let mut slot = self.write_slot();
        match outcome {
            Ok(suggestions) => {
                info!(
                    root = %root,
                    phrases = suggestions.tree().len(),
                    records = suggestions.records().len(),
                    elapsed_micros,
                    "catalog_load_success"
                );
                *slot = Slot::Ready(Arc::new(suggestions));
                Ok(())
            }
            Err(err) => {
                warn!(root = %root, error = %err, elapsed_micros, "catalog_load_failure");
                *slot = Slot::Failed;
                Err(err)
            }
        }
    }

    /// Matches `phrase`; `None` when nothing matches or the catalog is not ready.
    pub fn query(&self, phrase: &str) -> Option<SuggestionResult> {
        let suggestions = self.suggestions()?;
        suggestions.query(phrase)
    }

    fn begin_load(&self) -> Result<(), LoadError> {
        let mut slot = self.write_slot();
        if matches!(*slot, Slot::Unloaded) {
            *slot = Slot::Loading;
            return Ok(());
        }
        Err(LoadError::AlreadyAttempted {
            state: slot.state(),
        })
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Slot> {
        self.slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

// Marks the slot failed when a load future is dropped before it finishes,
// e.g. on timeout or task abort.
struct LoadGuard<'a> {
    catalog: &'a SuggestionCatalog,
    armed: bool,
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut slot = self.catalog.write_slot();
        if matches!(*slot, Slot::Loading) {
            *slot = Slot::Failed;
            warn!("catalog_load_aborted");
        }
    }
}

impl std::fmt::Debug for SuggestionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestionCatalog")
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

async fn fetch_suggestions(
    root: &SourceRoot,
    fetcher: &dyn ResourceFetcher,
    config: &CatalogConfig,
) -> Result<Suggestions, LoadError> {
    let data_url = root.resolve(&config.suggestions_path)?;
    let icon_url = root.resolve(&config.icon_path)?;
    debug!(url = %data_url, "fetching_suggestions");

    let bytes = fetcher.fetch(&data_url).await?;
    let suggestions = Suggestions::from_slice(&bytes, icon_url.to_string(), config)?;
    Ok(suggestions)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use async_trait::async_trait;
    use keyword_tree::TreeConfig;
    use reqwest::Url;
    use serde_json::json;

    use crate::error::NetworkError;

    const ICON: &str = "https://cdn.example.com/qs/icons/favicon.ico";

    fn rabbits_payload() -> Value {
        json!({
            "title": "Visit %s",
            "records": { "0": { "term": "Rabbits Inc", "url": "https://example.com/rabbits" } },
            "tree": { "frabbits": { "^": 0 } }
        })
    }

    fn bytes(value: &Value) -> Vec<u8> {
        serde_json::to_vec(value).unwrap()
    }

    struct StaticFetcher {
        resources: HashMap<String, Result<Vec<u8>, NetworkError>>,
    }

    impl StaticFetcher {
        fn serving(url: &str, body: Vec<u8>) -> Self {
            Self {
                resources: HashMap::from([(url.to_string(), Ok(body))]),
            }
        }

        fn failing(url: &str, err: NetworkError) -> Self {
            Self {
                resources: HashMap::from([(url.to_string(), Err(err))]),
            }
        }
    }

    #[async_trait]
    impl ResourceFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>, NetworkError> {
            self.resources
                .get(url.as_str())
                .cloned()
                .unwrap_or_else(|| Err(NetworkError::Status {
                    url: url.to_string(),
                    status: 404,
                }))
        }
    }

    fn root() -> SourceRoot {
        SourceRoot::parse("https://cdn.example.com/qs/").unwrap()
    }

    const DATA_URL: &str = "https://cdn.example.com/qs/data/suggestions.json";

    #[test]
    fn query_formats_matching_record() {
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &CatalogConfig::default())
            .unwrap();

        assert_eq!(
            s.query("frabbits"),
            Some(SuggestionResult {
                title: "Visit Rabbits Inc".into(),
                url: "https://example.com/rabbits".into(),
                icon: ICON.into(),
            })
        );
        assert_eq!(s.query("FRABBITS").map(|r| r.url), Some("https://example.com/rabbits".into()));
    }

    #[test]
    fn prefix_does_not_match_by_default() {
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &CatalogConfig::default())
            .unwrap();
        assert_eq!(s.query("frab"), None);
    }

    #[test]
    fn prefix_matches_when_configured() {
        let cfg = CatalogConfig {
            tree: TreeConfig::unique_prefix(3),
            ..Default::default()
        };
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &cfg).unwrap();
        assert_eq!(s.query("frab").map(|r| r.title), Some("Visit Rabbits Inc".into()));
        assert_eq!(s.query("fr"), None);
    }

    #[test]
    fn only_first_placeholder_is_replaced() {
        let mut payload = rabbits_payload();
        payload["title"] = json!("%s: 100%s fresh");
        let s = Suggestions::from_slice(&bytes(&payload), ICON, &CatalogConfig::default()).unwrap();
        assert_eq!(
            s.query("frabbits").map(|r| r.title),
            Some("Rabbits Inc: 100%s fresh".into())
        );
    }

    #[test]
    fn title_without_placeholder_is_malformed() {
        let mut payload = rabbits_payload();
        payload["title"] = json!("Visit us");
        let err = Suggestions::from_slice(&bytes(&payload), ICON, &CatalogConfig::default())
            .unwrap_err();
        assert_eq!(err, MalformedDataError::MissingPlaceholder);
    }

    #[test]
    fn missing_field_is_malformed() {
        let payload = json!({ "title": "Visit %s", "tree": {} });
        let err = Suggestions::from_slice(&bytes(&payload), ICON, &CatalogConfig::default())
            .unwrap_err();
        assert!(matches!(err, MalformedDataError::Json(ref msg) if msg.contains("records")));
    }

    #[test]
    fn wrong_field_type_is_malformed() {
        let mut payload = rabbits_payload();
        payload["title"] = json!(42);
        let err = Suggestions::from_slice(&bytes(&payload), ICON, &CatalogConfig::default())
            .unwrap_err();
        assert!(matches!(err, MalformedDataError::Json(_)));
    }

    #[test]
    fn dangling_index_fails_validation() {
        let mut payload = rabbits_payload();
        payload["tree"] = json!({ "frabbits": { "^": 0 }, "carrots": { "^": 9 } });
        let err = Suggestions::from_slice(&bytes(&payload), ICON, &CatalogConfig::default())
            .unwrap_err();
        assert_eq!(
            err,
            MalformedDataError::DanglingIndex {
                phrase: "carrots".into(),
                index: 9,
            }
        );
    }

    #[test]
    fn dangling_index_without_validation_yields_none() {
        let mut payload = rabbits_payload();
        payload["tree"] = json!({ "frabbits": { "^": 0 }, "carrots": { "^": 9 } });
        let cfg = CatalogConfig {
            validate_indices: false,
            ..Default::default()
        };
        let s = Suggestions::from_slice(&bytes(&payload), ICON, &cfg).unwrap();
        assert_eq!(s.query("carrots"), None);
        assert!(s.query("frabbits").is_some());
    }

    #[test]
    fn index_zero_is_a_valid_match() {
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &CatalogConfig::default())
            .unwrap();
        assert_eq!(s.tree().get("frabbits"), Some(0));
        assert!(s.query("frabbits").is_some());
    }

    #[test]
    fn unloaded_catalog_answers_none() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());
        assert_eq!(catalog.state(), CatalogState::Unloaded);
        assert_eq!(catalog.query("frabbits"), None);
    }

    #[tokio::test]
    async fn load_then_query() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());
        let fetcher = StaticFetcher::serving(DATA_URL, bytes(&rabbits_payload()));

        catalog.load(&root(), &fetcher).await.unwrap();

        assert!(catalog.is_ready());
        let result = catalog.query("frabbits").unwrap();
        assert_eq!(result.title, "Visit Rabbits Inc");
        assert_eq!(result.icon, ICON);
    }

    #[tokio::test]
    async fn network_failure_leaves_catalog_failed() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());
        let fetcher = StaticFetcher::failing(DATA_URL, NetworkError::Request("connection reset".into()));

        let err = catalog.load(&root(), &fetcher).await.unwrap_err();

        assert!(err.is_network());
        assert_eq!(catalog.state(), CatalogState::Failed);
        assert_eq!(catalog.query("frabbits"), None);
    }

    #[tokio::test]
    async fn malformed_payload_leaves_catalog_failed() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());
        let fetcher = StaticFetcher::serving(DATA_URL, b"<html>not json</html>".to_vec());

        let err = catalog.load(&root(), &fetcher).await.unwrap_err();

        assert!(err.is_malformed());
        assert_eq!(catalog.state(), CatalogState::Failed);
        assert_eq!(catalog.query("frabbits"), None);
    }

    #[tokio::test]
    async fn load_is_single_shot() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());
        let broken = StaticFetcher::failing(DATA_URL, NetworkError::Request("offline".into()));
        let healthy = StaticFetcher::serving(DATA_URL, bytes(&rabbits_payload()));

        assert!(catalog.load(&root(), &broken).await.is_err());
        let err = catalog.load(&root(), &healthy).await.unwrap_err();

        assert_eq!(
            err,
            LoadError::AlreadyAttempted {
                state: CatalogState::Failed
            }
        );
        assert_eq!(catalog.query("frabbits"), None);
    }

    struct PendingFetcher;

    #[async_trait]
    impl ResourceFetcher for PendingFetcher {
        async fn fetch(&self, _url: &Url) -> Result<Vec<u8>, NetworkError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn dropped_load_leaves_catalog_failed() {
        let catalog = SuggestionCatalog::new(CatalogConfig::default());

        let timed_out = tokio::time::timeout(
            std::time::Duration::from_millis(10),
            catalog.load(&root(), &PendingFetcher),
        )
        .await;
        assert!(timed_out.is_err());

        assert_eq!(catalog.state(), CatalogState::Failed);
        let healthy = StaticFetcher::serving(DATA_URL, bytes(&rabbits_payload()));
        assert_eq!(
            catalog.load(&root(), &healthy).await,
            Err(LoadError::AlreadyAttempted {
                state: CatalogState::Failed
            })
        );
        assert_eq!(catalog.query("frabbits"), None);
    }

    #[test]
    fn concurrent_queries_share_one_catalog() {
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &CatalogConfig::default())
            .unwrap();
        let catalog = Arc::new(SuggestionCatalog::ready(CatalogConfig::default(), s));
        let expected = catalog.query("frabbits");
        assert!(expected.is_some());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    (0..200)
                        .map(|i| {
                            let text = if i % 2 == 0 { "frabbits" } else { "FRABBITS " };
                            catalog.query(text)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for handle in handles {
            let results = handle.join().unwrap();
            assert!(results.iter().all(|r| *r == expected));
        }
        assert_eq!(catalog.query("frab"), None);
    }

    #[test]
    fn ready_catalog_skips_loading() {
        let s = Suggestions::from_slice(&bytes(&rabbits_payload()), ICON, &CatalogConfig::default())
            .unwrap();
        let catalog = SuggestionCatalog::ready(CatalogConfig::default(), s);
        assert!(catalog.is_ready());
        assert!(catalog.query("frabbits").is_some());
        assert!(format!("{catalog:?}").contains("Ready"));
    }
}
