//! Enrolled QuickSuggest state.
//!
//! A [`SuggestContext`] is built when the user is enrolled and dropped when
//! they leave. It owns the catalog, the provider wired to it, and the task
//! loading the catalog; nothing outlives it.
use std::sync::Arc;
use std::time::Instant;

use catalog::{CatalogState, LoadError, ResourceFetcher, SourceFetcher, SuggestionCatalog};
use provider::{KeywordProvider, MetricsTelemetry, NoopTelemetry, TelemetrySink, VisitListener};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::{ConfigLoadError, QuickSuggestConfig};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContextError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigLoadError),
    #[error("enrollment requires a running tokio runtime")]
    NoRuntime,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("catalog load task did not complete: {0}")]
    LoadTask(String),
}

/// Owner of one enrollment's catalog and provider.
pub struct SuggestContext {
    catalog: Arc<SuggestionCatalog>,
    provider: KeywordProvider,
    load: Option<JoinHandle<Result<(), LoadError>>>,
    outcome: Option<Result<(), LoadError>>,
    enrolled_at: Instant,
}

impl SuggestContext {
    /// Builds the context and starts loading the catalog in the background.
    ///
    /// Returns as soon as the load task is spawned. Until it finishes the
    /// provider is never active.
    pub fn enroll(
        config: &QuickSuggestConfig,
        fetcher: Arc<dyn ResourceFetcher>,
        telemetry: Arc<dyn TelemetrySink>,
        visits: Arc<dyn VisitListener>,
    ) -> Result<Self, ContextError> {
        config.validate()?;
        let root = config.source_root()?;
        let runtime = Handle::try_current().map_err(|_| ContextError::NoRuntime)?;

        let catalog = Arc::new(SuggestionCatalog::new(config.catalog.clone()));
        let provider = KeywordProvider::new(
            config.provider.clone(),
            Arc::clone(&catalog),
            telemetry,
            visits,
        );

        let task_catalog = Arc::clone(&catalog);
        let load = runtime.spawn(async move { task_catalog.load(&root, fetcher.as_ref()).await });

        info!(
            provider = %config.provider.name,
            root = %config.source_root,
            "quicksuggest_enrolled"
        );
        Ok(Self {
            catalog,
            provider,
            load: Some(load),
            outcome: None,
            enrolled_at: Instant::now(),
        })
    }

    /// [`enroll`](Self::enroll) with the stock fetcher, impressions reported
    /// through `metrics`, and visits dropped.
    pub fn enroll_with_defaults(config: &QuickSuggestConfig) -> Result<Self, ContextError> {
        Self::enroll(
            config,
            Arc::new(SourceFetcher::new()),
            Arc::new(MetricsTelemetry),
            Arc::new(NoopTelemetry),
        )
    }

    /// Waits for the catalog load to finish and returns its outcome.
    ///
    /// Calling it again returns the same outcome without waiting.
    pub async fn wait_until_loaded(&mut self) -> Result<(), ContextError> {
        if let Some(outcome) = &self.outcome {
            return outcome.clone().map_err(ContextError::Load);
        }
        let Some(handle) = self.load.take() else {
            return Err(ContextError::LoadTask("no load in flight".into()));
        };

        let outcome = handle
            .await
            .map_err(|e| ContextError::LoadTask(e.to_string()))?;
        let elapsed_micros = self.enrolled_at.elapsed().as_micros();
        match &outcome {
            Ok(()) => info!(elapsed_micros, "quicksuggest_ready"),
            Err(err) => warn!(error = %err, elapsed_micros, "quicksuggest_unavailable"),
        }
        self.outcome = Some(outcome.clone());
        outcome.map_err(ContextError::Load)
    }

    pub fn catalog(&self) -> &Arc<SuggestionCatalog> {
        &self.catalog
    }

    pub fn state(&self) -> CatalogState {
        self.catalog.state()
    }

    pub fn provider(&self) -> &KeywordProvider {
        &self.provider
    }

    /// The provider to register with the host's address-bar pipeline.
    pub fn provider_mut(&mut self) -> &mut KeywordProvider {
        &mut self.provider
    }

    /// Tears the enrollment down, aborting a load that is still running.
    pub fn unenroll(mut self) {
        self.abort_load();
        info!(provider = %self.provider.config().name, "quicksuggest_unenrolled");
    }

    fn abort_load(&mut self) {
        if let Some(handle) = self.load.take() {
            if !handle.is_finished() {
                warn!("catalog_load_aborted");
            }
            handle.abort();
        }
    }
}

impl Drop for SuggestContext {
    fn drop(&mut self) {
        self.abort_load();
    }
}

impl std::fmt::Debug for SuggestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SuggestContext")
            .field("catalog", &self.catalog)
            .field("tracker", self.provider.tracker())
            .field("loading", &self.load.is_some())
            .finish_non_exhaustive()
    }
}
