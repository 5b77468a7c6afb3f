//! Workspace umbrella crate for QuickSuggest.
//!
//! Re-exports the keyword tree, the suggestion catalog, and the address-bar
//! provider, and adds what a host needs to run them: YAML configuration,
//! an enrollment-scoped [`SuggestContext`], and [`init_tracing`].
//!
//! ```no_run
//! use quicksuggest::{QuickSuggestConfig, SuggestContext, UrlbarProvider, QueryContext};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = QuickSuggestConfig::from_file("quicksuggest.yaml")?;
//! quicksuggest::init_tracing(&config.logging)?;
//!
//! let mut context = SuggestContext::enroll_with_defaults(&config)?;
//! context.wait_until_loaded().await?;
//!
//! let provider = context.provider_mut();
//! let query = QueryContext::new(1, "frabbits");
//! if provider.is_active(&query) {
//!     let _result = provider.produce_result(&query);
//! }
//! context.unenroll();
//! # Ok(())
//! # }
//! ```

mod config;
mod context;

pub use crate::config::{ConfigLoadError, LogFormat, LoggingConfig, QuickSuggestConfig};
pub use crate::context::{ContextError, SuggestContext};

pub use catalog::{
    CatalogConfig, CatalogState, LoadError, LookupInconsistency, MalformedDataError,
    NetworkError, Record, RecordTable, ResourceFetcher, SourceFetcher, SourceRoot,
    SuggestionCatalog, SuggestionResult, Suggestions, TITLE_PLACEHOLDER, Url,
};
pub use keyword_tree::{
    KeywordTree, MatchPolicy, RESULT_KEY, RecordIndex, TreeConfig, TreeError, normalize,
};
pub use provider::{
    EngagementTracker, KeywordProvider, MetricsTelemetry, NoopTelemetry, ProviderConfig,
    ProviderResult, QueryContext, ResultSource, ResultType, SessionEvent, SessionOutcome,
    SessionPhase, SessionReport, TelemetrySink, UrlbarProvider, VisitListener,
};

/// Installs the global `tracing` subscriber described by `logging`.
///
/// The filter comes from the configuration only; `RUST_LOG` is not consulted.
/// Fails if a subscriber is already installed.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), ConfigLoadError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(logging.filter()?)
        .with_target(false);
    let installed = match logging.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| ConfigLoadError::Subscriber(e.to_string()))
}
