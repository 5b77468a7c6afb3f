use std::sync::Arc;

use catalog::{SuggestionCatalog, SuggestionResult};
use tracing::{debug, trace};

use crate::config::ProviderConfig;
use crate::telemetry::{TelemetrySink, VisitListener};
use crate::tracker::EngagementTracker;
use crate::types::{
    ProviderResult, QueryContext, ResultSource, ResultType, SessionEvent, SessionOutcome,
};


/// Capability interface between a suggestion source and the host's
/// address-bar pipeline.
///
/// The host drives it once per keystroke: [`is_active`](Self::is_active),
/// then [`produce_result`](Self::produce_result) if active, with
/// [`cancel`](Self::cancel) when the query is superseded, and
/// [`on_session_event`](Self::on_session_event) at session boundaries.
pub trait UrlbarProvider {
    /// Stable identity of the provider.
    fn name(&self) -> &str;

    fn priority(&self, _context: &QueryContext) -> u32 {
        0
    }

    /// Whether the provider has something for this query.
    fn is_active(&mut self, context: &QueryContext) -> bool;

    /// The result for this query, if it is still current.
    fn produce_result(&mut self, context: &QueryContext) -> Option<ProviderResult>;

    /// The host abandoned this query.
    fn cancel(&mut self, context: &QueryContext);

    fn on_session_event(&mut self, event: &SessionEvent);
}

struct PendingMatch {
    query_id: u64,
    result: SuggestionResult,
}

/// Provider backed by a [`SuggestionCatalog`].
///
/// `is_active` performs the lookup and parks the match under the query id;
/// `produce_result` delivers it only for that same query. Anything that
/// supersedes the query discards the parked match, so a stale result is
/// never delivered after the fact.
pub struct KeywordProvider {
    config: ProviderConfig,
    catalog: Arc<SuggestionCatalog>,
    tracker: EngagementTracker,
    pending: Option<PendingMatch>,
}

impl KeywordProvider {
    pub fn new(
        config: ProviderConfig,
        catalog: Arc<SuggestionCatalog>,
        telemetry: Arc<dyn TelemetrySink>,
        visits: Arc<dyn VisitListener>,
    ) -> Self {
        let tracker = EngagementTracker::new(&config, telemetry, visits);
        Self {
            config,
            catalog,
            tracker,
            pending: None,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<SuggestionCatalog> {
        &self.catalog
    }

    pub fn tracker(&self) -> &EngagementTracker {
        &self.tracker
    }

    /// Query id of the match waiting for `produce_result`, if any.
    pub fn pending_query(&self) -> Option<u64> {
        self.pending.as_ref().map(|p| p.query_id)
    }
}

impl UrlbarProvider for KeywordProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn priority(&self, _context: &QueryContext) -> u32 {
        self.config.priority
    }

    fn is_active(&mut self, context: &QueryContext) -> bool {
        self.pending = self
            .catalog
            .query(&context.search_string)
            .map(|result| PendingMatch {
                query_id: context.query_id,
                result,
            });
        let active = self.pending.is_some();
        trace!(query_id = context.query_id, active, "provider_is_active");
        active
    }

    fn produce_result(&mut self, context: &QueryContext) -> Option<ProviderResult> {
        let pending = self.pending.take()?;
        if pending.query_id != context.query_id {
            debug!(
                pending_query = pending.query_id,
                query_id = context.query_id,
                "stale_match_discarded"
            );
            return None;
        }

        self.tracker.record_surfaced(pending.result.clone());
        Some(ProviderResult {
            suggestion: pending.result,
            result_type: ResultType::Url,
            source: ResultSource::OtherNetwork,
            suggested_index: self.config.suggested_index,
        })
    }

    fn cancel(&mut self, context: &QueryContext) {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.query_id == context.query_id)
        {
            self.pending = None;
            debug!(query_id = context.query_id, "pending_match_cancelled");
        }
    }

    fn on_session_event(&mut self, event: &SessionEvent) {
        self.pending = None;
        match event {
            SessionEvent::Start => self.tracker.session_start(),
            SessionEvent::Engagement { selected_provider } => {
                self.tracker
                    .session_end(SessionOutcome::Engagement, selected_provider.as_deref());
            }
            SessionEvent::Abandonment => {
                self.tracker.session_end(SessionOutcome::Abandonment, None);
            }
        }
    }
}
