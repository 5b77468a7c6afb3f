use std::sync::Arc;

use catalog::{SuggestionCatalog, SuggestionResult};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::telemetry::{TelemetrySink, VisitListener};
use crate::types::SessionOutcome;

/// Where the tracker is within the current address-bar session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    /// No session has started yet.
    Idle,
    /// A session is in progress.
    Active,
    /// The session ended with the user selecting a result.
    Engaged,
    /// The session ended without a selection.
    Abandoned,
}

/// What a call to [`EngagementTracker::session_end`] emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    /// The impression counter was incremented.
    pub impression: bool,
    /// The visited signal fired with this URL.
    pub visited: Option<String>,
}

/// Decides when a shown suggestion counts as an impression.
///
/// One impression is counted per session in which at least one suggestion was
/// surfaced, however many keystrokes matched and whether the session ended in
/// an engagement or an abandonment. Once surfaced, a session stays "shown"
/// until the next start even if later keystrokes stop matching.
pub struct EngagementTracker {
    provider: String,
    impression_scalar: String,
    phase: SessionPhase,
    result_shown: bool,
    last_result: Option<SuggestionResult>,
    telemetry: Arc<dyn TelemetrySink>,
    visits: Arc<dyn VisitListener>,
}

impl EngagementTracker {
    pub fn new(
        config: &ProviderConfig,
        telemetry: Arc<dyn TelemetrySink>,
        visits: Arc<dyn VisitListener>,
    ) -> Self {
        Self {
            provider: config.name.clone(),
            impression_scalar: config.impression_scalar.clone(),
            phase: SessionPhase::Idle,
            result_shown: false,
            last_result: None,
            telemetry,
            visits,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Whether a suggestion was surfaced in the current session.
    pub fn result_shown(&self) -> bool {
        self.result_shown
    }

    /// Most recently surfaced suggestion of the current session.
    pub fn last_result(&self) -> Option<&SuggestionResult> {
        self.last_result.as_ref()
    }

    pub fn session_start(&mut self) {
        self.phase = SessionPhase::Active;
        self.result_shown = false;
        self.last_result = None;
        debug!(provider = %self.provider, "session_start");
    }

    /// Notes that `result` was handed to the host.
    ///
    /// Surfacing outside an active session opens one, so a host that skips
    /// the start notification still gets correct counts.
    pub fn record_surfaced(&mut self, result: SuggestionResult) {
        if self.phase != SessionPhase::Active {
            debug!(provider = %self.provider, phase = ?self.phase, "implicit_session_start");
            self.session_start();
        }
        self.result_shown = true;
        self.last_result = Some(result);
    }

    /// Queries `catalog` for `text` and surfaces the match, if any.
    pub fn match_attempt(
        &mut self,
        catalog: &SuggestionCatalog,
        text: &str,
    ) -> Option<SuggestionResult> {
        let result = catalog.query(text)?;
        self.record_surfaced(result.clone());
        Some(result)
    }

    /// Ends the session and emits its telemetry.
    ///
    /// `selected_provider` is the host's report of whose result the user
    /// picked; the visited signal only fires when it names this provider.
    /// Ending a session that is not active emits nothing.
    pub fn session_end(
        &mut self,
        outcome: SessionOutcome,
        selected_provider: Option<&str>,
    ) -> SessionReport {
        if self.phase != SessionPhase::Active {
            debug!(provider = %self.provider, phase = ?self.phase, ?outcome, "session_end_ignored");
            return SessionReport::default();
        }
        self.phase = match outcome {
            SessionOutcome::Engagement => SessionPhase::Engaged,
            SessionOutcome::Abandonment => SessionPhase::Abandoned,
        };

        let mut report = SessionReport::default();
        if !self.result_shown {
            return report;
        }

        self.telemetry
            .keyed_scalar_add(&self.impression_scalar, &self.provider, 1);
        report.impression = true;
        info!(provider = %self.provider, ?outcome, "impression_recorded");

        let selected_ours = selected_provider == Some(self.provider.as_str());
        if outcome == SessionOutcome::Engagement && selected_ours {
            if let Some(result) = &self.last_result {
                self.visits.result_visited(&result.url);
                info!(provider = %self.provider, url = %result.url, "result_visited");
                report.visited = Some(result.url.clone());
            }
        }
        report
    }
}

impl std::fmt::Debug for EngagementTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngagementTracker")
            .field("provider", &self.provider)
            .field("phase", &self.phase)
            .field("result_shown", &self.result_shown)
            .finish_non_exhaustive()
    }
}
