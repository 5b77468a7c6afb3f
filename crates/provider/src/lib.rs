//! # Keyword Provider (`provider`)
//!
//! Connects a [`catalog::SuggestionCatalog`] to a host address bar and
//! counts impressions.
//!
//! - [`UrlbarProvider`]: the capability interface the host drives.
//! - [`KeywordProvider`]: the catalog-backed implementation.
//! - [`EngagementTracker`]: per-session state machine that fires the keyed
//!   impression counter at most once per session, plus the visited signal on
//!   qualifying engagements.
//!
//! ## Observability
//!
//! Telemetry goes through [`TelemetrySink`] and [`VisitListener`]. Install
//! [`MetricsTelemetry`] to report impressions through the `metrics` facade,
//! or [`NoopTelemetry`] to drop them.

mod config;
mod provider;
mod telemetry;
mod tracker;
mod types;

#[cfg(test)]
mod test_support;

pub use crate::config::{ConfigError, ProviderConfig};
pub use crate::provider::{KeywordProvider, UrlbarProvider};
pub use crate::telemetry::{MetricsTelemetry, NoopTelemetry, TelemetrySink, VisitListener};
pub use crate::tracker::{EngagementTracker, SessionPhase, SessionReport};
pub use crate::types::{
    ProviderResult, QueryContext, ResultSource, ResultType, SessionEvent, SessionOutcome,
};
