// Telemetry hooks for the provider crate.
//
// The tracker reports through two narrow traits so that it never depends on a
// particular host: `TelemetrySink` for the keyed impression counter and
// `VisitListener` for the "result visited" signal.
use tracing::debug;

/// Keyed counter backend.
pub trait TelemetrySink: Send + Sync {
    /// Adds `amount` to the counter `scalar` under `key`.
    fn keyed_scalar_add(&self, scalar: &str, key: &str, amount: u64);
}

/// Receives the destination of a selected suggestion.
pub trait VisitListener: Send + Sync {
    fn result_visited(&self, url: &str);
}

/// Reports keyed scalars as `metrics` counters labelled with `key`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsTelemetry;

impl TelemetrySink for MetricsTelemetry {
    fn keyed_scalar_add(&self, scalar: &str, key: &str, amount: u64) {
        metrics::counter!(scalar.to_string(), "key" => key.to_string()).increment(amount);
    }
}

/// Discards everything. Used when the host installs no backend.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTelemetry;

impl TelemetrySink for NoopTelemetry {
    fn keyed_scalar_add(&self, scalar: &str, key: &str, amount: u64) {
        debug!(scalar, key, amount, "telemetry_dropped");
    }
}

impl VisitListener for NoopTelemetry {
    fn result_visited(&self, url: &str) {
        debug!(url, "visit_dropped");
    }
}
