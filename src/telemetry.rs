//! Opt-in tracing setup for hosts embedding the chart.
//!
//! The chart itself only emits `tracing` events: drag lifecycle at `debug`,
//! per-pointer decisions at `trace`, renderer failures at `warn`. Hosts that
//! already run a subscriber need nothing from this module.

/// Filter used when `RUST_LOG` is unset: warnings everywhere, chart
/// lifecycle events from this crate.
pub const DEFAULT_TRACING_FILTER: &str = "warn,period_chart=info";

/// Installs a compact global subscriber filtered by `RUST_LOG`, or by
/// `fallback_filter` when the variable is unset or unparsable.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_tracing(fallback_filter: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(fallback_filter))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TRACING_FILTER));
        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback_filter;
        false
    }
}

#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing(DEFAULT_TRACING_FILTER)
}

#[cfg(test)]
mod tests {
    use super::{init_default_tracing, init_tracing};

    #[cfg(not(feature = "telemetry"))]
    #[test]
    fn init_is_noop_without_telemetry_feature() {
        assert!(!init_default_tracing());
        assert!(!init_tracing("period_chart=trace"));
    }

    #[cfg(feature = "telemetry")]
    #[test]
    fn second_init_reports_existing_subscriber() {
        let _ = init_tracing("period_chart=trace");
        assert!(!init_default_tracing());
    }
}
