//! Prometheus metrics for the admin client
//!
//! Counters live in a private registry created by [`init_metrics`]. Before
//! that call every recording function does nothing, so library users who do
//! not care about metrics pay only an `OnceLock` lookup.

use prometheus::{
    CounterVec, Gauge, HistogramOpts, HistogramTimer, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

use crate::structure::StructureStatus;

const NAMESPACE: &str = "equilibrium";

struct AdminMetrics {
    registry: Registry,
    gateway_requests: CounterVec,
    gateway_duration: HistogramVec,
    completions: CounterVec,
    materializations: CounterVec,
    queue_length: Gauge,
}

static METRICS: OnceLock<AdminMetrics> = OnceLock::new();

impl AdminMetrics {
    fn build() -> prometheus::Result<Self> {
        let registry = Registry::new_custom(Some(NAMESPACE.to_string()), None)?;

        let gateway_requests = CounterVec::new(
            Opts::new(
                "gateway_requests_total",
                "Gateway requests by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;
        let gateway_duration = HistogramVec::new(
            HistogramOpts::new(
                "gateway_request_duration_seconds",
                "Gateway request duration, retries included",
            )
            .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["endpoint"],
        )?;
        let completions = CounterVec::new(
            Opts::new(
                "queue_completions_total",
                "Complete-registration attempts by outcome",
            ),
            &["outcome"],
        )?;
        let materializations = CounterVec::new(
            Opts::new(
                "structure_materializations_total",
                "Structure groupings by resulting status",
            ),
            &["status"],
        )?;
        let queue_length = Gauge::new(
            "queue_length",
            "Entries in the last successfully fetched queue",
        )?;

        registry.register(Box::new(gateway_requests.clone()))?;
        registry.register(Box::new(gateway_duration.clone()))?;
        registry.register(Box::new(completions.clone()))?;
        registry.register(Box::new(materializations.clone()))?;
        registry.register(Box::new(queue_length.clone()))?;

        Ok(Self {
            registry,
            gateway_requests,
            gateway_duration,
            completions,
            materializations,
            queue_length,
        })
    }
}

/// Create the registry. Later calls are no-ops.
pub fn init_metrics() -> prometheus::Result<()> {
    if METRICS.get().is_some() {
        return Ok(());
    }
    let metrics = AdminMetrics::build()?;
    // a concurrent caller may have won; either registry is fine
    let _ = METRICS.set(metrics);
    tracing::debug!("Metrics registry ready");
    Ok(())
}

pub fn metrics_initialized() -> bool {
    METRICS.get().is_some()
}

/// Prometheus text exposition of everything recorded so far
pub fn encode_metrics() -> prometheus::Result<String> {
    match METRICS.get() {
        Some(m) => TextEncoder::new().encode_to_string(&m.registry.gather()),
        None => Ok(String::new()),
    }
}

pub fn record_gateway_request(endpoint: &str, outcome: &str) {
    if let Some(m) = METRICS.get() {
        m.gateway_requests
            .with_label_values(&[endpoint, outcome])
            .inc();
    }
}

/// `success`, `failure` or `rejected`
pub fn record_completion(outcome: &str) {
    if let Some(m) = METRICS.get() {
        m.completions.with_label_values(&[outcome]).inc();
    }
}

pub fn record_materialization(status: StructureStatus) {
    let Some(m) = METRICS.get() else {
        return;
    };
    let label = match status {
        StructureStatus::Empty => "empty",
        StructureStatus::NoRoot => "no_root",
        StructureStatus::RootRejected => "root_rejected",
        StructureStatus::Rooted => "rooted",
    };
    m.materializations.with_label_values(&[label]).inc();
}

pub fn set_queue_length(len: usize) {
    if let Some(m) = METRICS.get() {
        m.queue_length.set(len as f64);
    }
}

/// Observes the elapsed time when dropped; `None` before [`init_metrics`]
pub fn start_request_timer(endpoint: &str) -> Option<HistogramTimer> {
    METRICS
        .get()
        .map(|m| m.gateway_duration.with_label_values(&[endpoint]).start_timer())
}
