//! # Prometheus Metrics
//!
//! Exposes sale metrics for the mint service. Scraped by Prometheus at the
//! `/metrics` HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] under
//! the `mintgate` namespace so they do not collide with any default global
//! registry consumers.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

use mintgate_contracts::AllocationState;

/// Holds all Prometheus metric handles for the service.
///
/// Clone-friendly (prometheus handles are `Arc` internally) so it can be
/// shared across request handlers.
#[derive(Clone)]
pub struct MintMetrics {
    /// Prometheus registry that owns all metrics below.
    registry: Registry,
    /// Identifiers issued through any path, genesis excluded.
    pub tokens_issued_total: IntCounterVec,
    /// Issuing requests received, by path.
    pub mint_requests_total: IntCounterVec,
    /// Rejected requests, by path and reason code.
    pub mint_rejections_total: IntCounterVec,
    /// Mirrors the controller's issued counter.
    pub issued_count: IntGauge,
    /// Remaining presale pool.
    pub presale_pool_remaining: IntGauge,
    /// Remaining reserved pool.
    pub reserved_pool_remaining: IntGauge,
    /// Admin calls that committed.
    pub admin_operations_total: IntCounter,
}

impl MintMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("mintgate".into()), None)?;

        let tokens_issued_total = IntCounterVec::new(
            Opts::new("tokens_issued_total", "Identifiers issued, by path"),
            &["path"],
        )?;
        registry.register(Box::new(tokens_issued_total.clone()))?;

        let mint_requests_total = IntCounterVec::new(
            Opts::new("mint_requests_total", "Issuing requests received, by path"),
            &["path"],
        )?;
        registry.register(Box::new(mint_requests_total.clone()))?;

        let mint_rejections_total = IntCounterVec::new(
            Opts::new(
                "mint_rejections_total",
                "Rejected requests, by path and reason code",
            ),
            &["path", "reason"],
        )?;
        registry.register(Box::new(mint_rejections_total.clone()))?;

        let issued_count = IntGauge::new("issued_count", "Identifiers issued so far")?;
        registry.register(Box::new(issued_count.clone()))?;

        let presale_pool_remaining =
            IntGauge::new("presale_pool_remaining", "Remaining presale allocation")?;
        registry.register(Box::new(presale_pool_remaining.clone()))?;

        let reserved_pool_remaining =
            IntGauge::new("reserved_pool_remaining", "Remaining reserved allocation")?;
        registry.register(Box::new(reserved_pool_remaining.clone()))?;

        let admin_operations_total =
            IntCounter::new("admin_operations_total", "Committed admin operations")?;
        registry.register(Box::new(admin_operations_total.clone()))?;

        Ok(Self {
            registry,
            tokens_issued_total,
            mint_requests_total,
            mint_rejections_total,
            issued_count,
            presale_pool_remaining,
            reserved_pool_remaining,
            admin_operations_total,
        })
    }

    /// Copies the pool and counter gauges from the current state.
    pub fn observe(&self, state: &AllocationState) {
        self.issued_count.set(clamp(state.issued_count()));
        self.presale_pool_remaining.set(clamp(state.presale_pool()));
        self.reserved_pool_remaining.set(clamp(state.reserved_pool()));
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<MintMetrics>;

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
