//! Prometheus Metrics Registry - Simulation Observability
//!
//! Registers simulation and sale-tracking metrics and renders them in the
//! Prometheus text format for the `/metrics` endpoint.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::domain::simulation::SimulationResult;

/// Centralized Prometheus metrics for the simulation service.
///
/// All metrics follow the naming convention `listing_sim_*`. The `mode`
/// label is `all` when every marketplace was compared, else `single`.
pub struct MetricsRegistry {
    /// Prometheus registry.
    registry: Registry,
    /// Simulations run.
    pub simulations: IntCounterVec,
    /// Simulations that produced no candidate.
    pub empty_results: IntCounterVec,
    /// Candidates per simulation.
    pub candidates: HistogramVec,
    /// Listings marked as sold.
    pub listings_sold: IntCounter,
}

impl MetricsRegistry {
    /// Create and register all Prometheus metrics.
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let simulations = IntCounterVec::new(
            Opts::new("listing_sim_simulations_total", "Total simulations run"),
            &["mode"],
        )?;

        let empty_results = IntCounterVec::new(
            Opts::new(
                "listing_sim_empty_results_total",
                "Simulations where no shipping method fit",
            ),
            &["mode"],
        )?;

        let candidates = HistogramVec::new(
            HistogramOpts::new("listing_sim_candidates", "Candidates returned per simulation")
                .buckets(vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0, 40.0]),
            &["mode"],
        )?;

        let listings_sold = IntCounter::new("listing_sim_listings_sold_total", "Listings marked as sold")?;

        registry.register(Box::new(simulations.clone()))?;
        registry.register(Box::new(empty_results.clone()))?;
        registry.register(Box::new(candidates.clone()))?;
        registry.register(Box::new(listings_sold.clone()))?;

        Ok(Self {
            registry,
            simulations,
            empty_results,
            candidates,
            listings_sold,
        })
    }

    /// Record the outcome of one engine run.
    #[allow(clippy::cast_precision_loss)]
    pub fn observe_simulation(&self, compare_all: bool, result: &SimulationResult) {
        let mode = if compare_all { "all" } else { "single" };
        self.simulations.with_label_values(&[mode]).inc();
        self.candidates
            .with_label_values(&[mode])
            .observe(result.candidates.len() as f64);
        if result.is_empty() {
            self.empty_results.with_label_values(&[mode]).inc();
        }
    }

    /// Encode every registered metric in the text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
