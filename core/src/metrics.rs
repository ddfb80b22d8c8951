use prometheus::{IntCounter, Opts, Registry};

/// Tellere for analysekjøringer. Eget register per instans (ingen global state).
#[derive(Clone)]
pub struct PipelineMetrics {
    registry: Registry,
    pub runs_total: IntCounter,
    pub samples_total: IntCounter,
    pub low_confidence_samples_total: IntCounter,
    pub corners_total: IntCounter,
    pub corners_discarded_total: IntCounter,
    pub stale_results_total: IntCounter,
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let c = IntCounter::with_opts(Opts::new(name, help))?;
    registry.register(Box::new(c.clone()))?;
    Ok(c)
}

impl PipelineMetrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();
        Ok(Self {
            runs_total: counter(&registry, "cornergraph_runs_total", "Completed analysis runs")?,
            samples_total: counter(&registry, "cornergraph_samples_total", "Telemetry samples analysed")?,
            low_confidence_samples_total: counter(
                &registry,
                "cornergraph_low_confidence_samples_total",
                "Samples below the confidence floor",
            )?,
            corners_total: counter(&registry, "cornergraph_corners_total", "Corner segments kept")?,
            corners_discarded_total: counter(
                &registry,
                "cornergraph_corners_discarded_total",
                "High lateral-G runs discarded as noise",
            )?,
            stale_results_total: counter(
                &registry,
                "cornergraph_stale_results_total",
                "Results dropped because a newer run had started",
            )?,
            registry,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Tekstformat for scraping/logging.
    pub fn render(&self) -> String {
        use prometheus::Encoder;
        let mut buf = Vec::new();
        let encoder = prometheus::TextEncoder::new();
        if encoder.encode(&self.registry.gather(), &mut buf).is_err() {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}
