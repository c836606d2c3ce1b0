//! Prometheus exposition of gateway readings.
//!
//! [`ExporterMetrics`] is built once at startup and shared with the web
//! handlers. It owns the exporter's self-monitoring metrics. Gateway samples
//! are never stored in it: each scrape builds its own short-lived registry
//! from the [`Stats`] it fetched, so concurrent scrapes cannot overwrite each
//! other's values.

use crate::error::{ExporterError, Result};
use crate::metrics::data::{Stats, PHASES};
use crate::metrics::traits::StatsSource;
use prometheus::proto::MetricFamily;
use prometheus::{
    Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, IntCounter, IntCounterVec,
    IntGauge, IntGaugeVec, Opts, Registry, TextEncoder,
};
use std::time::Instant;
use tracing::{debug, error, warn};

/// Prefix of every metric describing the gateway.
pub const GATEWAY_PREFIX: &str = "smartmeter_gateway";

/// Prefix of the exporter's self-monitoring metrics.
pub const EXPORTER_PREFIX: &str = "smartmeter_exporter";

/// Error kinds pre-initialized on the scrape error counter.
const ERROR_KINDS: [&str; 6] = [
    "configuration",
    "transport",
    "gateway",
    "decode",
    "field_parse",
    "metrics",
];

const DURATION_BUCKETS: [f64; 9] = [0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 10.0];

/// Process-wide metrics registry for the exporter.
#[derive(Clone)]
pub struct ExporterMetrics {
    registry: Registry,
    scrapes: IntCounter,
    scrape_errors: IntCounterVec,
    scrape_duration: Histogram,
}

impl ExporterMetrics {
    /// Create and register the self-monitoring metrics.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let scrapes = IntCounter::new(
            format!("{}_scrapes_total", EXPORTER_PREFIX),
            "Number of gateway scrapes performed",
        )?;
        registry.register(Box::new(scrapes.clone()))?;

        let scrape_errors = IntCounterVec::new(
            Opts::new(
                format!("{}_scrape_errors_total", EXPORTER_PREFIX),
                "Number of failed gateway scrapes by error kind",
            ),
            &["kind"],
        )?;
        registry.register(Box::new(scrape_errors.clone()))?;
        for kind in ERROR_KINDS {
            scrape_errors.with_label_values(&[kind]);
        }

        let scrape_duration = Histogram::with_opts(
            HistogramOpts::new(
                format!("{}_scrape_duration_seconds", EXPORTER_PREFIX),
                "Time spent fetching and converting one gateway reading",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
        )?;
        registry.register(Box::new(scrape_duration.clone()))?;

        Ok(Self {
            registry,
            scrapes,
            scrape_errors,
            scrape_duration,
        })
    }

    /// The registry holding the self-monitoring metrics.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Content type of the rendered exposition.
    pub fn content_type(&self) -> String {
        TextEncoder::new().format_type().to_string()
    }

    /// Run one scrape cycle against `source` and render the exposition.
    ///
    /// A failed fetch or conversion is logged and counted, and the result
    /// reports `smartmeter_gateway_up 0` with no gateway samples. Only a
    /// failure to encode the exposition itself is returned as an error.
    pub async fn scrape(&self, source: &dyn StatsSource) -> Result<String> {
        let start = Instant::now();
        let outcome = source.current_stats().await;

        let families = match outcome {
            Ok(stats) => match gateway_families(Some(&stats)) {
                Ok(families) => families,
                Err(e) => {
                    self.record_error(&e);
                    gateway_families(None)?
                }
            },
            Err(e) => {
                self.record_error(&e);
                gateway_families(None)?
            }
        };

        let elapsed = start.elapsed();
        self.scrapes.inc();
        self.scrape_duration.observe(elapsed.as_secs_f64());
        debug!(elapsed_ms = elapsed.as_millis() as u64, "Scrape finished");

        self.encode(families)
    }

    /// Render an already converted reading, without touching the scrape counters.
    pub fn render(&self, stats: &Stats) -> Result<String> {
        self.encode(gateway_families(Some(stats))?)
    }

    fn record_error(&self, err: &ExporterError) {
        match err {
            ExporterError::FieldParse { .. } | ExporterError::Metrics(_) => {
                error!(kind = err.kind(), "Scrape failed: {}", err)
            }
            _ => warn!(kind = err.kind(), "Scrape failed: {}", err),
        }
        self.scrape_errors.with_label_values(&[err.kind()]).inc();
    }

    fn encode(&self, gateway: Vec<MetricFamily>) -> Result<String> {
        let mut families = self.registry.gather();
        families.extend(gateway);

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| ExporterError::metrics_error(format!("Exposition is not UTF-8: {}", e)))
    }
}

/// Build the gateway metric families for one scrape.
///
/// `None` yields only `smartmeter_gateway_up 0`.
fn gateway_families(stats: Option<&Stats>) -> Result<Vec<MetricFamily>> {
    let registry = Registry::new();

    let up = IntGauge::new(
        format!("{}_up", GATEWAY_PREFIX),
        "Whether the last gateway reading succeeded",
    )?;
    up.set(stats.is_some() as i64);
    registry.register(Box::new(up))?;

    if let Some(stats) = stats {
        register_stats(&registry, stats)?;
    }

    Ok(registry.gather())
}

fn register_stats(registry: &Registry, stats: &Stats) -> Result<()> {
    let firmware = &stats.firmware;
    int_gauge(registry, "firmware_running", "Current version of the running firmware", firmware.running)?;
    int_gauge(registry, "firmware_available", "Latest available version of the firmware", firmware.available)?;
    int_gauge(
        registry,
        "firmware_update_available",
        "If there is a new version of the firmware available",
        firmware.update_available as i64,
    )?;

    let gas = &stats.gas;
    counter(registry, "gas_consumed", "The total amount of gas consumed in cubic meters", gas.consumed)?;
    gauge(
        registry,
        "gas_consumed_hour",
        "The amount of gas consumed in the current hour in cubic meters",
        gas.consumed_hour,
    )?;

    let power = &stats.power;
    int_gauge(registry, "power_tariff", "The active electricity tariff", power.tariff)?;
    counter_vec(
        registry,
        "power_consumed_tariff",
        "Total energy consumed per tariff in kWh",
        "tariff",
        &[("1", power.consumed_tariff1), ("2", power.consumed_tariff2)],
    )?;
    counter_vec(
        registry,
        "power_produced_tariff",
        "Total energy produced per tariff in kWh",
        "tariff",
        &[("1", power.produced_tariff1), ("2", power.produced_tariff2)],
    )?;
    int_gauge(registry, "power_consumed", "Power currently consumed over all phases", power.consumed_total)?;
    int_gauge(registry, "power_produced", "Power currently produced over all phases", power.produced_total)?;
    phase_gauge(registry, "power_consumed_phase", "Power currently consumed per phase", power.consumed_phases())?;
    phase_gauge(registry, "power_produced_phase", "Power currently produced per phase", power.produced_phases())?;
    phase_gauge(registry, "voltage", "Voltage per phase", power.voltage_phases())?;
    phase_gauge(registry, "current", "Current per phase", power.current_phases())?;
    gauge(
        registry,
        "power_consumed_hour",
        "Energy consumed in the current hour in kWh",
        power.consumed_hour,
    )?;
    gauge(registry, "power_consumed_net", "Net power currently consumed", power.consumed_net)?;

    Ok(())
}

fn metric_name(suffix: &str) -> String {
    format!("{}_{}", GATEWAY_PREFIX, suffix)
}

fn int_gauge(registry: &Registry, suffix: &str, help: &str, value: i64) -> Result<()> {
    let metric = IntGauge::new(metric_name(suffix), help)?;
    metric.set(value);
    registry.register(Box::new(metric))?;
    Ok(())
}

fn gauge(registry: &Registry, suffix: &str, help: &str, value: f64) -> Result<()> {
    let metric = Gauge::new(metric_name(suffix), help)?;
    metric.set(value);
    registry.register(Box::new(metric))?;
    Ok(())
}

fn phase_gauge(registry: &Registry, suffix: &str, help: &str, values: [i64; 3]) -> Result<()> {
    let metric = IntGaugeVec::new(Opts::new(metric_name(suffix), help), &["phase"])?;
    for (phase, value) in PHASES.iter().zip(values) {
        metric.with_label_values(&[*phase]).set(value);
    }
    registry.register(Box::new(metric))?;
    Ok(())
}

fn counter(registry: &Registry, suffix: &str, help: &str, value: f64) -> Result<()> {
    let name = metric_name(suffix);
    check_counter_value(&name, value)?;
    let metric = Counter::new(name, help)?;
    metric.inc_by(value);
    registry.register(Box::new(metric))?;
    Ok(())
}

fn counter_vec(
    registry: &Registry,
    suffix: &str,
    help: &str,
    label: &str,
    values: &[(&str, f64)],
) -> Result<()> {
    let name = metric_name(suffix);
    let metric = CounterVec::new(Opts::new(name.clone(), help), &[label])?;
    for (label_value, value) in values {
        check_counter_value(&name, *value)?;
        metric.with_label_values(&[*label_value]).inc_by(*value);
    }
    registry.register(Box::new(metric))?;
    Ok(())
}

// Counters only move up from zero; the prometheus crate panics otherwise.
fn check_counter_value(name: &str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(ExporterError::metrics_error(format!(
            "Counter {} cannot represent value {}",
            name, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedSource(fn() -> Result<Stats>);

    #[async_trait]
    impl StatsSource for FixedSource {
        async fn current_stats(&self) -> Result<Stats> {
            (self.0)()
        }
    }

    fn sample_stats() -> Stats {
        let mut stats = Stats::default();
        stats.firmware.running = 50;
        stats.firmware.update_available = true;
        stats.gas.consumed = 1234.56;
        stats.power.tariff = 2;
        stats.power.consumed_tariff1 = 1500.5;
        stats.power.voltage_l2 = 229;
        stats
    }

    #[test]
    fn test_render_contains_every_family() {
        let metrics = ExporterMetrics::new().unwrap();
        let text = metrics.render(&sample_stats()).unwrap();

        assert!(text.contains("smartmeter_gateway_up 1"));
        assert!(text.contains("smartmeter_gateway_firmware_running 50"));
        assert!(text.contains("smartmeter_gateway_firmware_update_available 1"));
        assert!(text.contains("# TYPE smartmeter_gateway_gas_consumed counter"));
        assert!(text.contains("smartmeter_gateway_gas_consumed 1234.56"));
        assert!(text.contains("smartmeter_gateway_power_tariff 2"));
        assert!(text.contains("smartmeter_gateway_power_consumed_tariff{tariff=\"1\"} 1500.5"));
        assert!(text.contains("smartmeter_gateway_voltage{phase=\"l2\"} 229"));
        assert!(text.contains("# TYPE smartmeter_gateway_power_consumed_net gauge"));
        assert!(text.contains("smartmeter_exporter_scrapes_total 0"));
    }

    #[tokio::test]
    async fn test_failed_scrape_reports_down() {
        let metrics = ExporterMetrics::new().unwrap();
        let source = FixedSource(|| Err(ExporterError::Gateway { status: 500 }));

        let text = metrics.scrape(&source).await.unwrap();
        assert!(text.contains("smartmeter_gateway_up 0"));
        assert!(!text.contains("smartmeter_gateway_firmware_running"));
        assert!(text.contains("smartmeter_exporter_scrape_errors_total{kind=\"gateway\"} 1"));
        assert!(text.contains("smartmeter_exporter_scrape_errors_total{kind=\"decode\"} 0"));
        assert!(text.contains("smartmeter_exporter_scrapes_total 1"));
    }

    #[tokio::test]
    async fn test_negative_counter_fails_scrape_without_panic() {
        let metrics = ExporterMetrics::new().unwrap();
        let source = FixedSource(|| {
            let mut stats = Stats::default();
            stats.power.produced_tariff2 = -1.0;
            Ok(stats)
        });

        let text = metrics.scrape(&source).await.unwrap();
        assert!(text.contains("smartmeter_gateway_up 0"));
        assert!(text.contains("smartmeter_exporter_scrape_errors_total{kind=\"metrics\"} 1"));
    }

    #[test]
    fn test_successful_scrape_counts() {
        let metrics = ExporterMetrics::new().unwrap();
        let source = FixedSource(|| Ok(sample_stats()));

        tokio_test::assert_ok!(tokio_test::block_on(metrics.scrape(&source)));
        let text = tokio_test::block_on(metrics.scrape(&source)).unwrap();
        assert!(text.contains("smartmeter_gateway_up 1"));
        assert!(text.contains("smartmeter_exporter_scrapes_total 2"));
        assert!(text.contains("smartmeter_exporter_scrape_duration_seconds_count 2"));
    }
}
