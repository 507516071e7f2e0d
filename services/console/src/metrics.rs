//! Pluggable source for telemetry the network service does not provide yet

use rand::Rng;

/// Placeholder counters for the overview dashboard
#[derive(Debug, Clone, Copy)]
pub struct MetricsSample {
    pub messages_this_month: u64,
    pub system_health_percent: u8,
}

/// Source of telemetry figures that have no remote endpoint yet.
///
/// The rendering path only sees this trait, so a real telemetry backend can
/// replace [`SimulatedMetrics`] without touching the dashboard.
pub trait MetricsSource: Send + Sync {
    /// Fraction of registered gateways assumed online
    fn online_gateway_ratio(&self) -> f64;

    /// Fraction of registered devices assumed online
    fn online_device_ratio(&self) -> f64;

    /// Simulated counters for the overview
    fn sample(&self) -> MetricsSample;
}

/// Placeholder generator producing plausible-looking figures
#[derive(Debug, Default)]
pub struct SimulatedMetrics;

impl MetricsSource for SimulatedMetrics {
    fn online_gateway_ratio(&self) -> f64 {
        0.8
    }

    fn online_device_ratio(&self) -> f64 {
        0.75
    }

    fn sample(&self) -> MetricsSample {
        let mut rng = rand::thread_rng();
        MetricsSample {
            messages_this_month: rng.gen_range(5_000..15_000),
            system_health_percent: rng.gen_range(95..100),
        }
    }
}
