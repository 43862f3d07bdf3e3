//! Request counters and a sliding window of search latencies.

use std::collections::VecDeque;
use std::time::Duration;

/// Number of most recent search latencies kept for the summary.
pub const DEFAULT_LATENCY_WINDOW: usize = 1024;

/// Latency statistics over the current window, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencySummary {
    pub avg_us: f64,
    pub p50_us: f64,
    pub p95_us: f64,
    pub p99_us: f64,
}

/// Counts API traffic. Totals cover the process lifetime; latency
/// statistics cover only the last `window` searches.
#[derive(Debug)]
pub struct MetricsCollector {
    latencies_us: VecDeque<f64>,
    window: usize,
    searches: u64,
    inserts: u64,
    rejected: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_LATENCY_WINDOW)
    }

    /// A collector remembering at most `window` latencies (at least one).
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            latencies_us: VecDeque::with_capacity(window),
            window,
            searches: 0,
            inserts: 0,
            rejected: 0,
        }
    }

    /// Count a completed search; the oldest latency drops out once the
    /// window is full.
    pub fn record_query(&mut self, duration: Duration) {
        self.searches += 1;
        if self.latencies_us.len() == self.window {
            self.latencies_us.pop_front();
        }
        self.latencies_us.push_back(duration.as_secs_f64() * 1e6);
    }

    pub fn record_insert(&mut self) {
        self.inserts += 1;
    }

    /// Count a request the store refused (bad shape, unknown label, zero vector).
    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    pub fn total_queries(&self) -> u64 {
        self.searches
    }

    pub fn total_inserts(&self) -> u64 {
        self.inserts
    }

    pub fn total_rejected(&self) -> u64 {
        self.rejected
    }

    /// Latencies currently held, at most the window size.
    pub fn window_len(&self) -> usize {
        self.latencies_us.len()
    }

    /// Average and nearest-rank percentiles over the window. All zero when
    /// no search has been recorded.
    pub fn latency_summary(&self) -> LatencySummary {
        if self.latencies_us.is_empty() {
            return LatencySummary::default();
        }

        let mut sorted: Vec<f64> = self.latencies_us.iter().copied().collect();
        sorted.sort_unstable_by(f64::total_cmp);
        let avg_us = sorted.iter().sum::<f64>() / sorted.len() as f64;

        let at = |p: f64| {
            let last = sorted.len() - 1;
            let idx = ((p / 100.0) * last as f64).round() as usize;
            sorted[idx.min(last)]
        };

        LatencySummary {
            avg_us,
            p50_us: at(50.0),
            p95_us: at(95.0),
            p99_us: at(99.0),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_counters() {
        let mut m = MetricsCollector::new();
        m.record_insert();
        m.record_insert();
        m.record_rejected();

        assert_eq!(m.total_inserts(), 2);
        assert_eq!(m.total_rejected(), 1);
        assert_eq!(m.total_queries(), 0);
    }

    #[test]
    fn test_latency_summary() {
        let mut m = MetricsCollector::new();
        m.record_query(Duration::from_micros(300));
        m.record_query(Duration::from_micros(100));
        m.record_query(Duration::from_micros(200));

        let summary = m.latency_summary();
        assert_eq!(m.total_queries(), 3);
        assert_relative_eq!(summary.avg_us, 200.0, epsilon = 1e-6);
        assert_relative_eq!(summary.p50_us, 200.0, epsilon = 1e-6);
        assert_relative_eq!(summary.p99_us, 300.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_summary() {
        let m = MetricsCollector::new();
        assert_eq!(m.latency_summary(), LatencySummary::default());
    }

    #[test]
    fn test_window_stays_bounded() {
        let mut m = MetricsCollector::with_window(4);
        for us in 1..=10 {
            m.record_query(Duration::from_micros(us * 100));
        }

        assert_eq!(m.total_queries(), 10);
        assert_eq!(m.window_len(), 4);
        // Only 700..=1000 remain
        let summary = m.latency_summary();
        assert_relative_eq!(summary.avg_us, 850.0, epsilon = 1e-6);
        assert_relative_eq!(summary.p99_us, 1000.0, epsilon = 1e-6);
        assert!(summary.p50_us >= 700.0);
    }

    #[test]
    fn test_zero_window_keeps_one() {
        let mut m = MetricsCollector::with_window(0);
        m.record_query(Duration::from_micros(5));
        m.record_query(Duration::from_micros(9));
        assert_eq!(m.window_len(), 1);
        assert_relative_eq!(m.latency_summary().p50_us, 9.0, epsilon = 1e-6);
    }
}
