use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// One recorded query timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEntry {
    pub timestamp: DateTime<Utc>,
    pub operation: String, // "validate" | "list_ids" | "list_records"
    pub outcome: String,   // "available" | "unavailable" | "ok"
    pub duration_ns: u64,
    pub duration_us: f64,
    pub duration_ms: f64,
    pub item_count: usize,
}

impl MetricEntry {
    pub fn new(
        operation: impl Into<String>,
        outcome: impl Into<String>,
        elapsed: Duration,
        item_count: usize,
    ) -> Self {
        let duration_ns = elapsed.as_nanos() as u64;
        Self {
            timestamp: Utc::now(),
            operation: operation.into(),
            outcome: outcome.into(),
            duration_ns,
            duration_us: duration_ns as f64 / 1_000.0,
            duration_ms: duration_ns as f64 / 1_000_000.0,
            item_count,
        }
    }
}

/// Entries kept before the oldest start being dropped.
pub const DEFAULT_CAPACITY: usize = 10_000;

/// In-memory ring of the most recent query timings.
#[derive(Debug)]
pub struct MetricsStore {
    pub entries: VecDeque<MetricEntry>,
    capacity: usize,
    /// Entries dropped to stay within `capacity`.
    pub evicted: u64,
}

impl Default for MetricsStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl MetricsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
            evicted: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&mut self, entry: MetricEntry) {
        if self.capacity == 0 {
            self.evicted += 1;
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(entry);
    }

    pub fn record_validation(&mut self, elapsed: Duration, available: bool) {
        let outcome = if available { "available" } else { "unavailable" };
        self.record(MetricEntry::new("validate", outcome, elapsed, 1));
    }

    pub fn record_listing(&mut self, operation: &str, elapsed: Duration, item_count: usize) {
        self.record(MetricEntry::new(operation, "ok", elapsed, item_count));
    }

    /// Aggregate stats per (operation, outcome) pair, sorted by key.
    pub fn aggregated(&self) -> Vec<AggregatedMetric> {
        let mut map: HashMap<(String, String), Vec<u64>> = HashMap::new();

        for e in &self.entries {
            map.entry((e.operation.clone(), e.outcome.clone()))
                .or_default()
                .push(e.duration_ns);
        }

        let mut out: Vec<AggregatedMetric> = map
            .into_iter()
            .map(|((operation, outcome), mut durations)| {
                durations.sort_unstable();
                let count = durations.len();
                let total: u64 = durations.iter().sum();
                let avg = total / count as u64;
                let pick = |q: f64| durations[((count as f64 * q) as usize).min(count - 1)];
                let p95 = pick(0.95);

                AggregatedMetric {
                    operation,
                    outcome,
                    sample_count: count,
                    min_ns: durations[0],
                    max_ns: durations[count - 1],
                    avg_ns: avg,
                    p50_ns: pick(0.5),
                    p95_ns: p95,
                    p99_ns: pick(0.99),
                    avg_ms: avg as f64 / 1_000_000.0,
                    p95_ms: p95 as f64 / 1_000_000.0,
                }
            })
            .collect();

        out.sort_by(|a, b| {
            a.operation
                .cmp(&b.operation)
                .then_with(|| a.outcome.cmp(&b.outcome))
        });
        out
    }

    /// Export all entries as a CSV string.
    pub fn to_csv(&self) -> anyhow::Result<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            "timestamp",
            "operation",
            "outcome",
            "duration_ns",
            "duration_us",
            "duration_ms",
            "item_count",
        ])?;

        for e in &self.entries {
            wtr.write_record([
                e.timestamp.to_rfc3339(),
                e.operation.clone(),
                e.outcome.clone(),
                e.duration_ns.to_string(),
                format!("{:.3}", e.duration_us),
                format!("{:.6}", e.duration_ms),
                e.item_count.to_string(),
            ])?;
        }

        let data = wtr.into_inner()?;
        Ok(String::from_utf8(data)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedMetric {
    pub operation: String,
    pub outcome: String,
    pub sample_count: usize,
    pub min_ns: u64,
    pub max_ns: u64,
    pub avg_ns: u64,
    pub p50_ns: u64,
    pub p95_ns: u64,
    pub p99_ns: u64,
    pub avg_ms: f64,
    pub p95_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(n: u64) -> Duration {
        Duration::from_nanos(n)
    }

    #[test]
    fn new_store_aggregates_to_nothing() {
        assert!(MetricsStore::new().aggregated().is_empty());
    }

    #[test]
    fn entry_converts_units() {
        let e = MetricEntry::new("validate", "available", ns(2_500_000), 1);
        assert_eq!(e.duration_ns, 2_500_000);
        assert!((e.duration_us - 2_500.0).abs() < f64::EPSILON);
        assert!((e.duration_ms - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn validations_split_by_outcome() {
        let mut store = MetricsStore::new();
        store.record_validation(ns(100), true);
        store.record_validation(ns(300), true);
        store.record_validation(ns(50), false);

        let agg = store.aggregated();
        assert_eq!(agg.len(), 2);
        assert_eq!(agg[0].outcome, "available");
        assert_eq!(agg[0].sample_count, 2);
        assert_eq!(agg[0].min_ns, 100);
        assert_eq!(agg[0].max_ns, 300);
        assert_eq!(agg[0].avg_ns, 200);
        assert_eq!(agg[1].outcome, "unavailable");
        assert_eq!(agg[1].sample_count, 1);
    }

    #[test]
    fn percentiles_on_a_single_sample() {
        let mut store = MetricsStore::new();
        store.record_listing("list_ids", ns(42), 5);
        let row = &store.aggregated()[0];
        assert_eq!((row.p50_ns, row.p95_ns, row.p99_ns), (42, 42, 42));
    }

    #[test]
    fn percentiles_over_a_range() {
        let mut store = MetricsStore::new();
        for i in 1..=100 {
            store.record_listing("list_records", ns(i), 0);
        }
        let row = &store.aggregated()[0];
        assert_eq!(row.p50_ns, 51);
        assert_eq!(row.p95_ns, 96);
        assert_eq!(row.p99_ns, 100);
    }

    #[test]
    fn store_never_grows_past_capacity() {
        let mut store = MetricsStore::with_capacity(3);
        for i in 1..=10 {
            store.record_validation(ns(i), true);
        }
        assert_eq!(store.entries.len(), 3);
        assert_eq!(store.evicted, 7);
        let kept: Vec<u64> = store.entries.iter().map(|e| e.duration_ns).collect();
        assert_eq!(kept, vec![8, 9, 10], "oldest entries are dropped first");
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut store = MetricsStore::with_capacity(0);
        store.record_listing("list_ids", ns(1), 1);
        assert!(store.entries.is_empty());
        assert!(store.aggregated().is_empty());
        assert_eq!(store.evicted, 1);
    }

    #[test]
    fn default_capacity_applies() {
        let mut store = MetricsStore::new();
        assert_eq!(store.capacity(), DEFAULT_CAPACITY);
        for _ in 0..DEFAULT_CAPACITY + 5 {
            store.record_validation(ns(1), false);
        }
        assert_eq!(store.entries.len(), DEFAULT_CAPACITY);
        assert_eq!(store.evicted, 5);
    }

    #[test]
    fn csv_has_header_and_one_line_per_entry() {
        let mut store = MetricsStore::new();
        store.record_validation(ns(10), false);
        store.record_listing("list_ids", ns(20), 3);

        let csv = store.to_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("timestamp,operation,outcome"));
        assert!(lines[1].contains(",validate,unavailable,10,"));
        assert!(lines[2].ends_with(",3"));
    }
}
