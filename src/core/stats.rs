use average::{Estimate, Mean};
use rustc_hash::FxHashMap;

use super::job::Job;
use super::SimTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    QueueingTime,
    ResponseTime,
    ExtendedServiceTime,
    Utilization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricScope {
    Class(usize),
    Aggregate,
}

/// One append-only observation. Time-valued metrics are in seconds,
/// utilization is a ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSample {
    pub kind: MetricKind,
    pub scope: MetricScope,
    pub at: SimTime,
    pub value: f64,
}

/// Destination for metric emissions. Observations are never corrected after
/// the fact; sinks only accumulate.
pub trait MetricSink {
    fn record(&mut self, sample: MetricSample);
}

/// Sink that keeps every sample. Used by tests and anywhere the full series
/// matters.
#[derive(Debug, Default)]
pub struct MemorySink {
    samples: Vec<MetricSample>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    pub fn values(&self, kind: MetricKind, scope: MetricScope) -> Vec<f64> {
        self.samples
            .iter()
            .filter(|s| s.kind == kind && s.scope == scope)
            .map(|s| s.value)
            .collect()
    }
}

impl MetricSink for MemorySink {
    fn record(&mut self, sample: MetricSample) {
        self.samples.push(sample);
    }
}

/// Sink that folds each metric series into a running mean.
#[derive(Debug, Default)]
pub struct SummarySink {
    means: FxHashMap<(MetricKind, MetricScope), Mean>,
}

impl SummarySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean(&self, kind: MetricKind, scope: MetricScope) -> Option<f64> {
        self.means.get(&(kind, scope)).map(|m| m.estimate())
    }

    pub fn sample_count(&self, kind: MetricKind, scope: MetricScope) -> u64 {
        self.means.get(&(kind, scope)).map_or(0, Mean::len)
    }
}

impl MetricSink for SummarySink {
    fn record(&mut self, sample: MetricSample) {
        self.means
            .entry((sample.kind, sample.scope))
            .or_insert_with(Mean::new)
            .add(sample.value);
    }
}

/// Per-class and aggregate counters fed by the station on every completion.
///
/// Busy-time accumulators are instance fields, so several stations can run
/// side by side without sharing state. They are write-only from the station's
/// point of view; nothing in the core reads them back for decisions.
#[derive(Debug)]
pub struct StatsCollector<K: MetricSink> {
    n_prio: usize,
    busy_per_class: Vec<SimTime>,
    total_busy: SimTime,
    sink: K,
}

impl<K: MetricSink> StatsCollector<K> {
    pub fn new(n_prio: usize, sink: K) -> Self {
        assert!(n_prio >= 1, "station needs at least one priority class");
        Self {
            n_prio,
            busy_per_class: vec![SimTime::ZERO; n_prio],
            total_busy: SimTime::ZERO,
            sink,
        }
    }

    /// Emit the completion observations for `job` at virtual time `now` and
    /// accrue its original service demand into the busy-time counters.
    pub fn on_completion(&mut self, job: &Job, now: SimTime) {
        let class = job.class;
        assert!(
            (1..=self.n_prio).contains(&class),
            "priority class {class} outside configured range 1..={}",
            self.n_prio
        );
        let slot = class - 1;
        let first = job
            .first_service_start
            .expect("completed job never entered the server");

        self.emit(MetricKind::ExtendedServiceTime, MetricScope::Class(class), now, now - first);

        self.busy_per_class[slot] += job.original_service;
        self.emit_ratio(
            MetricScope::Class(class),
            now,
            utilization(self.busy_per_class[slot], now),
        );

        self.total_busy += job.original_service;
        self.emit_ratio(MetricScope::Aggregate, now, utilization(self.total_busy, now));

        self.emit(MetricKind::ResponseTime, MetricScope::Aggregate, now, now - job.arrival);
        self.emit(MetricKind::ResponseTime, MetricScope::Class(class), now, now - job.arrival);
        self.emit(MetricKind::QueueingTime, MetricScope::Aggregate, now, job.queueing_time);
        self.emit(MetricKind::QueueingTime, MetricScope::Class(class), now, job.queueing_time);
    }

    pub fn n_prio(&self) -> usize {
        self.n_prio
    }

    pub fn total_busy(&self) -> SimTime {
        self.total_busy
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    fn emit(&mut self, kind: MetricKind, scope: MetricScope, at: SimTime, value: SimTime) {
        self.sink.record(MetricSample {
            kind,
            scope,
            at,
            value: value.as_secs_f64(),
        });
    }

    fn emit_ratio(&mut self, scope: MetricScope, at: SimTime, value: f64) {
        self.sink.record(MetricSample {
            kind: MetricKind::Utilization,
            scope,
            at,
            value,
        });
    }
}

fn utilization(busy: SimTime, now: SimTime) -> f64 {
    if now.is_zero() {
        0.0
    } else {
        busy.as_secs_f64() / now.as_secs_f64()
    }
}
