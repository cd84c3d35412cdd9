use crate::config::Config;
use crate::core::{
    Auditor, Job, JobSeq, MetricSink, PriorityOrder, SimTime, Station, StatsCollector,
};

use super::source::Source;
use super::timeline::{EventKind, EventQueue};

/// One simulation run: the event timeline, the per-class arrival sources, the
/// station under study, its statistics collector, and the downstream sink of
/// completed jobs.
pub struct Sim<K: MetricSink> {
    timeline: EventQueue,
    station: Station<PriorityOrder, EventQueue>,
    sources: Vec<Source>,
    stats: StatsCollector<K>,
    completed: Vec<Job>,
    auditor: Auditor,
    next_seq: JobSeq,
}

impl<K: MetricSink> Sim<K> {
    /// Build a run from a validated config. Every class schedules its first
    /// arrival at t = 0.
    pub fn new(config: &Config, sink: K) -> Self {
        let mut timeline = EventQueue::new();
        let sources = (1..=config.n_prio)
            .map(|class| {
                Source::new(
                    class,
                    config.avg_service_time,
                    config.avg_inter_arrival_time,
                    config.seed.wrapping_add(class as u64),
                )
            })
            .collect();
        for class in 1..=config.n_prio {
            timeline.schedule(EventKind::Arrival { class }, SimTime::ZERO);
        }

        Self {
            timeline,
            station: Station::new(config.n_prio, config.preemption, PriorityOrder),
            sources,
            stats: StatsCollector::new(config.n_prio, sink),
            completed: Vec::new(),
            auditor: Auditor::new(),
            next_seq: 0,
        }
    }

    /// Deliver the next event. Returns `false` once the timeline is drained
    /// (which cannot happen while sources keep rescheduling themselves).
    pub fn step(&mut self) -> bool {
        let Some((now, kind)) = self.timeline.pop() else {
            return false;
        };

        match kind {
            EventKind::Arrival { class } => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let job = self.sources[class - 1].next_job(seq, now);
                log::trace!("arrival of job {} (class {}) at {:?}", seq, class, now);
                self.station.enqueue(job, now, &mut self.timeline);

                let gap = self.sources[class - 1].next_gap();
                self.timeline.schedule(EventKind::Arrival { class }, now + gap);
            }
            EventKind::Completion => {
                let job = self
                    .station
                    .on_completion(now, &mut self.timeline, &mut self.stats);
                self.completed.push(job);
            }
        }

        if cfg!(debug_assertions) {
            self.auditor.observe(&self.station);
        }
        true
    }

    /// Run until every event at or before `horizon` has been delivered.
    pub fn run_until(&mut self, horizon: SimTime) {
        while self.timeline.peek_time().is_some_and(|t| t <= horizon) {
            self.step();
        }
    }

    pub fn now(&self) -> SimTime {
        self.timeline.now()
    }

    pub fn completed(&self) -> &[Job] {
        &self.completed
    }

    pub fn stats(&self) -> &StatsCollector<K> {
        &self.stats
    }

    pub fn station(&self) -> &Station<PriorityOrder, EventQueue> {
        &self.station
    }

    pub fn pending_events(&self) -> usize {
        self.timeline.len()
    }
}
