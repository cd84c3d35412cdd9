use rustc_hash::FxHashSet;

use super::job::{Job, JobSeq, JobState};
use super::order::OrderingDiscipline;
use super::stats::{MetricSink, StatsCollector};
use super::waiting::WaitingList;
use super::SimTime;

/// Seam to the external event scheduler. The station holds at most one live
/// handle at a time; a handle is consumed either by cancellation (preemption)
/// or by the completion event firing.
pub trait CompletionScheduler {
    type Handle;

    fn schedule_completion(&mut self, at: SimTime) -> Self::Handle;

    /// Cancel a still-pending completion. Cancelling a handle that already
    /// fired is a caller bug and must abort.
    fn cancel_completion(&mut self, handle: Self::Handle);
}

/// Single-server queueing station with optional preemptive resume.
///
/// The server is `Idle` when `in_service` is `None`, `Busy` otherwise. While
/// busy there is exactly one pending completion handle; preemption cancels it
/// and schedules a fresh one for the job taking over the server.
pub struct Station<D: OrderingDiscipline, S: CompletionScheduler> {
    waiting: WaitingList<D>,
    in_service: Option<Job>,
    /// Start of the current service interval, valid while busy.
    service_start: SimTime,
    pending: Option<S::Handle>,
    preemption: bool,
    n_prio: usize,
    /// Sequence numbers of jobs currently waiting or in service. Backs the
    /// double-enqueue contract check.
    tracked: FxHashSet<JobSeq>,
}

impl<D: OrderingDiscipline, S: CompletionScheduler> Station<D, S> {
    pub fn new(n_prio: usize, preemption: bool, discipline: D) -> Self {
        assert!(n_prio >= 1, "station needs at least one priority class");
        Self {
            waiting: WaitingList::new(discipline),
            in_service: None,
            service_start: SimTime::ZERO,
            pending: None,
            preemption,
            n_prio,
            tracked: FxHashSet::default(),
        }
    }

    /// Deliver an arriving job at virtual time `now`.
    pub fn enqueue(&mut self, job: Job, now: SimTime, timeline: &mut S) {
        assert!(
            (1..=self.n_prio).contains(&job.class),
            "priority class {} outside configured range 1..={}",
            job.class,
            self.n_prio
        );
        assert!(
            self.tracked.insert(job.seq),
            "job {} enqueued while already waiting or in service",
            job.seq
        );

        match self.in_service.take() {
            None => self.start_service(job, now, timeline),
            Some(mut current) => {
                if self.preemption && job.class < current.class {
                    // Arriving job is strictly more urgent: suspend the
                    // current one, preserving its residual demand.
                    let handle = self
                        .pending
                        .take()
                        .expect("busy server with no pending completion");
                    timeline.cancel_completion(handle);

                    let elapsed = now - self.service_start;
                    current.served += elapsed;
                    current.residual_service -= elapsed;
                    log::debug!(
                        "preemption of job {} (class {}) at {:?}, residual {:?}",
                        current.seq,
                        current.class,
                        now,
                        current.residual_service
                    );
                    self.park(current, now);
                    self.start_service(job, now, timeline);
                } else {
                    self.in_service = Some(current);
                    self.park(job, now);
                }
            }
        }
    }

    /// React to the completion event scheduled for the in-service job.
    /// Returns the completed job for the downstream sink.
    pub fn on_completion<K: MetricSink>(
        &mut self,
        now: SimTime,
        timeline: &mut S,
        stats: &mut StatsCollector<K>,
    ) -> Job {
        let mut job = self
            .in_service
            .take()
            .expect("completion delivered while the server is idle");
        // The handle belongs to the event that just fired; it is spent.
        let _fired = self
            .pending
            .take()
            .expect("completion delivered with no pending handle");

        debug_assert_eq!(
            now - self.service_start,
            job.residual_service,
            "completion fired off-schedule for job {}",
            job.seq
        );
        job.served += job.residual_service;
        job.residual_service = SimTime::ZERO;
        job.state = JobState::Completed;
        debug_assert!(job.conserves_service(), "service-time conservation broken for job {}", job.seq);

        let removed = self.tracked.remove(&job.seq);
        debug_assert!(removed, "completed job {} was not tracked", job.seq);

        log::debug!("end of service for job {} (class {}) at {:?}", job.seq, job.class, now);
        stats.on_completion(&job, now);

        if let Some(mut next) = self.waiting.pop_front() {
            let entered = next
                .queue_entered_at
                .take()
                .expect("waiting job missing its queue entry timestamp");
            next.queueing_time += now - entered;
            self.start_service(next, now, timeline);
        } else {
            log::debug!("idle period starts at {:?}", now);
        }

        job
    }

    pub fn is_busy(&self) -> bool {
        self.in_service.is_some()
    }

    pub fn has_pending_completion(&self) -> bool {
        self.pending.is_some()
    }

    pub fn in_service(&self) -> Option<&Job> {
        self.in_service.as_ref()
    }

    pub fn waiting(&self) -> &WaitingList<D> {
        &self.waiting
    }

    pub fn service_start(&self) -> SimTime {
        self.service_start
    }

    fn start_service(&mut self, mut job: Job, now: SimTime, timeline: &mut S) {
        if job.first_service_start.is_none() {
            debug_assert!(job.served.is_zero(), "job {} served before first service start", job.seq);
            job.first_service_start = Some(now);
        }
        assert!(
            self.pending.is_none(),
            "service started while a completion is already pending"
        );
        self.pending = Some(timeline.schedule_completion(now + job.residual_service));
        self.service_start = now;
        job.state = JobState::InService;
        log::debug!(
            "service of job {} (class {}) starts at {:?}, residual {:?}",
            job.seq,
            job.class,
            now,
            job.residual_service
        );
        self.in_service = Some(job);
    }

    fn park(&mut self, mut job: Job, now: SimTime) {
        job.queue_entered_at = Some(now);
        job.state = JobState::Waiting;
        self.waiting.insert(job);
    }
}
