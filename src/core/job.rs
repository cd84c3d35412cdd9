use super::SimTime;

/// Monotonically increasing creation sequence number. Doubles as the final
/// tie-break key of the ordering discipline, so no two jobs ever compare equal.
pub type JobSeq = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Created,
    Waiting,
    InService,
    Completed,
}

/// A unit of work travelling through the station.
///
/// Service-time bookkeeping upholds `served + residual_service ==
/// original_service` at all times; the residual shrinks only by elapsed
/// in-server intervals and reaches zero exactly once, at completion.
#[derive(Debug, Clone)]
pub struct Job {
    pub seq: JobSeq,
    /// Priority class, 1-based. Smaller value = more urgent.
    pub class: usize,
    /// Virtual time of creation. Immutable; requeueing after preemption does
    /// not touch it, so FIFO order within a class survives preemption.
    pub arrival: SimTime,
    pub original_service: SimTime,
    pub residual_service: SimTime,
    /// Sum of all completed in-server intervals.
    pub served: SimTime,
    /// First entry into the server slot. Set once, never overwritten.
    pub first_service_start: Option<SimTime>,
    /// Total time spent in the waiting list, possibly over several
    /// non-contiguous intervals.
    pub queueing_time: SimTime,
    /// Open queueing interval, present while the job sits in the waiting list.
    pub queue_entered_at: Option<SimTime>,
    pub state: JobState,
}

impl Job {
    pub fn new(seq: JobSeq, class: usize, arrival: SimTime, service: SimTime) -> Self {
        assert!(class >= 1, "priority class {class} outside domain, classes are 1-based");
        Self {
            seq,
            class,
            arrival,
            original_service: service,
            residual_service: service,
            served: SimTime::ZERO,
            first_service_start: None,
            queueing_time: SimTime::ZERO,
            queue_entered_at: None,
            state: JobState::Created,
        }
    }

    pub fn conserves_service(&self) -> bool {
        self.served + self.residual_service == self.original_service
    }

    pub fn is_completed(&self) -> bool {
        self.state == JobState::Completed
    }
}
