use std::cmp::Ordering;

use super::job::Job;

/// Comparator strategy injected into the waiting list.
///
/// Implementations must be a strict total order over distinct jobs: the
/// waiting list relies on it for a deterministic dequeue order.
pub trait OrderingDiscipline {
    fn cmp(&self, a: &Job, b: &Job) -> Ordering;
}

/// Default station discipline: ascending priority class (smaller = more
/// urgent), then ascending arrival time, then creation sequence number.
///
/// Arrival time, not requeue time, is the second key, so a preempted job
/// re-enters the list ahead of later arrivals of its class. The sequence
/// number makes the order strict when two jobs share both class and arrival.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriorityOrder;

impl OrderingDiscipline for PriorityOrder {
    fn cmp(&self, a: &Job, b: &Job) -> Ordering {
        a.class
            .cmp(&b.class)
            .then_with(|| a.arrival.cmp(&b.arrival))
            .then_with(|| a.seq.cmp(&b.seq))
    }
}
