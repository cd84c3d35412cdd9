use std::cmp::Ordering;
use std::collections::VecDeque;

use super::job::Job;
use super::order::OrderingDiscipline;

/// Always-sorted list of not-yet-served jobs. The head is the next job to
/// serve. Ordering is delegated entirely to the injected discipline.
#[derive(Debug)]
pub struct WaitingList<D: OrderingDiscipline> {
    jobs: VecDeque<Job>,
    discipline: D,
}

impl<D: OrderingDiscipline> WaitingList<D> {
    pub fn new(discipline: D) -> Self {
        Self {
            jobs: VecDeque::new(),
            discipline,
        }
    }

    /// Insert keeping sort order. With a strict total order the insertion
    /// point is unique; equal-key jobs cannot occur.
    pub fn insert(&mut self, job: Job) {
        let at = self
            .jobs
            .partition_point(|queued| self.discipline.cmp(queued, &job) == Ordering::Less);
        self.jobs.insert(at, job);
    }

    pub fn pop_front(&mut self) -> Option<Job> {
        self.jobs.pop_front()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn is_sorted(&self) -> bool {
        self.jobs
            .iter()
            .zip(self.jobs.iter().skip(1))
            .all(|(a, b)| self.discipline.cmp(a, b) == Ordering::Less)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::order::PriorityOrder;
    use std::time::Duration;

    fn job(seq: u64, class: usize, arrival_secs: u64) -> Job {
        Job::new(seq, class, Duration::from_secs(arrival_secs), Duration::from_secs(1))
    }

    #[test]
    fn drains_in_discipline_order() {
        let mut list = WaitingList::new(PriorityOrder);
        list.insert(job(0, 3, 0));
        list.insert(job(1, 1, 5));
        list.insert(job(2, 2, 2));
        list.insert(job(3, 1, 1));
        list.insert(job(4, 2, 2));

        assert!(list.is_sorted());

        let mut drained = Vec::new();
        while let Some(next) = list.pop_front() {
            drained.push((next.class, next.arrival, next.seq));
        }

        let mut expected = drained.clone();
        expected.sort();
        assert_eq!(drained, expected);
        assert_eq!(drained[0].0, 1);
        assert_eq!(drained.last().unwrap().0, 3);
    }

    #[test]
    fn preserves_arrival_order_within_class() {
        let mut list = WaitingList::new(PriorityOrder);
        list.insert(job(1, 2, 7));
        list.insert(job(2, 2, 3));
        list.insert(job(3, 2, 5));

        let arrivals: Vec<_> = list.iter().map(|j| j.arrival).collect();
        assert_eq!(
            arrivals,
            vec![
                Duration::from_secs(3),
                Duration::from_secs(5),
                Duration::from_secs(7)
            ]
        );
    }

    #[test]
    fn empty_list_reports_empty() {
        let mut list = WaitingList::new(PriorityOrder);
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert!(list.pop_front().is_none());
    }
}
