use keyed_priority_queue::KeyedPriorityQueue;
use slotmap::{new_key_type, SlotMap};

use crate::core::{CompletionScheduler, SimTime};

new_key_type! {
    pub struct EventKey;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Arrival { class: usize },
    Completion,
}

// KeyedPriorityQueue is a max-heap, so the rank's Ord is flipped: the
// earliest (time, seq) pair wins. The insertion seq makes delivery FIFO among
// events sharing a virtual time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct EventRank {
    time: SimTime,
    seq: u64,
}

impl Ord for EventRank {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .time
            .cmp(&self.time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for EventRank {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Virtual-time event queue: events come back out in non-decreasing time
/// order, FIFO among equal times. The slotmap arena hands out generational
/// keys, so a key for a fired or cancelled event can never alias a later one.
#[derive(Debug)]
pub struct EventQueue {
    events: SlotMap<EventKey, EventKind>,
    order: KeyedPriorityQueue<EventKey, EventRank>,
    seq: u64,
    now: SimTime,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            events: SlotMap::with_key(),
            order: KeyedPriorityQueue::new(),
            seq: 0,
            now: SimTime::ZERO,
        }
    }

    pub fn schedule(&mut self, kind: EventKind, at: SimTime) -> EventKey {
        assert!(
            at >= self.now,
            "event scheduled at {:?}, earlier than current time {:?}",
            at,
            self.now
        );
        let key = self.events.insert(kind);
        self.order.push(key, EventRank { time: at, seq: self.seq });
        self.seq += 1;
        log::trace!("scheduled {:?} at {:?}", kind, at);
        key
    }

    /// Remove a pending event. Cancelling an unknown key (never scheduled,
    /// already fired, or already cancelled) is a caller bug.
    pub fn cancel(&mut self, key: EventKey) {
        let kind = self.events.remove(key);
        assert!(kind.is_some(), "cancel of an unknown or already fired event");
        let removed = self.order.remove(&key);
        debug_assert!(removed.is_some(), "ordered entry missing for live event");
        log::trace!("cancelled {:?}", kind.unwrap());
    }

    /// Deliver the next event and advance virtual time to it.
    pub fn pop(&mut self) -> Option<(SimTime, EventKind)> {
        let (key, rank) = self.order.pop()?;
        let kind = self
            .events
            .remove(key)
            .expect("ordered event missing from arena");
        debug_assert!(rank.time >= self.now, "event queue went back in time");
        self.now = rank.time;
        Some((rank.time, kind))
    }

    pub fn peek_time(&self) -> Option<SimTime> {
        self.order.peek().map(|(_, rank)| rank.time)
    }

    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl CompletionScheduler for EventQueue {
    type Handle = EventKey;

    fn schedule_completion(&mut self, at: SimTime) -> EventKey {
        self.schedule(EventKind::Completion, at)
    }

    fn cancel_completion(&mut self, handle: EventKey) {
        self.cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn delivers_in_time_order() {
        let mut q = EventQueue::new();
        q.schedule(EventKind::Arrival { class: 1 }, secs(5));
        q.schedule(EventKind::Completion, secs(2));
        q.schedule(EventKind::Arrival { class: 2 }, secs(9));

        assert_eq!(q.pop(), Some((secs(2), EventKind::Completion)));
        assert_eq!(q.pop(), Some((secs(5), EventKind::Arrival { class: 1 })));
        assert_eq!(q.pop(), Some((secs(9), EventKind::Arrival { class: 2 })));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn equal_times_deliver_in_insertion_order() {
        let mut q = EventQueue::new();
        q.schedule(EventKind::Arrival { class: 3 }, secs(4));
        q.schedule(EventKind::Arrival { class: 1 }, secs(4));
        q.schedule(EventKind::Arrival { class: 2 }, secs(4));

        assert_eq!(q.pop(), Some((secs(4), EventKind::Arrival { class: 3 })));
        assert_eq!(q.pop(), Some((secs(4), EventKind::Arrival { class: 1 })));
        assert_eq!(q.pop(), Some((secs(4), EventKind::Arrival { class: 2 })));
    }

    #[test]
    fn cancelled_events_never_fire() {
        let mut q = EventQueue::new();
        q.schedule(EventKind::Arrival { class: 1 }, secs(1));
        let doomed = q.schedule(EventKind::Completion, secs(2));
        q.schedule(EventKind::Arrival { class: 1 }, secs(3));

        q.cancel(doomed);
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some((secs(1), EventKind::Arrival { class: 1 })));
        assert_eq!(q.pop(), Some((secs(3), EventKind::Arrival { class: 1 })));
        assert!(q.is_empty());
    }

    #[test]
    fn pop_advances_now() {
        let mut q = EventQueue::new();
        q.schedule(EventKind::Completion, secs(7));
        assert_eq!(q.now(), Duration::ZERO);
        q.pop();
        assert_eq!(q.now(), secs(7));
    }

    #[test]
    #[should_panic(expected = "already fired")]
    fn cancel_of_fired_event_is_fatal() {
        let mut q = EventQueue::new();
        let key = q.schedule(EventKind::Completion, secs(1));
        q.pop();
        q.cancel(key);
    }

    #[test]
    #[should_panic(expected = "earlier than current time")]
    fn scheduling_in_the_past_is_fatal() {
        let mut q = EventQueue::new();
        q.schedule(EventKind::Completion, secs(5));
        q.pop();
        q.schedule(EventKind::Completion, secs(3));
    }
}
