use super::job::JobState;
use super::order::OrderingDiscipline;
use super::station::{CompletionScheduler, Station};

/// Debug-build auditor walked over the station after every event. Checks the
/// structural invariants that the state machine is supposed to preserve.
#[derive(Debug, Default)]
pub struct Auditor {
    steps: u64,
}

impl Auditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe<D: OrderingDiscipline, S: CompletionScheduler>(
        &mut self,
        station: &Station<D, S>,
    ) {
        self.steps += 1;

        debug_assert_eq!(
            station.is_busy(),
            station.has_pending_completion(),
            "busy server must hold exactly one pending completion, idle server none"
        );

        if let Some(job) = station.in_service() {
            debug_assert_eq!(
                job.state,
                JobState::InService,
                "job {} occupies the server but is not marked in service",
                job.seq
            );
            debug_assert!(
                job.conserves_service(),
                "job {} violates service-time conservation",
                job.seq
            );
            debug_assert!(
                job.first_service_start.is_some(),
                "in-service job {} has no first service start",
                job.seq
            );
        }

        debug_assert!(
            station.waiting().is_sorted(),
            "waiting list lost its discipline order"
        );
        for job in station.waiting().iter() {
            debug_assert_eq!(
                job.state,
                JobState::Waiting,
                "job {} sits in the waiting list but is not marked waiting",
                job.seq
            );
            debug_assert!(
                job.queue_entered_at.is_some(),
                "waiting job {} has no open queueing interval",
                job.seq
            );
            debug_assert!(
                job.conserves_service(),
                "waiting job {} violates service-time conservation",
                job.seq
            );
        }
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
