use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

use crate::core::{Job, JobSeq, SimTime};

/// Arrival generator for one priority class.
///
/// Class `c` produces jobs with a deterministic service demand of
/// `avg_service_time * c` and exponentially distributed inter-arrival gaps
/// with mean `avg_inter_arrival_time / c`: more urgent classes are rarer and
/// shorter, less urgent ones heavier and more frequent.
#[derive(Debug)]
pub struct Source {
    class: usize,
    service_time: SimTime,
    gap: Exp<f64>,
    rng: StdRng,
}

impl Source {
    pub fn new(class: usize, avg_service_time: f64, avg_inter_arrival_time: f64, seed: u64) -> Self {
        assert!(class >= 1, "priority classes are 1-based");
        assert!(
            avg_service_time > 0.0 && avg_inter_arrival_time > 0.0,
            "source timing parameters must be positive"
        );
        let rate = class as f64 / avg_inter_arrival_time;
        Self {
            class,
            service_time: SimTime::from_secs_f64(avg_service_time * class as f64),
            gap: Exp::new(rate).expect("inter-arrival rate must be positive and finite"),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn class(&self) -> usize {
        self.class
    }

    pub fn next_job(&mut self, seq: JobSeq, now: SimTime) -> Job {
        Job::new(seq, self.class, now, self.service_time)
    }

    pub fn next_gap(&mut self) -> SimTime {
        SimTime::from_secs_f64(self.gap.sample(&mut self.rng))
    }
}
