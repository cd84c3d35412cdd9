pub mod job;
pub mod observer;
pub mod order;
pub mod station;
pub mod stats;
pub mod waiting;

/// Virtual time of the simulation. `Duration` keeps all service-time
/// arithmetic exact in integer nanoseconds.
pub type SimTime = std::time::Duration;

pub use job::{Job, JobSeq, JobState};
pub use observer::Auditor;
pub use order::{OrderingDiscipline, PriorityOrder};
pub use station::{CompletionScheduler, Station};
pub use stats::{
    MemorySink, MetricKind, MetricSample, MetricScope, MetricSink, StatsCollector, SummarySink,
};
pub use waiting::WaitingList;
