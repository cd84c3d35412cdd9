pub mod config;
pub mod core;
pub mod sim;

pub use crate::config::Config;
pub use crate::core::{Job, PriorityOrder, Station, StatsCollector, SummarySink};
pub use crate::sim::{EventQueue, Sim};
