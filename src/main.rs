use priosim::config::{Config, ConfigError};
use priosim::core::{MetricKind, MetricScope, SummarySink};
use priosim::Sim;

fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("priosim: {err}");
            std::process::exit(1);
        }
    };

    let mut sim = Sim::new(&config, SummarySink::new());
    sim.run_until(config.horizon_time());

    println!(
        "t={:.2}s  {} jobs completed, preemption {}",
        sim.now().as_secs_f64(),
        sim.completed().len(),
        if config.preemption { "on" } else { "off" }
    );

    let sink = sim.stats().sink();
    for class in 1..=config.n_prio {
        let scope = MetricScope::Class(class);
        println!(
            "class {}: queueing {}  response {}  ext. service {}  utilization {}",
            class,
            fmt_mean(sink.mean(MetricKind::QueueingTime, scope)),
            fmt_mean(sink.mean(MetricKind::ResponseTime, scope)),
            fmt_mean(sink.mean(MetricKind::ExtendedServiceTime, scope)),
            fmt_mean(sink.mean(MetricKind::Utilization, scope)),
        );
    }
    println!(
        "overall: queueing {}  response {}  utilization {}",
        fmt_mean(sink.mean(MetricKind::QueueingTime, MetricScope::Aggregate)),
        fmt_mean(sink.mean(MetricKind::ResponseTime, MetricScope::Aggregate)),
        fmt_mean(sink.mean(MetricKind::Utilization, MetricScope::Aggregate)),
    );
}

fn load_config() -> Result<Config, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => Config::from_path(path),
        None => Ok(Config::default()),
    }
}

fn fmt_mean(mean: Option<f64>) -> String {
    match mean {
        Some(value) => format!("{value:.3}"),
        None => "-".to_string(),
    }
}
