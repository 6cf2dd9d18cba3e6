use std::time::Duration;

/// Stats of the training loop in each [`Worker`](crate::Worker).
#[derive(Clone, Debug)]
pub struct WorkerStat {
    /// The number of steps for interaction between model and env.
    pub env_steps: usize,

    /// The number of update cycles.
    pub updates: usize,

    /// The number of finished episodes.
    pub episodes: usize,

    /// Duration of the loop.
    pub duration: Duration,
}

/// Returns a formatted string of the set of [`WorkerStat`] for reporting.
pub fn worker_stats_fmt(stats: &[WorkerStat]) -> String {
    let mut s = "worker id, steps, updates, episodes, duration [sec], steps per sec\n".to_string();
    for (i, stat) in stats.iter().enumerate() {
        let d = stat.duration.as_secs_f32();
        let p = stat.env_steps as f32 / d;
        s += format!(
            "{}, {}, {}, {}, {}, {}\n",
            i, stat.env_steps, stat.updates, stat.episodes, d, p
        )
        .as_str();
    }
    s
}
