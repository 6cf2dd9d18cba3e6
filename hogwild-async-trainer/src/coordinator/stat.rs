use std::time::Duration;

/// Stats of [`Coordinator::run`](crate::Coordinator::run).
#[derive(Clone, Debug)]
pub struct CoordinatorStat {
    /// Environment steps taken by all workers.
    pub env_steps: u64,

    /// Update cycles completed by all workers.
    pub updates: u64,

    /// Number of checkpoints saved.
    pub n_checkpoints: usize,

    /// Duration of training.
    pub duration: Duration,
}

impl CoordinatorStat {
    /// Environment steps per second over the whole run.
    pub fn steps_per_sec(&self) -> f32 {
        self.env_steps as f32 / self.duration.as_secs_f32()
    }

    /// Returns a formatted string.
    pub fn fmt(&self) -> String {
        let mut s = "env_steps, updates, checkpoints, steps/sec, duration\n".to_string();
        s += format!(
            "{}, {}, {}, {}, {}\n",
            self.env_steps,
            self.updates,
            self.n_checkpoints,
            self.steps_per_sec(),
            self.duration.as_secs_f32()
        )
        .as_str();
        s
    }
}
