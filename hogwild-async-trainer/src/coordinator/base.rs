use crate::{CoordinatorStat, HogwildTrainerConfig, WorkerManager, WorkerMessage};
use anyhow::Result;
use crossbeam_channel::Receiver;
use hogwild_core::{
    checkpoint::CheckpointStore,
    error::HogwildError,
    record::{
        Record, RecordValue::Scalar, Recorder, EPISODE_LENGTH_STEPS, EPISODE_REWARD_SUM, GRAD_NORM,
    },
    ActorCritic, BuildEnv, CheckpointTimer, LrSchedule, RateMeasure, SharedCounters,
    SharedOptimizer, SharedParams,
};
use hogwild_tensorboard::ENV_STEPS_KEY;
use log::{info, warn};
use std::{
    sync::Arc,
    time::{Duration, SystemTime},
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Watches the workers, reports progress and takes checkpoints.
///
/// # Loop
///
/// While running, on every wake the coordinator:
///
/// 1. Sleeps for `wake_interval_secs`.
/// 2. Checks whether any worker thread is still alive.
/// 3. Writes `misc/steps_per_second`, `misc/steps`, `misc/updates` and
///    `misc/lr` (the rate the schedule gives for the current step count).
/// 4. Stores the summaries of episodes finished since the last wake as
///    [`EPISODE_REWARD_SUM`] and [`EPISODE_LENGTH_STEPS`], and the losses and
///    [`GRAD_NORM`] of every update since the last wake, then flushes them.
/// 5. Saves a snapshot of the global parameters if the checkpoint timer is
///    due or no worker is alive, then resets the timer.
/// 6. Stops if no worker is alive.
///
/// Workers stop on their own once the global step counter reaches the
/// budget, so the last checkpoint holds the final parameters.
///
/// ```mermaid
/// graph LR
///     W1[Worker 1] -->|atomic add| P[SharedParams]
///     W2[Worker 2] -->|atomic add| P
///     W1 -->|increment| C[SharedCounters]
///     W2 -->|increment| C
///     W1 -->|WorkerMessage| Co[Coordinator]
///     W2 -->|WorkerMessage| Co
///     C --> Co
///     P -->|snapshot| S[CheckpointStore]
///     Co --> S
///     Co --> R[Recorder]
/// ```
pub struct Coordinator {
    wake_interval: Duration,
    timer: CheckpointTimer,
    schedule: LrSchedule,
    counters: Arc<SharedCounters>,
    params: Arc<SharedParams>,
    receiver: Receiver<WorkerMessage>,
}

impl Coordinator {
    /// Builds a [`Coordinator`].
    pub fn build(
        config: &HogwildTrainerConfig,
        counters: Arc<SharedCounters>,
        params: Arc<SharedParams>,
        receiver: Receiver<WorkerMessage>,
    ) -> Result<Self> {
        Ok(Self {
            wake_interval: Duration::try_from_secs_f32(config.wake_interval_secs).map_err(|e| {
                HogwildError::InvalidConfig(format!("wake_interval_secs: {}", e))
            })?,
            timer: CheckpointTimer::new(Duration::from_secs(config.ckpt_interval_secs)),
            schedule: LrSchedule::build(&config.lr_schedule, config.n_steps)?,
            counters,
            params,
            receiver,
        })
    }

    fn record_progress(&self, rate: &mut RateMeasure, recorder: &mut impl Recorder) -> u64 {
        let steps = self.counters.steps.get();
        let updates = self.counters.updates.get();

        let mut record = Record::from_scalar(ENV_STEPS_KEY, steps as f32);
        record.insert("misc/steps_per_second", Scalar(rate.measure(steps)));
        record.insert("misc/steps", Scalar(steps as f32));
        record.insert("misc/updates", Scalar(updates as f32));
        record.insert("misc/lr", Scalar(self.schedule.lr(steps)));
        recorder.write(record);
        steps
    }

    fn record_messages(&self, steps: u64, recorder: &mut impl Recorder) {
        for msg in self.receiver.try_iter() {
            let record = match msg {
                WorkerMessage::Episode(msg) => {
                    let mut record = msg.record;
                    record.insert(EPISODE_REWARD_SUM, Scalar(msg.reward_sum));
                    record.insert(EPISODE_LENGTH_STEPS, Scalar(msg.length as f32));
                    record
                }
                WorkerMessage::Update(msg) => {
                    let mut record = msg.record;
                    record.insert(GRAD_NORM, Scalar(msg.grad_norm));
                    record
                }
            };
            recorder.store(record);
        }
        recorder.flush(steps as i64);
    }

    fn save(&mut self, steps: u64, store: &mut impl CheckpointStore) -> bool {
        let saved = match store.save(&self.params.snapshot(), &steps.to_string()) {
            Ok(_) => true,
            Err(e) => {
                warn!("Failed to save checkpoint: {:#}", e);
                false
            }
        };
        self.timer.reset();
        saved
    }

    /// Runs until no worker is alive.
    pub fn run<E, M, O>(
        &mut self,
        workers: &WorkerManager<E, M, O>,
        recorder: &mut impl Recorder,
        store: &mut impl CheckpointStore,
    ) -> Result<CoordinatorStat>
    where
        E: BuildEnv + 'static,
        M: ActorCritic<E::Obs> + 'static,
        O: SharedOptimizer + 'static,
        E::Config: Send + 'static,
        M::Config: Send + 'static,
    {
        let time = SystemTime::now();
        let mut rate = RateMeasure::new(self.counters.steps.get());
        let mut n_checkpoints = 0;
        self.timer.reset();

        loop {
            std::thread::sleep(self.wake_interval);
            let alive = workers.any_alive();

            let steps = self.record_progress(&mut rate, recorder);
            self.record_messages(steps, recorder);

            if (self.timer.due() || !alive) && self.save(steps, store) {
                n_checkpoints += 1;
            }

            if !alive {
                info!("No worker alive; stopping at {} steps", steps);
                break;
            }
        }

        Ok(CoordinatorStat {
            env_steps: self.counters.steps.get(),
            updates: self.counters.updates.get(),
            n_checkpoints,
            duration: time.elapsed()?,
        })
    }
}
