use super::WorkerStat;
use crate::{EpisodeMessage, RolloutCollector, UpdateMessage, WorkerMessage};
use anyhow::{anyhow, Result};
use crossbeam_channel::Sender;
use hogwild_core::{
    ActorCritic, BuildEnv, GradientBuffer, LrSchedule, ReturnEstimator, SharedCounters,
    SharedOptimizer, SharedParams,
};
use log::{debug, info};
use rand::{rngs::SmallRng, SeedableRng};
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
    time::SystemTime,
};

/// State shared by every worker and the coordinator.
pub struct WorkerShared<O> {
    /// Global parameters.
    pub params: Arc<SharedParams>,

    /// Optimizer applying gradients to `params`.
    pub optimizer: Arc<O>,

    /// Step and update counters.
    pub counters: Arc<SharedCounters>,
}

impl<O> Clone for WorkerShared<O> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            optimizer: self.optimizer.clone(),
            counters: self.counters.clone(),
        }
    }
}

/// Runs update cycles on its own environment and model until the global
/// step budget is spent.
///
/// One cycle copies the global parameters into the local model, collects a
/// rollout, estimates returns, computes gradients, clips them and applies
/// them to the global parameters. Nothing in a cycle takes a lock.
pub struct Worker<E, M, O>
where
    E: BuildEnv,
    M: ActorCritic<E::Obs>,
    O: SharedOptimizer,
{
    id: usize,
    env_config: E::Config,
    model_config: M::Config,
    env_seed: i64,
    steps_per_update: usize,
    n_steps: u64,
    estimator: ReturnEstimator,
    schedule: LrSchedule,
    shared: WorkerShared<O>,
    // Env and model are built on the worker's thread
    phantom: PhantomData<fn() -> (E, M)>,
}

impl<E, M, O> Worker<E, M, O>
where
    E: BuildEnv,
    M: ActorCritic<E::Obs>,
    O: SharedOptimizer,
{
    /// Creates a worker. Nothing is built until [`Worker::run`].
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        id: usize,
        env_config: E::Config,
        model_config: M::Config,
        env_seed: i64,
        steps_per_update: usize,
        n_steps: u64,
        estimator: ReturnEstimator,
        schedule: LrSchedule,
        shared: WorkerShared<O>,
    ) -> Self {
        Self {
            id,
            env_config,
            model_config,
            env_seed,
            steps_per_update,
            n_steps,
            estimator,
            schedule,
            shared,
            phantom: PhantomData,
        }
    }

    /// Runs update cycles until the global step counter reaches the budget.
    ///
    /// `guard` serialises environment construction across workers.
    pub fn run(
        &mut self,
        sender: Sender<WorkerMessage>,
        guard: Arc<Mutex<()>>,
    ) -> Result<WorkerStat> {
        let env = {
            let _lock = guard
                .lock()
                .map_err(|_| anyhow!("Environment construction guard poisoned"))?;
            E::build(&self.env_config, self.env_seed)?
        };
        let mut model = M::build(self.model_config.clone())?;
        let specs = model.param_specs();
        self.shared.params.check_specs(&specs)?;

        let mut collector =
            RolloutCollector::new(env, SmallRng::seed_from_u64(self.env_seed as u64));
        let mut grads = GradientBuffer::new(&specs);
        let mut local = self.shared.params.to_values();
        let mut stat = WorkerStat {
            env_steps: 0,
            updates: 0,
            episodes: 0,
            duration: Default::default(),
        };
        let time = SystemTime::now();
        debug!("Worker {} starts", self.id);

        while self.shared.counters.steps.get() < self.n_steps {
            self.shared.params.copy_to(&mut local)?;
            model.load_params(&local)?;
            grads.zero();

            let rollout = collector.collect(&model, self.steps_per_update)?;
            let bootstrap_value = if rollout.terminated {
                0.0
            } else {
                model.predict(&rollout.final_obs)?.value
            };
            let trajectory = rollout.trajectory;
            let returns =
                self.estimator
                    .estimate(&trajectory.rewards, rollout.terminated, bootstrap_value);

            let (g, record) = model.compute_gradients(&trajectory.obs, &trajectory.acts, &returns)?;
            grads.accumulate(&g)?;
            let grad_norm = match model.max_grad_norm() {
                Some(max_norm) => grads.clip_by_global_norm(max_norm),
                None => grads.global_norm(),
            };

            let lr = self.schedule.lr(self.shared.counters.steps.get());
            self.shared.optimizer.apply(&grads, &self.shared.params, lr)?;

            let n = trajectory.len();
            self.shared.counters.steps.increment(n as u64);
            self.shared.counters.updates.increment(1);
            stat.env_steps += n;
            stat.updates += 1;

            // The coordinator may already be gone at shutdown
            let _ = sender.send(WorkerMessage::Update(UpdateMessage {
                worker_id: self.id,
                grad_norm,
                record,
            }));

            if let Some(episode) = rollout.episode {
                stat.episodes += 1;
                info!(
                    "Env {}: Episode {} finished; reward sum {}",
                    self.id, stat.episodes, episode.reward_sum
                );
                let _ = sender.send(WorkerMessage::Episode(EpisodeMessage {
                    worker_id: self.id,
                    episode: stat.episodes,
                    reward_sum: episode.reward_sum,
                    length: episode.length,
                    record: episode.record,
                }));
            }
        }

        stat.duration = time.elapsed()?;
        debug!("Worker {} stops after {} steps", self.id, stat.env_steps);
        Ok(stat)
    }
}
