use crate::{HogwildTrainerConfig, WorkerMessage, Worker, WorkerShared, WorkerStat};
use anyhow::Result;
use crossbeam_channel::Sender;
use hogwild_core::{ActorCritic, BuildEnv, LrSchedule, ReturnEstimator, SharedOptimizer};
use log::{info, warn};
use std::{
    marker::PhantomData,
    sync::{Arc, Mutex},
    thread::JoinHandle,
};

/// Spawns [`Worker`]s on their own threads and tracks whether they are alive.
///
/// Worker `n` builds its environment with seed `seed * n_workers + n`.
/// Environments are built one at a time.
pub struct WorkerManager<E, M, O>
where
    E: BuildEnv,
    M: ActorCritic<E::Obs>,
    O: SharedOptimizer,
{
    config: HogwildTrainerConfig,
    env_config: E::Config,
    model_config: M::Config,
    estimator: ReturnEstimator,
    schedule: LrSchedule,
    shared: WorkerShared<O>,

    /// Sender of [`WorkerMessage`]s, handed to the workers on [`WorkerManager::run`].
    sender: Option<Sender<WorkerMessage>>,

    /// Thread handles.
    threads: Vec<JoinHandle<Result<WorkerStat>>>,

    phantom: PhantomData<fn() -> (E, M)>,
}

impl<E, M, O> WorkerManager<E, M, O>
where
    E: BuildEnv + 'static,
    M: ActorCritic<E::Obs> + 'static,
    O: SharedOptimizer + 'static,
    E::Config: Send + 'static,
    M::Config: Send + 'static,
{
    /// Builds a [`WorkerManager`] after validating the configuration.
    pub fn build(
        config: &HogwildTrainerConfig,
        env_config: &E::Config,
        model_config: &M::Config,
        shared: WorkerShared<O>,
        sender: Sender<WorkerMessage>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            env_config: env_config.clone(),
            model_config: model_config.clone(),
            estimator: ReturnEstimator::new(config.discount)?,
            schedule: LrSchedule::build(&config.lr_schedule, config.n_steps)?,
            shared,
            sender: Some(sender),
            threads: vec![],
            phantom: PhantomData,
        })
    }

    /// Spawns the worker threads.
    pub fn run(&mut self) {
        let sender = match self.sender.take() {
            Some(sender) => sender,
            None => {
                warn!("Workers have already been started");
                return;
            }
        };
        let guard_init_env = Arc::new(Mutex::new(()));
        let n_workers = self.config.n_workers;

        for id in 0..n_workers {
            let mut worker = Worker::<E, M, O>::build(
                id,
                self.env_config.clone(),
                self.model_config.clone(),
                self.config.seed * n_workers as i64 + id as i64,
                self.config.max_steps_per_rollout(),
                self.config.n_steps,
                self.estimator,
                self.schedule.clone(),
                self.shared.clone(),
            );
            let sender = sender.clone();
            let guard = guard_init_env.clone();
            let handle = std::thread::spawn(move || worker.run(sender, guard));
            self.threads.push(handle);
        }
        info!("Started {} workers", n_workers);
    }

    /// `true` while at least one worker thread has not finished.
    pub fn any_alive(&self) -> bool {
        self.threads.iter().any(|h| !h.is_finished())
    }

    /// Waits until all workers finish and returns the stats of those that
    /// finished without error.
    pub fn join(self) -> Vec<WorkerStat> {
        let mut stats = vec![];
        for (id, h) in self.threads.into_iter().enumerate() {
            match h.join() {
                Ok(Ok(stat)) => stats.push(stat),
                Ok(Err(e)) => warn!("Worker {} failed: {:#}", id, e),
                Err(_) => warn!("Worker {} died", id),
            }
        }
        stats
    }
}
