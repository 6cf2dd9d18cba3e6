//! Utility functions.
pub mod test;

use crate::{
    worker_stats_fmt, Coordinator, CoordinatorStat, HogwildTrainerConfig, WorkerManager,
    WorkerShared, WorkerStat,
};
use anyhow::Result;
use crossbeam_channel::unbounded;
use hogwild_core::{
    checkpoint::{CheckpointStore, FileCheckpointStore},
    error::HogwildError,
    record::Recorder,
    ActorCritic, BuildEnv, SharedCounters, SharedOptimizer, SharedParams,
};
use log::info;
use std::{path::Path, sync::Arc};

/// Global parameters initialised from a fresh model, or from a checkpoint.
///
/// A checkpoint must hold tensors of the same names and shapes as the model.
pub fn init_params<Obs, M: ActorCritic<Obs>>(
    model_config: &M::Config,
    checkpoint: Option<&Path>,
) -> Result<SharedParams> {
    let model = M::build(model_config.clone())?;
    let params = SharedParams::from_values(&model.param_specs(), &model.params()?)?;
    if let Some(path) = checkpoint {
        let snapshot = FileCheckpointStore::load_file(path)?;
        params.restore(&snapshot)?;
        info!("Restored parameters from {:?}", path);
    }
    Ok(params)
}

/// Runs hogwild training.
///
/// Spawns the workers through a [`WorkerManager`] and runs a [`Coordinator`]
/// on the calling thread until every worker stops. Checkpoints go to
/// `config.model_dir`.
///
/// * `env_config` - Configuration of the environment each worker builds.
/// * `model_config` - Configuration of the model each worker builds. It must
///   produce parameters of the shapes in `params`.
/// * `params` - Initial global parameters, see [`init_params`].
/// * `optimizer` - Optimizer shared by all workers.
pub fn train_hogwild<E, M, O>(
    config: &HogwildTrainerConfig,
    env_config: &E::Config,
    model_config: &M::Config,
    params: SharedParams,
    optimizer: O,
    recorder: &mut impl Recorder,
) -> Result<(CoordinatorStat, Vec<WorkerStat>)>
where
    E: BuildEnv + 'static,
    M: ActorCritic<E::Obs> + 'static,
    O: SharedOptimizer + 'static,
    E::Config: Send + 'static,
    M::Config: Send + 'static,
{
    let model_dir = config
        .model_dir
        .as_ref()
        .ok_or_else(|| HogwildError::InvalidConfig("model_dir is not set".into()))?;
    let mut store = FileCheckpointStore::new(model_dir)?;
    train_hogwild_with_store::<E, M, O>(
        config,
        env_config,
        model_config,
        params,
        optimizer,
        recorder,
        &mut store,
    )
}

/// [`train_hogwild`] writing checkpoints to a given store.
pub fn train_hogwild_with_store<E, M, O>(
    config: &HogwildTrainerConfig,
    env_config: &E::Config,
    model_config: &M::Config,
    params: SharedParams,
    optimizer: O,
    recorder: &mut impl Recorder,
    store: &mut impl CheckpointStore,
) -> Result<(CoordinatorStat, Vec<WorkerStat>)>
where
    E: BuildEnv + 'static,
    M: ActorCritic<E::Obs> + 'static,
    O: SharedOptimizer + 'static,
    E::Config: Send + 'static,
    M::Config: Send + 'static,
{
    let shared = WorkerShared {
        params: Arc::new(params),
        optimizer: Arc::new(optimizer),
        counters: Arc::new(SharedCounters::new()),
    };
    let (sender, receiver) = unbounded();

    let mut workers = WorkerManager::<E, M, O>::build(
        config,
        env_config,
        model_config,
        shared.clone(),
        sender,
    )?;
    let mut coordinator =
        Coordinator::build(config, shared.counters.clone(), shared.params.clone(), receiver)?;

    workers.run();
    let stat = coordinator.run(&workers, recorder, store)?;
    info!("Stats of coordinator");
    info!("{}", stat.fmt());

    let stats = workers.join();
    info!("Stats of workers");
    info!("{}", worker_stats_fmt(&stats));
    Ok((stat, stats))
}
