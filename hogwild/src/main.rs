use anyhow::{anyhow, Result};
use clap::Parser;
use hogwild::{create_run_dir, Args, Evaluator, HogwildConfig};
use hogwild_async_trainer::{init_params, train_hogwild};
use hogwild_atari_env::{AtariEnv, FrameStackObs};
use hogwild_candle_agent::CnnActorCritic;
use hogwild_core::{checkpoint::FileCheckpointStore, ActorCritic, BuildEnv, Env as _};
use hogwild_tensorboard::TensorboardRecorder;
use log::info;

fn n_actions(args: &Args) -> Result<usize> {
    let env_config = HogwildConfig::from_args(args, 0).env;
    Ok(AtariEnv::build(&env_config, 0)?.n_actions())
}

fn train(args: &Args) -> Result<()> {
    let config = HogwildConfig::from_args(args, n_actions(args)?);
    config.trainer.validate()?;

    let model_dir = config
        .trainer
        .model_dir
        .clone()
        .ok_or_else(|| anyhow!("Run directory is not set"))?;
    create_run_dir(&model_dir)?;
    config.save(format!("{}/config.yaml", model_dir))?;
    info!("Run directory: {}", model_dir);

    let params = init_params::<FrameStackObs, CnnActorCritic>(&config.model, args.load_ckpt.as_deref())?;
    let optimizer = config.optimizer.build(&params.specs());
    let mut recorder = TensorboardRecorder::new(&model_dir);

    let (stat, _) = train_hogwild::<AtariEnv, CnnActorCritic, _>(
        &config.trainer,
        &config.env,
        &config.model,
        params,
        optimizer,
        &mut recorder,
    )?;
    info!("Finished after {} steps, {} updates", stat.env_steps, stat.updates);

    Ok(())
}

fn eval(args: &Args) -> Result<()> {
    let path = args
        .load_ckpt
        .as_deref()
        .ok_or_else(|| anyhow!("--eval requires --load-ckpt"))?;
    let config = HogwildConfig::from_args(args, n_actions(args)?);

    let mut model = CnnActorCritic::build(config.model.clone())?;
    let snapshot = FileCheckpointStore::load_file(path)?;
    if snapshot.specs != model.param_specs() {
        return Err(anyhow!("Checkpoint {:?} does not match the model", path));
    }
    model.load_params(&snapshot.values)?;

    let env = AtariEnv::build(&config.env, args.seed)?;
    let reward_sums = Evaluator::new(env, args.n_eval_episodes, args.seed as u64).evaluate(&model)?;
    let mean = reward_sums.iter().sum::<f32>() / reward_sums.len().max(1) as f32;
    info!("Mean reward sum over {} episodes: {}", reward_sums.len(), mean);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.eval {
        eval(&args)?;
    } else {
        train(&args)?;
    }

    Ok(())
}
