use anyhow::Result;
use hogwild::{Args, Evaluator, HogwildConfig};
use clap::Parser;
use hogwild_async_trainer::{init_params, train_hogwild};
use hogwild_atari_env::{AtariEnv, FrameStackObs};
use hogwild_candle_agent::{cnn::CnnConfig, CnnActorCritic};
use hogwild_core::{record::BufferedRecorder, ActorCritic, BuildEnv};
use tempdir::TempDir;

#[test_log::test]
fn train_then_evaluate_catch() -> Result<()> {
    let dir = TempDir::new("train_catch")?;
    let args = Args::try_parse_from([
        "hogwild",
        "--n-workers",
        "2",
        "--n-steps",
        "60",
        "--wake-interval-seconds",
        "0.1",
        "--max-n-noops",
        "3",
        "--log-dir",
        dir.path().to_str().unwrap(),
        "--run-name",
        "catch",
    ])?;
    let mut config = HogwildConfig::from_args(&args, 3);
    config.model = config.model.cnn(CnnConfig::default().feature_dim(32));

    let params = init_params::<FrameStackObs, CnnActorCritic>(&config.model, None)?;
    let optimizer = config.optimizer.build(&params.specs());
    let mut recorder = BufferedRecorder::new();
    let (stat, stats) = train_hogwild::<AtariEnv, CnnActorCritic, _>(
        &config.trainer,
        &config.env,
        &config.model,
        params,
        optimizer,
        &mut recorder,
    )?;
    assert!(stat.env_steps >= 60);
    assert_eq!(stats.len(), 2);

    let ckpt = std::fs::read_dir(dir.path().join("catch"))?
        .next()
        .unwrap()?
        .path();
    let restored = init_params::<FrameStackObs, CnnActorCritic>(&config.model, Some(ckpt.as_path()))?;
    let mut model = CnnActorCritic::build(config.model.clone())?;
    model.load_params(&restored.to_values())?;

    let env = AtariEnv::build(&config.env, 0)?;
    let reward_sums = Evaluator::new(env, 1, 0).evaluate(&model)?;
    assert_eq!(reward_sums.len(), 1);
    // Every ball of the episode is either caught or missed
    let balls = config.env.catch.balls_per_episode as f32;
    assert!(reward_sums[0].abs() <= balls);
    Ok(())
}
