use clap::{Parser, ValueEnum};
use hogwild_atari_env::Preprocessing;
use hogwild_candle_agent::WeightInit;
use hogwild_core::LrScheduleKind;
use std::path::PathBuf;

/// Preprocessing variant.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PreprocessingArg {
    /// Max, luminance, rescale and normalise.
    Generic,

    /// Binary Pong field features.
    Pong,
}

impl From<PreprocessingArg> for Preprocessing {
    fn from(v: PreprocessingArg) -> Self {
        match v {
            PreprocessingArg::Generic => Preprocessing::Generic,
            PreprocessingArg::Pong => Preprocessing::Pong,
        }
    }
}

/// Shape of the learning rate schedule.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LrScheduleArg {
    /// Keep the initial rate.
    Constant,

    /// Decay linearly to zero.
    Linear,
}

impl From<LrScheduleArg> for LrScheduleKind {
    fn from(v: LrScheduleArg) -> Self {
        match v {
            LrScheduleArg::Constant => LrScheduleKind::Constant,
            LrScheduleArg::Linear => LrScheduleKind::Linear,
        }
    }
}

/// Weight initialisation.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum WeightInitArg {
    /// Orthogonal.
    Ortho,

    /// Glorot uniform.
    Glorot,
}

impl From<WeightInitArg> for WeightInit {
    fn from(v: WeightInitArg) -> Self {
        match v {
            WeightInitArg::Ortho => WeightInit::Ortho,
            WeightInitArg::Glorot => WeightInit::Glorot,
        }
    }
}

/// Train an actor-critic agent with lock-free parallel workers, or evaluate
/// a checkpoint
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Args {
    /// Game name: "catch", or a ROM name when built with the `ale` feature
    #[arg(long, default_value = "catch")]
    pub game: String,

    /// Directory of ROM images, overriding ATARI_ROM_DIR
    #[arg(long)]
    pub rom_dir: Option<String>,

    /// Number of worker threads
    #[arg(long, default_value_t = 16)]
    pub n_workers: usize,

    /// Environment steps per update cycle
    #[arg(long, default_value_t = 5)]
    pub steps_per_update: usize,

    /// Total environment steps over all workers
    #[arg(long, default_value_t = 10_000_000)]
    pub n_steps: u64,

    /// Random seed
    #[arg(long, default_value_t = 0)]
    pub seed: i64,

    /// Discount factor
    #[arg(long, default_value_t = 0.99)]
    pub discount: f32,

    /// Initial learning rate
    #[arg(long, default_value_t = 7e-4)]
    pub initial_lr: f32,

    /// Learning rate schedule
    #[arg(long, value_enum, default_value_t = LrScheduleArg::Constant)]
    pub lr_schedule: LrScheduleArg,

    /// Step at which a linear schedule reaches zero
    #[arg(long)]
    pub lr_decay_to_zero_by_n_steps: Option<u64>,

    /// Minimum time between checkpoints
    #[arg(long, default_value_t = 600)]
    pub ckpt_interval_seconds: u64,

    /// Time between two progress reports
    #[arg(long, default_value_t = 1.0)]
    pub wake_interval_seconds: f32,

    /// Preprocessing variant
    #[arg(long, value_enum, default_value_t = PreprocessingArg::Generic)]
    pub preprocessing: PreprocessingArg,

    /// Emulator frames per agent step
    #[arg(long, default_value_t = 4)]
    pub frame_skip: usize,

    /// Maximum number of random no-ops at the start of an episode
    #[arg(long, default_value_t = 30)]
    pub max_n_noops: usize,

    /// Weight of the value loss
    #[arg(long, default_value_t = 0.5)]
    pub value_loss_coef: f32,

    /// Weight of the entropy bonus
    #[arg(long, default_value_t = 0.01)]
    pub entropy_bonus: f32,

    /// Bound on the global gradient norm, 0 to disable
    #[arg(long, default_value_t = 0.5)]
    pub max_grad_norm: f32,

    /// Weight initialisation
    #[arg(long, value_enum, default_value_t = WeightInitArg::Ortho)]
    pub weight_init: WeightInitArg,

    /// RMSProp decay
    #[arg(long, default_value_t = 0.99)]
    pub rmsprop_decay: f32,

    /// RMSProp epsilon
    #[arg(long, default_value_t = 1e-5)]
    pub rmsprop_eps: f32,

    /// CUDA device index; CPU if not given
    #[arg(long)]
    pub cuda: Option<usize>,

    /// Checkpoint to start from (training) or to evaluate
    #[arg(long)]
    pub load_ckpt: Option<PathBuf>,

    /// Directory holding one subdirectory per run
    #[arg(long, default_value = "runs")]
    pub log_dir: PathBuf,

    /// Name of the run; a timestamp if not given
    #[arg(long)]
    pub run_name: Option<String>,

    /// Evaluate the checkpoint given with --load-ckpt instead of training
    #[arg(long, default_value_t = false)]
    pub eval: bool,

    /// Number of episodes in evaluation
    #[arg(long, default_value_t = 10)]
    pub n_eval_episodes: usize,
}
