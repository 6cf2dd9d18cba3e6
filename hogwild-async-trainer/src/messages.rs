use hogwild_core::record::Record;

/// Sent from a worker to the coordinator when an episode finishes.
#[derive(Clone, Debug)]
pub struct EpisodeMessage {
    /// Id of the worker.
    pub worker_id: usize,

    /// Episode number within the worker, starting at 1.
    pub episode: usize,

    /// Sum of the rewards of the episode.
    pub reward_sum: f32,

    /// Number of steps of the episode.
    pub length: usize,

    /// Record reported by the environment at the end of the episode.
    pub record: Record,
}

/// Sent from a worker to the coordinator after every update cycle.
#[derive(Clone, Debug)]
pub struct UpdateMessage {
    /// Id of the worker.
    pub worker_id: usize,

    /// Global norm of the gradients before clipping.
    pub grad_norm: f32,

    /// Losses reported by the model.
    pub record: Record,
}

/// Messages from workers to the coordinator.
#[derive(Clone, Debug)]
pub enum WorkerMessage {
    /// An episode finished.
    Episode(EpisodeMessage),

    /// Gradients were applied to the global parameters.
    Update(UpdateMessage),
}
