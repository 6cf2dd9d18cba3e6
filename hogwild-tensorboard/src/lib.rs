//! Writes training records as TensorBoard event files.
use hogwild_core::record::{Record, RecordStorage, RecordValue, Recorder};
use log::warn;
use std::path::Path;
use tensorboard_rs::summary_writer::SummaryWriter;

/// Key of the scalar holding the number of environment steps in a written record.
pub const ENV_STEPS_KEY: &str = "env_steps";

/// Write records to TFRecord.
pub struct TensorboardRecorder {
    writer: SummaryWriter,
    storage: RecordStorage,
    step_key: String,
}

impl TensorboardRecorder {
    /// Construct a [`TensorboardRecorder`].
    ///
    /// TFRecord will be stored in `logdir`.
    pub fn new<P: AsRef<Path>>(logdir: P) -> Self {
        Self {
            writer: SummaryWriter::new(logdir),
            storage: RecordStorage::new(),
            step_key: ENV_STEPS_KEY.to_string(),
        }
    }

    // Only scalars have a TensorBoard counterpart
    fn write_with_step(&mut self, record: &Record, step: usize) {
        for (k, v) in record.iter() {
            match v {
                RecordValue::Scalar(v) if *k != self.step_key => self.writer.add_scalar(k, *v, step),
                _ => {}
            }
        }
    }
}

impl Recorder for TensorboardRecorder {
    /// Writes the scalars of `record` at the step found under [`ENV_STEPS_KEY`].
    ///
    /// Records without that key are dropped with a warning.
    fn write(&mut self, record: Record) {
        let step = match record.get(&self.step_key) {
            Some(RecordValue::Scalar(v)) => *v as usize,
            _ => {
                warn!("Record without scalar {}; skipped", self.step_key);
                return;
            }
        };
        self.write_with_step(&record, step);
    }

    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            self.write_with_step(&record, step.max(0) as usize);
        }
        self.writer.flush();
    }
}
