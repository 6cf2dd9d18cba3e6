use super::{Record, Recorder, RecordStorage};

/// Keeps every written record in memory.
///
/// Used to inspect what the coordinator and workers reported, mostly in tests
/// and in evaluation runs.
#[derive(Default)]
pub struct BufferedRecorder {
    buf: Vec<Record>,
    storage: RecordStorage,
}

impl BufferedRecorder {
    /// Constructs the recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterates over the written records, oldest first.
    pub fn iter(&self) -> std::slice::Iter<Record> {
        self.buf.iter()
    }

    /// Number of written records.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// `true` if nothing was written.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

impl Recorder for BufferedRecorder {
    fn write(&mut self, record: Record) {
        self.buf.push(record);
    }

    fn store(&mut self, record: Record) {
        self.storage.store(record);
    }

    fn flush(&mut self, _step: i64) {
        let record = self.storage.aggregate();
        if !record.is_empty() {
            self.buf.push(record);
        }
    }
}
