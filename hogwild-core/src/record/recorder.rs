use super::Record;

/// Writes records to some destination.
///
/// `write` emits a record immediately. `store` keeps it until the next
/// `flush`, which writes an aggregate of everything stored since the last
/// flush, tagged with `step`.
pub trait Recorder {
    /// Writes a record.
    fn write(&mut self, record: Record);

    /// Keeps a record for aggregation.
    fn store(&mut self, record: Record);

    /// Writes the aggregate of the stored records.
    fn flush(&mut self, step: i64);
}
