//! Aggregation of records stored between two flushes.
use super::{Record, RecordValue};
use std::collections::BTreeMap;

/// Accumulates records and folds them into one on [`RecordStorage::aggregate`].
///
/// Scalars seen more than once under the same key are summarised as
/// `{key}_min`, `{key}_max` and `{key}_mean`; a scalar seen once keeps its
/// key. For every other value type the most recent value wins.
#[derive(Default)]
pub struct RecordStorage {
    data: Vec<Record>,
}

impl RecordStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a record.
    pub fn store(&mut self, record: Record) {
        self.data.push(record);
    }

    /// Number of records stored since the last aggregation.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Folds the stored records into one and clears the storage.
    pub fn aggregate(&mut self) -> Record {
        let mut scalars: BTreeMap<String, Vec<f32>> = BTreeMap::new();
        let mut record = Record::empty();

        for r in self.data.drain(..) {
            for (k, v) in r.into_iter_in_record() {
                match v {
                    RecordValue::Scalar(x) => scalars.entry(k).or_default().push(x),
                    v => record.insert(k, v),
                }
            }
        }

        for (k, vs) in scalars.into_iter() {
            if vs.len() == 1 {
                record.insert(k, RecordValue::Scalar(vs[0]));
            } else {
                let min = vs.iter().copied().fold(f32::INFINITY, f32::min);
                let max = vs.iter().copied().fold(f32::NEG_INFINITY, f32::max);
                let mean = vs.iter().sum::<f32>() / vs.len() as f32;
                record.insert(format!("{}_min", k), RecordValue::Scalar(min));
                record.insert(format!("{}_max", k), RecordValue::Scalar(max));
                record.insert(format!("{}_mean", k), RecordValue::Scalar(mean));
            }
        }

        record
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_aggregate_scalars() {
        let mut storage = RecordStorage::new();
        storage.store(Record::from_scalar("rl/episode_reward_sum", 1.0));
        storage.store(Record::from_scalar("rl/episode_reward_sum", 3.0));
        storage.store(Record::from_scalar("misc/lr", 0.1));
        storage.store(Record::from_slice(&[(
            "note",
            RecordValue::String("last".into()),
        )]));

        let record = storage.aggregate();
        assert!(storage.is_empty());
        assert_eq!(record.get_scalar("rl/episode_reward_sum_min").unwrap(), 1.0);
        assert_eq!(record.get_scalar("rl/episode_reward_sum_max").unwrap(), 3.0);
        assert_eq!(record.get_scalar("rl/episode_reward_sum_mean").unwrap(), 2.0);
        assert_eq!(record.get_scalar("misc/lr").unwrap(), 0.1);
        assert_eq!(record.get_string("note").unwrap(), "last");
    }
}
