//! Key-value records.
use crate::error::HogwildError;
use chrono::prelude::{DateTime, Local};
use std::collections::{
    hash_map::{IntoIter, Iter},
    HashMap,
};

/// A value stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single number, e.g. a loss or a reward sum.
    Scalar(f32),

    /// Wall-clock time stamp.
    DateTime(DateTime<Local>),

    /// Free text.
    String(String),
}

/// A set of named values.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record holding a single scalar.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a value, overwriting any previous value under the same key.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Iterates over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, RecordValue> {
        self.0.iter()
    }

    /// Consumes the record into an iterator over its key-value pairs.
    pub fn into_iter_in_record(self) -> IntoIter<String, RecordValue> {
        self.0.into_iter()
    }

    /// Returns the value under `k`, if any.
    pub fn get(&self, k: &str) -> Option<&RecordValue> {
        self.0.get(k)
    }

    /// Merges two records. Values of `record` win on key collisions.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// In-place version of [`Record::merge`].
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Returns the scalar under `k`.
    ///
    /// Fails if the key is absent or the value is not a scalar.
    pub fn get_scalar(&self, k: &str) -> Result<f32, HogwildError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(HogwildError::RecordValueTypeError("Scalar".to_string())),
            None => Err(HogwildError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the string under `k`.
    pub fn get_string(&self, k: &str) -> Result<String, HogwildError> {
        match self.0.get(k) {
            Some(RecordValue::String(s)) => Ok(s.clone()),
            Some(_) => Err(HogwildError::RecordValueTypeError("String".to_string())),
            None => Err(HogwildError::RecordKeyError(k.to_string())),
        }
    }

    /// `true` if the record holds nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_merge_overwrites() {
        let r1 = Record::from_slice(&[
            ("a", RecordValue::Scalar(1.0)),
            ("b", RecordValue::String("x".into())),
        ]);
        let r2 = Record::from_scalar("a", 2.0);
        let r = r1.merge(r2);

        assert_eq!(r.len(), 2);
        assert_eq!(r.get_scalar("a").unwrap(), 2.0);
        assert_eq!(r.get_string("b").unwrap(), "x");
    }

    #[test]
    fn test_type_errors() {
        let r = Record::from_scalar("a", 1.0);
        assert_eq!(
            r.get_string("a"),
            Err(HogwildError::RecordValueTypeError("String".to_string()))
        );
        assert_eq!(
            r.get_scalar("missing"),
            Err(HogwildError::RecordKeyError("missing".to_string()))
        );
    }
}
