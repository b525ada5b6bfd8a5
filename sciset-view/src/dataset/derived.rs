//! Cached values derived from a dataset's contents.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use super::Dataset;
use crate::cache::StoredValues;
use crate::iter::IndexIterator;
use crate::{DatasetError, Element, Result};

pub const STORE_MAX: &str = "max";
pub const STORE_MIN: &str = "min";
pub const STORE_MAX_POS: &str = "maxpos";
pub const STORE_MIN_POS: &str = "minpos";
pub const STORE_HASH: &str = "hash";

impl<T: Element> Dataset<T> {
    /// Generation of the backing buffer; changes on every write through
    /// any handle sharing it.
    pub fn generation(&self) -> u64 {
        self.store.generation()
    }

    /// Drop this handle's cached values.
    pub fn set_dirty(&self) {
        self.stored.clear();
    }

    pub fn stored_values(&self) -> &StoredValues {
        &self.stored
    }

    /// Cached value under `key`, computed by `f` when missing or stale.
    pub fn stored_value_or_insert_with<V, F>(&self, key: &str, f: F) -> V
    where
        V: Any + Clone + Send + Sync,
        F: FnOnce(&Self) -> V,
    {
        self.stored
            .get_or_insert_with(key, self.generation(), || f(self))
    }

    /// Largest value; NaN if any slot is NaN.
    pub fn max(&self) -> Result<T> {
        Ok(self.extremum(true)?.0)
    }

    /// Smallest value; NaN if any slot is NaN.
    pub fn min(&self) -> Result<T> {
        Ok(self.extremum(false)?.0)
    }

    /// Position of the first largest value (or first NaN).
    pub fn max_pos(&self) -> Result<Vec<usize>> {
        Ok(self.extremum(true)?.1)
    }

    /// Position of the first smallest value (or first NaN).
    pub fn min_pos(&self) -> Result<Vec<usize>> {
        Ok(self.extremum(false)?.1)
    }

    fn extremum(&self, largest: bool) -> Result<(T, Vec<usize>)> {
        let (value_key, pos_key) = if largest {
            (STORE_MAX, STORE_MAX_POS)
        } else {
            (STORE_MIN, STORE_MIN_POS)
        };
        let generation = self.generation();
        if let (Some(v), Some(p)) = (
            self.stored.get::<T>(value_key, generation),
            self.stored.get::<Vec<usize>>(pos_key, generation),
        ) {
            return Ok((v, p));
        }
        let (v, p) = self.compute_extremum(largest)?;
        self.stored.insert(value_key, generation, v.clone());
        self.stored.insert(pos_key, generation, p.clone());
        Ok((v, p))
    }

    fn compute_extremum(&self, largest: bool) -> Result<(T, Vec<usize>)> {
        if self.isize != 1 {
            return Err(DatasetError::Unsupported(format!(
                "min/max of {} items",
                self.dtype
            )));
        }
        if self.size == 0 {
            return Err(DatasetError::InvalidArgument(
                "min/max of an empty dataset".into(),
            ));
        }
        let mut it = self.iterator(true);
        self.store.with_read(|d| {
            let mut best: Option<(T, Vec<usize>)> = None;
            while it.has_next() {
                let v = &d[it.index()];
                let pos = it.pos().unwrap_or_default();
                if v.is_nan() {
                    return Ok((v.clone(), pos.to_vec()));
                }
                let better = match &best {
                    None => true,
                    Some((b, _)) if largest => v > b,
                    Some((b, _)) => v < b,
                };
                if better {
                    best = Some((v.clone(), pos.to_vec()));
                }
            }
            best.ok_or_else(|| DatasetError::InvalidArgument("min/max of an empty dataset".into()))
        })
    }

    /// Hash of shape and values, stable across layouts.
    pub fn hash_code(&self) -> u64 {
        self.stored_value_or_insert_with(STORE_HASH, |d| {
            let mut h = DefaultHasher::new();
            d.shape.hash(&mut h);
            d.isize.hash(&mut h);
            for v in d.to_vec() {
                v.hash_into(&mut h);
            }
            h.finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::Slice;

    #[test]
    fn test_max_cache_invalidated_by_write() {
        let mut a = Dataset::from_vec(vec![1.0, 3.0, 2.0], &[3]).unwrap();
        assert_eq!(a.max().unwrap(), 3.0);
        assert_eq!(a.stored_values().get::<f64>(STORE_MAX, a.generation()), Some(3.0));
        a.set(&[0], 10.0).unwrap();
        assert_eq!(a.max().unwrap(), 10.0);
        assert_eq!(a.max_pos().unwrap(), vec![0]);
    }

    #[test]
    fn test_write_through_view_invalidates_base() {
        let a = Dataset::from_vec(vec![1i32, 5, 2], &[3]).unwrap();
        assert_eq!(a.max().unwrap(), 5);
        let mut v = a.get_slice_view(&[Some(Slice::range(2, 3))]).unwrap();
        v.set(&[0], 50).unwrap();
        assert_eq!(a.max().unwrap(), 50);
        assert_eq!(a.max_pos().unwrap(), vec![2]);
    }

    #[test]
    fn test_min_and_positions() {
        let a = Dataset::from_vec(vec![4i16, -2, 7, -2], &[2, 2]).unwrap();
        assert_eq!(a.min().unwrap(), -2);
        assert_eq!(a.min_pos().unwrap(), vec![0, 1]);
        assert_eq!(a.max_pos().unwrap(), vec![1, 0]);
    }

    #[test]
    fn test_nan_propagates() {
        let a = Dataset::from_vec(vec![1.0, f64::NAN, 3.0], &[3]).unwrap();
        assert!(a.max().unwrap().is_nan());
        assert!(a.min().unwrap().is_nan());
        assert_eq!(a.max_pos().unwrap(), vec![1]);
    }

    #[test]
    fn test_unsupported_and_empty() {
        let c = Dataset::<f64>::zeros_compound(2, &[2]).unwrap();
        assert!(matches!(c.max(), Err(DatasetError::Unsupported(_))));
        let e = Dataset::<f64>::zeros(&[0]);
        assert!(matches!(e.min(), Err(DatasetError::InvalidArgument(_))));
    }

    #[test]
    fn test_hash_code() {
        let a = Dataset::from_vec(vec![1, 2, 3, 4], &[2, 2]).unwrap();
        let b = a.get_transposed_view(&[]).unwrap().get_transposed_view(&[]).unwrap();
        assert_eq!(a.hash_code(), b.hash_code());
        let mut c = a.copy();
        c.set(&[0, 0], 9).unwrap();
        assert_ne!(a.hash_code(), c.hash_code());
    }

    #[test]
    fn test_collaborator_keys() {
        let mut a = Dataset::from_vec(vec![1.0, 2.0], &[2]).unwrap();
        let mut calls = 0;
        let mut sum = |d: &Dataset<f64>| {
            calls += 1;
            d.to_vec().iter().sum::<f64>()
        };
        assert_eq!(a.stored_value_or_insert_with("stats=0", &mut sum), 3.0);
        assert_eq!(a.stored_value_or_insert_with("stats=0", &mut sum), 3.0);
        a.set(&[1], 5.0).unwrap();
        assert_eq!(a.stored_value_or_insert_with("stats=0", &mut sum), 6.0);
        assert_eq!(calls, 2);
    }
}
