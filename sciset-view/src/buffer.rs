//! Reference-counted backing buffers shared between a dataset and its views.
//!
//! Every write goes through [`BackingStore::mutate`], which stamps the store
//! with a fresh generation. Derived-value caches record the generation they
//! were computed at, so a write through any handle (base or view) makes
//! every handle's cached entries stale.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::shape::calc_size;
use crate::{DatasetError, Element, Result};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Generations are unique across all stores, never reused.
fn next_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, Ordering::Relaxed)
}

/// `len` copies of `value` in a fresh vector.
///
/// # Panics
/// Panics with "allocation too large" if `len` cannot be allocated.
pub(crate) fn alloc_filled<T: Clone>(len: usize, value: T) -> Vec<T> {
    let mut data = Vec::new();
    if data.try_reserve_exact(len).is_err() {
        panic!("allocation too large: {len} elements");
    }
    data.resize(len, value);
    data
}

#[derive(Debug)]
struct Store<T> {
    data: Vec<T>,
    generation: u64,
}

/// Flat scalar buffer behind a reader/writer lock.
///
/// Cloning the handle shares the buffer; the buffer is freed when the last
/// handle goes away.
#[derive(Debug)]
pub struct BackingStore<T> {
    inner: Arc<RwLock<Store<T>>>,
}

impl<T> Clone for BackingStore<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Element> BackingStore<T> {
    /// Take ownership of `data`.
    pub fn new(data: Vec<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Store {
                data,
                generation: next_generation(),
            })),
        }
    }

    /// `len` copies of `value`.
    ///
    /// # Panics
    /// Panics with "allocation too large" if `len` cannot be allocated.
    pub fn filled(len: usize, value: T) -> Self {
        Self::new(alloc_filled(len, value))
    }

    /// Zeroed buffer for `size` items of `isize` slots.
    pub fn zeroed(shape: &[usize], isize: usize) -> Self {
        let len = calc_size(shape)
            .checked_mul(isize)
            .unwrap_or_else(|| panic!("allocation too large: shape {shape:?} x {isize}"));
        Self::filled(len, T::zero())
    }

    pub fn len(&self) -> usize {
        self.inner.read().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Generation stamped by the latest write.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Whether two handles share one buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of handles sharing this buffer.
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Run `f` over the buffer under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let guard = self.inner.read();
        f(&guard.data)
    }

    /// Run `f` over the buffer under the write lock, then bump the
    /// generation.
    ///
    /// This is the only path to mutable access.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let mut guard = self.inner.write();
        let out = f(&mut guard.data);
        guard.generation = next_generation();
        out
    }

    /// Clone of the slot at `index`.
    pub fn get(&self, index: usize) -> Result<T> {
        self.with_read(|data| {
            data.get(index)
                .cloned()
                .ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: data.len(),
                })
        })
    }

    /// Copy of the whole buffer, taken under one read lock.
    pub fn snapshot(&self) -> Vec<T> {
        self.with_read(<[T]>::to_vec)
    }
}
