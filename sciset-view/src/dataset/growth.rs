//! Shape changes: reshaping, resizing and growth by extensible writes.
//!
//! A dataset may carry a reserved row-major extent (`data_shape`) larger than
//! its logical shape. Extensible writes past the shape grow into it first and
//! reallocate only when a position falls outside it. Views never reallocate
//! a shared buffer: every operation here first turns a view into a private
//! contiguous copy.

use tracing::debug;

use super::Dataset;
use crate::buffer::{alloc_filled, BackingStore};
use crate::compound::to_item;
use crate::iter::{IndexIterator, StrideIterator};
use crate::shape::{calc_size, get_1d_index, item_strides, squeeze_shape, strided_offset};
use crate::value::Value;
use crate::{DatasetError, Element, Result, GROWTH_FACTOR};

impl<T: Element> Dataset<T> {
    /// Reinterpret the items under a new shape of the same size.
    pub fn set_shape(&mut self, shape: &[usize]) -> Result<()> {
        if calc_size(shape) != self.size {
            return Err(DatasetError::ShapeMismatch(
                self.shape.clone(),
                shape.to_vec(),
            ));
        }
        self.materialize();
        self.shape = shape.to_vec();
        self.set_dirty();
        Ok(())
    }

    /// Drop size-one axes.
    pub fn squeeze(&mut self) {
        if self.data_shape.is_some() {
            self.materialize();
        }
        if let Some(strides) = self.stride.as_mut() {
            *strides = self
                .shape
                .iter()
                .zip(strides.iter())
                .filter(|(d, _)| **d != 1)
                .map(|(_, &s)| s)
                .collect();
        }
        self.shape = squeeze_shape(&self.shape);
        self.set_dirty();
    }

    /// Change the shape, keeping the leading items in row-major order.
    ///
    /// Items beyond the old size take the element kind's fill value.
    pub fn resize(&mut self, shape: &[usize]) {
        self.materialize();
        let n = self.isize;
        let new_size = calc_size(shape);
        let keep = self.size.min(new_size) * n;
        debug!(
            name = %self.name,
            from = ?self.shape,
            to = ?shape,
            "resizing dataset"
        );
        let mut data = alloc_filled(new_size * n, T::fill_value());
        self.store
            .with_read(|old| data[..keep].clone_from_slice(&old[..keep]));
        self.store = BackingStore::new(data);
        self.shape = shape.to_vec();
        self.size = new_size;
        self.set_dirty();
    }

    /// Write `value` at `pos`, growing the dataset if `pos` lies outside it.
    ///
    /// Each axis grows to cover `pos`. When the reserved extent is too small
    /// it is enlarged by [`GROWTH_FACTOR`] (or to `pos`, if further), and
    /// existing items keep their positions. Positions exposed by growth hold
    /// the fill value.
    pub fn set_extend(&mut self, pos: &[usize], value: impl Into<Value>) -> Result<()> {
        if pos.len() != self.rank() {
            return Err(DatasetError::RankMismatch(pos.len(), self.rank()));
        }
        let item = to_item::<T>(&value.into(), self.isize)?;
        if pos.iter().zip(&self.shape).all(|(&p, &d)| p < d) {
            let index = self.offset_of(pos)?;
            return self.write_item(index, &item);
        }
        if self.is_view || self.stride.is_some() {
            self.materialize();
        }
        let capacity = self.data_shape.clone().unwrap_or_else(|| self.shape.clone());
        let shape: Vec<usize> = self
            .shape
            .iter()
            .zip(pos)
            .map(|(&d, &p)| d.max(p + 1))
            .collect();
        let capacity = if shape.iter().zip(&capacity).any(|(s, c)| s > c) {
            let grown: Vec<usize> = shape
                .iter()
                .zip(&capacity)
                .map(|(&s, &c)| if s > c { s.max(c.saturating_mul(GROWTH_FACTOR)) } else { c })
                .collect();
            self.reallocate(&capacity, &grown);
            grown
        } else {
            capacity
        };
        self.size = calc_size(&shape);
        self.shape = shape;
        self.data_shape = (capacity != self.shape).then_some(capacity);
        let extent = self.data_shape.as_deref().unwrap_or(&self.shape);
        let index = get_1d_index(extent, pos, self.isize)?;
        let n = self.isize;
        self.modify(|d| d[index..index + n].clone_from_slice(&item));
        Ok(())
    }

    /// Move the current items from a row-major `old` extent into a fresh
    /// buffer of extent `new`.
    fn reallocate(&mut self, old: &[usize], new: &[usize]) {
        let n = self.isize;
        debug!(
            name = %self.name,
            shape = ?self.shape,
            from = ?old,
            to = ?new,
            "growing dataset buffer"
        );
        let mut data = alloc_filled(calc_size(new) * n, T::fill_value());
        let dst_strides = item_strides(new, n);
        let mut it = StrideIterator::new(&self.shape, &item_strides(old, n), 0);
        self.store.with_read(|src| {
            while it.has_next() {
                let i = it.index();
                let pos = it.pos().unwrap_or_default();
                let j = strided_offset(pos, &dst_strides, 0);
                data[j..j + n].clone_from_slice(&src[i..i + n]);
            }
        });
        self.store = BackingStore::new(data);
    }
}
