//! Views, slices and slice assignment.

use super::Dataset;
use crate::compound::to_item;
use crate::iter::{IndexIterator, SliceIterator};
use crate::shape::check_compatibility;
use crate::slice::Slice;
use crate::value::Value;
use crate::{convert, DatasetError, Element, Result};

impl<T: Element> Dataset<T> {
    /// View of the whole dataset sharing its buffer.
    pub fn get_view(&self) -> Self {
        let (strides, offset) = self.layout();
        let mut view = self.view_with(self.shape.clone(), strides, offset, self.isize, self.dtype);
        if self.is_contiguous() {
            view.stride = None;
        }
        view
    }

    /// View of the sub-array selected by `slices`, sharing this buffer.
    ///
    /// Writes through the view land in this dataset and vice versa.
    pub fn get_slice_view(&self, slices: &[Option<Slice>]) -> Result<Self> {
        let it = self.slice_iterator(slices)?;
        Ok(self.view_with(
            it.slice_shape().to_vec(),
            it.strides().to_vec(),
            it.offset(),
            self.isize,
            self.dtype,
        ))
    }

    /// Contiguous copy of the sub-array selected by `slices`.
    pub fn get_slice(&self, slices: &[Option<Slice>]) -> Result<Self> {
        Ok(self.get_slice_view(slices)?.copy())
    }

    /// Contiguous copy of the items a slice iterator visits.
    ///
    /// The iterator must have been built against this dataset's layout.
    pub fn get_slice_from_iterator(&self, it: SliceIterator) -> Result<Self> {
        let shape = it.slice_shape().to_vec();
        let n = self.isize;
        let len = self.store.len();
        let data = self.store.with_read(|d| {
            let mut out = Vec::new();
            for i in it.offsets() {
                let item = d
                    .get(i..i + n)
                    .ok_or(DatasetError::IndexOutOfRange { index: i, len })?;
                out.extend_from_slice(item);
            }
            Ok::<_, DatasetError>(out)
        })?;
        Ok(Self::from_vec_compound(data, n, &shape)?
            .with_dtype(self.dtype)?
            .with_name(self.name.clone()))
    }

    /// Write `value`, coerced to one item, into every selected position.
    pub fn set_slice(&mut self, value: impl Into<Value>, slices: &[Option<Slice>]) -> Result<()> {
        let item = to_item::<T>(&value.into(), self.isize)?;
        let offsets: Vec<usize> = self.slice_iterator(slices)?.offsets().collect();
        let n = self.isize;
        self.modify(|d| {
            for &i in &offsets {
                d[i..i + n].clone_from_slice(&item);
            }
        });
        Ok(())
    }

    /// Copy `src` into the selected positions, item for item in row-major
    /// order.
    ///
    /// `src` must hold as many items as the selection, each either as wide
    /// as this dataset's items or a single slot broadcast across them.
    /// `src` may share this dataset's buffer.
    pub fn set_slice_from<U: Element>(
        &mut self,
        src: &Dataset<U>,
        slices: &[Option<Slice>],
    ) -> Result<()> {
        let it = self.slice_iterator(slices)?;
        check_compatibility(it.slice_shape(), src.shape())?;
        let n = self.isize;
        let k = src.elements_per_item();
        if k != n && k != 1 {
            return Err(DatasetError::InvalidArgument(format!(
                "cannot fill items of {n} elements from items of {k}"
            )));
        }
        let values: Vec<T> = src.to_vec().iter().map(convert).collect();
        let offsets: Vec<usize> = it.offsets().collect();
        self.modify(|d| {
            for (j, &i) in offsets.iter().enumerate() {
                if k == n {
                    d[i..i + n].clone_from_slice(&values[j * n..(j + 1) * n]);
                } else {
                    d[i..i + n].fill(values[j].clone());
                }
            }
        });
        Ok(())
    }

    /// Fill every item with `value`.
    pub fn fill(&mut self, value: impl Into<Value>) -> Result<()> {
        self.set_slice(value, &[])
    }

    /// View with axes permuted; an empty `axes` reverses them.
    pub fn get_transposed_view(&self, axes: &[usize]) -> Result<Self> {
        let rank = self.rank();
        let axes: Vec<usize> = if axes.is_empty() {
            (0..rank).rev().collect()
        } else {
            axes.to_vec()
        };
        let mut seen = vec![false; rank];
        if axes.len() != rank {
            return Err(DatasetError::RankMismatch(axes.len(), rank));
        }
        for &a in &axes {
            if a >= rank || std::mem::replace(&mut seen[a], true) {
                return Err(DatasetError::InvalidArgument(format!(
                    "{axes:?} is not a permutation of {rank} axes"
                )));
            }
        }
        let (strides, offset) = self.layout();
        let shape = axes.iter().map(|&a| self.shape[a]).collect();
        let strides = axes.iter().map(|&a| strides[a]).collect();
        Ok(self.view_with(shape, strides, offset, self.isize, self.dtype))
    }
}
