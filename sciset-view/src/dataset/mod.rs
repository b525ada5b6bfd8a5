//! The generic dataset type.
//!
//! A [`Dataset<T>`] is a shape over a flat [`BackingStore<T>`]. Each logical
//! item occupies `isize` consecutive slots; compound kinds (complex pairs,
//! RGB triples, fixed-width arrays) are just datasets with `isize > 1`.
//!
//! Layout is either plain row-major (no stride, no reserved region), row-major
//! over a larger reserved `data_shape` left behind by growth, or an explicit
//! stride/offset pair for views. All strides are counted in scalar slots.

pub mod arith;
mod cast;
mod derived;
mod elements;
mod growth;
mod slicing;

use std::fmt;

use num_complex::{Complex, Complex64};
use num_traits::Float;
use tracing::{debug, trace};

use crate::buffer::BackingStore;
use crate::cache::StoredValues;
use crate::compound::to_item;
use crate::iter::{
    AxisIndex, BooleanIterator, ContiguousIterator, DatasetIterator, IndexIterator,
    IntegerIterator, IntegersIterator, PositionIterator, SliceIterator, StrideIterator,
};
use crate::shape::{
    calc_size, check_compatibility, check_position, item_strides, position_of_flat,
    strided_offset, validate_bounds,
};
use crate::slice::Slice;
use crate::value::Value;
use crate::{DType, DatasetError, Element, Result};

/// Dense N-dimensional array of `T` slots.
pub struct Dataset<T: Element> {
    name: String,
    dtype: DType,
    isize: usize,
    shape: Vec<usize>,
    size: usize,
    store: BackingStore<T>,
    /// Explicit strides in slots; `None` means row-major.
    stride: Option<Vec<isize>>,
    offset: usize,
    /// Reserved row-major extent when larger than `shape`.
    data_shape: Option<Vec<usize>>,
    is_view: bool,
    stored: StoredValues,
}

fn check_base<T: Element>(dtype: DType) -> Result<()> {
    if dtype.base() != T::DTYPE {
        return Err(DatasetError::InvalidArgument(format!(
            "{dtype} is not stored as {}",
            T::DTYPE
        )));
    }
    Ok(())
}

// ============================================================================
// Construction
// ============================================================================

impl<T: Element> Dataset<T> {
    fn from_parts(store: BackingStore<T>, shape: Vec<usize>, isize: usize, dtype: DType) -> Self {
        Self {
            name: String::new(),
            dtype,
            isize,
            size: calc_size(&shape),
            shape,
            store,
            stride: None,
            offset: 0,
            data_shape: None,
            is_view: false,
            stored: StoredValues::new(),
        }
    }

    /// View sharing this dataset's buffer under a new layout.
    fn view_with(
        &self,
        shape: Vec<usize>,
        strides: Vec<isize>,
        offset: usize,
        isize: usize,
        dtype: DType,
    ) -> Self {
        let mut view = Self::from_parts(self.store.clone(), shape, isize, dtype);
        view.name = self.name.clone();
        view.stride = Some(strides);
        view.offset = offset;
        view.is_view = true;
        view
    }

    /// Zero-filled dataset of scalar items.
    pub fn zeros(shape: &[usize]) -> Self {
        Self::from_parts(BackingStore::zeroed(shape, 1), shape.to_vec(), 1, T::DTYPE)
    }

    /// Zero-filled dataset whose items span `isize` slots.
    pub fn zeros_compound(isize: usize, shape: &[usize]) -> Result<Self> {
        let dtype = DType::compound(T::DTYPE, isize)?;
        Ok(Self::from_parts(
            BackingStore::zeroed(shape, isize),
            shape.to_vec(),
            isize,
            dtype,
        ))
    }

    /// Zero-filled dataset of kind `dtype`, which must be stored as `T`.
    pub fn zeros_of(dtype: DType, isize: usize, shape: &[usize]) -> Result<Self> {
        check_base::<T>(dtype)?;
        dtype.validate_item_size(isize)?;
        Ok(Self::from_parts(
            BackingStore::zeroed(shape, isize),
            shape.to_vec(),
            isize,
            dtype,
        ))
    }

    /// Wrap `data` as a row-major dataset; `data.len()` must equal the size.
    pub fn from_vec(data: Vec<T>, shape: &[usize]) -> Result<Self> {
        Self::from_vec_compound(data, 1, shape)
    }

    /// Wrap `data` as `isize`-slot items.
    pub fn from_vec_compound(data: Vec<T>, isize: usize, shape: &[usize]) -> Result<Self> {
        let dtype = DType::compound(T::DTYPE, isize)?;
        let expected = calc_size(shape) * isize;
        if data.len() != expected {
            return Err(DatasetError::ShapeMismatch(vec![data.len()], vec![expected]));
        }
        Ok(Self::from_parts(
            BackingStore::new(data),
            shape.to_vec(),
            isize,
            dtype,
        ))
    }

    /// Build from a function of the row-major position.
    pub fn from_fn(shape: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let size = calc_size(shape);
        let mut data = Vec::with_capacity(size);
        let mut pos = vec![0; shape.len()];
        for n in 0..size {
            position_of_flat(shape, n, &mut pos);
            data.push(f(&pos));
        }
        Self::from_parts(BackingStore::new(data), shape.to_vec(), 1, T::DTYPE)
    }

    /// Strided dataset over an existing store.
    ///
    /// # Errors
    /// Fails if any item reachable through `strides` and `offset` would fall
    /// outside the store.
    pub fn from_store(
        store: BackingStore<T>,
        isize: usize,
        shape: &[usize],
        strides: &[isize],
        offset: usize,
    ) -> Result<Self> {
        validate_bounds(store.len(), shape, strides, offset as isize, isize)?;
        let dtype = DType::compound(T::DTYPE, isize)?;
        let mut d = Self::from_parts(store, shape.to_vec(), isize, dtype);
        let row_major = offset == 0
            && d.size * isize == d.store.len()
            && strides == item_strides(shape, isize).as_slice();
        if !row_major {
            d.stride = Some(strides.to_vec());
            d.offset = offset;
            d.is_view = true;
        }
        Ok(d)
    }

    /// Re-tag with a kind over the same base, e.g. `ArrayInt16` to `Rgb`.
    pub fn with_dtype(mut self, dtype: DType) -> Result<Self> {
        check_base::<T>(dtype)?;
        dtype.validate_item_size(self.isize)?;
        self.dtype = dtype;
        Ok(self)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Deep copy into a fresh contiguous buffer.
    ///
    /// Values are gathered under a single read lock, so a concurrent writer
    /// on another handle cannot tear the copy.
    pub fn copy(&self) -> Self {
        let mut out = Self::from_parts(
            BackingStore::new(self.to_vec()),
            self.shape.clone(),
            self.isize,
            self.dtype,
        );
        out.name = self.name.clone();
        out
    }

    /// Deep copy for use while other threads write through aliasing handles.
    ///
    /// The read lock is held for the whole gather, so the copy reflects
    /// exactly one generation of the shared buffer.
    pub fn synchronized_copy(&self) -> Self {
        let n = self.isize;
        let offsets = self.offsets();
        let data = self.store.with_read(|d| {
            let mut out = Vec::with_capacity(offsets.len() * n);
            for &i in &offsets {
                out.extend_from_slice(&d[i..i + n]);
            }
            out
        });
        trace!(name = %self.name, size = self.size, "synchronized copy");
        let mut out = Self::from_parts(BackingStore::new(data), self.shape.clone(), n, self.dtype);
        out.name = self.name.clone();
        out
    }
}

// ============================================================================
// Shape queries
// ============================================================================

impl<T: Element> Dataset<T> {
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of items.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Slots per item.
    #[inline]
    pub fn elements_per_item(&self) -> usize {
        self.isize
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Explicit strides in slots, if this is a strided view.
    pub fn stride(&self) -> Option<&[isize]> {
        self.stride.as_deref()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Reserved extent left by growth, if larger than the shape.
    pub fn data_shape(&self) -> Option<&[usize]> {
        self.data_shape.as_deref()
    }

    #[inline]
    pub fn is_view(&self) -> bool {
        self.is_view
    }

    /// Whether items sit back to back from slot zero in row-major order.
    pub fn is_contiguous(&self) -> bool {
        self.stride.is_none() && self.data_shape.is_none()
    }

    /// Bytes of element data addressed by this dataset.
    pub fn nbytes(&self) -> usize {
        self.size * self.isize * T::BYTES
    }

    pub fn store(&self) -> &BackingStore<T> {
        &self.store
    }

    /// Map a possibly negative axis into `[0, rank)`.
    pub fn check_axis(&self, axis: isize) -> Result<usize> {
        crate::shape::check_axis(self.rank(), axis)
    }

    /// Row-major slot offset of `pos` within this dataset's shape.
    pub fn get_1d_index(&self, pos: &[usize]) -> Result<usize> {
        crate::shape::get_1d_index(&self.shape, pos, self.isize)
    }

    /// Fail unless both datasets hold the same number of items.
    pub fn check_compatibility<U: Element>(&self, other: &Dataset<U>) -> Result<()> {
        check_compatibility(&self.shape, &other.shape)
    }

    pub fn is_compatible_with<U: Element>(&self, other: &Dataset<U>) -> bool {
        self.check_compatibility(other).is_ok()
    }

    /// Effective strides (in slots) and offset.
    pub(crate) fn layout(&self) -> (Vec<isize>, usize) {
        match &self.stride {
            Some(s) => (s.clone(), self.offset),
            None => {
                let extent = self.data_shape.as_deref().unwrap_or(&self.shape);
                (item_strides(extent, self.isize), 0)
            }
        }
    }

    /// Absolute offset of the item at `pos`.
    fn offset_of(&self, pos: &[usize]) -> Result<usize> {
        check_position(&self.shape, pos)?;
        if self.is_contiguous() {
            return crate::shape::get_1d_index(&self.shape, pos, self.isize);
        }
        let (strides, offset) = self.layout();
        Ok(strided_offset(pos, &strides, offset as isize))
    }
}

// ============================================================================
// Iteration
// ============================================================================

impl<T: Element> Dataset<T> {
    /// Cursor over every item in row-major order.
    pub fn iterator(&self, with_position: bool) -> DatasetIterator {
        if self.is_contiguous() {
            return DatasetIterator::Contiguous(ContiguousIterator::new(
                &self.shape,
                self.isize,
                with_position,
            ));
        }
        let (strides, offset) = self.layout();
        DatasetIterator::Stride(StrideIterator::new(&self.shape, &strides, offset))
    }

    pub fn slice_iterator(&self, slices: &[Option<Slice>]) -> Result<SliceIterator> {
        let (strides, offset) = self.layout();
        SliceIterator::new(&self.shape, &strides, offset, slices)
    }

    /// Positions with the `omit` axes held at zero.
    pub fn position_iterator(&self, omit: &[isize]) -> Result<PositionIterator> {
        let (strides, offset) = self.layout();
        Ok(PositionIterator::new(&self.shape, omit)?.with_layout(&strides, offset))
    }

    /// Items where `mask` equals `value`.
    pub fn boolean_iterator(&self, mask: &Dataset<bool>, value: bool) -> Result<BooleanIterator> {
        BooleanIterator::new(self.iterator(true), mask, value)
    }

    /// Items named by flat row-major numbers in `index`.
    pub fn integer_iterator<I: Element>(&self, index: &Dataset<I>) -> Result<IntegerIterator> {
        let (strides, offset) = self.layout();
        IntegerIterator::new(&self.shape, &strides, offset, index)
    }

    /// Cross product of per-axis selections.
    pub fn integers_iterator(&self, axes: &[AxisIndex]) -> Result<IntegersIterator> {
        let (strides, offset) = self.layout();
        IntegersIterator::new(&self.shape, &strides, offset, axes)
    }

    /// All slots in row-major item order.
    pub fn to_vec(&self) -> Vec<T> {
        let n = self.isize;
        let len = self.size * n;
        if self.is_contiguous() {
            return self.store.with_read(|d| d[..len].to_vec());
        }
        let offsets = self.iterator(false).offsets();
        self.store.with_read(|d| {
            let mut out = Vec::with_capacity(len);
            for i in offsets {
                out.extend_from_slice(&d[i..i + n]);
            }
            out
        })
    }

    /// Offsets of every item, for write paths.
    pub(crate) fn offsets(&self) -> Vec<usize> {
        self.iterator(false).offsets().collect()
    }
}

// ============================================================================
// Element access
// ============================================================================

impl<T: Element> Dataset<T> {
    /// Slot at an absolute index; the index must be in range.
    #[inline]
    pub(crate) fn slot(&self, index: usize) -> T {
        self.store.with_read(|d| d[index].clone())
    }

    /// First slot of the item at `pos`.
    pub fn get(&self, pos: &[usize]) -> Result<T> {
        self.store.get(self.offset_of(pos)?)
    }

    /// All slots of the item at `pos`.
    pub fn get_item(&self, pos: &[usize]) -> Result<Vec<T>> {
        self.get_item_abs(self.offset_of(pos)?)
    }

    pub fn get_double(&self, pos: &[usize]) -> Result<f64> {
        Ok(self.get(pos)?.to_f64())
    }

    pub fn get_long(&self, pos: &[usize]) -> Result<i64> {
        Ok(self.get(pos)?.to_i64())
    }

    pub fn get_boolean(&self, pos: &[usize]) -> Result<bool> {
        Ok(self.get(pos)?.to_bool())
    }

    /// Slot at an absolute buffer index.
    pub fn get_abs(&self, index: usize) -> Result<T> {
        self.store.get(index)
    }

    /// The `isize` slots starting at an absolute index.
    pub fn get_item_abs(&self, index: usize) -> Result<Vec<T>> {
        let n = self.isize;
        self.store.with_read(|d| {
            index
                .checked_add(n)
                .and_then(|end| d.get(index..end))
                .map(<[T]>::to_vec)
                .ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: d.len(),
                })
        })
    }

    pub fn get_element_double_abs(&self, index: usize) -> Result<f64> {
        Ok(self.get_abs(index)?.to_f64())
    }

    pub fn get_element_long_abs(&self, index: usize) -> Result<i64> {
        Ok(self.get_abs(index)?.to_i64())
    }

    pub fn get_element_boolean_abs(&self, index: usize) -> Result<bool> {
        Ok(self.get_abs(index)?.to_bool())
    }

    /// The item at an absolute index as a [`Value`].
    ///
    /// Single-slot items come back as scalars, complex pairs as complex
    /// numbers, anything wider as a sequence.
    pub fn get_object_abs(&self, index: usize) -> Result<Value> {
        let item = self.get_item_abs(index)?;
        Ok(match item.as_slice() {
            [one] => Value::Scalar(one.to_scalar()),
            [re, im] if self.dtype.is_complex() => {
                Value::Complex(Complex64::new(re.to_f64(), im.to_f64()))
            }
            slots => Value::Sequence(slots.iter().map(|s| Value::Scalar(s.to_scalar())).collect()),
        })
    }

    /// Mutable access to the buffer; every write path comes through here.
    pub(crate) fn modify<R>(&mut self, f: impl FnOnce(&mut Vec<T>) -> R) -> R {
        let out = self.store.mutate(f);
        self.set_dirty();
        out
    }

    /// Write one item at an absolute index.
    fn write_item(&mut self, index: usize, item: &[T]) -> Result<()> {
        let len = self.store.len();
        let end = match index.checked_add(item.len()) {
            Some(end) if end <= len => end,
            _ => return Err(DatasetError::IndexOutOfRange { index, len }),
        };
        self.modify(|d| d[index..end].clone_from_slice(item));
        Ok(())
    }

    /// Overwrite one slot at an absolute index.
    pub fn set_abs(&mut self, index: usize, value: T) -> Result<()> {
        self.write_item(index, std::slice::from_ref(&value))
    }

    /// Coerce `value` into an item and write it at an absolute index.
    pub fn set_object_abs(&mut self, index: usize, value: impl Into<Value>) -> Result<()> {
        let item = to_item::<T>(&value.into(), self.isize)?;
        self.write_item(index, &item)
    }

    /// Coerce `value` into an item and write it at `pos`.
    ///
    /// `pos` must lie inside the current shape; see
    /// [`set_extend`](Self::set_extend) for writes that grow the dataset.
    pub fn set(&mut self, pos: &[usize], value: impl Into<Value>) -> Result<()> {
        let index = self.offset_of(pos)?;
        let item = to_item::<T>(&value.into(), self.isize)?;
        self.write_item(index, &item)
    }

    /// Write every item from `values`, laid out in row-major item order.
    pub(crate) fn write_all(&mut self, values: &[T]) -> Result<()> {
        let n = self.isize;
        if values.len() != self.size * n {
            return Err(DatasetError::ShapeMismatch(
                vec![values.len()],
                vec![self.size * n],
            ));
        }
        let offsets = self.offsets();
        self.modify(|d| {
            for (j, &i) in offsets.iter().enumerate() {
                d[i..i + n].clone_from_slice(&values[j * n..(j + 1) * n]);
            }
        });
        Ok(())
    }

    /// Give up private copies of the buffer's layout: views and reserved
    /// regions become a fresh contiguous buffer.
    pub(crate) fn materialize(&mut self) {
        if self.is_contiguous() && !self.is_view {
            return;
        }
        debug!(
            name = %self.name,
            shape = ?self.shape,
            view = self.is_view,
            "materializing contiguous copy"
        );
        let data = self.to_vec();
        self.store = BackingStore::new(data);
        self.stride = None;
        self.offset = 0;
        self.data_shape = None;
        self.is_view = false;
        self.set_dirty();
    }
}

// ============================================================================
// Complex items
// ============================================================================

impl<T: Element + Float> Dataset<T> {
    /// Complex dataset stored as `[re, im]` slot pairs.
    pub fn from_complex(values: &[Complex<T>], shape: &[usize]) -> Result<Self> {
        let mut data = Vec::with_capacity(values.len() * 2);
        for c in values {
            data.push(c.re);
            data.push(c.im);
        }
        let d = Self::from_vec_compound(data, 2, shape)?;
        d.with_dtype(DType::Complex128.with_base(T::DTYPE))
    }

    /// Item at `pos` as a complex number; single-slot items have zero
    /// imaginary part.
    pub fn get_complex(&self, pos: &[usize]) -> Result<Complex<T>> {
        let item = self.get_item(pos)?;
        let re = item[0];
        let im = item.get(1).copied().unwrap_or_else(<T as Element>::zero);
        Ok(Complex::new(re, im))
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

/// Deep copy; see [`Dataset::copy`].
impl<T: Element> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        self.copy()
    }
}

/// Equal kinds, shapes, item sizes and slot values, whatever the layouts.
impl<T: Element> PartialEq for Dataset<T> {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype
            && self.shape == other.shape
            && self.isize == other.isize
            && self.to_vec() == other.to_vec()
    }
}

impl<T: Element> fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dataset")
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("isize", &self.isize)
            .field("shape", &self.shape)
            .field("stride", &self.stride)
            .field("offset", &self.offset)
            .field("data_shape", &self.data_shape)
            .field("is_view", &self.is_view)
            .finish()
    }
}
