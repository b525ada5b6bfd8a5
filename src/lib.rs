//! Dense multi-dimensional scientific datasets.
//!
//! This crate bundles the sciset workspace behind one import:
//!
//! - [`Dataset`]: generic dense array with shared strided views, slicing,
//!   growth, casting and cached derived values
//! - the iterator family ([`IndexIterator`] and its implementations) walking
//!   absolute buffer offsets
//! - [`DType`]: the element-kind registry and promotion ladder
//! - [`AnyDataset`]: a dataset whose element kind is picked at runtime
//!
//! # Example
//!
//! ```rust
//! use sciset::{AnyDataset, DType, Dataset, Slice};
//!
//! let a = Dataset::<f64>::from_fn(&[2, 3], |p| (p[0] * 3 + p[1]) as f64);
//! let row = a.get_slice(&[Some(Slice::range(1, 2))]).unwrap();
//! assert_eq!(row.to_vec(), vec![3.0, 4.0, 5.0]);
//!
//! let any = AnyDataset::from(a).cast(DType::Int16).unwrap();
//! assert_eq!(any.dtype(), DType::Int16);
//! assert_eq!(any.get_long(&[1, 2]).unwrap(), 5);
//! ```

mod any;

pub use any::{promoted_dtype, AnyDataset, AnyElement};
pub use sciset_traits::{dtype, element};
pub use sciset_view::{
    to_boolean_array, to_byte_array, to_double_array, to_float_array, to_int_array, to_item,
    to_long_array, to_short_array,
};
pub use sciset_view::{
    buffer, cache, compound, iter, shape, slice, value, AxisIndex, BackingStore, BinaryOp,
    BooleanIterator, ContiguousIterator, DType, DTypeError, Dataset, DatasetError,
    DatasetIterator, Element, IndexIterator, IntegerIterator, IntegersIterator, NumericArray,
    Offsets, Operand, PositionIterator, Result, Scalar, Slice, SliceIterator, StoredValues,
    StrideIterator, Value, GROWTH_FACTOR, MIN_THREAD_LENGTH,
};
