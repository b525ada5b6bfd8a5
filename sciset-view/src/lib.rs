//! Dense multi-dimensional datasets with strided views.
//!
//! This crate provides the indexing machinery scientific array types are
//! built from:
//!
//! - [`Dataset`]: a generic dense array over any [`Element`] kind, owning
//!   or viewing a shared [`BackingStore`]
//! - [`Slice`]: a normalized `start:stop:step` descriptor for one axis
//! - the [`iter`] family: contiguous, strided, sliced, positional,
//!   boolean-masked and integer-indexed cursors yielding absolute offsets
//! - [`Value`] and the [`compound`] coercions turning loose input into
//!   fixed-width items
//! - [`StoredValues`]: the derived-value cache invalidated on every write
//!
//! # Example
//!
//! ```rust
//! use sciset_view::{Dataset, Slice};
//!
//! let mut a = Dataset::<f64>::from_fn(&[3, 4], |pos| (pos[0] * 10 + pos[1]) as f64);
//!
//! // Every other column of every row, sharing `a`'s buffer.
//! let mut v = a
//!     .get_slice_view(&[None, Some(Slice::new(None, None, 2).unwrap())])
//!     .unwrap();
//! assert_eq!(v.shape(), &[3, 2]);
//! assert_eq!(v.get(&[1, 1]).unwrap(), 12.0);
//!
//! v.set(&[1, 1], 99.0).unwrap();
//! assert_eq!(a.get(&[1, 2]).unwrap(), 99.0);
//! ```

pub mod buffer;
pub mod cache;
pub mod compound;
pub mod dataset;
pub mod iter;
pub mod shape;
pub mod slice;
pub mod value;

pub use buffer::BackingStore;
pub use cache::StoredValues;
pub use compound::{
    to_boolean_array, to_byte_array, to_double_array, to_float_array, to_int_array, to_item,
    to_long_array, to_short_array,
};
pub use dataset::arith::{BinaryOp, Operand};
pub use dataset::Dataset;
pub use iter::{
    AxisIndex, BooleanIterator, ContiguousIterator, DatasetIterator, IndexIterator,
    IntegerIterator, IntegersIterator, Offsets, PositionIterator, SliceIterator, StrideIterator,
};
pub use sciset_traits::{convert, DType, DTypeError, Element, Scalar};
pub use shape::{calc_size, check_axis, get_1d_index, row_major_strides};
pub use slice::{convert_from_slice, Slice};
pub use value::{NumericArray, Value};

// ============================================================================
// Constants
// ============================================================================

/// Minimum element count before conversions fan out over rayon.
///
/// Only consulted with the `parallel` feature enabled.
pub const MIN_THREAD_LENGTH: usize = 1 << 15;

/// Per-axis capacity multiplier used when an extensible write outgrows
/// the reserved data shape.
pub const GROWTH_FACTOR: usize = 2;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during dataset operations.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Element counts differ where a one-to-one pairing is required.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Number of position components does not match the rank.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Absolute index outside the buffer.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// N-dimensional position outside the shape.
    #[error("position {pos:?} out of range for shape {shape:?}")]
    PositionOutOfRange { pos: Vec<usize>, shape: Vec<usize> },

    /// Axis outside `[-rank, rank)`.
    #[error("axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: isize, rank: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Input to a compound coercion could not be read as numbers.
    #[error("argument is not numeric: {0}")]
    NotNumeric(String),

    /// Operation has no meaning for this element kind.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// Integer overflow or negative offset while computing a view.
    #[error("offset overflow while computing view")]
    OffsetOverflow,

    /// Stride array length doesn't match the rank.
    #[error("stride and shape length mismatch")]
    StrideLengthMismatch,

    #[error(transparent)]
    DType(#[from] DTypeError),
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
