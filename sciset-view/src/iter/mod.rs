//! Index iterators over dataset buffers.
//!
//! Every iterator here is a cursor in the same shape: call
//! [`has_next`](IndexIterator::has_next) to advance, then read the absolute
//! scalar offset with [`index`](IndexIterator::index). Offsets are already
//! scaled by the item size, so `index()..index() + isize` are the slots of
//! the current item.
//!
//! Position-aware iterators also expose [`pos`](IndexIterator::pos). The
//! returned slice is overwritten on the next advance; copy it to keep it.

mod boolean;
mod contiguous;
mod integer;
mod position;
mod slice;
mod stride;

pub use boolean::BooleanIterator;
pub use contiguous::ContiguousIterator;
pub use integer::{AxisIndex, IntegerIterator, IntegersIterator};
pub use position::PositionIterator;
pub use slice::SliceIterator;
pub use stride::StrideIterator;

pub(crate) use stride::Odometer;

/// Cursor protocol shared by all dataset iterators.
pub trait IndexIterator {
    /// Advance to the next item; `false` once exhausted.
    fn has_next(&mut self) -> bool;

    /// Absolute offset of the current item's first slot.
    fn index(&self) -> usize;

    /// Current position, if this iterator tracks one.
    fn pos(&self) -> Option<&[usize]>;

    /// Shape of the walk.
    fn shape(&self) -> &[usize];

    /// Rewind to before the first item.
    fn reset(&mut self);

    /// Adapt into a standard [`Iterator`] over offsets.
    fn offsets(self) -> Offsets<Self>
    where
        Self: Sized,
    {
        Offsets(self)
    }
}

/// [`Iterator`] adapter yielding the offsets of an [`IndexIterator`].
#[derive(Debug, Clone)]
pub struct Offsets<I>(I);

impl<I> Offsets<I> {
    pub fn into_inner(self) -> I {
        self.0
    }
}

impl<I: IndexIterator> Iterator for Offsets<I> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.0.has_next() {
            Some(self.0.index())
        } else {
            None
        }
    }
}

/// The iterator a dataset hands out for a full walk.
///
/// Contiguous datasets walk their buffer in steps of the item size; views
/// and datasets with reserved growth go through their strides.
#[derive(Debug, Clone)]
pub enum DatasetIterator {
    Contiguous(ContiguousIterator),
    Stride(StrideIterator),
}

macro_rules! dispatch {
    ($self:expr, $it:ident => $body:expr) => {
        match $self {
            DatasetIterator::Contiguous($it) => $body,
            DatasetIterator::Stride($it) => $body,
        }
    };
}

impl IndexIterator for DatasetIterator {
    #[inline]
    fn has_next(&mut self) -> bool {
        dispatch!(self, it => it.has_next())
    }

    #[inline]
    fn index(&self) -> usize {
        dispatch!(self, it => it.index())
    }

    fn pos(&self) -> Option<&[usize]> {
        dispatch!(self, it => it.pos())
    }

    fn shape(&self) -> &[usize] {
        dispatch!(self, it => it.shape())
    }

    fn reset(&mut self) {
        dispatch!(self, it => it.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_iterator_dispatch() {
        let c = DatasetIterator::Contiguous(ContiguousIterator::new(&[2, 2], 1, false));
        let s = DatasetIterator::Stride(StrideIterator::new(&[2, 2], &[1, 2], 0));
        assert_eq!(c.offsets().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
        assert_eq!(s.offsets().collect::<Vec<_>>(), vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_reset_restarts_walk() {
        let mut it = DatasetIterator::Stride(StrideIterator::new(&[3], &[2], 1));
        while it.has_next() {}
        it.reset();
        assert!(it.has_next());
        assert_eq!(it.index(), 1);
    }
}
