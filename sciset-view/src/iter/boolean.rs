use super::{DatasetIterator, IndexIterator};
use crate::dataset::Dataset;
use crate::shape::calc_size;
use crate::{DatasetError, Result};

/// Visits the source offsets where a same-sized boolean mask equals `value`.
///
/// Source and mask are walked by independent cursors in row-major order, so
/// the two may have different layouts (or even shapes of the same size).
#[derive(Debug)]
pub struct BooleanIterator {
    source: DatasetIterator,
    mask: Dataset<bool>,
    mask_iter: DatasetIterator,
    value: bool,
}

impl BooleanIterator {
    pub fn new(source: DatasetIterator, mask: &Dataset<bool>, value: bool) -> Result<Self> {
        let n = calc_size(source.shape());
        if n != mask.size() {
            return Err(DatasetError::ShapeMismatch(
                source.shape().to_vec(),
                mask.shape().to_vec(),
            ));
        }
        let mask = mask.get_view();
        let mask_iter = mask.iterator(false);
        Ok(Self {
            source,
            mask,
            mask_iter,
            value,
        })
    }

    /// Mask value being selected.
    pub fn value(&self) -> bool {
        self.value
    }
}

impl IndexIterator for BooleanIterator {
    fn has_next(&mut self) -> bool {
        loop {
            if !self.source.has_next() || !self.mask_iter.has_next() {
                return false;
            }
            if self.mask.slot(self.mask_iter.index()) == self.value {
                return true;
            }
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.source.index()
    }

    fn pos(&self) -> Option<&[usize]> {
        self.source.pos()
    }

    fn shape(&self) -> &[usize] {
        self.source.shape()
    }

    fn reset(&mut self) {
        self.source.reset();
        self.mask_iter.reset();
    }
}
