//! Element-kind conversion.

use tracing::debug;

use super::Dataset;
use crate::buffer::BackingStore;
use crate::{convert, Element, Result};

#[cfg(feature = "parallel")]
use crate::MIN_THREAD_LENGTH;

/// Convert every slot of `values` to `U`.
fn convert_all<T: Element, U: Element>(values: &[T]) -> Vec<U> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if values.len() >= MIN_THREAD_LENGTH {
            return values.par_iter().map(convert).collect();
        }
    }
    values.iter().map(convert).collect()
}

impl<T: Element> Dataset<T> {
    /// New dataset of `U` slots with the same shape and item width.
    ///
    /// Compound kinds keep their meaning where the new base allows it
    /// (complex over floats, RGB over `i16`) and degrade to plain arrays
    /// otherwise.
    ///
    /// # Errors
    /// Fails when the new base has no compound kind of this width, e.g.
    /// casting a complex dataset to `bool`.
    pub fn cast<U: Element>(&self) -> Result<Dataset<U>> {
        let dtype = if self.isize == 1 {
            U::DTYPE
        } else {
            self.dtype.with_base(U::DTYPE)
        };
        dtype.validate_item_size(self.isize)?;
        debug!(
            name = %self.name,
            from = %self.dtype,
            to = %dtype,
            size = self.size,
            "casting dataset"
        );
        let data = convert_all::<T, U>(&self.to_vec());
        let mut out = Dataset::from_parts(BackingStore::new(data), self.shape.clone(), self.isize, dtype);
        out.name = self.name.clone();
        Ok(out)
    }

    /// Cast to `U` while changing the item width; see
    /// [`compound_from`](Dataset::compound_from).
    pub fn cast_compound<U: Element>(&self, repeat: bool, isize: usize) -> Result<Dataset<U>> {
        Dataset::<U>::compound_from(self, repeat, isize)
    }
}
