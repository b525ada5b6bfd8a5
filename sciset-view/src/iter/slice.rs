use super::{IndexIterator, StrideIterator};
use crate::slice::{bind_slices, slice_shape, Slice};
use crate::Result;

/// Walks the sub-array selected by one [`Slice`] per axis.
///
/// The base layout is given by its strides (in scalar slots) and offset;
/// the walk then reduces to a [`StrideIterator`] with strides scaled by each
/// axis' step and an origin at the slices' starts.
#[derive(Debug, Clone)]
pub struct SliceIterator {
    start: Vec<usize>,
    step: Vec<isize>,
    slices: Vec<Slice>,
    inner: StrideIterator,
}

impl SliceIterator {
    /// Missing trailing slices select whole axes.
    pub fn new(
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        slices: &[Option<Slice>],
    ) -> Result<Self> {
        let bound = bind_slices(slices, shape)?;
        let sliced = slice_shape(&bound)?;
        let mut start = Vec::with_capacity(bound.len());
        let mut step = Vec::with_capacity(bound.len());
        let mut origin = offset as isize;
        let mut walk = Vec::with_capacity(bound.len());
        for (i, s) in bound.iter().enumerate() {
            let (a, _) = s.resolved()?;
            // An empty axis never dereferences its start.
            let a = if sliced[i] == 0 { 0 } else { a };
            origin += a * strides[i];
            walk.push(strides[i] * s.step());
            start.push(a as usize);
            step.push(s.step());
        }
        Ok(Self {
            start,
            step,
            slices: bound,
            inner: StrideIterator::new(&sliced, &walk, origin as usize),
        })
    }

    /// Shape of the selected sub-array.
    #[inline]
    pub fn slice_shape(&self) -> &[usize] {
        self.inner.shape()
    }

    #[inline]
    pub fn start(&self) -> &[usize] {
        &self.start
    }

    #[inline]
    pub fn step(&self) -> &[isize] {
        &self.step
    }

    /// Bound per-axis slices.
    pub fn slices(&self) -> &[Slice] {
        &self.slices
    }

    /// Strides of the selection in scalar slots.
    pub fn strides(&self) -> &[isize] {
        self.inner.strides()
    }

    /// Offset of the selection's first item.
    pub fn offset(&self) -> usize {
        self.inner.offset()
    }
}

impl IndexIterator for SliceIterator {
    #[inline]
    fn has_next(&mut self) -> bool {
        self.inner.has_next()
    }

    #[inline]
    fn index(&self) -> usize {
        self.inner.index()
    }

    /// Position within the selection, not the base array.
    fn pos(&self) -> Option<&[usize]> {
        self.inner.pos()
    }

    fn shape(&self) -> &[usize] {
        self.inner.shape()
    }

    fn reset(&mut self) {
        self.inner.reset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_slice_walks_everything() {
        let it = SliceIterator::new(&[2, 3], &[3, 1], 0, &[]).unwrap();
        assert_eq!(it.slice_shape(), &[2, 3]);
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stepped_columns() {
        let cols = Slice::new(Some(1), None, 2).unwrap();
        let it = SliceIterator::new(&[3, 4], &[4, 1], 0, &[None, Some(cols)]).unwrap();
        assert_eq!(it.slice_shape(), &[3, 2]);
        assert_eq!(it.start(), &[0, 1]);
        assert_eq!(it.step(), &[1, 2]);
        assert_eq!(
            it.offsets().collect::<Vec<_>>(),
            vec![1, 3, 5, 7, 9, 11]
        );
    }

    #[test]
    fn test_reverse_slice() {
        let rev = Slice::new(None, None, -1).unwrap();
        let it = SliceIterator::new(&[5], &[1], 0, &[Some(rev)]).unwrap();
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_compound_items_scale_offsets() {
        let it = SliceIterator::new(&[4], &[3], 0, &[Some(Slice::range(1, 3))]).unwrap();
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![3, 6]);
    }

    #[test]
    fn test_empty_selection() {
        let mut it =
            SliceIterator::new(&[4, 2], &[2, 1], 0, &[Some(Slice::range(4, 4))]).unwrap();
        assert_eq!(it.slice_shape(), &[0, 2]);
        assert!(!it.has_next());
    }

    #[test]
    fn test_slice_of_view_layout() {
        // Every other element of a reversed 6-vector stored from offset 5.
        let it =
            SliceIterator::new(&[6], &[-1], 5, &[Some(Slice::new(None, None, 2).unwrap())])
                .unwrap();
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![5, 3, 1]);
    }
}
