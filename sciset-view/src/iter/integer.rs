use super::{IndexIterator, Odometer};
use crate::dataset::Dataset;
use crate::shape::{calc_size, check_compatibility, position_of_flat, strided_offset};
use crate::slice::Slice;
use crate::{DatasetError, Element, Result};

/// Map a possibly negative index into `[0, len)`.
fn wrap_index(i: isize, len: usize) -> Result<usize> {
    let w = if i < 0 { i + len as isize } else { i };
    if w < 0 || w >= len as isize {
        return Err(DatasetError::IndexOutOfRange {
            index: i.unsigned_abs(),
            len,
        });
    }
    Ok(w as usize)
}

// ============================================================================
// Flat integer indexing
// ============================================================================

/// Visits source items named by a dataset of flat, row-major item numbers.
///
/// Negative numbers count from the end. The walk takes the index dataset's
/// shape.
#[derive(Debug, Clone)]
pub struct IntegerIterator {
    shape: Vec<usize>,
    offsets: Vec<usize>,
    cursor: Option<usize>,
}

impl IntegerIterator {
    /// `shape`, `strides` and `offset` describe the source layout.
    pub fn new<I: Element>(
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        index: &Dataset<I>,
    ) -> Result<Self> {
        let size = calc_size(shape);
        let mut pos = vec![0; shape.len()];
        let offsets = index
            .to_vec()
            .iter()
            .map(|v| {
                let n = wrap_index(v.to_i64() as isize, size)?;
                position_of_flat(shape, n, &mut pos);
                Ok(strided_offset(&pos, strides, offset as isize))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            shape: index.shape().to_vec(),
            offsets,
            cursor: None,
        })
    }
}

impl IndexIterator for IntegerIterator {
    fn has_next(&mut self) -> bool {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next < self.offsets.len() {
            self.cursor = Some(next);
            true
        } else {
            self.cursor = Some(self.offsets.len());
            false
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.cursor
            .and_then(|c| self.offsets.get(c))
            .copied()
            .unwrap_or(0)
    }

    fn pos(&self) -> Option<&[usize]> {
        None
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn reset(&mut self) {
        self.cursor = None;
    }
}

// ============================================================================
// Per-axis indexing
// ============================================================================

/// Selection applied to one axis by [`IntegersIterator`].
#[derive(Debug, Clone, PartialEq)]
pub enum AxisIndex {
    /// One index; the axis is dropped from the result shape.
    Single(isize),
    Slice(Slice),
    /// Listed indices, in order, repeats allowed.
    Integers(Vec<isize>),
    /// Indices where the mask is true; must match the axis length.
    Mask(Vec<bool>),
    Full,
}

impl AxisIndex {
    /// Integer list from an index dataset, or a mask from a boolean one.
    pub fn from_dataset<I: Element>(index: &Dataset<I>) -> Self {
        let values = index.to_vec();
        if I::DTYPE.is_bool() {
            AxisIndex::Mask(values.iter().map(|v| v.to_bool()).collect())
        } else {
            AxisIndex::Integers(values.iter().map(|v| v.to_i64() as isize).collect())
        }
    }

    fn positions(&self, len: usize) -> Result<Vec<usize>> {
        match self {
            AxisIndex::Single(i) => Ok(vec![wrap_index(*i, len)?]),
            AxisIndex::Slice(s) => Ok(s.bind(len)?.positions()?.collect()),
            AxisIndex::Integers(v) => v.iter().map(|&i| wrap_index(i, len)).collect(),
            AxisIndex::Mask(m) => {
                check_compatibility(&[m.len()], &[len])?;
                Ok(m.iter()
                    .enumerate()
                    .filter_map(|(i, &b)| b.then_some(i))
                    .collect())
            }
            AxisIndex::Full => Ok((0..len).collect()),
        }
    }
}

impl From<isize> for AxisIndex {
    fn from(i: isize) -> Self {
        AxisIndex::Single(i)
    }
}

impl From<Slice> for AxisIndex {
    fn from(s: Slice) -> Self {
        AxisIndex::Slice(s)
    }
}

impl From<Vec<isize>> for AxisIndex {
    fn from(v: Vec<isize>) -> Self {
        AxisIndex::Integers(v)
    }
}

impl From<Vec<bool>> for AxisIndex {
    fn from(m: Vec<bool>) -> Self {
        AxisIndex::Mask(m)
    }
}

/// Visits the cross product of one [`AxisIndex`] per source axis.
///
/// Axes beyond those given are taken whole. `pos()` reports the source
/// position.
#[derive(Debug, Clone)]
pub struct IntegersIterator {
    shape: Vec<usize>,
    output_shape: Vec<usize>,
    lists: Vec<Vec<usize>>,
    strides: Vec<isize>,
    offset: usize,
    pos: Vec<usize>,
    index: usize,
    odometer: Odometer,
}

impl IntegersIterator {
    pub fn new(
        shape: &[usize],
        strides: &[isize],
        offset: usize,
        axes: &[AxisIndex],
    ) -> Result<Self> {
        if axes.len() > shape.len() {
            return Err(DatasetError::RankMismatch(axes.len(), shape.len()));
        }
        let mut lists = Vec::with_capacity(shape.len());
        let mut output_shape = Vec::with_capacity(shape.len());
        let full = AxisIndex::Full;
        for (i, &n) in shape.iter().enumerate() {
            let sel = axes.get(i).unwrap_or(&full);
            let list = sel.positions(n)?;
            if !matches!(sel, AxisIndex::Single(_)) {
                output_shape.push(list.len());
            }
            lists.push(list);
        }
        let extents = lists.iter().map(Vec::len).collect();
        Ok(Self {
            shape: shape.to_vec(),
            output_shape,
            strides: strides.to_vec(),
            offset,
            pos: vec![0; shape.len()],
            index: offset,
            odometer: Odometer::new(extents, vec![0; lists.len()], 0),
            lists,
        })
    }

    /// Shape of the selection, without axes picked by a single index.
    pub fn output_shape(&self) -> &[usize] {
        &self.output_shape
    }
}

impl IndexIterator for IntegersIterator {
    fn has_next(&mut self) -> bool {
        let Some(from) = self.odometer.advance() else {
            return false;
        };
        let counts = self.odometer.counts();
        for j in from..self.pos.len() {
            self.pos[j] = self.lists[j][counts[j]];
        }
        self.index = strided_offset(&self.pos, &self.strides, self.offset as isize);
        true
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    fn pos(&self) -> Option<&[usize]> {
        Some(&self.pos)
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn reset(&mut self) {
        self.odometer.reset();
        self.index = self.offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_iterator_wraps_negative() {
        let idx = Dataset::<i32>::from_vec(vec![0, -1, 2], &[3]).unwrap();
        let it = IntegerIterator::new(&[2, 3], &[3, 1], 0, &idx).unwrap();
        assert_eq!(it.shape(), &[3]);
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![0, 5, 2]);
    }

    #[test]
    fn test_integer_iterator_uses_layout() {
        // Column-major 2x3 with items of two slots.
        let idx = Dataset::<i64>::from_vec(vec![1, 3], &[2]).unwrap();
        let it = IntegerIterator::new(&[2, 3], &[2, 4], 0, &idx).unwrap();
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![4, 2]);
    }

    #[test]
    fn test_integer_iterator_out_of_range() {
        let idx = Dataset::<i32>::from_vec(vec![6], &[1]).unwrap();
        assert!(matches!(
            IntegerIterator::new(&[2, 3], &[3, 1], 0, &idx),
            Err(DatasetError::IndexOutOfRange { index: 6, len: 6 })
        ));
    }

    #[test]
    fn test_integers_cross_product() {
        let axes = [AxisIndex::Integers(vec![2, 0]), AxisIndex::Slice(Slice::range(1, 3))];
        let mut it = IntegersIterator::new(&[3, 4], &[4, 1], 0, &axes).unwrap();
        assert_eq!(it.output_shape(), &[2, 2]);
        let mut seen = Vec::new();
        while it.has_next() {
            seen.push((it.pos().unwrap().to_vec(), it.index()));
        }
        assert_eq!(
            seen,
            vec![
                (vec![2, 1], 9),
                (vec![2, 2], 10),
                (vec![0, 1], 1),
                (vec![0, 2], 2)
            ]
        );
    }

    #[test]
    fn test_integers_single_drops_axis() {
        let axes = [AxisIndex::Single(-1)];
        let it = IntegersIterator::new(&[3, 2], &[2, 1], 0, &axes).unwrap();
        assert_eq!(it.output_shape(), &[2]);
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![4, 5]);
    }

    #[test]
    fn test_integers_mask_axis() {
        let axes = [AxisIndex::Full, AxisIndex::Mask(vec![true, false, true])];
        let it = IntegersIterator::new(&[2, 3], &[3, 1], 0, &axes).unwrap();
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![0, 2, 3, 5]);
        let bad = [AxisIndex::Mask(vec![true])];
        assert!(IntegersIterator::new(&[2, 3], &[3, 1], 0, &bad).is_err());
    }

    #[test]
    fn test_axis_index_from_dataset() {
        let m = Dataset::<bool>::from_vec(vec![true, false], &[2]).unwrap();
        assert_eq!(AxisIndex::from_dataset(&m), AxisIndex::Mask(vec![true, false]));
        let i = Dataset::<i16>::from_vec(vec![1, -1], &[2]).unwrap();
        assert_eq!(AxisIndex::from_dataset(&i), AxisIndex::Integers(vec![1, -1]));
    }

    #[test]
    fn test_empty_selection() {
        let axes = [AxisIndex::Integers(vec![])];
        let mut it = IntegersIterator::new(&[3], &[1], 0, &axes).unwrap();
        assert_eq!(it.output_shape(), &[0]);
        assert!(!it.has_next());
    }
}
