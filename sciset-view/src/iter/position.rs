use super::{IndexIterator, Odometer};
use crate::shape::{check_axis, row_major_strides};
use crate::slice::{bind_slices, Slice};
use crate::Result;

/// Visits N-dimensional positions of a shape, holding omitted axes fixed.
///
/// Typical use is reducing along an axis: omit it, then for each reported
/// position walk the omitted axis by hand. Omitted axes stay at their start
/// (zero without a slice).
#[derive(Debug, Clone)]
pub struct PositionIterator {
    shape: Vec<usize>,
    omit: Vec<bool>,
    start: Vec<usize>,
    step: Vec<isize>,
    pos: Vec<usize>,
    strides: Vec<isize>,
    offset: usize,
    odometer: Odometer,
}

impl PositionIterator {
    /// Iterate every position of `shape` except along the `omit` axes.
    ///
    /// Axes may be negative. Offsets default to a row-major layout with
    /// unit items; use [`with_layout`](Self::with_layout) for anything else.
    pub fn new(shape: &[usize], omit: &[isize]) -> Result<Self> {
        Self::with_slices(shape, &[], omit)
    }

    /// Restrict the walk to `slices` before omitting axes.
    pub fn with_slices(shape: &[usize], slices: &[Option<Slice>], omit: &[isize]) -> Result<Self> {
        let mut mask = vec![false; shape.len()];
        for &axis in omit {
            mask[check_axis(shape.len(), axis)?] = true;
        }
        let bound = bind_slices(slices, shape)?;
        let mut start = Vec::with_capacity(shape.len());
        let mut step = Vec::with_capacity(shape.len());
        let mut extents = Vec::with_capacity(shape.len());
        for (i, s) in bound.iter().enumerate() {
            let n = s.num_steps()?;
            let (a, _) = s.resolved()?;
            start.push(if n == 0 { 0 } else { a as usize });
            step.push(s.step());
            extents.push(if mask[i] { n.min(1) } else { n });
        }
        let strides = row_major_strides(shape);
        let mut it = Self {
            shape: shape.to_vec(),
            omit: mask,
            pos: start.clone(),
            start,
            step,
            strides,
            offset: 0,
            odometer: Odometer::new(extents, vec![0; shape.len()], 0),
        };
        it.rebuild_odometer();
        Ok(it)
    }

    /// Compute offsets with explicit strides (scalar slots) and origin.
    pub fn with_layout(mut self, strides: &[isize], offset: usize) -> Self {
        self.strides = strides.to_vec();
        self.offset = offset;
        self.rebuild_odometer();
        self
    }

    fn rebuild_odometer(&mut self) {
        let origin = self.offset as isize
            + self
                .start
                .iter()
                .zip(&self.strides)
                .map(|(&a, &s)| a as isize * s)
                .sum::<isize>();
        let deltas = self
            .strides
            .iter()
            .zip(&self.step)
            .map(|(&s, &k)| s * k)
            .collect();
        let extents = self.odometer.extents().to_vec();
        self.odometer = Odometer::new(extents, deltas, origin);
        self.pos.copy_from_slice(&self.start);
    }

    /// Which axes are held fixed.
    #[inline]
    pub fn omit(&self) -> &[bool] {
        &self.omit
    }

    /// Shape of the positions visited; omitted axes count as one.
    pub fn walk_shape(&self) -> &[usize] {
        self.odometer.extents()
    }
}

impl IndexIterator for PositionIterator {
    fn has_next(&mut self) -> bool {
        let Some(from) = self.odometer.advance() else {
            return false;
        };
        let counts = self.odometer.counts();
        for j in from..self.pos.len() {
            self.pos[j] = (self.start[j] as isize + counts[j] as isize * self.step[j]) as usize;
        }
        true
    }

    #[inline]
    fn index(&self) -> usize {
        self.odometer.index() as usize
    }

    fn pos(&self) -> Option<&[usize]> {
        Some(&self.pos)
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn reset(&mut self) {
        self.odometer.reset();
        self.pos.copy_from_slice(&self.start);
    }
}
