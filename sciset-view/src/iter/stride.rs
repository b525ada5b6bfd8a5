use super::IndexIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Row-major counter over `extents` maintaining a running offset.
///
/// Each axis contributes `deltas[axis]` to the offset per count; the offset
/// is updated incrementally rather than recomputed.
#[derive(Debug, Clone)]
pub(crate) struct Odometer {
    extents: Vec<usize>,
    deltas: Vec<isize>,
    origin: isize,
    counts: Vec<usize>,
    index: isize,
    state: State,
}

impl Odometer {
    pub(crate) fn new(extents: Vec<usize>, deltas: Vec<isize>, origin: isize) -> Self {
        debug_assert_eq!(extents.len(), deltas.len());
        let rank = extents.len();
        Self {
            extents,
            deltas,
            origin,
            counts: vec![0; rank],
            index: origin,
            state: State::Fresh,
        }
    }

    /// Step forward. Returns the outermost axis whose count changed (every
    /// axis after it was reset to zero), or `None` once exhausted.
    pub(crate) fn advance(&mut self) -> Option<usize> {
        match self.state {
            State::Done => None,
            State::Fresh => {
                if self.extents.iter().any(|&n| n == 0) {
                    self.state = State::Done;
                    return None;
                }
                self.state = State::Running;
                Some(0)
            }
            State::Running => {
                for j in (0..self.extents.len()).rev() {
                    self.counts[j] += 1;
                    self.index += self.deltas[j];
                    if self.counts[j] < self.extents[j] {
                        return Some(j);
                    }
                    self.index -= self.deltas[j] * self.extents[j] as isize;
                    self.counts[j] = 0;
                }
                self.state = State::Done;
                None
            }
        }
    }

    #[inline]
    pub(crate) fn index(&self) -> isize {
        self.index
    }

    #[inline]
    pub(crate) fn counts(&self) -> &[usize] {
        &self.counts
    }

    #[inline]
    pub(crate) fn extents(&self) -> &[usize] {
        &self.extents
    }

    pub(crate) fn reset(&mut self) {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.index = self.origin;
        self.state = State::Fresh;
    }
}

/// Walks `offset + Σ pos[i] * strides[i]` over every position of `shape`.
#[derive(Debug, Clone)]
pub struct StrideIterator {
    odometer: Odometer,
}

impl StrideIterator {
    /// `strides` are in scalar slots, already scaled by the item size.
    pub fn new(shape: &[usize], strides: &[isize], offset: usize) -> Self {
        Self {
            odometer: Odometer::new(shape.to_vec(), strides.to_vec(), offset as isize),
        }
    }

    pub fn strides(&self) -> &[isize] {
        &self.odometer.deltas
    }

    pub fn offset(&self) -> usize {
        self.odometer.origin as usize
    }
}

impl IndexIterator for StrideIterator {
    #[inline]
    fn has_next(&mut self) -> bool {
        self.odometer.advance().is_some()
    }

    #[inline]
    fn index(&self) -> usize {
        self.odometer.index() as usize
    }

    fn pos(&self) -> Option<&[usize]> {
        Some(self.odometer.counts())
    }

    fn shape(&self) -> &[usize] {
        self.odometer.extents()
    }

    fn reset(&mut self) {
        self.odometer.reset()
    }
}
