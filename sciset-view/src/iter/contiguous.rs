use super::IndexIterator;
use crate::shape::calc_size;

/// Walks a contiguous buffer item by item: `0, isize, 2 * isize, ...`.
#[derive(Debug, Clone)]
pub struct ContiguousIterator {
    shape: Vec<usize>,
    isize: usize,
    end: usize,
    index: usize,
    started: bool,
    pos: Option<Vec<usize>>,
}

impl ContiguousIterator {
    /// `with_position` keeps a row-major position in step with the offset.
    pub fn new(shape: &[usize], isize: usize, with_position: bool) -> Self {
        Self {
            shape: shape.to_vec(),
            isize,
            end: calc_size(shape) * isize,
            index: 0,
            started: false,
            pos: with_position.then(|| vec![0; shape.len()]),
        }
    }

    /// One past the last slot visited.
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    fn step_position(&mut self) {
        let Some(pos) = self.pos.as_mut() else {
            return;
        };
        for j in (0..pos.len()).rev() {
            pos[j] += 1;
            if pos[j] < self.shape[j] {
                return;
            }
            pos[j] = 0;
        }
    }
}

impl IndexIterator for ContiguousIterator {
    fn has_next(&mut self) -> bool {
        if !self.started {
            self.started = true;
            return self.index < self.end;
        }
        if self.index >= self.end {
            return false;
        }
        self.index += self.isize;
        if self.index < self.end {
            self.step_position();
            true
        } else {
            false
        }
    }

    #[inline]
    fn index(&self) -> usize {
        self.index
    }

    fn pos(&self) -> Option<&[usize]> {
        self.pos.as_deref()
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn reset(&mut self) {
        self.index = 0;
        self.started = false;
        if let Some(pos) = self.pos.as_mut() {
            pos.iter_mut().for_each(|p| *p = 0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_by_item_size() {
        let it = ContiguousIterator::new(&[2, 2], 3, false);
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_tracks_position() {
        let mut it = ContiguousIterator::new(&[2, 3], 1, true);
        let mut seen = Vec::new();
        while it.has_next() {
            seen.push((it.index(), it.pos().unwrap().to_vec()));
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[4], (4, vec![1, 1]));
        assert_eq!(seen[5], (5, vec![1, 2]));
    }

    #[test]
    fn test_empty_and_scalar() {
        let mut it = ContiguousIterator::new(&[3, 0], 1, true);
        assert!(!it.has_next());
        assert!(!it.has_next());
        let it = ContiguousIterator::new(&[], 2, false);
        assert_eq!(it.offsets().collect::<Vec<_>>(), vec![0]);
    }
}
