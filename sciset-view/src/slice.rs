//! One-axis slice descriptors.
//!
//! A [`Slice`] is written like Python's `start:stop:step`. Negative `start`
//! and `stop` count from the end of the axis, but only once the slice is
//! bound to a concrete length with [`Slice::set_length`]; until then they
//! are kept as given.

use std::fmt;
use std::str::FromStr;

use crate::{DatasetError, Result};

/// A `start:stop:step` range over one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slice {
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
    length: Option<usize>,
}

impl Default for Slice {
    fn default() -> Self {
        Slice::full()
    }
}

impl Slice {
    /// Create an unbound slice. `step` must be non-zero.
    pub fn new(start: Option<isize>, stop: Option<isize>, step: isize) -> Result<Self> {
        if step == 0 {
            return Err(DatasetError::InvalidArgument(
                "slice step must not be zero".into(),
            ));
        }
        Ok(Self {
            start,
            stop,
            step,
            length: None,
        })
    }

    /// The whole axis, forwards.
    pub const fn full() -> Self {
        Self {
            start: None,
            stop: None,
            step: 1,
            length: None,
        }
    }

    /// `start..stop` with unit step.
    pub const fn range(start: isize, stop: isize) -> Self {
        Self {
            start: Some(start),
            stop: Some(stop),
            step: 1,
            length: None,
        }
    }

    /// A single index as a one-element slice.
    pub const fn index(i: isize) -> Self {
        Self {
            start: Some(i),
            stop: if i == -1 { None } else { Some(i + 1) },
            step: 1,
            length: None,
        }
    }

    #[inline]
    pub fn start(&self) -> Option<isize> {
        self.start
    }

    #[inline]
    pub fn stop(&self) -> Option<isize> {
        self.stop
    }

    #[inline]
    pub fn step(&self) -> isize {
        self.step
    }

    /// Bound axis length, if any.
    #[inline]
    pub fn length(&self) -> Option<usize> {
        self.length
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.length.is_some()
    }

    /// Bind to an axis of length `n`, validating start and stop.
    pub fn set_length(&mut self, n: usize) -> Result<()> {
        resolve(self.start, self.stop, self.step, n)?;
        self.length = Some(n);
        Ok(())
    }

    /// Consuming form of [`set_length`](Self::set_length).
    pub fn bind(mut self, n: usize) -> Result<Self> {
        self.set_length(n)?;
        Ok(self)
    }

    /// Replace the start; checked against the bound length if there is one.
    pub fn set_start(&mut self, start: Option<isize>) -> Result<()> {
        if let Some(n) = self.length {
            resolve(start, self.stop, self.step, n)?;
        }
        self.start = start;
        Ok(())
    }

    /// Replace the stop; checked against the bound length if there is one.
    pub fn set_stop(&mut self, stop: Option<isize>) -> Result<()> {
        if let Some(n) = self.length {
            resolve(self.start, stop, self.step, n)?;
        }
        self.stop = stop;
        Ok(())
    }

    /// Absolute `(start, end)` of the walk; `end` is exclusive and may be
    /// `-1` for backward slices reaching index 0.
    pub fn resolved(&self) -> Result<(isize, isize)> {
        match self.length {
            Some(n) => resolve(self.start, self.stop, self.step, n),
            None => match (self.start, self.stop) {
                (Some(s), Some(e)) if s >= 0 && e >= 0 => {
                    check_direction(s, e, self.step)?;
                    Ok((s, e))
                }
                (None, Some(e)) if e >= 0 && self.step > 0 => Ok((0, e)),
                _ => Err(DatasetError::InvalidArgument(format!(
                    "slice {self} needs a length to resolve"
                ))),
            },
        }
    }

    /// Number of positions visited.
    pub fn num_steps(&self) -> Result<usize> {
        let (start, end) = self.resolved()?;
        Ok(count_steps(start, end, self.step))
    }

    /// Whether the slice covers its whole axis.
    pub fn is_slice_complete(&self) -> bool {
        match self.length {
            None => self.start.is_none() && self.stop.is_none() && self.step.abs() == 1,
            Some(n) => self.num_steps().map(|k| k == n).unwrap_or(false),
        }
    }

    /// Positions visited, in walk order.
    pub fn positions(&self) -> Result<impl Iterator<Item = usize>> {
        let (start, end) = self.resolved()?;
        let step = self.step;
        let count = count_steps(start, end, step);
        Ok((0..count).map(move |k| (start + k as isize * step) as usize))
    }
}

/// Resolve `start`/`stop` against an axis of length `n`.
///
/// Starts must land inside the axis (or at its end for an empty forward
/// walk); stops are clamped to the axis.
fn resolve(start: Option<isize>, stop: Option<isize>, step: isize, n: usize) -> Result<(isize, isize)> {
    let len = n as isize;
    let wrap = |v: isize| if v < 0 { v + len } else { v };
    let out_of_range = |v: isize| DatasetError::IndexOutOfRange {
        index: v.max(0) as usize,
        len: n,
    };
    let (s, e) = if step > 0 {
        let s = match start {
            None => 0,
            Some(v) => {
                let w = wrap(v);
                if w < 0 || w > len {
                    return Err(out_of_range(v));
                }
                w
            }
        };
        let e = stop.map(|v| wrap(v).clamp(0, len)).unwrap_or(len);
        (s, e)
    } else {
        let s = match start {
            None => len - 1,
            Some(v) => {
                let w = wrap(v);
                if w < 0 || w >= len {
                    return Err(out_of_range(v));
                }
                w
            }
        };
        let e = stop.map(|v| wrap(v).clamp(-1, len - 1)).unwrap_or(-1);
        (s, e)
    };
    check_direction(s, e, step)?;
    Ok((s, e))
}

fn check_direction(start: isize, end: isize, step: isize) -> Result<()> {
    if (step > 0 && start > end) || (step < 0 && start < end) {
        return Err(DatasetError::InvalidArgument(format!(
            "slice {start}:{end}:{step} runs against its step"
        )));
    }
    Ok(())
}

/// `floor((end - start - sign(step)) / step) + 1`, or zero for an empty walk.
fn count_steps(start: isize, end: isize, step: isize) -> usize {
    if (step > 0 && start >= end) || (step < 0 && start <= end) {
        return 0;
    }
    ((end - start - step.signum()) / step + 1) as usize
}

// ============================================================================
// Text form
// ============================================================================

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(s) = self.start {
            write!(f, "{s}")?;
        }
        f.write_str(":")?;
        if let Some(e) = self.stop {
            write!(f, "{e}")?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}

impl FromStr for Slice {
    type Err = DatasetError;

    /// Parse `"start:stop:step"`; any part may be empty, and a lone integer
    /// selects a single index.
    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| -> Result<Option<isize>> {
            let part = part.trim();
            if part.is_empty() {
                return Ok(None);
            }
            part.parse::<isize>()
                .map(Some)
                .map_err(|_| DatasetError::InvalidArgument(format!("bad slice component {part:?}")))
        };
        let parts: Vec<&str> = s.split(':').collect();
        match parts.as_slice() {
            [single] => match parse(single)? {
                Some(i) => Ok(Slice::index(i)),
                None => Ok(Slice::full()),
            },
            [start, stop] => Slice::new(parse(start)?, parse(stop)?, 1),
            [start, stop, step] => Slice::new(parse(start)?, parse(stop)?, parse(step)?.unwrap_or(1)),
            _ => Err(DatasetError::InvalidArgument(format!("bad slice {s:?}"))),
        }
    }
}

// ============================================================================
// Multi-axis helpers
// ============================================================================

/// Bind one optional slice per axis to `shape`.
///
/// Missing or `None` entries become full-axis slices; more slices than axes
/// is a rank mismatch.
pub fn bind_slices(slices: &[Option<Slice>], shape: &[usize]) -> Result<Vec<Slice>> {
    if slices.len() > shape.len() {
        return Err(DatasetError::RankMismatch(slices.len(), shape.len()));
    }
    shape
        .iter()
        .enumerate()
        .map(|(i, &n)| {
            slices
                .get(i)
                .copied()
                .flatten()
                .unwrap_or_default()
                .bind(n)
        })
        .collect()
}

/// Split per-axis slices into parallel `start`, `stop`, `step` vectors.
///
/// Trailing unspecified axes are padded with full-axis values.
pub fn convert_from_slice(
    slices: &[Option<Slice>],
    shape: &[usize],
) -> Result<(Vec<usize>, Vec<isize>, Vec<isize>)> {
    let bound = bind_slices(slices, shape)?;
    let mut start = Vec::with_capacity(bound.len());
    let mut stop = Vec::with_capacity(bound.len());
    let mut step = Vec::with_capacity(bound.len());
    for s in &bound {
        let (a, b) = s.resolved()?;
        // an empty axis walked backwards resolves to start -1
        start.push(a.max(0) as usize);
        stop.push(b);
        step.push(s.step());
    }
    Ok((start, stop, step))
}

/// Build per-axis slices from optional `start`/`stop`/`step` arrays.
pub fn slices_from_bounds(
    rank: usize,
    start: Option<&[isize]>,
    stop: Option<&[isize]>,
    step: Option<&[isize]>,
) -> Result<Vec<Option<Slice>>> {
    for arr in [start, stop, step].into_iter().flatten() {
        if arr.len() != rank {
            return Err(DatasetError::RankMismatch(arr.len(), rank));
        }
    }
    (0..rank)
        .map(|i| {
            Slice::new(
                start.map(|s| s[i]),
                stop.map(|s| s[i]),
                step.map(|s| s[i]).unwrap_or(1),
            )
            .map(Some)
        })
        .collect()
}

/// Shape produced by applying bound slices.
pub fn slice_shape(bound: &[Slice]) -> Result<Vec<usize>> {
    bound.iter().map(|s| s.num_steps()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_step_rejected() {
        assert!(Slice::new(None, None, 0).is_err());
    }

    #[test]
    fn test_reverse_full_slice() {
        let mut s = Slice::new(None, None, -1).unwrap();
        s.set_length(5).unwrap();
        assert_eq!(s.num_steps().unwrap(), 5);
        assert_eq!(s.positions().unwrap().collect::<Vec<_>>(), vec![4, 3, 2, 1, 0]);
        assert!(s.is_slice_complete());
    }

    #[test]
    fn test_num_steps_formula() {
        let s = Slice::new(Some(1), Some(8), 3).unwrap().bind(10).unwrap();
        assert_eq!(s.num_steps().unwrap(), 3); // 1, 4, 7
        let s = Slice::new(Some(8), Some(1), -3).unwrap().bind(10).unwrap();
        assert_eq!(s.positions().unwrap().collect::<Vec<_>>(), vec![8, 5, 2]);
        let s = Slice::new(Some(2), Some(2), 1).unwrap().bind(10).unwrap();
        assert_eq!(s.num_steps().unwrap(), 0);
    }

    #[test]
    fn test_negative_bounds_resolve_at_bind_time() {
        let s = Slice::new(Some(-3), None, 1).unwrap();
        assert_eq!(s.start(), Some(-3));
        assert!(s.num_steps().is_err());
        let s = s.bind(10).unwrap();
        assert_eq!(s.resolved().unwrap(), (7, 10));
        assert_eq!(s.num_steps().unwrap(), 3);
    }

    #[test]
    fn test_stop_is_clamped() {
        let s = Slice::new(Some(2), Some(100), 1).unwrap().bind(5).unwrap();
        assert_eq!(s.resolved().unwrap(), (2, 5));
        let s = Slice::new(Some(3), Some(-100), -1).unwrap().bind(5).unwrap();
        assert_eq!(s.positions().unwrap().collect::<Vec<_>>(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_direction_must_match_step() {
        let mut s = Slice::new(Some(4), Some(1), 1).unwrap();
        assert!(matches!(s.set_length(5), Err(DatasetError::InvalidArgument(_))));
        let mut s = Slice::new(Some(1), Some(4), -1).unwrap();
        assert!(s.set_length(5).is_err());
    }

    #[test]
    fn test_start_out_of_range() {
        let mut s = Slice::new(Some(7), None, 1).unwrap();
        assert!(matches!(
            s.set_length(5),
            Err(DatasetError::IndexOutOfRange { .. })
        ));
        let mut s = Slice::new(Some(5), None, -1).unwrap();
        assert!(s.set_length(5).is_err());
    }

    #[test]
    fn test_binding_constrains_later_updates() {
        let mut s = Slice::full().bind(4).unwrap();
        assert!(s.set_start(Some(9)).is_err());
        assert_eq!(s.start(), None);
        s.set_start(Some(1)).unwrap();
        s.set_stop(Some(-1)).unwrap();
        assert_eq!(s.positions().unwrap().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_is_slice_complete() {
        assert!(Slice::full().is_slice_complete());
        assert!(!Slice::range(0, 3).is_slice_complete());
        assert!(Slice::range(0, 3).bind(3).unwrap().is_slice_complete());
        assert!(!Slice::new(None, None, 2).unwrap().bind(4).unwrap().is_slice_complete());
    }

    #[test]
    fn test_unbound_num_steps() {
        assert_eq!(Slice::range(2, 6).num_steps().unwrap(), 4);
        assert!(Slice::full().num_steps().is_err());
    }

    #[test]
    fn test_parse_and_display() {
        let s: Slice = "1:7:2".parse().unwrap();
        assert_eq!((s.start(), s.stop(), s.step()), (Some(1), Some(7), 2));
        assert_eq!(s.to_string(), "1:7:2");
        let s: Slice = "::-1".parse().unwrap();
        assert_eq!((s.start(), s.stop(), s.step()), (None, None, -1));
        assert_eq!(s.to_string(), ":-1".replacen(':', "::", 1));
        let s: Slice = "3".parse().unwrap();
        assert_eq!((s.start(), s.stop()), (Some(3), Some(4)));
        let s: Slice = "-1".parse().unwrap();
        assert_eq!((s.start(), s.stop()), (Some(-1), None));
        assert!("1:2:3:4".parse::<Slice>().is_err());
        assert!("a:2".parse::<Slice>().is_err());
        assert!("::0".parse::<Slice>().is_err());
    }

    #[test]
    fn test_convert_from_slice_pads_trailing_axes() {
        let (start, stop, step) =
            convert_from_slice(&[Some(Slice::range(1, 3))], &[4, 5, 6]).unwrap();
        assert_eq!(start, vec![1, 0, 0]);
        assert_eq!(stop, vec![3, 5, 6]);
        assert_eq!(step, vec![1, 1, 1]);

        let (start, stop, step) =
            convert_from_slice(&[None, Some(Slice::new(None, None, -2).unwrap())], &[4, 5])
                .unwrap();
        assert_eq!(start, vec![0, 4]);
        assert_eq!(stop, vec![4, -1]);
        assert_eq!(step, vec![1, -2]);
    }

    #[test]
    fn test_convert_from_slice_empty_axis_reversed() {
        let reversed = Some(Slice::new(None, None, -1).unwrap());
        let (start, stop, step) = convert_from_slice(&[reversed, None], &[0, 3]).unwrap();
        assert_eq!(start, vec![0, 0]);
        assert_eq!(stop, vec![-1, 3]);
        assert_eq!(step, vec![-1, 1]);
    }

    #[test]
    fn test_too_many_slices() {
        assert!(matches!(
            bind_slices(&[None, None, None], &[2, 2]),
            Err(DatasetError::RankMismatch(3, 2))
        ));
    }

    #[test]
    fn test_slices_from_bounds() {
        let slices = slices_from_bounds(2, Some(&[1, 0]), None, Some(&[1, 2])).unwrap();
        let bound = bind_slices(&slices, &[3, 5]).unwrap();
        assert_eq!(slice_shape(&bound).unwrap(), vec![2, 3]);
        assert!(slices_from_bounds(2, Some(&[1]), None, None).is_err());
    }
}
