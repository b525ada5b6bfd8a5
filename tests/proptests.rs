//! Property-based tests for slicing, views and reshaping.

mod support;

use proptest::prelude::*;
use sciset::{Dataset, IndexIterator, Slice};
use support::counting;

// ============================================================================
// Strategies
// ============================================================================

/// Shape of rank 1..=3 with a `(start, step)` slice per axis.
fn sliced_shape() -> impl Strategy<Value = (Vec<usize>, Vec<(isize, isize)>)> {
    prop::collection::vec(1usize..6, 1..=3).prop_flat_map(|shape| {
        let axes: Vec<_> = shape
            .iter()
            .map(|&n| (0..n as isize, prop::sample::select(vec![1isize, 2, 3, -1, -2, -3])))
            .collect();
        (Just(shape), axes)
    })
}

fn to_slices(bounds: &[(isize, isize)]) -> Vec<Option<Slice>> {
    bounds
        .iter()
        .map(|&(start, step)| Some(Slice::new(Some(start), None, step).unwrap()))
        .collect()
}

/// Positions each slice visits on its axis.
fn axis_positions(shape: &[usize], bounds: &[(isize, isize)]) -> Vec<Vec<usize>> {
    shape
        .iter()
        .zip(bounds)
        .map(|(&n, &(start, step))| {
            let mut out = Vec::new();
            let mut i = start;
            while i >= 0 && i < n as isize {
                out.push(i as usize);
                i += step;
            }
            out
        })
        .collect()
}

/// Row-major flat indices of the cross product of `axes`.
fn gather_indices(shape: &[usize], axes: &[Vec<usize>]) -> Vec<usize> {
    let mut flat = vec![0usize];
    for (d, picks) in axes.iter().enumerate() {
        let stride: usize = shape[d + 1..].iter().product();
        flat = flat
            .iter()
            .flat_map(|&base| picks.iter().map(move |&p| base + p * stride))
            .collect();
    }
    flat
}

// ============================================================================
// Slicing
// ============================================================================

proptest! {
    /// A slice view reads the same values as gathering by hand.
    #[test]
    fn prop_slice_view_matches_gather((shape, bounds) in sliced_shape()) {
        let a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let v = a.get_slice_view(&to_slices(&bounds)).unwrap();
        let axes = axis_positions(&shape, &bounds);
        let expected: Vec<f64> = gather_indices(&shape, &axes)
            .into_iter()
            .map(|i| i as f64)
            .collect();
        let want_shape: Vec<usize> = axes.iter().map(Vec::len).collect();
        prop_assert_eq!(v.shape(), want_shape.as_slice());
        prop_assert_eq!(v.to_vec(), expected);
    }

    /// Slicing a view and slicing its contiguous copy agree.
    #[test]
    fn prop_view_of_view((shape, bounds) in sliced_shape()) {
        let a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let v = a.get_slice_view(&to_slices(&bounds)).unwrap();
        let reversed: Vec<Option<Slice>> = v
            .shape()
            .iter()
            .map(|_| Some(Slice::new(None, None, -1).unwrap()))
            .collect();
        let through_view = v.get_slice(&reversed).unwrap();
        let through_copy = v.copy().get_slice(&reversed).unwrap();
        prop_assert_eq!(through_view, through_copy);
    }

    /// Slice assignment touches exactly the selected items.
    #[test]
    fn prop_set_slice_touches_selection((shape, bounds) in sliced_shape()) {
        let mut a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        a.set_slice(-1.0, &to_slices(&bounds)).unwrap();
        let selected = gather_indices(&shape, &axis_positions(&shape, &bounds));
        for (i, v) in a.to_vec().into_iter().enumerate() {
            if selected.contains(&i) {
                prop_assert_eq!(v, -1.0);
            } else {
                prop_assert_eq!(v, i as f64);
            }
        }
    }

    /// The slice iterator visits what the view reads, in the same order.
    #[test]
    fn prop_slice_iterator_matches_view((shape, bounds) in sliced_shape()) {
        let a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let slices = to_slices(&bounds);
        let offsets: Vec<usize> = a.slice_iterator(&slices).unwrap().offsets().collect();
        let via_view: Vec<usize> = a.get_slice_view(&slices).unwrap().to_vec()
            .into_iter()
            .map(|v| v as usize)
            .collect();
        prop_assert_eq!(offsets, via_view);
    }
}

// ============================================================================
// Layout changes
// ============================================================================

proptest! {
    /// Reversing the axes twice is the identity.
    #[test]
    fn prop_double_transpose(shape in prop::collection::vec(1usize..5, 1..=4)) {
        let a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let t = a.get_transposed_view(&[]).unwrap();
        let back = t.get_transposed_view(&[]).unwrap();
        prop_assert_eq!(back, a);
    }

    /// Reshaping keeps the row-major sequence of a transposed view.
    #[test]
    fn prop_set_shape_keeps_order(shape in prop::collection::vec(1usize..5, 2..=3)) {
        let a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let mut t = a.get_transposed_view(&[]).unwrap();
        let before = t.to_vec();
        let n = t.size();
        t.set_shape(&[n]).unwrap();
        prop_assert_eq!(t.to_vec(), before);
        prop_assert!(t.is_contiguous());
    }

    /// Extensible writes never disturb existing items.
    #[test]
    fn prop_set_extend_preserves(
        shape in prop::collection::vec(1usize..4, 1..=3),
        grow in prop::collection::vec(0usize..4, 3),
    ) {
        let mut a = Dataset::from_vec(counting(&shape), &shape).unwrap();
        let target: Vec<usize> = shape.iter().zip(&grow).map(|(&d, &g)| d - 1 + g).collect();
        a.set_extend(&target, -1.0).unwrap();
        let mut pos = vec![0usize; shape.len()];
        for flat in 0..shape.iter().product::<usize>() {
            let mut rem = flat;
            for d in (0..shape.len()).rev() {
                pos[d] = rem % shape[d];
                rem /= shape[d];
            }
            if pos != target {
                prop_assert_eq!(a.get(&pos).unwrap(), flat as f64);
            }
        }
        prop_assert_eq!(a.get(&target).unwrap(), -1.0);
    }
}
