//! Shape arithmetic: sizes, row-major strides, position-to-offset mapping.

use crate::{DatasetError, Result};

// ============================================================================
// Sizes and strides
// ============================================================================

/// Number of items described by `shape`.
///
/// Rank-0 shapes hold a single item; any zero dimension gives zero.
///
/// # Panics
/// Panics with "allocation too large" if the product overflows `usize`.
pub fn calc_size(shape: &[usize]) -> usize {
    shape
        .iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .unwrap_or_else(|| panic!("allocation too large: shape {shape:?} overflows usize"))
}

/// Compute row-major strides (C default: last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Row-major strides in scalar slots for items of `isize` slots.
pub fn item_strides(dims: &[usize], isize: usize) -> Vec<isize> {
    row_major_strides(dims)
        .into_iter()
        .map(|s| s * isize as isize)
        .collect()
}

/// Whether `strides` walk `dims` in plain row-major order for `isize`-wide items.
///
/// Size-1 dimensions never affect contiguity.
pub fn is_row_major(dims: &[usize], strides: &[isize], isize: usize) -> bool {
    let mut expected = isize as isize;
    for (&d, &s) in dims.iter().zip(strides.iter()).rev() {
        if d != 1 && s != expected {
            return false;
        }
        expected *= d as isize;
    }
    true
}

// ============================================================================
// Positions and axes
// ============================================================================

/// Map a possibly negative axis into `[0, rank)`.
pub fn check_axis(rank: usize, axis: isize) -> Result<usize> {
    let r = rank as isize;
    if axis < -r || axis >= r {
        return Err(DatasetError::AxisOutOfRange { axis, rank });
    }
    Ok(if axis < 0 { (axis + r) as usize } else { axis as usize })
}

/// Check `pos` has the right rank and lies within `shape`.
pub fn check_position(shape: &[usize], pos: &[usize]) -> Result<()> {
    if pos.len() != shape.len() {
        return Err(DatasetError::RankMismatch(pos.len(), shape.len()));
    }
    if !is_position_in_shape(shape, pos) {
        return Err(DatasetError::PositionOutOfRange {
            pos: pos.to_vec(),
            shape: shape.to_vec(),
        });
    }
    Ok(())
}

/// Whether every component of `pos` is below the matching dimension.
pub fn is_position_in_shape(shape: &[usize], pos: &[usize]) -> bool {
    pos.len() == shape.len() && pos.iter().zip(shape).all(|(&p, &d)| p < d)
}

/// Row-major flat offset of `pos` within `shape`, scaled by `isize`.
pub fn get_1d_index(shape: &[usize], pos: &[usize], isize: usize) -> Result<usize> {
    check_position(shape, pos)?;
    let mut idx = 0usize;
    let mut mult = isize;
    for (&p, &d) in pos.iter().zip(shape).rev() {
        idx += p * mult;
        mult *= d;
    }
    Ok(idx)
}

/// Absolute offset of `pos` under an explicit stride/offset layout.
///
/// The position must already be validated against the shape.
#[inline]
pub fn strided_offset(pos: &[usize], strides: &[isize], offset: isize) -> usize {
    let mut idx = offset;
    for (&p, &s) in pos.iter().zip(strides) {
        idx += p as isize * s;
    }
    idx as usize
}

/// Row-major position of the `n`-th item of `shape`, written into `pos`.
pub fn position_of_flat(shape: &[usize], mut n: usize, pos: &mut [usize]) {
    for (p, &d) in pos.iter_mut().zip(shape).rev() {
        if d == 0 {
            *p = 0;
            continue;
        }
        *p = n % d;
        n /= d;
    }
}

/// Drop size-one dimensions.
pub fn squeeze_shape(shape: &[usize]) -> Vec<usize> {
    shape.iter().copied().filter(|&d| d != 1).collect()
}

// ============================================================================
// Compatibility
// ============================================================================

/// Check two shapes hold the same number of items.
///
/// Shapes themselves may differ: `[2, 3]` pairs with `[6]` in flattened
/// row-major order.
pub fn check_compatibility(a: &[usize], b: &[usize]) -> Result<()> {
    if calc_size(a) != calc_size(b) {
        return Err(DatasetError::ShapeMismatch(a.to_vec(), b.to_vec()));
    }
    Ok(())
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Validate that all accessed offsets stay within `[0, len)`.
///
/// `item` is the number of consecutive slots read at each offset.
pub fn validate_bounds(
    len: usize,
    dims: &[usize],
    strides: &[isize],
    offset: isize,
    item: usize,
) -> Result<()> {
    if dims.len() != strides.len() {
        return Err(DatasetError::StrideLengthMismatch);
    }
    // Empty array - no access needed
    if dims.iter().any(|&d| d == 0) {
        return Ok(());
    }
    let mut min_offset = offset;
    let mut max_offset = offset;
    for (&dim, &stride) in dims.iter().zip(strides.iter()) {
        if dim > 1 {
            let end = stride
                .checked_mul(dim as isize - 1)
                .ok_or(DatasetError::OffsetOverflow)?;
            if end >= 0 {
                max_offset = max_offset
                    .checked_add(end)
                    .ok_or(DatasetError::OffsetOverflow)?;
            } else {
                min_offset = min_offset
                    .checked_add(end)
                    .ok_or(DatasetError::OffsetOverflow)?;
            }
        }
    }
    if min_offset < 0 || max_offset < 0 {
        return Err(DatasetError::OffsetOverflow);
    }
    if max_offset as usize + item > len {
        return Err(DatasetError::OffsetOverflow);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calc_size() {
        assert_eq!(calc_size(&[2, 3, 4]), 24);
        assert_eq!(calc_size(&[2, 0, 4]), 0);
        assert_eq!(calc_size(&[]), 1);
    }

    #[test]
    #[should_panic(expected = "allocation too large")]
    fn test_calc_size_overflow() {
        calc_size(&[usize::MAX, 3]);
    }

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[3, 4]), vec![4, 1]);
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(item_strides(&[2, 3], 3), vec![9, 3]);
    }

    #[test]
    fn test_is_row_major() {
        assert!(is_row_major(&[2, 3], &[3, 1], 1));
        assert!(is_row_major(&[2, 3], &[6, 2], 2));
        assert!(is_row_major(&[1, 3], &[99, 1], 1));
        assert!(!is_row_major(&[2, 3], &[1, 2], 1));
    }

    #[test]
    fn test_check_axis() {
        assert_eq!(check_axis(3, 0).unwrap(), 0);
        assert_eq!(check_axis(3, -1).unwrap(), 2);
        assert_eq!(check_axis(3, -3).unwrap(), 0);
        assert!(check_axis(3, 3).is_err());
        assert!(check_axis(3, -4).is_err());
    }

    #[test]
    fn test_get_1d_index() {
        assert_eq!(get_1d_index(&[2, 3], &[1, 2], 1).unwrap(), 5);
        assert_eq!(get_1d_index(&[2, 3], &[1, 2], 2).unwrap(), 10);
        assert_eq!(get_1d_index(&[], &[], 1).unwrap(), 0);
        assert!(matches!(
            get_1d_index(&[2, 3], &[2, 0], 1),
            Err(DatasetError::PositionOutOfRange { .. })
        ));
        assert!(matches!(
            get_1d_index(&[2, 3], &[1], 1),
            Err(DatasetError::RankMismatch(1, 2))
        ));
    }

    #[test]
    fn test_position_of_flat() {
        let mut pos = [0; 3];
        position_of_flat(&[2, 3, 4], 23, &mut pos);
        assert_eq!(pos, [1, 2, 3]);
        position_of_flat(&[2, 3, 4], 5, &mut pos);
        assert_eq!(pos, [0, 1, 1]);
    }

    #[test]
    fn test_compatibility_by_size_only() {
        assert!(check_compatibility(&[2, 3], &[6]).is_ok());
        assert!(check_compatibility(&[2, 3], &[3, 2]).is_ok());
        assert!(check_compatibility(&[2, 3], &[2, 4]).is_err());
    }

    #[test]
    fn test_squeeze_shape() {
        assert_eq!(squeeze_shape(&[1, 3, 1, 2]), vec![3, 2]);
        assert_eq!(squeeze_shape(&[1, 1]), Vec::<usize>::new());
    }

    #[test]
    fn test_validate_bounds_ok() {
        assert!(validate_bounds(6, &[2, 3], &[3, 1], 0, 1).is_ok());
        assert!(validate_bounds(6, &[2, 3], &[1, 2], 0, 1).is_ok());
        assert!(validate_bounds(12, &[2, 3], &[6, 2], 0, 2).is_ok());
    }

    #[test]
    fn test_validate_bounds_out_of_range() {
        assert!(validate_bounds(5, &[2, 3], &[3, 1], 0, 1).is_err());
        assert!(validate_bounds(11, &[2, 3], &[6, 2], 0, 2).is_err());
    }

    #[test]
    fn test_validate_bounds_negative_stride() {
        assert!(validate_bounds(5, &[5], &[-1], 4, 1).is_ok());
        assert!(validate_bounds(5, &[5], &[-1], 3, 1).is_err());
    }

    #[test]
    fn test_validate_bounds_empty() {
        assert!(validate_bounds(0, &[0, 3], &[3, 1], 0, 1).is_ok());
    }
}
