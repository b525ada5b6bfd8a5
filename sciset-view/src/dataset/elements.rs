//! Slot-level access to compound items.

use super::Dataset;
use crate::shape::check_compatibility;
use crate::{convert, DType, DatasetError, Element, Result};

impl<T: Element> Dataset<T> {
    fn check_slot(&self, k: usize) -> Result<()> {
        if k >= self.isize {
            return Err(DatasetError::IndexOutOfRange {
                index: k,
                len: self.isize,
            });
        }
        Ok(())
    }

    /// Slot 0 of the item at `pos`, whatever the item width.
    pub fn get_first_value(&self, pos: &[usize]) -> Result<T> {
        self.get(pos)
    }

    /// Scalar view of slot `k` of every item, sharing this buffer.
    ///
    /// For complex data slot 0 is the real part and slot 1 the imaginary
    /// part; for RGB data the slots are the channels.
    pub fn get_elements_view(&self, k: usize) -> Result<Self> {
        self.check_slot(k)?;
        let (strides, offset) = self.layout();
        Ok(self.view_with(self.shape.clone(), strides, offset + k, 1, T::DTYPE))
    }

    /// Contiguous copy of slot `k` of every item.
    pub fn get_elements(&self, k: usize) -> Result<Self> {
        Ok(self.get_elements_view(k)?.copy())
    }

    /// Copy slot `k` of every item into the single-slot dataset `dest`.
    pub fn copy_elements(&self, dest: &mut Dataset<T>, k: usize) -> Result<()> {
        if dest.isize != 1 {
            return Err(DatasetError::InvalidArgument(
                "destination items must be single elements".into(),
            ));
        }
        check_compatibility(&self.shape, &dest.shape)?;
        let values = self.get_elements_view(k)?.to_vec();
        dest.write_all(&values)
    }

    /// Overwrite slot `k` of every item from the single-slot dataset `src`.
    pub fn set_elements(&mut self, src: &Dataset<T>, k: usize) -> Result<()> {
        self.check_slot(k)?;
        if src.isize != 1 {
            return Err(DatasetError::InvalidArgument(
                "source items must be single elements".into(),
            ));
        }
        check_compatibility(&self.shape, &src.shape)?;
        let values = src.to_vec();
        let offsets = self.offsets();
        self.modify(|d| {
            for (v, i) in values.into_iter().zip(offsets) {
                d[i + k] = v;
            }
        });
        Ok(())
    }

    /// Compound dataset of `isize`-slot items built from `src`.
    ///
    /// With `repeat`, every slot of an item takes the first slot of the
    /// source item. Otherwise the first `min(isize, src isize)` slots are
    /// copied and the rest are zero.
    pub fn compound_from<U: Element>(src: &Dataset<U>, repeat: bool, isize: usize) -> Result<Self> {
        let dtype = DType::compound(T::DTYPE, isize)?;
        let k = src.isize;
        let values = src.to_vec();
        let mut data = Vec::with_capacity(src.size * isize);
        for item in values.chunks_exact(k) {
            if repeat {
                let v: T = convert(&item[0]);
                data.extend(std::iter::repeat(v).take(isize));
            } else {
                for s in 0..isize {
                    data.push(item.get(s).map_or_else(T::zero, convert));
                }
            }
        }
        let mut out = Self::from_parts(
            crate::buffer::BackingStore::new(data),
            src.shape.clone(),
            isize,
            dtype,
        );
        out.name = src.name.clone();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    #[test]
    fn test_real_and_imaginary_parts() {
        let z = Dataset::<f64>::from_complex(
            &[Complex::new(1.0, -1.0), Complex::new(2.0, -2.0)],
            &[2],
        )
        .unwrap();
        assert_eq!(z.get_elements(0).unwrap().to_vec(), vec![1.0, 2.0]);
        assert_eq!(z.get_elements(1).unwrap().to_vec(), vec![-1.0, -2.0]);
        assert_eq!(z.get_elements(1).unwrap().dtype(), DType::Float64);
        assert!(z.get_elements(2).is_err());
        assert_eq!(z.get_first_value(&[1]).unwrap(), 2.0);
    }

    #[test]
    fn test_elements_view_writes_through() {
        let rgb = Dataset::<i16>::zeros_compound(3, &[2, 2])
            .unwrap()
            .with_dtype(DType::Rgb)
            .unwrap();
        let mut green = rgb.get_elements_view(1).unwrap();
        green.fill(255).unwrap();
        assert_eq!(rgb.get_item(&[1, 0]).unwrap(), vec![0, 255, 0]);
    }

    #[test]
    fn test_copy_and_set_elements() {
        let mut a = Dataset::from_vec_compound(vec![1, 2, 3, 4, 5, 6], 2, &[3]).unwrap();
        let mut dest = Dataset::<i32>::zeros(&[3]);
        a.copy_elements(&mut dest, 1).unwrap();
        assert_eq!(dest.to_vec(), vec![2, 4, 6]);

        let src = Dataset::from_vec(vec![-1, -2, -3], &[3]).unwrap();
        a.set_elements(&src, 0).unwrap();
        assert_eq!(a.to_vec(), vec![-1, 2, -2, 4, -3, 6]);

        let mut wrong = Dataset::<i32>::zeros(&[4]);
        assert!(a.copy_elements(&mut wrong, 0).is_err());
        assert!(a.set_elements(&src, 2).is_err());
    }

    #[test]
    fn test_compound_from_repeat() {
        let src = Dataset::from_vec(vec![1i32, 2], &[2]).unwrap();
        let c = Dataset::<f64>::compound_from(&src, true, 3).unwrap();
        assert_eq!(c.dtype(), DType::ArrayFloat64);
        assert_eq!(c.to_vec(), vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_compound_from_pads_and_truncates() {
        let src = Dataset::from_vec_compound(vec![1i8, 2, 3, 4], 2, &[2]).unwrap();
        let wide = Dataset::<i16>::compound_from(&src, false, 3).unwrap();
        assert_eq!(wide.to_vec(), vec![1, 2, 0, 3, 4, 0]);
        let narrow = Dataset::<i16>::compound_from(&src, false, 1).unwrap();
        assert_eq!(narrow.to_vec(), vec![1, 3]);
        assert_eq!(narrow.dtype(), DType::Int16);
    }

    #[test]
    fn test_compound_from_view() {
        let src = Dataset::from_vec(vec![1i64, 2, 3, 4], &[4]).unwrap();
        let rev = src
            .get_slice_view(&[Some(crate::Slice::new(None, None, -2).unwrap())])
            .unwrap();
        let c = Dataset::<i64>::compound_from(&rev, true, 2).unwrap();
        assert_eq!(c.to_vec(), vec![4, 4, 2, 2]);
    }
}
