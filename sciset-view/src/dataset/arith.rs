//! In-place element-wise arithmetic: `dest[i] op= rhs[i]`.
//!
//! Integer and boolean datasets compute in wrapping `i64`, where division
//! or remainder by zero yields 0. A fractional right-hand side makes them
//! compute in `f64` and narrow the result, non-finite results becoming 0.
//! Everything else computes in `f64` and follows IEEE rules. Complex datasets support addition and subtraction
//! only; a real right-hand side touches the real part.

use num_complex::{Complex32, Complex64};

use super::Dataset;
use crate::compound::to_item;
use crate::value::Value;
use crate::{convert, DatasetError, Element, Result};

/// Binary operation applied slot by slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BinaryOp {
    #[inline]
    pub fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
            BinaryOp::Divide => a / b,
            BinaryOp::Remainder => a % b,
        }
    }

    #[inline]
    pub fn apply_i64(self, a: i64, b: i64) -> i64 {
        match self {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Subtract => a.wrapping_sub(b),
            BinaryOp::Multiply => a.wrapping_mul(b),
            BinaryOp::Divide if b == 0 => 0,
            BinaryOp::Divide => a.wrapping_div(b),
            BinaryOp::Remainder if b == 0 => 0,
            BinaryOp::Remainder => a.wrapping_rem(b),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Subtract => "subtract",
            BinaryOp::Multiply => "multiply",
            BinaryOp::Divide => "divide",
            BinaryOp::Remainder => "remainder",
        }
    }
}

/// Right-hand side of an in-place operation.
#[derive(Debug)]
pub enum Operand<'a, T: Element> {
    /// One item broadcast over every position.
    Item(Value),
    /// Item-for-item partner of the same size.
    Dataset(&'a Dataset<T>),
}

impl<'a, T: Element> From<&'a Dataset<T>> for Operand<'a, T> {
    fn from(d: &'a Dataset<T>) -> Self {
        Operand::Dataset(d)
    }
}

impl<T: Element> From<Value> for Operand<'_, T> {
    fn from(v: Value) -> Self {
        Operand::Item(v)
    }
}

macro_rules! impl_item_operand {
    ($($t:ty),*) => {
        $(
            impl<T: Element> From<$t> for Operand<'_, T> {
                fn from(v: $t) -> Self {
                    Operand::Item(Value::from(v))
                }
            }
        )*
    };
}

impl_item_operand!(bool, i32, i64, f32, f64, Complex32, Complex64);

/// Right-hand slots after coercion: `values` holds `width` slots per item,
/// one item in total unless `per_item`.
struct Rhs<A> {
    values: Vec<A>,
    width: usize,
    per_item: bool,
}

impl<T: Element> Dataset<T> {
    /// Apply `op` in place against `rhs`.
    ///
    /// # Errors
    /// - `Unsupported` for text datasets, and for complex datasets under
    ///   anything but addition or subtraction
    /// - `ShapeMismatch` if a dataset operand holds a different number of
    ///   items
    /// - `InvalidArgument` if a dataset operand's items are neither as wide
    ///   as this dataset's nor single slots
    pub fn apply_in_place<'a>(&mut self, op: BinaryOp, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        let rhs = rhs.into();
        if !self.dtype.is_numeric() {
            return Err(DatasetError::Unsupported(format!(
                "{} on {} data",
                op.name(),
                self.dtype
            )));
        }
        if self.dtype.is_complex() && !matches!(op, BinaryOp::Add | BinaryOp::Subtract) {
            return Err(DatasetError::Unsupported(format!(
                "{} on complex data",
                op.name()
            )));
        }
        let integral = self.dtype.is_integer() || self.dtype.is_bool();
        let fractional = matches!(&rhs, Operand::Item(v) if v.is_floating());
        if integral && !fractional {
            let rhs = self.coerce_rhs::<i64>(&rhs)?;
            self.combine(&rhs, |a, b| T::from_i64(op.apply_i64(a.to_i64(), *b)));
        } else if integral {
            let rhs = self.coerce_rhs::<f64>(&rhs)?;
            self.combine(&rhs, |a, b| {
                let r = op.apply_f64(a.to_f64(), *b);
                T::from_f64(if r.is_finite() { r } else { 0.0 })
            });
        } else {
            let rhs = self.coerce_rhs::<f64>(&rhs)?;
            self.combine(&rhs, |a, b| T::from_f64(op.apply_f64(a.to_f64(), *b)));
        }
        Ok(())
    }

    pub fn iadd<'a>(&mut self, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        self.apply_in_place(BinaryOp::Add, rhs)
    }

    pub fn isubtract<'a>(&mut self, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        self.apply_in_place(BinaryOp::Subtract, rhs)
    }

    pub fn imultiply<'a>(&mut self, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        self.apply_in_place(BinaryOp::Multiply, rhs)
    }

    pub fn idivide<'a>(&mut self, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        self.apply_in_place(BinaryOp::Divide, rhs)
    }

    pub fn iremainder<'a>(&mut self, rhs: impl Into<Operand<'a, T>>) -> Result<()> {
        self.apply_in_place(BinaryOp::Remainder, rhs)
    }

    fn coerce_rhs<A: Element>(&self, rhs: &Operand<'_, T>) -> Result<Rhs<A>> {
        let n = self.isize;
        match rhs {
            Operand::Item(Value::Scalar(s)) if self.dtype.is_complex() => {
                let re = A::from_scalar(s)
                    .ok_or_else(|| DatasetError::NotNumeric(format!("{s:?}")))?;
                Ok(Rhs {
                    values: vec![re, A::zero()],
                    width: 2,
                    per_item: false,
                })
            }
            Operand::Item(v) => Ok(Rhs {
                values: to_item::<A>(v, n)?,
                width: n,
                per_item: false,
            }),
            Operand::Dataset(d) => {
                self.check_compatibility(d)?;
                let k = d.isize;
                if k != n && k != 1 {
                    return Err(DatasetError::InvalidArgument(format!(
                        "cannot combine items of {n} elements with items of {k}"
                    )));
                }
                Ok(Rhs {
                    values: d.to_vec().iter().map(convert).collect(),
                    width: k,
                    per_item: true,
                })
            }
        }
    }

    /// Write `f(dest slot, rhs slot)` into every slot.
    ///
    /// Single-slot right-hand items broadcast across the item, except on
    /// complex data where they pair with the real part only.
    fn combine<A>(&mut self, rhs: &Rhs<A>, f: impl Fn(&T, &A) -> T) {
        let n = self.isize;
        let real_only = self.dtype.is_complex() && rhs.width == 1;
        let offsets = self.offsets();
        self.modify(|d| {
            for (j, &i) in offsets.iter().enumerate() {
                let item = if rhs.per_item {
                    &rhs.values[j * rhs.width..(j + 1) * rhs.width]
                } else {
                    &rhs.values[..]
                };
                for s in 0..n {
                    let b = if rhs.width == n {
                        &item[s]
                    } else if real_only && s > 0 {
                        continue;
                    } else {
                        &item[0]
                    };
                    d[i + s] = f(&d[i + s], b);
                }
            }
        });
    }
}
