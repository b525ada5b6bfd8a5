//! Loosely typed input accepted by setters and compound coercion.

use num_complex::{Complex32, Complex64};

use crate::{DType, Scalar};

/// A typed numeric array handed over whole.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericArray {
    Bool(Vec<bool>),
    Int8(Vec<i8>),
    Int16(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
}

impl NumericArray {
    pub fn len(&self) -> usize {
        match self {
            NumericArray::Bool(v) => v.len(),
            NumericArray::Int8(v) => v.len(),
            NumericArray::Int16(v) => v.len(),
            NumericArray::Int32(v) => v.len(),
            NumericArray::Int64(v) => v.len(),
            NumericArray::Float32(v) => v.len(),
            NumericArray::Float64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            NumericArray::Bool(_) => DType::Bool,
            NumericArray::Int8(_) => DType::Int8,
            NumericArray::Int16(_) => DType::Int16,
            NumericArray::Int32(_) => DType::Int32,
            NumericArray::Int64(_) => DType::Int64,
            NumericArray::Float32(_) => DType::Float32,
            NumericArray::Float64(_) => DType::Float64,
        }
    }

    /// The `i`-th entry as a scalar.
    pub fn get(&self, i: usize) -> Option<Scalar> {
        match self {
            NumericArray::Bool(v) => v.get(i).map(|&b| Scalar::Bool(b)),
            NumericArray::Int8(v) => v.get(i).map(|&x| Scalar::Int(x.into())),
            NumericArray::Int16(v) => v.get(i).map(|&x| Scalar::Int(x.into())),
            NumericArray::Int32(v) => v.get(i).map(|&x| Scalar::Int(x.into())),
            NumericArray::Int64(v) => v.get(i).map(|&x| Scalar::Int(x)),
            NumericArray::Float32(v) => v.get(i).map(|&x| Scalar::Float(x.into())),
            NumericArray::Float64(v) => v.get(i).map(|&x| Scalar::Float(x)),
        }
    }
}

/// Input to setters and [`to_item`](crate::to_item).
///
/// Scalars broadcast across an item's slots, complex numbers fill a
/// `[re, im]` pair, sequences and arrays are laid out slot by slot.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Complex(Complex64),
    Sequence(Vec<Value>),
    Array(NumericArray),
}

impl Value {
    /// Whether coercion to a numeric item can succeed in principle.
    pub fn is_numeric(&self) -> bool {
        match self {
            Value::Scalar(s) => s.is_numeric(),
            Value::Complex(_) | Value::Array(_) => true,
            Value::Sequence(items) => items
                .iter()
                .all(|v| matches!(v, Value::Scalar(s) if s.is_numeric())),
        }
    }

    /// Whether any entry carries a fractional or complex value.
    pub fn is_floating(&self) -> bool {
        match self {
            Value::Scalar(s) => matches!(s, Scalar::Float(_)),
            Value::Complex(_) => true,
            Value::Sequence(items) => items.iter().any(Value::is_floating),
            Value::Array(a) => a.dtype().is_float(),
        }
    }

    /// Short description of the variant for error messages.
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(Scalar::Text(_)) => "text",
            Value::Scalar(_) => "scalar",
            Value::Complex(_) => "complex",
            Value::Sequence(_) => "sequence",
            Value::Array(_) => "array",
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(Scalar::Int(v as i64))
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, isize, u8, u16, u32);

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Scalar(Scalar::Float(v.into()))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(Scalar::Float(v))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Scalar(Scalar::Text(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Scalar(Scalar::Text(s))
    }
}

impl From<Complex64> for Value {
    fn from(c: Complex64) -> Self {
        Value::Complex(c)
    }
}

impl From<Complex32> for Value {
    fn from(c: Complex32) -> Self {
        Value::Complex(Complex64::new(c.re.into(), c.im.into()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<NumericArray> for Value {
    fn from(a: NumericArray) -> Self {
        Value::Array(a)
    }
}

macro_rules! impl_from_array {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<$t>> for Value {
                fn from(v: Vec<$t>) -> Self {
                    Value::Array(NumericArray::$variant(v))
                }
            }

            impl From<&[$t]> for Value {
                fn from(v: &[$t]) -> Self {
                    Value::Array(NumericArray::$variant(v.to_vec()))
                }
            }

            impl<const N: usize> From<[$t; N]> for Value {
                fn from(v: [$t; N]) -> Self {
                    Value::Array(NumericArray::$variant(v.to_vec()))
                }
            }
        )*
    };
}

impl_from_array!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);
