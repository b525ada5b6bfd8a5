//! Scalar element kinds stored in dataset buffers.

use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use crate::dtype::DType;

/// A single scalar pulled out of (or pushed into) a buffer slot.
///
/// This is the common currency for conversions between element kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    /// Whether this scalar can take part in numeric coercion.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Scalar::Text(_))
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Scalar::Bool(b) => f64::from(u8::from(*b)),
            Scalar::Int(i) => *i as f64,
            Scalar::Float(f) => *f,
            Scalar::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// Element type of a dataset buffer.
///
/// One implementation per scalar kind; compound kinds reuse the scalar
/// implementation of their base with a larger item size.
pub trait Element: Clone + Debug + PartialEq + PartialOrd + Send + Sync + 'static {
    /// Scalar kind of this element type.
    const DTYPE: DType;

    /// Bytes occupied by one slot.
    const BYTES: usize = std::mem::size_of::<Self>();

    /// Value of a freshly allocated slot.
    fn zero() -> Self;

    /// Value of slots exposed by growing a buffer.
    fn fill_value() -> Self;

    fn to_f64(&self) -> f64;

    fn to_i64(&self) -> i64;

    fn to_bool(&self) -> bool;

    /// Narrowing conversion; floats are truncated toward zero and saturate.
    fn from_f64(v: f64) -> Self;

    fn from_i64(v: i64) -> Self;

    fn from_bool(v: bool) -> Self;

    /// Parse from text; only textual kinds accept it.
    fn from_text(_s: &str) -> Option<Self> {
        None
    }

    fn to_scalar(&self) -> Scalar;

    fn is_nan(&self) -> bool {
        false
    }

    fn format(&self) -> String;

    /// Feed a value-stable representation into `state`.
    fn hash_into<H: Hasher>(&self, state: &mut H);

    /// Convert a scalar, failing only for non-numeric input.
    fn from_scalar(s: &Scalar) -> Option<Self> {
        match s {
            Scalar::Bool(b) => Some(Self::from_bool(*b)),
            Scalar::Int(i) => Some(Self::from_i64(*i)),
            Scalar::Float(f) => Some(Self::from_f64(*f)),
            Scalar::Text(t) => Self::from_text(t),
        }
    }
}

/// Convert one element kind into another.
///
/// Integer and boolean sources go through `i64` so wide integers survive;
/// everything else goes through `f64`.
pub fn convert<U: Element, T: Element>(v: &U) -> T {
    match v.to_scalar() {
        Scalar::Bool(b) => T::from_bool(b),
        Scalar::Int(i) => T::from_i64(i),
        Scalar::Float(f) => T::from_f64(f),
        Scalar::Text(s) => T::from_text(&s).unwrap_or_else(|| T::from_f64(v.to_f64())),
    }
}

macro_rules! impl_integer_element {
    ($($t:ty => $dtype:expr),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = $dtype;

                #[inline]
                fn zero() -> Self {
                    0
                }

                #[inline]
                fn fill_value() -> Self {
                    <$t>::MIN
                }

                #[inline]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }

                #[inline]
                fn to_i64(&self) -> i64 {
                    *self as i64
                }

                #[inline]
                fn to_bool(&self) -> bool {
                    *self != 0
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                #[inline]
                fn from_i64(v: i64) -> Self {
                    v as $t
                }

                #[inline]
                fn from_bool(v: bool) -> Self {
                    <$t>::from(v)
                }

                fn to_scalar(&self) -> Scalar {
                    Scalar::Int(*self as i64)
                }

                fn format(&self) -> String {
                    self.to_string()
                }

                fn hash_into<H: Hasher>(&self, state: &mut H) {
                    self.hash(state);
                }
            }
        )*
    };
}

impl_integer_element!(
    i8 => DType::Int8,
    i16 => DType::Int16,
    i32 => DType::Int32,
    i64 => DType::Int64,
);

macro_rules! impl_float_element {
    ($($t:ty => $dtype:expr),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = $dtype;

                #[inline]
                fn zero() -> Self {
                    0.0
                }

                #[inline]
                fn fill_value() -> Self {
                    <$t>::NAN
                }

                #[inline]
                fn to_f64(&self) -> f64 {
                    *self as f64
                }

                #[inline]
                fn to_i64(&self) -> i64 {
                    *self as i64
                }

                #[inline]
                fn to_bool(&self) -> bool {
                    *self != 0.0
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }

                #[inline]
                fn from_i64(v: i64) -> Self {
                    v as $t
                }

                #[inline]
                fn from_bool(v: bool) -> Self {
                    if v { 1.0 } else { 0.0 }
                }

                fn to_scalar(&self) -> Scalar {
                    Scalar::Float(*self as f64)
                }

                #[inline]
                fn is_nan(&self) -> bool {
                    <$t>::is_nan(*self)
                }

                fn format(&self) -> String {
                    self.to_string()
                }

                fn hash_into<H: Hasher>(&self, state: &mut H) {
                    // Fold -0.0 into 0.0 so equal values hash alike.
                    let v = if *self == 0.0 { 0.0 } else { *self };
                    v.to_bits().hash(state);
                }
            }
        )*
    };
}

impl_float_element!(f32 => DType::Float32, f64 => DType::Float64);

impl Element for bool {
    const DTYPE: DType = DType::Bool;

    fn zero() -> Self {
        false
    }

    fn fill_value() -> Self {
        false
    }

    fn to_f64(&self) -> f64 {
        f64::from(u8::from(*self))
    }

    fn to_i64(&self) -> i64 {
        i64::from(*self)
    }

    fn to_bool(&self) -> bool {
        *self
    }

    fn from_f64(v: f64) -> Self {
        v != 0.0
    }

    fn from_i64(v: i64) -> Self {
        v != 0
    }

    fn from_bool(v: bool) -> Self {
        v
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Bool(*self)
    }

    fn format(&self) -> String {
        self.to_string()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

impl Element for String {
    const DTYPE: DType = DType::String;

    fn zero() -> Self {
        String::new()
    }

    fn fill_value() -> Self {
        String::new()
    }

    fn to_f64(&self) -> f64 {
        self.trim().parse().unwrap_or(f64::NAN)
    }

    fn to_i64(&self) -> i64 {
        let t = self.trim();
        t.parse().unwrap_or_else(|_| self.to_f64() as i64)
    }

    fn to_bool(&self) -> bool {
        !self.is_empty()
    }

    fn from_f64(v: f64) -> Self {
        v.to_string()
    }

    fn from_i64(v: i64) -> Self {
        v.to_string()
    }

    fn from_bool(v: bool) -> Self {
        v.to_string()
    }

    fn from_text(s: &str) -> Option<Self> {
        Some(s.to_owned())
    }

    fn to_scalar(&self) -> Scalar {
        Scalar::Text(self.clone())
    }

    fn format(&self) -> String {
        self.clone()
    }

    fn hash_into<H: Hasher>(&self, state: &mut H) {
        self.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_element<T: Element>() {}

    #[test]
    fn test_standard_types() {
        assert_element::<bool>();
        assert_element::<i8>();
        assert_element::<i16>();
        assert_element::<i32>();
        assert_element::<i64>();
        assert_element::<f32>();
        assert_element::<f64>();
        assert_element::<String>();
    }

    #[test]
    fn test_fill_values() {
        assert!(f64::fill_value().is_nan());
        assert!(f32::fill_value().is_nan());
        assert_eq!(i8::fill_value(), i8::MIN);
        assert_eq!(i64::fill_value(), i64::MIN);
        assert!(!bool::fill_value());
        assert_eq!(i32::zero(), 0);
    }

    #[test]
    fn test_float_to_int_truncates_toward_zero() {
        assert_eq!(i32::from_f64(2.9), 2);
        assert_eq!(i32::from_f64(-2.9), -2);
        assert_eq!(i8::from_f64(1000.0), i8::MAX);
        assert_eq!(i16::from_f64(f64::NAN), 0);
    }

    #[test]
    fn test_convert_keeps_wide_integers() {
        let big = i64::MAX - 1;
        let back: i64 = convert::<i64, i64>(&big);
        assert_eq!(back, big);
        let f: f64 = convert::<i32, f64>(&7);
        assert_eq!(f, 7.0);
        let b: bool = convert::<f32, bool>(&0.5);
        assert!(b);
        let s: String = convert::<i16, String>(&-3);
        assert_eq!(s, "-3");
        let n: f64 = convert::<String, f64>(&"2.5".to_string());
        assert_eq!(n, 2.5);
    }

    #[test]
    fn test_from_scalar_rejects_text_for_numbers() {
        assert_eq!(f64::from_scalar(&Scalar::Int(3)), Some(3.0));
        assert_eq!(f64::from_scalar(&Scalar::Text("x".into())), None);
        assert_eq!(
            String::from_scalar(&Scalar::Text("x".into())),
            Some("x".to_string())
        );
    }

    #[test]
    fn test_bytes() {
        assert_eq!(<f64 as Element>::BYTES, 8);
        assert_eq!(<i16 as Element>::BYTES, 2);
        assert_eq!(<bool as Element>::BYTES, 1);
    }

    #[test]
    fn test_float_hash_ignores_sign_of_zero() {
        use std::collections::hash_map::DefaultHasher;
        let mut a = DefaultHasher::new();
        let mut b = DefaultHasher::new();
        0.0f64.hash_into(&mut a);
        (-0.0f64).hash_into(&mut b);
        assert_eq!(a.finish(), b.finish());
    }
}
