//! Coercion of loose values into fixed-width items.
//!
//! An item of a dataset with item size `n` is `n` consecutive slots. The
//! functions here turn a [`Value`] into exactly `n` slots of one element
//! kind:
//!
//! | input                 | result                                  |
//! |-----------------------|-----------------------------------------|
//! | scalar                | broadcast into every slot               |
//! | complex               | `[re]` or `[re, im]`; wider items fail  |
//! | sequence of numbers   | copied, zero-padded or truncated        |
//! | typed numeric array   | converted, zero-padded or truncated     |
//!
//! Text and nested sequences fail with [`DatasetError::NotNumeric`]. Text
//! is accepted only by textual element kinds.

use crate::value::Value;
use crate::{DatasetError, Element, Result};

/// Coerce `value` into one item of `item_size` slots.
pub fn to_item<T: Element>(value: &Value, item_size: usize) -> Result<Vec<T>> {
    let not_numeric = || DatasetError::NotNumeric(format!("{} value {value:?}", value.kind()));
    match value {
        Value::Scalar(s) => {
            let v = T::from_scalar(s).ok_or_else(not_numeric)?;
            Ok(vec![v; item_size])
        }
        Value::Complex(c) => {
            if item_size > 2 {
                return Err(DatasetError::InvalidArgument(format!(
                    "complex value cannot fill an item of {item_size} elements"
                )));
            }
            Ok([c.re, c.im]
                .iter()
                .take(item_size)
                .map(|&x| T::from_f64(x))
                .collect())
        }
        Value::Sequence(items) => {
            let mut out = Vec::with_capacity(item_size);
            for item in items.iter().take(item_size) {
                match item {
                    Value::Scalar(s) => out.push(T::from_scalar(s).ok_or_else(not_numeric)?),
                    _ => return Err(not_numeric()),
                }
            }
            out.resize(item_size, T::zero());
            Ok(out)
        }
        Value::Array(a) => {
            let n = a.len().min(item_size);
            let mut out = Vec::with_capacity(item_size);
            for i in 0..n {
                let s = a.get(i).ok_or_else(not_numeric)?;
                out.push(T::from_scalar(&s).ok_or_else(not_numeric)?);
            }
            out.resize(item_size, T::zero());
            Ok(out)
        }
    }
}

macro_rules! named_coercions {
    ($($name:ident => $t:ty),* $(,)?) => {
        $(
            #[doc = concat!("[`to_item`] into `", stringify!($t), "` slots.")]
            pub fn $name(value: &Value, item_size: usize) -> Result<Vec<$t>> {
                to_item::<$t>(value, item_size)
            }
        )*
    };
}

named_coercions!(
    to_double_array => f64,
    to_float_array => f32,
    to_long_array => i64,
    to_int_array => i32,
    to_short_array => i16,
    to_byte_array => i8,
    to_boolean_array => bool,
);
