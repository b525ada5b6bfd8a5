//! Shared element-kind definitions for the sciset workspace.
//!
//! This crate holds the pieces every layer agrees on:
//!
//! - [`DType`]: the element-kind registry (codes, compound kinds, widening)
//! - [`Element`]: the scalar trait implemented by every buffer element type
//! - [`Scalar`]: the conversion currency between element kinds
//!
//! `sciset-view` builds datasets, iterators and slicing on top of these.

pub mod dtype;
pub mod element;

pub use dtype::{DType, DTypeError, ARRAY_MULTIPLIER, RGB_ITEM_SIZE};
pub use element::{convert, Element, Scalar};
