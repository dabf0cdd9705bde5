//! Types for Kestrel.
//!
//! `DataType` is an immutable value; every operation (substitution, literal fallback)
//! returns a new type and leaves the original intact.

#[macro_use] extern crate log;

pub mod ty;

pub use crate::ty::{DataType, FloatKind, Substitution};
