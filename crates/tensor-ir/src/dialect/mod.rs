//! Dialect definitions.

pub mod tensor;
