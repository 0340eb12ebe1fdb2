//! Arena-based tensor operation graph.
//!
//! The graph is a flat arena of operations and single-assignment values.
//! Every value is either a graph input or the result of exactly one
//! operation; `IrContext` records that definition when the value is
//! allocated and never changes it. Rewrite passes query the graph through
//! `&IrContext`.

pub mod builder;
pub mod constant;
pub mod context;
pub mod dialect;
pub mod location;
pub mod ops;
pub mod refs;
pub mod symbol;
pub mod types;

// Re-export paste for use in the `dialect!` macro
#[doc(hidden)]
pub use paste;

pub use builder::{BuildError, GraphBuilder, is_none_value};
pub use constant::{dense_constant, is_constant_equal_to, is_dense_constant, scalar_constant};
pub use context::{IrContext, OperationData, OperationDataBuilder, Use, ValueData};
pub use location::{Location, PathInterner, Span};
pub use ops::{AnyOp, ConversionError, DialectOp};
pub use refs::{OpRef, PathRef, TypeRef, ValueDef, ValueRef};
pub use symbol::Symbol;
pub use types::{
    Attribute, AttributeError, DYNAMIC_DIM, DenseElements, DensePayload, ElemType, TensorType,
    TypeData, TypeInterner,
};
