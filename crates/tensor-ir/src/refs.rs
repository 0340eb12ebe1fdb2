//! Entity references for the arena graph.
//!
//! Each ref type is a thin `u32` wrapper providing type-safe indexing
//! into `PrimaryMap` storage in `IrContext`.

use cranelift_entity::entity_impl;
use std::fmt;

/// Reference to an operation in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpRef(u32);
entity_impl!(OpRef, "op");

/// Reference to an SSA value in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueRef(u32);
entity_impl!(ValueRef, "v");

/// Reference to an interned value type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeRef(u32);
entity_impl!(TypeRef, "ty");

/// Reference to an interned source path.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathRef(u32);
entity_impl!(PathRef, "path");

/// Where a value is defined.
///
/// Fixed when the value is allocated, so every value has at most one
/// producer for the lifetime of the context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueDef {
    /// Result of an operation at the given index.
    OpResult(OpRef, u32),
    /// Graph input (function parameter) at the given position.
    GraphInput(u32),
}

impl ValueDef {
    /// The producing operation, or `None` for a graph input.
    pub fn producer(self) -> Option<OpRef> {
        match self {
            ValueDef::OpResult(op, _) => Some(op),
            ValueDef::GraphInput(_) => None,
        }
    }
}

impl fmt::Display for ValueDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueDef::OpResult(op, idx) => write!(f, "{}#{}", op, idx),
            ValueDef::GraphInput(idx) => write!(f, "input#{}", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cranelift_entity::EntityRef;

    #[test]
    fn entity_ref_display() {
        assert_eq!(format!("{}", OpRef::new(0)), "op0");
        assert_eq!(format!("{}", ValueRef::new(5)), "v5");
        assert_eq!(format!("{}", TypeRef::new(3)), "ty3");
        assert_eq!(format!("{}", PathRef::new(1)), "path1");
    }

    #[test]
    fn value_def_producer() {
        let op = OpRef::new(2);
        assert_eq!(ValueDef::OpResult(op, 1).producer(), Some(op));
        assert_eq!(ValueDef::GraphInput(0).producer(), None);
        assert_eq!(ValueDef::OpResult(op, 1).to_string(), "op2#1");
        assert_eq!(ValueDef::GraphInput(3).to_string(), "input#3");
    }
}
