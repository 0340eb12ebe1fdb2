//! Diagnostic attribution for rewritten operations.

use tensor_ir::{DialectOp, IrContext, Location, OpRef, Symbol};

/// `base` tagged with the canonical name of kind `K`.
///
/// Operations created by a rewrite carry this so diagnostics point at the
/// operator that produced them. The result wraps `base`: an earlier tag
/// stays reachable through [`Location::inner`], and path and span are kept.
pub fn tag_location<K: DialectOp>(base: Location) -> Location {
    base.named(Symbol::new(K::FULL_NAME))
}

/// The location of `op`, tagged with kind `K`.
pub fn op_location<K: DialectOp>(ctx: &IrContext, op: OpRef) -> Location {
    tag_location::<K>(ctx.op(op).location)
}
