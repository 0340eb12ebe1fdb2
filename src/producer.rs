//! Producer classification.

use tensor_ir::{DialectOp, IrContext, ValueRef};

/// Whether `value` is the result of an operation of kind `K`.
///
/// Graph inputs have no producer and never match, not even [`AnyOp`](tensor_ir::AnyOp).
pub fn is_produced_by<K: DialectOp>(ctx: &IrContext, value: ValueRef) -> bool {
    ctx.producer(value).is_some_and(|op| K::matches(ctx, op))
}

/// The producer of `value` as a `K`, if it is one.
pub fn producer_of<K: DialectOp>(ctx: &IrContext, value: ValueRef) -> Option<K> {
    let op = ctx.producer(value)?;
    K::from_op(ctx, op).ok()
}

/// Match two operands of a commutative operation against kinds `A` and `B`
/// in either order.
///
/// Returns `(produced by A, produced by B)`: `(a, b)` if `a` comes from an
/// `A` and `b` from a `B`, otherwise `(b, a)` if the assignment holds the
/// other way round.
pub fn match_pair<A: DialectOp, B: DialectOp>(
    ctx: &IrContext,
    a: ValueRef,
    b: ValueRef,
) -> Option<(ValueRef, ValueRef)> {
    if is_produced_by::<A>(ctx, a) && is_produced_by::<B>(ctx, b) {
        Some((a, b))
    } else if is_produced_by::<B>(ctx, a) && is_produced_by::<A>(ctx, b) {
        Some((b, a))
    } else {
        None
    }
}
