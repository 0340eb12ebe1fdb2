//! Commutative binary-operand matchers.
//!
//! Both matchers look at the two operands of a commutative operation and
//! accept either order. The first operand order is always tried first, so
//! when both assignments would succeed the producer of `b` wins.

use tensor_ir::{DialectOp, IrContext, ValueRef, is_constant_equal_to};
use tracing::trace;

use crate::producer::producer_of;

/// Match `{a, b}` as "a constant equal to `constant`" and "the result of a `K`".
///
/// Returns the `K` producer of whichever operand is not the constant.
/// The constant operand must be a dense `tensor.constant` whose every element
/// equals `constant`; externally stored (resource) constants never match.
pub fn match_const_and_op<K: DialectOp>(
    ctx: &IrContext,
    a: ValueRef,
    b: ValueRef,
    constant: f64,
) -> Option<K> {
    let matched = producer_of::<K>(ctx, b)
        .filter(|_| is_constant_equal_to(ctx, a, constant))
        .or_else(|| producer_of::<K>(ctx, a).filter(|_| is_constant_equal_to(ctx, b, constant)));
    if let Some(op) = matched {
        trace!(kind = K::FULL_NAME, %constant, op = %op.op_ref(), "matched constant and op");
    }
    matched
}

/// Match `{a, b}` as "exactly `target`" and "the result of a `K`".
///
/// Identity is by value reference, not by structural equality.
pub fn match_value_and_op<K: DialectOp>(
    ctx: &IrContext,
    a: ValueRef,
    b: ValueRef,
    target: ValueRef,
) -> Option<K> {
    let matched = producer_of::<K>(ctx, b)
        .filter(|_| a == target)
        .or_else(|| producer_of::<K>(ctx, a).filter(|_| b == target));
    if let Some(op) = matched {
        trace!(kind = K::FULL_NAME, %target, op = %op.op_ref(), "matched value and op");
    }
    matched
}
