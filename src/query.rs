//! Graph-query helpers shared by rewrite rules.

use tensor_ir::{IrContext, OpRef, TensorType, ValueRef};

pub use tensor_ir::{dense_constant, is_constant_equal_to, is_dense_constant, is_none_value};
pub use tensor_ir::scalar_constant;

/// The operation defining `value`, or `None` for a graph input.
pub fn producer(ctx: &IrContext, value: ValueRef) -> Option<OpRef> {
    ctx.producer(value)
}

/// The operand of `op` at `index`.
///
/// # Panics
///
/// Panics if `index` is not below the arity of `op`. An out-of-range index
/// is a defect in the calling rewrite rule, so this is checked in every
/// build profile.
#[track_caller]
pub fn operand_at(ctx: &IrContext, op: OpRef, index: usize) -> ValueRef {
    let operands = ctx.op_operands(op);
    assert!(
        index < operands.len(),
        "operand index {index} out of bounds for `{}` ({op}) with {} operand(s)",
        ctx.op(op).full_name(),
        operands.len(),
    );
    operands[index]
}

/// Whether exactly one operand slot in the graph reads `value`.
pub fn has_one_use(ctx: &IrContext, value: ValueRef) -> bool {
    ctx.uses(value).len() == 1
}

fn tensor_type(ctx: &IrContext, value: ValueRef) -> Option<&TensorType> {
    ctx.value_type_data(value).as_tensor()
}

/// Whether `value` is a ranked tensor.
pub fn has_shape_and_rank(ctx: &IrContext, value: ValueRef) -> bool {
    rank(ctx, value).is_some()
}

pub fn rank(ctx: &IrContext, value: ValueRef) -> Option<usize> {
    tensor_type(ctx, value)?.rank()
}

pub fn has_static_shape(ctx: &IrContext, value: ValueRef) -> bool {
    tensor_type(ctx, value).is_some_and(TensorType::has_static_shape)
}

/// Whether `value` is a rank-0 tensor or a rank-1 tensor of one element.
pub fn is_scalar_tensor(ctx: &IrContext, value: ValueRef) -> bool {
    match tensor_type(ctx, value).and_then(|t| t.shape.as_deref()) {
        Some([]) | Some([1]) => true,
        _ => false,
    }
}
