//! Constant recognition.
//!
//! Answers "is this value a dense constant" and "does it equal a scalar"
//! without evaluating anything: only `tensor.constant` results carrying an
//! inline `Attribute::Dense` payload qualify.

use crate::context::IrContext;
use crate::dialect::tensor;
use crate::ops::DialectOp;
use crate::refs::ValueRef;
use crate::types::{Attribute, DenseElements};

/// The inline payload of `value` if it is a dense constant.
pub fn dense_constant(ctx: &IrContext, value: ValueRef) -> Option<&DenseElements> {
    let op = ctx.producer(value)?;
    let constant = tensor::Constant::from_op(ctx, op).ok()?;
    match constant.value(ctx)? {
        Attribute::Dense(dense) => Some(dense),
        _ => None,
    }
}

/// Whether `value` is produced by `tensor.constant` with a dense payload.
pub fn is_dense_constant(ctx: &IrContext, value: ValueRef) -> bool {
    dense_constant(ctx, value).is_some()
}

/// Whether `value` is a dense constant whose every element equals `scalar`.
///
/// Scalars and splats of any shape qualify, so the comparison is
/// broadcast-compatible. Empty tensors never qualify; NaN never compares equal.
pub fn is_constant_equal_to(ctx: &IrContext, value: ValueRef, scalar: f64) -> bool {
    dense_constant(ctx, value).is_some_and(|dense| {
        dense.num_elements() > 0 && dense.iter_f64().all(|element| element == scalar)
    })
}

/// The element value of a scalar or splat dense constant.
pub fn scalar_constant(ctx: &IrContext, value: ValueRef) -> Option<f64> {
    dense_constant(ctx, value)?.splat_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::symbol::Symbol;
    use crate::types::{ElemType, TensorType};
    use crate::{Location, Span};

    fn loc(ctx: &mut IrContext) -> Location {
        Location::new(ctx.paths.intern("const.onnx"), Span::new(0, 0))
    }

    #[test]
    fn scalar_and_splat_constants() {
        let mut ctx = IrContext::new();
        let loc = loc(&mut ctx);
        let mut b = GraphBuilder::new(&mut ctx, loc);
        let half = b.scalar_f32(0.5);
        let halves = b.splat_f32(&[2, 2], 0.5).unwrap();
        let mixed = b.constant_f32(&[2], &[0.5, 1.0]).unwrap();

        for v in [half, halves] {
            assert!(is_dense_constant(&ctx, v));
            assert!(is_constant_equal_to(&ctx, v, 0.5));
            assert!(!is_constant_equal_to(&ctx, v, 1.0));
            assert_eq!(scalar_constant(&ctx, v), Some(0.5));
        }
        assert!(is_dense_constant(&ctx, mixed));
        assert!(!is_constant_equal_to(&ctx, mixed, 0.5));
        assert_eq!(scalar_constant(&ctx, mixed), None);
    }

    #[test]
    fn integer_constants_compare_numerically() {
        let mut ctx = IrContext::new();
        let loc = loc(&mut ctx);
        let mut b = GraphBuilder::new(&mut ctx, loc);
        let two = b.constant(DenseElements::from_i64(&[3], &[2, 2, 2]).unwrap());
        assert!(is_constant_equal_to(&ctx, two, 2.0));
        assert!(!is_constant_equal_to(&ctx, two, 2.5));
    }

    #[test]
    fn empty_constant_equals_nothing() {
        let mut ctx = IrContext::new();
        let loc = loc(&mut ctx);
        let mut b = GraphBuilder::new(&mut ctx, loc);
        let empty = b.constant_f32(&[0], &[]).unwrap();
        assert!(is_dense_constant(&ctx, empty));
        assert!(!is_constant_equal_to(&ctx, empty, 0.0));
    }

    #[test]
    fn non_dense_values() {
        let mut ctx = IrContext::new();
        let loc = loc(&mut ctx);
        let ty = ctx.types.intern(TensorType::ranked(ElemType::F32, &[4]));
        let resource = tensor::constant(
            &mut ctx,
            loc,
            ty,
            Attribute::Resource(Symbol::new("weights_0")),
        );
        let resource = resource.result(&ctx);

        let mut b = GraphBuilder::new(&mut ctx, loc);
        let input = b.input(TensorType::ranked(ElemType::F32, &[4]));
        let tanh = b.tanh(input).result(b.ctx());

        for v in [resource, input, tanh] {
            assert!(!is_dense_constant(&ctx, v));
            assert!(!is_constant_equal_to(&ctx, v, 0.0));
        }
    }
}
