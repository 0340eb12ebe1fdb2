//! Operand pattern matching.

use tensor_ir::{DialectOp, IrContext, OpRef, ValueRef};

use crate::producer::producer_of;
use crate::query::operand_at;

/// Result of [`match_operand_at_binary`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BinaryOperands<K> {
    /// Producer of the tested operand.
    pub producer: K,
    /// Operand 0 of the matched operation.
    pub lhs: ValueRef,
    /// Operand 1 of the matched operation.
    pub rhs: ValueRef,
}

/// Match the operand of `op` at `index` against kind `K`.
///
/// Returns the typed producer and the operand itself.
///
/// # Panics
///
/// Panics if `index` is not below the arity of `op`.
#[track_caller]
pub fn match_operand_at<K: DialectOp>(
    ctx: &IrContext,
    op: OpRef,
    index: usize,
) -> Option<(K, ValueRef)> {
    let operand = operand_at(ctx, op, index);
    let producer = producer_of::<K>(ctx, operand)?;
    Some((producer, operand))
}

/// Match the operand of binary `op` at `index` against kind `K`, also
/// returning both operands of `op`.
///
/// The returned `lhs`/`rhs` are always operands 0 and 1 of `op`, whichever
/// `index` was tested; they are not "the matched operand and its sibling".
/// Only meaningful when `op` has exactly two operands.
///
/// # Panics
///
/// Panics if `index` is not below the arity of `op`, or if `op` has fewer
/// than two operands and the match succeeds.
#[track_caller]
pub fn match_operand_at_binary<K: DialectOp>(
    ctx: &IrContext,
    op: OpRef,
    index: usize,
) -> Option<BinaryOperands<K>> {
    let (producer, _) = match_operand_at::<K>(ctx, op, index)?;
    Some(BinaryOperands {
        producer,
        lhs: operand_at(ctx, op, 0),
        rhs: operand_at(ctx, op, 1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_ir::dialect::tensor;
    use tensor_ir::{AnyOp, ElemType, GraphBuilder, Location, Span, TensorType};

    fn div_of_input_by_sqrt() -> (IrContext, ValueRef, tensor::Sqrt, tensor::Div) {
        let mut ctx = IrContext::new();
        let loc = Location::new(ctx.paths.intern("operand.onnx"), Span::new(2, 8));
        let mut b = GraphBuilder::new(&mut ctx, loc);
        let x = b.input(TensorType::ranked(ElemType::F32, &[3]));
        let sqrt = b.sqrt(x);
        let div = b.div(x, sqrt.result(b.ctx()));
        (ctx, x, sqrt, div)
    }

    #[test]
    fn unary_form_matches_producer() {
        let (ctx, x, sqrt, div) = div_of_input_by_sqrt();

        assert_eq!(
            match_operand_at::<tensor::Sqrt>(&ctx, div.op_ref(), 1),
            Some((sqrt, sqrt.result(&ctx)))
        );
        assert_eq!(match_operand_at::<tensor::Tanh>(&ctx, div.op_ref(), 1), None);
        // Graph inputs have no producer.
        assert_eq!(match_operand_at::<AnyOp>(&ctx, div.op_ref(), 0), None);
        assert_eq!(match_operand_at::<tensor::Sqrt>(&ctx, sqrt.op_ref(), 0), None);
        assert_eq!(sqrt.operand(&ctx), x);
    }

    #[test]
    fn binary_form_returns_operands_in_position_order() {
        let (ctx, x, sqrt, div) = div_of_input_by_sqrt();

        let matched = match_operand_at_binary::<tensor::Sqrt>(&ctx, div.op_ref(), 1)
            .expect("operand 1 is produced by sqrt");
        assert_eq!(matched.producer, sqrt);
        assert_eq!(matched.lhs, x);
        assert_eq!(matched.rhs, sqrt.result(&ctx));

        assert_eq!(
            match_operand_at_binary::<tensor::Sqrt>(&ctx, div.op_ref(), 0),
            None
        );
    }

    #[test]
    #[should_panic(expected = "operand index 5 out of bounds")]
    fn unary_form_panics_on_bad_index() {
        let (ctx, _, _, div) = div_of_input_by_sqrt();
        match_operand_at::<tensor::Sqrt>(&ctx, div.op_ref(), 5);
    }

    #[test]
    #[should_panic(expected = "operand index 2 out of bounds")]
    fn binary_form_panics_on_bad_index() {
        let (ctx, _, _, div) = div_of_input_by_sqrt();
        match_operand_at_binary::<AnyOp>(&ctx, div.op_ref(), 2);
    }
}
