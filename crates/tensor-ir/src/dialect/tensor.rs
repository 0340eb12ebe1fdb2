//! The `tensor` dialect: element-wise math, contractions and constants.

crate::dialect! {
    mod tensor {
        /// Constant tensor; `value` is `Attribute::Dense` or `Attribute::Resource`.
        fn constant() [value];
        /// Placeholder for an omitted optional operand.
        fn no_value();

        fn neg(operand);
        fn sqrt(operand);
        fn tanh(operand);
        fn erf(operand);
        fn relu(operand);
        fn reciprocal(operand);
        fn exp(operand);

        fn add(lhs, rhs);
        fn sub(lhs, rhs);
        fn mul(lhs, rhs);
        fn div(lhs, rhs);
        fn pow(base, exponent);
        fn matmul(lhs, rhs);

        /// Clamp to `[min, max]`; either bound may be `tensor.no_value`.
        fn clip(input, min, max);

        /// Mean over `axes` (an `Attribute::List` of `IntBits`).
        fn reduce_mean(input) [axes];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::DialectOp;
    use crate::types::{DenseElements, ElemType, TensorType};
    use crate::{Attribute, IrContext, Location, Span};

    #[test]
    fn constant_round_trip() {
        let mut ctx = IrContext::new();
        let loc = Location::new(ctx.paths.intern("t.onnx"), Span::default());
        let ty = ctx.types.intern(TensorType::ranked(ElemType::F32, &[]));
        let dense = DenseElements::scalar_f32(0.5);

        let c = constant(&mut ctx, loc, ty, dense.clone().into());
        let c2 = Constant::from_op(&ctx, c.op_ref()).expect("should match tensor.constant");
        assert_eq!(c, c2);
        assert_eq!(c.value(&ctx), Some(&Attribute::Dense(dense)));
        assert_eq!(ctx.value_ty(c.result(&ctx)), ty);
        assert!(Mul::from_op(&ctx, c.op_ref()).is_err());
    }

    #[test]
    fn full_names() {
        assert_eq!(Mul::FULL_NAME, "tensor.mul");
        assert_eq!(ReduceMean::FULL_NAME, "tensor.reduce_mean");
        assert_eq!(Matmul::OP_NAME, "matmul");
        assert_eq!(Pow::DIALECT_NAME, "tensor");
    }
}
