//! Graph construction helpers.
//!
//! `GraphBuilder` creates graph inputs, constants and `tensor` operations at
//! a fixed location. It does no shape inference: element-wise ops take the
//! type of their first operand.

use derive_more::{Display, Error, From};
use tracing::debug;

use crate::context::IrContext;
use crate::dialect::tensor;
use crate::location::Location;
use crate::ops::DialectOp;
use crate::refs::{TypeRef, ValueRef};
use crate::types::{
    Attribute, AttributeError, DenseElements, ElemType, TensorType, TypeData,
};

/// Error raised while building graph nodes.
#[derive(Clone, Debug, Display, Error, From, PartialEq)]
pub enum BuildError {
    #[display("invalid constant: {_0}")]
    #[from]
    Attribute(AttributeError),
    #[display("axis {axis} is out of range for rank {rank}")]
    AxisOutOfRange { axis: i64, rank: usize },
    #[display("`{op}` expects a tensor operand")]
    NotATensor { op: &'static str },
}

/// Whether `value` is the absent-value placeholder (`tensor.no_value`).
pub fn is_none_value(ctx: &IrContext, value: ValueRef) -> bool {
    ctx.producer(value)
        .is_some_and(|op| tensor::NoValue::matches(ctx, op))
}

macro_rules! unary_ops {
    ($($name:ident => $wrapper:ident),* $(,)?) => {
        $(
            pub fn $name(&mut self, operand: ValueRef) -> tensor::$wrapper {
                let ty = self.ctx.value_ty(operand);
                tensor::$name(self.ctx, self.location, operand, ty)
            }
        )*
    };
}

macro_rules! binary_ops {
    ($($name:ident => $wrapper:ident),* $(,)?) => {
        $(
            pub fn $name(&mut self, lhs: ValueRef, rhs: ValueRef) -> tensor::$wrapper {
                let ty = self.ctx.value_ty(lhs);
                tensor::$name(self.ctx, self.location, lhs, rhs, ty)
            }
        )*
    };
}

pub struct GraphBuilder<'a> {
    ctx: &'a mut IrContext,
    location: Location,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(ctx: &'a mut IrContext, location: Location) -> Self {
        Self { ctx, location }
    }

    pub fn ctx(&self) -> &IrContext {
        self.ctx
    }

    /// Location attached to subsequently created operations.
    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn tensor_type(&mut self, ty: TensorType) -> TypeRef {
        self.ctx.types.intern(ty)
    }

    /// Declare a graph input.
    pub fn input(&mut self, ty: TensorType) -> ValueRef {
        let ty = self.tensor_type(ty);
        self.ctx.add_graph_input(ty)
    }

    // ========================================================================
    // Constants
    // ========================================================================

    /// Materialise `dense` as a `tensor.constant`.
    pub fn constant(&mut self, dense: DenseElements) -> ValueRef {
        debug!(
            elem = %dense.elem(),
            shape = ?dense.shape(),
            elements = dense.num_elements(),
            "materialising dense constant"
        );
        let ty = self.tensor_type(TensorType::ranked(dense.elem(), dense.shape()));
        tensor::constant(self.ctx, self.location, ty, Attribute::Dense(dense)).result(self.ctx)
    }

    pub fn constant_f32(&mut self, shape: &[i64], values: &[f32]) -> Result<ValueRef, BuildError> {
        Ok(self.constant(DenseElements::from_f32(shape, values)?))
    }

    pub fn constant_f64(&mut self, shape: &[i64], values: &[f64]) -> Result<ValueRef, BuildError> {
        Ok(self.constant(DenseElements::from_f64(shape, values)?))
    }

    pub fn splat_f32(&mut self, shape: &[i64], value: f32) -> Result<ValueRef, BuildError> {
        let dense = DenseElements::splat(ElemType::F32, shape, f64::from(value))?;
        Ok(self.constant(dense))
    }

    /// A rank-0 `f32` constant.
    pub fn scalar_f32(&mut self, value: f32) -> ValueRef {
        self.constant(DenseElements::scalar_f32(value))
    }

    /// The absent-value placeholder for an omitted optional operand.
    pub fn no_value(&mut self) -> ValueRef {
        let ty = self.ctx.types.intern(TypeData::None);
        tensor::no_value(self.ctx, self.location, ty).result(self.ctx)
    }

    // ========================================================================
    // Operations
    // ========================================================================

    unary_ops! {
        neg => Neg,
        sqrt => Sqrt,
        tanh => Tanh,
        erf => Erf,
        relu => Relu,
        reciprocal => Reciprocal,
        exp => Exp,
    }

    binary_ops! {
        add => Add,
        sub => Sub,
        mul => Mul,
        div => Div,
        pow => Pow,
        matmul => Matmul,
    }

    /// Clamp `input` to `[min, max]`. Pass [`no_value`](Self::no_value) for
    /// an unbounded side.
    pub fn clip(&mut self, input: ValueRef, min: ValueRef, max: ValueRef) -> tensor::Clip {
        let ty = self.ctx.value_ty(input);
        tensor::clip(self.ctx, self.location, input, min, max, ty)
    }

    /// Mean over `axes`, keeping reduced dimensions with extent 1.
    ///
    /// Negative axes count from the back. Axes are validated only when the
    /// input is ranked.
    pub fn reduce_mean(
        &mut self,
        input: ValueRef,
        axes: &[i64],
    ) -> Result<tensor::ReduceMean, BuildError> {
        let input_ty = self.ctx.value_type_data(input).as_tensor().cloned();
        let result_ty = match input_ty {
            Some(TensorType {
                elem,
                shape: Some(mut shape),
            }) => {
                let rank = shape.len();
                for &axis in axes {
                    let normalized = if axis < 0 { axis + rank as i64 } else { axis };
                    if normalized < 0 || normalized >= rank as i64 {
                        return Err(BuildError::AxisOutOfRange { axis, rank });
                    }
                    shape[normalized as usize] = 1;
                }
                TensorType {
                    elem,
                    shape: Some(shape),
                }
            }
            Some(unranked) => unranked,
            None => {
                return Err(BuildError::NotATensor {
                    op: tensor::ReduceMean::FULL_NAME,
                });
            }
        };
        let ty = self.tensor_type(result_ty);
        let axes = Attribute::List(axes.iter().map(|&a| Attribute::from(a)).collect());
        Ok(tensor::reduce_mean(self.ctx, self.location, input, ty, axes))
    }
}
