//! Structural pattern matching for tensor graph rewrite passes.
//!
//! Rewrite rules ask questions like "is this operand produced by a
//! `tensor.tanh`?" or "is this `tensor.mul` a multiplication of some
//! `tensor.pow` by the constant 0.5, in either operand order?". The functions
//! here answer them by inspecting at most one producer hop per operand.
//!
//! Operator kinds are type parameters implementing [`DialectOp`]; every
//! successful match hands back the typed producer wrapper. A failed match is
//! `None` (or `false`), never an error. Nothing here mutates the graph.
//!
//! ```
//! use tensor_ir::dialect::tensor;
//! use tensor_ir::{ElemType, GraphBuilder, IrContext, Location, Span, TensorType};
//! use tensor_match::match_const_and_op;
//!
//! let mut ctx = IrContext::new();
//! let loc = Location::new(ctx.paths.intern("model.onnx"), Span::default());
//! let mut b = GraphBuilder::new(&mut ctx, loc);
//! let x = b.input(TensorType::ranked(ElemType::F32, &[8]));
//! let tanh = b.tanh(x);
//! let half = b.scalar_f32(0.5);
//! let mul = b.mul(half, tanh.result(b.ctx()));
//!
//! let matched = match_const_and_op::<tensor::Tanh>(&ctx, mul.lhs(&ctx), mul.rhs(&ctx), 0.5);
//! assert_eq!(matched, Some(tanh));
//! ```

mod binary;
mod location;
mod operand;
mod producer;
pub mod query;

pub use binary::{match_const_and_op, match_value_and_op};
pub use location::{op_location, tag_location};
pub use operand::{BinaryOperands, match_operand_at, match_operand_at_binary};
pub use producer::{is_produced_by, match_pair, producer_of};
pub use tensor_ir::{AnyOp, DialectOp};
