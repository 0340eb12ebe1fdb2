//! Common graph fixtures for matcher tests.

use tensor_ir::{ElemType, GraphBuilder, IrContext, Location, Span, TensorType, ValueRef};

/// Install a test-writer subscriber filtered by `RUST_LOG`. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A fresh graph plus a location in `model.onnx`.
pub fn graph() -> (IrContext, Location) {
    init_tracing();
    let mut ctx = IrContext::new();
    let loc = Location::new(ctx.paths.intern("model.onnx"), Span::new(0, 64));
    (ctx, loc)
}

/// Declare an `f32` graph input of the given shape.
#[allow(dead_code)]
pub fn f32_input(b: &mut GraphBuilder<'_>, shape: &[i64]) -> ValueRef {
    b.input(TensorType::ranked(ElemType::F32, shape))
}
