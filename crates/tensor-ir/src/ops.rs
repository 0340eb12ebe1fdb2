//! Operation kinds.
//!
//! Provides the `DialectOp` trait and the `dialect!` macro for defining
//! typed operation wrappers over `OpRef`.

use derive_more::{Display, Error};

use crate::context::IrContext;
use crate::refs::OpRef;
use crate::symbol::Symbol;

/// Error when wrapping an `OpRef` as a dialect-specific type.
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// Operation name doesn't match expected dialect.operation.
    #[display("expected `{expected}`, found `{actual}`")]
    WrongOperation {
        expected: &'static str,
        actual: String,
    },
}

/// An operator family: the kind tag matchers dispatch on.
///
/// Implementors are `Copy` wrappers around an `OpRef` known to be of this
/// kind. `matches` is the classification used everywhere; the default
/// compares the operation's dialect and name.
pub trait DialectOp: Sized + Copy {
    const DIALECT_NAME: &'static str;
    const OP_NAME: &'static str;
    /// Canonical `dialect.op` name.
    const FULL_NAME: &'static str;

    fn from_op(ctx: &IrContext, op: OpRef) -> Result<Self, ConversionError>;
    fn op_ref(&self) -> OpRef;

    fn matches(ctx: &IrContext, op: OpRef) -> bool {
        ctx.op(op)
            .is(Symbol::new(Self::DIALECT_NAME), Symbol::new(Self::OP_NAME))
    }
}

/// Kind that every operation belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnyOp(OpRef);

impl DialectOp for AnyOp {
    const DIALECT_NAME: &'static str = "*";
    const OP_NAME: &'static str = "*";
    const FULL_NAME: &'static str = "*";

    fn from_op(_ctx: &IrContext, op: OpRef) -> Result<Self, ConversionError> {
        Ok(AnyOp(op))
    }

    fn op_ref(&self) -> OpRef {
        self.0
    }

    fn matches(_ctx: &IrContext, _op: OpRef) -> bool {
        true
    }
}

/// Define the operations of a dialect.
///
/// Every operation has a single result. For each `fn op(operands...) [attrs...];`
/// the macro emits:
/// - a `Copy` wrapper struct (`op` in UpperCamelCase) implementing [`DialectOp`],
/// - operand accessors by name, a `result` accessor and `Option<&Attribute>`
///   attribute accessors,
/// - a constructor `op(ctx, location, operands..., result_ty, attrs...)`.
///
/// # Example
/// ```
/// tensor_ir::dialect! {
///     mod demo {
///         /// Fused multiply-add.
///         fn fma(a, b, c);
///         fn literal() [value];
///     }
/// }
/// ```
#[macro_export]
macro_rules! dialect {
    (mod $dialect:ident {
        $(
            $(#[$meta:meta])*
            fn $op:ident ( $($operand:ident),* $(,)? ) $([ $($attr:ident),* $(,)? ])? ;
        )*
    }) => {
        #[allow(non_snake_case)]
        #[inline]
        pub fn DIALECT_NAME() -> $crate::Symbol {
            $crate::Symbol::new(stringify!($dialect))
        }

        $(
            $crate::paste::paste! {
                $(#[$meta])*
                #[derive(Clone, Copy, Debug, PartialEq, Eq)]
                pub struct [<$op:camel>]($crate::OpRef);

                impl $crate::ops::DialectOp for [<$op:camel>] {
                    const DIALECT_NAME: &'static str = stringify!($dialect);
                    const OP_NAME: &'static str = stringify!($op);
                    const FULL_NAME: &'static str =
                        concat!(stringify!($dialect), ".", stringify!($op));

                    fn from_op(
                        ctx: &$crate::IrContext,
                        op: $crate::OpRef,
                    ) -> Result<Self, $crate::ops::ConversionError> {
                        if !<Self as $crate::ops::DialectOp>::matches(ctx, op) {
                            return Err($crate::ops::ConversionError::WrongOperation {
                                expected: <Self as $crate::ops::DialectOp>::FULL_NAME,
                                actual: ctx.op(op).full_name(),
                            });
                        }
                        Ok(Self(op))
                    }

                    fn op_ref(&self) -> $crate::OpRef {
                        self.0
                    }
                }

                impl [<$op:camel>] {
                    pub fn op_ref(&self) -> $crate::OpRef {
                        self.0
                    }

                    pub fn result(&self, ctx: &$crate::IrContext) -> $crate::ValueRef {
                        ctx.op_result(self.0, 0)
                    }

                    $crate::dialect!(@operands 0usize; $($operand),*);

                    $($(
                        pub fn $attr<'a>(
                            &self,
                            ctx: &'a $crate::IrContext,
                        ) -> Option<&'a $crate::Attribute> {
                            ctx.op_attr(self.0, $crate::Symbol::new(stringify!($attr)))
                        }
                    )*)?
                }

                #[allow(clippy::too_many_arguments)]
                pub fn $op(
                    ctx: &mut $crate::IrContext,
                    location: $crate::Location,
                    $($operand: $crate::ValueRef,)*
                    result_ty: $crate::TypeRef,
                    $($($attr: $crate::Attribute,)*)?
                ) -> [<$op:camel>] {
                    let data = $crate::OperationDataBuilder::new(
                        location,
                        DIALECT_NAME(),
                        $crate::Symbol::new(stringify!($op)),
                    )
                    $(.operand($operand))*
                    .result(result_ty)
                    $($(.attr(stringify!($attr), $attr))*)?
                    .build(ctx);
                    [<$op:camel>](ctx.create_op(data))
                }
            }
        )*
    };

    (@operands $idx:expr; ) => {};
    (@operands $idx:expr; $first:ident $(, $rest:ident)*) => {
        pub fn $first(&self, ctx: &$crate::IrContext) -> $crate::ValueRef {
            ctx.op_operands(self.0)[$idx]
        }
        $crate::dialect!(@operands $idx + 1usize; $($rest),*);
    };
}
