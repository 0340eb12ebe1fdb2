//! IrContext: arena storage for a tensor operation graph.
//!
//! All graph entities (operations, values) are stored in `PrimaryMap`s
//! owned by `IrContext`. Operand and result lists use `EntityList + ListPool`
//! for compact 4-byte per-field storage.
//!
//! The graph only grows: operations and graph inputs can be created, but
//! never rewired or destroyed, so a value's producer never changes.

use std::collections::BTreeMap;

use cranelift_entity::{EntityList, ListPool, PrimaryMap, SecondaryMap};
use smallvec::SmallVec;

use crate::location::{Location, PathInterner};
use crate::refs::*;
use crate::symbol::Symbol;
use crate::types::{Attribute, TypeData, TypeInterner};

// ============================================================================
// Use-chain
// ============================================================================

/// A single use of a value: which operation uses it, at which operand index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: OpRef,
    pub operand_index: u32,
}

// ============================================================================
// Entity data types
// ============================================================================

/// Data for a single operation in the arena.
pub struct OperationData {
    pub location: Location,
    pub dialect: Symbol,
    pub name: Symbol,
    operands: EntityList<ValueRef>,
    results: EntityList<TypeRef>,
    pub attributes: BTreeMap<Symbol, Attribute>,
}

impl OperationData {
    /// Check whether this operation is `dialect.name`.
    pub fn is(&self, dialect: Symbol, name: Symbol) -> bool {
        self.dialect == dialect && self.name == name
    }

    /// `dialect.name`, for diagnostics.
    pub fn full_name(&self) -> String {
        format!("{}.{}", self.dialect, self.name)
    }
}

/// Data for a single SSA value.
pub struct ValueData {
    pub def: ValueDef,
    pub ty: TypeRef,
}

// ============================================================================
// IrContext
// ============================================================================

/// Arena-based graph context.
///
/// Owns all graph entities, the producer map (`ValueData::def`) and the
/// use-chains. Matching code only ever borrows it immutably.
pub struct IrContext {
    ops: PrimaryMap<OpRef, OperationData>,
    values: PrimaryMap<ValueRef, ValueData>,

    /// Use-chain: for each value, the list of operations that use it.
    uses: SecondaryMap<ValueRef, SmallVec<[Use; 2]>>,

    /// Graph inputs in declaration order.
    inputs: Vec<ValueRef>,

    /// Type and path interners.
    pub types: TypeInterner,
    pub paths: PathInterner,

    /// Backing pools for EntityList storage.
    value_pool: ListPool<ValueRef>,
    type_pool: ListPool<TypeRef>,

    /// Mapping from operation to its result ValueRefs.
    result_values: SecondaryMap<OpRef, EntityList<ValueRef>>,
}

impl IrContext {
    /// Create a new empty IR context.
    pub fn new() -> Self {
        Self {
            ops: PrimaryMap::new(),
            values: PrimaryMap::new(),
            uses: SecondaryMap::new(),
            inputs: Vec::new(),
            types: TypeInterner::new(),
            paths: PathInterner::new(),
            value_pool: ListPool::new(),
            type_pool: ListPool::new(),
            result_values: SecondaryMap::new(),
        }
    }

    // ========================================================================
    // Operation
    // ========================================================================

    /// Create a new operation and allocate result values for it.
    ///
    /// The operation's operands are registered in the use-chain.
    pub fn create_op(&mut self, data: OperationData) -> OpRef {
        let operand_slice: SmallVec<[ValueRef; 8]> =
            data.operands.as_slice(&self.value_pool).into();
        let result_types: SmallVec<[TypeRef; 4]> = data.results.as_slice(&self.type_pool).into();

        let op = self.ops.push(data);

        for (idx, &val) in operand_slice.iter().enumerate() {
            self.uses[val].push(Use {
                user: op,
                operand_index: idx as u32,
            });
        }

        let mut result_value_list = EntityList::new();
        for (idx, &ty) in result_types.iter().enumerate() {
            let v = self.values.push(ValueData {
                def: ValueDef::OpResult(op, idx as u32),
                ty,
            });
            result_value_list.push(v, &mut self.value_pool);
        }
        self.result_values[op] = result_value_list;

        op
    }

    pub fn op(&self, op: OpRef) -> &OperationData {
        &self.ops[op]
    }

    /// Get the operands of an operation as a slice.
    pub fn op_operands(&self, op: OpRef) -> &[ValueRef] {
        self.ops[op].operands.as_slice(&self.value_pool)
    }

    /// Number of operands, fixed when the operation was created.
    pub fn op_arity(&self, op: OpRef) -> usize {
        self.ops[op].operands.len(&self.value_pool)
    }

    pub fn op_result_types(&self, op: OpRef) -> &[TypeRef] {
        self.ops[op].results.as_slice(&self.type_pool)
    }

    /// Get the i-th result value of an operation.
    pub fn op_result(&self, op: OpRef, index: u32) -> ValueRef {
        self.result_values[op].as_slice(&self.value_pool)[index as usize]
    }

    pub fn op_results(&self, op: OpRef) -> &[ValueRef] {
        self.result_values[op].as_slice(&self.value_pool)
    }

    /// Look up an attribute by key.
    pub fn op_attr(&self, op: OpRef, key: Symbol) -> Option<&Attribute> {
        self.ops[op].attributes.get(&key)
    }

    /// Iterate all operations in creation order.
    pub fn ops(&self) -> impl Iterator<Item = OpRef> + '_ {
        self.ops.keys()
    }

    // ========================================================================
    // Value
    // ========================================================================

    /// Declare a new graph input of the given type.
    pub fn add_graph_input(&mut self, ty: TypeRef) -> ValueRef {
        let v = self.values.push(ValueData {
            def: ValueDef::GraphInput(self.inputs.len() as u32),
            ty,
        });
        self.inputs.push(v);
        v
    }

    pub fn graph_inputs(&self) -> &[ValueRef] {
        &self.inputs
    }

    pub fn value(&self, v: ValueRef) -> &ValueData {
        &self.values[v]
    }

    pub fn value_ty(&self, v: ValueRef) -> TypeRef {
        self.values[v].ty
    }

    /// Get the interned type data of a value.
    pub fn value_type_data(&self, v: ValueRef) -> &TypeData {
        self.types.get(self.values[v].ty)
    }

    /// Get the definition of a value.
    pub fn value_def(&self, v: ValueRef) -> ValueDef {
        self.values[v].def
    }

    /// The operation defining `v`, or `None` if `v` is a graph input.
    pub fn producer(&self, v: ValueRef) -> Option<OpRef> {
        self.values[v].def.producer()
    }

    // ========================================================================
    // Use-chain
    // ========================================================================

    pub fn uses(&self, v: ValueRef) -> &[Use] {
        &self.uses[v]
    }

    pub fn has_uses(&self, v: ValueRef) -> bool {
        !self.uses[v].is_empty()
    }
}

impl Default for IrContext {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// OperationDataBuilder
// ============================================================================

/// Builder for constructing `OperationData` with pool-backed lists.
///
/// Collects operands and result types into `Vec`s, then packs them
/// into `EntityList`s on `build()`.
pub struct OperationDataBuilder {
    location: Location,
    dialect: Symbol,
    name: Symbol,
    operands: Vec<ValueRef>,
    results: Vec<TypeRef>,
    attributes: BTreeMap<Symbol, Attribute>,
}

impl OperationDataBuilder {
    pub fn new(location: Location, dialect: Symbol, name: Symbol) -> Self {
        Self {
            location,
            dialect,
            name,
            operands: Vec::new(),
            results: Vec::new(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn operand(mut self, v: ValueRef) -> Self {
        self.operands.push(v);
        self
    }

    pub fn operands(mut self, vs: impl IntoIterator<Item = ValueRef>) -> Self {
        self.operands.extend(vs);
        self
    }

    pub fn result(mut self, ty: TypeRef) -> Self {
        self.results.push(ty);
        self
    }

    pub fn attr(mut self, key: impl Into<Symbol>, val: impl Into<Attribute>) -> Self {
        self.attributes.insert(key.into(), val.into());
        self
    }

    /// Build the `OperationData`, packing vecs into `EntityList`s using
    /// the context's pools.
    pub fn build(self, ctx: &mut IrContext) -> OperationData {
        let mut operands = EntityList::new();
        operands.extend(self.operands, &mut ctx.value_pool);
        let mut results = EntityList::new();
        results.extend(self.results, &mut ctx.type_pool);
        OperationData {
            location: self.location,
            dialect: self.dialect,
            name: self.name,
            operands,
            results,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::Span;
    use crate::types::{ElemType, TensorType};

    fn test_location(ctx: &mut IrContext) -> Location {
        let path = ctx.paths.intern("file:///test.onnx");
        Location::new(path, Span::new(0, 0))
    }

    fn f32_type(ctx: &mut IrContext) -> TypeRef {
        ctx.types.intern(TensorType::ranked(ElemType::F32, &[4]))
    }

    #[test]
    fn create_op_and_read_back() {
        let mut ctx = IrContext::new();
        let loc = test_location(&mut ctx);
        let ty = f32_type(&mut ctx);
        let x = ctx.add_graph_input(ty);

        let data = OperationDataBuilder::new(loc, Symbol::new("tensor"), Symbol::new("tanh"))
            .operand(x)
            .result(ty)
            .attr("approx", true)
            .build(&mut ctx);
        let op = ctx.create_op(data);

        assert!(ctx.op(op).is(Symbol::new("tensor"), Symbol::new("tanh")));
        assert_eq!(ctx.op(op).full_name(), "tensor.tanh");
        assert_eq!(ctx.op_operands(op), &[x]);
        assert_eq!(ctx.op_arity(op), 1);
        assert_eq!(ctx.op_result_types(op), &[ty]);
        assert_eq!(
            ctx.op_attr(op, Symbol::new("approx")),
            Some(&Attribute::Bool(true))
        );
        assert_eq!(ctx.ops().collect::<Vec<_>>(), vec![op]);
    }

    #[test]
    fn producer_map() {
        let mut ctx = IrContext::new();
        let loc = test_location(&mut ctx);
        let ty = f32_type(&mut ctx);
        let x = ctx.add_graph_input(ty);
        let y = ctx.add_graph_input(ty);

        let data = OperationDataBuilder::new(loc, Symbol::new("test"), Symbol::new("split"))
            .operand(x)
            .result(ty)
            .result(ty)
            .build(&mut ctx);
        let op = ctx.create_op(data);
        let r0 = ctx.op_result(op, 0);
        let r1 = ctx.op_result(op, 1);

        assert_eq!(ctx.graph_inputs(), &[x, y]);
        assert_eq!(ctx.value_def(y), ValueDef::GraphInput(1));
        assert_eq!(ctx.producer(x), None);
        assert_eq!(ctx.value_def(r1), ValueDef::OpResult(op, 1));
        assert_eq!(ctx.producer(r0), Some(op));
        assert_eq!(ctx.producer(r1), Some(op));
        assert_eq!(ctx.op_results(op), &[r0, r1]);
        assert!(matches!(ctx.value_type_data(r0), TypeData::Tensor(_)));
    }

    #[test]
    fn context_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IrContext>();
        assert_send_sync::<Location>();
    }

    #[test]
    fn use_chain_tracking() {
        let mut ctx = IrContext::new();
        let loc = test_location(&mut ctx);
        let ty = f32_type(&mut ctx);
        let x = ctx.add_graph_input(ty);

        assert!(!ctx.has_uses(x));

        let data = OperationDataBuilder::new(loc, Symbol::new("tensor"), Symbol::new("mul"))
            .operands([x, x])
            .result(ty)
            .build(&mut ctx);
        let op = ctx.create_op(data);

        assert_eq!(
            ctx.uses(x),
            &[
                Use {
                    user: op,
                    operand_index: 0
                },
                Use {
                    user: op,
                    operand_index: 1
                },
            ]
        );
    }
}
