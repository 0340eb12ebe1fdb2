//! Value types, type interning and attributes.

use std::collections::HashMap;

use cranelift_entity::PrimaryMap;
use derive_more::{Display, Error};
use smallvec::SmallVec;

use crate::refs::TypeRef;
use crate::symbol::Symbol;

/// Extent of a dimension whose size is unknown at compile time.
pub const DYNAMIC_DIM: i64 = -1;

// ============================================================================
// Types
// ============================================================================

/// Tensor element type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum ElemType {
    #[display("f32")]
    F32,
    #[display("f64")]
    F64,
    #[display("i32")]
    I32,
    #[display("i64")]
    I64,
    #[display("i1")]
    Bool,
}

impl ElemType {
    pub fn is_float(self) -> bool {
        matches!(self, ElemType::F32 | ElemType::F64)
    }
}

/// A tensor type. `shape` is `None` for unranked tensors; individual
/// dimensions may be [`DYNAMIC_DIM`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorType {
    pub elem: ElemType,
    pub shape: Option<SmallVec<[i64; 4]>>,
}

impl TensorType {
    pub fn ranked(elem: ElemType, shape: &[i64]) -> Self {
        Self {
            elem,
            shape: Some(shape.into()),
        }
    }

    pub fn unranked(elem: ElemType) -> Self {
        Self { elem, shape: None }
    }

    pub fn rank(&self) -> Option<usize> {
        self.shape.as_ref().map(|s| s.len())
    }

    pub fn has_static_shape(&self) -> bool {
        self.shape
            .as_ref()
            .is_some_and(|s| s.iter().all(|&d| d != DYNAMIC_DIM))
    }
}

/// Data for a single interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    /// Type of the absent-value placeholder produced by `tensor.no_value`.
    None,
    Tensor(TensorType),
}

impl TypeData {
    pub fn as_tensor(&self) -> Option<&TensorType> {
        match self {
            TypeData::Tensor(t) => Some(t),
            TypeData::None => None,
        }
    }
}

impl From<TensorType> for TypeData {
    fn from(value: TensorType) -> Self {
        TypeData::Tensor(value)
    }
}

/// Deduplicating type interner. Same `TypeData` always yields the same `TypeRef`.
pub struct TypeInterner {
    types: PrimaryMap<TypeRef, TypeData>,
    dedup: HashMap<TypeData, TypeRef>,
}

impl TypeInterner {
    pub fn new() -> Self {
        Self {
            types: PrimaryMap::new(),
            dedup: HashMap::default(),
        }
    }

    /// Intern a type, returning an existing ref if the data matches.
    pub fn intern(&mut self, data: impl Into<TypeData>) -> TypeRef {
        let data = data.into();
        if let Some(&existing) = self.dedup.get(&data) {
            return existing;
        }
        let r = self.types.push(data.clone());
        self.dedup.insert(data, r);
        r
    }

    pub fn get(&self, r: TypeRef) -> &TypeData {
        &self.types[r]
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Dense elements
// ============================================================================

/// Error raised when building an attribute payload.
#[derive(Clone, Debug, Display, Error, PartialEq)]
pub enum AttributeError {
    #[display("dense payload has {actual} element(s) but shape requires {expected}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[display("constant shapes must be static, found dimension {dim}")]
    NegativeDimension { dim: i64 },
    #[display("element count of shape {shape:?} overflows usize")]
    TooManyElements { shape: Vec<i64> },
    #[display("{value} is not an integral `{elem}` value")]
    NotIntegral { elem: ElemType, value: f64 },
}

/// Flat element storage of a dense tensor.
///
/// Floats are stored as `f64` bit patterns so the attribute stays `Eq + Hash`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum DensePayload {
    Float(Vec<u64>),
    Int(Vec<i64>),
}

/// A fully materialised constant tensor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DenseElements {
    elem: ElemType,
    shape: SmallVec<[i64; 4]>,
    payload: DensePayload,
}

impl DenseElements {
    fn checked(
        elem: ElemType,
        shape: &[i64],
        payload: DensePayload,
    ) -> Result<Self, AttributeError> {
        let expected = element_count(shape)?;
        let actual = match &payload {
            DensePayload::Float(v) => v.len(),
            DensePayload::Int(v) => v.len(),
        };
        if expected != actual {
            return Err(AttributeError::ShapeMismatch { expected, actual });
        }
        Ok(Self {
            elem,
            shape: shape.into(),
            payload,
        })
    }

    pub fn from_f32(shape: &[i64], values: &[f32]) -> Result<Self, AttributeError> {
        let bits = values.iter().map(|&v| f64::from(v).to_bits()).collect();
        Self::checked(ElemType::F32, shape, DensePayload::Float(bits))
    }

    pub fn from_f64(shape: &[i64], values: &[f64]) -> Result<Self, AttributeError> {
        let bits = values.iter().map(|v| v.to_bits()).collect();
        Self::checked(ElemType::F64, shape, DensePayload::Float(bits))
    }

    pub fn from_i64(shape: &[i64], values: &[i64]) -> Result<Self, AttributeError> {
        Self::checked(ElemType::I64, shape, DensePayload::Int(values.to_vec()))
    }

    /// A tensor of `shape` whose elements all equal `value`.
    ///
    /// Integer element types reject a `value` with a fractional part
    /// instead of truncating it.
    pub fn splat(elem: ElemType, shape: &[i64], value: f64) -> Result<Self, AttributeError> {
        let count = element_count(shape)?;
        let payload = if elem.is_float() {
            DensePayload::Float(vec![value.to_bits(); count])
        } else if value.is_finite() && value.fract() == 0.0 {
            DensePayload::Int(vec![value as i64; count])
        } else {
            return Err(AttributeError::NotIntegral { elem, value });
        };
        Self::checked(elem, shape, payload)
    }

    /// A rank-0 tensor holding `value`. Same rules as [`splat`](Self::splat).
    pub fn scalar(elem: ElemType, value: f64) -> Result<Self, AttributeError> {
        Self::splat(elem, &[], value)
    }

    /// A rank-0 `f32` tensor.
    pub fn scalar_f32(value: f32) -> Self {
        Self {
            elem: ElemType::F32,
            shape: SmallVec::new(),
            payload: DensePayload::Float(vec![f64::from(value).to_bits()]),
        }
    }

    pub fn elem(&self) -> ElemType {
        self.elem
    }

    pub fn shape(&self) -> &[i64] {
        &self.shape
    }

    pub fn payload(&self) -> &DensePayload {
        &self.payload
    }

    pub fn num_elements(&self) -> usize {
        match &self.payload {
            DensePayload::Float(v) => v.len(),
            DensePayload::Int(v) => v.len(),
        }
    }

    /// Iterate the elements widened to `f64`.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        let floats: &[u64] = match &self.payload {
            DensePayload::Float(v) => v,
            DensePayload::Int(_) => &[],
        };
        let ints: &[i64] = match &self.payload {
            DensePayload::Int(v) => v,
            DensePayload::Float(_) => &[],
        };
        floats
            .iter()
            .map(|&bits| f64::from_bits(bits))
            .chain(ints.iter().map(|&v| v as f64))
    }

    /// The common element value if every element is equal.
    ///
    /// Returns `None` for empty tensors and for payloads containing NaN.
    pub fn splat_value(&self) -> Option<f64> {
        let mut iter = self.iter_f64();
        let first = iter.next()?;
        iter.all(|v| v == first).then_some(first).filter(|v| !v.is_nan())
    }
}

fn element_count(shape: &[i64]) -> Result<usize, AttributeError> {
    shape.iter().try_fold(1usize, |acc, &dim| {
        let dim_len =
            usize::try_from(dim).map_err(|_| AttributeError::NegativeDimension { dim })?;
        acc.checked_mul(dim_len)
            .ok_or_else(|| AttributeError::TooManyElements {
                shape: shape.to_vec(),
            })
    })
}

// ============================================================================
// Attribute
// ============================================================================

/// Operation attribute values.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Attribute {
    Unit,
    Bool(bool),
    /// Integer constant stored as raw bits (signless).
    IntBits(u64),
    /// Float constant stored as raw bits.
    FloatBits(u64),
    String(String),
    Symbol(Symbol),
    Type(TypeRef),
    /// Materialised constant tensor.
    Dense(DenseElements),
    /// Constant tensor stored out of line under the given key.
    Resource(Symbol),
    List(Vec<Attribute>),
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Attribute::IntBits(u64::from_ne_bytes(value.to_ne_bytes()))
    }
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Attribute::Bool(value)
    }
}

impl From<DenseElements> for Attribute {
    fn from(value: DenseElements) -> Self {
        Attribute::Dense(value)
    }
}

impl From<Vec<Attribute>> for Attribute {
    fn from(value: Vec<Attribute>) -> Self {
        Attribute::List(value)
    }
}
