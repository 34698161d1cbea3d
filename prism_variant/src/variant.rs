// prism_variant/src/variant.rs

#![forbid(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use prism_ids::ObjectID;
use serde_json::{Map as JsonMap, Number as JsonNumber, Value as JsonValue};

/// Floats compare by bit pattern, so a NaN equals itself and a value re-declared unchanged
/// never reads as a change.
#[derive(Clone, Copy, Debug)]
pub enum Number {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
}

impl Number {
    #[inline]
    pub const fn is_int(&self) -> bool {
        matches!(
            self,
            Number::I32(_) | Number::I64(_) | Number::U32(_) | Number::U64(_)
        )
    }

    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Number::F32(_) | Number::F64(_))
    }

    #[inline]
    pub fn as_i64_lossy(&self) -> Option<i64> {
        match *self {
            Number::I32(v) => Some(v as i64),
            Number::I64(v) => Some(v),
            Number::U32(v) => Some(v as i64),
            Number::U64(v) => i64::try_from(v).ok(),
            Number::F32(_) | Number::F64(_) => None,
        }
    }

    #[inline]
    pub fn as_f64_lossy(&self) -> f64 {
        match *self {
            Number::I32(v) => v as f64,
            Number::I64(v) => v as f64,
            Number::U32(v) => v as f64,
            Number::U64(v) => v as f64,
            Number::F32(v) => v as f64,
            Number::F64(v) => v,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Number::I32(a), Number::I32(b)) => a == b,
            (Number::I64(a), Number::I64(b)) => a == b,
            (Number::U32(a), Number::U32(b)) => a == b,
            (Number::U64(a), Number::U64(b)) => a == b,
            (Number::F32(a), Number::F32(b)) => a.to_bits() == b.to_bits(),
            (Number::F64(a), Number::F64(b)) => a.to_bits() == b.to_bits(),
            _ => false,
        }
    }
}

impl Eq for Number {}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::I32(v) => write!(f, "{v}"),
            Number::I64(v) => write!(f, "{v}"),
            Number::U32(v) => write!(f, "{v}"),
            Number::U64(v) => write!(f, "{v}"),
            Number::F32(v) => write!(f, "{v}"),
            Number::F64(v) => write!(f, "{v}"),
        }
    }
}

/// A property value as declared by the host and handed to native setters.
///
/// Equality is structural: two bags holding equal variants under the same key are considered
/// unchanged, which is what the property differ relies on. Floats, ranges and vectors compare
/// by bit pattern.
#[derive(Clone, Debug)]
pub enum Variant {
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),

    /// Closed numeric interval, e.g. a scalar or mapping range.
    Range([f64; 2]),
    Vec3([f64; 3]),

    /// Reference to another native object (lookup table, input data, ...).
    ObjectRef(ObjectID),

    Array(Vec<Variant>),
    Map(IndexMap<Arc<str>, Variant>),
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Variant::Null, Variant::Null) => true,
            (Variant::Bool(a), Variant::Bool(b)) => a == b,
            (Variant::Number(a), Variant::Number(b)) => a == b,
            (Variant::String(a), Variant::String(b)) => a == b,
            (Variant::Range(a), Variant::Range(b)) => same_bits(a, b),
            (Variant::Vec3(a), Variant::Vec3(b)) => same_bits(a, b),
            (Variant::ObjectRef(a), Variant::ObjectRef(b)) => a == b,
            (Variant::Array(a), Variant::Array(b)) => a == b,
            (Variant::Map(a), Variant::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Variant {}

#[inline]
fn same_bits(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Null => write!(f, "null"),
            Variant::Bool(v) => write!(f, "{v}"),
            Variant::Number(v) => write!(f, "{v}"),
            Variant::String(v) => write!(f, "{:?}", v.as_ref()),
            Variant::Range([min, max]) => write!(f, "[{min}, {max}]"),
            Variant::Vec3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Variant::ObjectRef(id) => write!(f, "object({id})"),
            Variant::Array(values) => {
                write!(f, "[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{value}")?;
                }
                write!(f, "]")
            }
            Variant::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}: {}", key.as_ref(), value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

// -------------------- Constructors --------------------

impl Variant {
    #[inline]
    pub const fn null() -> Self {
        Variant::Null
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    #[inline]
    pub fn string<S: AsRef<str>>(s: S) -> Self {
        Variant::String(Arc::<str>::from(s.as_ref()))
    }

    #[inline]
    pub const fn range(min: f64, max: f64) -> Self {
        Variant::Range([min, max])
    }
}

// -------------------- Accessors --------------------

impl Variant {
    #[inline]
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Variant::Bool(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_number(&self) -> Option<Number> {
        match *self {
            Variant::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(|n| n.as_f64_lossy())
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Variant::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_range(&self) -> Option<[f64; 2]> {
        match *self {
            Variant::Range(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn as_vec3(&self) -> Option<[f64; 3]> {
        match *self {
            Variant::Vec3(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_ref(&self) -> Option<ObjectID> {
        match *self {
            Variant::ObjectRef(id) => Some(id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array(&self) -> Option<&[Variant]> {
        match self {
            Variant::Array(v) => Some(v),
            _ => None,
        }
    }

    #[inline]
    pub fn as_map(&self) -> Option<&IndexMap<Arc<str>, Variant>> {
        match self {
            Variant::Map(m) => Some(m),
            _ => None,
        }
    }
}

// -------------------- From impls --------------------

impl From<bool> for Variant {
    #[inline]
    fn from(v: bool) -> Self {
        Variant::Bool(v)
    }
}
impl From<Number> for Variant {
    #[inline]
    fn from(v: Number) -> Self {
        Variant::Number(v)
    }
}
impl From<i32> for Variant {
    #[inline]
    fn from(v: i32) -> Self {
        Variant::Number(Number::I32(v))
    }
}
impl From<i64> for Variant {
    #[inline]
    fn from(v: i64) -> Self {
        Variant::Number(Number::I64(v))
    }
}
impl From<u32> for Variant {
    #[inline]
    fn from(v: u32) -> Self {
        Variant::Number(Number::U32(v))
    }
}
impl From<u64> for Variant {
    #[inline]
    fn from(v: u64) -> Self {
        Variant::Number(Number::U64(v))
    }
}
impl From<f32> for Variant {
    #[inline]
    fn from(v: f32) -> Self {
        Variant::Number(Number::F32(v))
    }
}
impl From<f64> for Variant {
    #[inline]
    fn from(v: f64) -> Self {
        Variant::Number(Number::F64(v))
    }
}
impl From<&str> for Variant {
    #[inline]
    fn from(v: &str) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<String> for Variant {
    #[inline]
    fn from(v: String) -> Self {
        Variant::String(Arc::<str>::from(v))
    }
}
impl From<Arc<str>> for Variant {
    #[inline]
    fn from(v: Arc<str>) -> Self {
        Variant::String(v)
    }
}
impl From<ObjectID> for Variant {
    #[inline]
    fn from(v: ObjectID) -> Self {
        Variant::ObjectRef(v)
    }
}
impl From<[f64; 3]> for Variant {
    #[inline]
    fn from(v: [f64; 3]) -> Self {
        Variant::Vec3(v)
    }
}
impl From<Vec<Variant>> for Variant {
    #[inline]
    fn from(v: Vec<Variant>) -> Self {
        Variant::Array(v)
    }
}

// -------------------- JSON conversion --------------------

impl Variant {
    pub fn from_json_value(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Variant::Null,
            JsonValue::Bool(v) => Variant::Bool(*v),
            JsonValue::Number(v) => {
                if let Some(i) = v.as_i64() {
                    Variant::from(i)
                } else if let Some(u) = v.as_u64() {
                    Variant::from(u)
                } else if let Some(f) = v.as_f64() {
                    Variant::from(f)
                } else {
                    Variant::Null
                }
            }
            JsonValue::String(v) => Variant::from(v.as_str()),
            JsonValue::Array(values) => {
                Variant::Array(values.iter().map(Variant::from_json_value).collect())
            }
            JsonValue::Object(object) => Variant::Map(
                object
                    .iter()
                    .map(|(k, v)| (Arc::<str>::from(k.as_str()), Variant::from_json_value(v)))
                    .collect(),
            ),
        }
    }

    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Variant::Null => JsonValue::Null,
            Variant::Bool(v) => JsonValue::Bool(*v),
            Variant::Number(v) => number_to_json_value(*v),
            Variant::String(v) => JsonValue::String(v.as_ref().to_string()),
            Variant::Range(r) => JsonValue::Array(r.iter().map(|v| float_to_json(*v)).collect()),
            Variant::Vec3(v) => JsonValue::Array(v.iter().map(|v| float_to_json(*v)).collect()),
            Variant::ObjectRef(id) => JsonValue::Number(JsonNumber::from(id.as_u64())),
            Variant::Array(v) => JsonValue::Array(v.iter().map(Variant::to_json_value).collect()),
            Variant::Map(v) => JsonValue::Object(
                v.iter()
                    .map(|(k, v)| (k.as_ref().to_string(), v.to_json_value()))
                    .collect::<JsonMap<String, JsonValue>>(),
            ),
        }
    }
}

fn number_to_json_value(number: Number) -> JsonValue {
    match number {
        Number::I32(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::I64(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::U32(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::U64(v) => JsonValue::Number(JsonNumber::from(v)),
        Number::F32(v) => float_to_json(v as f64),
        Number::F64(v) => float_to_json(v),
    }
}

fn float_to_json(value: f64) -> JsonValue {
    match JsonNumber::from_f64(value) {
        Some(v) => JsonValue::Number(v),
        None => JsonValue::Null,
    }
}
