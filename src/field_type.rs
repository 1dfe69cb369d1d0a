//! 列的类型标签与运行时值
//!
//! 类型集合是封闭的四种：Int / Bool / Float / String，
//! 所有分派点（列访问、字段访问）都对 [`TypeTag`] / [`Value`] 做穷尽匹配。

use std::fmt;
use std::sync::Arc;

use crate::common::{FrameError, Result};

/// 单字符类型标签（'I' 'B' 'F' 'S'）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Int,
    Bool,
    Float,
    Str,
}

impl TypeTag {
    pub const ALL: [TypeTag; 4] = [Self::Int, Self::Bool, Self::Float, Self::Str];

    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'I' => Ok(Self::Int),
            'B' => Ok(Self::Bool),
            'F' => Ok(Self::Float),
            'S' => Ok(Self::Str),
            other => Err(FrameError::InvalidTypeTag(other)),
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Int   => 'I',
            Self::Bool  => 'B',
            Self::Float => 'F',
            Self::Str   => 'S',
        }
    }
}

impl TryFrom<char> for TypeTag {
    type Error = FrameError;
    fn try_from(c: char) -> Result<Self> { Self::from_char(c) }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ── Value ─────────────────────────────────────────────────────────────────────

/// 一个字段的值；`Str(None)` 即缺失字符串
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Float(f64),
    Str(Option<Arc<str>>),
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Self::Int(_)   => TypeTag::Int,
            Self::Bool(_)  => TypeTag::Bool,
            Self::Float(_) => TypeTag::Float,
            Self::Str(_)   => TypeTag::Str,
        }
    }

    /// 该类型的缺失 / 填充值：0, false, 0.0, null
    pub fn missing(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Int   => Self::Int(0),
            TypeTag::Bool  => Self::Bool(false),
            TypeTag::Float => Self::Float(0.0),
            TypeTag::Str   => Self::Str(None),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self { Self::Int(v) => Some(*v), _ => None }
    }
    pub fn as_bool(&self) -> Option<bool> {
        match self { Self::Bool(v) => Some(*v), _ => None }
    }
    pub fn as_float(&self) -> Option<f64> {
        match self { Self::Float(v) => Some(*v), _ => None }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self { Self::Str(v) => v.as_deref(), _ => None }
    }
}

impl From<i64>  for Value { fn from(v: i64)  -> Self { Self::Int(v) } }
impl From<i32>  for Value { fn from(v: i32)  -> Self { Self::Int(v as i64) } }
impl From<bool> for Value { fn from(v: bool) -> Self { Self::Bool(v) } }
impl From<f64>  for Value { fn from(v: f64)  -> Self { Self::Float(v) } }
impl From<f32>  for Value { fn from(v: f32)  -> Self { Self::Float(v as f64) } }
impl From<&str> for Value { fn from(v: &str) -> Self { Self::Str(Some(Arc::from(v))) } }
impl From<String> for Value {
    fn from(v: String) -> Self { Self::Str(Some(Arc::from(v))) }
}
impl From<Arc<str>> for Value {
    fn from(v: Arc<str>) -> Self { Self::Str(Some(v)) }
}
impl From<Option<Arc<str>>> for Value {
    fn from(v: Option<Arc<str>>) -> Self { Self::Str(v) }
}

// ── FieldValue ────────────────────────────────────────────────────────────────

/// 把列的物理载荷类型绑定到它的类型标签和缺失值
pub trait FieldValue: Clone + PartialEq + Send + Sync + 'static {
    const TAG: TypeTag;

    fn missing() -> Self;
    fn into_value(self) -> Value;
    fn from_value(v: Value) -> Option<Self>;

    /// 列相等比较用的逐元素判等，保证自反
    fn same(&self, other: &Self) -> bool { self == other }
}

impl FieldValue for i64 {
    const TAG: TypeTag = TypeTag::Int;
    fn missing() -> Self { 0 }
    fn into_value(self) -> Value { Value::Int(self) }
    fn from_value(v: Value) -> Option<Self> { v.as_int() }
}

impl FieldValue for bool {
    const TAG: TypeTag = TypeTag::Bool;
    fn missing() -> Self { false }
    fn into_value(self) -> Value { Value::Bool(self) }
    fn from_value(v: Value) -> Option<Self> { v.as_bool() }
}

impl FieldValue for f64 {
    const TAG: TypeTag = TypeTag::Float;
    fn missing() -> Self { 0.0 }
    fn into_value(self) -> Value { Value::Float(self) }
    fn from_value(v: Value) -> Option<Self> { v.as_float() }
    // NaN 与 NaN 视为相等；0.0 与 -0.0 仍相等
    fn same(&self, other: &Self) -> bool {
        self == other || (self.is_nan() && other.is_nan())
    }
}

impl FieldValue for Option<Arc<str>> {
    const TAG: TypeTag = TypeTag::Str;
    fn missing() -> Self { None }
    fn into_value(self) -> Value { Value::Str(self) }
    fn from_value(v: Value) -> Option<Self> {
        match v { Value::Str(s) => Some(s), _ => None }
    }
}
