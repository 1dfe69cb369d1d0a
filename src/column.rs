//! 列：按类型特化的分块序列
//!
//! [`TypedColumn<T>`] 是单一载荷类型的列；[`Column`] 是四种列的封闭和类型，
//! 通过 `get_type()` 做动态分派，`as_int()` 等在标签不符时返回 `None`。

use std::sync::Arc;

use crate::chunked::ChunkedVec;
use crate::common::{ChunkConfig, FrameError, Result};
use crate::field_type::{FieldValue, TypeTag, Value};

// ── TypedColumn ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TypedColumn<T> {
    data: ChunkedVec<T>,
}

pub type IntColumn    = TypedColumn<i64>;
pub type BoolColumn   = TypedColumn<bool>;
pub type FloatColumn  = TypedColumn<f64>;
pub type StringColumn = TypedColumn<Option<Arc<str>>>;

impl<T: FieldValue> TypedColumn<T> {
    pub fn new() -> Self {
        Self::with_config(ChunkConfig::default())
    }

    pub fn with_config(config: ChunkConfig) -> Self {
        Self { data: ChunkedVec::with_config(config) }
    }

    pub fn size(&self) -> usize { self.data.len() }

    pub fn get_type(&self) -> TypeTag { T::TAG }

    pub fn get(&self, idx: usize) -> Result<T> {
        self.data.get(idx).cloned()
    }

    pub fn get_ref(&self, idx: usize) -> Result<&T> {
        self.data.get(idx)
    }

    /// `idx == size()` 时追加
    pub fn set(&mut self, idx: usize, value: T) -> Result<()> {
        self.data.set(value, idx)
    }

    pub fn push_back(&mut self, value: T) {
        self.data.append(value);
    }

    pub fn append_missing(&mut self) {
        self.data.append(T::missing());
    }

    pub fn value_at(&self, idx: usize) -> Result<Value> {
        self.get(idx).map(T::into_value)
    }

    /// 值的标签必须是 `T::TAG`
    pub fn set_value(&mut self, idx: usize, value: Value) -> Result<()> {
        let found = value.type_tag();
        let v = T::from_value(value)
            .ok_or(FrameError::TypeMismatch { expected: T::TAG, found })?;
        self.set(idx, v)
    }

    pub fn data(&self) -> &ChunkedVec<T> { &self.data }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.data.iter()
    }
}

impl<T: FieldValue> Default for TypedColumn<T> {
    fn default() -> Self { Self::new() }
}

// 按 `FieldValue::same` 逐元素比较，含 NaN 的浮点列也等于自身
impl<T: FieldValue> PartialEq for TypedColumn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size() == other.size()
            && self.iter().zip(other.iter()).all(|(a, b)| a.same(b))
    }
}

impl<T: FieldValue> FromIterator<T> for TypedColumn<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self { data: iter.into_iter().collect() }
    }
}

// ── Column ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(IntColumn),
    Bool(BoolColumn),
    Float(FloatColumn),
    Str(StringColumn),
}

impl Column {
    /// 按标签构造空列
    pub fn new(tag: TypeTag) -> Self {
        Self::with_config(tag, ChunkConfig::default())
    }

    pub fn with_config(tag: TypeTag, config: ChunkConfig) -> Self {
        match tag {
            TypeTag::Int   => Self::Int(TypedColumn::with_config(config)),
            TypeTag::Bool  => Self::Bool(TypedColumn::with_config(config)),
            TypeTag::Float => Self::Float(TypedColumn::with_config(config)),
            TypeTag::Str   => Self::Str(TypedColumn::with_config(config)),
        }
    }

    pub fn from_ints<I: IntoIterator<Item = i64>>(values: I) -> Self {
        Self::Int(values.into_iter().collect())
    }
    pub fn from_bools<I: IntoIterator<Item = bool>>(values: I) -> Self {
        Self::Bool(values.into_iter().collect())
    }
    pub fn from_floats<I: IntoIterator<Item = f64>>(values: I) -> Self {
        Self::Float(values.into_iter().collect())
    }
    /// `None` 表示缺失字符串
    pub fn from_strings<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        Self::Str(values.into_iter().map(|s| s.map(Arc::from)).collect())
    }

    pub fn get_type(&self) -> TypeTag {
        match self {
            Self::Int(_)   => TypeTag::Int,
            Self::Bool(_)  => TypeTag::Bool,
            Self::Float(_) => TypeTag::Float,
            Self::Str(_)   => TypeTag::Str,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Self::Int(c)   => c.size(),
            Self::Bool(c)  => c.size(),
            Self::Float(c) => c.size(),
            Self::Str(c)   => c.size(),
        }
    }

    pub fn chunk_config(&self) -> ChunkConfig {
        match self {
            Self::Int(c)   => c.data().config(),
            Self::Bool(c)  => c.data().config(),
            Self::Float(c) => c.data().config(),
            Self::Str(c)   => c.data().config(),
        }
    }

    // ── 写入 ──────────────────────────────────────────────────────────────────

    /// 追加一个值；值的类型必须与列一致
    pub fn push_back(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let expected = self.get_type();
        match (self, value) {
            (Self::Int(c),   Value::Int(v))   => c.push_back(v),
            (Self::Bool(c),  Value::Bool(v))  => c.push_back(v),
            (Self::Float(c), Value::Float(v)) => c.push_back(v),
            (Self::Str(c),   Value::Str(v))   => c.push_back(v),
            (_, other) => {
                return Err(FrameError::TypeMismatch { expected, found: other.type_tag() });
            }
        }
        Ok(())
    }

    pub fn append_missing(&mut self) {
        match self {
            Self::Int(c)   => c.append_missing(),
            Self::Bool(c)  => c.append_missing(),
            Self::Float(c) => c.append_missing(),
            Self::Str(c)   => c.append_missing(),
        }
    }

    pub fn set_value(&mut self, idx: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        match self {
            Self::Int(c)   => c.set_value(idx, value),
            Self::Bool(c)  => c.set_value(idx, value),
            Self::Float(c) => c.set_value(idx, value),
            Self::Str(c)   => c.set_value(idx, value),
        }
    }

    // ── 读取 ──────────────────────────────────────────────────────────────────

    pub fn value_at(&self, idx: usize) -> Result<Value> {
        match self {
            Self::Int(c)   => c.value_at(idx),
            Self::Bool(c)  => c.value_at(idx),
            Self::Float(c) => c.value_at(idx),
            Self::Str(c)   => c.value_at(idx),
        }
    }

    pub fn as_int(&self) -> Option<&IntColumn> {
        match self { Self::Int(c) => Some(c), _ => None }
    }
    pub fn as_bool(&self) -> Option<&BoolColumn> {
        match self { Self::Bool(c) => Some(c), _ => None }
    }
    pub fn as_float(&self) -> Option<&FloatColumn> {
        match self { Self::Float(c) => Some(c), _ => None }
    }
    pub fn as_string(&self) -> Option<&StringColumn> {
        match self { Self::Str(c) => Some(c), _ => None }
    }

    pub fn as_int_mut(&mut self) -> Option<&mut IntColumn> {
        match self { Self::Int(c) => Some(c), _ => None }
    }
    pub fn as_bool_mut(&mut self) -> Option<&mut BoolColumn> {
        match self { Self::Bool(c) => Some(c), _ => None }
    }
    pub fn as_float_mut(&mut self) -> Option<&mut FloatColumn> {
        match self { Self::Float(c) => Some(c), _ => None }
    }
    pub fn as_string_mut(&mut self) -> Option<&mut StringColumn> {
        match self { Self::Str(c) => Some(c), _ => None }
    }
}
