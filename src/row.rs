//! Row 与 Fielder 访问协议
//!
//! Row 是按 Schema 成形的临时元组，由调用方创建，只活过一次填充 / 遍历。
//! `visit` 对每个字段按列顺序做一次穷尽匹配，分派到 Fielder 的对应方法：
//!
//! ```text
//! fielder.start(row) → accept_*(v0) → accept_*(v1) → … → fielder.done()
//! ```

use std::sync::Arc;

use crate::common::{FrameError, Result};
use crate::field_type::{TypeTag, Value};
use crate::schema::Schema;

// ── Fielder ───────────────────────────────────────────────────────────────────

/// 一次消费一个字段的访问者；未覆盖的方法忽略该字段
pub trait Fielder {
    fn start(&mut self, _row: usize) {}
    fn accept_bool(&mut self, _v: bool) {}
    fn accept_int(&mut self, _v: i64) {}
    fn accept_float(&mut self, _v: f64) {}
    /// `None` 为缺失字符串
    fn accept_string(&mut self, _v: Option<&str>) {}
    fn done(&mut self) {}
}

// ── Row ───────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    types:  Vec<TypeTag>,
    values: Vec<Value>,
    /// 遍历游标，由 DataFrame 在访问前设置
    idx:    usize,
}

impl Row {
    /// 所有字段初始化为各自类型的缺失值
    pub fn new(schema: &Schema) -> Self {
        let types = schema.types().to_vec();
        let values = types.iter().map(|&t| Value::missing(t)).collect();
        Self { types, values, idx: 0 }
    }

    pub fn types(&self) -> &[TypeTag] { &self.types }
    pub fn width(&self) -> usize { self.types.len() }

    pub fn type_string(&self) -> String {
        self.types.iter().map(|t| t.as_char()).collect()
    }

    pub fn col_type(&self, col: usize) -> Result<TypeTag> {
        self.types.get(col)
            .copied()
            .ok_or_else(|| FrameError::bounds(col, self.types.len()))
    }

    pub fn get_idx(&self) -> usize { self.idx }
    pub fn set_idx(&mut self, idx: usize) { self.idx = idx; }

    // ── 字段读写 ──────────────────────────────────────────────────────────────

    pub fn set(&mut self, col: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let expected = self.col_type(col)?;
        if value.type_tag() != expected {
            return Err(FrameError::TypeMismatch { expected, found: value.type_tag() });
        }
        self.values[col] = value;
        Ok(())
    }

    pub fn get(&self, col: usize) -> Result<&Value> {
        self.values.get(col)
            .ok_or_else(|| FrameError::bounds(col, self.values.len()))
    }

    fn typed<T>(
        &self,
        col:    usize,
        want:   TypeTag,
        pick:   impl FnOnce(&Value) -> Option<T>,
    ) -> Result<T> {
        let v = self.get(col)?;
        pick(v).ok_or(FrameError::TypeMismatch { expected: want, found: v.type_tag() })
    }

    pub fn get_int(&self, col: usize) -> Result<i64> {
        self.typed(col, TypeTag::Int, Value::as_int)
    }
    pub fn get_bool(&self, col: usize) -> Result<bool> {
        self.typed(col, TypeTag::Bool, Value::as_bool)
    }
    pub fn get_float(&self, col: usize) -> Result<f64> {
        self.typed(col, TypeTag::Float, Value::as_float)
    }
    pub fn get_string(&self, col: usize) -> Result<Option<Arc<str>>> {
        self.typed(col, TypeTag::Str, |v| match v {
            Value::Str(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn values(&self) -> &[Value] { &self.values }

    // ── 访问 ──────────────────────────────────────────────────────────────────

    pub fn visit<F: Fielder + ?Sized>(&self, row: usize, fielder: &mut F) {
        fielder.start(row);
        for v in &self.values {
            match v {
                Value::Int(i)   => fielder.accept_int(*i),
                Value::Bool(b)  => fielder.accept_bool(*b),
                Value::Float(f) => fielder.accept_float(*f),
                Value::Str(s)   => fielder.accept_string(s.as_deref()),
            }
        }
        fielder.done();
    }
}
