//! Schema：列类型标签序列 + 可选的列名 / 行名
//!
//! 名字只用于 名字→下标 的查找，从不影响遍历顺序。
//! `Clone` 即拷贝构造：两份 Schema 互不影响。

use std::fmt;
use std::str::FromStr;

use crate::common::{FrameError, Result};
use crate::field_type::TypeTag;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    types:     Vec<TypeTag>,
    /// 与 types 平行，未命名的列为 None
    col_names: Vec<Option<String>>,
    row_names: Vec<Option<String>>,
}

impl Schema {
    /// 空 Schema（零列）
    pub fn new() -> Self { Self::default() }

    /// 由类型串构造，如 `"IBFS"`；任何无法识别的字符都是错误
    pub fn parse(types: &str) -> Result<Self> {
        let types = types.chars()
            .map(TypeTag::from_char)
            .collect::<Result<Vec<_>>>()?;
        let col_names = vec![None; types.len()];
        Ok(Self { types, col_names, row_names: Vec::new() })
    }

    // ── 列 ────────────────────────────────────────────────────────────────────

    pub fn add_column(&mut self, tag: TypeTag, name: Option<&str>) {
        self.types.push(tag);
        self.col_names.push(name.map(str::to_owned));
    }

    pub fn width(&self) -> usize { self.types.len() }

    pub fn types(&self) -> &[TypeTag] { &self.types }

    pub fn col_type(&self, idx: usize) -> Result<TypeTag> {
        self.types.get(idx)
            .copied()
            .ok_or_else(|| FrameError::bounds(idx, self.types.len()))
    }

    pub fn col_name(&self, idx: usize) -> Option<&str> {
        self.col_names.get(idx)?.as_deref()
    }

    pub fn col_idx(&self, name: &str) -> Option<usize> {
        self.col_names.iter().position(|n| n.as_deref() == Some(name))
    }

    // ── 行 ────────────────────────────────────────────────────────────────────

    pub fn add_row(&mut self, name: Option<&str>) {
        self.row_names.push(name.map(str::to_owned));
    }

    /// 已登记的行数（行名表长度）
    pub fn length(&self) -> usize { self.row_names.len() }

    pub fn row_name(&self, idx: usize) -> Option<&str> {
        self.row_names.get(idx)?.as_deref()
    }

    pub fn row_idx(&self, name: &str) -> Option<usize> {
        self.row_names.iter().position(|n| n.as_deref() == Some(name))
    }

    pub fn clear_row_names(&mut self) {
        self.row_names.clear();
    }

    /// 类型串，如 `"IBFS"`
    pub fn type_string(&self) -> String {
        self.types.iter().map(|t| t.as_char()).collect()
    }
}

impl FromStr for Schema {
    type Err = FrameError;
    fn from_str(s: &str) -> Result<Self> { Self::parse(s) }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_string() {
        let s = Schema::parse("IBFS").unwrap();
        assert_eq!(s.width(), 4);
        assert_eq!(s.types(), &[TypeTag::Int, TypeTag::Bool, TypeTag::Float, TypeTag::Str]);
        assert_eq!(s.to_string(), "IBFS");
        assert_eq!(s.length(), 0);
        assert_eq!("".parse::<Schema>().unwrap().width(), 0);
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        assert!(matches!(Schema::parse("IBx"), Err(FrameError::InvalidTypeTag('x'))));
        assert!(matches!(Schema::parse("i"), Err(FrameError::InvalidTypeTag('i'))));
    }

    #[test]
    fn name_lookup() {
        let mut s = Schema::parse("I").unwrap();
        s.add_column(TypeTag::Str, Some("name"));
        s.add_column(TypeTag::Float, None);
        assert_eq!(s.col_idx("name"), Some(1));
        assert_eq!(s.col_idx("missing"), None);
        assert_eq!(s.col_name(0), None);
        assert_eq!(s.col_type(2).unwrap(), TypeTag::Float);
        assert!(matches!(s.col_type(3), Err(FrameError::OutOfBounds { index: 3, len: 3 })));

        s.add_row(Some("r0"));
        s.add_row(None);
        s.add_row(Some("r2"));
        assert_eq!(s.row_idx("r2"), Some(2));
        assert_eq!(s.row_name(1), None);
        assert_eq!(s.length(), 3);
    }

    #[test]
    fn copies_are_independent() {
        let mut a = Schema::parse("IS").unwrap();
        a.add_row(Some("first"));
        let mut b = a.clone();
        b.add_column(TypeTag::Bool, Some("flag"));
        b.clear_row_names();
        assert_eq!(a.width(), 2);
        assert_eq!(a.row_idx("first"), Some(0));
        assert_eq!(b.width(), 3);
        assert_eq!(b.row_idx("first"), None);
        assert_eq!(b.col_idx("flag"), Some(2));
    }
}
