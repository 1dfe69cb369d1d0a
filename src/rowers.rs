//! 内置的 Fielder / Rower
//!
//! - [`PrintRower`]    ：把每行渲染成 `<v0><v1>…` 一行文本
//! - [`SumRower`]      ：累加所有 Int 字段
//! - [`IncrementRower`]：生成新表：整数和浮点 +1，布尔取反，字符串原样

use std::fmt::Write;

use crate::field_type::Value;
use crate::row::{Fielder, Row};
use crate::rower::Rower;
use crate::schema::Schema;
use crate::table::DataFrame;

// ── Print ─────────────────────────────────────────────────────────────────────

/// 布尔输出 1/0，浮点保留 6 位小数，缺失字符串输出 `<>`
#[derive(Debug, Default)]
pub struct PrintFielder {
    line: String,
}

impl PrintFielder {
    pub fn take_line(&mut self) -> String {
        std::mem::take(&mut self.line)
    }
}

impl Fielder for PrintFielder {
    fn start(&mut self, _row: usize) { self.line.clear(); }

    fn accept_bool(&mut self, v: bool) {
        let _ = write!(self.line, "<{}>", u8::from(v));
    }
    fn accept_int(&mut self, v: i64) {
        let _ = write!(self.line, "<{v}>");
    }
    fn accept_float(&mut self, v: f64) {
        let _ = write!(self.line, "<{v:.6}>");
    }
    fn accept_string(&mut self, v: Option<&str>) {
        let _ = write!(self.line, "<{}>", v.unwrap_or(""));
    }
}

/// 按行缓冲输出；`join_delete` 把另一半的输出接在后面，所以 pmap 下行序不变
#[derive(Debug, Default)]
pub struct PrintRower {
    fielder: PrintFielder,
    output:  String,
}

impl PrintRower {
    pub fn new() -> Self { Self::default() }

    pub fn output(&self) -> &str { &self.output }

    pub fn into_output(self) -> String { self.output }
}

impl Rower for PrintRower {
    fn accept(&mut self, row: &Row) -> bool {
        row.visit(row.get_idx(), &mut self.fielder);
        self.output.push_str(&self.fielder.take_line());
        self.output.push('\n');
        true
    }

    fn clone_worker(&self) -> Self { Self::new() }

    fn join_delete(&mut self, other: Self) {
        self.output.push_str(&other.output);
    }
}

// ── Sum ───────────────────────────────────────────────────────────────────────

/// 单行内 Int 字段之和，每行 `start` 时清零；溢出时回绕
#[derive(Debug, Default, Clone)]
pub struct SumFielder {
    total: i64,
}

impl SumFielder {
    pub fn total(&self) -> i64 { self.total }
}

impl Fielder for SumFielder {
    fn start(&mut self, _row: usize) { self.total = 0; }
    fn accept_int(&mut self, v: i64) { self.total = self.total.wrapping_add(v); }
}

#[derive(Debug, Default)]
pub struct SumRower {
    fielder: SumFielder,
    total:   i64,
}

impl SumRower {
    pub fn new() -> Self { Self::default() }
    pub fn total(&self) -> i64 { self.total }
}

impl Rower for SumRower {
    fn accept(&mut self, row: &Row) -> bool {
        row.visit(row.get_idx(), &mut self.fielder);
        self.total = self.total.wrapping_add(self.fielder.total());
        true
    }

    fn clone_worker(&self) -> Self { Self::new() }

    fn join_delete(&mut self, other: Self) {
        self.total = self.total.wrapping_add(other.total);
    }
}

// ── Increment ─────────────────────────────────────────────────────────────────

/// 把访问到的字段变换后写入自己的输出行；整数 +1 溢出时回绕
#[derive(Debug)]
pub struct IncrementFielder {
    row: Row,
    col: usize,
    ok:  bool,
}

impl IncrementFielder {
    pub fn new(schema: &Schema) -> Self {
        Self { row: Row::new(schema), col: 0, ok: true }
    }

    pub fn row(&self) -> &Row { &self.row }

    fn put(&mut self, v: impl Into<Value>) {
        self.ok &= self.row.set(self.col, v).is_ok();
        self.col += 1;
    }
}

impl Fielder for IncrementFielder {
    fn start(&mut self, row: usize) {
        self.row.set_idx(row);
        self.col = 0;
        self.ok = true;
    }

    fn accept_bool(&mut self, v: bool)  { self.put(!v); }
    fn accept_int(&mut self, v: i64)    { self.put(v.wrapping_add(1)); }
    fn accept_float(&mut self, v: f64)  { self.put(v + 1.0); }
    fn accept_string(&mut self, v: Option<&str>) {
        self.put(Value::Str(v.map(Into::into)));
    }
}

#[derive(Debug)]
pub struct IncrementRower {
    fielder: IncrementFielder,
    output:  DataFrame,
}

impl IncrementRower {
    pub fn new(schema: &Schema) -> Self {
        let mut out_schema = schema.clone();
        out_schema.clear_row_names();
        Self {
            fielder: IncrementFielder::new(&out_schema),
            output:  DataFrame::new(&out_schema),
        }
    }

    pub fn output(&self) -> &DataFrame { &self.output }

    pub fn into_output(self) -> DataFrame { self.output }
}

impl Rower for IncrementRower {
    fn accept(&mut self, row: &Row) -> bool {
        row.visit(row.get_idx(), &mut self.fielder);
        if !self.fielder.ok {
            log::debug!(
                "increment rower: row {} does not match output schema \"{}\", skipped",
                row.get_idx(), self.output.schema().type_string(),
            );
            return false;
        }
        match self.output.add_row(self.fielder.row()) {
            Ok(()) => true,
            Err(e) => {
                log::debug!("increment rower: row {} skipped: {e}", row.get_idx());
                false
            }
        }
    }

    fn clone_worker(&self) -> Self {
        Self::new(self.output.schema())
    }

    // `other` 来自 `clone_worker`，输出 Schema 与 self 相同，append_rows 不会因形状失败；
    // 只有手工构造的 IncrementRower 合并时才可能走到 warn 分支，此时 other 的行被丢弃
    fn join_delete(&mut self, other: Self) {
        if let Err(e) = self.output.append_rows(&other.output) {
            log::warn!("increment rower: dropping merged rows: {e}");
        }
    }
}
