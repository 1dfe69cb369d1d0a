//! DataFrame：由等长列组成的表
//!
//! ```text
//!            Schema "IBFS"
//!   ┌────────┬────────┬────────┬────────┐
//!   │ Int    │ Bool   │ Float  │ String │   columns: ChunkedVec<Column>
//!   ├────────┼────────┼────────┼────────┤
//!   │  …     │  …     │  …     │  …     │   nrows 行，各列长度恒等
//!   └────────┴────────┴────────┴────────┘
//!        │  fill_row(i) / add_row
//!        ▼
//!       Row ──visit──▶ Fielder          Rower::accept(&Row)
//! ```
//!
//! 所有会失败的操作都先校验再修改，返回 `Err` 时表保持原样。

use std::io::{self, Write};
use std::ops::Range;
use std::sync::Arc;

use crate::chunked::ChunkedVec;
use crate::column::Column;
use crate::common::{ChunkConfig, FrameError, Result};
use crate::field_type::{TypeTag, Value};
use crate::row::Row;
use crate::rower::Rower;
use crate::rowers::PrintRower;
use crate::schema::Schema;

#[derive(Debug, Clone)]
pub struct DataFrame {
    schema:  Schema,
    columns: ChunkedVec<Column>,
    nrows:   usize,
    config:  ChunkConfig,
}

fn mismatch(expected: TypeTag, col: &Column) -> FrameError {
    FrameError::TypeMismatch { expected, found: col.get_type() }
}

/// 把列用缺失值补齐到 `nrows`
fn pad_to(col: &mut Column, nrows: usize) {
    while col.size() < nrows {
        col.append_missing();
    }
}

impl DataFrame {
    // ── 构造 ──────────────────────────────────────────────────────────────────

    /// 按 Schema 为每个类型标签建一个空列
    pub fn new(schema: &Schema) -> Self {
        Self::with_config(schema, ChunkConfig::default())
    }

    pub fn with_config(schema: &Schema, config: ChunkConfig) -> Self {
        let mut columns = ChunkedVec::with_config(config);
        for &tag in schema.types() {
            columns.append(Column::with_config(tag, config));
        }
        Self { schema: schema.clone(), columns, nrows: 0, config }
    }

    /// 复制 `other` 的所有列与行数，清空行名
    pub fn copy_shape(other: &DataFrame) -> Self {
        let mut columns = ChunkedVec::with_config(other.config);
        columns.append_all(Some(&other.columns));
        let mut schema = other.schema.clone();
        schema.clear_row_names();
        Self { schema, columns, nrows: other.nrows, config: other.config }
    }

    // ── 形状 ──────────────────────────────────────────────────────────────────

    pub fn schema(&self) -> &Schema { &self.schema }
    pub fn nrows(&self)  -> usize   { self.nrows }
    pub fn ncols(&self)  -> usize   { self.columns.len() }
    pub fn config(&self) -> ChunkConfig { self.config }

    pub fn column(&self, col: usize) -> Result<&Column> {
        self.columns.get(col)
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.iter()
    }

    /// 列名 → 下标
    pub fn get_col(&self, name: &str) -> Option<usize> {
        self.schema.col_idx(name)
    }

    /// 行名 → 下标
    pub fn get_row(&self, name: &str) -> Option<usize> {
        self.schema.row_idx(name)
    }

    fn check_shape(&self, row: &Row) -> Result<()> {
        if row.types() != self.schema.types() {
            return Err(FrameError::ShapeMismatch {
                expected: self.schema.type_string(),
                found:    row.type_string(),
            });
        }
        Ok(())
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.nrows {
            return Err(FrameError::bounds(row, self.nrows));
        }
        Ok(())
    }

    // ── 列操作 ────────────────────────────────────────────────────────────────

    /// 追加一列（`None` 视为空参数错误）。
    ///
    /// - 比 `nrows` 短：先补齐到 `nrows`
    /// - 比 `nrows` 长：`nrows` 增长到该列长度，已有各列全部补齐
    pub fn add_column(
        &mut self,
        col:  impl Into<Option<Column>>,
        name: Option<&str>,
    ) -> Result<()> {
        let mut col = col.into().ok_or(FrameError::NullArgument("column"))?;
        let size = col.size();
        if size < self.nrows {
            log::debug!("add_column: padding new column {} -> {}", size, self.nrows);
            pad_to(&mut col, self.nrows);
        } else if size > self.nrows {
            log::debug!(
                "add_column: nrows {} -> {}, padding {} existing columns",
                self.nrows, size, self.columns.len(),
            );
            self.nrows = size;
            for existing in self.columns.iter_mut() {
                pad_to(existing, size);
            }
        }
        let tag = col.get_type();
        self.columns.append(col);
        if self.columns.len() > self.schema.width() {
            self.schema.add_column(tag, name);
        }
        Ok(())
    }

    /// 用缺失值把 `col` 补齐到当前行数
    pub fn pad_column(&self, col: &mut Column) {
        pad_to(col, self.nrows);
    }

    // ── 单元格读写 ────────────────────────────────────────────────────────────

    fn typed_column(&self, col: usize, want: TypeTag) -> Result<&Column> {
        let c = self.columns.get(col)?;
        if c.get_type() != want {
            return Err(mismatch(want, c));
        }
        Ok(c)
    }

    pub fn get_int(&self, col: usize, row: usize) -> Result<i64> {
        let c = self.columns.get(col)?;
        c.as_int().ok_or_else(|| mismatch(TypeTag::Int, c))?.get(row)
    }

    pub fn get_bool(&self, col: usize, row: usize) -> Result<bool> {
        let c = self.columns.get(col)?;
        c.as_bool().ok_or_else(|| mismatch(TypeTag::Bool, c))?.get(row)
    }

    pub fn get_float(&self, col: usize, row: usize) -> Result<f64> {
        let c = self.columns.get(col)?;
        c.as_float().ok_or_else(|| mismatch(TypeTag::Float, c))?.get(row)
    }

    pub fn get_string(&self, col: usize, row: usize) -> Result<Option<Arc<str>>> {
        let c = self.columns.get(col)?;
        c.as_string().ok_or_else(|| mismatch(TypeTag::Str, c))?.get(row)
    }

    /// 覆盖已有单元格；`row` 必须小于 `nrows`
    pub fn set(&mut self, col: usize, row: usize, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        self.typed_column(col, value.type_tag())?;
        self.check_row(row)?;
        self.columns.get_mut(col)?.set_value(row, value)
    }

    // ── 行操作 ────────────────────────────────────────────────────────────────

    /// 把第 `idx` 行的值拷进 `row`；`row` 的类型序列必须与表一致
    pub fn fill_row(&self, idx: usize, row: &mut Row) -> Result<()> {
        self.check_shape(row)?;
        self.check_row(idx)?;
        for (j, col) in self.columns.iter().enumerate() {
            row.set(j, col.value_at(idx)?)?;
        }
        Ok(())
    }

    pub fn add_row(&mut self, row: &Row) -> Result<()> {
        self.check_shape(row)?;
        for (col, v) in self.columns.iter_mut().zip(row.values()) {
            col.push_back(v.clone())?;
        }
        self.nrows += 1;
        Ok(())
    }

    /// 逐行追加 `other` 的全部行
    pub fn append_rows(&mut self, other: &DataFrame) -> Result<()> {
        if other.schema.types() != self.schema.types() {
            return Err(FrameError::ShapeMismatch {
                expected: self.schema.type_string(),
                found:    other.schema.type_string(),
            });
        }
        let mut row = Row::new(&self.schema);
        for i in 0..other.nrows {
            other.fill_row(i, &mut row)?;
            self.add_row(&row)?;
        }
        Ok(())
    }

    // ── 遍历 ──────────────────────────────────────────────────────────────────

    fn map_range<R: Rower + ?Sized>(&self, range: Range<usize>, r: &mut R) -> Result<()> {
        let mut row = Row::new(&self.schema);
        for i in range {
            row.set_idx(i);
            self.fill_row(i, &mut row)?;
            r.accept(&row);
        }
        Ok(())
    }

    /// 按行号升序顺序访问每一行
    pub fn map<R: Rower + ?Sized>(&self, r: &mut R) -> Result<()> {
        self.map_range(0..self.nrows, r)
    }

    /// 两路并行 map：`[0, n/2)` 由 `r` 处理，`[n/2, n)` 由 `r.clone_worker()` 处理，
    /// 两个线程都结束后执行 `r.join_delete(clone)`
    pub fn pmap<R: Rower + Send>(&self, r: &mut R) -> Result<()> {
        self.pmap_n(r, 2)
    }

    /// N 路并行 map：第 k 段为 `[k*n/w, (k+1)*n/w)`；
    /// 第 0 段用 `r`，其余段各用一个 `clone_worker()`，最后按段序依次 `join_delete`
    pub fn pmap_n<R: Rower + Send>(&self, r: &mut R, workers: usize) -> Result<()> {
        let workers = if workers == 0 {
            log::warn!("pmap_n: zero workers requested, using 1");
            1
        } else {
            workers
        };
        let n = self.nrows;
        let ranges: Vec<Range<usize>> = (0..workers)
            .map(|k| (k * n / workers)..((k + 1) * n / workers))
            .collect();
        log::debug!("pmap: {} rows split into {:?}", n, ranges);

        let clones: Vec<R> = (1..workers).map(|_| r.clone_worker()).collect();

        let (head, tail) = std::thread::scope(|s| {
            let first_range = ranges[0].clone();
            let head = s.spawn(|| self.map_range(first_range, &mut *r));
            let handles: Vec<_> = clones
                .into_iter()
                .zip(ranges[1..].iter().cloned())
                .map(|(mut worker, range)| {
                    s.spawn(move || {
                        let res = self.map_range(range, &mut worker);
                        (worker, res)
                    })
                })
                .collect();
            // 必须逐个 join：未 join 的 panic 会让 scope 本身 panic
            let head = head.join();
            let tail: Vec<_> = handles.into_iter().map(|h| h.join()).collect();
            (head, tail)
        });

        head.map_err(|_| FrameError::WorkerPanicked)??;
        let mut finished = Vec::with_capacity(tail.len());
        for joined in tail {
            let (worker, res) = joined.map_err(|_| FrameError::WorkerPanicked)?;
            res?;
            finished.push(worker);
        }
        log::debug!("pmap: {} workers finished, merging", finished.len() + 1);
        for worker in finished {
            r.join_delete(worker);
        }
        Ok(())
    }

    /// 返回由 `accept` 为 true 的行组成的新表，保持行序
    pub fn filter<R: Rower + ?Sized>(&self, r: &mut R) -> Result<DataFrame> {
        let mut schema = self.schema.clone();
        schema.clear_row_names();
        let mut out = DataFrame::with_config(&schema, self.config);
        let mut row = Row::new(&self.schema);
        for i in 0..self.nrows {
            row.set_idx(i);
            self.fill_row(i, &mut row)?;
            if r.accept(&row) {
                out.add_row(&row)?;
            }
        }
        log::debug!("filter: kept {} of {} rows", out.nrows, self.nrows);
        Ok(out)
    }

    // ── 输出 ──────────────────────────────────────────────────────────────────

    /// 每行一行 `<v0><v1>…`，最后多一个空行
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        let mut pr = PrintRower::new();
        self.map(&mut pr)?;
        w.write_all(pr.output().as_bytes())?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }

    pub fn print(&self) -> Result<()> {
        self.write_to(io::stdout().lock())
    }
}

impl PartialEq for DataFrame {
    fn eq(&self, other: &Self) -> bool {
        self.nrows == other.nrows
            && self.schema.types() == other.schema.types()
            && self.columns == other.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rowers::SumRower;

    fn ibfs_frame() -> DataFrame {
        let schema = Schema::parse("IBFS").unwrap();
        let mut df = DataFrame::new(&schema);
        let mut row = Row::new(&schema);
        for i in 0..5 {
            row.set(0, i).unwrap();
            row.set(1, i % 2 == 0).unwrap();
            row.set(2, i as f64 / 2.0).unwrap();
            row.set(3, format!("s{i}")).unwrap();
            df.add_row(&row).unwrap();
        }
        df
    }

    #[test]
    fn new_frame_has_one_empty_column_per_tag() {
        let df = DataFrame::new(&Schema::parse("IBFS").unwrap());
        assert_eq!(df.ncols(), 4);
        assert_eq!(df.nrows(), 0);
        let tags: Vec<_> = df.columns().map(Column::get_type).collect();
        assert_eq!(tags, TypeTag::ALL);
    }

    #[test]
    fn typed_get_and_set() {
        let mut df = ibfs_frame();
        assert_eq!(df.get_int(0, 3).unwrap(), 3);
        assert!(df.get_bool(1, 2).unwrap());
        assert_eq!(df.get_float(2, 3).unwrap(), 1.5);
        assert_eq!(df.get_string(3, 4).unwrap().as_deref(), Some("s4"));

        df.set(0, 3, 99).unwrap();
        assert_eq!(df.get_int(0, 3).unwrap(), 99);
        assert!(matches!(
            df.get_float(0, 0),
            Err(FrameError::TypeMismatch { expected: TypeTag::Float, found: TypeTag::Int })
        ));
        assert!(matches!(df.set(1, 0, 1.0), Err(FrameError::TypeMismatch { .. })));
        assert!(matches!(df.set(0, 5, 1), Err(FrameError::OutOfBounds { index: 5, len: 5 })));
        assert!(matches!(df.get_int(0, 5), Err(FrameError::OutOfBounds { .. })));
        assert!(matches!(df.get_int(9, 0), Err(FrameError::OutOfBounds { index: 9, len: 4 })));
        assert_eq!(df.nrows(), 5);
    }

    #[test]
    fn add_column_rejects_none() {
        let mut df = ibfs_frame();
        let before = df.clone();
        assert!(matches!(df.add_column(None, Some("x")), Err(FrameError::NullArgument(_))));
        assert_eq!(df, before);
    }

    #[test]
    fn shape_mismatch_leaves_frame_untouched() {
        let mut df = ibfs_frame();
        let before = df.clone();
        let wrong = Row::new(&Schema::parse("IBF").unwrap());
        let err = df.add_row(&wrong).unwrap_err();
        match err {
            FrameError::ShapeMismatch { expected, found } => {
                assert_eq!(expected, "IBFS");
                assert_eq!(found, "IBF");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(df, before);
        let mut wrong = Row::new(&Schema::parse("SFBI").unwrap());
        assert!(matches!(df.fill_row(0, &mut wrong), Err(FrameError::ShapeMismatch { .. })));
    }

    #[test]
    fn copy_shape_clones_columns_and_drops_row_names() {
        let mut schema = Schema::parse("I").unwrap();
        schema.add_row(Some("r0"));
        let mut df = DataFrame::new(&schema);
        df.add_column(Column::from_ints([1, 2, 3]), None).unwrap();
        assert_eq!(df.get_row("r0"), Some(0));

        let mut copy = DataFrame::copy_shape(&df);
        assert_eq!(copy.nrows(), 3);
        assert_eq!(copy.get_row("r0"), None);
        copy.set(1, 0, 100).unwrap();
        assert_eq!(df.get_int(1, 0).unwrap(), 1);
    }

    #[test]
    fn pmap_with_more_workers_than_rows() {
        let mut df = DataFrame::new(&Schema::new());
        df.add_column(Column::from_ints([5, 6, 7]), None).unwrap();
        let mut sum = SumRower::new();
        df.pmap_n(&mut sum, 8).unwrap();
        assert_eq!(sum.total(), 18);
        let mut sum = SumRower::new();
        df.pmap_n(&mut sum, 0).unwrap();
        assert_eq!(sum.total(), 18);
    }

    #[test]
    fn frame_with_nan_equals_its_clone() {
        let mut df = DataFrame::new(&Schema::new());
        df.add_column(Column::from_floats([f64::NAN, 1.0]), None).unwrap();
        assert_eq!(df, df.clone());
        assert_eq!(DataFrame::copy_shape(&df), df);
    }

    #[test]
    fn append_rows_checks_shape() {
        let mut a = ibfs_frame();
        let b = ibfs_frame();
        a.append_rows(&b).unwrap();
        assert_eq!(a.nrows(), 10);
        assert_eq!(a.get_string(3, 9).unwrap().as_deref(), Some("s4"));
        let other = DataFrame::new(&Schema::parse("I").unwrap());
        assert!(matches!(a.append_rows(&other), Err(FrameError::ShapeMismatch { .. })));
    }
}
