//! # olap-dataframe
//!
//! 内存列式表引擎：分块存储 + 类型化列 + 行访问协议（Fielder / Rower）。
//!
//! ## 整体架构
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      DataFrame                           │
//! │   map / pmap(2 路) / pmap_n / filter / print            │
//! │   ┌───────────┐   ┌──────────────────────────────────┐  │
//! │   │  Schema   │   │  ChunkedVec<Column>              │  │
//! │   │  "IBFS"   │   │   Column::Int   (ChunkedVec<i64>) │  │
//! │   │  列名/行名 │   │   Column::Bool  (ChunkedVec<bool>)│  │
//! │   └───────────┘   │   Column::Float (ChunkedVec<f64>) │  │
//! │                   │   Column::Str   (ChunkedVec<..>)  │  │
//! │                   └──────────────────────────────────┘  │
//! │        │ fill_row / add_row                              │
//! │       Row ──visit──▶ Fielder (逐字段)                    │
//! │        └──accept──▶ Rower (逐行, clone_worker/join_delete)│
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use olap_dataframe::{DataFrame, Row, Schema, SumRower};
//!
//! let schema = Schema::parse("I").unwrap();
//! let mut df = DataFrame::new(&schema);
//! let mut row = Row::new(&schema);
//! for i in 0..100 {
//!     row.set(0, i).unwrap();
//!     df.add_row(&row).unwrap();
//! }
//! let mut sum = SumRower::new();
//! df.pmap(&mut sum).unwrap();
//! assert_eq!(sum.total(), 4950);
//! ```

// ── 基础 ──────────────────────────────────────────────────────────────────────
pub mod common;
pub mod field_type;
pub mod chunked;

// ── 表结构 ────────────────────────────────────────────────────────────────────
pub mod schema;
pub mod column;
pub mod table;

// ── 访问协议 ──────────────────────────────────────────────────────────────────
pub mod row;
pub mod rower;
pub mod rowers;

pub use chunked::ChunkedVec;
pub use column::{BoolColumn, Column, FloatColumn, IntColumn, StringColumn, TypedColumn};
pub use common::{ChunkConfig, FrameError, Result};
pub use field_type::{FieldValue, TypeTag, Value};
pub use row::{Fielder, Row};
pub use rower::{FnRower, Rower};
pub use rowers::{IncrementFielder, IncrementRower, PrintFielder, PrintRower, SumFielder, SumRower};
pub use schema::Schema;
pub use table::DataFrame;
