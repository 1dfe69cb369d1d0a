//! 全局基础类型、配置与错误定义

use thiserror::Error;

use crate::field_type::TypeTag;

// ── 常量 ──────────────────────────────────────────────────────────────────────

/// 每个内层块容纳的元素数（默认）
pub const DEFAULT_BLOCK_CAPACITY:  usize = 8;
/// 外层指针数组每次扩容的增量（默认，同时是初始容量）
pub const DEFAULT_OUTER_INCREMENT: usize = 16;

// ── ChunkConfig ───────────────────────────────────────────────────────────────

/// 分块容器的形状参数，由 DataFrame 下发到每一列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    pub block_capacity:  usize,
    pub outer_increment: usize,
}

impl ChunkConfig {
    pub fn new() -> Self {
        Self {
            block_capacity:  DEFAULT_BLOCK_CAPACITY,
            outer_increment: DEFAULT_OUTER_INCREMENT,
        }
    }

    /// 0 会被提升为 1
    pub fn with_block_capacity(mut self, n: usize) -> Self {
        self.block_capacity = n.max(1); self
    }
    pub fn with_outer_increment(mut self, n: usize) -> Self {
        self.outer_increment = n.max(1); self
    }
}

impl Default for ChunkConfig {
    fn default() -> Self { Self::new() }
}

// ── 错误 ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: TypeTag, found: TypeTag },
    #[error("shape mismatch: expected schema \"{expected}\", found \"{found}\"")]
    ShapeMismatch { expected: String, found: String },
    #[error("index out of bounds: index={index} len={len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("required argument is absent: {0}")]
    NullArgument(&'static str),
    #[error("invalid type tag: {0:?}")]
    InvalidTypeTag(char),
    #[error("pmap worker thread panicked")]
    WorkerPanicked,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl FrameError {
    pub(crate) fn bounds(index: usize, len: usize) -> Self {
        Self::OutOfBounds { index, len }
    }
}

pub type Result<T> = std::result::Result<T, FrameError>;
