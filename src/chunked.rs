//! 分块可增长序列
//!
//! ```text
//!   outer (block 引用数组, 容量 outer_capacity)
//!   ┌────┬────┬────┬────┬─ ─ ─ ─┐
//!   │ b0 │ b1 │ b2 │    │ 预留   │
//!   └─┬──┴─┬──┴─┬──┴────┴─ ─ ─ ─┘
//!     ▼    ▼    ▼
//!   [0..B) [B..2B) [2B..len)      每块固定 B = block_capacity 个元素
//! ```
//!
//! - 下标 `i` 落在块 `i / B` 的偏移 `i % B`
//! - 外层数组满时只搬运块引用（固定增量扩容），块内元素从不移动
//! - 最后一块满时才分配新块
//!
//! 因此任何已写入元素的地址在后续 `append` 之后保持不变。

use std::fmt;

use crate::common::{ChunkConfig, FrameError, Result};

pub struct ChunkedVec<T> {
    // 每个内层块的容量恒为 block_capacity，只 push 不超过容量，永不重新分配
    blocks:         Vec<Vec<T>>,
    len:            usize,
    outer_capacity: usize,
    config:         ChunkConfig,
}

impl<T> ChunkedVec<T> {
    pub fn new() -> Self {
        Self::with_config(ChunkConfig::default())
    }

    pub fn with_config(config: ChunkConfig) -> Self {
        let config = ChunkConfig::new()
            .with_block_capacity(config.block_capacity)
            .with_outer_increment(config.outer_increment);
        let outer_capacity = config.outer_increment;
        let mut blocks = Vec::with_capacity(outer_capacity);
        blocks.push(Vec::with_capacity(config.block_capacity));
        Self { blocks, len: 0, outer_capacity, config }
    }

    // ── 形状 ──────────────────────────────────────────────────────────────────

    pub fn len(&self)            -> usize { self.len }
    pub fn is_empty(&self)       -> bool  { self.len == 0 }
    pub fn block_capacity(&self) -> usize { self.config.block_capacity }
    pub fn outer_capacity(&self) -> usize { self.outer_capacity }
    /// 已分配的内层块数
    pub fn block_count(&self)    -> usize { self.blocks.len() }
    pub fn config(&self)         -> ChunkConfig { self.config }

    fn locate(&self, index: usize) -> (usize, usize) {
        let b = self.config.block_capacity;
        (index / b, index % b)
    }

    // ── 增长 ──────────────────────────────────────────────────────────────────

    fn grow_outer(&mut self) {
        let new_capacity = self.outer_capacity + self.config.outer_increment;
        log::trace!(
            "chunked: outer array {} -> {} blocks (len={})",
            self.outer_capacity, new_capacity, self.len,
        );
        // 只搬运块引用，块内载荷原地不动
        self.blocks.reserve_exact(new_capacity - self.blocks.len());
        self.outer_capacity = new_capacity;
    }

    pub fn append(&mut self, value: T) {
        let b = self.config.block_capacity;
        if self.len + 1 > self.outer_capacity * b {
            self.grow_outer();
        }
        if self.len + 1 > self.blocks.len() * b {
            let mut block = Vec::with_capacity(b);
            block.push(value);
            self.blocks.push(block);
        } else if let Some(last) = self.blocks.last_mut() {
            last.push(value);
        }
        self.len += 1;
    }

    // ── 访问 ──────────────────────────────────────────────────────────────────

    pub fn get(&self, index: usize) -> Result<&T> {
        if index >= self.len {
            return Err(FrameError::bounds(index, self.len));
        }
        let (blk, off) = self.locate(index);
        Ok(&self.blocks[blk][off])
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        if index >= self.len {
            return Err(FrameError::bounds(index, self.len));
        }
        let (blk, off) = self.locate(index);
        Ok(&mut self.blocks[blk][off])
    }

    /// 覆盖 `index` 处的元素；`index == len` 时等价于 `append`
    pub fn set(&mut self, value: T, index: usize) -> Result<()> {
        if index == self.len {
            self.append(value);
            return Ok(());
        }
        *self.get_mut(index)? = value;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.blocks.iter().flat_map(|b| b.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.blocks.iter_mut().flat_map(|b| b.iter_mut())
    }
}

impl<T: PartialEq> ChunkedVec<T> {
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    /// 第一个相等元素的下标
    pub fn index_of(&self, value: &T) -> Option<usize> {
        self.iter().position(|v| v == value)
    }
}

impl<T: Clone> ChunkedVec<T> {
    /// 逐个深拷贝 `other` 的元素追加到末尾；`None` 时什么也不做
    pub fn append_all(&mut self, other: Option<&ChunkedVec<T>>) {
        let Some(other) = other else { return };
        for v in other.iter() {
            self.append(v.clone());
        }
    }
}

// ── trait 实现 ────────────────────────────────────────────────────────────────

impl<T> Default for ChunkedVec<T> {
    fn default() -> Self { Self::new() }
}

// 手写 Clone：派生实现会把内层块按长度而非 block_capacity 分配
impl<T: Clone> Clone for ChunkedVec<T> {
    fn clone(&self) -> Self {
        let mut out = Self::with_config(self.config);
        out.append_all(Some(self));
        out
    }
}

// 逐元素沿用 `T: PartialEq`，所以裸 `ChunkedVec<f64>` 含 NaN 时不自反；
// 表和列的相等走 `TypedColumn` 的 `FieldValue::same`，那一层是自反的
impl<T: PartialEq> PartialEq for ChunkedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for ChunkedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Extend<T> for ChunkedVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.append(v);
        }
    }
}

impl<T> FromIterator<T> for ChunkedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut out = Self::new();
        out.extend(iter);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn tiny() -> ChunkConfig {
        ChunkConfig::new().with_block_capacity(4).with_outer_increment(2)
    }

    #[test]
    fn fresh_container_has_one_block() {
        let v: ChunkedVec<i64> = ChunkedVec::new();
        assert_eq!(v.len(), 0);
        assert_eq!(v.block_count(), 1);
        assert_eq!(v.outer_capacity(), 16);
        assert_eq!(v.block_capacity(), 8);
    }

    #[test]
    fn append_across_growth_events() {
        let mut v = ChunkedVec::with_config(tiny());
        // 4 * 2 = 8 个元素后外层第一次扩容，之后每 8 个再扩一次
        for i in 0..37i64 {
            v.append(i);
        }
        assert_eq!(v.len(), 37);
        assert_eq!(v.block_count(), 10);
        assert_eq!(v.outer_capacity(), 10);
        assert!(v.len() <= v.block_count() * v.block_capacity());
        assert!(v.block_count() <= v.outer_capacity());
        for i in 0..37 {
            assert_eq!(*v.get(i).unwrap(), i as i64);
        }
    }

    #[test]
    fn element_addresses_survive_growth() {
        let mut v = ChunkedVec::with_config(tiny());
        for i in 0..5i64 {
            v.append(i);
        }
        let before: Vec<*const i64> = (0..5).map(|i| v.get(i).unwrap() as *const i64).collect();
        for i in 5..200i64 {
            v.append(i);
        }
        for (i, p) in before.into_iter().enumerate() {
            let now = v.get(i).unwrap();
            assert!(std::ptr::eq(p, now));
            assert_eq!(*now, i as i64);
        }
    }

    #[test]
    fn set_at_len_appends_get_at_len_fails() {
        let mut v = ChunkedVec::new();
        v.append(true);
        v.set(false, 1).unwrap();
        assert_eq!(v.len(), 2);
        v.set(true, 1).unwrap();
        assert!(*v.get(1).unwrap());
        assert!(matches!(v.get(2), Err(FrameError::OutOfBounds { index: 2, len: 2 })));
        assert!(matches!(v.set(true, 5), Err(FrameError::OutOfBounds { index: 5, len: 2 })));
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn contains_and_index_of_count_every_element() {
        let mut v = ChunkedVec::with_config(tiny());
        v.extend((0..20).map(|i| i as f64 * 0.5));
        assert!(v.contains(&9.5));
        assert_eq!(v.index_of(&9.5), Some(19));
        assert_eq!(v.index_of(&2.0), Some(4));
        assert_eq!(v.index_of(&100.0), None);
        assert!(!v.contains(&0.25));
    }

    #[test]
    fn missing_strings_match_by_absence() {
        let mut v: ChunkedVec<Option<Arc<str>>> = ChunkedVec::new();
        v.append(Some(Arc::from("a")));
        v.append(None);
        assert!(v.contains(&None));
        assert_eq!(v.index_of(&None), Some(1));
        assert_eq!(v.index_of(&Some(Arc::from("a"))), Some(0));
    }

    #[test]
    fn equality_rules() {
        let a: ChunkedVec<i64> = ChunkedVec::new();
        let b: ChunkedVec<i64> = ChunkedVec::with_config(tiny());
        assert_eq!(a, b);

        let x: ChunkedVec<i64> = (0..10).collect();
        let mut y: ChunkedVec<i64> = ChunkedVec::with_config(tiny());
        y.extend(0..10);
        assert_eq!(x, y);
        y.append(10);
        assert_ne!(x, y);
        let z: ChunkedVec<i64> = (0..9).chain(std::iter::once(42)).collect();
        assert_ne!(x, z);
    }

    #[test]
    fn append_all_copies_and_ignores_none() {
        let src: ChunkedVec<Option<Arc<str>>> =
            vec![Some(Arc::from("x")), None, Some(Arc::from("y"))].into_iter().collect();
        let mut dst: ChunkedVec<Option<Arc<str>>> = ChunkedVec::new();
        dst.append_all(None);
        assert!(dst.is_empty());
        dst.append_all(Some(&src));
        assert_eq!(dst, src);
        dst.set(Some(Arc::from("z")), 0).unwrap();
        assert_eq!(src.get(0).unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn clone_keeps_block_shape() {
        let mut v = ChunkedVec::with_config(tiny());
        v.extend(0..9i64);
        let c = v.clone();
        assert_eq!(c, v);
        assert_eq!(c.block_capacity(), 4);
        assert_eq!(c.block_count(), v.block_count());
    }
}
