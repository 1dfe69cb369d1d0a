//! Rower：整行访问者
//!
//! - `accept` 的返回值只在 `filter` 中有意义（是否保留该行）
//! - `clone_worker` 为并行遍历派生一个独立 worker，不得与原 Rower 共享可变状态
//! - `join_delete` 是用户定义的 reduce：把 `other` 的累积结果并入 `self`，
//!   `other` 按值传入，合并后即被销毁
//!
//! Rower 只拿到 `&Row`，遍历期间无法写回表。

use crate::row::Row;

pub trait Rower {
    fn accept(&mut self, row: &Row) -> bool;

    fn clone_worker(&self) -> Self
    where
        Self: Sized;

    fn join_delete(&mut self, other: Self)
    where
        Self: Sized;
}

/// 把闭包包装成 Rower；适合 `filter` 这类无累积状态的用法
#[derive(Clone)]
pub struct FnRower<F>(pub F);

impl<F> Rower for FnRower<F>
where
    F: FnMut(&Row) -> bool + Clone,
{
    fn accept(&mut self, row: &Row) -> bool { (self.0)(row) }

    fn clone_worker(&self) -> Self { self.clone() }

    fn join_delete(&mut self, _other: Self) {}
}
