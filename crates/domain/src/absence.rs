//! # 欠席届
//!
//! 生徒が提出し、教員が審査する欠席届を定義する。
//!
//! ## 状態遷移
//!
//! ```text
//! pending ─┬─→ approved ──→ expired
//!          ├─→ rejected
//!          ├─→ under_review ──┬─→ approved / rejected / expired
//!          ├─→ awaiting_docs ─┘
//!          └─→ expired
//! ```
//!
//! `rejected` と `expired` は終端状態。自己遷移と `pending` への復帰は存在しない。

mod details;
mod entity;
mod status;

pub use details::*;
pub use entity::*;
pub use status::*;
