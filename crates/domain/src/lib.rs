//! # Absenz ドメイン層
//!
//! 欠席届ワークフローのドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **エンティティ**: 一意の識別子を持つオブジェクト（例: Absence, User）
//! - **値オブジェクト**: 識別子を持たない不変オブジェクト（例: AbsenceStatus, Version）
//! - **ドメインエラー**: ビジネスルール違反を表現するエラー型
//!
//! ## 依存関係の方向
//!
//! ```text
//! server → infra → domain
//! ```
//!
//! ドメイン層はインフラ層（DB、セッションストア）には一切依存しない。
//! 現在時刻も [`clock::Clock`] 経由で外から受け取る。
//!
//! ## モジュール構成
//!
//! - [`absence`] - 欠席届エンティティとステータス遷移表
//! - [`catalog`] - フォーム用の固定選択肢
//! - [`error`] - ドメイン層で発生するエラーの定義
//! - [`role`] - 操作者ロール
//! - [`user`] - ユーザーとログイン入力の値オブジェクト
//!
//! ## 使用例
//!
//! ```rust
//! use absenz_domain::{DomainError, absence::AbsenceStatus};
//!
//! assert!(AbsenceStatus::Pending.can_transition_to(AbsenceStatus::Approved));
//!
//! let error = DomainError::NotFound {
//!     entity_type: "Absence",
//!     id:          "42".to_string(),
//! };
//! assert!(error.to_string().contains("42"));
//! ```

#[macro_use]
mod macros;

pub mod absence;
pub mod catalog;
pub mod clock;
pub mod error;
pub mod role;
pub mod user;
pub mod value_objects;

pub use error::DomainError;
