//! # ユースケース層
//!
//! ハンドラから呼ばれ、ドメインモデルとリポジトリを組み合わせて処理を行う。
//! 操作者のロールと現在時刻は引数・Clock で受け取り、セッションや Cookie には依存しない。

pub mod absence;
pub mod auth;
mod helpers;

pub use absence::AbsenceUseCaseImpl;
pub use auth::{AuthUseCaseImpl, LoginInput};
