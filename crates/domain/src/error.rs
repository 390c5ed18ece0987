//! # ドメイン層エラー定義
//!
//! ビジネスルール違反やドメイン固有の例外状態を表現するエラー型。
//!
//! ## エラーの種類と HTTP ステータスの対応
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値・ステータス値の検証失敗 |
//! | `Unauthorized` | 403 Forbidden | 操作者のロールが操作に適合しない |
//! | `NotFound` | 404 Not Found | エンティティが存在しない |
//! | `InvalidTransition` | 409 Conflict | 遷移表にないステータス遷移 |
//! | `Conflict` | 409 Conflict | 楽観的ロックの失敗 |
//!
//! ## 使用例
//!
//! ```rust
//! use absenz_domain::DomainError;
//!
//! fn find_absence(id: i64) -> Result<(), DomainError> {
//!     Err(DomainError::NotFound {
//!         entity_type: "Absence",
//!         id:          id.to_string(),
//!     })
//! }
//!
//! assert!(find_absence(42).is_err());
//! ```

use thiserror::Error;

use crate::absence::AbsenceStatus;

/// ドメイン層で発生するエラー
///
/// ワークフローの各操作はこのエラーを同期的に呼び出し元へ返す。
/// いずれもリクエスト単位で回復可能であり、プロセスを停止させるものはない。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// バリデーションエラー
    ///
    /// - 必須フィールドが未入力
    /// - 列挙値に存在しないステータス・ロール
    /// - 不変条件を満たさない永続化データ
    #[error("バリデーションエラー: {0}")]
    Validation(String),

    /// エンティティが見つからない
    #[error("{entity_type} が見つかりません: {id}")]
    NotFound {
        /// エンティティの種類（"Absence", "User" など）
        entity_type: &'static str,
        /// 検索に使用した識別子
        id:          String,
    },

    /// 不正なステータス遷移
    ///
    /// 遷移表で許可されていない遷移を要求した場合に使用する。
    /// 同じ遷移を再送した場合も、既に状態が進んでいればこのエラーになる。
    #[error("{from} から {to} へは遷移できません")]
    InvalidTransition {
        from: AbsenceStatus,
        to:   AbsenceStatus,
    },

    /// 操作者のロールが操作を許可されていない
    ///
    /// 認証（誰か）ではなく認可（何ができるか）の失敗を表す。
    #[error("権限がありません: {0}")]
    Unauthorized(String),

    /// 競合エラー（楽観的ロック失敗）
    ///
    /// 読み取り後に別のリクエストが同じ欠席届を更新した場合に発生する。
    /// クライアントは最新データを再取得してから再度操作する必要がある。
    #[error("競合が発生しました: {0}")]
    Conflict(String),
}
