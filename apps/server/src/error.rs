//! # サーバーエラー定義
//!
//! ユースケース・ハンドラで発生するエラーと、HTTP レスポンス（RFC 9457）への変換を定義する。
//!
//! | バリアント | HTTP ステータス |
//! |-----------|----------------|
//! | `BadRequest` | 400 |
//! | `Unauthenticated` | 401 |
//! | `Forbidden` | 403 |
//! | `NotFound` | 404 |
//! | `InvalidTransition` | 409 |
//! | `Conflict` | 409 |
//! | `Database` / `Internal` | 500（detail は固定値） |
//!
//! axum の抽出器（`Json` / `Path` / `Query`）の失敗も `BadRequest` に変換し、
//! 同じ Problem Details 形式で返す。ハンドラは `WithRejection<_, CoreError>` で受け取る。

use absenz_domain::DomainError;
use absenz_infra::InfraError;
use absenz_shared::{ErrorResponse, event_log::error as log_error};
use axum::{
   Json,
   extract::rejection::{JsonRejection, PathRejection, QueryRejection},
   http::StatusCode,
   response::{IntoResponse, Response},
};
use thiserror::Error;

/// サーバーで発生するエラー
#[derive(Debug, Error)]
pub enum CoreError {
   /// リソースが見つからない
   #[error("リソースが見つかりません: {0}")]
   NotFound(String),

   /// 不正なリクエスト（入力値の検証失敗）
   #[error("不正なリクエスト: {0}")]
   BadRequest(String),

   /// セッションがない、または期限切れ
   #[error("認証が必要です: {0}")]
   Unauthenticated(String),

   /// ロールが操作を許可されていない
   #[error("権限がありません: {0}")]
   Forbidden(String),

   /// 遷移表にないステータス遷移
   #[error("{0}")]
   InvalidTransition(String),

   /// 競合（楽観的ロック失敗）
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// ストアのエラー
   #[error("ストアエラー: {0}")]
   Database(InfraError),

   /// 内部エラー
   #[error("内部エラー: {0}")]
   Internal(String),
}

impl From<DomainError> for CoreError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => CoreError::BadRequest(msg),
         e @ DomainError::NotFound { .. } => CoreError::NotFound(e.to_string()),
         e @ DomainError::InvalidTransition { .. } => CoreError::InvalidTransition(e.to_string()),
         DomainError::Unauthorized(msg) => CoreError::Forbidden(msg),
         DomainError::Conflict(msg) => CoreError::Conflict(msg),
      }
   }
}

impl From<InfraError> for CoreError {
   fn from(err: InfraError) -> Self {
      match err.as_conflict() {
         Some((entity, id)) => CoreError::Conflict(format!(
            "{}(id={}) は他のリクエストによって更新されました。最新の状態を取得してください",
            entity, id
         )),
         None => CoreError::Database(err),
      }
   }
}

impl From<JsonRejection> for CoreError {
   fn from(rejection: JsonRejection) -> Self {
      CoreError::BadRequest(format!("リクエストボディが不正です: {}", rejection.body_text()))
   }
}

impl From<PathRejection> for CoreError {
   fn from(rejection: PathRejection) -> Self {
      CoreError::BadRequest(format!("パスパラメータが不正です: {}", rejection.body_text()))
   }
}

impl From<QueryRejection> for CoreError {
   fn from(rejection: QueryRejection) -> Self {
      CoreError::BadRequest(format!("クエリパラメータが不正です: {}", rejection.body_text()))
   }
}

impl IntoResponse for CoreError {
   fn into_response(self) -> Response {
      let body = match self {
         CoreError::NotFound(msg) => ErrorResponse::not_found(msg),
         CoreError::BadRequest(msg) => ErrorResponse::validation_error(msg),
         CoreError::Unauthenticated(msg) => ErrorResponse::unauthorized(msg),
         CoreError::Forbidden(msg) => ErrorResponse::forbidden(msg),
         CoreError::InvalidTransition(msg) => ErrorResponse::invalid_transition(msg),
         CoreError::Conflict(msg) => ErrorResponse::conflict(msg),
         CoreError::Database(e) => {
            tracing::error!(
               error.category = log_error::category::INFRASTRUCTURE,
               error.kind = log_error::kind::STORAGE,
               span_trace = %e.span_trace(),
               "ストアエラー: {}",
               e
            );
            ErrorResponse::internal_error()
         }
         CoreError::Internal(msg) => {
            tracing::error!(
               error.category = log_error::category::INFRASTRUCTURE,
               error.kind = log_error::kind::INTERNAL,
               "内部エラー: {}",
               msg
            );
            ErrorResponse::internal_error()
         }
      };

      let status =
         StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
      (status, Json(body)).into_response()
   }
}
