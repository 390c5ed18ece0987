//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュールで re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、ビジネスロジックはユースケースに委譲
//!
//! ## ハンドラ一覧
//!
//! - `health`: ヘルスチェック
//! - `auth`: ログイン・ログアウト・現在のユーザー
//! - `dropdown`: フォーム用の選択肢
//! - `absence`: 欠席届の提出・一覧・取得・ステータス変更

pub mod absence;
pub mod auth;
pub mod dropdown;
pub mod health;

pub use absence::{
    AbsenceHandlerState,
    create_absence,
    get_absence,
    list_absences,
    transition_absence,
};
pub use auth::{AuthHandlerState, SESSION_COOKIE_NAME, login, logout, me};
pub use dropdown::list_dropdowns;
pub use health::health_check;
