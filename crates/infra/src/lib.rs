//! # Absenz インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: PostgreSQL への接続プールとマイグレーション
//! - **リポジトリ実装**: 欠席届・ユーザーの永続化（インメモリ / JSON ファイル / PostgreSQL）
//! - **セッション管理**: ログインセッションの保存（インメモリ / Redis）
//!
//! ## 依存関係
//!
//! ```text
//! server → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`session`] - セッション管理

pub mod db;
pub mod error;
pub mod repository;
pub mod session;

pub use error::{InfraError, InfraErrorKind};
pub use session::{InMemorySessionManager, RedisSessionManager, SessionData, SessionManager};
