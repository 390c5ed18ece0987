//! # Absenz サーバーライブラリ
//!
//! 欠席届ワークフローの HTTP サーバーを構成するモジュールを公開する。
//! 統合テストは [`app_builder::build_app`] でルーターを組み立てて利用する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod usecase;
