//! # Absenz サーバー
//!
//! 欠席届ワークフローの HTTP API サーバー。
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────────────┐
//! │   Browser    │────▶│ absenz-server│────▶│ memory / JSON / PG   │
//! └──────────────┘     └──────────────┘     └──────────────────────┘
//!                             │
//!                             ▼
//!                      ┌──────────────┐
//!                      │ memory/Redis │
//!                      │  (Session)   │
//!                      └──────────────┘
//! ```
//!
//! 環境変数は [`absenz_server::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（.env ファイルを使用）
//! cargo run -p absenz-server
//!
//! # PostgreSQL + Redis
//! STORAGE_BACKEND=postgres DATABASE_URL=postgres://... \
//!   SESSION_BACKEND=redis REDIS_URL=redis://... cargo run -p absenz-server --release
//! ```

use std::net::SocketAddr;

use absenz_server::{
    app_builder::{AppDependencies, build_app},
    config::AppConfig,
};
use absenz_shared::observability::{TracingConfig, init_tracing};
use anyhow::Context;
use tokio::net::TcpListener;

/// サーバーのエントリーポイント
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. 依存の初期化とルーターの構築
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 本番環境では .env を置かず、環境変数を直接設定する
    dotenvy::dotenv().ok();

    init_tracing(TracingConfig::from_env("absenz-server"));
    let _tracing_guard = tracing::info_span!("app", service = "absenz-server").entered();

    let config = AppConfig::from_env().context("設定の読み込みに失敗しました")?;
    tracing::info!("サーバーを起動します: {}:{}", config.host, config.port);

    let deps = AppDependencies::from_config(&config).await?;
    let app = build_app(deps);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("バインドアドレスが不正です")?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("{} にバインドできませんでした", addr))?;
    tracing::info!("リクエストを待ち受けます: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
