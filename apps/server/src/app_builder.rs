//! # アプリケーション構築
//!
//! 依存（リポジトリ・セッションストア・時計）の初期化とルーター構築を担当する。
//! `main.rs` は設定読み込みとサーバー起動に集中する。

use std::sync::Arc;

use absenz_domain::clock::{Clock, SystemClock};
use absenz_infra::{
    InMemorySessionManager,
    RedisSessionManager,
    SessionManager,
    db,
    repository::{
        AbsenceRepository,
        InMemoryAbsenceRepository,
        InMemoryUserRepository,
        JsonFileAbsenceRepository,
        PostgresAbsenceRepository,
        PostgresUserRepository,
        UserRepository,
    },
};
use absenz_shared::observability::{MakeRequestUuidV7, make_request_span};
use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, patch, post},
};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::{
    config::{AppConfig, SessionBackend, StorageBackend},
    handler::{
        AbsenceHandlerState,
        AuthHandlerState,
        create_absence,
        get_absence,
        health_check,
        list_absences,
        list_dropdowns,
        login,
        logout,
        me,
        transition_absence,
    },
    middleware::{SessionState, require_session},
    usecase::{AbsenceUseCaseImpl, AuthUseCaseImpl},
};

/// アプリケーションの依存
pub struct AppDependencies {
    pub absence_repo:    Arc<dyn AbsenceRepository>,
    pub user_repo:       Arc<dyn UserRepository>,
    pub session_manager: Arc<dyn SessionManager>,
    pub clock:           Arc<dyn Clock>,
    pub secure_cookie:   bool,
}

impl AppDependencies {
    /// 設定に従って各ストアへ接続する
    ///
    /// PostgreSQL を使う場合はマイグレーションも適用する。
    /// ユーザーは PostgreSQL 以外ではプロセス内メモリに保持する。
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let absence_repo: Arc<dyn AbsenceRepository>;
        let user_repo: Arc<dyn UserRepository>;

        match &config.storage {
            StorageBackend::Memory => {
                absence_repo = Arc::new(InMemoryAbsenceRepository::new());
                user_repo = Arc::new(InMemoryUserRepository::seeded()?);
            }
            StorageBackend::JsonFile { path } => {
                let repo = JsonFileAbsenceRepository::open(path.clone())
                    .await
                    .with_context(|| format!("{} を開けませんでした", path.display()))?;
                tracing::info!(path = %repo.path().display(), "JSON ファイルストアを使用します");
                absence_repo = Arc::new(repo);
                user_repo = Arc::new(InMemoryUserRepository::seeded()?);
            }
            StorageBackend::Postgres { database_url } => {
                let pool = db::create_pool(database_url)
                    .await
                    .context("PostgreSQL への接続に失敗しました")?;
                db::run_migrations(&pool)
                    .await
                    .context("マイグレーションの適用に失敗しました")?;
                absence_repo = Arc::new(PostgresAbsenceRepository::new(pool.clone()));
                user_repo = Arc::new(PostgresUserRepository::new(pool));
            }
        }

        let session_manager: Arc<dyn SessionManager> = match &config.session {
            SessionBackend::Memory => Arc::new(InMemorySessionManager::new()),
            SessionBackend::Redis { redis_url } => Arc::new(
                RedisSessionManager::new(redis_url)
                    .await
                    .context("Redis への接続に失敗しました")?,
            ),
        };

        Ok(Self {
            absence_repo,
            user_repo,
            session_manager,
            clock: Arc::new(SystemClock),
            secure_cookie: config.secure_cookie,
        })
    }
}

/// ルーターを構築する
///
/// | パス | セッション |
/// |------|-----------|
/// | `/health`, `/api/dropdowns`, `/api/auth/login`, `/api/auth/logout` | 不要 |
/// | `/api/auth/me`, `/api/absences/**` | 必須 |
pub fn build_app(deps: AppDependencies) -> Router {
    let session_state = SessionState {
        session_manager: deps.session_manager.clone(),
    };

    let auth_state = Arc::new(AuthHandlerState {
        usecase:       AuthUseCaseImpl::new(deps.user_repo, deps.session_manager),
        secure_cookie: deps.secure_cookie,
    });

    let absence_state = Arc::new(AbsenceHandlerState {
        usecase: AbsenceUseCaseImpl::new(deps.absence_repo, deps.clock),
    });

    Router::new()
        .route("/health", get(health_check))
        .route("/api/dropdowns", get(list_dropdowns))
        .merge(
            Router::new()
                .route("/api/auth/login", post(login))
                .route("/api/auth/logout", post(logout))
                .with_state(auth_state),
        )
        .merge(
            Router::new()
                .route("/api/auth/me", get(me))
                .layer(from_fn_with_state(session_state.clone(), require_session)),
        )
        .merge(
            Router::new()
                .route("/api/absences", get(list_absences).post(create_absence))
                .route("/api/absences/{id}", get(get_absence))
                .route("/api/absences/{id}/status", patch(transition_absence))
                .layer(from_fn_with_state(session_state, require_session))
                .with_state(absence_state),
        )
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
