//! # セッションミドルウェア
//!
//! Cookie `session_id` からセッションを取得し、リクエストの extensions に格納する。
//! セッションがない、または期限切れの場合は 401 を返す。
//!
//! ロールによる認可はここでは行わない。ワークフローの各操作が
//! セッションのロールを引数として受け取り、自身で検査する。
//!
//! ```rust,ignore
//! Router::new()
//!     .route("/api/absences", post(create_absence))
//!     .layer(from_fn_with_state(session_state, require_session))
//! ```

use std::sync::Arc;

use absenz_infra::SessionManager;
use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use crate::{error::CoreError, handler::SESSION_COOKIE_NAME};

/// セッションミドルウェアの状態
#[derive(Clone)]
pub struct SessionState {
    pub session_manager: Arc<dyn SessionManager>,
}

/// セッション必須ミドルウェア
pub async fn require_session(
    State(state): State<SessionState>,
    jar: CookieJar,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let Some(cookie) = jar.get(SESSION_COOKIE_NAME) else {
        return CoreError::Unauthenticated("ログインが必要です".to_string()).into_response();
    };

    match state.session_manager.get(cookie.value()).await {
        Ok(Some(session)) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Ok(None) => CoreError::Unauthenticated("セッションが無効です".to_string()).into_response(),
        Err(e) => CoreError::from(e).into_response(),
    }
}
