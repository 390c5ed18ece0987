//! # 認証ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/auth/login` - ログイン（セッション Cookie を設定）
//! - `POST /api/auth/logout` - ログアウト（セッション Cookie を削除）
//! - `GET /api/auth/me` - 現在のユーザー情報を取得

use std::sync::Arc;

use absenz_domain::role::ActorRole;
use absenz_infra::{SessionData, session::SESSION_TTL_SECONDS};
use absenz_shared::ApiResponse;
use axum::{
    Extension,
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::{
    CookieJar,
    WithRejection,
    cookie::{Cookie, SameSite},
};
use serde::{Deserialize, Serialize};

use crate::{
    error::CoreError,
    usecase::{AuthUseCaseImpl, LoginInput},
};

/// Cookie 名
pub const SESSION_COOKIE_NAME: &str = "session_id";

/// 認証ハンドラの共有状態
pub struct AuthHandlerState {
    pub usecase:       AuthUseCaseImpl,
    /// セッション Cookie に Secure 属性を付けるか
    pub secure_cookie: bool,
}

// --- リクエスト/レスポンス型 ---

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role:     String,
}

/// ユーザー情報
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id:       i64,
    pub username: String,
    pub name:     String,
    pub role:     ActorRole,
}

impl From<&SessionData> for UserResponse {
    fn from(session: &SessionData) -> Self {
        Self {
            id:       session.user_id().as_i64(),
            username: session.username().to_string(),
            name:     session.name().to_string(),
            role:     session.role(),
        }
    }
}

/// ログインレスポンスデータ
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponseData {
    pub user: UserResponse,
}

// --- Cookie ヘルパー ---

fn build_session_cookie(session_id: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, session_id))
        .path("/")
        .max_age(time::Duration::seconds(SESSION_TTL_SECONDS as i64))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

fn build_clear_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// --- ハンドラ ---

/// POST /api/auth/login
///
/// ```json
/// { "username": "student", "password": "password", "role": "student" }
/// ```
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<Arc<AuthHandlerState>>,
    jar: CookieJar,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let (session_id, session) = state
        .usecase
        .login(LoginInput {
            username: req.username,
            password: req.password,
            role:     req.role,
        })
        .await?;

    let jar = jar.add(build_session_cookie(session_id, state.secure_cookie));
    let body = ApiResponse::new(LoginResponseData {
        user: UserResponse::from(&session),
    });

    Ok((StatusCode::OK, jar, Json(body)))
}

/// POST /api/auth/logout
///
/// セッションがなくても 204 を返す。
#[tracing::instrument(skip_all)]
pub async fn logout(
    State(state): State<Arc<AuthHandlerState>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, CoreError> {
    let session_id = jar.get(SESSION_COOKIE_NAME).map(|c| c.value().to_string());
    state.usecase.logout(session_id.as_deref()).await?;

    let jar = jar.add(build_clear_cookie(state.secure_cookie));
    Ok((StatusCode::NO_CONTENT, jar))
}

/// GET /api/auth/me
#[tracing::instrument(skip_all)]
pub async fn me(Extension(session): Extension<SessionData>) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::new(UserResponse::from(&session)))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(true)]
    #[case(false)]
    fn test_セッションcookieの属性(#[case] secure: bool) {
        let cookie = build_session_cookie("abc".to_string(), secure);

        assert_eq!(cookie.name(), "session_id");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(secure));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86400)));
    }

    #[test]
    fn test_クリア用cookieは即時失効する() {
        let cookie = build_clear_cookie(false);

        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
