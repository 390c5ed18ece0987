//! # 認証ユースケース
//!
//! ログイン・ログアウトを実装する。
//!
//! パスワードは形式のみを検証し、照合は行わない。
//! 未登録のユーザー名でログインした場合はその場でユーザーを作成する。
//! 既存ユーザーは保存済みのロールを保ち、入力されたロールは使わない。

use std::sync::Arc;

use absenz_domain::{
    DomainError,
    role::ActorRole,
    user::{User, Username, validate_password},
};
use absenz_infra::{SessionData, SessionManager, repository::UserRepository};
use absenz_shared::{event_log::event, log_business_event};

use crate::error::CoreError;

/// ログイン入力
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub role:     String,
}

/// 認証ユースケース実装
pub struct AuthUseCaseImpl {
    user_repo:       Arc<dyn UserRepository>,
    session_manager: Arc<dyn SessionManager>,
}

impl AuthUseCaseImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_manager: Arc<dyn SessionManager>,
    ) -> Self {
        Self {
            user_repo,
            session_manager,
        }
    }

    /// ログインしてセッションを作成する
    ///
    /// 戻り値はセッション ID と、セッションに保存した内容。
    pub async fn login(&self, input: LoginInput) -> Result<(String, SessionData), CoreError> {
        let (username, role) = match Self::validate(&input) {
            Ok(validated) => validated,
            Err(e) => {
                log_business_event!(
                    event.category = event::category::AUTH,
                    event.action = event::action::LOGIN_FAILURE,
                    event.entity_type = event::entity_type::USER,
                    event.result = event::result::FAILURE,
                    event.reason = "validation",
                    "ログイン失敗: 入力不正"
                );
                return Err(e.into());
            }
        };

        let user = self.find_or_create(&username, role).await?;

        let session_data = SessionData::new(
            user.id(),
            user.username().as_str().to_string(),
            user.name().to_string(),
            user.role(),
        );
        let session_id = self.session_manager.create(&session_data).await?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGIN_SUCCESS,
            event.entity_type = event::entity_type::USER,
            event.entity_id = %user.id(),
            event.actor_role = %user.role(),
            event.result = event::result::SUCCESS,
            "ログイン成功"
        );

        Ok((session_id, session_data))
    }

    /// セッションを削除する
    ///
    /// セッションがない、または既に削除済みでも成功する。
    pub async fn logout(&self, session_id: Option<&str>) -> Result<(), CoreError> {
        let Some(session_id) = session_id else {
            return Ok(());
        };

        self.session_manager.delete(session_id).await?;

        log_business_event!(
            event.category = event::category::AUTH,
            event.action = event::action::LOGOUT,
            event.entity_type = event::entity_type::SESSION,
            event.result = event::result::SUCCESS,
            "ログアウト"
        );

        Ok(())
    }

    /// セッションを取得する
    pub async fn current_session(
        &self,
        session_id: &str,
    ) -> Result<Option<SessionData>, CoreError> {
        Ok(self.session_manager.get(session_id).await?)
    }

    fn validate(input: &LoginInput) -> Result<(Username, ActorRole), DomainError> {
        let username = Username::new(input.username.as_str())?;
        validate_password(&input.password)?;
        let role: ActorRole = input.role.parse()?;
        Ok((username, role))
    }

    async fn find_or_create(&self, username: &Username, role: ActorRole) -> Result<User, CoreError> {
        if let Some(user) = self.user_repo.find_by_username(username).await? {
            return Ok(user);
        }

        let name = User::first_login_name(username, role);
        Ok(self
            .user_repo
            .insert_if_absent(username, &name, role)
            .await?)
    }
}
