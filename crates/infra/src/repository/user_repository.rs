//! # UserRepository
//!
//! ログインユーザーの検索と初回ログイン時の作成を担当する。

use std::sync::Arc;

use absenz_domain::{
    role::ActorRole,
    user::{User, UserId, Username},
};
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;

use crate::error::InfraError;

/// ユーザーリポジトリトレイト
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ユーザー名で検索する
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError>;

    /// ユーザーが存在しなければ作成する
    ///
    /// 同名のユーザーが既に存在する場合は作成せず、既存ユーザーを返す。
    async fn insert_if_absent(
        &self,
        username: &Username,
        name: &str,
        role: ActorRole,
    ) -> Result<User, InfraError>;
}

/// users テーブルの行
#[derive(sqlx::FromRow)]
struct UserRow {
    id:       i64,
    username: String,
    name:     String,
    role:     String,
}

impl TryFrom<UserRow> for User {
    type Error = InfraError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let to_unexpected = |e: absenz_domain::DomainError| InfraError::unexpected(e.to_string());
        Ok(User::new(
            UserId::new(row.id).map_err(to_unexpected)?,
            Username::new(row.username).map_err(to_unexpected)?,
            row.name,
            row.role.parse::<ActorRole>().map_err(to_unexpected)?,
        ))
    }
}

/// PostgreSQL 実装の UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, name, role FROM users WHERE username = $1")
                .bind(username.as_str())
                .fetch_optional(&self.pool)
                .await?;

        row.map(User::try_from).transpose()
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn insert_if_absent(
        &self,
        username: &Username,
        name: &str,
        role: ActorRole,
    ) -> Result<User, InfraError> {
        // 同時ログインでも一意制約で 1 件に収束させ、既存行を返す
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, name, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (username) DO UPDATE SET username = EXCLUDED.username
            RETURNING id, username, name, role
            "#,
        )
        .bind(username.as_str())
        .bind(name)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;

        User::try_from(row)
    }
}

/// インメモリ実装の UserRepository
///
/// 起動時にデモ用の生徒・教員アカウントを登録しておく。
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    /// シードユーザー入りで作成する
    ///
    /// | username | name | role |
    /// |----------|------|------|
    /// | `student` | Max Mustermann | student |
    /// | `teacher` | Frau Müller | teacher |
    pub fn seeded() -> Result<Self, InfraError> {
        let to_unexpected = |e: absenz_domain::DomainError| InfraError::unexpected(e.to_string());
        let users = vec![
            User::new(
                UserId::new(1).map_err(to_unexpected)?,
                Username::new("student").map_err(to_unexpected)?,
                "Max Mustermann",
                ActorRole::Student,
            ),
            User::new(
                UserId::new(2).map_err(to_unexpected)?,
                Username::new("teacher").map_err(to_unexpected)?,
                "Frau Müller",
                ActorRole::Teacher,
            ),
        ];
        Ok(Self {
            users: Arc::new(Mutex::new(users)),
        })
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, InfraError> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn insert_if_absent(
        &self,
        username: &Username,
        name: &str,
        role: ActorRole,
    ) -> Result<User, InfraError> {
        let mut users = self.users.lock().await;
        if let Some(existing) = users.iter().find(|u| u.username() == username) {
            return Ok(existing.clone());
        }

        let next = users.iter().map(|u| u.id().as_i64()).max().unwrap_or(0) + 1;
        let id = UserId::new(next).map_err(|e| InfraError::unexpected(e.to_string()))?;
        let user = User::new(id, username.clone(), name, role);
        users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn test_シードユーザーを検索できる() {
        let sut = InMemoryUserRepository::seeded().unwrap();

        let teacher = sut
            .find_by_username(&Username::new("teacher").unwrap())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(teacher.name(), "Frau Müller");
        assert_eq!(teacher.role(), ActorRole::Teacher);
    }

    #[tokio::test]
    async fn test_未登録ユーザーは新しいidで作成される() {
        let sut = InMemoryUserRepository::seeded().unwrap();
        let username = Username::new("anna").unwrap();

        let user = sut
            .insert_if_absent(&username, "Schüler anna", ActorRole::Student)
            .await
            .unwrap();

        assert_eq!(user.id().as_i64(), 3);
        assert_eq!(
            sut.find_by_username(&username).await.unwrap(),
            Some(user)
        );
    }

    #[tokio::test]
    async fn test_既存ユーザーは作成されず既存のロールを保つ() {
        let sut = InMemoryUserRepository::seeded().unwrap();

        let user = sut
            .insert_if_absent(
                &Username::new("student").unwrap(),
                "Lehrer student",
                ActorRole::Teacher,
            )
            .await
            .unwrap();

        assert_eq!(user.id().as_i64(), 1);
        assert_eq!(user.role(), ActorRole::Student);
        assert_eq!(user.name(), "Max Mustermann");
    }
}
