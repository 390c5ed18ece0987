//! # セッション管理
//!
//! ログイン中のユーザーを Cookie のセッション ID から引くためのストア。
//!
//! ## Redis キー設計
//!
//! | キー | 値 | TTL |
//! |-----|-----|-----|
//! | `session:{session_id}` | SessionData (JSON) | 86400秒（24時間） |
//!
//! Redis を使わない構成では [`InMemorySessionManager`] を使う。
//! こちらは取得時に有効期限を確認し、期限切れのセッションを破棄する。

use std::{collections::HashMap, sync::Arc};

use absenz_domain::{role::ActorRole, user::UserId};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use redis::{AsyncCommands, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::InfraError;

/// セッションの有効期限（秒）
/// 24時間 = 86400秒
pub const SESSION_TTL_SECONDS: u64 = 86400;

/// セッションデータ
///
/// ログイン成功時に作成され、ログアウトまたは TTL 経過で削除される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
   user_id: UserId,
   username: String,
   name: String,
   role: ActorRole,
   created_at: DateTime<Utc>,
}

impl SessionData {
   /// 新しいセッションデータを作成する
   ///
   /// `created_at` は現在時刻で初期化される。
   pub fn new(user_id: UserId, username: String, name: String, role: ActorRole) -> Self {
      Self {
         user_id,
         username,
         name,
         role,
         created_at: Utc::now(),
      }
   }

   pub fn user_id(&self) -> UserId {
      self.user_id
   }

   pub fn username(&self) -> &str {
      &self.username
   }

   pub fn name(&self) -> &str {
      &self.name
   }

   pub fn role(&self) -> ActorRole {
      self.role
   }

   pub fn created_at(&self) -> DateTime<Utc> {
      self.created_at
   }
}

/// セッション管理トレイト
#[async_trait]
pub trait SessionManager: Send + Sync {
   /// セッションを作成し、セッション ID（UUID v4）を返す
   async fn create(&self, data: &SessionData) -> Result<String, InfraError>;

   /// セッションを取得する
   ///
   /// 存在しない、または期限切れの場合は `None`。
   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError>;

   /// セッションを削除する
   ///
   /// 存在しないセッションを削除しても成功とする。
   async fn delete(&self, session_id: &str) -> Result<(), InfraError>;
}

/// Redis を使用したセッションマネージャ
pub struct RedisSessionManager {
   conn: ConnectionManager,
}

impl RedisSessionManager {
   /// 新しい RedisSessionManager を作成する
   ///
   /// - `redis_url`: Redis 接続 URL（例: `redis://localhost:6379`）
   pub async fn new(redis_url: &str) -> Result<Self, InfraError> {
      let client = redis::Client::open(redis_url)?;
      let conn = ConnectionManager::new(client).await?;
      Ok(Self { conn })
   }

   fn session_key(session_id: &str) -> String {
      format!("session:{}", session_id)
   }

   /// セッションの TTL（残り秒数）を取得する
   pub async fn get_ttl(&self, session_id: &str) -> Result<Option<i64>, InfraError> {
      let mut conn = self.conn.clone();
      let ttl: i64 = conn.ttl(Self::session_key(session_id)).await?;

      // -2: キーなし、-1: TTL 未設定
      if ttl < 0 { Ok(None) } else { Ok(Some(ttl)) }
   }
}

#[async_trait]
impl SessionManager for RedisSessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      let session_id = Uuid::new_v4().to_string();
      let json = serde_json::to_string(data)?;

      let mut conn = self.conn.clone();
      let _: () = conn
         .set_ex(Self::session_key(&session_id), json, SESSION_TTL_SECONDS)
         .await?;

      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let mut conn = self.conn.clone();
      let result: Option<String> = conn.get(Self::session_key(session_id)).await?;

      match result {
         Some(json) => Ok(Some(serde_json::from_str(&json)?)),
         None => Ok(None),
      }
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      let mut conn = self.conn.clone();
      let _: () = conn.del(Self::session_key(session_id)).await?;
      Ok(())
   }
}

/// プロセス内メモリのセッションマネージャ
#[derive(Clone)]
pub struct InMemorySessionManager {
   sessions: Arc<Mutex<HashMap<String, (SessionData, DateTime<Utc>)>>>,
   ttl: TimeDelta,
}

impl Default for InMemorySessionManager {
   fn default() -> Self {
      Self::with_ttl(TimeDelta::seconds(SESSION_TTL_SECONDS as i64))
   }
}

impl InMemorySessionManager {
   pub fn new() -> Self {
      Self::default()
   }

   /// 有効期限を指定して作成する
   pub fn with_ttl(ttl: TimeDelta) -> Self {
      Self {
         sessions: Arc::new(Mutex::new(HashMap::new())),
         ttl,
      }
   }
}

#[async_trait]
impl SessionManager for InMemorySessionManager {
   async fn create(&self, data: &SessionData) -> Result<String, InfraError> {
      let session_id = Uuid::new_v4().to_string();
      let expires_at = Utc::now() + self.ttl;
      self.sessions
         .lock()
         .await
         .insert(session_id.clone(), (data.clone(), expires_at));
      Ok(session_id)
   }

   async fn get(&self, session_id: &str) -> Result<Option<SessionData>, InfraError> {
      let mut sessions = self.sessions.lock().await;
      match sessions.get(session_id) {
         Some((data, expires_at)) if *expires_at > Utc::now() => Ok(Some(data.clone())),
         Some(_) => {
            sessions.remove(session_id);
            Ok(None)
         }
         None => Ok(None),
      }
   }

   async fn delete(&self, session_id: &str) -> Result<(), InfraError> {
      self.sessions.lock().await.remove(session_id);
      Ok(())
   }
}
