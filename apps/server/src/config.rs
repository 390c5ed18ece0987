//! # サーバー設定
//!
//! 環境変数からサーバーの設定を読み込む。
//!
//! | 変数名 | デフォルト | 説明 |
//! |--------|-----------|------|
//! | `APP_HOST` | `0.0.0.0` | バインドアドレス |
//! | `APP_PORT` | `3000` | ポート番号 |
//! | `STORAGE_BACKEND` | `json` | `memory` / `json` / `postgres` |
//! | `ABSENCE_DATA_FILE` | `data/absences.json` | `json` 使用時の保存先 |
//! | `DATABASE_URL` | - | `postgres` 使用時は必須 |
//! | `SESSION_BACKEND` | `memory` | `memory` / `redis` |
//! | `REDIS_URL` | - | `redis` 使用時は必須 |
//! | `ENV` | - | `production` でセッション Cookie に Secure を付与 |

use std::{env, path::PathBuf};

use thiserror::Error;

/// 欠席届の保存先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// プロセス内メモリ（再起動で消える）
    Memory,
    /// JSON ファイル
    JsonFile { path: PathBuf },
    /// PostgreSQL
    Postgres { database_url: String },
}

/// セッションの保存先
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis { redis_url: String },
}

/// サーバーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host:          String,
    pub port:          u16,
    pub storage:       StorageBackend,
    pub session:       SessionBackend,
    /// セッション Cookie に Secure 属性を付けるか
    pub secure_cookie: bool,
}

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} が設定されていません")]
    Missing { name: &'static str },

    #[error("{name} の値が不正です: {value}")]
    Invalid { name: &'static str, value: String },
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// 任意の変数ソースから設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| lookup(name).ok_or(ConfigError::Missing { name });

        let port = match lookup("APP_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "APP_PORT", value })?,
            None => 3000,
        };

        let storage = match lookup("STORAGE_BACKEND").as_deref().unwrap_or("json") {
            "memory" => StorageBackend::Memory,
            "json" => StorageBackend::JsonFile {
                path: lookup("ABSENCE_DATA_FILE")
                    .unwrap_or_else(|| "data/absences.json".to_string())
                    .into(),
            },
            "postgres" => StorageBackend::Postgres {
                database_url: required("DATABASE_URL")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name:  "STORAGE_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        let session = match lookup("SESSION_BACKEND").as_deref().unwrap_or("memory") {
            "memory" => SessionBackend::Memory,
            "redis" => SessionBackend::Redis {
                redis_url: required("REDIS_URL")?,
            },
            other => {
                return Err(ConfigError::Invalid {
                    name:  "SESSION_BACKEND",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            host: lookup("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            storage,
            session,
            secure_cookie: lookup("ENV").as_deref() == Some("production"),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_未設定ならデフォルト値になる() {
        let config = load(&[]).unwrap();

        assert_eq!(
            config,
            AppConfig {
                host:          "0.0.0.0".to_string(),
                port:          3000,
                storage:       StorageBackend::JsonFile {
                    path: PathBuf::from("data/absences.json"),
                },
                session:       SessionBackend::Memory,
                secure_cookie: false,
            }
        );
    }

    #[test]
    fn test_postgresとredisを選択できる() {
        let config = load(&[
            ("STORAGE_BACKEND", "postgres"),
            ("DATABASE_URL", "postgres://localhost/absenz"),
            ("SESSION_BACKEND", "redis"),
            ("REDIS_URL", "redis://localhost:6379"),
            ("ENV", "production"),
        ])
        .unwrap();

        assert_eq!(
            config.storage,
            StorageBackend::Postgres {
                database_url: "postgres://localhost/absenz".to_string(),
            }
        );
        assert_eq!(
            config.session,
            SessionBackend::Redis {
                redis_url: "redis://localhost:6379".to_string(),
            }
        );
        assert!(config.secure_cookie);
    }

    #[test]
    fn test_postgres選択時にdatabase_urlがなければエラー() {
        let result = load(&[("STORAGE_BACKEND", "postgres")]);

        assert_eq!(result, Err(ConfigError::Missing { name: "DATABASE_URL" }));
    }

    #[rstest]
    #[case("APP_PORT", "abc")]
    #[case("STORAGE_BACKEND", "sqlite")]
    #[case("SESSION_BACKEND", "memcached")]
    fn test_不正な値はinvalidエラー(#[case] name: &'static str, #[case] value: &str) {
        let result = load(&[(name, value)]);

        assert_eq!(
            result,
            Err(ConfigError::Invalid {
                name,
                value: value.to_string(),
            })
        );
    }
}
