//! # JSON ファイルストアでの起動テスト
//!
//! 設定から依存を組み立て、再起動後も欠席届が残ることを検証する。

mod helpers;

use std::sync::Arc;

use absenz_domain::clock::FixedClock;
use absenz_server::{
    app_builder::{AppDependencies, build_app},
    config::{AppConfig, SessionBackend, StorageBackend},
};
use axum::http::{Method, StatusCode};
use helpers::{TestApp, absence_form, t1};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn config(dir: &TempDir) -> AppConfig {
    AppConfig {
        host:          "127.0.0.1".to_string(),
        port:          0,
        storage:       StorageBackend::JsonFile {
            path: dir.path().join("data/absences.json"),
        },
        session:       SessionBackend::Memory,
        secure_cookie: false,
    }
}

async fn start(config: &AppConfig) -> TestApp {
    let deps = AppDependencies::from_config(config).await.unwrap();
    TestApp::from_router(build_app(deps), Arc::new(FixedClock::new(t1())))
}

#[tokio::test]
async fn test_再起動後も提出済みの欠席届を取得できる() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let first = start(&config).await;
    let student = first.login("student", "student").await;
    let created = first
        .send(
            Method::POST,
            "/api/absences",
            Some(&student),
            Some(absence_form("Max Mustermann")),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.json["data"]["id"].as_i64().unwrap();

    let second = start(&config).await;
    let teacher = second.login("teacher", "teacher").await;
    let fetched = second
        .send(Method::GET, &format!("/api/absences/{id}"), Some(&teacher), None)
        .await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json["data"], created.json["data"]);
    assert!(dir.path().join("data/absences.json").exists());
}
