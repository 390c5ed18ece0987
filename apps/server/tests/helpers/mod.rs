//! 統合テスト用のヘルパー
//!
//! インメモリのストアと固定時刻でルーターを組み立て、`oneshot` で叩く。

#![allow(dead_code)]

use std::sync::Arc;

use absenz_domain::clock::FixedClock;
use absenz_infra::{
    InMemorySessionManager,
    repository::{InMemoryAbsenceRepository, InMemoryUserRepository},
};
use absenz_server::app_builder::{AppDependencies, build_app};
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

pub fn t1() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_280_000, 0).unwrap()
}

pub fn t2() -> DateTime<Utc> {
    DateTime::from_timestamp(1_709_366_400, 0).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub clock:  Arc<FixedClock>,
}

impl TestApp {
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::new(t1()));
        Self::from_router(build_app(AppDependencies {
            absence_repo:    Arc::new(InMemoryAbsenceRepository::new()),
            user_repo:       Arc::new(InMemoryUserRepository::seeded().unwrap()),
            session_manager: Arc::new(InMemorySessionManager::new()),
            clock:           clock.clone(),
            secure_cookie:   false,
        }), clock)
    }

    /// 設定から組み立てたルーターを使う
    pub fn from_router(router: Router, clock: Arc<FixedClock>) -> Self {
        Self { router, clock }
    }

    /// リクエストを送信し、ステータス・ヘッダー・JSON ボディを返す
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            json,
        }
    }

    /// ログインして `session_id=...` 形式の Cookie を返す
    pub async fn login(&self, username: &str, role: &str) -> String {
        let response = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(serde_json::json!({
                    "username": username,
                    "password": "password",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);

        let set_cookie = response
            .headers
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}

pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: axum::http::HeaderMap,
    pub json:    Value,
}

/// 提出フォームの入力
pub fn absence_form(student_name: &str) -> Value {
    serde_json::json!({
        "studentId": 1,
        "studentName": student_name,
        "studentClass": "2A",
        "profession": "Informatiker",
        "phonePrivate": "079 123 45 67",
        "educationType": "BS",
        "teacherId": 2,
        "teacherName": "Frau Müller",
        "teachers": ["Frau Müller"],
        "absenceType": "Krankheit",
        "dateStart": "2024-03-04",
        "dateEnd": "2024-03-05",
        "reason": "Grippe",
        "lessonCount": "8",
        "location": "Zürich",
        "parentSignature": true,
        "supervisorSignature": false
    })
}
