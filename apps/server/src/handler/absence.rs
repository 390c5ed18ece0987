//! # 欠席届ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /api/absences` - 欠席届の提出（生徒のみ）
//! - `GET /api/absences?status=` - 欠席届の一覧（教員のみ）
//! - `GET /api/absences/{id}` - 欠席届の取得
//! - `PATCH /api/absences/{id}/status` - ステータス変更（教員のみ）
//!
//! 操作者のロールは常にセッションから取り出す。リクエストボディのロールや
//! 処理日時は使わない。ボディ・パス・クエリの解釈に失敗した場合は 400 を返す。

use std::sync::Arc;

use absenz_domain::{
    absence::{AbsenceDetails, AbsenceRecord},
    role::ActorRole,
};
use absenz_infra::SessionData;
use absenz_shared::ApiResponse;
use axum::{
    Extension,
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;

use crate::{error::CoreError, usecase::AbsenceUseCaseImpl};

/// 欠席届ハンドラの共有状態
pub struct AbsenceHandlerState {
    pub usecase: AbsenceUseCaseImpl,
}

/// 一覧のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListAbsencesQuery {
    pub status: Option<String>,
}

/// ステータス変更リクエスト
///
/// 旧クライアントが送る `processedDate` は読み捨てる。
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    #[serde(default)]
    pub status: String,
}

/// POST /api/absences
#[tracing::instrument(skip_all)]
pub async fn create_absence(
    State(state): State<Arc<AbsenceHandlerState>>,
    Extension(session): Extension<SessionData>,
    WithRejection(Json(details), _): WithRejection<Json<AbsenceDetails>, CoreError>,
) -> Result<impl IntoResponse, CoreError> {
    let absence = state
        .usecase
        .create_absence(details, session.role())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(absence.to_record())),
    ))
}

/// GET /api/absences
#[tracing::instrument(skip_all, fields(status = ?query.status))]
pub async fn list_absences(
    State(state): State<Arc<AbsenceHandlerState>>,
    Extension(session): Extension<SessionData>,
    WithRejection(Query(query), _): WithRejection<Query<ListAbsencesQuery>, CoreError>,
) -> Result<Json<ApiResponse<Vec<AbsenceRecord>>>, CoreError> {
    session
        .role()
        .require(ActorRole::Teacher, "欠席届の一覧取得")?;

    let absences = state
        .usecase
        .list_absences(query.status.as_deref())
        .await?;

    Ok(Json(ApiResponse::new(
        absences.iter().map(|a| a.to_record()).collect(),
    )))
}

/// GET /api/absences/{id}
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_absence(
    State(state): State<Arc<AbsenceHandlerState>>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, CoreError>,
) -> Result<Json<ApiResponse<AbsenceRecord>>, CoreError> {
    let absence = state.usecase.get_absence(id).await?;

    Ok(Json(ApiResponse::new(absence.to_record())))
}

/// PATCH /api/absences/{id}/status
///
/// ```json
/// { "status": "approved" }
/// ```
#[tracing::instrument(skip_all, fields(%id))]
pub async fn transition_absence(
    State(state): State<Arc<AbsenceHandlerState>>,
    Extension(session): Extension<SessionData>,
    WithRejection(Path(id), _): WithRejection<Path<i64>, CoreError>,
    WithRejection(Json(req), _): WithRejection<Json<TransitionRequest>, CoreError>,
) -> Result<Json<ApiResponse<AbsenceRecord>>, CoreError> {
    let absence = state
        .usecase
        .transition_absence(id, &req.status, session.role())
        .await?;

    Ok(Json(ApiResponse::new(absence.to_record())))
}
