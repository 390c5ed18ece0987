//! # 選択肢ハンドラ

use absenz_domain::catalog::DropdownOptions;
use absenz_shared::ApiResponse;
use axum::Json;

/// GET /api/dropdowns
///
/// 欠席届フォームのクラス・職種・教員・欠席種別の選択肢を返す。
#[tracing::instrument(skip_all)]
pub async fn list_dropdowns() -> Json<ApiResponse<DropdownOptions>> {
    Json(ApiResponse::new(DropdownOptions::standard()))
}
