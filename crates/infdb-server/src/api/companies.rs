use axum::{extract::State, Extension, Json};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

pub(super) async fn list_companies(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::CompanyRow>>> {
    let rows = infdb_db::or_default("list_companies", infdb_db::list_companies(&state.pool).await);
    Json(ApiResponse::new(rows, req_id.0))
}
