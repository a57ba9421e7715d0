use axum::{extract::State, Extension, Json};

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

pub(super) async fn list_posts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::PostRow>>> {
    let rows = infdb_db::or_default("list_posts", infdb_db::list_posts(&state.pool).await);
    Json(ApiResponse::new(rows, req_id.0))
}
