//! Influencer listing, deletion and ad-hoc filtering.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use infdb_core::{compile_filter, FilterCondition, FilterMode};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{extracted, json_body, ApiError, ApiResponse, AppState, ErrorKind};

#[derive(Debug, Deserialize)]
pub(super) struct FilterRequest {
    pub filters: Vec<FilterCondition>,
}

pub(super) async fn list_influencers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::InfluencerRow>>> {
    let rows = infdb_db::or_default(
        "list_influencers",
        infdb_db::list_influencers(&state.pool).await,
    );
    Json(ApiResponse::new(rows, req_id.0))
}

/// `DELETE /api/v1/influencers/{influencer_id}`
///
/// A delete that removes nothing (unknown id, or accounts still reference the
/// influencer) answers `rejected` with the store's explanation.
pub(super) async fn delete_influencer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    influencer_id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let Path(influencer_id) = extracted(rid, influencer_id)?;

    let outcome = infdb_db::delete_influencer(&state.pool, influencer_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, influencer_id, "delete_influencer failed");
            ApiError::new(
                rid.as_str(),
                ErrorKind::WriteFailed,
                format!("influencer {influencer_id} could not be deleted"),
            )
        })?;

    if !outcome.success {
        let message = outcome
            .message
            .unwrap_or_else(|| format!("influencer {influencer_id} was not deleted"));
        return Err(ApiError::new(rid.as_str(), ErrorKind::Rejected, message));
    }

    tracing::info!(influencer_id, "influencer deleted");
    Ok(Json(ApiResponse::new(
        serde_json::json!({ "deleted": true }),
        req_id.0.clone(),
    )))
}

/// `POST /api/v1/influencers/filter/{mode}`
///
/// `all` joins conditions with their own conjunctions (AND by default);
/// `any` joins every condition with OR.
pub(super) async fn filter_influencers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    mode: Result<Path<FilterMode>, PathRejection>,
    body: Result<Json<FilterRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<infdb_db::InfluencerRow>>>, ApiError> {
    let rid = &req_id.0;
    let Path(mode) = extracted(rid, mode)?;
    let body = json_body(rid, body)?;

    let compiled = compile_filter(&body.filters, mode)
        .map_err(|e| ApiError::validation(rid.as_str(), e.to_string()))?;

    let rows = infdb_db::or_default(
        "filter_influencers",
        infdb_db::filter_influencers(&state.pool, &compiled).await,
    );
    Ok(Json(ApiResponse::new(rows, req_id.0.clone())))
}
