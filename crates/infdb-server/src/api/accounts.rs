//! `GET /api/v1/accounts` and `POST /api/v1/accounts`.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{json_body, number_or_string, ApiError, ApiResponse, AppState, ErrorKind};

/// Body for a new account. The short form field names
/// (`platform`, `influencer`, `followers`, `date`) are accepted as aliases,
/// and numeric fields may arrive as text.
#[derive(Debug, Deserialize)]
pub(super) struct InsertAccountRequest {
    pub username: String,
    #[serde(alias = "platform")]
    pub platform_name: String,
    #[serde(alias = "influencer", deserialize_with = "number_or_string")]
    pub influencer_id: i32,
    #[serde(alias = "followers", deserialize_with = "number_or_string")]
    pub follower_count: i32,
    /// ISO `yyyy-mm-dd`.
    #[serde(alias = "date")]
    pub activation_date: NaiveDate,
}

pub(super) async fn list_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::AccountRow>>> {
    let rows = infdb_db::or_default("list_accounts", infdb_db::list_accounts(&state.pool).await);
    Json(ApiResponse::new(rows, req_id.0))
}

pub(super) async fn insert_account(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<InsertAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, body)?;

    let username = body.username.trim();
    let platform_name = body.platform_name.trim();
    if username.is_empty() || platform_name.is_empty() {
        return Err(ApiError::validation(
            rid.as_str(),
            "username and platform must not be empty",
        ));
    }
    if body.follower_count < 0 {
        return Err(ApiError::validation(
            rid.as_str(),
            format!("follower count must not be negative, got {}", body.follower_count),
        ));
    }

    let account = infdb_db::NewAccount {
        username,
        platform_name,
        influencer_id: body.influencer_id,
        follower_count: body.follower_count,
        activation_date: body.activation_date,
    };
    let inserted = infdb_db::or_default(
        "insert_account",
        infdb_db::insert_account(&state.pool, &account).await,
    );

    if !inserted {
        return Err(ApiError::new(
            rid.as_str(),
            ErrorKind::WriteFailed,
            "account was not inserted",
        ));
    }

    tracing::info!(username, platform_name, "account inserted");
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            serde_json::json!({ "inserted": true }),
            req_id.0.clone(),
        )),
    ))
}
