//! Catalog browsing and column projections over any application table.

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use infdb_db::{DbError, ProjectionRows};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{extracted, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct ProjectionQuery {
    /// Comma-separated column names.
    pub columns: Option<String>,
}

pub(super) async fn list_tables(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<String>>> {
    let names = infdb_db::or_default(
        "list_table_names",
        infdb_db::list_table_names(&state.pool).await,
    );
    Json(ApiResponse::new(names, req_id.0))
}

/// Unknown tables yield an empty list.
pub(super) async fn list_columns(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    table: Result<Path<String>, PathRejection>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let Path(table) = extracted(&req_id.0, table)?;
    let columns = infdb_db::or_default(
        "list_table_columns",
        infdb_db::list_table_columns(&state.pool, &table).await,
    );
    Ok(Json(ApiResponse::new(columns, req_id.0)))
}

pub(super) async fn fetch_projection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    table: Result<Path<String>, PathRejection>,
    query: Result<Query<ProjectionQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ProjectionRows>>, ApiError> {
    let rid = &req_id.0;
    let Path(table) = extracted(rid, table)?;
    let Query(query) = extracted(rid, query)?;

    let raw = query.columns.unwrap_or_default();
    let requested: Vec<&str> = raw.split(',').collect();

    let rows = match infdb_db::fetch_projection(&state.pool, &table, &requested).await {
        Ok(rows) => rows,
        Err(DbError::InvalidIdentifier(e)) => {
            return Err(ApiError::validation(rid.as_str(), e.to_string()));
        }
        Err(e) => infdb_db::or_default("fetch_projection", Err(e)),
    };
    Ok(Json(ApiResponse::new(rows, req_id.0.clone())))
}
