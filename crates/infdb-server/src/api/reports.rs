//! Fixed reports under `/api/v1/reports`.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{extracted, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct DealCostQuery {
    pub min_production_cost: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub(super) struct EngagementQuery {
    pub min_rate: Option<f64>,
}

pub(super) async fn deal_costs(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<DealCostQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<infdb_db::DealCostRow>>>, ApiError> {
    let rid = &req_id.0;
    let Query(query) = extracted(rid, query)?;
    let Some(min_production_cost) = query.min_production_cost else {
        return Err(ApiError::validation(
            rid.as_str(),
            "min_production_cost is required",
        ));
    };

    let rows = infdb_db::or_default(
        "deal_costs",
        infdb_db::deal_costs(&state.pool, min_production_cost).await,
    );
    Ok(Json(ApiResponse::new(rows, req_id.0.clone())))
}

pub(super) async fn platform_average_age(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::PlatformAgeRow>>> {
    let rows = infdb_db::or_default(
        "platform_average_age",
        infdb_db::platform_average_age(&state.pool).await,
    );
    Json(ApiResponse::new(rows, req_id.0))
}

pub(super) async fn category_engagement(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<EngagementQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<infdb_db::CategoryEngagementRow>>>, ApiError> {
    let rid = &req_id.0;
    let Query(query) = extracted(rid, query)?;
    let min_rate = match query.min_rate {
        Some(rate) if rate.is_finite() => rate,
        Some(rate) => {
            return Err(ApiError::validation(
                rid.as_str(),
                format!("min_rate must be a finite number, got {rate}"),
            ));
        }
        None => return Err(ApiError::validation(rid.as_str(), "min_rate is required")),
    };

    let rows = infdb_db::or_default(
        "category_engagement",
        infdb_db::category_engagement(&state.pool, min_rate).await,
    );
    Ok(Json(ApiResponse::new(rows, req_id.0.clone())))
}

pub(super) async fn top_deal_accounts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::TopDealAccountRow>>> {
    let rows = infdb_db::or_default(
        "top_deal_accounts",
        infdb_db::top_deal_accounts(&state.pool).await,
    );
    Json(ApiResponse::new(rows, req_id.0))
}

pub(super) async fn all_platform_influencers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::AllPlatformInfluencerRow>>> {
    let rows = infdb_db::or_default(
        "all_platform_influencers",
        infdb_db::all_platform_influencers(&state.pool).await,
    );
    Json(ApiResponse::new(rows, req_id.0))
}
