//! `GET /api/v1/brand-deals` and `PUT /api/v1/brand-deals/{brand_deal_id}`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    extracted, json_body, number_or_string, ApiError, ApiResponse, AppState, ErrorKind,
};

#[derive(Debug, Deserialize)]
pub(super) struct UpdateBrandDealRequest {
    #[serde(alias = "adType")]
    pub ad_type: String,
    #[serde(alias = "paymentRate")]
    pub payment_rate: Decimal,
    #[serde(alias = "companyID", deserialize_with = "number_or_string")]
    pub company_id: i32,
    #[serde(alias = "postID", deserialize_with = "number_or_string")]
    pub post_id: i32,
}

pub(super) async fn list_brand_deals(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<infdb_db::BrandDealRow>>> {
    let rows = infdb_db::or_default(
        "list_brand_deals",
        infdb_db::list_brand_deals(&state.pool).await,
    );
    Json(ApiResponse::new(rows, req_id.0))
}

pub(super) async fn update_brand_deal(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    brand_deal_id: Result<Path<i32>, PathRejection>,
    body: Result<Json<UpdateBrandDealRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let rid = &req_id.0;
    let Path(brand_deal_id) = extracted(rid, brand_deal_id)?;
    let body = json_body(rid, body)?;

    let ad_type = body.ad_type.trim();
    if ad_type.is_empty() {
        return Err(ApiError::validation(rid.as_str(), "ad type must not be empty"));
    }
    if body.payment_rate.is_sign_negative() {
        return Err(ApiError::validation(
            rid.as_str(),
            format!("payment rate must not be negative, got {}", body.payment_rate),
        ));
    }

    let update = infdb_db::BrandDealUpdate {
        brand_deal_id,
        ad_type,
        payment_rate: body.payment_rate,
        company_id: body.company_id,
        post_id: body.post_id,
    };
    let updated = infdb_db::or_default(
        "update_brand_deal",
        infdb_db::update_brand_deal(&state.pool, &update).await,
    );

    if !updated {
        return Err(ApiError::new(
            rid.as_str(),
            ErrorKind::WriteFailed,
            format!("brand deal {brand_deal_id} was not updated"),
        ));
    }

    tracing::info!(brand_deal_id, "brand deal updated");
    Ok(Json(ApiResponse::new(
        serde_json::json!({ "updated": true }),
        req_id.0.clone(),
    )))
}
