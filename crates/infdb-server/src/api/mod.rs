mod accounts;
mod brand_deals;
mod companies;
mod influencers;
mod posts;
mod reports;
mod tables;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer, Serialize,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Success envelope: `{ "ok": true, "data": ..., "meta": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The request itself was malformed or named something unknown.
    ValidationError,
    /// A business rule refused the change, e.g. a blocked delete.
    Rejected,
    /// A write reported no rows applied or the store failed it.
    WriteFailed,
    /// The store could not be reached.
    StoreUnavailable,
}

impl ErrorKind {
    fn status(self) -> StatusCode {
        match self {
            ErrorKind::ValidationError => StatusCode::BAD_REQUEST,
            ErrorKind::Rejected => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::WriteFailed => StatusCode::INTERNAL_SERVER_ERROR,
            ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Failure envelope: `{ "ok": false, "error_kind": ..., "message": ..., "meta": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub ok: bool,
    pub error_kind: ErrorKind,
    pub message: String,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            ok: true,
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(request_id: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_kind: kind,
            message: message.into(),
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub fn validation(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, ErrorKind::ValidationError, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.error_kind.status(), Json(self)).into_response()
    }
}

/// Unwrap an extractor result, turning its rejection into a validation envelope.
pub(super) fn extracted<T, R>(request_id: &str, extracted: Result<T, R>) -> Result<T, ApiError>
where
    R: std::fmt::Display,
{
    extracted.map_err(|rejection| ApiError::validation(request_id, rejection.to_string()))
}

/// Decode a JSON request body, turning decode failures into a validation envelope.
pub(super) fn json_body<T: DeserializeOwned>(
    request_id: &str,
    body: Result<Json<T>, axum::extract::rejection::JsonRejection>,
) -> Result<T, ApiError> {
    extracted(request_id, body).map(|Json(value)| value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<T> {
    Number(T),
    Text(String),
}

/// Accept a number either as a JSON number or as a numeric string, since form
/// clients post every field as text.
pub(super) fn number_or_string<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match NumberOrText::<T>::deserialize(deserializer)? {
        NumberOrText::Number(value) => Ok(value),
        NumberOrText::Text(text) => text.trim().parse().map_err(de::Error::custom),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route(
            "/api/v1/accounts",
            get(accounts::list_accounts).post(accounts::insert_account),
        )
        .route("/api/v1/influencers", get(influencers::list_influencers))
        .route(
            "/api/v1/influencers/{influencer_id}",
            delete(influencers::delete_influencer),
        )
        .route(
            "/api/v1/influencers/filter/{mode}",
            post(influencers::filter_influencers),
        )
        .route("/api/v1/brand-deals", get(brand_deals::list_brand_deals))
        .route(
            "/api/v1/brand-deals/{brand_deal_id}",
            put(brand_deals::update_brand_deal),
        )
        .route("/api/v1/companies", get(companies::list_companies))
        .route("/api/v1/posts", get(posts::list_posts))
        .route("/api/v1/tables", get(tables::list_tables))
        .route("/api/v1/tables/{table}/columns", get(tables::list_columns))
        .route(
            "/api/v1/tables/{table}/projection",
            get(tables::fetch_projection),
        )
        .route("/api/v1/reports/deal-costs", get(reports::deal_costs))
        .route(
            "/api/v1/reports/platform-age",
            get(reports::platform_average_age),
        )
        .route(
            "/api/v1/reports/category-engagement",
            get(reports::category_engagement),
        )
        .route(
            "/api/v1/reports/top-deal-accounts",
            get(reports::top_deal_accounts),
        )
        .route(
            "/api/v1/reports/all-platform-influencers",
            get(reports::all_platform_influencers),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors()),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<HealthData>>, ApiError> {
    match infdb_db::health_check(&state.pool).await {
        Ok(()) => Ok(Json(ApiResponse::new(
            HealthData {
                database: "connected",
            },
            req_id.0,
        ))),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            Err(ApiError::new(
                req_id.0,
                ErrorKind::StoreUnavailable,
                "unable to connect",
            ))
        }
    }
}
