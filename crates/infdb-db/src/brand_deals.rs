//! Database operations for the `brand_deal` table.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct BrandDealRow {
    pub brand_deal_id: i32,
    pub ad_type: String,
    pub payment_rate: Decimal,
    pub company_id: i32,
    pub post_id: i32,
}

/// Full replacement values for an existing brand deal.
#[derive(Debug, Clone)]
pub struct BrandDealUpdate<'a> {
    pub brand_deal_id: i32,
    pub ad_type: &'a str,
    pub payment_rate: Decimal,
    pub company_id: i32,
    pub post_id: i32,
}

/// Returns every brand deal ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brand_deals(pool: &PgPool) -> Result<Vec<BrandDealRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandDealRow>(
        "SELECT brand_deal_id, ad_type, payment_rate, company_id, post_id \
         FROM brand_deal \
         ORDER BY brand_deal_id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Overwrites every column of a brand deal. Returns `false` when no deal has
/// that id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails, including references to
/// unknown companies or posts.
pub async fn update_brand_deal(pool: &PgPool, update: &BrandDealUpdate<'_>) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "UPDATE brand_deal \
         SET ad_type = $2, payment_rate = $3, company_id = $4, post_id = $5 \
         WHERE brand_deal_id = $1",
    )
    .bind(update.brand_deal_id)
    .bind(update.ad_type)
    .bind(update.payment_rate)
    .bind(update.company_id)
    .bind(update.post_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}
