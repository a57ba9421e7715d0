//! Fixed reporting queries: join, grouped aggregates, nested aggregate and
//! division.
//!
//! Intermediate results are common table expressions scoped to a single
//! statement, so concurrent callers never share a named schema object.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A brand deal's ad type next to the production cost of its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DealCostRow {
    pub brand_deal_id: i32,
    pub ad_type: String,
    pub production_cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PlatformAgeRow {
    pub platform_name: String,
    /// `None` when no account holder on the platform has a recorded age.
    pub average_age: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryEngagementRow {
    pub category: String,
    pub average_engagement_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct TopDealAccountRow {
    pub username: String,
    pub platform_name: String,
    pub brand_deal_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AllPlatformInfluencerRow {
    pub influencer_id: i32,
}

/// Brand deals whose post cost more than `min_production_cost` to produce.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn deal_costs(
    pool: &PgPool,
    min_production_cost: Decimal,
) -> Result<Vec<DealCostRow>, DbError> {
    let rows = sqlx::query_as::<_, DealCostRow>(
        "SELECT b.brand_deal_id, b.ad_type, p.production_cost \
         FROM brand_deal b \
         JOIN post p ON p.post_id = b.post_id \
         WHERE p.production_cost > $1 \
         ORDER BY b.brand_deal_id",
    )
    .bind(min_production_cost)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Average influencer age per platform, over the platform's account holders.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn platform_average_age(pool: &PgPool) -> Result<Vec<PlatformAgeRow>, DbError> {
    let rows = sqlx::query_as::<_, PlatformAgeRow>(
        "SELECT a.platform_name, AVG(i.age) AS average_age \
         FROM influencer i \
         JOIN account a ON a.influencer_id = i.influencer_id \
         GROUP BY a.platform_name \
         ORDER BY a.platform_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Product categories whose advertised posts average an engagement rate,
/// `(likes + comments) / views`, above `min_rate`. Posts without views are
/// excluded.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn category_engagement(
    pool: &PgPool,
    min_rate: f64,
) -> Result<Vec<CategoryEngagementRow>, DbError> {
    let rows = sqlx::query_as::<_, CategoryEngagementRow>(
        "SELECT pr.category, \
                AVG((p.likes + p.comments)::float8 / p.views) AS average_engagement_rate \
         FROM post p \
         JOIN advertise ad ON ad.post_id = p.post_id \
         JOIN product pr ON pr.product_name = ad.product_name AND pr.company_id = ad.company_id \
         WHERE p.views > 0 \
         GROUP BY pr.category \
         HAVING AVG((p.likes + p.comments)::float8 / p.views) > $1 \
         ORDER BY pr.category",
    )
    .bind(min_rate)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Accounts tied for the most brand deals across the posts they hold.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn top_deal_accounts(pool: &PgPool) -> Result<Vec<TopDealAccountRow>, DbError> {
    let rows = sqlx::query_as::<_, TopDealAccountRow>(
        "WITH deals_per_account AS ( \
             SELECT h.username, h.platform_name, COUNT(b.brand_deal_id) AS brand_deal_count \
             FROM brand_deal b \
             JOIN account_holds_post h ON h.post_id = b.post_id \
             GROUP BY h.username, h.platform_name \
         ) \
         SELECT username, platform_name, brand_deal_count \
         FROM deals_per_account \
         WHERE brand_deal_count = (SELECT MAX(brand_deal_count) FROM deals_per_account) \
         ORDER BY username, platform_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Influencers holding an account on every known platform.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn all_platform_influencers(
    pool: &PgPool,
) -> Result<Vec<AllPlatformInfluencerRow>, DbError> {
    let rows = sqlx::query_as::<_, AllPlatformInfluencerRow>(
        "WITH influencer_platforms AS ( \
             SELECT i.influencer_id, a.platform_name \
             FROM influencer i \
             JOIN account a ON a.influencer_id = i.influencer_id \
         ) \
         SELECT influencer_id \
         FROM influencer_platforms \
         GROUP BY influencer_id \
         HAVING COUNT(DISTINCT platform_name) = (SELECT COUNT(*) FROM platform) \
         ORDER BY influencer_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
