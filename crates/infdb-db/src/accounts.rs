//! Database operations for the `account` table.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `account` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AccountRow {
    pub username: String,
    pub platform_name: String,
    pub influencer_id: i32,
    pub follower_count: i32,
    pub activation_date: Option<NaiveDate>,
}

/// Values for a new `account` row.
#[derive(Debug, Clone)]
pub struct NewAccount<'a> {
    pub username: &'a str,
    pub platform_name: &'a str,
    pub influencer_id: i32,
    pub follower_count: i32,
    pub activation_date: NaiveDate,
}

/// Returns every account ordered by influencer, then username.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_accounts(pool: &PgPool) -> Result<Vec<AccountRow>, DbError> {
    let rows = sqlx::query_as::<_, AccountRow>(
        "SELECT username, platform_name, influencer_id, follower_count, activation_date \
         FROM account \
         ORDER BY influencer_id ASC, username ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Inserts an account. Returns `true` when a row was written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails, including duplicate
/// `(username, platform_name)` keys and unknown platform or influencer.
pub async fn insert_account(pool: &PgPool, account: &NewAccount<'_>) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO account \
           (username, platform_name, influencer_id, follower_count, activation_date) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(account.username)
    .bind(account.platform_name)
    .bind(account.influencer_id)
    .bind(account.follower_count)
    .bind(account.activation_date)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}
