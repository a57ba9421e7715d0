//! Database operations for the `sponsor_company` table.

use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CompanyRow {
    pub company_id: i32,
    pub company_name: String,
    pub industry: Option<String>,
}

/// Returns every sponsor company ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_companies(pool: &PgPool) -> Result<Vec<CompanyRow>, DbError> {
    let rows = sqlx::query_as::<_, CompanyRow>(
        "SELECT company_id, company_name, industry \
         FROM sponsor_company \
         ORDER BY company_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
