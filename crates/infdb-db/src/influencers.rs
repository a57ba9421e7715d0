//! Database operations for the `influencer` table, including ad-hoc filters.

use infdb_core::{CompiledFilter, FilterValue};
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct InfluencerRow {
    pub influencer_id: i32,
    pub influencer_name: String,
    pub location: Option<String>,
    pub age: Option<i32>,
    pub niche: Option<String>,
}

/// Result of a delete-by-id: a business failure is reported here rather than
/// as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub success: bool,
    pub message: Option<String>,
}

impl DeleteOutcome {
    fn deleted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    fn blocked(influencer_id: i32) -> Self {
        Self {
            success: false,
            message: Some(format!(
                "cannot delete influencer {influencer_id}: it does not exist or still has linked accounts"
            )),
        }
    }
}

/// Returns every influencer ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_influencers(pool: &PgPool) -> Result<Vec<InfluencerRow>, DbError> {
    let rows = sqlx::query_as::<_, InfluencerRow>(
        "SELECT influencer_id, influencer_name, location, age, niche \
         FROM influencer \
         ORDER BY influencer_id ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns influencers matching a compiled filter, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn filter_influencers(
    pool: &PgPool,
    filter: &CompiledFilter,
) -> Result<Vec<InfluencerRow>, DbError> {
    let sql = format!(
        "SELECT influencer_id, influencer_name, location, age, niche \
         FROM influencer \
         WHERE {} \
         ORDER BY influencer_id ASC",
        filter.clause
    );
    tracing::debug!(clause = %filter.clause, params = ?filter.params, "filtering influencers");

    let mut query = sqlx::query_as::<_, InfluencerRow>(&sql);
    for param in &filter.params {
        query = match &param.value {
            FilterValue::Integer(value) => query.bind(*value),
            FilterValue::Number(value) => query.bind(*value),
            FilterValue::Text(value) => query.bind(value.as_str()),
        };
    }

    Ok(query.fetch_all(pool).await?)
}

/// Deletes an influencer that no account references.
///
/// Zero rows affected, whether the id is unknown or still referenced, yields
/// an unsuccessful [`DeleteOutcome`] with a message.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] for store failures other than a foreign-key block.
pub async fn delete_influencer(pool: &PgPool, influencer_id: i32) -> Result<DeleteOutcome, DbError> {
    let result = sqlx::query(
        "DELETE FROM influencer i \
         WHERE i.influencer_id = $1 \
           AND NOT EXISTS (SELECT 1 FROM account a WHERE a.influencer_id = i.influencer_id)",
    )
    .bind(influencer_id)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() > 0 => Ok(DeleteOutcome::deleted()),
        Ok(_) => Ok(DeleteOutcome::blocked(influencer_id)),
        Err(sqlx::Error::Database(db_err))
            if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) =>
        {
            Ok(DeleteOutcome::blocked(influencer_id))
        }
        Err(e) => Err(e.into()),
    }
}
