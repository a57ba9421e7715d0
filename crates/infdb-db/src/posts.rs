//! Database operations for the `post` table.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct PostRow {
    pub post_id: i32,
    pub production_cost: Decimal,
    pub likes: i32,
    pub comments: i32,
    pub views: i32,
}

/// Returns every post ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_posts(pool: &PgPool) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT post_id, production_cost, likes, comments, views \
         FROM post \
         ORDER BY post_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
