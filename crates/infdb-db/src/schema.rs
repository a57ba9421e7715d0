//! Catalog discovery and caller-chosen projections over user tables.

use infdb_core::resolve_projection;
use serde::Serialize;
use sqlx::PgPool;

use crate::DbError;

/// Projected rows, one JSON array per row in `columns` order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectionRows {
    pub columns: Vec<String>,
    pub rows: Vec<serde_json::Value>,
}

/// Returns the user tables in the current schema, alphabetically.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_table_names(pool: &PgPool) -> Result<Vec<String>, DbError> {
    let names = sqlx::query_scalar::<_, String>(
        "SELECT table_name::text \
         FROM information_schema.tables \
         WHERE table_schema = current_schema() \
           AND table_type = 'BASE TABLE' \
           AND table_name <> '_sqlx_migrations' \
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await?;

    Ok(names)
}

/// Returns the column names of `table` in ordinal order. Unknown tables and
/// the migration bookkeeping table yield an empty list.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_table_columns(pool: &PgPool, table: &str) -> Result<Vec<String>, DbError> {
    let columns = sqlx::query_scalar::<_, String>(
        "SELECT column_name::text \
         FROM information_schema.columns \
         WHERE table_schema = current_schema() \
           AND lower(table_name) = lower($1) \
           AND table_name <> '_sqlx_migrations' \
         ORDER BY ordinal_position",
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    Ok(columns)
}

/// Selects `columns` from `table` after checking both against the catalog.
///
/// # Errors
///
/// Returns [`DbError::InvalidIdentifier`] if the table or a column is not in
/// the catalog, or [`DbError::Sqlx`] if a query fails.
pub async fn fetch_projection(
    pool: &PgPool,
    table: &str,
    columns: &[&str],
) -> Result<ProjectionRows, DbError> {
    let tables = list_table_names(pool).await?;
    let known_columns = match tables.iter().find(|t| t.eq_ignore_ascii_case(table.trim())) {
        Some(name) => list_table_columns(pool, name).await?,
        None => Vec::new(),
    };

    let projection = resolve_projection(&tables, move |_| known_columns, table, columns)?;
    let rows = sqlx::query_scalar::<_, serde_json::Value>(&projection.select_sql())
        .fetch_all(pool)
        .await?;

    Ok(ProjectionRows {
        columns: projection.columns,
        rows,
    })
}
