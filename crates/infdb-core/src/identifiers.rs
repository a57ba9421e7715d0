//! Allow-list validation for identifiers that cannot travel as bind
//! parameters (table and column names in projections).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("unknown table '{0}'")]
    UnknownTable(String),
    #[error("unknown column '{column}' on table '{table}'")]
    UnknownColumn { table: String, column: String },
    #[error("at least one column is required")]
    NoColumns,
}

/// A projection whose table and columns have been matched against the catalog.
///
/// Names are the catalog's spelling, not the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub table: String,
    pub columns: Vec<String>,
}

impl Projection {
    /// Render a `SELECT` yielding one JSON array per row, with every
    /// identifier quoted.
    #[must_use]
    pub fn select_sql(&self) -> String {
        let columns = self
            .columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT json_build_array({columns}) FROM {}",
            quote_ident(&self.table)
        )
    }
}

/// Quote an identifier for Postgres, doubling any embedded quote.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Match a requested table and column list against the known catalog.
///
/// `tables` lists known table names; `columns_of` yields the known columns of
/// a resolved table. Matching is case-insensitive. Duplicate columns are kept
/// once, in first-seen order.
///
/// # Errors
///
/// Returns [`IdentifierError`] when the table or any column is not known, or
/// when no columns were requested.
pub fn resolve_projection<F>(
    tables: &[String],
    columns_of: F,
    table: &str,
    requested: &[&str],
) -> Result<Projection, IdentifierError>
where
    F: FnOnce(&str) -> Vec<String>,
{
    let table_name = tables
        .iter()
        .find(|t| t.eq_ignore_ascii_case(table.trim()))
        .ok_or_else(|| IdentifierError::UnknownTable(table.to_string()))?
        .clone();

    let requested: Vec<&str> = requested
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if requested.is_empty() {
        return Err(IdentifierError::NoColumns);
    }

    let known = columns_of(&table_name);
    let mut columns: Vec<String> = Vec::with_capacity(requested.len());
    for column in requested {
        let resolved = known
            .iter()
            .find(|k| k.eq_ignore_ascii_case(column))
            .ok_or_else(|| IdentifierError::UnknownColumn {
                table: table_name.clone(),
                column: column.to_string(),
            })?;
        if !columns.contains(resolved) {
            columns.push(resolved.clone());
        }
    }

    Ok(Projection {
        table: table_name,
        columns,
    })
}
