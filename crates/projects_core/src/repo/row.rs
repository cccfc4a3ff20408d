//! Row-to-entity mapping and shared query helpers.
//!
//! # Responsibility
//! - Build each entity from named columns with explicit per-entity code.
//! - Convert decimal columns without going through floating point.
//!
//! # Invariants
//! - A row whose shape does not match its entity yields `StoreFault::Mapping`.
//! - Statements and row cursors never outlive the helper that opened them.

use super::error::StoreFault;
use crate::model::category::Category;
use crate::model::material::Material;
use crate::model::project::Project;
use crate::model::step::Step;
use rusqlite::types::{FromSql, ValueRef};
use rusqlite::{Connection, Params, Row};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Entity that can be built from one result row by column name.
pub trait FromRow: Sized {
    /// Entity name used in mapping diagnostics.
    const ENTITY: &'static str;

    fn from_row(row: &Row<'_>) -> Result<Self, StoreFault>;
}

impl FromRow for Project {
    const ENTITY: &'static str = "Project";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreFault> {
        let difficulty: i64 = column(row, Self::ENTITY, "difficulty")?;
        let difficulty = u8::try_from(difficulty).map_err(|_| StoreFault::Mapping {
            entity: Self::ENTITY,
            column: "difficulty",
            reason: format!("value {difficulty} does not fit a difficulty"),
        })?;

        Ok(Self {
            project_id: Some(column(row, Self::ENTITY, "project_id")?),
            project_name: column(row, Self::ENTITY, "project_name")?,
            estimated_hours: decimal_column(row, Self::ENTITY, "estimated_hours")?,
            actual_hours: decimal_column(row, Self::ENTITY, "actual_hours")?,
            difficulty,
            notes: column(row, Self::ENTITY, "notes")?,
            materials: Vec::new(),
            steps: Vec::new(),
            categories: Vec::new(),
        })
    }
}

impl FromRow for Material {
    const ENTITY: &'static str = "Material";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreFault> {
        Ok(Self {
            material_id: Some(column(row, Self::ENTITY, "material_id")?),
            project_id: column(row, Self::ENTITY, "project_id")?,
            material_name: column(row, Self::ENTITY, "material_name")?,
            num_required: column(row, Self::ENTITY, "num_required")?,
            cost: optional_decimal_column(row, Self::ENTITY, "cost")?,
        })
    }
}

impl FromRow for Step {
    const ENTITY: &'static str = "Step";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreFault> {
        Ok(Self {
            step_id: Some(column(row, Self::ENTITY, "step_id")?),
            project_id: column(row, Self::ENTITY, "project_id")?,
            step_text: column(row, Self::ENTITY, "step_text")?,
            step_order: Some(column(row, Self::ENTITY, "step_order")?),
        })
    }
}

impl FromRow for Category {
    const ENTITY: &'static str = "Category";

    fn from_row(row: &Row<'_>) -> Result<Self, StoreFault> {
        Ok(Self {
            category_id: column(row, Self::ENTITY, "category_id")?,
            category_name: column(row, Self::ENTITY, "category_name")?,
        })
    }
}

/// Runs a query and maps every row into `T`.
pub(crate) fn query_all<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>, StoreFault> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    let mut items = Vec::new();
    while let Some(row) = rows.next()? {
        items.push(T::from_row(row)?);
    }
    Ok(items)
}

/// Runs a query and maps the first row, if any, into `T`.
pub(crate) fn query_optional<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>, StoreFault> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(T::from_row(row)?)),
        None => Ok(None),
    }
}

/// Runs a query that must produce a row and maps it into `T`.
pub(crate) fn query_one<T: FromRow, P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<T, StoreFault> {
    query_optional(conn, sql, params)?
        .ok_or(StoreFault::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

/// Canonical text form used to persist decimals.
pub(crate) fn decimal_to_sql(value: Decimal) -> String {
    value.to_string()
}

fn column<T: FromSql>(
    row: &Row<'_>,
    entity: &'static str,
    column: &'static str,
) -> Result<T, StoreFault> {
    row.get(column).map_err(|err| StoreFault::Mapping {
        entity,
        column,
        reason: err.to_string(),
    })
}

fn decimal_column(
    row: &Row<'_>,
    entity: &'static str,
    column: &'static str,
) -> Result<Decimal, StoreFault> {
    optional_decimal_column(row, entity, column)?.ok_or_else(|| StoreFault::Mapping {
        entity,
        column,
        reason: "unexpected NULL".to_string(),
    })
}

fn optional_decimal_column(
    row: &Row<'_>,
    entity: &'static str,
    column: &'static str,
) -> Result<Option<Decimal>, StoreFault> {
    let value = row.get_ref(column).map_err(|err| StoreFault::Mapping {
        entity,
        column,
        reason: err.to_string(),
    })?;
    decimal_from_value(value).map_err(|reason| StoreFault::Mapping {
        entity,
        column,
        reason,
    })
}

fn decimal_from_value(value: ValueRef<'_>) -> Result<Option<Decimal>, String> {
    match value {
        ValueRef::Null => Ok(None),
        ValueRef::Integer(value) => Ok(Some(Decimal::from(value))),
        ValueRef::Real(value) => Decimal::try_from(value)
            .map(Some)
            .map_err(|err| format!("invalid decimal {value}: {err}")),
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes).map_err(|err| err.to_string())?;
            Decimal::from_str(text.trim())
                .map(Some)
                .map_err(|err| format!("invalid decimal `{text}`: {err}"))
        }
        ValueRef::Blob(_) => Err("blob value is not a decimal".to_string()),
    }
}
