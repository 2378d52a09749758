//! Inspection service
//!
//! Reads student and registration rows and reports which list columns do not
//! hold parseable JSON. Nothing is written.

use serde::Serialize;

use crate::{
    constants::{columns, tables},
    db::Store,
    error::AppResult,
    models::Registration,
    normalizer::{is_valid_json, normalize_stored},
};

/// State of one list column value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
    Null,
    Empty,
    ValidJson,
    InvalidJson,
}

impl FieldState {
    /// Classify a raw column value
    pub fn classify(value: Option<&str>) -> Self {
        match value {
            None => Self::Null,
            Some(v) if v.trim().is_empty() => Self::Empty,
            Some(v) if is_valid_json(v) => Self::ValidJson,
            Some(_) => Self::InvalidJson,
        }
    }
}

/// One column value of one row
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub column: &'static str,
    pub state: FieldState,
    /// Whether the repair pass would rewrite this value
    pub needs_repair: bool,
    pub raw: Option<String>,
}

/// One inspected row
#[derive(Debug, Clone, Serialize)]
pub struct RowReport {
    pub id: i32,
    pub label: String,
    pub fields: Vec<FieldReport>,
}

/// Declared type of an inspected column
#[derive(Debug, Clone, Serialize)]
pub struct ColumnTypeReport {
    pub column: &'static str,
    pub column_type: Option<String>,
    pub nullable: bool,
}

/// Inspection result for one table
#[derive(Debug, Clone, Serialize)]
pub struct TableReport {
    pub table: &'static str,
    pub column_types: Vec<ColumnTypeReport>,
    pub rows: Vec<RowReport>,
    pub rows_scanned: usize,
    pub invalid_fields: usize,
    pub null_or_empty_fields: usize,
    pub fields_needing_repair: usize,
}

impl TableReport {
    fn new(table: &'static str, column_types: Vec<ColumnTypeReport>) -> Self {
        Self {
            table,
            column_types,
            rows: Vec::new(),
            rows_scanned: 0,
            invalid_fields: 0,
            null_or_empty_fields: 0,
            fields_needing_repair: 0,
        }
    }

    fn push(&mut self, row: RowReport) {
        self.rows_scanned += 1;
        for field in &row.fields {
            if field.needs_repair {
                self.fields_needing_repair += 1;
            }
            match field.state {
                FieldState::InvalidJson => self.invalid_fields += 1,
                FieldState::Null | FieldState::Empty => self.null_or_empty_fields += 1,
                FieldState::ValidJson => {}
            }
        }
        self.rows.push(row);
    }

    /// Whether every inspected value is parseable JSON
    pub fn is_clean(&self) -> bool {
        self.invalid_fields == 0
    }
}

/// Full inspection result
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub students: TableReport,
    /// Absent when `contest_registrations` has no `skills` column
    pub registration_skills: Option<TableReport>,
    pub registrations: Vec<Registration>,
}

/// Service for read-only inspection
pub struct InspectService;

impl InspectService {
    /// Inspect up to `limit` rows of each table (`None` inspects all rows)
    pub async fn inspect<S: Store + ?Sized>(
        store: &mut S,
        limit: Option<u32>,
    ) -> AppResult<InspectReport> {
        let students = Self::inspect_students(store, limit).await?;

        let registrations = store.list_registrations(limit).await?;
        tracing::info!("Found {} registration rows", registrations.len());
        for reg in &registrations {
            tracing::info!(
                "  - {} contest={} status={}",
                reg.student_name.as_deref().unwrap_or("-"),
                reg.contest_id.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                reg.status.as_deref().unwrap_or("-"),
            );
        }

        let registration_skills = Self::inspect_registration_skills(store, limit).await?;

        Ok(InspectReport {
            students,
            registration_skills,
            registrations,
        })
    }

    async fn inspect_students<S: Store + ?Sized>(
        store: &mut S,
        limit: Option<u32>,
    ) -> AppResult<TableReport> {
        let list_columns = [columns::SKILLS, columns::ACHIEVEMENTS];
        let types = column_types(store, tables::STUDENTS, &list_columns).await?;
        let mut report = TableReport::new(tables::STUDENTS, types);

        for student in store.list_students(limit).await? {
            let row = RowReport {
                id: student.id,
                label: student.name,
                fields: vec![
                    field(columns::SKILLS, student.skills),
                    field(columns::ACHIEVEMENTS, student.achievements),
                ],
            };
            log_row(&row);
            report.push(row);
        }

        tracing::info!(
            "students: {} rows scanned, {} invalid fields, {} null or empty, {} to repair",
            report.rows_scanned,
            report.invalid_fields,
            report.null_or_empty_fields,
            report.fields_needing_repair
        );
        Ok(report)
    }

    async fn inspect_registration_skills<S: Store + ?Sized>(
        store: &mut S,
        limit: Option<u32>,
    ) -> AppResult<Option<TableReport>> {
        let types = column_types(store, tables::REGISTRATIONS, &[columns::SKILLS]).await?;
        if types.iter().all(|t| t.column_type.is_none()) {
            tracing::info!("contest_registrations has no skills column, skipping");
            return Ok(None);
        }

        let mut report = TableReport::new(tables::REGISTRATIONS, types);
        let rows = store.list_registrations_with_skills().await?;
        let limit = limit.map(|l| l as usize).unwrap_or(usize::MAX);

        for reg in rows.into_iter().take(limit) {
            let row = RowReport {
                id: reg.id,
                label: reg.student_name.unwrap_or_default(),
                fields: vec![field(columns::SKILLS, reg.skills)],
            };
            log_row(&row);
            report.push(row);
        }

        tracing::info!(
            "contest_registrations: {} rows scanned, {} invalid fields",
            report.rows_scanned,
            report.invalid_fields
        );
        Ok(Some(report))
    }
}

/// Look up the declared types of `wanted` columns
async fn column_types<S: Store + ?Sized>(
    store: &mut S,
    table: &str,
    wanted: &[&'static str],
) -> AppResult<Vec<ColumnTypeReport>> {
    let declared = store.columns(table).await?;

    let reports = wanted
        .iter()
        .map(|&column| {
            let info = declared.iter().find(|c| c.name == column);
            let column_type = info.map(|c| c.column_type.clone());
            let nullable = info.is_some_and(|c| c.is_nullable());
            tracing::info!(
                "{}.{}: {}{}",
                table,
                column,
                column_type.as_deref().unwrap_or("(missing)"),
                if nullable { " NULL" } else { "" }
            );
            ColumnTypeReport {
                column,
                column_type,
                nullable,
            }
        })
        .collect();

    Ok(reports)
}

fn field(column: &'static str, raw: Option<String>) -> FieldReport {
    FieldReport {
        column,
        state: FieldState::classify(raw.as_deref()),
        needs_repair: normalize_stored(raw.as_deref()).changed,
        raw,
    }
}

fn log_row(row: &RowReport) {
    for field in &row.fields {
        match field.state {
            FieldState::InvalidJson => tracing::warn!(
                "#{} {}: {} is not valid JSON: {:?}",
                row.id,
                row.label,
                field.column,
                field.raw.as_deref().unwrap_or_default()
            ),
            state => tracing::debug!("#{} {}: {} is {:?}", row.id, row.label, field.column, state),
        }
    }
}
