//! Repair service
//!
//! Runs the normalization pass over `students` and `contest_registrations`.
//! Each changed row is written on its own; there is no transaction, so a
//! failure leaves earlier rows committed and later rows untouched.
//!
//! With `flip_schema`, each table's list columns are relaxed to `TEXT` before
//! its pass and narrowed back to `JSON` afterwards. The narrowing runs even
//! when the pass fails. MySQL DDL commits implicitly, so an interrupted run can
//! still leave a column as `TEXT`; the returned error names it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    constants::{column_types, columns, tables},
    db::Store,
    error::{AppError, AppResult},
    normalizer::{Normalized, decode_stored, is_valid_json, normalize_stored},
    utils::{format_duration, now_utc},
};

/// Options for a repair run
#[derive(Debug, Clone, Copy, Default)]
pub struct RepairOptions {
    /// Relax list columns to `TEXT` for the duration of the pass
    pub flip_schema: bool,
    /// Report what would change without writing anything
    pub dry_run: bool,
}

/// Counters for one table
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RepairStats {
    pub table: &'static str,
    pub rows_scanned: u64,
    pub rows_updated: u64,
    /// Comma text rewritten as a JSON array
    pub fields_converted: u64,
    /// NULL or blank values replaced by `[]`
    pub fields_defaulted: u64,
    pub schema_flipped: bool,
}

impl RepairStats {
    fn new(table: &'static str) -> Self {
        Self {
            table,
            ..Self::default()
        }
    }

    /// Normalize a stored value and count what kind of rewrite it needs
    fn normalize(&mut self, stored: Option<&str>) -> Normalized {
        let out = normalize_stored(stored);
        if out.changed {
            match decode_stored(stored) {
                Some(text) if !text.trim().is_empty() => self.fields_converted += 1,
                _ => self.fields_defaulted += 1,
            }
        }
        out
    }
}

/// Result of a repair run
#[derive(Debug, Clone, Serialize)]
pub struct RepairReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub dry_run: bool,
    pub students: RepairStats,
    /// Absent when `contest_registrations` has no `skills` column
    pub registrations: Option<RepairStats>,
}

impl RepairReport {
    pub fn rows_updated(&self) -> u64 {
        self.students.rows_updated + self.registrations.as_ref().map_or(0, |r| r.rows_updated)
    }
}

/// Table a pass runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Students,
    Registrations,
}

impl Target {
    fn table(self) -> &'static str {
        match self {
            Self::Students => tables::STUDENTS,
            Self::Registrations => tables::REGISTRATIONS,
        }
    }

    fn list_columns(self) -> &'static [&'static str] {
        match self {
            Self::Students => &[columns::SKILLS, columns::ACHIEVEMENTS],
            Self::Registrations => &[columns::SKILLS],
        }
    }
}

/// Service for the normalization pass
pub struct RepairService;

impl RepairService {
    /// Repair every student row, then every registration row with skills
    pub async fn run<S: Store + ?Sized>(
        store: &mut S,
        options: RepairOptions,
    ) -> AppResult<RepairReport> {
        let started_at = now_utc();
        tracing::info!(
            "Starting repair (flip_schema={}, dry_run={})",
            options.flip_schema,
            options.dry_run
        );

        let students = Self::repair_table(store, Target::Students, options).await?;

        let has_skills = store
            .columns(tables::REGISTRATIONS)
            .await?
            .iter()
            .any(|c| c.name == columns::SKILLS);

        let registrations = if has_skills {
            Some(Self::repair_table(store, Target::Registrations, options).await?)
        } else {
            tracing::info!("contest_registrations has no skills column, skipping");
            None
        };

        let finished_at = now_utc();
        let report = RepairReport {
            started_at,
            finished_at,
            dry_run: options.dry_run,
            students,
            registrations,
        };

        tracing::info!(
            "Repair complete in {}: {} rows {}",
            format_duration(finished_at - started_at),
            report.rows_updated(),
            if options.dry_run { "would be updated" } else { "updated" }
        );

        Ok(report)
    }

    /// Run one table's pass inside the optional relax/restore bracket
    async fn repair_table<S: Store + ?Sized>(
        store: &mut S,
        target: Target,
        options: RepairOptions,
    ) -> AppResult<RepairStats> {
        let table = target.table();
        let list_columns = target.list_columns();
        let mut stats = RepairStats::new(table);

        if !options.flip_schema {
            Self::pass(store, target, options, &mut stats).await?;
            return Ok(stats);
        }

        if options.dry_run {
            tracing::info!(
                "[dry-run] would relax {}.{:?} to {} and restore {}",
                table,
                list_columns,
                column_types::TEXT,
                column_types::JSON
            );
            Self::pass(store, target, options, &mut stats).await?;
            return Ok(stats);
        }

        let mut relaxed = 0;
        if let Err(e) = Self::relax(store, table, list_columns, &mut relaxed).await {
            if relaxed == 0 {
                return Err(e);
            }
            // Only the columns widened before the failure are narrowed again
            if let Err(r) = Self::restore(store, target, &list_columns[..relaxed]).await {
                tracing::error!("Relaxing {} failed: {}", table, e);
                return Err(r);
            }
            return Err(e);
        }
        let outcome = Self::pass(store, target, options, &mut stats).await;
        let restored = Self::restore(store, target, list_columns).await;

        match (outcome, restored) {
            (Ok(()), Ok(())) => {
                stats.schema_flipped = true;
                Ok(stats)
            }
            (Err(e), Ok(())) => Err(e),
            (Ok(()), Err(r)) => Err(r),
            (Err(e), Err(r)) => {
                tracing::error!("Repair of {} failed: {}", table, e);
                Err(r)
            }
        }
    }

    async fn pass<S: Store + ?Sized>(
        store: &mut S,
        target: Target,
        options: RepairOptions,
        stats: &mut RepairStats,
    ) -> AppResult<()> {
        match target {
            Target::Students => Self::repair_students(store, options, stats).await,
            Target::Registrations => Self::repair_registrations(store, options, stats).await,
        }
    }

    /// Widen list columns to `TEXT`, counting the columns widened so far
    async fn relax<S: Store + ?Sized>(
        store: &mut S,
        table: &str,
        list_columns: &[&str],
        relaxed: &mut usize,
    ) -> AppResult<()> {
        for column in list_columns {
            tracing::info!("Relaxing {}.{} to {}", table, column, column_types::TEXT);
            store.modify_column(table, column, column_types::TEXT).await?;
            *relaxed += 1;
        }
        Ok(())
    }

    /// Narrow list columns back to `JSON`, naming the column on failure
    async fn restore<S: Store + ?Sized>(
        store: &mut S,
        target: Target,
        list_columns: &[&str],
    ) -> AppResult<()> {
        let table = target.table();

        for (i, column) in list_columns.iter().enumerate() {
            if let Err(e) = Self::report_unparseable(store, target, column).await {
                tracing::warn!("Could not pre-check {}.{}: {}", table, column, e);
            }

            tracing::info!("Restoring {}.{} to {}", table, column, column_types::JSON);
            if let Err(e) = store.modify_column(table, column, column_types::JSON).await {
                for left in &list_columns[i + 1..] {
                    tracing::error!("{}.{} is still {}", table, left, column_types::TEXT);
                }
                return Err(AppError::SchemaRestore {
                    table: table.to_string(),
                    column: column.to_string(),
                    left_as: column_types::TEXT.to_string(),
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Log values that would make narrowing to `JSON` fail
    async fn report_unparseable<S: Store + ?Sized>(
        store: &mut S,
        target: Target,
        column: &str,
    ) -> AppResult<usize> {
        let values: Vec<(i32, Option<String>)> = match target {
            Target::Students => store
                .list_students(None)
                .await?
                .into_iter()
                .map(|s| {
                    let value = if column == columns::SKILLS {
                        s.skills
                    } else {
                        s.achievements
                    };
                    (s.id, value)
                })
                .collect(),
            Target::Registrations => store
                .list_registrations_with_skills()
                .await?
                .into_iter()
                .map(|r| (r.id, r.skills))
                .collect(),
        };

        let mut bad = 0;
        for (id, value) in values {
            if let Some(v) = value.filter(|v| !is_valid_json(v)) {
                tracing::warn!("{}.{} #{} is not valid JSON: {:?}", target.table(), column, id, v);
                bad += 1;
            }
        }
        Ok(bad)
    }

    async fn repair_students<S: Store + ?Sized>(
        store: &mut S,
        options: RepairOptions,
        stats: &mut RepairStats,
    ) -> AppResult<()> {
        let students = store.list_students(None).await?;
        tracing::info!("Found {} students", students.len());

        for student in students {
            stats.rows_scanned += 1;

            let skills = stats.normalize(student.skills.as_deref());
            let achievements = stats.normalize(student.achievements.as_deref());

            if !skills.changed && !achievements.changed {
                continue;
            }

            if options.dry_run {
                tracing::info!(
                    "[dry-run] student #{} {}: skills={} achievements={}",
                    student.id,
                    student.name,
                    skills.value,
                    achievements.value
                );
            } else {
                store
                    .update_student_lists(student.id, &skills.value, &achievements.value)
                    .await?;
                tracing::info!(
                    "Repaired student #{} {}: skills={} achievements={}",
                    student.id,
                    student.name,
                    skills.value,
                    achievements.value
                );
            }
            stats.rows_updated += 1;
        }

        Ok(())
    }

    async fn repair_registrations<S: Store + ?Sized>(
        store: &mut S,
        options: RepairOptions,
        stats: &mut RepairStats,
    ) -> AppResult<()> {
        // NULL skills are left alone on registrations
        let registrations = store.list_registrations_with_skills().await?;
        tracing::info!("Found {} registrations with skills", registrations.len());

        for reg in registrations {
            stats.rows_scanned += 1;

            let skills = stats.normalize(reg.skills.as_deref());
            if !skills.changed {
                continue;
            }

            let name = reg.student_name.as_deref().unwrap_or("-");
            if options.dry_run {
                tracing::info!("[dry-run] registration #{} {}: skills={}", reg.id, name, skills.value);
            } else {
                store.update_registration_skills(reg.id, &skills.value).await?;
                tracing::info!("Repaired registration #{} {}: skills={}", reg.id, name, skills.value);
            }
            stats.rows_updated += 1;
        }

        Ok(())
    }
}
