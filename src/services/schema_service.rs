//! Schema service
//!
//! Row counts of the competition tables and the one-off audit-column upgrade
//! of `contest_registrations`.

use serde::Serialize;

use crate::{
    constants::{columns, tables},
    db::Store,
    error::{AppError, AppResult},
};

/// Row count of one table; `rows` is `None` when the table does not exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableCount {
    pub table: &'static str,
    pub rows: Option<i64>,
}

/// Outcome of [`SchemaService::ensure_registration_timestamps`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampOutcome {
    AlreadyPresent,
    Added,
    WouldAdd,
}

/// Service for catalog reports and small DDL upgrades
pub struct SchemaService;

impl SchemaService {
    /// Count rows of the competition tables.
    ///
    /// Required tables must exist; optional ones (`experts`) are reported
    /// with `rows: None` when missing.
    pub async fn table_stats<S: Store + ?Sized>(store: &mut S) -> AppResult<Vec<TableCount>> {
        let mut counts = Vec::new();

        for &table in tables::REQUIRED_FOR_STATS {
            if !store.table_exists(table).await? {
                return Err(AppError::NotFound(format!("Table {} does not exist", table)));
            }
            let rows = store.count_rows(table).await?;
            tracing::info!("{}: {} rows", table, rows);
            counts.push(TableCount {
                table,
                rows: Some(rows),
            });
        }

        for &table in tables::OPTIONAL_FOR_STATS {
            let rows = if store.table_exists(table).await? {
                let rows = store.count_rows(table).await?;
                tracing::info!("{}: {} rows", table, rows);
                Some(rows)
            } else {
                tracing::info!("{}: table does not exist", table);
                None
            };
            counts.push(TableCount { table, rows });
        }

        Ok(counts)
    }

    /// Add `created_at`/`updated_at` to `contest_registrations` unless present
    pub async fn ensure_registration_timestamps<S: Store + ?Sized>(
        store: &mut S,
        dry_run: bool,
    ) -> AppResult<TimestampOutcome> {
        let table = tables::REGISTRATIONS;
        if !store.table_exists(table).await? {
            return Err(AppError::NotFound(format!("Table {} does not exist", table)));
        }

        let present = store
            .columns(table)
            .await?
            .iter()
            .any(|c| c.name == columns::CREATED_AT);

        if present {
            tracing::info!("{}.{} already exists", table, columns::CREATED_AT);
            return Ok(TimestampOutcome::AlreadyPresent);
        }

        if dry_run {
            tracing::info!("[dry-run] would add created_at/updated_at to {}", table);
            return Ok(TimestampOutcome::WouldAdd);
        }

        store.add_timestamps(table).await?;
        tracing::info!("Added created_at/updated_at to {}", table);
        Ok(TimestampOutcome::Added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;

    #[tokio::test]
    async fn test_stats_reports_missing_experts() {
        let mut store = MemoryStore::competition()
            .with_student(1, "张三", None, None)
            .with_table(tables::CONTESTS, 3)
            .with_table(tables::TEAMS, 2);

        let counts = SchemaService::table_stats(&mut store).await.unwrap();

        assert_eq!(
            counts,
            vec![
                TableCount { table: "contests", rows: Some(3) },
                TableCount { table: "students", rows: Some(1) },
                TableCount { table: "contest_registrations", rows: Some(0) },
                TableCount { table: "contest_teams", rows: Some(2) },
                TableCount { table: "experts", rows: None },
            ]
        );
    }

    #[tokio::test]
    async fn test_stats_counts_experts_when_present() {
        let mut store = MemoryStore::competition().with_table(tables::EXPERTS, 4);

        let counts = SchemaService::table_stats(&mut store).await.unwrap();

        assert_eq!(counts.last().and_then(|c| c.rows), Some(4));
    }

    #[tokio::test]
    async fn test_stats_fails_on_missing_required_table() {
        let mut store = MemoryStore::competition();
        store.schema.remove(tables::TEAMS);

        let err = SchemaService::table_stats(&mut store).await.unwrap_err();

        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_timestamps_added_once() {
        let mut store = MemoryStore::competition();

        let first = SchemaService::ensure_registration_timestamps(&mut store, false)
            .await
            .unwrap();
        let second = SchemaService::ensure_registration_timestamps(&mut store, false)
            .await
            .unwrap();

        assert_eq!(first, TimestampOutcome::Added);
        assert_eq!(second, TimestampOutcome::AlreadyPresent);
        assert_eq!(store.writes, vec!["ALTER contest_registrations ADD TIMESTAMPS"]);
    }

    #[tokio::test]
    async fn test_timestamps_dry_run() {
        let mut store = MemoryStore::competition();

        let outcome = SchemaService::ensure_registration_timestamps(&mut store, true)
            .await
            .unwrap();

        assert_eq!(outcome, TimestampOutcome::WouldAdd);
        assert!(store.writes.is_empty());
    }
}
