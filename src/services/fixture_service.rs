//! Fixture service
//!
//! Writes operator-supplied skill and achievement lists to student rows.
//! Values are sent through `CAST(? AS JSON)`, so they land as structured JSON
//! whatever the column currently holds.

use std::path::Path;

use serde::Serialize;

use crate::{
    db::Store,
    error::{AppError, AppResult},
    models::StudentFixture,
    normalizer::encode_array,
};

/// Result of applying a fixture file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FixtureReport {
    pub applied: Vec<i32>,
    /// Fixture ids with no matching student row
    pub missing: Vec<i32>,
    pub dry_run: bool,
}

/// Service for loading and applying student fixtures
pub struct FixtureService;

impl FixtureService {
    /// Read a JSON array of fixtures from `path`
    pub async fn load(path: &Path) -> AppResult<Vec<StudentFixture>> {
        let raw = tokio::fs::read_to_string(path).await?;
        let fixtures: Vec<StudentFixture> = serde_json::from_str(&raw)?;

        if fixtures.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "{} contains no fixtures",
                path.display()
            )));
        }

        tracing::info!("Loaded {} fixtures from {}", fixtures.len(), path.display());
        Ok(fixtures)
    }

    /// Write each fixture to its student row, one statement per row
    pub async fn apply<S: Store + ?Sized>(
        store: &mut S,
        fixtures: &[StudentFixture],
        dry_run: bool,
    ) -> AppResult<FixtureReport> {
        let mut report = FixtureReport {
            dry_run,
            ..FixtureReport::default()
        };

        for fixture in fixtures {
            let Some(student) = store.find_student(fixture.id).await? else {
                tracing::warn!("Student #{} not found, skipping", fixture.id);
                report.missing.push(fixture.id);
                continue;
            };

            if let Some(name) = fixture.name.as_deref().filter(|n| *n != student.name) {
                tracing::warn!(
                    "Fixture #{} names {} but the row belongs to {}",
                    fixture.id,
                    name,
                    student.name
                );
            }

            let skills = encode_array(&fixture.skills);
            let achievements = encode_array(&fixture.achievements);

            if dry_run {
                tracing::info!(
                    "[dry-run] student #{} {}: skills={} achievements={}",
                    student.id,
                    student.name,
                    skills,
                    achievements
                );
            } else {
                store
                    .set_student_json_lists(student.id, &skills, &achievements)
                    .await?;
                tracing::info!(
                    "Updated student #{} {}: skills={} achievements={}",
                    student.id,
                    student.name,
                    skills,
                    achievements
                );
            }
            report.applied.push(student.id);
        }

        tracing::info!(
            "Fixtures: {} applied, {} missing",
            report.applied.len(),
            report.missing.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryStore;
    use std::io::Write;

    fn fixture(id: i32, skills: &[&str], achievements: &[&str]) -> StudentFixture {
        StudentFixture {
            id,
            name: None,
            skills: skills.iter().map(|s| s.to_string()).collect(),
            achievements: achievements.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "name": "张三", "skills": ["Python", "机器学习"], "achievements": ["ACM铜牌"]}},
                {{"id": 2, "skills": []}}
            ]"#
        )
        .unwrap();

        let fixtures = FixtureService::load(file.path()).await.unwrap();

        assert_eq!(fixtures.len(), 2);
        assert_eq!(fixtures[0].name.as_deref(), Some("张三"));
        assert_eq!(fixtures[0].skills, vec!["Python", "机器学习"]);
        assert!(fixtures[1].achievements.is_empty());
    }

    #[tokio::test]
    async fn test_load_rejects_bad_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let err = FixtureService::load(file.path()).await.unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "Python, Java").unwrap();
        let err = FixtureService::load(file.path()).await.unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");

        let dir = tempfile::tempdir().unwrap();
        let err = FixtureService::load(&dir.path().join("missing.json"))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "IO_ERROR");
    }

    #[tokio::test]
    async fn test_apply_writes_json_and_reports_missing() {
        let mut store = MemoryStore::competition()
            .with_student(1, "张三", Some("Python"), None)
            .with_student(2, "李四", None, None);
        let fixtures = vec![
            fixture(1, &["Python", "数据分析"], &["校赛一等奖"]),
            fixture(9, &["Go"], &[]),
            fixture(2, &[], &[]),
        ];

        let report = FixtureService::apply(&mut store, &fixtures, false)
            .await
            .unwrap();

        assert_eq!(report.applied, vec![1, 2]);
        assert_eq!(report.missing, vec![9]);
        let s1 = store.student(1).unwrap();
        assert_eq!(s1.skills.as_deref(), Some(r#"["Python","数据分析"]"#));
        assert_eq!(s1.achievements.as_deref(), Some(r#"["校赛一等奖"]"#));
        assert_eq!(store.student(2).unwrap().skills.as_deref(), Some("[]"));
        assert_eq!(store.writes, vec!["UPDATE students 1 AS JSON", "UPDATE students 2 AS JSON"]);
    }

    #[tokio::test]
    async fn test_apply_dry_run() {
        let mut store = MemoryStore::competition().with_student(1, "张三", None, None);

        let report = FixtureService::apply(&mut store, &[fixture(1, &["C"], &[])], true)
            .await
            .unwrap();

        assert_eq!(report.applied, vec![1]);
        assert!(report.dry_run);
        assert!(store.writes.is_empty());
        assert_eq!(store.student(1).unwrap().skills, None);
    }
}
