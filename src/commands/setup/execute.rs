use std::error::Error;

use serde::Serialize;
use tracing::info;

use super::SetupCmd;
use crate::commands::{Context, Execute};

/// Status of a database relation (table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RelationState {
    #[serde(rename = "created")]
    Created,
    #[serde(rename = "exists")]
    AlreadyExists,
    #[serde(rename = "would_create")]
    WouldCreate,
}

/// Status information for a single database relation
#[derive(Debug, Clone, Serialize)]
pub struct RelationStatus {
    pub name: String,
    pub status: RelationState,
}

/// Result of the setup command execution
#[derive(Debug, Serialize)]
pub struct SetupResult {
    /// Backend name, or `None` for a dry run (no connection is made)
    pub backend: Option<String>,
    pub relations: Vec<RelationStatus>,
    pub created_new: bool,
    pub dry_run: bool,
}

impl Execute for SetupCmd {
    type Output = SetupResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        if self.dry_run {
            let relations = ctx
                .schema
                .table_names()
                .into_iter()
                .map(|name| RelationStatus {
                    name: name.to_string(),
                    status: RelationState::WouldCreate,
                })
                .collect();

            return Ok(SetupResult {
                backend: None,
                relations,
                created_new: false,
                dry_run: true,
            });
        }

        let backend = ctx.connect()?;
        let relations: Vec<_> = backend
            .create_schema(&ctx.schema)?
            .into_iter()
            .map(|status| RelationStatus {
                name: status.table,
                status: if status.created {
                    RelationState::Created
                } else {
                    RelationState::AlreadyExists
                },
            })
            .collect();

        let created_new = relations
            .iter()
            .any(|r| r.status == RelationState::Created);
        info!(backend = backend.backend_name(), created_new, "setup finished");

        Ok(SetupResult {
            backend: Some(backend.backend_name().to_string()),
            relations,
            created_new,
            dry_run: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConfig;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const TABLES: [&str; 5] = ["comments", "post_tags", "posts", "tags", "users"];

    #[fixture]
    fn db_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn sqlite_ctx(dir: &TempDir) -> Context {
        Context::new(DatabaseConfig::CozoSqlite {
            path: dir.path().join("blog.db"),
        })
    }

    fn names(result: &SetupResult) -> Vec<&str> {
        result.relations.iter().map(|r| r.name.as_str()).collect()
    }

    #[rstest]
    fn test_setup_creates_all_tables(db_dir: TempDir) {
        let result = SetupCmd { dry_run: false }
            .execute(&sqlite_ctx(&db_dir))
            .expect("Setup should succeed");

        assert_eq!(names(&result), TABLES);
        assert!(result
            .relations
            .iter()
            .all(|r| r.status == RelationState::Created));
        assert!(result.created_new);
        assert_eq!(result.backend.as_deref(), Some("CozoSqlite"));
    }

    #[rstest]
    fn test_setup_idempotent(db_dir: TempDir) {
        let ctx = sqlite_ctx(&db_dir);
        let first = SetupCmd { dry_run: false }.execute(&ctx).expect("First setup should succeed");
        assert!(first.created_new);

        let second = SetupCmd { dry_run: false }.execute(&ctx).expect("Second setup should succeed");
        assert_eq!(second.relations.len(), TABLES.len());
        assert!(second
            .relations
            .iter()
            .all(|r| r.status == RelationState::AlreadyExists));
        assert!(!second.created_new);
    }

    #[rstest]
    fn test_setup_dry_run_touches_nothing(db_dir: TempDir) {
        let result = SetupCmd { dry_run: true }
            .execute(&sqlite_ctx(&db_dir))
            .expect("Dry run should succeed");

        assert!(result.dry_run);
        assert!(!result.created_new);
        assert_eq!(result.backend, None);
        assert_eq!(names(&result), TABLES);
        assert!(result
            .relations
            .iter()
            .all(|r| r.status == RelationState::WouldCreate));
        assert!(!db_dir.path().join("blog.db").exists());
    }
}
