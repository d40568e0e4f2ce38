//! Schema export: file layout, per-dialect DDL, and reflection from a store.

use std::fs;
use std::path::Path;

use blogdb::db::schema::{blog_schema, Dialect};
use blogdb::db::{Database, DatabaseBackend};
use blogdb::export::{dump_reflected_schema, dump_schema_to_dir};
use chrono::{NaiveDate, NaiveDateTime};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 1)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap()
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap_or_else(|e| panic!("{name}: {e}"))
}

#[rstest]
fn test_full_dump_layout(now: NaiveDateTime) {
    let dir = TempDir::new().unwrap();
    dump_schema_to_dir(&blog_schema(), dir.path(), &[], now).unwrap();

    for prefix in ["schema_postgresql", "schema_mysql", "schema_sqlite", "schema_all"] {
        let stamped = read(dir.path(), &format!("{prefix}_20250601_093000.sql"));
        assert_eq!(read(dir.path(), &format!("{prefix}_latest.sql")), stamped);
    }
    let leftovers = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
}

#[rstest]
fn test_header_lists_sorted_tables(now: NaiveDateTime) {
    let dir = TempDir::new().unwrap();
    dump_schema_to_dir(&blog_schema(), dir.path(), &[Dialect::Sqlite], now).unwrap();
    let ddl = read(dir.path(), "schema_sqlite_latest.sql");

    assert!(ddl.starts_with("-- Schema Dump\n-- Generated: 2025-06-01T09:30:00"));
    assert!(ddl.contains("-- Dialect: sqlite\n"));
    assert!(ddl.contains("-- Tables: comments, post_tags, posts, tags, users\n"));

    let positions: Vec<_> = ["comments", "post_tags", "posts", "tags", "users"]
        .iter()
        .map(|t| ddl.find(&format!("-- Table: {t}\n")).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[rstest]
#[case(Dialect::Postgresql, &["SERIAL", "TIMESTAMP WITHOUT TIME ZONE", "CREATE SEQUENCE IF NOT EXISTS users_id_seq;"])]
#[case(Dialect::Mysql, &["AUTO_INCREMENT", "BOOL DEFAULT true", "DATETIME"])]
#[case(Dialect::Sqlite, &["is_active BOOLEAN DEFAULT 1", "DATETIME"])]
fn test_dialect_specific_ddl(now: NaiveDateTime, #[case] dialect: Dialect, #[case] needles: &[&str]) {
    let dir = TempDir::new().unwrap();
    let dump = dump_schema_to_dir(&blog_schema(), dir.path(), &[dialect], now).unwrap();
    let ddl = fs::read_to_string(&dump.files[0].1.path).unwrap();

    for needle in needles {
        assert!(ddl.contains(needle), "{dialect}: missing {needle}");
    }
    assert_eq!(ddl.contains("-- Sequences"), dialect == Dialect::Postgresql);
    assert!(ddl.contains("CREATE UNIQUE INDEX ix_users_email ON users (email);"));
    assert!(ddl.contains("FOREIGN KEY(parent_id) REFERENCES comments (id) ON DELETE CASCADE"));
}

#[rstest]
fn test_reflected_store_matches_model_tables(now: NaiveDateTime) {
    let db = Database::open_mem(blog_schema()).unwrap();
    db.initialize().unwrap();
    let reflected = db.reflect_schema().unwrap();
    assert_eq!(reflected.table_names(), blog_schema().table_names());

    let dir = TempDir::new().unwrap();
    let written = dump_reflected_schema(&reflected, db.dialect(), dir.path(), now).unwrap();
    let ddl = fs::read_to_string(&written.latest).unwrap();
    assert!(ddl.contains("CREATE TABLE users"));
    assert!(ddl.contains("CREATE TABLE post_tags"));
}
