//! Writing DDL files and maintaining the `*_latest.sql` aliases.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use super::ExportError;
use crate::db::schema::{Dialect, Schema, SqlCompiler};

/// `YYYYMMDD_HHMMSS`, the suffix of every timestamped file.
pub fn file_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

/// A timestamped file and the alias pointing at it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub latest: PathBuf,
}

/// Output of [`dump_schema_to_dir`].
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDump {
    pub files: Vec<(Dialect, WrittenFile)>,
    pub combined: WrittenFile,
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

/// Write `content` to a temporary sibling of `path`, then rename it into place.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(ExportError::io(parent))?;
    }
    let temp = temp_sibling(path);
    fs::write(&temp, content).map_err(ExportError::io(&temp))?;
    fs::rename(&temp, path).map_err(ExportError::io(path))
}

/// Point `dir/latest_name` at `dir/target_name`.
///
/// The alias is a relative symlink built under a temporary name and renamed
/// over the old alias. Where symlinks are unavailable the alias is a copy.
pub fn update_latest(dir: &Path, latest_name: &str, target_name: &str) -> Result<PathBuf, ExportError> {
    let latest = dir.join(latest_name);
    let temp = temp_sibling(&latest);
    if temp.symlink_metadata().is_ok() {
        fs::remove_file(&temp).map_err(ExportError::io(&temp))?;
    }

    #[cfg(unix)]
    std::os::unix::fs::symlink(target_name, &temp).map_err(ExportError::io(&temp))?;
    #[cfg(not(unix))]
    fs::copy(dir.join(target_name), &temp).map_err(ExportError::io(&temp))?;

    fs::rename(&temp, &latest).map_err(ExportError::io(&latest))?;
    Ok(latest)
}

fn write_with_latest(dir: &Path, prefix: &str, stamp: &str, content: &str) -> Result<WrittenFile, ExportError> {
    let file_name = format!("{}_{}.sql", prefix, stamp);
    let path = dir.join(&file_name);
    atomic_write(&path, content.as_bytes())?;
    let latest = update_latest(dir, &format!("{}_latest.sql", prefix), &file_name)?;
    info!(path = %path.display(), "schema written");
    Ok(WrittenFile { path, latest })
}

fn banner(dialect: Dialect) -> String {
    let rule = format!("-- {}", "=".repeat(60));
    format!("{rule}\n-- DIALECT: {}\n{rule}\n\n", dialect.name().to_uppercase())
}

/// Write one DDL file per dialect plus the combined `schema_all_<ts>.sql`.
///
/// Dialects are written in the order given. An empty list writes all three.
pub fn dump_schema_to_dir(
    schema: &Schema,
    dir: &Path,
    dialects: &[Dialect],
    now: NaiveDateTime,
) -> Result<SchemaDump, ExportError> {
    let dialects = if dialects.is_empty() { &Dialect::ALL[..] } else { dialects };
    fs::create_dir_all(dir).map_err(ExportError::io(dir))?;
    let stamp = file_timestamp(now);

    let mut files = Vec::with_capacity(dialects.len());
    let mut combined = String::new();
    for &dialect in dialects {
        let ddl = SqlCompiler::new(dialect).render(schema, now);
        let written = write_with_latest(dir, &format!("schema_{}", dialect.name()), &stamp, &ddl)?;
        files.push((dialect, written));

        combined.push_str(&banner(dialect));
        combined.push_str(&ddl);
        combined.push_str("\n\n");
    }

    let combined = write_with_latest(dir, "schema_all", &stamp, &combined)?;
    Ok(SchemaDump { files, combined })
}

/// Write `schema_from_db_<ts>.sql` for a schema read back from a database.
pub fn dump_reflected_schema(
    schema: &Schema,
    dialect: Dialect,
    dir: &Path,
    now: NaiveDateTime,
) -> Result<WrittenFile, ExportError> {
    fs::create_dir_all(dir).map_err(ExportError::io(dir))?;
    let ddl = SqlCompiler::new(dialect).render(schema, now);
    write_with_latest(dir, "schema_from_db", &file_timestamp(now), &ddl)
}
