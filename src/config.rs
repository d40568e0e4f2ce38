//! Configuration file handling for database connections.
//!
//! Loads `.blogdb.json` from the current directory. The `database` entry is a
//! type-tagged object selecting the backend.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use crate::db::{DatabaseConfig, PostgresConfig};

pub const CONFIG_FILE_NAME: &str = ".blogdb.json";

/// Top-level configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub database: DatabaseConfigFile,
}

/// Backend selection as written in the file.
///
/// ```json
/// { "database": { "type": "sqlite", "path": "./blog.db" } }
/// { "database": { "type": "memory" } }
/// { "database": { "type": "postgres", "connection_string": "postgresql://..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfigFile {
    Sqlite {
        path: PathBuf,
    },
    #[serde(rename = "memory")]
    Mem,
    Postgres(PostgresConfig),
}

impl ConfigFile {
    /// Load `.blogdb.json` from the current directory.
    pub fn load() -> Result<Self, Box<dyn Error>> {
        Self::load_from(Path::new(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self, Box<dyn Error>> {
        if !path.exists() {
            return Err(format!(
                "Configuration file not found: {}\n\n\
                 Example:\n\
                 {{\n  \"database\": {{ \"type\": \"sqlite\", \"path\": \"./blog.db\" }}\n}}",
                path.display()
            )
            .into());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config = serde_json::from_str(&content)
            .map_err(|e| format!("Invalid JSON in {}: {}", path.display(), e))?;
        Ok(config)
    }
}

impl DatabaseConfigFile {
    pub fn to_database_config(&self) -> Result<DatabaseConfig, Box<dyn Error>> {
        Ok(match self {
            Self::Sqlite { path } => DatabaseConfig::CozoSqlite { path: path.clone() },
            Self::Mem => DatabaseConfig::CozoMem,
            Self::Postgres(pg_config) => DatabaseConfig::Postgres(pg_config.clone()),
        })
    }
}
