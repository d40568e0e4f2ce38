//! Shared test utilities for unit and execute tests.

use std::sync::{Mutex, OnceLock};

use crate::db::schema::blog_schema;
use crate::db::Database;

/// Serialises tests that touch process-wide state (current directory, env vars).
pub fn test_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

/// An in-memory store with every blog table created.
pub fn blog_db() -> Database {
    let db = Database::open_mem(blog_schema()).expect("Failed to open in-memory store");
    db.initialize().expect("Failed to create blog tables");
    db
}
