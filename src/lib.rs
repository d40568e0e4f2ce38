//! blogdb library - relational model of a small blog
//!
//! Provides the schema definition, the embedded store with its unit-of-work
//! sessions, typed entity models with CRUD operations, the SQL schema exporter,
//! and the command layer behind the `blogdb` binary.

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod export;
pub mod logging;
pub mod models;
pub mod output;
pub mod queries;

#[macro_use]
pub mod test_macros;

#[cfg(test)]
pub mod test_utils;
