//! Table definitions for the blog domain.
//!
//! Each table is a function so tests and the exporter can build only what they
//! need. `blog_schema()` assembles all of them into the registry used at runtime.

use super::definition::{Column, ColumnType, DefaultValue, OnDelete, Schema, Table};

pub const USERS: &str = "users";
pub const POSTS: &str = "posts";
pub const TAGS: &str = "tags";
pub const COMMENTS: &str = "comments";
pub const POST_TAGS: &str = "post_tags";

fn created_at() -> Column {
    Column::new("created_at", ColumnType::Timestamp).default(DefaultValue::CurrentTimestamp)
}

fn updated_at() -> Column {
    Column::new("updated_at", ColumnType::Timestamp)
        .default(DefaultValue::CurrentTimestamp)
        .on_update_now()
}

pub fn users() -> Table {
    Table::new(
        USERS,
        vec![
            Column::id().indexed(),
            Column::new("username", ColumnType::Varchar(50))
                .not_null()
                .unique()
                .indexed(),
            Column::new("email", ColumnType::Varchar(100))
                .not_null()
                .unique()
                .indexed(),
            Column::new("hashed_password", ColumnType::Varchar(255)).not_null(),
            Column::new("full_name", ColumnType::Varchar(100)),
            Column::new("bio", ColumnType::Text),
            Column::new("is_active", ColumnType::Boolean).default(DefaultValue::Bool(true)),
            Column::new("is_superuser", ColumnType::Boolean).default(DefaultValue::Bool(false)),
            created_at(),
            updated_at(),
        ],
    )
}

pub fn posts() -> Table {
    Table::new(
        POSTS,
        vec![
            Column::id().indexed(),
            Column::new("title", ColumnType::Varchar(200)).not_null(),
            Column::new("slug", ColumnType::Varchar(200)).unique().indexed(),
            Column::new("content", ColumnType::Text).not_null(),
            Column::new("summary", ColumnType::Text),
            Column::new("is_published", ColumnType::Boolean).default(DefaultValue::Bool(false)),
            Column::new("published_at", ColumnType::Timestamp),
            Column::new("view_count", ColumnType::Integer).default(DefaultValue::Int(0)),
            Column::new("author_id", ColumnType::Integer)
                .not_null()
                .references(USERS, "id", OnDelete::Cascade),
            created_at(),
            updated_at(),
        ],
    )
}

pub fn tags() -> Table {
    Table::new(
        TAGS,
        vec![
            Column::id().indexed(),
            Column::new("name", ColumnType::Varchar(50))
                .not_null()
                .unique()
                .indexed(),
            Column::new("slug", ColumnType::Varchar(50)).unique().indexed(),
            Column::new("description", ColumnType::Text),
            created_at(),
        ],
    )
}

/// Association between posts and tags. No primary key, no payload.
pub fn post_tags() -> Table {
    Table::new(
        POST_TAGS,
        vec![
            Column::new("post_id", ColumnType::Integer).references(POSTS, "id", OnDelete::Cascade),
            Column::new("tag_id", ColumnType::Integer).references(TAGS, "id", OnDelete::Cascade),
        ],
    )
}

pub fn comments() -> Table {
    Table::new(
        COMMENTS,
        vec![
            Column::id().indexed(),
            Column::new("content", ColumnType::Text).not_null(),
            Column::new("is_approved", ColumnType::Boolean).default(DefaultValue::Bool(true)),
            Column::new("author_id", ColumnType::Integer)
                .not_null()
                .references(USERS, "id", OnDelete::Cascade),
            Column::new("post_id", ColumnType::Integer)
                .not_null()
                .references(POSTS, "id", OnDelete::Cascade),
            Column::new("parent_id", ColumnType::Integer).references(
                COMMENTS,
                "id",
                OnDelete::Cascade,
            ),
            created_at(),
            updated_at(),
        ],
    )
}

/// The complete blog schema.
pub fn blog_schema() -> Schema {
    Schema::new(vec![users(), posts(), tags(), post_tags(), comments()])
}
