use chrono::{DateTime, Utc};
use serde::Serialize;

use super::set;
use crate::db::schema::tables::COMMENTS;
use crate::db::{boolean, int, opt_int, text, DbError, Entity, Record, Values};

/// A comment on a post. Replies point at their parent through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub is_approved: bool,
    pub author_id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

impl Entity for Comment {
    const TABLE: &'static str = COMMENTS;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, DbError> {
        Ok(Self {
            id: record.int("id")?,
            content: record.string("content")?,
            is_approved: record.boolean("is_approved")?,
            author_id: record.int("author_id")?,
            post_id: record.int("post_id")?,
            parent_id: record.opt_int("parent_id")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewComment {
    pub content: String,
    pub author_id: i64,
    pub post_id: i64,
    pub parent_id: Option<i64>,
}

impl NewComment {
    pub fn new(content: &str, author_id: i64, post_id: i64) -> Self {
        Self {
            content: content.to_string(),
            author_id,
            post_id,
            parent_id: None,
        }
    }

    pub fn reply_to(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn to_values(&self) -> Values {
        Values::from([
            ("content".to_string(), text(&self.content)),
            ("author_id".to_string(), int(self.author_id)),
            ("post_id".to_string(), int(self.post_id)),
            ("parent_id".to_string(), opt_int(self.parent_id)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommentPatch {
    pub content: Option<String>,
    pub is_approved: Option<bool>,
}

impl CommentPatch {
    pub fn content(content: &str) -> Self {
        Self {
            content: Some(content.to_string()),
            ..Self::default()
        }
    }

    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        set(&mut values, "content", &self.content, |s| text(s));
        set(&mut values, "is_approved", &self.is_approved, |b| boolean(*b));
        values
    }
}
