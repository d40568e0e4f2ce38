use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{set, set_opt_text, set_opt_timestamp};
use crate::db::schema::tables::POSTS;
use crate::db::{boolean, int, opt_text, opt_timestamp, text, DbError, Entity, Record, Values};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: Option<String>,
    pub content: String,
    pub summary: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub view_count: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Post {
    const TABLE: &'static str = POSTS;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, DbError> {
        Ok(Self {
            id: record.int("id")?,
            title: record.string("title")?,
            slug: record.opt_string("slug")?,
            content: record.string("content")?,
            summary: record.opt_string("summary")?,
            is_published: record.boolean("is_published")?,
            published_at: record.opt_timestamp("published_at")?,
            view_count: record.int("view_count")?,
            author_id: record.int("author_id")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
    pub slug: Option<String>,
    pub summary: Option<String>,
    pub is_published: bool,
    pub published_at: Option<DateTime<Utc>>,
}

impl NewPost {
    pub fn new(title: &str, content: &str, author_id: i64) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
            author_id,
            ..Self::default()
        }
    }

    pub fn to_values(&self) -> Values {
        Values::from([
            ("title".to_string(), text(&self.title)),
            ("content".to_string(), text(&self.content)),
            ("author_id".to_string(), int(self.author_id)),
            ("slug".to_string(), opt_text(self.slug.as_deref())),
            ("summary".to_string(), opt_text(self.summary.as_deref())),
            ("is_published".to_string(), boolean(self.is_published)),
            ("published_at".to_string(), opt_timestamp(self.published_at)),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<Option<String>>,
    pub content: Option<String>,
    pub summary: Option<Option<String>>,
    pub is_published: Option<bool>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub view_count: Option<i64>,
    pub author_id: Option<i64>,
}

impl PostPatch {
    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        set(&mut values, "title", &self.title, |s| text(s));
        set_opt_text(&mut values, "slug", &self.slug);
        set(&mut values, "content", &self.content, |s| text(s));
        set_opt_text(&mut values, "summary", &self.summary);
        set(&mut values, "is_published", &self.is_published, |b| boolean(*b));
        set_opt_timestamp(&mut values, "published_at", &self.published_at);
        set(&mut values, "view_count", &self.view_count, |n| int(*n));
        set(&mut values, "author_id", &self.author_id, |n| int(*n));
        values
    }
}
