use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{set, set_opt_text};
use crate::db::schema::tables::TAGS;
use crate::db::{opt_text, text, DbError, Entity, Record, Values};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Tag {
    const TABLE: &'static str = TAGS;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, DbError> {
        Ok(Self {
            id: record.int("id")?,
            name: record.string("name")?,
            slug: record.opt_string("slug")?,
            description: record.opt_string("description")?,
            created_at: record.timestamp("created_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTag {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

impl NewTag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_slug(mut self, slug: &str) -> Self {
        self.slug = Some(slug.to_string());
        self
    }

    pub fn to_values(&self) -> Values {
        Values::from([
            ("name".to_string(), text(&self.name)),
            ("slug".to_string(), opt_text(self.slug.as_deref())),
            ("description".to_string(), opt_text(self.description.as_deref())),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<Option<String>>,
    pub description: Option<Option<String>>,
}

impl TagPatch {
    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        set(&mut values, "name", &self.name, |s| text(s));
        set_opt_text(&mut values, "slug", &self.slug);
        set_opt_text(&mut values, "description", &self.description);
        values
    }
}
