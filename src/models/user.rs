use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{set, set_opt_text};
use crate::db::schema::tables::USERS;
use crate::db::{boolean, opt_text, text, DbError, Entity, Record, Values};

/// A registered account. Owns posts and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for User {
    const TABLE: &'static str = USERS;

    fn id(&self) -> i64 {
        self.id
    }

    fn from_record(record: &Record) -> Result<Self, DbError> {
        Ok(Self {
            id: record.int("id")?,
            username: record.string("username")?,
            email: record.string("email")?,
            hashed_password: record.string("hashed_password")?,
            full_name: record.opt_string("full_name")?,
            bio: record.opt_string("bio")?,
            is_active: record.boolean("is_active")?,
            is_superuser: record.boolean("is_superuser")?,
            created_at: record.timestamp("created_at")?,
            updated_at: record.timestamp("updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Stored as given. Hashing is the caller's job.
    pub hashed_password: String,
    pub full_name: Option<String>,
    pub bio: Option<String>,
}

impl NewUser {
    pub fn new(username: &str, email: &str, hashed_password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            ..Self::default()
        }
    }

    pub fn to_values(&self) -> Values {
        Values::from([
            ("username".to_string(), text(&self.username)),
            ("email".to_string(), text(&self.email)),
            ("hashed_password".to_string(), text(&self.hashed_password)),
            ("full_name".to_string(), opt_text(self.full_name.as_deref())),
            ("bio".to_string(), opt_text(self.bio.as_deref())),
        ])
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub full_name: Option<Option<String>>,
    pub bio: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub is_superuser: Option<bool>,
}

impl UserPatch {
    pub fn to_values(&self) -> Values {
        let mut values = Values::new();
        set(&mut values, "username", &self.username, |s| text(s));
        set(&mut values, "email", &self.email, |s| text(s));
        set(&mut values, "hashed_password", &self.hashed_password, |s| text(s));
        set_opt_text(&mut values, "full_name", &self.full_name);
        set_opt_text(&mut values, "bio", &self.bio);
        set(&mut values, "is_active", &self.is_active, |b| boolean(*b));
        set(&mut values, "is_superuser", &self.is_superuser, |b| boolean(*b));
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::null;

    #[test]
    fn test_empty_patch_has_no_values() {
        assert!(UserPatch::default().to_values().is_empty());
    }

    #[test]
    fn test_patch_clears_nullable_field() {
        let patch = UserPatch {
            bio: Some(None),
            is_active: Some(false),
            ..UserPatch::default()
        };
        let values = patch.to_values();
        assert_eq!(values.get("bio"), Some(&null()));
        assert_eq!(values.get("is_active"), Some(&boolean(false)));
        assert!(!values.contains_key("full_name"));
    }

    #[test]
    fn test_password_not_serialized() {
        let user = User {
            id: 1,
            username: "ann".to_string(),
            email: "ann@example.com".to_string(),
            hashed_password: "secret".to_string(),
            full_name: None,
            bio: None,
            is_active: true,
            is_superuser: false,
            created_at: DateTime::UNIX_EPOCH,
            updated_at: DateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"username\":\"ann\""));
    }
}
