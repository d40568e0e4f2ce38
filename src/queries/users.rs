//! User queries.

use super::{create, delete, update};
use crate::db::{text, DbError, Query, Session};
use crate::models::{NewUser, User, UserPatch};

/// Page size used by callers that do not pick one.
pub const DEFAULT_LIMIT: usize = 100;

pub fn create_user(session: &mut Session<'_>, new: &NewUser) -> Result<User, DbError> {
    create(session, new.to_values())
}

pub fn get_user(session: &mut Session<'_>, user_id: i64) -> Result<Option<User>, DbError> {
    session.get(user_id)
}

pub fn get_user_by_email(session: &mut Session<'_>, email: &str) -> Result<Option<User>, DbError> {
    Ok(session
        .find(&Query::new().eq("email", text(email)).limit(1))?
        .pop())
}

pub fn get_user_by_username(
    session: &mut Session<'_>,
    username: &str,
) -> Result<Option<User>, DbError> {
    Ok(session
        .find(&Query::new().eq("username", text(username)).limit(1))?
        .pop())
}

/// Users in insertion order, skipping `skip` and returning at most `limit`.
pub fn get_users(session: &mut Session<'_>, skip: usize, limit: usize) -> Result<Vec<User>, DbError> {
    session.find(&Query::new().offset(skip).limit(limit))
}

pub fn update_user(
    session: &mut Session<'_>,
    user_id: i64,
    patch: &UserPatch,
) -> Result<Option<User>, DbError> {
    update(session, user_id, patch.to_values())
}

/// Delete a user along with their posts and comments.
pub fn delete_user(session: &mut Session<'_>, user_id: i64) -> Result<bool, DbError> {
    delete::<User>(session, user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::test_utils::blog_db;
    use rstest::{fixture, rstest};

    #[fixture]
    fn db() -> Database {
        blog_db()
    }

    #[rstest]
    fn test_create_user_applies_defaults(db: Database) {
        let mut session = db.session();
        let user = create_user(&mut session, &NewUser::new("john", "john@example.com", "pw")).unwrap();

        assert_eq!(user.id, 1);
        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(user.full_name, None);
        assert_eq!(user.created_at, user.updated_at);
    }

    #[rstest]
    fn test_lookup_by_natural_keys(db: Database) {
        let mut session = db.session();
        create_user(&mut session, &NewUser::new("john", "john@example.com", "pw")).unwrap();

        let by_email = get_user_by_email(&mut session, "john@example.com").unwrap();
        assert_eq!(by_email.map(|u| u.username), Some("john".to_string()));

        let by_name = get_user_by_username(&mut session, "john").unwrap();
        assert_eq!(by_name.map(|u| u.email), Some("john@example.com".to_string()));

        assert!(get_user_by_email(&mut session, "nobody@example.com").unwrap().is_none());
    }

    #[rstest]
    fn test_duplicate_email_rejected(db: Database) {
        let mut session = db.session();
        create_user(&mut session, &NewUser::new("john", "john@example.com", "pw")).unwrap();

        let err = create_user(&mut session, &NewUser::new("jane", "john@example.com", "pw")).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref column, .. } if column == "email"));

        // The failed create leaves the session usable.
        let jane = create_user(&mut session, &NewUser::new("jane", "jane@example.com", "pw")).unwrap();
        assert_eq!(jane.id, 2);
    }

    #[rstest]
    #[case(0, 2, vec!["u0", "u1"])]
    #[case(3, 10, vec!["u3", "u4"])]
    #[case(5, 10, vec![])]
    fn test_get_users_pagination(
        db: Database,
        #[case] skip: usize,
        #[case] limit: usize,
        #[case] expected: Vec<&str>,
    ) {
        let mut session = db.session();
        for i in 0..5 {
            let name = format!("u{}", i);
            create_user(&mut session, &NewUser::new(&name, &format!("{}@example.com", name), "pw"))
                .unwrap();
        }

        let names: Vec<_> = get_users(&mut session, skip, limit)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, expected);
    }

    #[rstest]
    fn test_update_user_changes_only_supplied_fields(db: Database) {
        let mut session = db.session();
        let user = create_user(&mut session, &NewUser::new("john", "john@example.com", "pw")).unwrap();

        let patch = UserPatch {
            full_name: Some(Some("John Doe".to_string())),
            ..UserPatch::default()
        };
        let updated = update_user(&mut session, user.id, &patch).unwrap().unwrap();

        assert_eq!(updated.full_name.as_deref(), Some("John Doe"));
        assert_eq!(updated.email, user.email);
        assert_eq!(updated.created_at, user.created_at);
        assert!(updated.updated_at >= user.updated_at);
    }

    #[rstest]
    fn test_update_missing_user(db: Database) {
        let mut session = db.session();
        let patch = UserPatch {
            bio: Some(Some("x".to_string())),
            ..UserPatch::default()
        };
        assert!(update_user(&mut session, 99, &patch).unwrap().is_none());
    }

    #[rstest]
    fn test_delete_user(db: Database) {
        let mut session = db.session();
        let user = create_user(&mut session, &NewUser::new("john", "john@example.com", "pw")).unwrap();

        assert!(delete_user(&mut session, user.id).unwrap());
        assert!(get_user(&mut session, user.id).unwrap().is_none());
        assert!(!delete_user(&mut session, user.id).unwrap());
    }
}
