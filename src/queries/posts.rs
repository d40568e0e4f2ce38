//! Post queries and the post/tag association.

use super::{create, delete, in_transaction, refresh, update};
use crate::db::schema::tables::POST_TAGS;
use crate::db::{int, text, DbError, Query, Session, Values};
use crate::models::{NewPost, Post, PostPatch, Tag};

/// Page size used by callers that do not pick one.
pub const DEFAULT_LIMIT: usize = 10;

fn link(post_id: i64, tag_id: i64) -> Values {
    Values::from([
        ("post_id".to_string(), int(post_id)),
        ("tag_id".to_string(), int(tag_id)),
    ])
}

pub fn create_post(session: &mut Session<'_>, new: &NewPost) -> Result<Post, DbError> {
    create(session, new.to_values())
}

pub fn get_post(session: &mut Session<'_>, post_id: i64) -> Result<Option<Post>, DbError> {
    session.get(post_id)
}

pub fn get_post_by_slug(session: &mut Session<'_>, slug: &str) -> Result<Option<Post>, DbError> {
    Ok(session.find(&Query::new().eq("slug", text(slug)).limit(1))?.pop())
}

pub fn get_posts(session: &mut Session<'_>, skip: usize, limit: usize) -> Result<Vec<Post>, DbError> {
    session.find(&Query::new().offset(skip).limit(limit))
}

/// Every post written by `author_id`, unpaginated.
pub fn get_posts_by_author(session: &mut Session<'_>, author_id: i64) -> Result<Vec<Post>, DbError> {
    session.find(&Query::new().eq("author_id", int(author_id)))
}

pub fn update_post(
    session: &mut Session<'_>,
    post_id: i64,
    patch: &PostPatch,
) -> Result<Option<Post>, DbError> {
    update(session, post_id, patch.to_values())
}

/// Delete a post, its comments (replies included) and its tag links.
pub fn delete_post(session: &mut Session<'_>, post_id: i64) -> Result<bool, DbError> {
    delete::<Post>(session, post_id)
}

/// Attach a tag to a post.
///
/// Returns `None` without touching the store when either side is missing.
/// Attaching a tag that is already attached leaves a single link.
pub fn add_tag_to_post(
    session: &mut Session<'_>,
    post_id: i64,
    tag_id: i64,
) -> Result<Option<Post>, DbError> {
    if get_post(session, post_id)?.is_none() || session.get::<Tag>(tag_id)?.is_none() {
        return Ok(None);
    }
    in_transaction(session, |s| s.insert_link(POST_TAGS, link(post_id, tag_id)))?;
    refresh(session, post_id).map(Some)
}

/// Detach a tag from a post. `false` when they were not linked.
pub fn remove_tag_from_post(
    session: &mut Session<'_>,
    post_id: i64,
    tag_id: i64,
) -> Result<bool, DbError> {
    in_transaction(session, |s| s.remove_link(POST_TAGS, link(post_id, tag_id)))
}

/// Tags attached to a post, ordered by tag id.
pub fn get_post_tags(session: &mut Session<'_>, post_id: i64) -> Result<Vec<Tag>, DbError> {
    session.related(POST_TAGS, "post_id", "tag_id", post_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{NewTag, NewUser, User};
    use crate::queries::{create_tag, create_user};
    use crate::test_utils::blog_db;
    use rstest::{fixture, rstest};

    #[fixture]
    fn db() -> Database {
        blog_db()
    }

    fn author(session: &mut Session<'_>) -> User {
        create_user(session, &NewUser::new("john", "john@example.com", "pw")).unwrap()
    }

    #[rstest]
    fn test_create_post_defaults(db: Database) {
        let mut session = db.session();
        let user = author(&mut session);
        let post = create_post(&mut session, &NewPost::new("Intro", "Hello", user.id)).unwrap();

        assert!(!post.is_published);
        assert_eq!(post.view_count, 0);
        assert_eq!(post.published_at, None);
        assert_eq!(post.author_id, user.id);
    }

    #[rstest]
    fn test_create_post_unknown_author(db: Database) {
        let mut session = db.session();
        let err = create_post(&mut session, &NewPost::new("Intro", "Hello", 42)).unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
        assert!(get_posts(&mut session, 0, DEFAULT_LIMIT).unwrap().is_empty());
    }

    #[rstest]
    fn test_slug_unique_only_when_set(db: Database) {
        let mut session = db.session();
        let user = author(&mut session);
        create_post(&mut session, &NewPost::new("a", "x", user.id)).unwrap();
        create_post(&mut session, &NewPost::new("b", "x", user.id)).unwrap();

        let slugged = NewPost {
            slug: Some("intro".to_string()),
            ..NewPost::new("c", "x", user.id)
        };
        create_post(&mut session, &slugged).unwrap();
        assert!(matches!(
            create_post(&mut session, &slugged),
            Err(DbError::UniqueViolation { .. })
        ));
        assert_eq!(
            get_post_by_slug(&mut session, "intro").unwrap().map(|p| p.title),
            Some("c".to_string())
        );
    }

    #[rstest]
    fn test_get_posts_by_author(db: Database) {
        let mut session = db.session();
        let john = author(&mut session);
        let jane = create_user(&mut session, &NewUser::new("jane", "jane@example.com", "pw")).unwrap();
        create_post(&mut session, &NewPost::new("j1", "x", john.id)).unwrap();
        create_post(&mut session, &NewPost::new("n1", "x", jane.id)).unwrap();
        create_post(&mut session, &NewPost::new("j2", "x", john.id)).unwrap();

        let titles: Vec<_> = get_posts_by_author(&mut session, john.id)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["j1", "j2"]);
    }

    #[rstest]
    fn test_update_post_publish(db: Database) {
        let mut session = db.session();
        let user = author(&mut session);
        let post = create_post(&mut session, &NewPost::new("Intro", "Hello", user.id)).unwrap();

        let now = chrono::Utc::now();
        let patch = PostPatch {
            is_published: Some(true),
            published_at: Some(Some(now)),
            ..PostPatch::default()
        };
        let updated = update_post(&mut session, post.id, &patch).unwrap().unwrap();
        assert!(updated.is_published);
        assert_eq!(
            updated.published_at.map(|t| t.timestamp_micros()),
            Some(now.timestamp_micros())
        );
        assert_eq!(updated.title, "Intro");
    }

    #[rstest]
    fn test_add_tag_missing_side_is_noop(db: Database) {
        let mut session = db.session();
        let user = author(&mut session);
        let post = create_post(&mut session, &NewPost::new("Intro", "Hello", user.id)).unwrap();

        assert!(add_tag_to_post(&mut session, post.id, 99).unwrap().is_none());
        assert!(add_tag_to_post(&mut session, 99, 1).unwrap().is_none());
        assert!(get_post_tags(&mut session, post.id).unwrap().is_empty());
    }

    #[rstest]
    fn test_add_and_remove_tag(db: Database) {
        let mut session = db.session();
        let user = author(&mut session);
        let post = create_post(&mut session, &NewPost::new("Intro", "Hello", user.id)).unwrap();
        let rust = create_tag(&mut session, &NewTag::new("Rust")).unwrap();
        let db_tag = create_tag(&mut session, &NewTag::new("Databases")).unwrap();

        assert!(add_tag_to_post(&mut session, post.id, db_tag.id).unwrap().is_some());
        assert!(add_tag_to_post(&mut session, post.id, rust.id).unwrap().is_some());
        assert!(add_tag_to_post(&mut session, post.id, rust.id).unwrap().is_some());

        let names: Vec<_> = get_post_tags(&mut session, post.id)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Rust", "Databases"]);

        assert!(remove_tag_from_post(&mut session, post.id, rust.id).unwrap());
        assert!(!remove_tag_from_post(&mut session, post.id, rust.id).unwrap());
        assert_eq!(get_post_tags(&mut session, post.id).unwrap().len(), 1);
    }
}
