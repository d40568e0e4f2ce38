//! Data-access operations for the blog entities.
//!
//! Every function takes the caller's `Session`. Reads see committed data and
//! never take the write lock. Mutations commit before returning and roll the
//! session back when they fail. Not-found is reported
//! as `None` or `false`, never as an error.

pub mod comments;
pub mod posts;
pub mod tags;
pub mod users;

pub use comments::{
    create_comment, delete_comment, get_comment, get_comment_replies, get_post_comments,
    get_user_comments, update_comment,
};
pub use posts::{
    add_tag_to_post, create_post, delete_post, get_post, get_post_by_slug, get_post_tags,
    get_posts, get_posts_by_author, remove_tag_from_post, update_post,
};
pub use tags::{
    create_tag, delete_tag, get_posts_by_tag, get_tag, get_tag_by_name, get_tag_by_slug, get_tags,
    update_tag,
};
pub use users::{
    create_user, delete_user, get_user, get_user_by_email, get_user_by_username, get_users,
    update_user,
};

use crate::db::{DbError, Entity, Session, Values};

/// Run `op`, committing on success and rolling back on failure.
///
/// The original error is returned even if the rollback itself fails.
pub(crate) fn in_transaction<T>(
    session: &mut Session<'_>,
    op: impl FnOnce(&mut Session<'_>) -> Result<T, DbError>,
) -> Result<T, DbError> {
    match op(session) {
        Ok(value) => {
            session.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = session.rollback() {
                tracing::warn!(error = %rollback, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Re-read a row after a commit.
pub(crate) fn refresh<E: Entity>(session: &mut Session<'_>, id: i64) -> Result<E, DbError> {
    session.get::<E>(id)?.ok_or_else(|| DbError::QueryFailed {
        message: format!("{} row {} missing after commit", E::TABLE, id),
    })
}

/// Insert a new row, commit, and return the stored entity.
pub(crate) fn create<E: Entity>(session: &mut Session<'_>, values: Values) -> Result<E, DbError> {
    let id = in_transaction(session, |s| s.insert(E::TABLE, values))?;
    refresh(session, id)
}

/// Apply a partial update. `None` when the row does not exist.
pub(crate) fn update<E: Entity>(
    session: &mut Session<'_>,
    id: i64,
    changes: Values,
) -> Result<Option<E>, DbError> {
    let found = in_transaction(session, |s| s.update(E::TABLE, id, changes))?;
    if !found {
        return Ok(None);
    }
    refresh(session, id).map(Some)
}

/// Delete a row and its cascade closure. `false` when the row does not exist.
pub(crate) fn delete<E: Entity>(session: &mut Session<'_>, id: i64) -> Result<bool, DbError> {
    in_transaction(session, |s| s.delete(E::TABLE, id))
}
