//! Comment queries. Replies are flat rows linked by `parent_id`.

use super::{create, delete, update};
use crate::db::{int, DbError, Query, Session};
use crate::models::{Comment, CommentPatch, NewComment};

pub fn create_comment(session: &mut Session<'_>, new: &NewComment) -> Result<Comment, DbError> {
    create(session, new.to_values())
}

pub fn get_comment(session: &mut Session<'_>, comment_id: i64) -> Result<Option<Comment>, DbError> {
    session.get(comment_id)
}

/// Top-level comments of a post. Replies are reached through
/// [`get_comment_replies`].
pub fn get_post_comments(session: &mut Session<'_>, post_id: i64) -> Result<Vec<Comment>, DbError> {
    session.find(&Query::new().eq("post_id", int(post_id)).is_null("parent_id"))
}

/// Direct replies only, not the whole subtree.
pub fn get_comment_replies(
    session: &mut Session<'_>,
    comment_id: i64,
) -> Result<Vec<Comment>, DbError> {
    session.find(&Query::new().eq("parent_id", int(comment_id)))
}

/// Every comment written by a user, replies included.
pub fn get_user_comments(session: &mut Session<'_>, user_id: i64) -> Result<Vec<Comment>, DbError> {
    session.find(&Query::new().eq("author_id", int(user_id)))
}

pub fn update_comment(
    session: &mut Session<'_>,
    comment_id: i64,
    patch: &CommentPatch,
) -> Result<Option<Comment>, DbError> {
    update(session, comment_id, patch.to_values())
}

/// Delete a comment and all replies beneath it.
pub fn delete_comment(session: &mut Session<'_>, comment_id: i64) -> Result<bool, DbError> {
    delete::<Comment>(session, comment_id)
}
