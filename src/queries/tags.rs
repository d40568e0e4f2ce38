//! Tag queries.

use super::{create, delete, update};
use crate::db::schema::tables::POST_TAGS;
use crate::db::{text, DbError, Query, Session};
use crate::models::{NewTag, Post, Tag, TagPatch};

pub fn create_tag(session: &mut Session<'_>, new: &NewTag) -> Result<Tag, DbError> {
    create(session, new.to_values())
}

pub fn get_tag(session: &mut Session<'_>, tag_id: i64) -> Result<Option<Tag>, DbError> {
    session.get(tag_id)
}

pub fn get_tag_by_name(session: &mut Session<'_>, name: &str) -> Result<Option<Tag>, DbError> {
    Ok(session.find(&Query::new().eq("name", text(name)).limit(1))?.pop())
}

pub fn get_tag_by_slug(session: &mut Session<'_>, slug: &str) -> Result<Option<Tag>, DbError> {
    Ok(session.find(&Query::new().eq("slug", text(slug)).limit(1))?.pop())
}

pub fn get_tags(session: &mut Session<'_>, skip: usize, limit: usize) -> Result<Vec<Tag>, DbError> {
    session.find(&Query::new().offset(skip).limit(limit))
}

pub fn update_tag(
    session: &mut Session<'_>,
    tag_id: i64,
    patch: &TagPatch,
) -> Result<Option<Tag>, DbError> {
    update(session, tag_id, patch.to_values())
}

/// Delete a tag and its post links. The posts themselves are kept.
pub fn delete_tag(session: &mut Session<'_>, tag_id: i64) -> Result<bool, DbError> {
    delete::<Tag>(session, tag_id)
}

/// Posts carrying the tag, ordered by post id. Empty when the tag is missing.
pub fn get_posts_by_tag(session: &mut Session<'_>, tag_id: i64) -> Result<Vec<Post>, DbError> {
    session.related(POST_TAGS, "tag_id", "post_id", tag_id)
}
