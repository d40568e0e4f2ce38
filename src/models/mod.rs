//! Typed entities of the blog domain.
//!
//! Each entity maps one row of its table. `New*` structs carry the fields of a
//! create call and `*Patch` structs the fields of a partial update. Nullable
//! columns use `Option<Option<_>>` in patches so "leave as is" and "set to NULL"
//! stay distinct.

mod comment;
mod post;
mod tag;
mod user;

pub use comment::{Comment, CommentPatch, NewComment};
pub use post::{NewPost, Post, PostPatch};
pub use tag::{NewTag, Tag, TagPatch};
pub use user::{NewUser, User, UserPatch};

use chrono::{DateTime, Utc};

use crate::db::{opt_text, opt_timestamp, Values};

/// Insert `value` under `column` when the patch field was supplied.
fn set<T>(values: &mut Values, column: &str, field: &Option<T>, convert: impl Fn(&T) -> cozo::DataValue) {
    if let Some(value) = field {
        values.insert(column.to_string(), convert(value));
    }
}

fn set_opt_text(values: &mut Values, column: &str, field: &Option<Option<String>>) {
    set(values, column, field, |v| opt_text(v.as_deref()));
}

fn set_opt_timestamp(values: &mut Values, column: &str, field: &Option<Option<DateTime<Utc>>>) {
    set(values, column, field, |v| opt_timestamp(*v));
}
