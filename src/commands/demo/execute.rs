use std::error::Error;

use serde::Serialize;
use tracing::info;

use super::DemoCmd;
use crate::commands::{Context, Execute};
use crate::db::DbError;
use crate::models::{NewComment, NewPost, NewTag, NewUser, PostPatch};
use crate::queries;

/// A labelled answer to one sample query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryExample {
    pub label: String,
    pub value: String,
}

impl QueryExample {
    fn new(label: impl Into<String>, value: impl ToString) -> Self {
        Self {
            label: label.into(),
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DemoResult {
    pub backend: String,
    pub created: Vec<String>,
    pub queries: Vec<QueryExample>,
    pub relationships: Vec<QueryExample>,
}

fn missing(what: &str, id: i64) -> DbError {
    DbError::QueryFailed {
        message: format!("{} {} vanished during the demo", what, id),
    }
}

impl Execute for DemoCmd {
    type Output = DemoResult;

    fn execute(self, ctx: &Context) -> Result<Self::Output, Box<dyn Error>> {
        let backend = ctx.connect()?;
        let store = backend
            .as_store()
            .ok_or("demo needs the embedded store; use a sqlite:// path or :memory:")?;
        store.initialize()?;
        let mut session = store.session();
        let mut created = Vec::new();

        let john = queries::create_user(
            &mut session,
            &NewUser {
                full_name: Some("John Doe".to_string()),
                ..NewUser::new("john_doe", "john@example.com", "hashed_password_123")
            },
        )?;
        created.push(format!("user {} (id {})", john.username, john.id));

        let jane = queries::create_user(
            &mut session,
            &NewUser {
                full_name: Some("Jane Smith".to_string()),
                ..NewUser::new("jane_smith", "jane@example.com", "hashed_password_456")
            },
        )?;
        created.push(format!("user {} (id {})", jane.username, jane.id));

        let technology = queries::create_tag(&mut session, &NewTag::new("Technology").with_slug("technology"))?;
        let python = queries::create_tag(&mut session, &NewTag::new("Python").with_slug("python"))?;
        created.push(format!("tags {}, {}", technology.name, python.name));

        let intro = queries::create_post(
            &mut session,
            &NewPost {
                slug: Some("introduction-to-relational-modelling".to_string()),
                summary: Some("Learn the basics of relational modelling".to_string()),
                ..NewPost::new(
                    "Introduction to Relational Modelling",
                    "Tables, keys and relationships are the building blocks...",
                    john.id,
                )
            },
        )?;
        created.push(format!("post {:?}", intro.title));

        let patterns = queries::create_post(
            &mut session,
            &NewPost {
                slug: Some("advanced-database-patterns".to_string()),
                summary: Some("Database design patterns for complex applications".to_string()),
                ..NewPost::new(
                    "Advanced Database Patterns",
                    "Let's explore advanced patterns in database design...",
                    jane.id,
                )
            },
        )?;
        created.push(format!("post {:?}", patterns.title));

        for (post_id, tag_id) in [
            (intro.id, python.id),
            (intro.id, technology.id),
            (patterns.id, technology.id),
        ] {
            queries::add_tag_to_post(&mut session, post_id, tag_id)?;
        }

        let comment = queries::create_comment(
            &mut session,
            &NewComment::new("Great article! Very helpful.", jane.id, intro.id),
        )?;
        created.push(format!("comment {} on post {}", comment.id, intro.id));

        let reply = queries::create_comment(
            &mut session,
            &NewComment::new("Thank you! Glad you found it helpful.", john.id, intro.id).reply_to(comment.id),
        )?;
        created.push(format!("reply {} to comment {}", reply.id, comment.id));

        let mut examples = Vec::new();
        let users = queries::get_users(&mut session, 0, queries::users::DEFAULT_LIMIT)?;
        examples.push(QueryExample::new("Total users", users.len()));

        let john_posts = queries::get_posts_by_author(&mut session, john.id)?;
        examples.push(QueryExample::new(format!("Posts by {}", john.username), john_posts.len()));

        let intro_comments = queries::get_post_comments(&mut session, intro.id)?;
        examples.push(QueryExample::new(
            format!("Comments on post '{}'", intro.title),
            intro_comments.len(),
        ));

        let tech_posts = queries::get_posts_by_tag(&mut session, technology.id)?;
        examples.push(QueryExample::new(
            format!("Posts with '{}' tag", technology.name),
            tech_posts.len(),
        ));

        let updated = queries::update_post(
            &mut session,
            intro.id,
            &PostPatch {
                title: Some("Introduction to Relational Modelling (Updated)".to_string()),
                is_published: Some(true),
                ..PostPatch::default()
            },
        )?
        .ok_or_else(|| missing("post", intro.id))?;
        examples.push(QueryExample::new("Updated post title", &updated.title));

        let mut relationships = Vec::new();
        let post = queries::get_post(&mut session, intro.id)?.ok_or_else(|| missing("post", intro.id))?;
        let author = queries::get_user(&mut session, post.author_id)?
            .ok_or_else(|| missing("user", post.author_id))?;
        relationships.push(QueryExample::new(format!("Post '{}' by", post.title), &author.username));

        let tag_names: Vec<_> = queries::get_post_tags(&mut session, post.id)?
            .into_iter()
            .map(|t| t.name)
            .collect();
        relationships.push(QueryExample::new(format!("Tags for '{}'", post.title), tag_names.join(", ")));

        let titles: Vec<_> = queries::get_posts_by_author(&mut session, author.id)?
            .into_iter()
            .map(|p| p.title)
            .collect();
        relationships.push(QueryExample::new(format!("{}'s posts", author.username), titles.join(", ")));

        info!(users = users.len(), "demo data created");
        Ok(DemoResult {
            backend: backend.backend_name().to_string(),
            created,
            queries: examples,
            relationships,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DatabaseConfig;
    use rstest::rstest;
    use tempfile::TempDir;

    fn value<'a>(examples: &'a [QueryExample], label: &str) -> &'a str {
        examples
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.value.as_str())
            .unwrap_or_else(|| panic!("no example labelled {label}"))
    }

    #[rstest]
    fn test_demo_in_memory() {
        let result = DemoCmd {}
            .execute(&Context::new(DatabaseConfig::CozoMem))
            .expect("Demo should succeed");

        assert_eq!(result.backend, "CozoMem");
        assert_eq!(result.created.len(), 7);
        assert_eq!(value(&result.queries, "Total users"), "2");
        assert_eq!(value(&result.queries, "Posts by john_doe"), "1");
        assert_eq!(
            value(&result.queries, "Comments on post 'Introduction to Relational Modelling'"),
            "1"
        );
        assert_eq!(value(&result.queries, "Posts with 'Technology' tag"), "2");
        assert_eq!(
            value(&result.queries, "Updated post title"),
            "Introduction to Relational Modelling (Updated)"
        );

        let tags = value(
            &result.relationships,
            "Tags for 'Introduction to Relational Modelling (Updated)'",
        );
        assert!(tags.contains("Python") && tags.contains("Technology"));
        assert_eq!(
            value(&result.relationships, "john_doe's posts"),
            "Introduction to Relational Modelling (Updated)"
        );
    }

    #[rstest]
    fn test_demo_twice_hits_unique_username() {
        let dir = TempDir::new().unwrap();
        let ctx = Context::new(DatabaseConfig::CozoSqlite {
            path: dir.path().join("demo.db"),
        });
        DemoCmd {}.execute(&ctx).expect("First demo should succeed");

        let err = DemoCmd {}.execute(&ctx).unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
    }
}
