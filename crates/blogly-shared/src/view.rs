//! View models - entities plus the derived attributes templates display.

use serde::Serialize;

use blogly_core::domain::{Post, Tag, User};

#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub image_url: String,
    pub full_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            image_url: user.image_url,
            full_name,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: String,
    pub friendly_date: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        let friendly_date = post.friendly_date();
        Self {
            id: post.id,
            user_id: post.user_id,
            title: post.title,
            content: post.content,
            created_at: post.created_at.to_rfc3339(),
            friendly_date,
        }
    }
}

/// A post together with its author, as listed on the homepage.
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    #[serde(flatten)]
    pub post: PostView,
    pub author: Option<UserView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for TagView {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
        }
    }
}

/// Convert a collection of domain values into view models.
pub fn views<T, V>(items: Vec<T>) -> Vec<V>
where
    V: From<T>,
{
    items.into_iter().map(V::from).collect()
}
