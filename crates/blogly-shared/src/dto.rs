//! Data Transfer Objects - HTML form submissions.

use serde::Deserialize;
use thiserror::Error;

use blogly_core::domain::{NewTag, NewUser, PostUpdate};

/// Submitted user creation or edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct UserForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<UserForm> for NewUser {
    fn from(form: UserForm) -> Self {
        NewUser::new(form.first_name, form.last_name, form.image_url)
    }
}

/// Submitted post creation or edit form.
#[derive(Debug, Clone, Deserialize)]
pub struct PostForm {
    pub title: String,
    pub content: String,
}

impl From<PostForm> for PostUpdate {
    fn from(form: PostForm) -> Self {
        Self {
            title: form.title,
            content: form.content,
        }
    }
}

/// Errors raised while decoding a [`TagForm`].
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Malformed form body: {0}")]
    Malformed(#[from] serde_urlencoded::de::Error),

    #[error("Missing form field: {0}")]
    MissingField(&'static str),

    #[error("Invalid post id: {0}")]
    InvalidPostId(String),
}

/// Submitted tag creation or edit form.
///
/// The post multi-select arrives as a repeated `posts` field, which a plain
/// struct deserializer cannot collect, so the body is decoded pair by pair.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TagForm {
    pub name: String,
    pub post_ids: Vec<i32>,
}

impl TagForm {
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, FormError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;

        let mut name = None;
        let mut post_ids = Vec::new();
        for (key, value) in pairs {
            match key.as_str() {
                "name" => name = Some(value),
                "posts" => {
                    let id = value
                        .trim()
                        .parse()
                        .map_err(|_| FormError::InvalidPostId(value.clone()))?;
                    if !post_ids.contains(&id) {
                        post_ids.push(id);
                    }
                }
                _ => {}
            }
        }

        Ok(Self {
            name: name.ok_or(FormError::MissingField("name"))?,
            post_ids,
        })
    }
}

impl From<TagForm> for NewTag {
    fn from(form: TagForm) -> Self {
        Self {
            name: form.name,
            post_ids: form.post_ids,
        }
    }
}
