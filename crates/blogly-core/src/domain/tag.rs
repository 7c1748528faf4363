use serde::{Deserialize, Serialize};

/// Tag entity - a unique label attached to any number of posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
}

/// A tag to create together with the posts it is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewTag {
    pub name: String,
    pub post_ids: Vec<i32>,
}
