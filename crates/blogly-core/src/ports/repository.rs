use async_trait::async_trait;

use crate::domain::{NewPost, NewTag, NewUser, Post, PostUpdate, Tag, User};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist every field of an existing entity.
    ///
    /// Returns [`RepoError::NotFound`] when no row has the entity's ID.
    async fn save(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository.
#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    /// All users ordered by last name, then first name.
    async fn list(&self) -> Result<Vec<User>, RepoError>;

    async fn create(&self, user: NewUser) -> Result<User, RepoError>;

    /// Delete a user together with all of their posts and those posts' tag links.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// All posts ordered by id.
    async fn list(&self) -> Result<Vec<Post>, RepoError>;

    /// Create a post. The owning user must exist.
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Replace title and content of a post.
    async fn update(&self, id: i32, changes: PostUpdate) -> Result<Post, RepoError>;

    /// Delete a post and its tag links.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    /// Posts owned by a user, newest first. Ties fall back to id, descending.
    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError>;

    /// The `limit` most recently created posts, newest first.
    async fn recent(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Tags attached to a post, ordered by name.
    async fn tags_of(&self, post_id: i32) -> Result<Vec<Tag>, RepoError>;
}

/// Tag repository.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// All tags ordered by name.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    /// Create a tag linked to the given posts. Unknown post ids are skipped.
    async fn create(&self, tag: NewTag) -> Result<Tag, RepoError>;

    /// Rename a tag and replace its whole post set.
    async fn update(&self, id: i32, name: String, post_ids: Vec<i32>) -> Result<Tag, RepoError>;

    /// Delete a tag and its post links.
    async fn delete(&self, id: i32) -> Result<(), RepoError>;

    /// Posts carrying a tag, ordered by id.
    async fn posts_of(&self, tag_id: i32) -> Result<Vec<Post>, RepoError>;
}
