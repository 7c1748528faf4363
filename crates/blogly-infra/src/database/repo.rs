//! SeaORM repository implementations.
//!
//! Multi-row writes run inside one transaction; dropping the transaction on an
//! early return rolls it back.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use blogly_core::domain::{NewPost, NewTag, NewUser, Post, PostUpdate, Tag, User};
use blogly_core::error::RepoError;
use blogly_core::ports::{PostRepository, TagRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::repo_base::{DbBaseRepository, map_db_err};

/// User repository.
pub type DbUserRepository = DbBaseRepository<UserEntity>;

/// Post repository.
pub type DbPostRepository = DbBaseRepository<PostEntity>;

/// Tag repository.
pub type DbTagRepository = DbBaseRepository<TagEntity>;

#[async_trait]
impl UserRepository for DbUserRepository {
    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::LastName)
            .order_by_asc(user::Column::FirstName)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let active_model: user::ActiveModel = new_user.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(user_id = model.id, "User created");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let post_ids: Vec<i32> = PostEntity::find()
            .filter(post::Column::UserId.eq(id))
            .all(&txn)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|p| p.id)
            .collect();

        if !post_ids.is_empty() {
            PostTagEntity::delete_many()
                .filter(post_tag::Column::PostId.is_in(post_ids.iter().copied()))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;

            PostEntity::delete_many()
                .filter(post::Column::UserId.eq(id))
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        let result = UserEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(user_id = id, posts = post_ids.len(), "User deleted");
        Ok(())
    }
}

#[async_trait]
impl PostRepository for DbPostRepository {
    async fn list(&self) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active_model: post::ActiveModel = new_post.into();
        let model = active_model.insert(&self.db).await.map_err(map_db_err)?;

        tracing::debug!(post_id = model.id, user_id = model.user_id, "Post created");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostUpdate) -> Result<Post, RepoError> {
        let mut active_model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();

        active_model.title = Set(changes.title);
        active_model.content = Set(changes.content);

        let model = active_model.update(&self.db).await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = PostEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(post_id = id, "Post deleted");
        Ok(())
    }

    async fn find_by_user_id(&self, user_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn tags_of(&self, post_id: i32) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_tag: NewTag) -> Result<Tag, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = tag::ActiveModel {
            name: Set(new_tag.name),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(map_db_err)?;

        let linked = link_posts(&txn, model.id, &new_tag.post_ids).await?;
        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(tag_id = model.id, posts = linked, "Tag created");
        Ok(model.into())
    }

    async fn update(&self, id: i32, name: String, post_ids: Vec<i32>) -> Result<Tag, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let mut active_model = TagEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?
            .into_active_model();
        active_model.name = Set(name);
        let model = active_model.update(&txn).await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        let linked = link_posts(&txn, id, &post_ids).await?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(tag_id = id, posts = linked, "Tag updated");
        Ok(model.into())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostTagEntity::delete_many()
            .filter(post_tag::Column::TagId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        let result = TagEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(tag_id = id, "Tag deleted");
        Ok(())
    }

    async fn posts_of(&self, tag_id: i32) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .inner_join(PostTagEntity)
            .filter(post_tag::Column::TagId.eq(tag_id))
            .order_by_asc(post::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Link `tag_id` to every existing post among `post_ids`; returns the number of links written.
async fn link_posts<C>(conn: &C, tag_id: i32, post_ids: &[i32]) -> Result<usize, RepoError>
where
    C: ConnectionTrait,
{
    if post_ids.is_empty() {
        return Ok(0);
    }

    let posts = PostEntity::find()
        .filter(post::Column::Id.is_in(post_ids.iter().copied()))
        .all(conn)
        .await
        .map_err(map_db_err)?;

    if posts.is_empty() {
        return Ok(0);
    }

    let links: Vec<post_tag::ActiveModel> = posts
        .iter()
        .map(|p| post_tag::ActiveModel {
            post_id: Set(p.id),
            tag_id: Set(tag_id),
        })
        .collect();
    let count = links.len();

    PostTagEntity::insert_many(links)
        .exec_without_returning(conn)
        .await
        .map_err(map_db_err)?;

    Ok(count)
}
