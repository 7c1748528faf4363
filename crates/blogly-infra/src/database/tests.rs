use blogly_core::domain::{NewPost, NewTag, NewUser, Post, PostUpdate, Tag, User};
use blogly_core::error::RepoError;
use blogly_core::ports::{BaseRepository, PostRepository, TagRepository, UserRepository};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DbConn};

use crate::database::{DbPostRepository, DbTagRepository, DbUserRepository};

/// In-memory SQLite database with the Blogly schema applied.
///
/// A single connection keeps every query on the same in-memory database.
async fn setup() -> DbConn {
    let opts = ConnectOptions::new("sqlite::memory:")
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false)
        .to_owned();
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

struct Repos {
    users: DbUserRepository,
    posts: DbPostRepository,
    tags: DbTagRepository,
}

async fn repos() -> Repos {
    let db = setup().await;
    Repos {
        users: DbUserRepository::new(db.clone()),
        posts: DbPostRepository::new(db.clone()),
        tags: DbTagRepository::new(db),
    }
}

async fn create_user(repos: &Repos, first: &str, last: &str) -> User {
    repos
        .users
        .create(NewUser::new(first.to_string(), last.to_string(), None))
        .await
        .unwrap()
}

async fn create_post(repos: &Repos, user_id: i32, title: &str) -> Post {
    repos
        .posts
        .create(NewPost::new(user_id, title.to_string(), "content".to_string()))
        .await
        .unwrap()
}

fn ids(posts: &[Post]) -> Vec<i32> {
    posts.iter().map(|p| p.id).collect()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let repos = repos().await;
    let user = create_user(&repos, "Find", "Me").await;
    let post = create_post(&repos, user.id, "Test Post").await;

    let found: Post = repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Test Post");
    assert_eq!(found.user_id, user.id);

    let missing: Option<Post> = repos.posts.find_by_id(post.id + 1).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_create_then_fetch_user() {
    let repos = repos().await;
    let user = create_user(&repos, "Alan", "Alda").await;

    let fetched: User = repos.users.find_by_id(user.id).await.unwrap().unwrap();

    assert_eq!(fetched.full_name(), "Alan Alda");
    assert_eq!(fetched.image_url, blogly_core::domain::DEFAULT_IMAGE_URL);
}

#[tokio::test]
async fn test_users_listed_by_last_then_first_name() {
    let repos = repos().await;
    create_user(&repos, "Zed", "Burton").await;
    create_user(&repos, "Alan", "Smith").await;
    create_user(&repos, "Amy", "Burton").await;

    let names: Vec<String> = repos
        .users
        .list()
        .await
        .unwrap()
        .iter()
        .map(User::full_name)
        .collect();

    assert_eq!(names, vec!["Amy Burton", "Zed Burton", "Alan Smith"]);
}

#[tokio::test]
async fn test_save_replaces_user_fields() {
    let repos = repos().await;
    let mut user = create_user(&repos, "Jane", "Doe").await;
    user.first_name = "Janet".to_string();
    user.image_url = "https://example.com/janet.png".to_string();

    let saved: User = repos.users.save(user.clone()).await.unwrap();
    let fetched: User = repos.users.find_by_id(user.id).await.unwrap().unwrap();

    assert_eq!(saved, fetched);
    assert_eq!(fetched.full_name(), "Janet Doe");
}

#[tokio::test]
async fn test_save_missing_user_is_not_found() {
    let repos = repos().await;
    let ghost = User {
        id: 999,
        first_name: "No".to_string(),
        last_name: "One".to_string(),
        image_url: String::new(),
    };

    let result: Result<User, RepoError> = repos.users.save(ghost).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_user_cascades_to_posts_and_links() {
    let repos = repos().await;
    let owner = create_user(&repos, "Owner", "One").await;
    let other = create_user(&repos, "Other", "Two").await;
    let first = create_post(&repos, owner.id, "First").await;
    let second = create_post(&repos, owner.id, "Second").await;
    let kept = create_post(&repos, other.id, "Kept").await;

    let tag = repos
        .tags
        .create(NewTag {
            name: "rust".to_string(),
            post_ids: vec![first.id, second.id, kept.id],
        })
        .await
        .unwrap();

    repos.users.delete(owner.id).await.unwrap();

    let gone: Option<User> = repos.users.find_by_id(owner.id).await.unwrap();
    assert!(gone.is_none());
    assert!(repos.posts.find_by_user_id(owner.id).await.unwrap().is_empty());

    let remaining: Option<Post> = repos.posts.find_by_id(first.id).await.unwrap();
    assert!(remaining.is_none());

    let tagged = repos.tags.posts_of(tag.id).await.unwrap();
    assert_eq!(ids(&tagged), vec![kept.id]);
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let repos = repos().await;
    let result = repos.users.delete(42).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_update_post_keeps_owner_and_date() {
    let repos = repos().await;
    let user = create_user(&repos, "Post", "Author").await;
    let post = create_post(&repos, user.id, "Draft").await;

    let updated = repos
        .posts
        .update(
            post.id,
            PostUpdate {
                title: "Final".to_string(),
                content: "Done".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.content, "Done");
    assert_eq!(updated.user_id, user.id);
    assert_eq!(updated.created_at.timestamp(), post.created_at.timestamp());
}

#[tokio::test]
async fn test_update_missing_post_is_not_found() {
    let repos = repos().await;
    let result = repos
        .posts
        .update(
            5,
            PostUpdate {
                title: "x".to_string(),
                content: "y".to_string(),
            },
        )
        .await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_recent_returns_at_most_five_newest_first() {
    let repos = repos().await;
    let user = create_user(&repos, "Busy", "Writer").await;

    let base = chrono::Utc::now();
    let mut created = Vec::new();
    for i in 0..7 {
        let post = repos
            .posts
            .create(NewPost {
                user_id: user.id,
                title: format!("Post {i}"),
                content: "body".to_string(),
                created_at: base + chrono::Duration::minutes(i),
            })
            .await
            .unwrap();
        created.push(post.id);
    }

    let recent = repos.posts.recent(5).await.unwrap();

    let expected: Vec<i32> = created.iter().rev().take(5).copied().collect();
    assert_eq!(ids(&recent), expected);
}

#[tokio::test]
async fn test_user_posts_listed_newest_first() {
    let repos = repos().await;
    let user = create_user(&repos, "Order", "Ly").await;
    let other = create_user(&repos, "Some", "Body").await;

    let base = chrono::Utc::now();
    let mut created = Vec::new();
    for (i, minutes) in [0, 10, 5].into_iter().enumerate() {
        let post = repos
            .posts
            .create(NewPost {
                user_id: user.id,
                title: format!("Post {i}"),
                content: "body".to_string(),
                created_at: base + chrono::Duration::minutes(minutes),
            })
            .await
            .unwrap();
        created.push(post.id);
    }
    let tie = repos
        .posts
        .create(NewPost {
            user_id: user.id,
            title: "Tie".to_string(),
            content: "body".to_string(),
            created_at: base + chrono::Duration::minutes(10),
        })
        .await
        .unwrap();
    create_post(&repos, other.id, "Not mine").await;

    let posts = repos.posts.find_by_user_id(user.id).await.unwrap();

    assert_eq!(ids(&posts), vec![tie.id, created[1], created[2], created[0]]);
}

#[tokio::test]
async fn test_delete_post_removes_tag_links() {
    let repos = repos().await;
    let user = create_user(&repos, "Tag", "Ger").await;
    let post = create_post(&repos, user.id, "Tagged").await;
    let tag = repos
        .tags
        .create(NewTag {
            name: "news".to_string(),
            post_ids: vec![post.id],
        })
        .await
        .unwrap();

    repos.posts.delete(post.id).await.unwrap();

    assert!(repos.tags.posts_of(tag.id).await.unwrap().is_empty());
    let still_there: Option<Tag> = repos.tags.find_by_id(tag.id).await.unwrap();
    assert!(still_there.is_some());
}

#[tokio::test]
async fn test_duplicate_tag_name_is_constraint_violation() {
    let repos = repos().await;
    repos
        .tags
        .create(NewTag {
            name: "fun".to_string(),
            post_ids: vec![],
        })
        .await
        .unwrap();

    let result = repos
        .tags
        .create(NewTag {
            name: "fun".to_string(),
            post_ids: vec![],
        })
        .await;

    assert!(matches!(result, Err(RepoError::Constraint(_))));
    assert_eq!(repos.tags.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_tag_skips_unknown_posts() {
    let repos = repos().await;
    let user = create_user(&repos, "A", "B").await;
    let post = create_post(&repos, user.id, "Real").await;

    let tag = repos
        .tags
        .create(NewTag {
            name: "mixed".to_string(),
            post_ids: vec![post.id, 404],
        })
        .await
        .unwrap();

    assert_eq!(ids(&repos.tags.posts_of(tag.id).await.unwrap()), vec![post.id]);
    assert_eq!(repos.posts.tags_of(post.id).await.unwrap(), vec![tag]);
}

#[tokio::test]
async fn test_update_tag_replaces_post_set() {
    let repos = repos().await;
    let user = create_user(&repos, "Set", "Replacer").await;
    let a = create_post(&repos, user.id, "A").await;
    let b = create_post(&repos, user.id, "B").await;
    let c = create_post(&repos, user.id, "C").await;

    let tag = repos
        .tags
        .create(NewTag {
            name: "before".to_string(),
            post_ids: vec![a.id, b.id],
        })
        .await
        .unwrap();

    let renamed = repos
        .tags
        .update(tag.id, "after".to_string(), vec![b.id, c.id])
        .await
        .unwrap();

    assert_eq!(renamed.name, "after");
    assert_eq!(ids(&repos.tags.posts_of(tag.id).await.unwrap()), vec![b.id, c.id]);
    assert!(repos.posts.tags_of(a.id).await.unwrap().is_empty());

    repos.tags.update(tag.id, "after".to_string(), vec![]).await.unwrap();
    assert!(repos.tags.posts_of(tag.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_tag_is_not_found() {
    let repos = repos().await;
    let result = repos.tags.update(3, "nope".to_string(), vec![]).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_delete_tag_keeps_posts() {
    let repos = repos().await;
    let user = create_user(&repos, "Keep", "Posts").await;
    let post = create_post(&repos, user.id, "Survivor").await;
    let tag = repos
        .tags
        .create(NewTag {
            name: "temp".to_string(),
            post_ids: vec![post.id],
        })
        .await
        .unwrap();

    repos.tags.delete(tag.id).await.unwrap();

    assert!(repos.tags.list().await.unwrap().is_empty());
    assert!(repos.posts.tags_of(post.id).await.unwrap().is_empty());
    let survivor: Option<Post> = repos.posts.find_by_id(post.id).await.unwrap();
    assert!(survivor.is_some());
    assert!(matches!(
        repos.tags.delete(tag.id).await,
        Err(RepoError::NotFound)
    ));
}
