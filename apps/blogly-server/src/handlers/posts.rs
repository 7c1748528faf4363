//! Post handlers, including the homepage.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::DomainError;
use blogly_core::domain::{NewPost, Post};
use blogly_shared::dto::PostForm;
use blogly_shared::view::{PostSummary, PostView, TagView, UserView, views};

use super::{parse_form, render};
use super::users::find_user;
use crate::middleware::error::AppResult;
use crate::middleware::flash::{FlashMessage, IncomingFlash, redirect_with_flash};
use crate::state::AppState;

/// Number of posts shown on the homepage.
pub const HOMEPAGE_POST_LIMIT: u64 = 5;

async fn find_post(state: &AppState, id: i32) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Post", id))?;
    Ok(post)
}

/// GET /homepage
pub async fn homepage(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let posts = state.posts.recent(HOMEPAGE_POST_LIMIT).await?;

    let mut summaries = Vec::with_capacity(posts.len());
    for post in posts {
        let author = state.users.find_by_id(post.user_id).await?.map(UserView::from);
        summaries.push(PostSummary {
            post: post.into(),
            author,
        });
    }

    let mut ctx = Context::new();
    ctx.insert("posts", &summaries);
    render(&state, "homepage.html", ctx, &flash)
}

/// GET /users/{id}/posts/new
pub async fn new_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &UserView::from(user));
    render(&state, "posts/new.html", ctx, &flash)
}

/// POST /users/{id}/posts/new
pub async fn create(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let form: PostForm = parse_form(&body)?;

    let post = state
        .posts
        .create(NewPost::new(user.id, form.title, form.content))
        .await?;

    tracing::info!(post_id = post.id, user_id = user.id, "Post created");
    Ok(redirect_with_flash(
        &format!("/users/{}", user.id),
        FlashMessage::success(format!("Post '{}' added.", post.title)),
    ))
}

/// GET /posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let author = find_user(&state, post.user_id).await?;
    let tags: Vec<TagView> = views(state.posts.tags_of(post.id).await?);

    let mut ctx = Context::new();
    ctx.insert("post", &PostView::from(post));
    ctx.insert("user", &UserView::from(author));
    ctx.insert("tags", &tags);
    render(&state, "posts/show.html", ctx, &flash)
}

/// GET /posts/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;

    let mut ctx = Context::new();
    ctx.insert("post", &PostView::from(post));
    render(&state, "posts/edit.html", ctx, &flash)
}

/// POST /posts/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    let form: PostForm = parse_form(&body)?;
    let post = state.posts.update(post.id, form.into()).await?;

    tracing::info!(post_id = post.id, "Post updated");
    Ok(redirect_with_flash(
        &format!("/users/{}", post.user_id),
        FlashMessage::success(format!("Post '{}' edited.", post.title)),
    ))
}

/// POST /posts/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let post = find_post(&state, path.into_inner()).await?;
    state.posts.delete(post.id).await?;

    tracing::info!(post_id = post.id, "Post deleted");
    Ok(redirect_with_flash(
        "/users",
        FlashMessage::success(format!("Post '{}' deleted.", post.title)),
    ))
}
