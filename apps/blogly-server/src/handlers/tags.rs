//! Tag handlers.
//!
//! Tag forms carry a repeated `posts` field, so their bodies are decoded with
//! [`TagForm::from_urlencoded`] instead of `web::Form`.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::DomainError;
use blogly_core::domain::Tag;
use blogly_shared::dto::TagForm;
use blogly_shared::view::{PostView, TagView, views};

use super::render;
use crate::middleware::error::AppResult;
use crate::middleware::flash::{FlashMessage, IncomingFlash, redirect_with_flash};
use crate::state::AppState;

async fn find_tag(state: &AppState, id: i32) -> AppResult<Tag> {
    let tag = state
        .tags
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Tag", id))?;
    Ok(tag)
}

/// GET /tags
pub async fn index(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let tags: Vec<TagView> = views(state.tags.list().await?);

    let mut ctx = Context::new();
    ctx.insert("tags", &tags);
    render(&state, "tags/index.html", ctx, &flash)
}

/// GET /tags/new
pub async fn new_form(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let posts: Vec<PostView> = views(state.posts.list().await?);

    let mut ctx = Context::new();
    ctx.insert("posts", &posts);
    render(&state, "tags/new.html", ctx, &flash)
}

/// POST /tags/new
pub async fn create(state: web::Data<AppState>, body: web::Bytes) -> AppResult<HttpResponse> {
    let form = TagForm::from_urlencoded(&body)?;
    let tag = state.tags.create(form.into()).await?;

    tracing::info!(tag_id = tag.id, "Tag created");
    Ok(redirect_with_flash(
        "/tags",
        FlashMessage::success(format!("Tag '{}' added.", tag.name)),
    ))
}

/// GET /tags/{id}
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    let posts: Vec<PostView> = views(state.tags.posts_of(tag.id).await?);

    let mut ctx = Context::new();
    ctx.insert("tag", &TagView::from(tag));
    ctx.insert("posts", &posts);
    render(&state, "tags/show.html", ctx, &flash)
}

/// GET /tags/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    let selected: Vec<i32> = state
        .tags
        .posts_of(tag.id)
        .await?
        .iter()
        .map(|p| p.id)
        .collect();
    let posts: Vec<PostView> = views(state.posts.list().await?);

    let mut ctx = Context::new();
    ctx.insert("tag", &TagView::from(tag));
    ctx.insert("posts", &posts);
    ctx.insert("selected", &selected);
    render(&state, "tags/edit.html", ctx, &flash)
}

/// POST /tags/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    let form = TagForm::from_urlencoded(&body)?;
    let tag = state.tags.update(tag.id, form.name, form.post_ids).await?;

    tracing::info!(tag_id = tag.id, "Tag updated");
    Ok(redirect_with_flash(
        "/tags",
        FlashMessage::success(format!("Tag '{}' edited.", tag.name)),
    ))
}

/// POST /tags/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let tag = find_tag(&state, path.into_inner()).await?;
    state.tags.delete(tag.id).await?;

    tracing::info!(tag_id = tag.id, "Tag deleted");
    Ok(redirect_with_flash(
        "/tags",
        FlashMessage::success(format!("Tag '{}' deleted.", tag.name)),
    ))
}
