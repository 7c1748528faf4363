//! User handlers.

use actix_web::{HttpResponse, web};
use tera::Context;

use blogly_core::DomainError;
use blogly_core::domain::{NewUser, User};
use blogly_shared::dto::UserForm;
use blogly_shared::view::{PostView, UserView, views};

use super::{parse_form, render};
use crate::middleware::error::AppResult;
use crate::middleware::flash::{FlashMessage, IncomingFlash, redirect_with_flash};
use crate::state::AppState;

/// Load a user or fail with not-found.
pub(super) async fn find_user(state: &AppState, id: i32) -> AppResult<User> {
    let user = state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("User", id))?;
    Ok(user)
}

/// GET /users
pub async fn index(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    let users: Vec<UserView> = views(state.users.list().await?);

    let mut ctx = Context::new();
    ctx.insert("users", &users);
    render(&state, "users/index.html", ctx, &flash)
}

/// GET /users/new
pub async fn new_form(state: web::Data<AppState>, flash: IncomingFlash) -> AppResult<HttpResponse> {
    render(&state, "users/new.html", Context::new(), &flash)
}

/// POST /users/new
pub async fn create(
    state: web::Data<AppState>,
    form: web::Form<UserForm>,
) -> AppResult<HttpResponse> {
    let new_user: NewUser = form.into_inner().into();
    let user = state.users.create(new_user).await?;

    tracing::info!(user_id = user.id, "User created");
    Ok(redirect_with_flash(
        &format!("/users/{}", user.id),
        FlashMessage::success(format!("User '{}' added.", user.full_name())),
    ))
}

/// GET /users/{id}
pub async fn show(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    let posts: Vec<PostView> = views(state.posts.find_by_user_id(user.id).await?);

    let mut ctx = Context::new();
    ctx.insert("user", &UserView::from(user));
    ctx.insert("posts", &posts);
    render(&state, "users/show.html", ctx, &flash)
}

/// GET /users/{id}/edit
pub async fn edit_form(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    flash: IncomingFlash,
) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;

    let mut ctx = Context::new();
    ctx.insert("user", &UserView::from(user));
    render(&state, "users/edit.html", ctx, &flash)
}

/// POST /users/{id}/edit
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let mut user = find_user(&state, path.into_inner()).await?;

    let fields: NewUser = parse_form::<UserForm>(&body)?.into();
    user.first_name = fields.first_name;
    user.last_name = fields.last_name;
    user.image_url = fields.image_url;

    let user = state.users.save(user).await?;

    tracing::info!(user_id = user.id, "User updated");
    Ok(redirect_with_flash(
        "/users",
        FlashMessage::success(format!("User '{}' edited.", user.full_name())),
    ))
}

/// POST /users/{id}/delete
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let user = find_user(&state, path.into_inner()).await?;
    state.users.delete(user.id).await?;

    tracing::info!(user_id = user.id, "User deleted with their posts");
    Ok(redirect_with_flash(
        "/users",
        FlashMessage::success(format!("User '{}' deleted.", user.full_name())),
    ))
}
