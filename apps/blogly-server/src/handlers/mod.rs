//! HTTP handlers and route configuration.

mod health;
mod posts;
mod tags;
mod users;

use actix_web::{HttpResponse, http::header, http::header::ContentType, web};
use serde::de::DeserializeOwned;
use tera::Context;

use crate::middleware::error::{AppError, AppResult};
use crate::middleware::flash::IncomingFlash;
use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::FormConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::NotFound(err.to_string()).into()),
    )
    .route("/", web::get().to(root))
    .route("/health", web::get().to(health::health_check))
    .route("/homepage", web::get().to(posts::homepage))
    .service(
        web::scope("/users")
            .service(web::resource("").route(web::get().to(users::index)))
            .service(
                web::resource("/new")
                    .route(web::get().to(users::new_form))
                    .route(web::post().to(users::create)),
            )
            .service(web::resource("/{id}").route(web::get().to(users::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(users::edit_form))
                    .route(web::post().to(users::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(users::delete)))
            .service(
                web::resource("/{id}/posts/new")
                    .route(web::get().to(posts::new_form))
                    .route(web::post().to(posts::create)),
            ),
    )
    .service(
        web::scope("/posts")
            .service(web::resource("/{id}").route(web::get().to(posts::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(posts::edit_form))
                    .route(web::post().to(posts::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(posts::delete))),
    )
    .service(
        web::scope("/tags")
            .service(web::resource("").route(web::get().to(tags::index)))
            .service(
                web::resource("/new")
                    .route(web::get().to(tags::new_form))
                    .route(web::post().to(tags::create)),
            )
            .service(web::resource("/{id}").route(web::get().to(tags::show)))
            .service(
                web::resource("/{id}/edit")
                    .route(web::get().to(tags::edit_form))
                    .route(web::post().to(tags::update)),
            )
            .service(web::resource("/{id}/delete").route(web::post().to(tags::delete))),
    );
}

/// GET / - the user list is the landing page.
async fn root() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/users"))
        .finish()
}

/// Fallback for unknown routes.
pub async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("No such page".to_string()))
}

/// Decode an urlencoded form body.
///
/// Edit actions take the raw body and decode it after the target is loaded,
/// so a missing entity answers 404 before any form error.
fn parse_form<T: DeserializeOwned>(body: &[u8]) -> AppResult<T> {
    serde_urlencoded::from_bytes(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Render `template` with `ctx` plus the pending flash messages.
fn render(
    state: &AppState,
    template: &str,
    mut ctx: Context,
    flash: &IncomingFlash,
) -> AppResult<HttpResponse> {
    ctx.insert("flashes", flash.messages());
    let body = state.templates.render(template, &ctx)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}
