//! Flash notices - one-time messages carried across a redirect in a cookie.

use actix_web::{
    Error, HttpMessage, HttpResponse,
    cookie::{Cookie, SameSite, time::Duration},
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use std::future::{Future, Ready, ready};
use std::pin::Pin;

/// Cookie holding the pending flash messages as base64url-encoded JSON.
pub const FLASH_COOKIE: &str = "blogly.flash";

/// Verbosity level of a flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub value: String,
}

impl FlashMessage {
    pub fn success(value: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Success,
            value: value.into(),
        }
    }
}

/// Redirect and show `message` on the next page.
pub fn redirect_with_flash(location: &str, message: FlashMessage) -> HttpResponse {
    let value = encode(&[message]);

    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .cookie(
            Cookie::build(FLASH_COOKIE, value)
                .max_age(Duration::seconds(60))
                .path("/")
                .same_site(SameSite::Lax)
                .http_only(true)
                .finish(),
        )
        .finish()
}

/// Flash messages that arrived with the current request.
#[derive(Debug, Clone, Default)]
pub struct IncomingFlash(pub Vec<FlashMessage>);

impl IncomingFlash {
    pub fn messages(&self) -> &[FlashMessage] {
        &self.0
    }
}

fn encode(messages: &[FlashMessage]) -> String {
    URL_SAFE_NO_PAD.encode(serde_json::to_vec(messages).unwrap_or_default())
}

fn decode(cookie: &Cookie<'_>) -> Vec<FlashMessage> {
    let bytes = match URL_SAFE_NO_PAD.decode(cookie.value()) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding undecodable flash cookie");
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding malformed flash cookie");
            Vec::new()
        }
    }
}

/// Extractor for the flash messages read by [`FlashMiddleware`].
impl actix_web::FromRequest for IncomingFlash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        // Release the extensions borrow before `cookie()`, which caches parsed cookies there.
        let stored = req.extensions().get::<IncomingFlash>().cloned();
        let flash = stored.unwrap_or_else(|| {
            IncomingFlash(req.cookie(FLASH_COOKIE).map(|c| decode(&c)).unwrap_or_default())
        });

        ready(Ok(flash))
    }
}

/// Middleware that loads incoming flash messages and expires the cookie once they are shown.
pub struct FlashMiddleware;

impl<S, B> Transform<S, ServiceRequest> for FlashMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = FlashService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FlashService { service }))
    }
}

pub struct FlashService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for FlashService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let incoming = req.cookie(FLASH_COOKIE).map(|c| decode(&c));
        let had_flash = incoming.is_some();

        req.extensions_mut()
            .insert(IncomingFlash(incoming.unwrap_or_default()));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            // Messages are shown once; keep the cookie only if the handler set a fresh one.
            let replaced = res.response().cookies().any(|c| c.name() == FLASH_COOKIE);
            if had_flash && !replaced {
                let removal = Cookie::build(FLASH_COOKIE, "").path("/").finish();
                if let Err(e) = res.response_mut().add_removal_cookie(&removal) {
                    tracing::warn!(error = %e, "Failed to expire flash cookie");
                }
            }

            Ok(res)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::{TestRequest, call_service, init_service, read_body};
    use actix_web::{App, web};

    async fn show(flash: IncomingFlash) -> HttpResponse {
        let text: Vec<&str> = flash.messages().iter().map(|m| m.value.as_str()).collect();
        HttpResponse::Ok().body(text.join("|"))
    }

    async fn leave() -> HttpResponse {
        redirect_with_flash("/show", FlashMessage::success("Saved 100%; done"))
    }

    #[actix_web::test]
    async fn test_flash_survives_one_redirect() {
        let app = init_service(
            App::new()
                .wrap(FlashMiddleware)
                .route("/show", web::get().to(show))
                .route("/leave", web::post().to(leave)),
        )
        .await;

        let resp = call_service(&app, TestRequest::post().uri("/leave").to_request()).await;
        assert_eq!(resp.status(), 303);
        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("flash cookie set")
            .into_owned();

        let resp = call_service(
            &app,
            TestRequest::get().uri("/show").cookie(cookie).to_request(),
        )
        .await;
        let cleared = resp
            .response()
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("flash cookie expired")
            .into_owned();
        assert_eq!(cleared.value(), "");

        let body = read_body(resp).await;
        assert_eq!(body, "Saved 100%; done");
    }

    #[actix_web::test]
    async fn test_no_cookie_means_no_messages() {
        let app = init_service(
            App::new()
                .wrap(FlashMiddleware)
                .route("/show", web::get().to(show)),
        )
        .await;

        let resp = call_service(&app, TestRequest::get().uri("/show").to_request()).await;
        assert!(resp.response().cookies().next().is_none());
        assert_eq!(read_body(resp).await, "");
    }

    #[test]
    fn test_malformed_cookie_is_ignored() {
        let cookie = Cookie::new(FLASH_COOKIE, "not json");
        assert!(decode(&cookie).is_empty());

        let cookie = Cookie::new(FLASH_COOKIE, URL_SAFE_NO_PAD.encode("[{"));
        assert!(decode(&cookie).is_empty());
    }

    #[test]
    fn test_encoded_cookie_round_trips_special_characters() {
        let message = FlashMessage::success("Tag 'café; \"fun\"' deleted.");
        let cookie = Cookie::new(FLASH_COOKIE, encode(&[message.clone()]));
        assert_eq!(decode(&cookie), vec![message]);
    }
}
