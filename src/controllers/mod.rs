pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod export;
pub mod images;
pub mod notes;

use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::models::User;
use crate::AppState;

pub const SESSION_COOKIE: &str = "session";
pub const FLASH_COOKIE: &str = "flash";

/// A one-shot message carried across a redirect and shown on the next page
#[derive(Debug, Clone)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

/// Resolve the logged-in user from the signed session cookie.
/// Returns a redirect-to-login response when there is no valid session.
pub fn current_user(state: &web::Data<AppState>, req: &HttpRequest) -> Result<User, HttpResponse> {
    let cookie = req.cookie(SESSION_COOKIE).ok_or_else(login_redirect)?;

    let token = crate::auth::verify_signed_token(&state.config.session_secret, cookie.value())
        .ok_or_else(login_redirect)?;

    let session = match state.db.validate_session(&token) {
        Ok(Some(session)) => session,
        Ok(None) => return Err(login_redirect()),
        Err(e) => {
            log::error!("Session validation error: {}", e);
            return Err(login_redirect());
        }
    };

    match state.db.get_user(session.user_id) {
        Ok(Some(user)) => Ok(user),
        Ok(None) => Err(login_redirect()),
        Err(e) => {
            log::error!("Failed to load user {}: {}", session.user_id, e);
            Err(login_redirect())
        }
    }
}

fn login_redirect() -> HttpResponse {
    redirect_with_flash("/login", "danger", "Please log in")
}

/// Redirect and queue a flash message for the next rendered page
pub fn redirect_with_flash(location: &str, category: &str, message: &str) -> HttpResponse {
    let value = format!("{}:{}", category, urlencoding::encode(message));
    let cookie = Cookie::build(FLASH_COOKIE, value).path("/").finish();

    HttpResponse::SeeOther()
        .cookie(cookie)
        .append_header(("Location", location.to_string()))
        .finish()
}

/// Plain redirect with no flash
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .append_header(("Location", location.to_string()))
        .finish()
}

/// Read the pending flash message, if any
pub fn take_flash(req: &HttpRequest) -> Option<Flash> {
    let cookie = req.cookie(FLASH_COOKIE)?;
    let (category, encoded) = cookie.value().split_once(':')?;
    let message = urlencoding::decode(encoded).ok()?.to_string();

    Some(Flash {
        category: category.to_string(),
        message,
    })
}

/// Render a page, clearing any flash cookie that was just displayed
pub fn html_page(markup: maud::Markup) -> HttpResponse {
    let mut clear = Cookie::build(FLASH_COOKIE, "").path("/").finish();
    clear.make_removal();

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .cookie(clear)
        .body(markup.into_string())
}
