//! Register, login, and logout.

use actix_web::cookie::Cookie;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Deserialize;

use super::{html_page, redirect_with_flash, take_flash, SESSION_COOKIE};
use crate::templates;
use crate::AppState;

#[derive(Deserialize)]
struct RegisterForm {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginForm {
    email: String,
    password: String,
}

async fn register_page(req: HttpRequest) -> impl Responder {
    html_page(templates::auth::register(take_flash(&req)))
}

async fn register_submit(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> impl Responder {
    match state.db.get_user_by_email(&form.email) {
        Ok(Some(_)) => return redirect_with_flash("/register", "danger", "Email already exists"),
        Ok(None) => {}
        Err(e) => {
            log::error!("Failed to check email {}: {}", form.email, e);
            return redirect_with_flash("/register", "danger", "Registration failed");
        }
    }

    let password_hash = match crate::auth::hash_password(&form.password) {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("Failed to hash password: {}", e);
            return redirect_with_flash("/register", "danger", "Registration failed");
        }
    };

    match state.db.create_user(&form.name, &form.email, &password_hash) {
        Ok(_) => redirect_with_flash("/login", "success", "Registered successfully, login now"),
        Err(e) => {
            // Unique-constraint backstop for a concurrent registration
            log::error!("Failed to create user {}: {}", form.email, e);
            redirect_with_flash("/register", "danger", "Email already exists")
        }
    }
}

async fn login_page(req: HttpRequest) -> impl Responder {
    html_page(templates::auth::login(take_flash(&req)))
}

async fn login_submit(state: web::Data<AppState>, form: web::Form<LoginForm>) -> impl Responder {
    let user = match state.db.get_user_by_email(&form.email) {
        Ok(Some(user)) => {
            if crate::auth::verify_password(&form.password, &user.password_hash) {
                Some(user)
            } else {
                None
            }
        }
        Ok(None) => None,
        Err(e) => {
            log::error!("Failed to look up {}: {}", form.email, e);
            None
        }
    };

    // Unknown email and wrong password produce the same message
    let Some(user) = user else {
        return redirect_with_flash("/login", "danger", "Invalid credentials");
    };

    let session = match state.db.create_session(user.id) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Failed to create session for user {}: {}", user.id, e);
            return redirect_with_flash("/login", "danger", "Login failed");
        }
    };

    let signed = crate::auth::sign_token(&state.config.session_secret, &session.token);
    let cookie = Cookie::build(SESSION_COOKIE, signed)
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::SeeOther()
        .cookie(cookie)
        .append_header(("Location", "/dashboard"))
        .finish()
}

async fn logout(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Some(token) =
            crate::auth::verify_signed_token(&state.config.session_secret, cookie.value())
        {
            if let Err(e) = state.db.delete_session(&token) {
                log::error!("Failed to delete session: {}", e);
            }
        }
    }

    let mut clear = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    clear.make_removal();

    let flash_value = format!("success:{}", urlencoding::encode("Logged out"));
    let flash = Cookie::build(super::FLASH_COOKIE, flash_value).path("/").finish();

    HttpResponse::SeeOther()
        .cookie(clear)
        .cookie(flash)
        .append_header(("Location", "/login"))
        .finish()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::get().to(register_page))
        .route("/register", web::post().to(register_submit))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login_submit))
        .route("/logout", web::get().to(logout));
}
