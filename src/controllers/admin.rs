//! Admin dashboard: list every user and note, delete any note.

use actix_web::{web, HttpRequest, Responder};

use super::{current_user, html_page, redirect_with_flash, take_flash};
use crate::{templates, AppState};

async fn admin_dashboard(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if !user.role.is_admin() {
        return redirect_with_flash("/dashboard", "danger", "Access denied");
    }

    let users = match state.db.list_users() {
        Ok(users) => users,
        Err(e) => {
            log::error!("Failed to list users: {}", e);
            Vec::new()
        }
    };

    let notes = match state.db.list_all_notes() {
        Ok(notes) => notes,
        Err(e) => {
            log::error!("Failed to list notes: {}", e);
            Vec::new()
        }
    };

    html_page(templates::admin::dashboard(&user, &users, &notes, take_flash(&req)))
}

async fn delete_note_admin(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if !user.role.is_admin() {
        return redirect_with_flash("/dashboard", "danger", "Access denied");
    }

    let id = path.into_inner();
    match state.db.delete_note(id) {
        Ok(_) => redirect_with_flash("/admin", "success", "Note deleted"),
        Err(e) => {
            log::error!("Failed to delete note {}: {}", id, e);
            redirect_with_flash("/admin", "danger", "Failed to delete note")
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/admin", web::get().to(admin_dashboard))
        .route("/delete_note_admin/{id}", web::get().to(delete_note_admin));
}
