//! PDF export for a single note.

use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::{current_user, redirect_with_flash};
use crate::{pdf, uploads, AppState};

async fn export_pdf(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let note = match state.db.get_note(id) {
        Ok(Some(note)) => note,
        Ok(None) => return redirect_with_flash("/dashboard", "danger", "Note not found"),
        Err(e) => {
            log::error!("Failed to load note {}: {}", id, e);
            return redirect_with_flash("/dashboard", "danger", "Note not found");
        }
    };

    // Same owner-or-admin boundary as view/edit/delete
    if !note.accessible_by(&user) {
        return redirect_with_flash("/dashboard", "danger", "Access denied");
    }

    match pdf::note_document(&note.title, &note.content) {
        Ok(bytes) => {
            let filename = uploads::sanitize_filename(&format!("{}.pdf", note.title));
            HttpResponse::Ok()
                .content_type("application/pdf")
                .append_header((
                    "Content-Disposition",
                    format!("attachment; filename=\"{}\"", filename),
                ))
                .body(bytes)
        }
        Err(e) => {
            log::error!("Failed to build PDF for note {}: {}", note.id, e);
            redirect_with_flash("/dashboard", "danger", "Export failed")
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/export_pdf/{id}", web::get().to(export_pdf));
}
