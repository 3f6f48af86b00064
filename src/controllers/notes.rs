//! Note CRUD: create, view, edit, delete, favorite toggle, history, reorder.

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use futures_util::StreamExt;
use serde::Deserialize;

use super::{current_user, html_page, redirect, redirect_with_flash, take_flash};
use crate::config::images_dir;
use crate::models::note::parse_tag_list;
use crate::models::{Note, User};
use crate::{markdown, templates, uploads, AppState};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Fields shared by the create and edit forms
struct NoteForm {
    title: String,
    content: String,
    tags: Vec<String>,
    image: Option<(String, Vec<u8>)>,
}

/// Read the multipart note form. Text fields are collected by name; the
/// optional image field keeps its original filename for sanitizing later.
async fn read_note_form(mut payload: Multipart) -> Result<NoteForm, String> {
    let mut form = NoteForm {
        title: String::new(),
        content: String::new(),
        tags: Vec::new(),
        image: None,
    };

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Failed to process form: {}", e))?;

        let name = field
            .content_disposition()
            .get_name()
            .unwrap_or("")
            .to_string();
        let filename = field
            .content_disposition()
            .get_filename()
            .map(|s| s.to_string());

        let mut data: Vec<u8> = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| format!("Failed to read form data: {}", e))?;
            data.extend_from_slice(&chunk);
            if data.len() > MAX_IMAGE_BYTES {
                return Err("Image exceeds the 5MB upload limit".to_string());
            }
        }

        match name.as_str() {
            "title" => form.title = String::from_utf8_lossy(&data).trim().to_string(),
            "content" => form.content = String::from_utf8_lossy(&data).to_string(),
            "tags" => form.tags = parse_tag_list(&String::from_utf8_lossy(&data)),
            "image" => {
                if let Some(filename) = filename.filter(|f| !f.is_empty()) {
                    if !data.is_empty() {
                        form.image = Some((filename, data));
                    }
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

/// Store an uploaded image, returning the saved filename
fn store_image(upload: &(String, Vec<u8>)) -> Option<String> {
    match uploads::save_image(&images_dir(), &upload.0, &upload.1) {
        Ok(filename) => Some(filename),
        Err(e) => {
            log::error!("Failed to save image {}: {}", upload.0, e);
            None
        }
    }
}

/// Fetch a note and apply the owner-or-admin gate.
/// Failures map to the flash-and-redirect contract shared by view/edit/delete.
fn fetch_accessible_note(
    state: &web::Data<AppState>,
    user: &User,
    id: i64,
) -> Result<Note, HttpResponse> {
    let note = match state.db.get_note(id) {
        Ok(Some(note)) => note,
        Ok(None) => return Err(redirect_with_flash("/dashboard", "danger", "Note not found")),
        Err(e) => {
            log::error!("Failed to load note {}: {}", id, e);
            return Err(redirect_with_flash("/dashboard", "danger", "Note not found"));
        }
    };

    if !note.accessible_by(user) {
        return Err(redirect_with_flash("/dashboard", "danger", "Access denied"));
    }

    Ok(note)
}

async fn create_note_page(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    html_page(templates::notes::create(&user, take_flash(&req)))
}

async fn create_note_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let form = match read_note_form(payload).await {
        Ok(form) => form,
        Err(e) => return redirect_with_flash("/create_note", "danger", &e),
    };

    let image = form.image.as_ref().and_then(store_image);

    match state.db.create_note(
        &form.title,
        &form.content,
        &form.tags,
        image.as_deref(),
        user.id,
        &user.name,
    ) {
        Ok(_) => redirect_with_flash("/dashboard", "success", "Note created"),
        Err(e) => {
            log::error!("Failed to create note for user {}: {}", user.id, e);
            redirect_with_flash("/create_note", "danger", "Failed to create note")
        }
    }
}

async fn view_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let note = match fetch_accessible_note(&state, &user, path.into_inner()) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    let content_html = markdown::render(&note.content);
    html_page(templates::notes::view(&user, &note, &content_html, take_flash(&req)))
}

async fn edit_note_page(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let note = match fetch_accessible_note(&state, &user, path.into_inner()) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    html_page(templates::notes::edit(&user, &note, take_flash(&req)))
}

async fn edit_note_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let id = path.into_inner();
    let note = match fetch_accessible_note(&state, &user, id) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    let form = match read_note_form(payload).await {
        Ok(form) => form,
        Err(e) => return redirect_with_flash(&format!("/edit_note/{}", id), "danger", &e),
    };

    // Snapshot the pre-edit state first; the overwrite below is a separate
    // write against the same row.
    if let Err(e) = state.db.push_version(id, &note.snapshot()) {
        log::error!("Failed to snapshot note {}: {}", id, e);
        return redirect_with_flash("/dashboard", "danger", "Failed to update note");
    }

    // A new upload replaces the image; otherwise the old filename is kept
    let image = match form.image.as_ref() {
        Some(upload) => store_image(upload).or(note.image),
        None => note.image,
    };

    match state
        .db
        .update_note_fields(id, &form.title, &form.content, &form.tags, image.as_deref())
    {
        Ok(_) => redirect_with_flash("/dashboard", "success", "Note updated"),
        Err(e) => {
            log::error!("Failed to update note {}: {}", id, e);
            redirect_with_flash("/dashboard", "danger", "Failed to update note")
        }
    }
}

async fn delete_note(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let note = match fetch_accessible_note(&state, &user, path.into_inner()) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    match state.db.delete_note(note.id) {
        Ok(_) => redirect_with_flash("/dashboard", "success", "Note deleted"),
        Err(e) => {
            log::error!("Failed to delete note {}: {}", note.id, e);
            redirect_with_flash("/dashboard", "danger", "Failed to delete note")
        }
    }
}

/// Flip the favorite flag for the owner (or an admin); anyone else gets a
/// silent redirect with no error shown.
async fn toggle_favorite(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    if let Ok(Some(note)) = state.db.get_note(path.into_inner()) {
        if note.accessible_by(&user) {
            if let Err(e) = state.db.set_favorite(note.id, !note.favorite) {
                log::error!("Failed to toggle favorite on note {}: {}", note.id, e);
            }
        }
    }

    redirect("/dashboard")
}

async fn note_history(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let note = match fetch_accessible_note(&state, &user, path.into_inner()) {
        Ok(note) => note,
        Err(resp) => return resp,
    };

    html_page(templates::notes::history(&user, &note, take_flash(&req)))
}

#[derive(Deserialize)]
struct ReorderForm {
    order: Option<String>,
}

/// Persist a manual ordering. Writes are scoped to the requester's own notes
/// (admins may reorder anyone's); ids outside that scope are skipped.
async fn reorder_notes(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<ReorderForm>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    let ids: Vec<i64> =
        serde_json::from_str(form.order.as_deref().unwrap_or("[]")).unwrap_or_default();
    let owner = if user.role.is_admin() { None } else { Some(user.id) };

    for (index, id) in ids.iter().enumerate() {
        match state.db.set_order_index(*id, index as i64, owner) {
            Ok(_) => {}
            Err(e) => log::error!("Failed to set order for note {}: {}", id, e),
        }
    }

    HttpResponse::Ok().body("ok")
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/create_note", web::get().to(create_note_page))
        .route("/create_note", web::post().to(create_note_submit))
        .route("/view_note/{id}", web::get().to(view_note))
        .route("/edit_note/{id}", web::get().to(edit_note_page))
        .route("/edit_note/{id}", web::post().to(edit_note_submit))
        .route("/delete_note/{id}", web::get().to(delete_note))
        .route("/toggle_favorite/{id}", web::get().to(toggle_favorite))
        .route("/note_history/{id}", web::get().to(note_history))
        .route("/reorder_notes", web::post().to(reorder_notes));
}
