//! Dashboard listing with text/tag/favorite filters.

use actix_web::{web, HttpRequest, Responder};
use serde::Deserialize;

use super::{current_user, html_page, redirect, take_flash};
use crate::templates::notes::NoteCard;
use crate::{markdown, AppState};

#[derive(Deserialize)]
struct DashboardQuery {
    q: Option<String>,
    tag: Option<String>,
    favorite: Option<String>,
}

async fn home() -> impl Responder {
    redirect("/dashboard")
}

async fn dashboard(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<DashboardQuery>,
) -> impl Responder {
    let user = match current_user(&state, &req) {
        Ok(user) => user,
        Err(resp) => return resp,
    };

    // Admins see everything; everyone else only their own notes
    let owner = if user.role.is_admin() { None } else { Some(user.id) };
    let q = query.q.as_deref().filter(|s| !s.is_empty());
    let tag = query.tag.as_deref().filter(|s| !s.is_empty());
    let favorites_only = query.favorite.as_deref() == Some("1");

    let notes = match state.db.filter_notes(owner, q, tag, favorites_only) {
        Ok(notes) => notes,
        Err(e) => {
            log::error!("Failed to list notes for user {}: {}", user.id, e);
            Vec::new()
        }
    };

    // Deduplicated tag set of the result, for the filter dropdown
    let mut tags: Vec<String> = Vec::new();
    for note in &notes {
        for t in &note.tags {
            if !tags.contains(t) {
                tags.push(t.clone());
            }
        }
    }
    tags.sort();

    let cards: Vec<NoteCard> = notes
        .into_iter()
        .map(|note| {
            let content_html = markdown::render(&note.content);
            NoteCard { note, content_html }
        })
        .collect();

    html_page(crate::templates::notes::dashboard(
        &user,
        &cards,
        &tags,
        q.unwrap_or(""),
        tag.unwrap_or(""),
        favorites_only,
        take_flash(&req),
    ))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(home))
        .route("/dashboard", web::get().to(dashboard));
}
