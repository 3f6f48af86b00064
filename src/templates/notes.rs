//! Note pages: dashboard, create/edit forms, single-note view, history.

use maud::{html, Markup, PreEscaped};

use super::layout;
use crate::controllers::Flash;
use crate::models::{Note, User};

/// A note paired with its markdown pre-rendered to HTML
pub struct NoteCard {
    pub note: Note,
    pub content_html: String,
}

pub fn dashboard(
    user: &User,
    cards: &[NoteCard],
    tags: &[String],
    q: &str,
    tag: &str,
    favorites_only: bool,
    flash: Option<Flash>,
) -> Markup {
    let content = html! {
        h2 { "Dashboard" }

        form class="row g-2 mb-4" method="GET" action="/dashboard" {
            div class="col-auto" {
                input class="form-control" type="text" name="q" placeholder="Search title" value=(q);
            }
            div class="col-auto" {
                select class="form-select" name="tag" {
                    option value="" { "All tags" }
                    @for t in tags {
                        option value=(t) selected[t == tag] { (t) }
                    }
                }
            }
            div class="col-auto form-check align-self-center" {
                input class="form-check-input" type="checkbox" name="favorite" value="1" id="favorite" checked[favorites_only];
                label class="form-check-label" for="favorite" { "Favorites only" }
            }
            div class="col-auto" {
                button class="btn btn-outline-primary" type="submit" { "Filter" }
            }
        }

        @if cards.is_empty() {
            p class="text-muted" { "No notes yet." }
        }

        @for card in cards {
            div class="card mb-3 note-row" {
                div class="card-body" {
                    h5 class="card-title" {
                        a href=(format!("/view_note/{}", card.note.id)) { (card.note.title) }
                        " "
                        a href=(format!("/toggle_favorite/{}", card.note.id)) title="Toggle favorite" {
                            @if card.note.favorite { "\u{2605}" } @else { "\u{2606}" }
                        }
                    }
                    h6 class="card-subtitle mb-2 text-muted" {
                        (card.note.owner_name) " \u{b7} " (card.note.created_at)
                    }
                    @for t in &card.note.tags {
                        span class="badge bg-secondary me-1" { (t) }
                    }
                    div class="card-text mt-2" { (PreEscaped(card.content_html.as_str())) }
                    @if let Some(image) = &card.note.image {
                        img class="img-fluid mb-2" src=(format!("/static/images/{}", image)) alt=(card.note.title);
                    }
                    div {
                        a class="btn btn-sm btn-outline-secondary me-1" href=(format!("/edit_note/{}", card.note.id)) { "Edit" }
                        a class="btn btn-sm btn-outline-secondary me-1" href=(format!("/note_history/{}", card.note.id)) { "History" }
                        a class="btn btn-sm btn-outline-secondary me-1" href=(format!("/export_pdf/{}", card.note.id)) { "PDF" }
                        a class="btn btn-sm btn-outline-danger" href=(format!("/delete_note/{}", card.note.id)) { "Delete" }
                    }
                }
            }
        }
    };

    layout("Dashboard", Some(user), flash.as_ref(), content)
}

fn note_form_fields(note: Option<&Note>) -> Markup {
    html! {
        div class="mb-3" {
            label class="form-label" for="title" { "Title" }
            input class="form-control" type="text" id="title" name="title"
                value=(note.map(|n| n.title.as_str()).unwrap_or("")) required;
        }
        div class="mb-3" {
            label class="form-label" for="content" { "Content (markdown)" }
            textarea class="form-control" id="content" name="content" rows="10" {
                (note.map(|n| n.content.as_str()).unwrap_or(""))
            }
        }
        div class="mb-3" {
            label class="form-label" for="tags" { "Tags (comma-separated)" }
            input class="form-control" type="text" id="tags" name="tags"
                value=(note.map(|n| n.tags.join(", ")).unwrap_or_default());
        }
        div class="mb-3" {
            label class="form-label" for="image" { "Image" }
            input class="form-control" type="file" id="image" name="image" accept="image/*";
            @if let Some(image) = note.and_then(|n| n.image.as_deref()) {
                small class="text-muted" { "Current: " (image) }
            }
        }
    }
}

pub fn create(user: &User, flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "Create Note" }
        form method="POST" action="/create_note" enctype="multipart/form-data" {
            (note_form_fields(None))
            button class="btn btn-primary" type="submit" { "Create" }
        }
    };

    layout("Create Note", Some(user), flash.as_ref(), content)
}

pub fn edit(user: &User, note: &Note, flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "Edit Note" }
        form method="POST" action=(format!("/edit_note/{}", note.id)) enctype="multipart/form-data" {
            (note_form_fields(Some(note)))
            button class="btn btn-primary" type="submit" { "Save" }
        }
    };

    layout("Edit Note", Some(user), flash.as_ref(), content)
}

pub fn view(user: &User, note: &Note, content_html: &str, flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { (note.title) }
        h6 class="text-muted" { (note.owner_name) " \u{b7} " (note.created_at) }
        @for t in &note.tags {
            span class="badge bg-secondary me-1" { (t) }
        }
        @if let Some(image) = &note.image {
            div class="my-3" {
                img class="img-fluid" src=(format!("/static/images/{}", image)) alt=(note.title);
            }
        }
        div class="mt-3" { (PreEscaped(content_html)) }
        div class="mt-4" {
            a class="btn btn-sm btn-outline-secondary me-1" href=(format!("/edit_note/{}", note.id)) { "Edit" }
            a class="btn btn-sm btn-outline-secondary me-1" href=(format!("/note_history/{}", note.id)) { "History" }
            a class="btn btn-sm btn-outline-secondary" href=(format!("/export_pdf/{}", note.id)) { "PDF" }
        }
    };

    layout(&note.title, Some(user), flash.as_ref(), content)
}

pub fn history(user: &User, note: &Note, flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "History: " (note.title) }

        @if note.versions.is_empty() {
            p class="text-muted" { "No previous versions." }
        }

        @for (i, version) in note.versions.iter().enumerate() {
            div class="card mb-3" {
                div class="card-body" {
                    h5 class="card-title" { "v" (i + 1) " \u{b7} " (version.title) }
                    h6 class="card-subtitle mb-2 text-muted" { (version.updated_at) }
                    @for t in &version.tags {
                        span class="badge bg-secondary me-1" { (t) }
                    }
                    pre class="card-text mt-2" { (version.content) }
                }
            }
        }

        a class="btn btn-sm btn-outline-secondary" href=(format!("/view_note/{}", note.id)) { "Back to note" }
    };

    layout("Note History", Some(user), flash.as_ref(), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::note::now_stamp;
    use crate::models::{NoteVersion, Role};

    fn test_user() -> User {
        User {
            id: 1,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: String::new(),
            role: Role::User,
            created_at: chrono::Utc::now(),
        }
    }

    fn test_note() -> Note {
        Note {
            id: 5,
            title: "Plans <b>bold</b>".to_string(),
            content: "# heading".to_string(),
            tags: vec!["work".to_string()],
            image: None,
            favorite: false,
            owner_id: 1,
            owner_name: "Alice".to_string(),
            created_at: now_stamp(),
            versions: vec![NoteVersion {
                title: "Old".to_string(),
                content: "old body".to_string(),
                tags: vec![],
                updated_at: now_stamp(),
            }],
            order_index: None,
        }
    }

    #[test]
    fn test_view_escapes_title_but_not_rendered_markdown() {
        let user = test_user();
        let note = test_note();
        let page = view(&user, &note, "<h1>heading</h1>", None).into_string();
        assert!(page.contains("Plans &lt;b&gt;bold&lt;/b&gt;"));
        assert!(page.contains("<h1>heading</h1>"));
    }

    #[test]
    fn test_history_lists_versions() {
        let user = test_user();
        let note = test_note();
        let page = history(&user, &note, None).into_string();
        assert!(page.contains("Old"));
        assert!(page.contains("old body"));
    }

    #[test]
    fn test_dashboard_filter_state_is_preserved() {
        let user = test_user();
        let tags = vec!["work".to_string(), "home".to_string()];
        let page = dashboard(&user, &[], &tags, "meeting", "work", true, None).into_string();
        assert!(page.contains("value=\"meeting\""));
        assert!(page.contains("checked"));
        assert!(page.contains("selected"));
    }
}
