//! Admin dashboard page.

use maud::{html, Markup};

use super::layout;
use crate::controllers::Flash;
use crate::models::{Note, User};

pub fn dashboard(user: &User, users: &[User], notes: &[Note], flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "Admin" }

        h4 class="mt-4" { "Users" }
        table class="table table-sm" {
            thead {
                tr { th { "Name" } th { "Email" } th { "Role" } }
            }
            tbody {
                @for u in users {
                    tr {
                        td { (u.name) }
                        td { (u.email) }
                        td { (u.role.as_str()) }
                    }
                }
            }
        }

        h4 class="mt-4" { "Notes" }
        table class="table table-sm" {
            thead {
                tr { th { "Title" } th { "Owner" } th { "Tags" } th { "Favorite" } th { "" } }
            }
            tbody {
                @for note in notes {
                    tr {
                        td { a href=(format!("/view_note/{}", note.id)) { (note.title) } }
                        td { (note.owner_name) }
                        td { (note.tags.join(", ")) }
                        td { @if note.favorite { "\u{2605}" } @else { "" } }
                        td {
                            a class="btn btn-sm btn-outline-danger"
                                href=(format!("/delete_note_admin/{}", note.id)) { "Delete" }
                        }
                    }
                }
            }
        }
    };

    layout("Admin", Some(user), flash.as_ref(), content)
}
