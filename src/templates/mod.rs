//! Server-rendered HTML pages.
//!
//! maud templates escape all dynamic content; the only `PreEscaped` values
//! are HTML fragments produced by our own markdown renderer.

pub mod admin;
pub mod auth;
pub mod notes;

use maud::{html, Markup, DOCTYPE};

use crate::controllers::Flash;
use crate::models::User;

/// Shared page shell: navbar, flash alert, content block
pub fn layout(title: &str, user: Option<&User>, flash: Option<&Flash>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) " - Notebank" }
                link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.2/dist/css/bootstrap.min.css" rel="stylesheet";
            }
            body {
                nav class="navbar navbar-expand-lg navbar-light bg-light" {
                    div class="container-fluid" {
                        a class="navbar-brand" href="/dashboard" { "Notebank" }
                        ul class="navbar-nav me-auto" {
                            @if let Some(user) = user {
                                li class="nav-item" { a class="nav-link" href="/dashboard" { "Dashboard" } }
                                li class="nav-item" { a class="nav-link" href="/create_note" { "Create Note" } }
                                @if user.role.is_admin() {
                                    li class="nav-item" { a class="nav-link" href="/admin" { "Admin" } }
                                }
                                li class="nav-item" { a class="nav-link" href="/logout" { "Logout" } }
                            } @else {
                                li class="nav-item" { a class="nav-link" href="/login" { "Login" } }
                                li class="nav-item" { a class="nav-link" href="/register" { "Register" } }
                            }
                        }
                    }
                }
                div class="container mt-4" {
                    @if let Some(flash) = flash {
                        div class=(format!("alert alert-{}", flash.category)) { (flash.message) }
                    }
                    (content)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_escapes_flash_content() {
        let flash = Flash {
            category: "danger".to_string(),
            message: "<script>alert(1)</script>".to_string(),
        };
        let page = layout("Test", None, Some(&flash), html! { p { "body" } }).into_string();
        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_layout_shows_auth_links_when_logged_out() {
        let page = layout("Test", None, None, html! {}).into_string();
        assert!(page.contains("/login"));
        assert!(page.contains("/register"));
        assert!(!page.contains("/logout"));
    }
}
