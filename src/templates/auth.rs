//! Registration and login forms.

use maud::{html, Markup};

use super::layout;
use crate::controllers::Flash;

pub fn register(flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "Register" }
        form method="POST" action="/register" {
            div class="mb-3" {
                label class="form-label" for="name" { "Name" }
                input class="form-control" type="text" id="name" name="name" required;
            }
            div class="mb-3" {
                label class="form-label" for="email" { "Email" }
                input class="form-control" type="email" id="email" name="email" required;
            }
            div class="mb-3" {
                label class="form-label" for="password" { "Password" }
                input class="form-control" type="password" id="password" name="password" required;
            }
            button class="btn btn-primary" type="submit" { "Register" }
        }
        p class="mt-3" {
            "Already have an account? " a href="/login" { "Login" }
        }
    };

    layout("Register", None, flash.as_ref(), content)
}

pub fn login(flash: Option<Flash>) -> Markup {
    let content = html! {
        h2 { "Login" }
        form method="POST" action="/login" {
            div class="mb-3" {
                label class="form-label" for="email" { "Email" }
                input class="form-control" type="email" id="email" name="email" required;
            }
            div class="mb-3" {
                label class="form-label" for="password" { "Password" }
                input class="form-control" type="password" id="password" name="password" required;
            }
            button class="btn btn-primary" type="submit" { "Login" }
        }
        p class="mt-3" {
            "New here? " a href="/register" { "Register" }
        }
    };

    layout("Login", None, flash.as_ref(), content)
}
