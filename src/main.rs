use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;

mod auth;
mod config;
mod controllers;
mod db;
mod markdown;
mod models;
mod pdf;
mod templates;
mod uploads;

use config::Config;
use db::Database;

pub struct AppState {
    pub db: Arc<Database>,
    pub config: Config,
}

/// Promote the configured account to admin. Registration only ever creates
/// `user` accounts, so this is the one path to the admin role.
fn promote_admin(db: &Database, email: &str) {
    match db.get_user_by_email(email) {
        Ok(Some(user)) => {
            if user.role.is_admin() {
                return;
            }
            match db.set_user_role(user.id, models::Role::Admin) {
                Ok(_) => log::info!("Promoted {} to admin", email),
                Err(e) => log::error!("Failed to promote {} to admin: {}", email, e),
            }
        }
        Ok(None) => log::warn!(
            "ADMIN_EMAIL {} has no account yet - register it, then restart",
            email
        ),
        Err(e) => log::error!("Failed to look up admin account {}: {}", email, e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    log::info!("Notebank v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let port = config.port;

    if let Err(e) = config::initialize_workspace() {
        log::error!("Failed to initialize workspace: {}", e);
    }

    log::info!("Initializing database at {}", config.database_url);
    let db = Database::new(&config.database_url).expect("Failed to initialize database");
    let db = Arc::new(db);

    if let Some(email) = &config.admin_email {
        promote_admin(&db, email);
    }

    log::info!("Starting HTTP server on port {}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(AppState {
                db: Arc::clone(&db),
                config: config.clone(),
            }))
            .wrap(Logger::default())
            .configure(controllers::auth::config)
            .configure(controllers::dashboard::config)
            .configure(controllers::notes::config)
            .configure(controllers::export::config)
            .configure(controllers::admin::config)
            .configure(controllers::images::config)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
