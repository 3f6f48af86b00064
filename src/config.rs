use rand::RngCore;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const SESSION_SECRET: &str = "SESSION_SECRET";
    /// Registration only ever creates `user` accounts; the account with this
    /// email is promoted to admin at startup.
    pub const ADMIN_EMAIL: &str = "ADMIN_EMAIL";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8080;
    pub const DATABASE_URL: &str = "./.db/notebank.db";
    pub const IMAGES_DIR: &str = "static/images";
}

/// Returns the absolute path to the crate directory.
/// Uses CARGO_MANIFEST_DIR at compile time, so it always resolves
/// to the same place regardless of the working directory at runtime.
pub fn backend_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

/// Get the directory uploaded note images are stored in
pub fn images_dir() -> String {
    backend_dir().join(defaults::IMAGES_DIR).to_string_lossy().to_string()
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub session_secret: Vec<u8>,
    pub admin_email: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let session_secret = match env::var(env_vars::SESSION_SECRET) {
            Ok(s) if !s.is_empty() => s.into_bytes(),
            _ => {
                // No fixed fallback secret; every boot without SESSION_SECRET
                // gets a fresh key and existing cookies stop verifying.
                let mut buf = [0u8; 32];
                rand::thread_rng().fill_bytes(&mut buf);
                log::warn!(
                    "{} not set - generated a random secret, sessions will not survive a restart",
                    env_vars::SESSION_SECRET
                );
                hex::encode(buf).into_bytes()
            }
        };

        Self {
            port: env::var(env_vars::PORT)
                .unwrap_or_else(|_| defaults::PORT.to_string())
                .parse()
                .expect("PORT must be a valid number"),
            database_url: env::var(env_vars::DATABASE_URL)
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_string()),
            session_secret,
            admin_email: env::var(env_vars::ADMIN_EMAIL).ok().filter(|s| !s.is_empty()),
        }
    }
}

/// Create the image upload directory.
/// Called once at startup before the server accepts requests.
pub fn initialize_workspace() -> std::io::Result<()> {
    let images = images_dir();
    let images_path = Path::new(&images);
    std::fs::create_dir_all(images_path)?;
    log::info!("Image upload directory: {:?}", images_path);
    Ok(())
}
