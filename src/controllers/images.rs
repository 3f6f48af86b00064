//! Serve uploaded note images from the fixed image directory.

use actix_web::{web, HttpResponse};
use std::path::PathBuf;

use crate::config::images_dir;

/// Allowed image extensions for serving
const ALLOWED_EXTENSIONS: &[&str] = &["png", "svg", "jpg", "jpeg", "gif", "webp"];

/// Get MIME type for an image extension
fn mime_for_ext(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Check if a filename has an allowed image extension
fn is_allowed_image(filename: &str) -> bool {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

async fn serve_image(path: web::Path<String>) -> HttpResponse {
    let filename = path.into_inner();

    if !is_allowed_image(&filename) {
        return HttpResponse::Forbidden().body("Only image files are served from /static/images/");
    }

    // Reject path traversal attempts and hidden files
    if filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.starts_with('.')
    {
        return HttpResponse::BadRequest().body("Invalid filename");
    }

    let dir = PathBuf::from(images_dir());
    let file_path = dir.join(&filename);

    // Canonicalize and verify containment within the image directory
    let canonical_dir = match dir.canonicalize() {
        Ok(p) => p,
        Err(_) => return HttpResponse::NotFound().body("Image directory not found"),
    };

    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => return HttpResponse::NotFound().body("File not found"),
    };

    if !canonical_file.starts_with(&canonical_dir) {
        return HttpResponse::Forbidden().body("Access denied");
    }

    match tokio::fs::read(&canonical_file).await {
        Ok(contents) => {
            let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
            HttpResponse::Ok()
                .content_type(mime_for_ext(&ext))
                .append_header(("Cache-Control", "public, max-age=300"))
                .body(contents)
        }
        Err(_) => HttpResponse::NotFound().body("File not found"),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/static/images/{filename}", web::get().to(serve_image));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_allowed_image() {
        assert!(is_allowed_image("photo.png"));
        assert!(is_allowed_image("photo.JPG"));
        assert!(!is_allowed_image("script.sh"));
        assert!(!is_allowed_image("noextension"));
    }

    #[test]
    fn test_mime_for_ext() {
        assert_eq!(mime_for_ext("png"), "image/png");
        assert_eq!(mime_for_ext("jpeg"), "image/jpeg");
        assert_eq!(mime_for_ext("bin"), "application/octet-stream");
    }
}
