use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

use crate::error::AppError;

/// Static files from the prebuilt bundle; any path without a matching file
/// gets `index.html` so client-side routes load.
pub fn spa_service(static_dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")))
}

/// Unknown `/api/*` paths stay JSON 404s instead of falling through to the bundle.
pub async fn api_not_found() -> AppError {
    AppError::NotFound("No such API route".into())
}
