//! Static file serving module
//!
//! Serves the front-end bundle and falls back to its entry document for
//! unmatched paths (single-page-application routing).

use crate::config::AssetsConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve the request path from the assets directory
pub async fn serve(ctx: &RequestContext<'_>, assets: &AssetsConfig) -> Response<Full<Bytes>> {
    match load_asset(&assets.dir, ctx.path, &assets.index_file).await {
        Some((content, content_type)) => {
            if ctx.access_log {
                logger::log_response(content.len());
            }
            http::build_file_response(&content, content_type, ctx.is_head)
        }
        None => http::build_404_response(),
    }
}

/// Resolve a request path inside the assets directory
///
/// Unmatched paths resolve to the entry document so front-end routes can
/// deep-link; `None` only when the entry document itself is missing.
pub async fn load_asset(dir: &str, path: &str, index_file: &str) -> Option<(Vec<u8>, &'static str)> {
    // Remove leading slash and prevent directory traversal
    let clean_path = path.trim_start_matches('/').replace("..", "");

    let dir_canonical = match Path::new(dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Assets directory not found or inaccessible '{dir}': {e}"
            ));
            return None;
        }
    };

    let mut file_path = Path::new(dir).join(&clean_path);
    if clean_path.is_empty() || file_path.is_dir() {
        file_path = file_path.join(index_file);
    }

    match read_verified(&dir_canonical, &file_path).await {
        Some(found) => Some(found),
        // Catch-all: unmatched paths get the front-end entry document
        None => read_verified(&dir_canonical, &Path::new(dir).join(index_file)).await,
    }
}

/// Read a file after verifying it stays inside the assets directory
async fn read_verified(dir_canonical: &Path, file_path: &Path) -> Option<(Vec<u8>, &'static str)> {
    let file_path_canonical = file_path.canonicalize().ok()?;
    if !file_path_canonical.starts_with(dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {}",
            file_path_canonical.display()
        ));
        return None;
    }
    if !file_path_canonical.is_file() {
        return None;
    }

    let content = fs::read(&file_path_canonical).await.ok()?;
    let content_type =
        mime::get_content_type(file_path_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn assets_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std_fs::write(dir.path().join("index.html"), "<html>entry</html>").unwrap();
        std_fs::write(dir.path().join("app.js"), "console.log('app')").unwrap();
        std_fs::create_dir(dir.path().join("css")).unwrap();
        std_fs::write(dir.path().join("css").join("site.css"), "body {}").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_serves_existing_file() {
        let dir = assets_dir();
        let (content, content_type) = load_asset(dir.path().to_str().unwrap(), "/app.js", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"console.log('app')");
        assert_eq!(content_type, "application/javascript");
    }

    #[tokio::test]
    async fn test_nested_file_resolves() {
        let dir = assets_dir();
        let (_, content_type) =
            load_asset(dir.path().to_str().unwrap(), "/css/site.css", "index.html")
                .await
                .unwrap();
        assert_eq!(content_type, "text/css");
    }

    #[tokio::test]
    async fn test_root_resolves_entry_document() {
        let dir = assets_dir();
        let (content, content_type) = load_asset(dir.path().to_str().unwrap(), "/", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"<html>entry</html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn test_unknown_path_falls_back_to_entry_document() {
        let dir = assets_dir();
        let (content, _) = load_asset(dir.path().to_str().unwrap(), "/students/42", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"<html>entry</html>");
    }

    #[tokio::test]
    async fn test_traversal_never_escapes_assets_dir() {
        let parent = tempfile::tempdir().unwrap();
        let assets = parent.path().join("public");
        std_fs::create_dir(&assets).unwrap();
        std_fs::write(assets.join("index.html"), "<html>entry</html>").unwrap();
        std_fs::write(parent.path().join("secret.txt"), "secret").unwrap();

        let (content, _) = load_asset(assets.to_str().unwrap(), "/../secret.txt", "index.html")
            .await
            .unwrap();
        assert_eq!(content, b"<html>entry</html>");
    }

    #[tokio::test]
    async fn test_missing_entry_document_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(
            load_asset(dir.path().to_str().unwrap(), "/anything", "index.html")
                .await
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_missing_assets_dir_is_none() {
        assert!(load_asset("no-such-dir", "/", "index.html").await.is_none());
    }
}
