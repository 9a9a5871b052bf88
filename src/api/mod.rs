// API module entry
// REST routes for the student collection

mod handlers;
mod response;
mod types;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;
use response::{bad_request, not_found};

/// Addressable targets under the `/api` prefix
#[derive(Debug, PartialEq, Eq)]
enum ApiRoute<'a> {
    /// `/api/students`
    Collection,
    /// `/api/students/:id`
    Record(&'a str),
}

/// Parse an `/api/...` path into a known route
fn match_api_path(path: &str) -> Option<ApiRoute<'_>> {
    let rest = path.strip_prefix("/api/students")?;
    if rest.is_empty() || rest == "/" {
        return Some(ApiRoute::Collection);
    }
    let id = rest.strip_prefix('/')?;
    if id.is_empty() || id.contains('/') {
        return None;
    }
    Some(ApiRoute::Record(id))
}

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let Some(route) = match_api_path(&path) else {
        logger::log_api_request(method.as_str(), &path, 404);
        return Ok(not_found("Not found"));
    };

    match (method, route) {
        (Method::GET, ApiRoute::Collection) => handlers::handle_list(&state).await,
        (Method::POST, ApiRoute::Collection) => {
            let Some(body) = read_body(req).await else {
                logger::log_api_request("POST", &path, 400);
                return Ok(bad_request("Failed to read request body"));
            };
            handlers::handle_create(&state, &body).await
        }
        (Method::PATCH, ApiRoute::Record(id)) => {
            let Some(body) = read_body(req).await else {
                logger::log_api_request("PATCH", &path, 400);
                return Ok(bad_request("Failed to read request body"));
            };
            handlers::handle_update(&state, id, &body).await
        }
        (Method::DELETE, ApiRoute::Record(id)) => handlers::handle_delete(&state, id).await,
        // Unknown method/route combination
        (method, _) => {
            logger::log_api_request(method.as_str(), &path, 404);
            Ok(not_found("Not found"))
        }
    }
}

/// Collect the request body; `None` when the transport fails mid-read
async fn read_body(req: Request<hyper::body::Incoming>) -> Option<Bytes> {
    req.collect().await.ok().map(http_body_util::Collected::to_bytes)
}
