//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation and the API-before-static routing priority.

use crate::api;
use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::HeaderValue;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

const API_PREFIX: &str = "/api";

/// Request context for static file serving
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub access_log: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let access_log = state.config.logging.access_log;
    if access_log {
        logger::log_request(&method, req.uri(), req.version());
    }

    let mut response = dispatch(req, &state, &method, &path, access_log).await?;

    if state.config.http.enable_cors {
        response.headers_mut().insert(
            "Access-Control-Allow-Origin",
            HeaderValue::from_static("*"),
        );
    }

    Ok(response)
}

/// Route the request by priority: preflight, API, static assets
async fn dispatch(
    req: Request<hyper::body::Incoming>,
    state: &Arc<AppState>,
    method: &Method,
    path: &str,
    access_log: bool,
) -> Result<Response<Full<Bytes>>, Infallible> {
    // Preflight requests are answered before any routing
    if *method == Method::OPTIONS {
        return Ok(http::build_options_response(state.config.http.enable_cors));
    }

    // 1. API routes take priority over static serving
    if is_api_path(path) {
        if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
            return Ok(resp);
        }
        return api::handle_api_request(req, Arc::clone(state)).await;
    }

    // 2. Static assets are read-only
    if !matches!(*method, Method::GET | Method::HEAD) {
        logger::log_warning(&format!("Method not allowed: {method}"));
        return Ok(http::build_405_response());
    }

    // 3. Static file, falling back to the front-end entry document
    let ctx = RequestContext {
        path,
        is_head: *method == Method::HEAD,
        access_log,
    };
    Ok(static_files::serve(&ctx, &state.config.assets).await)
}

/// Whether the path belongs to the API router
fn is_api_path(path: &str) -> bool {
    path == API_PREFIX
        || path
            .strip_prefix(API_PREFIX)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<hyper::body::Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
