// CRUD handlers for the student collection

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use std::convert::Infallible;
use std::sync::Arc;
use uuid::Uuid;

use super::response::{bad_request, json_response, message_response, not_found, server_error};
use super::types::{ListResponse, RecordResponse};
use crate::config::AppState;
use crate::logger;
use crate::model::{StudentId, StudentInput};
use crate::store::StoreError;

const COLLECTION_PATH: &str = "/api/students";

/// List every student record
pub async fn handle_list(state: &Arc<AppState>) -> Result<Response<Full<Bytes>>, Infallible> {
    let data = state.store.list_all().await;
    logger::log_api_request("GET", COLLECTION_PATH, 200);
    json_response(StatusCode::OK, &ListResponse { data })
}

/// Create a student record from the request body
pub async fn handle_create(
    state: &Arc<AppState>,
    body: &Bytes,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let input: StudentInput = match serde_json::from_slice(body) {
        Ok(input) => input,
        Err(e) => {
            logger::log_api_request("POST", COLLECTION_PATH, 400);
            return Ok(bad_request(&format!("Invalid JSON: {e}")));
        }
    };

    match state.store.create(input).await {
        Ok(student) => {
            logger::log_api_request("POST", COLLECTION_PATH, 201);
            json_response(
                StatusCode::CREATED,
                &RecordResponse {
                    message: "Student added",
                    data: student,
                },
            )
        }
        Err(StoreError::Validation(e)) => {
            logger::log_api_request("POST", COLLECTION_PATH, 400);
            Ok(bad_request(&e.to_string()))
        }
        Err(e) => {
            logger::log_api_request("POST", COLLECTION_PATH, 500);
            Ok(server_error(&e.to_string()))
        }
    }
}

/// Partially update the addressed student record
pub async fn handle_update(
    state: &Arc<AppState>,
    raw_id: &str,
    body: &Bytes,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = format!("{COLLECTION_PATH}/{raw_id}");

    let Some(id) = parse_id(raw_id) else {
        logger::log_api_request("PATCH", &path, 400);
        return Ok(bad_request(&format!("Invalid student id: {raw_id}")));
    };
    let input: StudentInput = match serde_json::from_slice(body) {
        Ok(input) => input,
        Err(e) => {
            logger::log_api_request("PATCH", &path, 400);
            return Ok(bad_request(&format!("Invalid JSON: {e}")));
        }
    };

    match state.store.update_by_id(id, input).await {
        Ok(student) => {
            logger::log_api_request("PATCH", &path, 200);
            json_response(
                StatusCode::OK,
                &RecordResponse {
                    message: "Student updated",
                    data: student,
                },
            )
        }
        Err(StoreError::NotFound(_)) => {
            logger::log_api_request("PATCH", &path, 404);
            Ok(not_found("Student not found"))
        }
        Err(StoreError::Validation(e)) => {
            logger::log_api_request("PATCH", &path, 400);
            Ok(bad_request(&e.to_string()))
        }
        Err(e) => {
            logger::log_api_request("PATCH", &path, 500);
            Ok(server_error(&e.to_string()))
        }
    }
}

/// Delete the addressed student record
pub async fn handle_delete(
    state: &Arc<AppState>,
    raw_id: &str,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let path = format!("{COLLECTION_PATH}/{raw_id}");

    // An unparseable id on the delete path falls through to the generic
    // failure status rather than the validation one
    let Some(id) = parse_id(raw_id) else {
        logger::log_api_request("DELETE", &path, 500);
        return Ok(server_error(&format!("Invalid student id: {raw_id}")));
    };

    match state.store.delete_by_id(id).await {
        Ok(()) => {
            logger::log_api_request("DELETE", &path, 200);
            Ok(message_response(StatusCode::OK, "Student deleted"))
        }
        Err(StoreError::NotFound(_)) => {
            logger::log_api_request("DELETE", &path, 404);
            Ok(not_found("Student not found"))
        }
        Err(e) => {
            logger::log_api_request("DELETE", &path, 500);
            Ok(server_error(&e.to_string()))
        }
    }
}

fn parse_id(raw: &str) -> Option<StudentId> {
    Uuid::parse_str(raw).ok()
}
