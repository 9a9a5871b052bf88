// API response payload types

use crate::model::StudentRecord;
use serde::Serialize;

/// Collection listing: `{ "data": [...] }`
#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub data: Vec<StudentRecord>,
}

/// Mutation result carrying the affected record: `{ "message", "data" }`
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub message: &'static str,
    pub data: StudentRecord,
}
