//! Student record schema and field-level validation.
//!
//! Defines the persisted document shape, the partial input payload shared by
//! create and update, and the constraint checks enforced on every write.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// Inclusive bounds for the `semester` field.
pub const SEMESTER_MIN: i64 = 1;
pub const SEMESTER_MAX: i64 = 12;

/// Stable store-assigned identifier, distinct from the business key `rollNo`.
pub type StudentId = Uuid;

/// A student's academic record, the sole persisted entity.
///
/// Serialized camelCase to match the wire contract (`rollNo`, `fullName`,
/// `createdAt`, `updatedAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    pub roll_no: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and partial update.
///
/// Every field is optional so one payload type serves both operations;
/// unknown JSON fields are ignored and `null` is equivalent to absent.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInput {
    pub roll_no: Option<String>,
    pub full_name: Option<String>,
    pub department: Option<String>,
    pub semester: Option<i64>,
}

/// Field-level constraint violation, surfaced to clients as the 400 message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or blank after trimming.
    Required(&'static str),
    /// `semester` outside the inclusive [1, 12] range.
    SemesterOutOfRange(i64),
    /// Another record already holds this `rollNo`.
    DuplicateRollNo(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required(field) => write!(f, "{field} is required"),
            Self::SemesterOutOfRange(value) => write!(
                f,
                "semester must be between {SEMESTER_MIN} and {SEMESTER_MAX} (got {value})"
            ),
            Self::DuplicateRollNo(roll_no) => {
                write!(f, "a student with rollNo '{roll_no}' already exists")
            }
        }
    }
}

impl Error for ValidationError {}

impl StudentRecord {
    /// Builds a new record from caller-supplied fields.
    ///
    /// Assigns identity and both timestamps. `rollNo` uniqueness is the
    /// store's responsibility.
    pub fn create(input: StudentInput) -> Result<Self, ValidationError> {
        check_semester(input.semester)?;
        let roll_no = required("rollNo", input.roll_no)?;
        let full_name = required("fullName", input.full_name)?;
        let department = input.department.and_then(normalize);

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            roll_no,
            full_name,
            department,
            semester: input.semester,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies a partial update: present fields replace, absent fields stay.
    ///
    /// A present-but-blank required field is rejected, so an update can never
    /// null out `rollNo` or `fullName`. A `department` value that trims to
    /// empty clears the field. Refreshes `updatedAt` on success.
    pub fn apply(&mut self, input: StudentInput) -> Result<(), ValidationError> {
        check_semester(input.semester)?;
        if let Some(value) = input.roll_no {
            self.roll_no = required("rollNo", Some(value))?;
        }
        if let Some(value) = input.full_name {
            self.full_name = required("fullName", Some(value))?;
        }
        if let Some(value) = input.department {
            self.department = normalize(value);
        }
        if let Some(value) = input.semester {
            self.semester = Some(value);
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Trims a value, dropping it entirely when blank.
fn normalize(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn required(field: &'static str, value: Option<String>) -> Result<String, ValidationError> {
    value
        .and_then(normalize)
        .ok_or(ValidationError::Required(field))
}

fn check_semester(semester: Option<i64>) -> Result<(), ValidationError> {
    match semester {
        Some(value) if !(SEMESTER_MIN..=SEMESTER_MAX).contains(&value) => {
            Err(ValidationError::SemesterOutOfRange(value))
        }
        _ => Ok(()),
    }
}
