//! Business rules for users, topics and words.
//!
//! Services validate input, orchestrate repositories and translate stored
//! documents into response bodies. They know nothing about HTTP.

mod topics;
mod users;
mod words;

pub use topics::*;
pub use users::*;
pub use words::*;

use bson::oid::ObjectId;

use crate::errors::AppError;

/// Parse a hex identifier supplied by a client.
pub fn parse_id(raw: &str, field: &str) -> Result<ObjectId, AppError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    ObjectId::parse_str(raw)
        .map_err(|_| AppError::Validation(format!("{} is not a valid id", field)))
}

/// Reject blank values for a required string field.
fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
