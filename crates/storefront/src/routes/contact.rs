//! Contact form route handler.
//!
//! Submissions are validated for presence and logged. Nothing is stored
//! and no email is sent. A body that is missing or not JSON counts as a
//! submission with every field missing.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};

/// Message returned for any missing field.
pub const MISSING_FIELDS_MESSAGE: &str = "All fields are required";

/// Contact form data. Missing fields deserialize as `None`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Response for a successful submission.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub success: bool,
}

/// Trimmed, non-empty value of a field.
fn present(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|value| !value.is_empty())
}

/// Submit the contact form.
///
/// POST /api/contact
///
/// # Errors
///
/// Returns 400 with a generic message if any field is missing or blank.
#[instrument(skip(payload))]
pub async fn submit(
    payload: std::result::Result<Json<ContactSubmission>, JsonRejection>,
) -> Result<Json<ContactResponse>> {
    let form = match payload {
        Ok(Json(form)) => form,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "Unreadable contact submission");
            ContactSubmission::default()
        }
    };

    let (Some(name), Some(email), Some(message)) = (
        present(form.name.as_deref()),
        present(form.email.as_deref()),
        present(form.message.as_deref()),
    ) else {
        return Err(AppError::BadRequest(MISSING_FIELDS_MESSAGE.to_string()));
    };

    tracing::info!(name, email, message, "Contact form submission received");

    Ok(Json(ContactResponse { success: true }))
}
