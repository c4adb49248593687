//! Request extractors whose rejections render as [`AppError`].
//!
//! axum's own `Json`, `Form`, and `Path` reject with plain-text bodies and
//! 415/422 statuses; these wrappers turn every rejection into a 400 with the
//! usual `{"error": "..."}` body.

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::{Form, Json};

use crate::error::AppError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// URL-encoded form body.
#[derive(Debug, FromRequest)]
#[from_request(via(Form), rejection(AppError))]
pub struct ApiForm<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);
