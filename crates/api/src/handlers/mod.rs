//! Request handlers.
//!
//! Each submodule maps one resource's endpoints onto its service. Handlers
//! check the caller's roles through the RBAC extractors, turn extractor
//! rejections into 400 responses, and wrap every result in the
//! [`Envelope`](crate::response::Envelope).

pub mod employee;
pub mod internal;
pub mod role;

use std::fmt::Display;

use idm_core::error::CoreError;

use crate::error::AppError;

/// Turn a path, query or body rejection into a 400.
fn bad_request(rejection: impl Display) -> AppError {
    AppError::BadRequest(rejection.to_string())
}

/// Log a failed service call under `operation` and convert it for the response.
fn failed(operation: &'static str) -> impl FnOnce(CoreError) -> AppError {
    move |err| {
        tracing::error!(operation, error = %err, "Request failed");
        AppError::Core(err)
    }
}
