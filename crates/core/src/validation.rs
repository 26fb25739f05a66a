//! Struct-level request validation.
//!
//! Requests declare their constraints with `#[derive(validator::Validate)]`;
//! [`validate`] runs them and folds every violation into one
//! [`CoreError::Validation`] message so the client sees all failing fields at once.

use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::error::CoreError;

/// Capability interface for request validation.
///
/// Services receive a validator instead of calling [`validate`] directly so
/// tests can substitute a stricter or failing implementation.
pub trait RequestValidator: Send + Sync {
    fn validate<T: Validate>(&self, request: &T) -> Result<(), CoreError>;
}

/// Validator backed by the `validator` crate's derived constraints.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclarativeValidator;

impl RequestValidator for DeclarativeValidator {
    fn validate<T: Validate>(&self, request: &T) -> Result<(), CoreError> {
        validate(request)
    }
}

/// Run the declared constraints on `request`.
pub fn validate<T: Validate>(request: &T) -> Result<(), CoreError> {
    request
        .validate()
        .map_err(|errors| CoreError::Validation(describe(&errors)))
}

/// Render every violation as one line of text, ordered by field path.
///
/// Each entry reads `Field validation for '<path>' failed on the '<code>' tag`.
/// Paths use the client's camelCase names and descend into nested structs and
/// list elements, e.g. `items[1].roleId`.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut lines = Vec::new();
    collect(errors, "", &mut lines);
    lines.sort();
    lines.join("; ")
}

fn collect(errors: &ValidationErrors, prefix: &str, lines: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            wire_name(field)
        } else {
            format!("{prefix}.{}", wire_name(field))
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                lines.extend(errs.iter().map(|err| {
                    format!(
                        "Field validation for '{path}' failed on the '{}' tag",
                        err.code
                    )
                }));
            }
            ValidationErrorsKind::Struct(inner) => collect(inner, &path, lines),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect(inner, &format!("{path}[{index}]"), lines);
                }
            }
        }
    }
}

/// `page_size` becomes `pageSize`, matching the JSON and query names.
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = !name.is_empty();
        } else if upper {
            name.extend(ch.to_uppercase());
            upper = false;
        } else {
            name.push(ch);
        }
    }
    name
}
