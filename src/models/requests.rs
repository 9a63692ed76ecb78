//! Request DTOs for the HTTP API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

const MAX_NAME_LENGTH: usize = 128;

fn validate_name(name: &str) -> Option<String> {
    if name.trim().is_empty() {
        return Some("Name cannot be empty".to_string());
    }
    if name.len() > MAX_NAME_LENGTH {
        return Some(format!(
            "Name exceeds maximum length of {} characters",
            MAX_NAME_LENGTH
        ));
    }
    None
}

fn validate_email(email: &str) -> Option<String> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => None,
        _ => Some(format!("'{}' is not a valid email address", email)),
    }
}

/// Request body for POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
}

impl CreateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_name(&self.name).or_else(|| validate_email(&self.email))
    }
}

/// Request body for PUT /users/:id
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UpdateUserRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.is_none() && self.email.is_none() {
            return Some("Nothing to update".to_string());
        }
        self.name
            .as_deref()
            .and_then(validate_name)
            .or_else(|| self.email.as_deref().and_then(validate_email))
    }
}
