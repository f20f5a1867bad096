//! Form schemas for the cashier app's account and product screens.
//!
//! Each [`FormKind`] maps to one schema built from `formcheck-core`
//! primitives. [`check_form`] validates a payload the way the form
//! components do: one message per field, stopping each field at its first
//! problem.

mod error;
pub mod schemas;

use formcheck_core::{to_field_errors, ConfigOverrides, FieldErrors, Node};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub use error::FormError;

/// The forms this crate knows how to validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Register,
    Login,
    ForgotPassword,
    ResetPassword,
    ChangePassword,
    Product,
}

impl FormKind {
    pub const ALL: [FormKind; 6] = [
        FormKind::Register,
        FormKind::Login,
        FormKind::ForgotPassword,
        FormKind::ResetPassword,
        FormKind::ChangePassword,
        FormKind::Product,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Register => "register",
            FormKind::Login => "login",
            FormKind::ForgotPassword => "forgot_password",
            FormKind::ResetPassword => "reset_password",
            FormKind::ChangePassword => "change_password",
            FormKind::Product => "product",
        }
    }

    /// Field names in the order the form validates them.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            FormKind::Register => &["email", "username", "password", "confirmPassword"],
            FormKind::Login => &["userormail", "password"],
            FormKind::ForgotPassword => &["email"],
            FormKind::ResetPassword => &["password", "confirmPassword"],
            FormKind::ChangePassword => &["currentPassword", "newPassword", "confirmPassword"],
            FormKind::Product => &["name", "price", "stock", "image"],
        }
    }

    /// Builds the schema for this form.
    pub fn schema(&self) -> Result<Node, FormError> {
        let node = match self {
            FormKind::Register => schemas::register()?,
            FormKind::Login => schemas::login(),
            FormKind::ForgotPassword => schemas::forgot_password(),
            FormKind::ResetPassword => schemas::reset_password(),
            FormKind::ChangePassword => schemas::change_password(),
            FormKind::Product => schemas::product(),
        };
        Ok(node)
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        FormKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| FormError::UnknownForm(s.to_string()))
    }
}

/// Validates `input` against the form's schema and returns one message per
/// failing field. An empty map means the payload is valid.
pub fn check_form(
    kind: FormKind,
    input: Value,
    overrides: ConfigOverrides,
) -> Result<FieldErrors, FormError> {
    let schema = kind.schema()?;
    let errors = to_field_errors(&schema, input, overrides);
    tracing::debug!(form = %kind, failing_fields = errors.len(), "checked form");
    Ok(errors)
}
