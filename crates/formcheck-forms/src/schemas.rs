//! Schemas for the account and product screens.
//!
//! Every field is a pipe that starts with a type schema, so a field that
//! fails its type check reports nothing else.

use formcheck_core::schema::{
    email, forward, integer, max_length, min_length, min_value, non_empty, number, object,
    partial_check, pipe, string, try_regex,
};
use formcheck_core::{Node, SchemaError};
use serde_json::Value;

/// Message shown on the confirmation field when the passwords differ.
pub const PASSWORD_MISMATCH: &str = "Passwords do not match.";

/// Pattern for usernames: ASCII letters and digits only.
pub const USERNAME_PATTERN: &str = "^[a-zA-Z0-9]+$";

fn same_value(a: &'static str, b: &'static str) -> impl Fn(&Value) -> bool + Send + Sync {
    move |value: &Value| value.get(a) == value.get(b)
}

/// Checks that `confirm` repeats `password` and reports the mismatch on
/// `confirm`.
fn confirmation(password: &'static str, confirm: &'static str) -> Node {
    forward(
        partial_check([[password], [confirm]], same_value(password, confirm))
            .with_message(PASSWORD_MISMATCH),
        [confirm],
    )
}

fn required_string(message: &str) -> Node {
    pipe([string(), non_empty().with_message(message)])
}

fn email_field(required: &str) -> Node {
    pipe([
        string(),
        non_empty().with_message(required),
        email().with_message("Please enter a valid email address"),
    ])
}

fn password_field(min: usize) -> Node {
    pipe([
        string(),
        non_empty().with_message("Password is required"),
        min_length(min).with_message(format!("Password must be at least {} characters", min)),
    ])
}

pub fn register() -> Result<Node, SchemaError> {
    let username = pipe([
        string(),
        non_empty().with_message("Username is required"),
        min_length(3).with_message("Username must be at least 3 characters"),
        max_length(20).with_message("Username cannot exceed 20 characters"),
        try_regex(USERNAME_PATTERN)?
            .with_message("Username can only contain letters and numbers"),
    ]);

    Ok(pipe([
        object([
            ("email", email_field("Email is required")),
            ("username", username),
            ("password", password_field(8)),
            ("confirmPassword", required_string("Please confirm your password")),
        ]),
        confirmation("password", "confirmPassword"),
    ]))
}

pub fn login() -> Node {
    object([
        (
            "userormail",
            pipe([
                string(),
                non_empty().with_message("Username or email is required"),
                min_length(1).with_message("Please enter your username or email"),
            ]),
        ),
        ("password", password_field(4)),
    ])
}

pub fn forgot_password() -> Node {
    object([("email", email_field("Email is required"))])
}

pub fn reset_password() -> Node {
    pipe([
        object([
            ("password", password_field(8)),
            ("confirmPassword", required_string("Please confirm your password")),
        ]),
        confirmation("password", "confirmPassword"),
    ])
}

pub fn change_password() -> Node {
    pipe([
        object([
            (
                "currentPassword",
                required_string("Current password is required"),
            ),
            ("newPassword", password_field(8)),
            ("confirmPassword", required_string("Please confirm your new password")),
        ]),
        confirmation("newPassword", "confirmPassword"),
    ])
}

pub fn product() -> Node {
    object([
        ("name", required_string("Product name is required")),
        (
            "price",
            pipe([
                number().with_message("Price must be a number"),
                min_value(0.0).with_message("Price cannot be negative"),
            ]),
        ),
        (
            "stock",
            pipe([
                number().with_message("Stock must be a number"),
                integer().with_message("Stock must be a whole number"),
                min_value(0.0).with_message("Stock cannot be negative"),
            ]),
        ),
        ("image", required_string("Product image is required")),
    ])
}
