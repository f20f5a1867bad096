//! Library interface for formcheck CLI components

pub mod check;

pub use check::{read_payload, render_forms, render_text, run_check, CheckOptions, CheckReport};
