use formcheck_core::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormError {
    #[error("Unknown form '{0}'. Run `formcheck forms` to list available forms")]
    UnknownForm(String),

    #[error("Failed to build form schema: {0}")]
    Schema(#[from] SchemaError),
}
