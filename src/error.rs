use thiserror::Error;

/// The one message shown to the user for any rejected form.
pub const USER_ERROR_MESSAGE: &str = "Invalid input. Please enter all numerical values correctly.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("required field '{0}' is empty")]
    Missing(&'static str),

    #[error("field '{field}' is not a number: {value:?}")]
    NotANumber { field: &'static str, value: String },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing(field) => field,
            Self::NotANumber { field, .. } => field,
        }
    }

    pub fn user_message(&self) -> &'static str {
        USER_ERROR_MESSAGE
    }
}
