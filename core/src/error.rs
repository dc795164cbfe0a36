//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Almost every problem found while resolving a contract is recovered locally
//! with a fallback and a logged warning. Only unreadable input and an
//! unsupported binder selection reach the caller as errors.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The contract text is not valid YAML/JSON or does not match the contract model.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// The caller selected a protocol binder this generator has no binding vocabulary for.
    #[from(ignore)]
    #[display("Unsupported binder '{_0}': expected one of kafka, rabbit, solace")]
    UnsupportedBinder(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        // Test that String defaults to General, not Parse
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_unsupported_binder_display() {
        let app_err = AppError::UnsupportedBinder("jms".into());
        assert_eq!(
            format!("{}", app_err),
            "Unsupported binder 'jms': expected one of kafka, rabbit, solace"
        );
    }
}
