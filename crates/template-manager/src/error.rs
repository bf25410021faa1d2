//! Error types for template discovery, compilation and rendering.
//!
//! [`TemplateError`] is the single error type returned by every public
//! operation. Engine and glob errors are flattened into messages so the public
//! API does not leak the underlying crates' error types.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Error type for template manager operations.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// A glob pattern could not be parsed.
    #[error("invalid glob pattern `{pattern}`: {message}")]
    Discovery {
        /// The offending pattern
        pattern: String,
        /// Parser message
        message: String,
    },

    /// A template file could not be read or contains invalid syntax.
    #[error("failed to compile template `{path}`: {message}")]
    Compile {
        /// Path of the file that failed
        path: String,
        /// Read or syntax error message
        message: String,
    },

    /// The layout pattern did not match any file.
    #[error("layout pattern `{pattern}` matched no files")]
    LayoutNotFound {
        /// The layout pattern that was resolved
        pattern: String,
    },

    /// No template set exists for the requested page.
    #[error("template does not exist: {name}")]
    NotFound {
        /// The page name that was requested
        name: String,
    },

    /// Template execution failed (undefined value, helper error, ...).
    #[error("failed to execute template `{name}`: {message}")]
    Execution {
        /// The page whose set was executing
        name: String,
        /// Engine error message
        message: String,
    },

    /// The path configuration could not be loaded.
    #[error("invalid template configuration: {0}")]
    Config(String),

    /// Writing the rendered output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TemplateError {
    pub(crate) fn discovery(pattern: &str, err: impl std::fmt::Display) -> Self {
        TemplateError::Discovery {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn compile(path: &str, err: impl std::fmt::Display) -> Self {
        TemplateError::Compile {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    /// Returns true for failures raised while building template sets:
    /// unreadable files, syntax errors and a missing layout.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            TemplateError::Compile { .. } | TemplateError::LayoutNotFound { .. }
        )
    }

    /// Returns true if the requested page has no template set.
    pub fn is_not_found(&self) -> bool {
        matches!(self, TemplateError::NotFound { .. })
    }
}
