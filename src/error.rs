//! Error types for metadata queries.
//!
//! Query operations fail in three ways:
//! - `Application` - the request is valid but the document cannot answer it
//!   (e.g. no sentiment data). Callers present these as clean messages.
//! - invalid arguments - rejected when the call is made, never deferred into
//!   a lazy listing
//! - lookup/schema failures - the document references something that does
//!   not exist, or lacks a field the operation needs
//!
//! An empty listing is not an error.

/// Errors raised by the metadata index and query engine.
#[derive(Debug, thiserror::Error)]
pub enum MetareaderError {
    #[error("{0}")]
    Application(String),

    #[error("Invalid {argument} value: '{value}'")]
    InvalidArgument {
        argument: &'static str,
        value: String,
    },

    #[error("Unsupported external ontology '{0}' (currently supported external ontologies are: gkg)")]
    UnsupportedOntology(String),

    #[error("Cannot merge a {other} accumulator into a {this} accumulator")]
    AdditionMethodMismatch { this: String, other: String },

    #[error("Detection not found: {0}")]
    UnknownDetection(String),

    #[error("Detection {detection_id} is missing required field '{field}'")]
    MissingField {
        detection_id: String,
        field: &'static str,
    },
}

impl MetareaderError {
    /// Shorthand for an application-level error.
    pub fn application(message: impl Into<String>) -> Self {
        MetareaderError::Application(message.into())
    }

    /// Shorthand for an invalid argument error.
    pub fn invalid(argument: &'static str, value: impl Into<String>) -> Self {
        MetareaderError::InvalidArgument {
            argument,
            value: value.into(),
        }
    }

    /// Whether this is an expected, user-presentable failure.
    pub fn is_application(&self) -> bool {
        matches!(self, MetareaderError::Application(_))
    }
}

pub type Result<T> = std::result::Result<T, MetareaderError>;
