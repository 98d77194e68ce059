//! Error types for the `domain` layer.
use crate::encryption::EncryptionError;
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the domain layer are modeled as a tree structure with
/// `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums representing the kinds of errors that can occur here or in lower
/// layers. The `source` field holds the original error that caused the domain
/// error. The intent is to translate errors between layers while maintaining
/// layer boundaries: `domain` depends on `entity_api`, `web` depends on
/// `domain`, but `web` should not depend directly on `entity_api`. The
/// various `error_kind`s are ultimately used by `web` to pick HTTP status
/// codes and messages for the client.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the
/// `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    Validation(ValidationErrorKind),
    Unauthorized,
}

/// Enum representing the various kinds of internal errors that can occur in
/// the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Encryption,
    Config,
    Other(String),
}

/// Enum representing the kinds of entity errors that can bubble up from the
/// entity layer (`entity_api` and `entity`), reduced to the subset relevant
/// to the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    Invalid,
    UniqueViolation,
    Other(String),
}

/// Caller-input violations of the registry's business rules. These map to
/// 4xx responses with their display text as the body.
#[derive(Debug, PartialEq)]
pub enum ValidationErrorKind {
    /// Owner already holds the maximum number of webhooks
    QuotaExceeded,
    /// Custom path does not match the allowed slug pattern
    InvalidPath,
    /// Requested or generated path collides with an existing webhook
    PathTaken,
    /// A required input field was missing or empty
    MissingField(String),
}

impl fmt::Display for ValidationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ValidationErrorKind::QuotaExceeded => {
                write!(f, "Maximum 3 webhooks allowed per client ID")
            }
            ValidationErrorKind::InvalidPath => write!(
                f,
                "Invalid custom path. Use lowercase alphanumeric and hyphens only (3-50 characters)"
            ),
            ValidationErrorKind::PathTaken => {
                write!(f, "Webhook path already taken. Please try a different one.")
            }
            ValidationErrorKind::MissingField(field) => write!(f, "{field} is required"),
        }
    }
}

impl Error {
    pub fn validation(kind: ValidationErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Validation(kind),
        }
    }

    pub fn unauthorized() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Unauthorized,
        }
    }

    pub fn not_found() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound,
            )),
        }
    }

    pub fn config(source: impl StdError + Send + Sync + 'static) -> Self {
        Error {
            source: Some(Box::new(source)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the
// `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => EntityErrorKind::NotFound,
            EntityApiErrorKind::InvalidQueryTerm => EntityErrorKind::Invalid,
            EntityApiErrorKind::UniqueViolation => EntityErrorKind::UniqueViolation,
            _ => EntityErrorKind::Other("EntityApiErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<EncryptionError> for Error {
    fn from(err: EncryptionError) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Encryption),
        }
    }
}
