use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, InternalErrorKind,
};

extern crate log;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound => {
                        (StatusCode::NOT_FOUND, "NOT FOUND").into_response()
                    }
                    EntityErrorKind::Invalid => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "UNPROCESSABLE ENTITY").into_response()
                    }
                    EntityErrorKind::UniqueViolation => {
                        (StatusCode::CONFLICT, "CONFLICT").into_response()
                    }
                    EntityErrorKind::Other(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                    }
                },
                InternalErrorKind::Encryption
                | InternalErrorKind::Config
                | InternalErrorKind::Other(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL SERVER ERROR").into_response()
                }
            },
            // Business-rule violations carry a client-facing message
            DomainErrorKind::Validation(validation_error_kind) => {
                (StatusCode::BAD_REQUEST, validation_error_kind.to_string()).into_response()
            }
            DomainErrorKind::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED").into_response()
            }
        }
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::error::ValidationErrorKind;

    #[test]
    fn not_found_maps_to_404() {
        let response = Error::from(DomainError::not_found()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn validation_errors_map_to_400() {
        let response =
            Error::from(DomainError::validation(ValidationErrorKind::QuotaExceeded))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = Error::from(DomainError::unauthorized()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
