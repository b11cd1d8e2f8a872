use failure::Error as FailureError;
use hyper::StatusCode;
use serde_json::{self, Value};
use validator::ValidationErrors;

use errors::{AuthorizationError, Error, RepoError};

#[derive(Debug, Fail)]
pub enum ControllerError {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Bad request: {}", _0)]
    BadRequest(FailureError),
    #[fail(display = "Forbidden: {}", _0)]
    Forbidden(FailureError),
    #[fail(display = "Unprocessable entity: {}", _0)]
    UnprocessableEntity(FailureError),
    #[fail(display = "Validation error")]
    Validate(ValidationErrors),
    #[fail(display = "Internal server error: {}", _0)]
    InternalServerError(FailureError),
}

impl ControllerError {
    pub fn code(&self) -> StatusCode {
        match self {
            ControllerError::NotFound => StatusCode::NotFound,
            ControllerError::BadRequest(_) => StatusCode::BadRequest,
            ControllerError::Forbidden(_) => StatusCode::Forbidden,
            ControllerError::UnprocessableEntity(_) => StatusCode::UnprocessableEntity,
            ControllerError::Validate(_) => StatusCode::BadRequest,
            ControllerError::InternalServerError(_) => StatusCode::InternalServerError,
        }
    }

    /// JSON body sent to the client
    pub fn payload(&self) -> Value {
        let errors = match self {
            ControllerError::Validate(errors) => serde_json::to_value(errors).unwrap_or(Value::Null),
            _ => Value::Null,
        };
        let description = match self {
            ControllerError::InternalServerError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        json!({
            "description": description,
            "errors": errors,
        })
    }
}

impl From<FailureError> for ControllerError {
    fn from(e: FailureError) -> Self {
        if let Some(error) = e.downcast_ref::<Error>() {
            match error {
                Error::NotFound => return ControllerError::NotFound,
                Error::Forbidden => return ControllerError::Forbidden(format_err!("{}", error)),
                Error::Validate(errors) => return ControllerError::Validate(errors.clone()),
                Error::ParseError => return ControllerError::BadRequest(format_err!("{}", error)),
                Error::InvalidInput { .. }
                | Error::InvalidTransition { .. }
                | Error::Unavailable
                | Error::EmptyCart
                | Error::CheckoutBlocked
                | Error::CartChanged => return ControllerError::UnprocessableEntity(format_err!("{}", error)),
            }
        }

        if e.downcast_ref::<AuthorizationError>().is_some() {
            return ControllerError::BadRequest(e);
        }

        if let Some(RepoError::NotFound) = e.downcast_ref::<RepoError>() {
            return ControllerError::NotFound;
        }

        ControllerError::InternalServerError(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = vec![
            (FailureError::from(Error::NotFound), StatusCode::NotFound),
            (FailureError::from(Error::Forbidden), StatusCode::Forbidden),
            (FailureError::from(Error::EmptyCart), StatusCode::UnprocessableEntity),
            (FailureError::from(Error::CartChanged), StatusCode::UnprocessableEntity),
            (FailureError::from(AuthorizationError::Missing), StatusCode::BadRequest),
            (FailureError::from(RepoError::NotFound), StatusCode::NotFound),
            (
                FailureError::from(RepoError::Connection { reason: "down".to_string() }),
                StatusCode::InternalServerError,
            ),
        ];

        for (error, code) in cases {
            assert_eq!(ControllerError::from(error).code(), code);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let e = ControllerError::from(FailureError::from(RepoError::Query {
            reason: "relation does not exist".to_string(),
        }));

        assert_eq!(e.payload()["description"], json!("Internal server error"));
    }
}
