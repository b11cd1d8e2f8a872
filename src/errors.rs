use failure::Error as FailureError;
use postgres;
use r2d2;
use validator::ValidationErrors;

/// Domain errors raised by services
#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Forbidden")]
    Forbidden,
    #[fail(display = "Validation error")]
    Validate(ValidationErrors),
    #[fail(display = "Invalid {}: {}", field, reason)]
    InvalidInput { field: String, reason: String },
    #[fail(display = "Status cannot change from {} to {}", from, to)]
    InvalidTransition { from: String, to: String },
    #[fail(display = "Jersey is not available")]
    Unavailable,
    #[fail(display = "Cart is empty")]
    EmptyCart,
    #[fail(display = "Cart contains jerseys that are out of stock")]
    CheckoutBlocked,
    #[fail(display = "Cart changed during checkout, please review it and try again")]
    CartChanged,
    #[fail(display = "Parse error")]
    ParseError,
}

impl Error {
    pub fn invalid_input<F, R>(field: F, reason: R) -> Self
    where
        F: Into<String>,
        R: Into<String>,
    {
        Error::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Fail)]
pub enum AuthorizationError {
    #[fail(display = "Missing header")]
    Missing,
    #[fail(display = "Failed to parse user id {}: {}", raw, error)]
    Parse { raw: String, error: FailureError },
}

#[derive(Debug, Fail)]
pub enum RepoError {
    #[fail(display = "Not found")]
    NotFound,
    #[fail(display = "Connection: {}", reason)]
    Connection { reason: String },
    #[fail(display = "Query: {}", reason)]
    Query { reason: String },
    #[fail(display = "Malformed data: {}", reason)]
    Data { reason: String },
}

impl From<postgres::Error> for RepoError {
    fn from(v: postgres::Error) -> Self {
        let reason = match v.as_db_error() {
            Some(e) => db_error_reason(e.message(), e.code().code(), e.constraint()),
            None => format!("{:?}", v),
        };
        RepoError::Query { reason }
    }
}

/// Server error with its SQLSTATE and the violated constraint, if any
fn db_error_reason(message: &str, code: &str, constraint: Option<&str>) -> String {
    match constraint {
        Some(constraint) => format!("{} (SQLSTATE {}, constraint {})", message, code, constraint),
        None => format!("{} (SQLSTATE {})", message, code),
    }
}

impl From<r2d2::Error> for RepoError {
    fn from(v: r2d2::Error) -> Self {
        RepoError::Connection { reason: format!("{}", v) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_error_reason_keeps_sqlstate_and_constraint() {
        assert_eq!(
            db_error_reason("duplicate key value violates unique constraint", "23505", Some("cart_line")),
            "duplicate key value violates unique constraint (SQLSTATE 23505, constraint cart_line)"
        );
        assert_eq!(db_error_reason("syntax error", "42601", None), "syntax error (SQLSTATE 42601)");
    }
}
