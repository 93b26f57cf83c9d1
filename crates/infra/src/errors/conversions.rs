//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;
use sunquote_domain::SunquoteError;

/// Error newtype that keeps conversions on the infrastructure side and can
/// be converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub SunquoteError);

impl From<InfraError> for SunquoteError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SunquoteError> for InfraError {
    fn from(value: SunquoteError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and
/// within this module.
trait IntoSunquoteError {
    fn into_sunquote(self) -> SunquoteError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → SunquoteError */
/* -------------------------------------------------------------------------- */

impl IntoSunquoteError for SqlError {
    fn into_sunquote(self) -> SunquoteError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        SunquoteError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        SunquoteError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        SunquoteError::Conflict("unique constraint violation".into())
                    }
                    (ErrorCode::ConstraintViolation, 787) => {
                        SunquoteError::Database("foreign key constraint violation".into())
                    }
                    _ => SunquoteError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                SunquoteError::NotFound("no rows returned by query".into())
            }
            RE::FromSqlConversionFailure(_, _, cause) => {
                SunquoteError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                SunquoteError::Database(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => {
                SunquoteError::Database("invalid UTF-8 returned from sqlite".into())
            }
            RE::InvalidQuery => SunquoteError::Database("invalid SQL query".into()),
            other => SunquoteError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_sunquote())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SunquoteError */
/* -------------------------------------------------------------------------- */

impl IntoSunquoteError for HttpError {
    fn into_sunquote(self) -> SunquoteError {
        if self.is_timeout() {
            return SunquoteError::Network("HTTP request timed out".into());
        }
        if self.is_connect() {
            return SunquoteError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => SunquoteError::NotFound(message),
                400..=499 => SunquoteError::InvalidInput(message),
                _ => SunquoteError::Network(message),
            };
        }

        SunquoteError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_sunquote())
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::ffi::{Error as FfiError, ErrorCode};
    use rusqlite::Error as SqlError;

    use super::*;

    #[test]
    fn sqlite_busy_maps_to_database_error() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::DatabaseBusy, extended_code: 5 },
            Some("database is locked".into()),
        );

        let mapped: SunquoteError = InfraError::from(err).into();
        match mapped {
            SunquoteError::Database(msg) => {
                assert!(msg.contains("busy") || msg.contains("locked"));
            }
            other => panic!("expected database error, got {other:?}"),
        }
    }

    #[test]
    fn unique_violation_maps_to_conflict() {
        let err = SqlError::SqliteFailure(
            FfiError { code: ErrorCode::ConstraintViolation, extended_code: 2067 },
            Some("UNIQUE constraint failed".into()),
        );

        let mapped: SunquoteError = InfraError::from(err).into();
        assert!(matches!(mapped, SunquoteError::Conflict(_)));
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let mapped: SunquoteError = InfraError::from(SqlError::QueryReturnedNoRows).into();
        assert!(matches!(mapped, SunquoteError::NotFound(_)));
    }
}
