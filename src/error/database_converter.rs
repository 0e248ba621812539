use crate::error::AppError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to AppError variants.
///
/// Constraint violations are kept apart from other database failures so the
/// service layer can report them as domain outcomes ("not created") instead of
/// unexpected errors.
pub struct DatabaseErrorConverter;

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    ///
    /// # Returns
    /// An AppError variant appropriate for the type of database error
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info, operation)
            }
            DieselError::NotFound => AppError::NotFound,
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    /// Converts a database error reported by the server.
    ///
    /// # Arguments
    /// * `kind` - The type of database error
    /// * `info` - Detailed error information from the database
    /// * `operation` - Description of the database operation that failed
    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: Box<dyn diesel::result::DatabaseErrorInformation + Send + Sync>,
        operation: &str,
    ) -> AppError {
        let message = info.message();
        let detail = match info.constraint_name() {
            Some(constraint) => format!("{} (constraint: {})", message, constraint),
            None => message.to_string(),
        };

        match kind {
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::ForeignKeyViolation
            | DatabaseErrorKind::CheckViolation => AppError::ConstraintViolation {
                operation: operation.to_string(),
                source: anyhow::Error::msg(detail),
            },
            _ => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("Database error: {}", detail)),
            },
        }
    }
}
