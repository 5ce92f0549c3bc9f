//! Error taxonomy for the data layer.
//!
//! Every ORM operation returns [`DataError`]. Raw Diesel errors are folded
//! into the three domain categories where SQLite tells us enough to do so.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// Malformed input, a uniqueness clash, or a reference to a missing or
    /// inactive record.
    #[error("validation error: {0}")]
    Validation(String),
    /// The addressed record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A business rule would be broken (negative stock, negative hours,
    /// out-of-range values).
    #[error("constraint error: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Database(DieselError),
}

impl DataError {
    pub fn not_found(entity: &str, id: i32) -> Self {
        DataError::NotFound(format!("{} {} does not exist", entity, id))
    }
}

impl From<DieselError> for DataError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => DataError::NotFound("record not found".to_string()),
            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => DataError::Validation(message),
                    DatabaseErrorKind::ForeignKeyViolation => DataError::Validation(message),
                    DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation => {
                        DataError::Constraint(message)
                    }
                    other => DataError::Database(DieselError::DatabaseError(other, info)),
                }
            }
            other => DataError::Database(other),
        }
    }
}
