use rusqlite::ffi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Missing reference: {0}")]
    ForeignKey(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for errors caused by the written data rather than by the datastore.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Conflict(_) | AppError::ForeignKey(_)
        )
    }

    pub(crate) fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{entity} {id} not found"))
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        let classified = match &err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ffi::ErrorCode::ConstraintViolation =>
            {
                let message = message.clone().unwrap_or_else(|| failure.to_string());
                Some((failure.extended_code, message))
            }
            _ => None,
        };
        let Some((code, message)) = classified else {
            return AppError::Database(err);
        };

        match code {
            ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                AppError::Conflict(message)
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => AppError::ForeignKey(message),
            ffi::SQLITE_CONSTRAINT_CHECK | ffi::SQLITE_CONSTRAINT_NOTNULL => {
                AppError::Validation(message)
            }
            _ => {
                tracing::error!("Unclassified constraint violation: {}", message);
                AppError::Database(err)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
