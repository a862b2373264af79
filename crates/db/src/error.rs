use ams_core::error::CoreError;

/// Failure reported by an [`EntityStore`](crate::EntityStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A `uq_*` unique constraint rejected the write.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// A referenced row disappeared between the check and the write.
    #[error("Referenced row missing for constraint: {constraint}")]
    ForeignKeyViolation { constraint: String },

    /// A stored value could not be mapped back into the domain.
    #[error("Stored data is inconsistent: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Whether the caller may reasonably retry the operation.
    ///
    /// Pool exhaustion, dropped connections, lock timeouts, deadlocks and
    /// serialization failures are transient; everything else is not.
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Database(err) => match err {
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => true,
                sqlx::Error::Database(db_err) => matches!(
                    db_err.code().as_deref(),
                    Some("40001" | "40P01" | "55P03" | "57014")
                ),
                _ => false,
            },
            _ => false,
        }
    }

    /// Whether this is a unique violation on `constraint`.
    pub fn is_unique_violation(&self, constraint: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint: c } if c == constraint)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.code().as_deref() {
                // PostgreSQL unique_violation
                Some("23505") if constraint.starts_with("uq_") => {
                    return StoreError::UniqueViolation { constraint };
                }
                // foreign_key_violation
                Some("23503") => return StoreError::ForeignKeyViolation { constraint },
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        StoreError::Corrupt(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_transient() {
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_transient());
        assert!(!StoreError::Corrupt("bad".into()).is_transient());
    }

    #[test]
    fn unique_violation_matches_its_constraint() {
        let err = StoreError::UniqueViolation {
            constraint: "uq_employees_email".into(),
        };
        assert!(err.is_unique_violation("uq_employees_email"));
        assert!(!err.is_unique_violation("uq_asset_categories_name"));
    }

    #[test]
    fn decode_failures_become_corrupt() {
        let err: StoreError = CoreError::Internal("Unknown asset status id 9".into()).into();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
