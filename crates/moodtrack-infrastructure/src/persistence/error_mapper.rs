use moodtrack_domain::shared::DomainError;

/// Translates sqlx failures into domain errors, tagged with what was being done
pub struct RepositoryErrorMapper;

impl RepositoryErrorMapper {
    pub fn map_sqlx_error(err: sqlx::Error, context: &str) -> DomainError {
        match &err {
            sqlx::Error::RowNotFound => DomainError::NotFound(format!("{}: row not found", context)),
            sqlx::Error::Database(db_err)
                if db_err.is_unique_violation()
                    || db_err.is_check_violation()
                    || db_err.is_foreign_key_violation() =>
            {
                DomainError::ConstraintViolation(format!("{}: {}", context, db_err.message()))
            }
            sqlx::Error::PoolTimedOut => {
                DomainError::Timeout(format!("{}: timed out waiting for a connection", context))
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DomainError::DataIntegrity(format!("{}: {}", context, err))
            }
            _ => DomainError::Repository(format!("{}: {}", context, err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err = RepositoryErrorMapper::map_sqlx_error(sqlx::Error::RowNotFound, "Find check-in");
        assert!(matches!(err, DomainError::NotFound(ref m) if m.starts_with("Find check-in")));
    }

    #[test]
    fn test_pool_timeout_is_recoverable() {
        let err = RepositoryErrorMapper::map_sqlx_error(sqlx::Error::PoolTimedOut, "Save check-in");
        assert!(matches!(err, DomainError::Timeout(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_other_errors_map_to_repository() {
        let err = RepositoryErrorMapper::map_sqlx_error(sqlx::Error::PoolClosed, "Count check-ins");
        assert!(matches!(err, DomainError::Repository(_)));
    }
}
