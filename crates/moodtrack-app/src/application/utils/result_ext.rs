use moodtrack_domain::shared::DomainError;

/// Shorthand for folding foreign errors into `DomainError`
pub trait ResultExt<T, E> {
    /// `result.to_infra_err()?`
    fn to_infra_err(self) -> Result<T, DomainError>;

    /// `result.to_serialization_err()?`
    fn to_serialization_err(self) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }

    fn to_serialization_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Serialization(e.to_string()))
    }
}
