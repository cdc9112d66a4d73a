use moodtrack_domain::shared::{DomainError, ErrorCode, ErrorSeverity};
use serde::{Deserialize, Serialize};

/// Structured error printed on stderr when a command fails.
///
/// Carries the numeric code, a message, the severity and whether a retry
/// could succeed.
#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
#[error("[{code}] {message}")]
pub struct CommandError {
    /// Numeric error code (2xxx-6xxx range)
    pub code: u16,
    pub message: String,
    pub severity: ErrorSeverity,
    pub recoverable: bool,
}

impl CommandError {
    pub fn from_code(error_code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: error_code.code(),
            message: message.into(),
            severity: error_code.severity(),
            recoverable: error_code.is_recoverable(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::InfrastructureError, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_code(ErrorCode::NotFound, message)
    }
}

impl From<DomainError> for CommandError {
    fn from(err: DomainError) -> Self {
        Self {
            code: err.code().code(),
            message: err.message().to_string(),
            severity: err.severity(),
            recoverable: err.is_recoverable(),
        }
    }
}

impl From<anyhow::Error> for CommandError {
    fn from(err: anyhow::Error) -> Self {
        // Keep the domain code when the chain started from one
        match err.downcast::<DomainError>() {
            Ok(domain) => domain.into(),
            Err(err) => Self::infrastructure(format!("{:#}", err)),
        }
    }
}

impl From<serde_json::Error> for CommandError {
    fn from(err: serde_json::Error) -> Self {
        Self::from_code(ErrorCode::SerializationError, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_error_from_domain_error() {
        let domain_err = DomainError::NotFound("Check-in abc not found".to_string());
        let cmd_err: CommandError = domain_err.into();

        assert_eq!(cmd_err.code, 2001);
        assert_eq!(cmd_err.message, "Check-in abc not found");
        assert_eq!(cmd_err.severity, ErrorSeverity::Info);
        assert!(!cmd_err.recoverable);
    }

    #[test]
    fn test_timeout_is_recoverable() {
        let cmd_err: CommandError = DomainError::Timeout("slow disk".to_string()).into();
        assert_eq!(cmd_err.code, 5003);
        assert!(cmd_err.recoverable);
    }

    #[test]
    fn test_anyhow_keeps_domain_code() {
        let err = anyhow::Error::new(DomainError::Validation("bad level".to_string()));
        let cmd_err: CommandError = err.into();
        assert_eq!(cmd_err.code, 6001);

        let cmd_err: CommandError = anyhow::anyhow!("disk gone").into();
        assert_eq!(cmd_err.code, 5001);
        assert_eq!(cmd_err.message, "disk gone");
    }

    #[test]
    fn test_command_error_helpers() {
        assert_eq!(CommandError::not_found("Resource not found").code, 2001);
        assert_eq!(CommandError::infrastructure("Service unavailable").code, 5001);
    }

    #[test]
    fn test_display_and_json_shape() {
        let err: CommandError = DomainError::Validation("Month must be 1-12".to_string()).into();
        assert_eq!(err.to_string(), "[6001] Month must be 1-12");

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["severity"], "info");
        assert_eq!(json["recoverable"], false);
    }
}
