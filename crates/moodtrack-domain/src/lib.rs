// Domain layer - Pure business logic
// No dependencies on infrastructure or presentation layers

pub mod check_in;
pub mod consistency;
pub mod shared;

// Re-exports for convenience
pub use shared::{CheckInId, DomainError, SubjectId};
