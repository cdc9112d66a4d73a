pub mod check_in_repo;
pub mod unavailable_repo;

pub use check_in_repo::SqliteCheckInRepository;
pub use unavailable_repo::UnavailableCheckInRepository;
