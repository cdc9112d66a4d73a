mod entity;
mod queue;
mod repository;
mod value_objects;


pub use entity::{CheckIn, MAX_NOTE_CHARS};
pub use queue::OfflineQueue;
pub use repository::CheckInRepository;
pub use value_objects::CheckInKind;
