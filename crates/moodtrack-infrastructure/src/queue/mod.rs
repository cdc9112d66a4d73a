mod file;
mod in_memory;

pub use file::JsonFileOfflineQueue;
pub use in_memory::{InMemoryOfflineQueue, DEFAULT_QUEUE_CAPACITY};
