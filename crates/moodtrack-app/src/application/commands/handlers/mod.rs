mod record_check_in_handler;
mod sync_offline_queue_handler;

#[cfg(test)]
mod tests;

pub use record_check_in_handler::RecordCheckInCommandHandler;
pub use sync_offline_queue_handler::SyncOfflineQueueCommandHandler;
