pub mod attendance;
pub mod directory;
pub mod history;
pub mod scan_type;
pub mod schedule_entry;
pub mod shift;
