pub mod attendance;
pub mod db_utils;
pub mod directory;
pub mod history;
pub mod initialize;
pub mod log;
pub mod migrate;
pub mod pool;
pub mod schedule;
