pub mod absence;
pub mod calculator;
pub mod clock;
pub mod config;
pub mod log;
pub mod reconcile;
pub mod scan;
pub mod schedule;
