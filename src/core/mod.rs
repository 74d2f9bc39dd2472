pub mod admin;
pub mod backup;
pub mod checkin;
pub mod classifier;
pub mod clock;
pub mod log;
pub mod reconcile;
