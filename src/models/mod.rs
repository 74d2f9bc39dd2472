pub mod attendance;
pub mod attendance_status;
pub mod event;
pub mod reconcile_report;
pub mod registration;
pub mod student;
pub mod window;
