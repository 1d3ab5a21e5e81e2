pub mod attendance_handler;
pub mod backend_health_handler;
pub mod roster_handler;
