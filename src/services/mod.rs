pub mod attendance_client;

pub use attendance_client::AttendanceHttpClient;
