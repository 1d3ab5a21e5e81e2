pub mod api;
pub mod cache;
pub mod error;
pub mod events;
pub mod synchronizer;

pub use api::{AttendanceApi, RosterProvider};
pub use cache::AttendanceCache;
pub use error::SyncError;
pub use events::{AttendanceChange, AttendanceEvent, PriorAttendance};
pub use synchronizer::{AttendanceConfirmation, AttendanceSynchronizer, Session};
