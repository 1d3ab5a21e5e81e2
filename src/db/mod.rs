pub mod attendance;
pub mod helpers;
pub mod roster;
