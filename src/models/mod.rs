pub mod attendance;
pub mod common;
pub mod lineup;
pub mod player;
pub mod user;
