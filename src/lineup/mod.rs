pub mod position;
pub mod store;

pub use position::{FieldPosition, PlayerPosition, SlotLocation, SlotPosition, UnknownPositionPolicy, SLOT_CAPACITY};
pub use store::{LineupHandle, LineupStore, MatchState};
