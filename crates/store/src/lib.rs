//! # Timetable Store
//!
//! Storage engine for a weekly class/teacher timetable. Teacher and class
//! views share the same placements: an assignment placed for a class shows up
//! in its teacher's timeline at the same cell and is removed from both at
//! once.
//!
//! ## Layers
//!
//! - **Registry**: interns assignments and hands out slot handles
//! - **Grid / Timeline**: one entity's weeks of day x hour cells
//! - **Path**: addressed, scoped mutations and the changes they produce
//! - **Store**: the keyed timelines and the dual-write protocol
//! - **Timetable**: the session context combining registry and store

pub mod availability;
pub mod grid;
pub mod observer;
pub mod path;
pub mod registry;
pub mod store;
pub mod timeline;
pub mod timetable;

pub mod mock;

pub use grid::WeekGrid;
pub use path::{CellCoord, Change, PathUpdate, SchedulePath};
pub use registry::{Slot, SlotRegistry};
pub use store::ScheduleStore;
pub use timeline::EntityTimeline;
pub use timetable::Timetable;
