//! # Timetable Core
//!
//! Shared vocabulary for the timetable engine: the assignment value type,
//! week geometry and its display labels, selector tags, the domain error
//! type and configuration loading.

/// Session configuration loaded from the environment
pub mod config;
/// Domain error type
pub mod errors;
/// Assignment, calendar and tag types
pub mod models;
