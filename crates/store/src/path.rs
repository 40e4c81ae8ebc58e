//! # Path Updates
//!
//! A [`PathUpdate`] patches cells of one entity's timeline without rebuilding
//! the store. Paths come from a closed set of shapes, so a path is either a
//! whole timeline, one week of it, or one cell; nothing deeper or shallower
//! can be expressed.
//!
//! The terminal of an update is either a replacement value or a transform
//! from the old cell value (and its day/hour) to the new one. On a week or
//! timeline path the terminal is applied to every cell in scope, which is
//! how predicate-based bulk edits are written.

use std::fmt;

use serde::{Deserialize, Serialize};
use timetable_core::errors::{TimetableError, TimetableResult};

use crate::registry::Slot;

/// Address of a single cell inside a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub week: usize,
    pub day: usize,
    pub hour: usize,
}

impl CellCoord {
    pub const fn new(week: usize, day: usize, hour: usize) -> Self {
        Self { week, day, hour }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum SchedulePath {
    Timeline { entity: String },
    Week { entity: String, week: usize },
    Cell { entity: String, coord: CellCoord },
}

impl SchedulePath {
    pub fn timeline(entity: impl Into<String>) -> Self {
        Self::Timeline {
            entity: entity.into(),
        }
    }

    pub fn week(entity: impl Into<String>, week: usize) -> Self {
        Self::Week {
            entity: entity.into(),
            week,
        }
    }

    pub fn cell(entity: impl Into<String>, week: usize, day: usize, hour: usize) -> Self {
        Self::Cell {
            entity: entity.into(),
            coord: CellCoord::new(week, day, hour),
        }
    }

    /// Builds a path from an entity key followed by index segments:
    /// none for the timeline, `[week]`, or `[week, day, hour]`.
    pub fn from_segments(entity: impl Into<String>, segments: &[usize]) -> TimetableResult<Self> {
        let entity = entity.into();
        match *segments {
            [] => Ok(Self::timeline(entity)),
            [week] => Ok(Self::week(entity, week)),
            [week, day, hour] => Ok(Self::cell(entity, week, day, hour)),
            _ => Err(TimetableError::InvalidPath(format!(
                "{entity}: expected 0, 1 or 3 segments, got {}",
                segments.len()
            ))),
        }
    }

    pub fn entity(&self) -> &str {
        match self {
            Self::Timeline { entity } | Self::Week { entity, .. } | Self::Cell { entity, .. } => {
                entity
            }
        }
    }

    /// Whether the cell `coord` of `entity` lies inside this path.
    pub fn contains(&self, entity: &str, coord: CellCoord) -> bool {
        if self.entity() != entity {
            return false;
        }
        match self {
            Self::Timeline { .. } => true,
            Self::Week { week, .. } => *week == coord.week,
            Self::Cell { coord: own, .. } => *own == coord,
        }
    }

    /// Whether the two paths address at least one common cell.
    pub fn overlaps(&self, other: &SchedulePath) -> bool {
        if self.entity() != other.entity() {
            return false;
        }
        match (self, other) {
            (Self::Timeline { .. }, _) | (_, Self::Timeline { .. }) => true,
            (Self::Week { week: a, .. }, Self::Week { week: b, .. }) => a == b,
            (Self::Week { week, .. }, Self::Cell { coord, .. })
            | (Self::Cell { coord, .. }, Self::Week { week, .. }) => *week == coord.week,
            (Self::Cell { coord: a, .. }, Self::Cell { coord: b, .. }) => a == b,
        }
    }
}

impl fmt::Display for SchedulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeline { entity } => write!(f, "{entity}"),
            Self::Week { entity, week } => write!(f, "{entity}/{week}"),
            Self::Cell { entity, coord } => {
                write!(f, "{entity}/{}/{}/{}", coord.week, coord.day, coord.hour)
            }
        }
    }
}

/// Computes a cell's new value from its old value, day and hour.
pub type CellTransform = Box<dyn Fn(Option<&Slot>, usize, usize) -> Option<Slot>>;

pub enum CellUpdate {
    Set(Option<Slot>),
    Transform(CellTransform),
}

impl CellUpdate {
    pub fn value_for(&self, old: Option<&Slot>, day: usize, hour: usize) -> Option<Slot> {
        match self {
            Self::Set(value) => value.clone(),
            Self::Transform(f) => f(old, day, hour),
        }
    }
}

impl fmt::Debug for CellUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Set(value) => f.debug_tuple("Set").field(value).finish(),
            Self::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

#[derive(Debug)]
pub struct PathUpdate {
    pub path: SchedulePath,
    pub update: CellUpdate,
}

impl PathUpdate {
    pub fn set(path: SchedulePath, value: Option<Slot>) -> Self {
        Self {
            path,
            update: CellUpdate::Set(value),
        }
    }

    pub fn transform<F>(path: SchedulePath, f: F) -> Self
    where
        F: Fn(Option<&Slot>, usize, usize) -> Option<Slot> + 'static,
    {
        Self {
            path,
            update: CellUpdate::Transform(Box::new(f)),
        }
    }

    /// Clears every cell of `entity`'s timeline, across all weeks, that holds
    /// `value`.
    pub fn clear_matching(entity: impl Into<String>, value: Slot) -> Self {
        Self::transform(SchedulePath::timeline(entity), move |cell, _, _| match cell {
            Some(slot) if **slot == *value => None,
            other => other.cloned(),
        })
    }
}

/// The cells of one entity that a mutation actually changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub entity: String,
    pub cells: Vec<CellCoord>,
}

impl Change {
    /// Whether an observer watching `path` must be told about this change.
    pub fn touches(&self, path: &SchedulePath) -> bool {
        self.cells
            .iter()
            .any(|coord| path.contains(&self.entity, *coord))
    }
}
