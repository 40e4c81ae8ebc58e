use serde::{Deserialize, Serialize};
use timetable_core::{
    errors::{TimetableError, TimetableResult},
    models::{assignment::EntityKind, calendar::Geometry},
};

use crate::grid::WeekGrid;

/// The week versions owned by one teacher or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTimeline {
    name: String,
    kind: EntityKind,
    weeks: Vec<WeekGrid>,
}

impl EntityTimeline {
    pub fn new(name: impl Into<String>, kind: EntityKind, geometry: Geometry, weeks: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            weeks: (0..weeks).map(|_| WeekGrid::new(geometry)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.weeks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week(&self, week: usize) -> TimetableResult<&WeekGrid> {
        self.weeks.get(week).ok_or_else(|| self.unknown_week(week))
    }

    pub fn week_mut(&mut self, week: usize) -> TimetableResult<&mut WeekGrid> {
        let err = self.unknown_week(week);
        self.weeks.get_mut(week).ok_or(err)
    }

    pub fn weeks(&self) -> &[WeekGrid] {
        &self.weeks
    }

    fn unknown_week(&self, week: usize) -> TimetableError {
        TimetableError::UnknownWeek {
            entity: self.name.clone(),
            week,
        }
    }
}
