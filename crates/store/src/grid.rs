//! # Week Grid
//!
//! One week of day x hour cells for a single entity. Cells are stored in one
//! flat vector laid out by [`Geometry::index`]; row and day views are derived
//! from it on every call, so they always reflect the latest writes.

use serde::{Deserialize, Serialize};
use timetable_core::{
    errors::{TimetableError, TimetableResult},
    models::calendar::Geometry,
};

use crate::registry::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "RawWeekGrid<T>",
    bound(deserialize = "T: Deserialize<'de>")
)]
pub struct WeekGrid<T = Slot> {
    geometry: Geometry,
    cells: Vec<Option<T>>,
}

#[derive(Deserialize)]
struct RawWeekGrid<T> {
    geometry: Geometry,
    cells: Vec<Option<T>>,
}

impl<T> TryFrom<RawWeekGrid<T>> for WeekGrid<T> {
    type Error = TimetableError;

    fn try_from(raw: RawWeekGrid<T>) -> TimetableResult<Self> {
        if raw.cells.len() != raw.geometry.cells() {
            return Err(TimetableError::GridShape {
                expected: raw.geometry.cells(),
                found: raw.cells.len(),
            });
        }
        Ok(Self {
            geometry: raw.geometry,
            cells: raw.cells,
        })
    }
}

impl<T> WeekGrid<T> {
    /// An empty week.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            cells: std::iter::repeat_with(|| None)
                .take(geometry.cells())
                .collect(),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn get(&self, day: usize, hour: usize) -> TimetableResult<Option<&T>> {
        let index = self.geometry.index(day, hour)?;
        Ok(self.cells[index].as_ref())
    }

    /// Writes `value` at `(day, hour)` and returns what was there before.
    pub fn set(&mut self, day: usize, hour: usize, value: Option<T>) -> TimetableResult<Option<T>> {
        let index = self.geometry.index(day, hour)?;
        Ok(std::mem::replace(&mut self.cells[index], value))
    }

    /// The cells of one lesson period, one per day.
    pub fn row(&self, hour: usize) -> TimetableResult<Vec<Option<&T>>> {
        self.geometry.index(0, hour)?;
        Ok((0..self.geometry.days)
            .map(|day| self.cells[day * self.geometry.hours_per_day + hour].as_ref())
            .collect())
    }

    /// The cells of one day, one per lesson period.
    pub fn day_slice(&self, day: usize) -> TimetableResult<&[Option<T>]> {
        let start = self.geometry.index(day, 0)?;
        Ok(&self.cells[start..start + self.geometry.hours_per_day])
    }

    /// Every cell with its coordinate, day-major.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Option<&T>)> {
        let geometry = self.geometry;
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let (day, hour) = geometry.coord(index);
            (day, hour, cell.as_ref())
        })
    }

    /// Builds a new grid whose cells are `f(old, day, hour)`.
    pub fn map<U, F>(&self, mut f: F) -> WeekGrid<U>
    where
        F: FnMut(Option<&T>, usize, usize) -> Option<U>,
    {
        WeekGrid {
            geometry: self.geometry,
            cells: self.iter().map(|(day, hour, cell)| f(cell, day, hour)).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl<T: Clone> WeekGrid<T> {
    /// A copy of this grid with `changes` applied, validated up front so a
    /// bad coordinate leaves nothing half-written.
    pub fn change(&self, changes: &[(usize, usize, Option<T>)]) -> TimetableResult<Self> {
        let indices = changes
            .iter()
            .map(|(day, hour, _)| self.geometry.index(*day, *hour))
            .collect::<TimetableResult<Vec<_>>>()?;

        let mut grid = self.clone();
        for (index, (_, _, value)) in indices.into_iter().zip(changes) {
            grid.cells[index] = value.clone();
        }
        Ok(grid)
    }
}

impl<T: PartialEq> WeekGrid<T> {
    /// Coordinates of every cell holding `value`.
    pub fn positions(&self, value: &T) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, cell)| *cell == Some(value))
            .map(|(day, hour, _)| (day, hour))
            .collect()
    }
}
