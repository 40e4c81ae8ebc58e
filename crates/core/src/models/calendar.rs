use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::errors::{TimetableError, TimetableResult};

/// Days in the reference school week (Sunday to Friday)
pub const DAYS_PER_WEEK: usize = 6;
/// Lessons per day in the reference school week
pub const HOURS_PER_DAY: usize = 10;

const DAY_LABELS: [&str; DAYS_PER_WEEK] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
];

const LESSON_TIMES: [((u32, u32), (u32, u32)); HOURS_PER_DAY] = [
    ((8, 15), (9, 0)),
    ((9, 0), (9, 50)),
    ((10, 10), (10, 55)),
    ((10, 55), (11, 40)),
    ((11, 50), (12, 35)),
    ((12, 35), (13, 20)),
    ((13, 30), (14, 15)),
    ((14, 15), (15, 0)),
    ((15, 10), (15, 55)),
    ((15, 55), (16, 30)),
];

/// Shape of a week grid: how many days and how many lessons per day.
///
/// Cells are laid out day-major, so `(day, hour)` lives at
/// `day * hours_per_day + hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub days: usize,
    pub hours_per_day: usize,
}

impl Geometry {
    pub const fn new(days: usize, hours_per_day: usize) -> Self {
        Self {
            days,
            hours_per_day,
        }
    }

    /// Total number of cells in one week.
    pub const fn cells(&self) -> usize {
        self.days * self.hours_per_day
    }

    pub const fn contains(&self, day: usize, hour: usize) -> bool {
        day < self.days && hour < self.hours_per_day
    }

    /// Flat index of `(day, hour)`, or `OutOfBounds`.
    pub fn index(&self, day: usize, hour: usize) -> TimetableResult<usize> {
        if self.contains(day, hour) {
            Ok(day * self.hours_per_day + hour)
        } else {
            Err(TimetableError::OutOfBounds { day, hour })
        }
    }

    /// Inverse of [`Geometry::index`] for indices below [`Geometry::cells`].
    pub const fn coord(&self, index: usize) -> (usize, usize) {
        (index / self.hours_per_day, index % self.hours_per_day)
    }
}

impl Default for Geometry {
    fn default() -> Self {
        Self::new(DAYS_PER_WEEK, HOURS_PER_DAY)
    }
}

/// One lesson period of the day with its wall-clock bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub hour: usize,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(hour: usize, start: NaiveTime, end: NaiveTime) -> Self {
        Self { hour, start, end }
    }

    /// One-based lesson number as printed in the row header.
    pub fn number(&self) -> usize {
        self.hour + 1
    }

    /// Formats the period as `8:15 - 9:00`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%-H:%M"),
            self.end.format("%-H:%M")
        )
    }
}

/// Static week geometry plus the labels a renderer shows for it.
///
/// Geometry is always derived from the labels, including on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CalendarLabels")]
pub struct Calendar {
    geometry: Geometry,
    day_labels: Vec<String>,
    time_slots: Vec<TimeSlot>,
}

impl Calendar {
    /// Builds a calendar whose geometry follows the number of labels given.
    ///
    /// Time slots are renumbered by position so `time_slots[h].hour == h`.
    pub fn new(day_labels: Vec<String>, time_slots: Vec<TimeSlot>) -> Self {
        let time_slots: Vec<TimeSlot> = time_slots
            .into_iter()
            .enumerate()
            .map(|(hour, slot)| TimeSlot { hour, ..slot })
            .collect();
        Self {
            geometry: Geometry::new(day_labels.len(), time_slots.len()),
            day_labels,
            time_slots,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn day_labels(&self) -> &[String] {
        &self.day_labels
    }

    pub fn day_label(&self, day: usize) -> Option<&str> {
        self.day_labels.get(day).map(String::as_str)
    }

    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.time_slots
    }
}

#[derive(Deserialize)]
struct CalendarLabels {
    day_labels: Vec<String>,
    time_slots: Vec<TimeSlot>,
}

impl From<CalendarLabels> for Calendar {
    fn from(labels: CalendarLabels) -> Self {
        Self::new(labels.day_labels, labels.time_slots)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        let day_labels = DAY_LABELS.iter().map(|day| day.to_string()).collect();
        let time_slots = LESSON_TIMES
            .iter()
            .enumerate()
            .map(|(hour, &((sh, sm), (eh, em)))| {
                TimeSlot::new(hour, clock(sh, sm), clock(eh, em))
            })
            .collect();
        Self::new(day_labels, time_slots)
    }
}

fn clock(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}
