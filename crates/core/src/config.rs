//! # Timetable Configuration Module
//!
//! This module loads the static universe a timetable session works with: the
//! known teachers, classes and subjects, how many week versions each timeline
//! keeps, and the day/hour geometry with its display labels.
//!
//! ## Environment Variables
//!
//! - `TIMETABLE_TEACHERS`: Comma-separated teacher names (default: "Alice,Bob,Charly")
//! - `TIMETABLE_CLASSES`: Comma-separated class names (default: "a1,b1,b2,c2")
//! - `TIMETABLE_SUBJECTS`: Comma-separated subject names (default: "English,Hebrew,Maths")
//! - `TIMETABLE_WEEKS`: Number of week versions per timeline (default: 1)
//! - `TIMETABLE_DAYS`: Comma-separated day labels (default: "Sunday" to "Friday")
//! - `TIMETABLE_HOURS`: Comma-separated `start-end` lesson ranges, e.g. "8:15-9:00"
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::{collections::HashSet, env};

use chrono::NaiveTime;
use eyre::{Result, WrapErr, eyre};
use tracing::Level;

use crate::{
    errors::TimetableError,
    models::calendar::{Calendar, TimeSlot},
};

const DEFAULT_TEACHERS: [&str; 3] = ["Alice", "Bob", "Charly"];
const DEFAULT_CLASSES: [&str; 4] = ["a1", "b1", "b2", "c2"];
const DEFAULT_SUBJECTS: [&str; 3] = ["English", "Hebrew", "Maths"];

/// Configuration for a timetable session
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use timetable_core::config::TimetableConfig;
///
/// fn example() -> Result<()> {
///     let config = TimetableConfig::from_env()?;
///     println!("{} teachers, {} classes", config.teachers.len(), config.classes.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TimetableConfig {
    /// Teacher names, in display order
    pub teachers: Vec<String>,

    /// Class names, in display order
    pub classes: Vec<String>,

    /// Subject names offered when creating assignments
    pub subjects: Vec<String>,

    /// Number of week versions every timeline starts with
    pub weeks: usize,

    /// Day/hour geometry and labels
    pub calendar: Calendar,

    /// Log level for the application
    pub log_level: Level,
}

impl TimetableConfig {
    /// Creates a new TimetableConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `TIMETABLE_WEEKS` cannot be parsed as a number
    /// - a `TIMETABLE_HOURS` entry is not a `H:MM-H:MM` range
    /// - the resulting configuration fails [`TimetableConfig::validate`]
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`TimetableConfig::from_env`] but reads values through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let teachers = lookup("TIMETABLE_TEACHERS")
            .map(|value| split_list(&value))
            .unwrap_or(defaults.teachers);
        let classes = lookup("TIMETABLE_CLASSES")
            .map(|value| split_list(&value))
            .unwrap_or(defaults.classes);
        let subjects = lookup("TIMETABLE_SUBJECTS")
            .map(|value| split_list(&value))
            .unwrap_or(defaults.subjects);

        let weeks = match lookup("TIMETABLE_WEEKS") {
            Some(value) => value
                .trim()
                .parse()
                .wrap_err("Invalid TIMETABLE_WEEKS value")?,
            None => defaults.weeks,
        };

        let day_labels = lookup("TIMETABLE_DAYS")
            .map(|value| split_list(&value))
            .unwrap_or_else(|| defaults.calendar.day_labels().to_vec());
        let time_slots = match lookup("TIMETABLE_HOURS") {
            Some(value) => parse_time_slots(&value)?,
            None => defaults.calendar.time_slots().to_vec(),
        };

        let log_level = match lookup("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let config = Self {
            teachers,
            classes,
            subjects,
            weeks,
            calendar: Calendar::new(day_labels, time_slots),
            log_level,
        };
        config.validate()?;

        Ok(config)
    }

    /// Checks that the universe is usable.
    ///
    /// Teacher and class names share one key space in the store, so a name may
    /// appear only once across both lists.
    pub fn validate(&self) -> Result<()> {
        if self.teachers.is_empty() {
            return Err(eyre!("At least one teacher must be configured"));
        }
        if self.classes.is_empty() {
            return Err(eyre!("At least one class must be configured"));
        }
        if self.weeks == 0 {
            return Err(eyre!("TIMETABLE_WEEKS must be at least 1"));
        }
        let geometry = self.calendar.geometry();
        if geometry.days == 0 || geometry.hours_per_day == 0 {
            return Err(eyre!("The week must have at least one day and one hour"));
        }

        let mut seen = HashSet::new();
        for name in self.teachers.iter().chain(&self.classes) {
            if !seen.insert(name.as_str()) {
                return Err(TimetableError::DuplicateEntity(name.clone()).into());
            }
        }

        Ok(())
    }
}

impl Default for TimetableConfig {
    fn default() -> Self {
        Self {
            teachers: DEFAULT_TEACHERS.iter().map(|s| s.to_string()).collect(),
            classes: DEFAULT_CLASSES.iter().map(|s| s.to_string()).collect(),
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            weeks: 1,
            calendar: Calendar::default(),
            log_level: Level::INFO,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_time_slots(value: &str) -> Result<Vec<TimeSlot>> {
    split_list(value)
        .iter()
        .enumerate()
        .map(|(hour, range)| {
            let (start, end) = range
                .split_once('-')
                .ok_or_else(|| eyre!("Invalid lesson range {range:?}, expected start-end"))?;
            let start = NaiveTime::parse_from_str(start.trim(), "%H:%M")
                .wrap_err_with(|| format!("Invalid start time in {range:?}"))?;
            let end = NaiveTime::parse_from_str(end.trim(), "%H:%M")
                .wrap_err_with(|| format!("Invalid end time in {range:?}"))?;
            Ok(TimeSlot::new(hour, start, end))
        })
        .collect()
}
