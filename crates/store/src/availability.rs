//! # Cell Options
//!
//! What a class timetable editor offers for one cell: the assignment sitting
//! there now, the registered slots of that class whose teacher is free at the
//! cell, the ones whose teacher is busy, and the teachers with nothing
//! scheduled at that time.

use timetable_core::{
    errors::{TimetableError, TimetableResult},
    models::assignment::{EntityKind, SlotHandle},
};

use crate::{registry::Slot, timetable::Timetable};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellOptions {
    pub current: Option<Slot>,
    pub available: Vec<(SlotHandle, Slot)>,
    pub unavailable: Vec<(SlotHandle, Slot)>,
    pub free_teachers: Vec<String>,
}

pub fn cell_options(
    timetable: &Timetable,
    class: &str,
    week: usize,
    day: usize,
    hour: usize,
) -> TimetableResult<CellOptions> {
    if timetable.store().kind_of(class) != Some(EntityKind::Class) {
        return Err(TimetableError::UnknownEntity(class.to_string()));
    }

    let current = timetable.get(class, week, day, hour)?;
    let mut options = CellOptions {
        current: current.clone(),
        ..CellOptions::default()
    };

    for (handle, slot) in timetable.registry().iter() {
        if current.as_ref() == Some(slot) {
            options.available.push((handle, Slot::clone(slot)));
        } else if slot.class == class {
            if teacher_is_free(timetable, &slot.teacher, week, day, hour)? {
                options.available.push((handle, Slot::clone(slot)));
            } else {
                options.unavailable.push((handle, Slot::clone(slot)));
            }
        }
    }

    for teacher in timetable.teachers() {
        if teacher_is_free(timetable, teacher, week, day, hour)? {
            options.free_teachers.push(teacher.clone());
        }
    }

    Ok(options)
}

fn teacher_is_free(
    timetable: &Timetable,
    teacher: &str,
    week: usize,
    day: usize,
    hour: usize,
) -> TimetableResult<bool> {
    Ok(timetable.get(teacher, week, day, hour)?.is_none())
}
