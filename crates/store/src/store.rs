//! # Schedule Store
//!
//! Holds one [`EntityTimeline`] per teacher and per class and keeps the two
//! projections of every placement consistent: an assignment placed at
//! `(week, day, hour)` sits at that coordinate in both the timeline of its
//! class and the timeline of its teacher, and leaves both together.
//!
//! Every mutation runs in two phases. Planning resolves each [`PathUpdate`]
//! against the current state and validates it without writing anything, so a
//! rejected call leaves every timeline untouched. Committing then writes each
//! planned cell and mirrors it onto the counterpart timeline. Observers are
//! notified only after the commit finished.

use std::{collections::HashMap, rc::Rc};

use timetable_core::{
    errors::{TimetableError, TimetableResult},
    models::{
        assignment::{Assignment, EntityKind},
        calendar::Geometry,
    },
};
use tracing::{debug, warn};

use crate::{
    grid::WeekGrid,
    observer::{Observers, ScheduleObserver, Subscription},
    path::{CellCoord, Change, PathUpdate, SchedulePath},
    registry::Slot,
    timeline::EntityTimeline,
};

/// A single planned cell write.
#[derive(Debug)]
struct Edit {
    entity: String,
    coord: CellCoord,
    value: Option<Slot>,
}

/// Collects touched cells per entity, in first-touch order.
#[derive(Debug, Default)]
struct ChangeLog(Vec<Change>);

impl ChangeLog {
    fn record(&mut self, entity: &str, coord: CellCoord) {
        match self.0.iter_mut().find(|change| change.entity == entity) {
            Some(change) => {
                if !change.cells.contains(&coord) {
                    change.cells.push(coord);
                }
            }
            None => self.0.push(Change {
                entity: entity.to_string(),
                cells: vec![coord],
            }),
        }
    }
}

#[derive(Debug)]
pub struct ScheduleStore {
    geometry: Geometry,
    weeks: usize,
    teachers: Vec<String>,
    classes: Vec<String>,
    timelines: HashMap<String, EntityTimeline>,
    observers: Observers,
}

impl ScheduleStore {
    /// Creates empty timelines with `weeks` week versions for every teacher
    /// and class. Names must be unique across both lists.
    pub fn new<T, C>(geometry: Geometry, weeks: usize, teachers: T, classes: C) -> TimetableResult<Self>
    where
        T: IntoIterator,
        T::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let mut store = Self {
            geometry,
            weeks,
            teachers: Vec::new(),
            classes: Vec::new(),
            timelines: HashMap::new(),
            observers: Observers::default(),
        };

        for teacher in teachers {
            store.insert_entity(teacher.into(), EntityKind::Teacher)?;
        }
        for class in classes {
            store.insert_entity(class.into(), EntityKind::Class)?;
        }

        Ok(store)
    }

    fn insert_entity(&mut self, name: String, kind: EntityKind) -> TimetableResult<()> {
        if self.timelines.contains_key(&name) {
            return Err(TimetableError::DuplicateEntity(name));
        }
        self.timelines.insert(
            name.clone(),
            EntityTimeline::new(name.clone(), kind, self.geometry, self.weeks),
        );
        match kind {
            EntityKind::Teacher => self.teachers.push(name),
            EntityKind::Class => self.classes.push(name),
        }
        Ok(())
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn weeks(&self) -> usize {
        self.weeks
    }

    pub fn teachers(&self) -> &[String] {
        &self.teachers
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn kind_of(&self, entity: &str) -> Option<EntityKind> {
        self.timelines.get(entity).map(EntityTimeline::kind)
    }

    pub fn timeline(&self, entity: &str) -> TimetableResult<&EntityTimeline> {
        self.timelines
            .get(entity)
            .ok_or_else(|| TimetableError::UnknownEntity(entity.to_string()))
    }

    pub fn week(&self, entity: &str, week: usize) -> TimetableResult<&WeekGrid> {
        self.timeline(entity)?.week(week)
    }

    pub fn get(&self, entity: &str, week: usize, day: usize, hour: usize) -> TimetableResult<Option<Slot>> {
        Ok(self.week(entity, week)?.get(day, hour)?.cloned())
    }

    /// One lesson period across the week, one entry per day.
    pub fn by_hour(&self, entity: &str, week: usize, hour: usize) -> TimetableResult<Vec<Option<Slot>>> {
        Ok(self
            .week(entity, week)?
            .row(hour)?
            .into_iter()
            .map(|cell| cell.cloned())
            .collect())
    }

    /// One day, one entry per lesson period.
    pub fn by_day(&self, entity: &str, week: usize, day: usize) -> TimetableResult<Vec<Option<Slot>>> {
        Ok(self.week(entity, week)?.day_slice(day)?.to_vec())
    }

    /// Places `assignment` at the same coordinate in its class's and its
    /// teacher's timeline.
    ///
    /// Whatever occupied either cell before is removed from both of its own
    /// timelines at that coordinate.
    pub fn place(&mut self, week: usize, day: usize, hour: usize, assignment: Slot) -> TimetableResult<()> {
        self.check_cell(&assignment.class, EntityKind::Class, week, day, hour)?;
        self.check_cell(&assignment.teacher, EntityKind::Teacher, week, day, hour)?;

        let updates = [
            PathUpdate::set(
                SchedulePath::cell(assignment.class.as_str(), week, day, hour),
                Some(Slot::clone(&assignment)),
            ),
            PathUpdate::set(
                SchedulePath::cell(assignment.teacher.as_str(), week, day, hour),
                Some(Slot::clone(&assignment)),
            ),
        ];
        self.apply_all(&updates)?;
        debug!("Placed {} at week {} day {} hour {}", assignment, week, day, hour);

        Ok(())
    }

    /// Empties the cell at `(week, day, hour)` for both `teacher` and `class`.
    ///
    /// An already empty cell is not an error. A cell holding an assignment of
    /// some other class or teacher is rejected with `EntityMismatch`.
    pub fn clear(&mut self, week: usize, day: usize, hour: usize, teacher: &str, class: &str) -> TimetableResult<()> {
        self.check_cell(class, EntityKind::Class, week, day, hour)?;
        self.check_cell(teacher, EntityKind::Teacher, week, day, hour)?;

        for entity in [class, teacher] {
            if let Some(held) = self.get(entity, week, day, hour)? {
                if held.class != class || held.teacher != teacher {
                    warn!(
                        "Refusing to clear {}/{}/{}/{}: cell holds {}, expected class {} and teacher {}",
                        entity, week, day, hour, held, class, teacher
                    );
                    return Err(TimetableError::EntityMismatch(format!(
                        "{entity} holds {held} at week {week} day {day} hour {hour}, expected class {class} and teacher {teacher}"
                    )));
                }
            }
        }

        let updates = [
            PathUpdate::set(SchedulePath::cell(class, week, day, hour), None),
            PathUpdate::set(SchedulePath::cell(teacher, week, day, hour), None),
        ];
        let changes = self.apply_all(&updates)?;
        if !changes.is_empty() {
            debug!("Cleared {}/{} at week {} day {} hour {}", class, teacher, week, day, hour);
        }

        Ok(())
    }

    /// Clears every placement of `assignment`, in every week, from the
    /// timelines of its class and its teacher. Returns the number of cells
    /// cleared.
    pub fn remove_by_value(&mut self, assignment: &Assignment) -> TimetableResult<usize> {
        let slot = Slot::new(assignment.clone());
        let updates: Vec<PathUpdate> = [
            (assignment.class.as_str(), EntityKind::Class),
            (assignment.teacher.as_str(), EntityKind::Teacher),
        ]
        .into_iter()
        .filter(|(entity, kind)| self.kind_of(entity) == Some(*kind))
        .map(|(entity, _)| PathUpdate::clear_matching(entity, Slot::clone(&slot)))
        .collect();

        let changes = self.apply_all(&updates)?;
        let cleared: usize = changes.iter().map(|change| change.cells.len()).sum();
        debug!("Removed {} from {} cells", assignment, cleared);

        Ok(cleared)
    }

    /// Applies one fine-grained patch.
    ///
    /// Edited cells are mirrored onto the counterpart timelines, so a patch
    /// cannot break class/teacher consistency. A value written under an entity
    /// it does not belong to is rejected with `EntityMismatch`.
    pub fn apply(&mut self, update: PathUpdate) -> TimetableResult<Vec<Change>> {
        self.apply_all(std::slice::from_ref(&update))
    }

    /// Like [`apply`](Self::apply), but every value the patch would write is
    /// passed to `check` first. The first error rejects the whole patch.
    pub fn apply_checked<F>(&mut self, update: PathUpdate, check: F) -> TimetableResult<Vec<Change>>
    where
        F: Fn(&Slot) -> TimetableResult<()>,
    {
        let edits = self.plan(&update)?;
        for value in edits.iter().filter_map(|edit| edit.value.as_ref()) {
            check(value)?;
        }
        Ok(self.commit(edits))
    }

    pub fn subscribe(
        &mut self,
        path: SchedulePath,
        observer: Rc<dyn ScheduleObserver>,
    ) -> TimetableResult<Subscription> {
        self.resolve(&path)?;
        Ok(self.observers.subscribe(path, observer))
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.observers.unsubscribe(subscription)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn check_cell(&self, entity: &str, kind: EntityKind, week: usize, day: usize, hour: usize) -> TimetableResult<()> {
        let timeline = self
            .timelines
            .get(entity)
            .filter(|timeline| timeline.kind() == kind)
            .ok_or_else(|| TimetableError::UnknownEntity(entity.to_string()))?;
        self.geometry.index(day, hour)?;
        timeline.week(week)?;
        Ok(())
    }

    /// Looks up the timeline a path points into and lists the cells in scope.
    fn resolve(&self, path: &SchedulePath) -> TimetableResult<(&EntityTimeline, Vec<CellCoord>)> {
        let invalid = || TimetableError::InvalidPath(path.to_string());
        let timeline = self.timelines.get(path.entity()).ok_or_else(invalid)?;
        let geometry = self.geometry;
        let week_cells = move |week: usize| {
            (0..geometry.cells()).map(move |index| {
                let (day, hour) = geometry.coord(index);
                CellCoord::new(week, day, hour)
            })
        };

        let cells = match path {
            SchedulePath::Timeline { .. } => (0..timeline.len()).flat_map(week_cells).collect(),
            SchedulePath::Week { week, .. } if *week < timeline.len() => week_cells(*week).collect(),
            SchedulePath::Cell { coord, .. }
                if coord.week < timeline.len() && self.geometry.contains(coord.day, coord.hour) =>
            {
                vec![*coord]
            }
            _ => return Err(invalid()),
        };

        Ok((timeline, cells))
    }

    fn plan(&self, update: &PathUpdate) -> TimetableResult<Vec<Edit>> {
        let (timeline, cells) = self.resolve(&update.path)?;
        let entity = timeline.name();
        let kind = timeline.kind();

        let mut edits = Vec::new();
        for coord in cells {
            let old = timeline.week(coord.week)?.get(coord.day, coord.hour)?;
            let value = update.update.value_for(old, coord.day, coord.hour);
            if value.as_ref() == old {
                continue;
            }

            if let Some(new) = &value {
                if !new.belongs_to(kind, entity) {
                    return Err(TimetableError::EntityMismatch(format!(
                        "{new} cannot be filed under {kind} {entity}"
                    )));
                }
                let counterpart = new.key_for(kind.counterpart());
                if self.kind_of(counterpart) != Some(kind.counterpart()) {
                    return Err(TimetableError::UnknownEntity(counterpart.to_string()));
                }
            }

            edits.push(Edit {
                entity: entity.to_string(),
                coord,
                value,
            });
        }

        Ok(edits)
    }

    fn apply_all(&mut self, updates: &[PathUpdate]) -> TimetableResult<Vec<Change>> {
        let mut edits = Vec::new();
        for update in updates {
            edits.extend(self.plan(update)?);
        }
        Ok(self.commit(edits))
    }

    fn commit(&mut self, edits: Vec<Edit>) -> Vec<Change> {
        let mut log = ChangeLog::default();
        for edit in edits {
            self.write_mirrored(&edit.entity, edit.coord, edit.value, &mut log);
        }

        let changes = log.0;
        self.observers.dispatch(&changes);
        changes
    }

    fn write_mirrored(&mut self, entity: &str, coord: CellCoord, value: Option<Slot>, log: &mut ChangeLog) {
        let Some(kind) = self.kind_of(entity) else {
            return;
        };
        let old = self.write(entity, coord, value.clone());
        if old == value {
            return;
        }
        log.record(entity, coord);

        if let Some(old) = old {
            let counterpart = old.key_for(kind.counterpart()).to_string();
            self.clear_if_holds(&counterpart, coord, &old, log);
        }

        if let Some(new) = value {
            let counterpart = new.key_for(kind.counterpart()).to_string();
            let displaced = self.write(&counterpart, coord, Some(Slot::clone(&new)));
            if displaced.as_ref() != Some(&new) {
                log.record(&counterpart, coord);
                if let Some(displaced) = displaced {
                    let other = displaced.key_for(kind).to_string();
                    if other != entity {
                        self.clear_if_holds(&other, coord, &displaced, log);
                    }
                }
            }
        }
    }

    fn clear_if_holds(&mut self, entity: &str, coord: CellCoord, value: &Slot, log: &mut ChangeLog) {
        if self.cell(entity, coord).as_ref() == Some(value) {
            self.write(entity, coord, None);
            log.record(entity, coord);
        }
    }

    fn cell(&self, entity: &str, coord: CellCoord) -> Option<Slot> {
        self.get(entity, coord.week, coord.day, coord.hour).ok().flatten()
    }

    fn write(&mut self, entity: &str, coord: CellCoord, value: Option<Slot>) -> Option<Slot> {
        let written = self
            .timelines
            .get_mut(entity)
            .ok_or_else(|| TimetableError::UnknownEntity(entity.to_string()))
            .and_then(|timeline| timeline.week_mut(coord.week))
            .and_then(|grid| grid.set(coord.day, coord.hour, value));

        match written {
            Ok(old) => old,
            Err(e) => {
                warn!("Dropped write to {} at {:?}: {}", entity, coord, e);
                None
            }
        }
    }
}
