//! # Timetable Session
//!
//! The context object a front end holds for the lifetime of a session. It
//! owns the calendar, the slot registry and the schedule store, and is the
//! only place where registry and store mutations are combined.

use std::rc::Rc;

use eyre::{Result, WrapErr};
use timetable_core::{
    config::TimetableConfig,
    errors::{TimetableError, TimetableResult},
    models::{
        assignment::{Assignment, EntityKind, SlotHandle},
        calendar::Calendar,
        tags::Tag,
    },
};
use tracing::{debug, info};

use crate::{
    grid::WeekGrid,
    observer::{ScheduleObserver, Subscription},
    path::{Change, PathUpdate, SchedulePath},
    registry::{Slot, SlotRegistry},
    store::ScheduleStore,
};

#[derive(Debug)]
pub struct Timetable {
    calendar: Calendar,
    subjects: Vec<String>,
    registry: SlotRegistry,
    store: ScheduleStore,
}

impl Timetable {
    /// Creates a session with empty timelines for every configured entity.
    pub fn from_config(config: &TimetableConfig) -> Result<Self> {
        config.validate()?;

        let store = ScheduleStore::new(
            config.calendar.geometry(),
            config.weeks,
            config.teachers.iter().cloned(),
            config.classes.iter().cloned(),
        )
        .wrap_err("Failed to build schedule store")?;

        info!(
            "Timetable ready: {} teachers, {} classes, {} week(s) of {}x{} cells",
            store.teachers().len(),
            store.classes().len(),
            store.weeks(),
            store.geometry().days,
            store.geometry().hours_per_day
        );

        Ok(Self {
            calendar: config.calendar.clone(),
            subjects: config.subjects.clone(),
            registry: SlotRegistry::new(),
            store,
        })
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn subjects(&self) -> &[String] {
        &self.subjects
    }

    pub fn teachers(&self) -> &[String] {
        self.store.teachers()
    }

    pub fn classes(&self) -> &[String] {
        self.store.classes()
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn store(&self) -> &ScheduleStore {
        &self.store
    }

    /// Registers an assignment between a known class and a known teacher.
    pub fn register(&mut self, assignment: Assignment) -> TimetableResult<SlotHandle> {
        for kind in [EntityKind::Class, EntityKind::Teacher] {
            let entity = assignment.key_for(kind);
            if self.store.kind_of(entity) != Some(kind) {
                return Err(TimetableError::UnknownEntity(entity.to_string()));
            }
        }
        self.registry.register(assignment)
    }

    /// Removes a slot from every timeline that holds it, then forgets it.
    pub fn unregister(&mut self, handle: SlotHandle) -> TimetableResult<Slot> {
        let slot = self.registry.resolve(handle)?;
        let cleared = self.store.remove_by_value(&slot)?;
        self.registry.unregister(handle)?;
        debug!("Slot {} unregistered, {} cells cleared", handle, cleared);

        Ok(slot)
    }

    pub fn resolve(&self, handle: SlotHandle) -> TimetableResult<Slot> {
        self.registry.resolve(handle)
    }

    pub fn find(&self, assignment: &Assignment) -> Option<SlotHandle> {
        self.registry.find(assignment)
    }

    /// Registered slots whose class or teacher is `entity`, ordered by handle.
    pub fn slots_for(&self, entity: &str) -> Vec<(SlotHandle, Slot)> {
        self.registry
            .iter()
            .filter(|(_, slot)| slot.class == entity || slot.teacher == entity)
            .map(|(handle, slot)| (handle, Slot::clone(slot)))
            .collect()
    }

    pub fn place(&mut self, week: usize, day: usize, hour: usize, handle: SlotHandle) -> TimetableResult<()> {
        let slot = self.registry.resolve(handle)?;
        self.store.place(week, day, hour, slot)
    }

    /// Registers `assignment` if needed and places it.
    pub fn place_assignment(
        &mut self,
        week: usize,
        day: usize,
        hour: usize,
        assignment: Assignment,
    ) -> TimetableResult<SlotHandle> {
        let handle = self.register(assignment)?;
        self.place(week, day, hour, handle)?;
        Ok(handle)
    }

    pub fn clear(&mut self, week: usize, day: usize, hour: usize, teacher: &str, class: &str) -> TimetableResult<()> {
        self.store.clear(week, day, hour, teacher, class)
    }

    /// Applies a patch whose written values must all be registered slots.
    pub fn apply(&mut self, update: PathUpdate) -> TimetableResult<Vec<Change>> {
        let registry = &self.registry;
        self.store.apply_checked(update, |slot| match registry.find(slot) {
            Some(_) => Ok(()),
            None => Err(TimetableError::NotFound(slot.to_string())),
        })
    }

    pub fn subscribe(
        &mut self,
        path: SchedulePath,
        observer: Rc<dyn ScheduleObserver>,
    ) -> TimetableResult<Subscription> {
        self.store.subscribe(path, observer)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        self.store.unsubscribe(subscription)
    }

    pub fn get(&self, entity: &str, week: usize, day: usize, hour: usize) -> TimetableResult<Option<Slot>> {
        self.store.get(entity, week, day, hour)
    }

    pub fn by_hour(&self, entity: &str, week: usize, hour: usize) -> TimetableResult<Vec<Option<Slot>>> {
        self.store.by_hour(entity, week, hour)
    }

    pub fn by_day(&self, entity: &str, week: usize, day: usize) -> TimetableResult<Vec<Option<Slot>>> {
        self.store.by_day(entity, week, day)
    }

    /// The week a selector tag points at.
    pub fn view(&self, selector: &Tag, week: usize) -> TimetableResult<&WeekGrid> {
        let (kind, entity) = selector
            .entity()
            .ok_or_else(|| TimetableError::UnknownEntity(selector.to_string()))?;
        if self.store.kind_of(entity) != Some(kind) {
            return Err(TimetableError::UnknownEntity(entity.to_string()));
        }
        self.store.week(entity, week)
    }
}
