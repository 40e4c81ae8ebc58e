//! # Slot Registry
//!
//! Interns [`Assignment`] values and hands out stable [`SlotHandle`]s. The
//! registry keeps two separately typed maps, value to handle and handle to
//! value, which are always mutual inverses.

use std::{collections::HashMap, sync::Arc};

use timetable_core::{
    errors::{TimetableError, TimetableResult},
    models::assignment::{Assignment, SlotHandle},
};

/// Shared, immutable assignment as stored in grids and the registry.
pub type Slot = Arc<Assignment>;

#[derive(Debug)]
pub struct SlotRegistry {
    handles: HashMap<Slot, SlotHandle>,
    values: HashMap<SlotHandle, Slot>,
    // None once every handle has been issued
    next_handle: Option<u32>,
}

impl Default for SlotRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::starting_at(SlotHandle(0))
    }

    /// An empty registry whose first handle is `first`, for continuing the
    /// numbering of handles issued earlier.
    pub fn starting_at(first: SlotHandle) -> Self {
        Self {
            handles: HashMap::new(),
            values: HashMap::new(),
            next_handle: Some(first.0),
        }
    }

    /// Returns the handle for `value`, allocating a fresh one on first sight.
    ///
    /// Handles are allocated in increasing order and are not reused, so the
    /// registry fails with `HandlesExhausted` once the last one is issued.
    pub fn register(&mut self, value: Assignment) -> TimetableResult<SlotHandle> {
        if let Some(&handle) = self.handles.get(&value) {
            return Ok(handle);
        }

        let handle = self
            .next_handle
            .map(SlotHandle)
            .ok_or(TimetableError::HandlesExhausted)?;
        self.next_handle = handle.0.checked_add(1);

        let slot = Arc::new(value);
        self.handles.insert(Arc::clone(&slot), handle);
        self.values.insert(handle, slot);
        tracing::debug!("Registered slot {}", handle);

        Ok(handle)
    }

    /// Removes `handle` and its value, returning the value.
    pub fn unregister(&mut self, handle: SlotHandle) -> TimetableResult<Slot> {
        let slot = self
            .values
            .remove(&handle)
            .ok_or_else(|| TimetableError::NotFound(handle.to_string()))?;
        self.handles.remove(&slot);
        tracing::debug!("Unregistered slot {}: {}", handle, slot);

        Ok(slot)
    }

    pub fn resolve(&self, handle: SlotHandle) -> TimetableResult<Slot> {
        self.values
            .get(&handle)
            .cloned()
            .ok_or_else(|| TimetableError::NotFound(handle.to_string()))
    }

    pub fn find(&self, value: &Assignment) -> Option<SlotHandle> {
        self.handles.get(value).copied()
    }

    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.values.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// All registered slots, ordered by handle.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &Slot)> {
        let mut entries: Vec<_> = self.values.iter().map(|(&h, slot)| (h, slot)).collect();
        entries.sort_by_key(|(handle, _)| *handle);
        entries.into_iter()
    }
}
