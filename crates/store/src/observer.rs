//! # Observers
//!
//! Dependents register interest in a [`SchedulePath`] and are told about a
//! [`Change`] only when it touches a cell inside that path. Changes are
//! delivered in the order they were committed.

use std::{fmt, rc::Rc};

use crate::path::{Change, SchedulePath};

pub trait ScheduleObserver {
    fn on_change(&self, change: &Change);
}

/// Wraps a closure as an observer.
pub fn observer_fn<F>(f: F) -> Rc<dyn ScheduleObserver>
where
    F: Fn(&Change) + 'static,
{
    Rc::new(FnObserver(f))
}

struct FnObserver<F>(F);

impl<F: Fn(&Change)> ScheduleObserver for FnObserver<F> {
    fn on_change(&self, change: &Change) {
        (self.0)(change)
    }
}

/// Token returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

struct Entry {
    subscription: Subscription,
    path: SchedulePath,
    observer: Rc<dyn ScheduleObserver>,
}

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    entries: Vec<Entry>,
}

impl Observers {
    pub(crate) fn subscribe(
        &mut self,
        path: SchedulePath,
        observer: Rc<dyn ScheduleObserver>,
    ) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            subscription,
            path,
            observer,
        });
        subscription
    }

    pub(crate) fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|entry| entry.subscription != subscription);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn dispatch(&self, changes: &[Change]) {
        for change in changes {
            for entry in &self.entries {
                if change.touches(&entry.path) {
                    entry.observer.on_change(change);
                }
            }
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| (&entry.subscription, &entry.path)))
            .finish()
    }
}
