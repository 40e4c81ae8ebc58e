use mockall::mock;

use crate::{observer::ScheduleObserver, path::Change};

// Mock observer for asserting change notifications in tests
mock! {
    pub Observer {}

    impl ScheduleObserver for Observer {
        fn on_change(&self, change: &Change);
    }
}
