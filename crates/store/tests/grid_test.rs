use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, to_string};
use timetable_core::{
    errors::TimetableError,
    models::{
        assignment::{Assignment, EntityKind},
        calendar::Geometry,
    },
};
use timetable_store::{EntityTimeline, Slot, WeekGrid};

fn english() -> Slot {
    Arc::new(Assignment::new("b2", "English", "Bob"))
}

#[test]
fn test_new_grid_is_empty() {
    let grid: WeekGrid = WeekGrid::new(Geometry::default());

    assert!(grid.is_empty());
    assert_eq!(grid.iter().count(), 60);
}

#[test]
fn test_set_and_get() {
    let mut grid = WeekGrid::new(Geometry::default());

    assert_eq!(grid.set(2, 6, Some(english())).unwrap(), None);
    assert_eq!(grid.get(2, 6).unwrap(), Some(&english()));
    assert_eq!(grid.set(2, 6, None).unwrap(), Some(english()));
    assert!(grid.is_empty());
}

#[rstest]
#[case(6, 0)]
#[case(0, 10)]
fn test_out_of_bounds(#[case] day: usize, #[case] hour: usize) {
    let mut grid: WeekGrid = WeekGrid::new(Geometry::default());
    let expected = TimetableError::OutOfBounds { day, hour };

    assert_eq!(grid.get(day, hour), Err(expected.clone()));
    assert_eq!(grid.set(day, hour, None), Err(expected));
}

#[test]
fn test_row_and_day_views_follow_writes() {
    let mut grid = WeekGrid::new(Geometry::default());
    grid.set(3, 4, Some(english())).unwrap();

    let row = grid.row(4).unwrap();
    assert_eq!(row.len(), 6);
    assert_eq!(row[3], Some(&english()));
    assert_eq!(row.iter().filter(|cell| cell.is_some()).count(), 1);

    let day = grid.day_slice(3).unwrap();
    assert_eq!(day.len(), 10);
    assert_eq!(day[4], Some(english()));

    grid.set(3, 4, None).unwrap();
    assert_eq!(grid.row(4).unwrap()[3], None);
    assert_eq!(grid.day_slice(3).unwrap()[4], None);
}

#[test]
fn test_views_out_of_bounds() {
    let grid: WeekGrid = WeekGrid::new(Geometry::default());

    assert!(grid.row(10).is_err());
    assert!(grid.day_slice(6).is_err());
}

#[test]
fn test_row_matches_get_for_every_cell() {
    let geometry = Geometry::default();
    let mut grid = WeekGrid::new(geometry);
    for day in 0..geometry.days {
        grid.set(day, day, Some(day * 100)).unwrap();
    }

    for hour in 0..geometry.hours_per_day {
        let row = grid.row(hour).unwrap();
        for day in 0..geometry.days {
            assert_eq!(row[day], grid.get(day, hour).unwrap());
        }
    }
}

#[test]
fn test_map_passes_coordinates_and_keeps_source() {
    let mut grid = WeekGrid::new(Geometry::new(2, 3));
    grid.set(1, 2, Some(english())).unwrap();

    let mapped = grid.map(|cell, day, hour| match cell {
        Some(_) => None,
        None => Some((day, hour)),
    });

    assert_eq!(mapped.get(1, 2).unwrap(), None);
    assert_eq!(mapped.get(1, 1).unwrap(), Some(&(1, 1)));
    assert_eq!(mapped.get(0, 2).unwrap(), Some(&(0, 2)));
    assert_eq!(grid.get(1, 2).unwrap(), Some(&english()));
}

#[test]
fn test_map_shares_untouched_cells() {
    let slot = english();
    let mut grid = WeekGrid::new(Geometry::default());
    grid.set(0, 0, Some(Arc::clone(&slot))).unwrap();

    let copy = grid.map(|cell, _, _| cell.cloned());

    assert!(Arc::ptr_eq(copy.get(0, 0).unwrap().unwrap(), &slot));
}

#[test]
fn test_change_is_all_or_nothing() {
    let grid: WeekGrid<u32> = WeekGrid::new(Geometry::default());

    let changed = grid.change(&[(0, 0, Some(1)), (5, 9, Some(2))]).unwrap();
    assert_eq!(changed.get(5, 9).unwrap(), Some(&2));
    assert!(grid.is_empty());

    assert_eq!(
        grid.change(&[(0, 0, Some(1)), (6, 0, Some(2))]),
        Err(TimetableError::OutOfBounds { day: 6, hour: 0 })
    );
}

#[test]
fn test_positions() {
    let mut grid = WeekGrid::new(Geometry::default());
    grid.set(2, 6, Some(english())).unwrap();
    grid.set(2, 5, Some(english())).unwrap();

    assert_eq!(grid.positions(&english()), vec![(2, 5), (2, 6)]);
}

#[test]
fn test_grid_serialization() {
    let mut grid = WeekGrid::new(Geometry::new(1, 2));
    grid.set(0, 1, Some(english())).unwrap();

    let json = to_string(&grid).expect("Failed to serialize grid");
    let deserialized: WeekGrid = from_str(&json).expect("Failed to deserialize grid");

    assert_eq!(deserialized, grid);
}

#[rstest]
#[case(r#"{"geometry":{"days":6,"hours_per_day":10},"cells":[null]}"#)]
#[case(r#"{"geometry":{"days":1,"hours_per_day":1},"cells":[null,null]}"#)]
fn test_grid_with_wrong_cell_count_is_rejected(#[case] json: &str) {
    let result = from_str::<WeekGrid<u32>>(json);

    let message = result.expect_err("Grid should be rejected").to_string();
    assert!(message.starts_with("Grid has"), "{}", message);
}

#[test]
fn test_timeline_weeks() {
    let timeline = EntityTimeline::new("Bob", EntityKind::Teacher, Geometry::default(), 3);

    assert_eq!(timeline.name(), "Bob");
    assert_eq!(timeline.kind(), EntityKind::Teacher);
    assert_eq!(timeline.len(), 3);
    assert!(timeline.week(2).unwrap().is_empty());
    assert_eq!(
        timeline.week(3),
        Err(TimetableError::UnknownWeek {
            entity: "Bob".to_string(),
            week: 3
        })
    );
}
