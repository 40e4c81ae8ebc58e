use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::{fixture, rstest};
use timetable_core::{
    config::TimetableConfig,
    errors::TimetableError,
    models::{
        assignment::{Assignment, SlotHandle},
        tags::Tag,
    },
};
use timetable_store::{PathUpdate, SchedulePath, Timetable, availability::cell_options};

#[fixture]
fn timetable() -> Timetable {
    Timetable::from_config(&TimetableConfig::default()).expect("Failed to build timetable")
}

fn english_b2() -> Assignment {
    Assignment::new("b2", "English", "Bob")
}

#[test_log::test]
fn test_register_place_clear_scenario() {
    let mut timetable = timetable();
    let handle = timetable.register(english_b2()).unwrap();

    timetable.place(0, 2, 6, handle).unwrap();
    assert_eq!(*timetable.get("b2", 0, 2, 6).unwrap().unwrap(), english_b2());
    assert_eq!(*timetable.get("Bob", 0, 2, 6).unwrap().unwrap(), english_b2());

    timetable.clear(0, 2, 6, "Bob", "b2").unwrap();
    assert_eq!(timetable.get("b2", 0, 2, 6).unwrap(), None);
    assert_eq!(timetable.get("Bob", 0, 2, 6).unwrap(), None);
}

#[rstest]
fn test_register_requires_known_entities(mut timetable: Timetable) {
    assert_eq!(
        timetable.register(Assignment::new("zz", "English", "Bob")),
        Err(TimetableError::UnknownEntity("zz".to_string()))
    );
    assert_eq!(
        timetable.register(Assignment::new("b2", "English", "a1")),
        Err(TimetableError::UnknownEntity("a1".to_string()))
    );
    assert!(timetable.registry().is_empty());
}

#[rstest]
fn test_place_unknown_handle(mut timetable: Timetable) {
    assert_eq!(
        timetable.place(0, 0, 0, SlotHandle(9)),
        Err(TimetableError::NotFound("#9".to_string()))
    );
}

#[test_log::test]
fn test_unregister_clears_every_placement() {
    let mut timetable = timetable();
    let handle = timetable.place_assignment(0, 2, 6, english_b2()).unwrap();
    timetable.place(0, 2, 5, handle).unwrap();

    let removed = timetable.unregister(handle).unwrap();

    assert_eq!(*removed, english_b2());
    assert_eq!(timetable.find(&english_b2()), None);
    for entity in ["b2", "Bob"] {
        assert!(timetable.store().week(entity, 0).unwrap().is_empty());
    }
    assert_eq!(
        timetable.unregister(handle),
        Err(TimetableError::NotFound(handle.to_string()))
    );
}

#[rstest]
fn test_place_assignment_reuses_handle(mut timetable: Timetable) {
    let first = timetable.place_assignment(0, 0, 0, english_b2()).unwrap();
    let second = timetable.place_assignment(0, 0, 1, english_b2()).unwrap();

    assert_eq!(first, second);
    assert_eq!(timetable.registry().len(), 1);
}

#[rstest]
fn test_slots_for_entity(mut timetable: Timetable) {
    let english = timetable.register(english_b2()).unwrap();
    let maths = timetable
        .register(Assignment::new("a1", "Maths", "Bob"))
        .unwrap();
    timetable
        .register(Assignment::new("c2", "Hebrew", "Alice"))
        .unwrap();

    let handles: Vec<SlotHandle> = timetable
        .slots_for("Bob")
        .into_iter()
        .map(|(handle, _)| handle)
        .collect();

    assert_eq!(handles, vec![english, maths]);
    assert_eq!(timetable.slots_for("b2").len(), 1);
    assert!(timetable.slots_for("Charly").is_empty());
}

#[rstest]
fn test_view_by_selector(mut timetable: Timetable) {
    timetable.place_assignment(0, 1, 1, english_b2()).unwrap();

    let by_teacher = timetable.view(&Tag::Teacher("Bob".to_string()), 0).unwrap();
    let by_class = timetable.view(&"cls:b2".parse().unwrap(), 0).unwrap();

    assert_eq!(by_teacher, by_class);
    assert_eq!(
        timetable.view(&Tag::Teacher("b2".to_string()), 0),
        Err(TimetableError::UnknownEntity("b2".to_string()))
    );
    assert!(timetable.view(&Tag::Subject("Maths".to_string()), 0).is_err());
}

#[rstest]
fn test_static_configuration_is_exposed(timetable: Timetable) {
    assert_eq!(timetable.teachers(), ["Alice", "Bob", "Charly"]);
    assert_eq!(timetable.classes(), ["a1", "b1", "b2", "c2"]);
    assert_eq!(timetable.subjects(), ["English", "Hebrew", "Maths"]);
    assert_eq!(timetable.calendar().day_label(2), Some("Tuesday"));
    assert_eq!(timetable.calendar().time_slots().len(), 10);
}

#[test]
fn test_from_invalid_config() {
    let config = TimetableConfig {
        weeks: 0,
        ..TimetableConfig::default()
    };

    assert!(Timetable::from_config(&config).is_err());
}

#[rstest]
fn test_cell_options(mut timetable: Timetable) {
    let english = timetable.register(english_b2()).unwrap();
    let maths = timetable
        .register(Assignment::new("b2", "Maths", "Alice"))
        .unwrap();
    let hebrew = timetable
        .register(Assignment::new("b2", "Hebrew", "Charly"))
        .unwrap();
    timetable
        .register(Assignment::new("a1", "Maths", "Charly"))
        .unwrap();

    // b2 has English at the cell; Charly teaches a1 at the same time
    timetable.place(0, 2, 6, english).unwrap();
    timetable
        .place_assignment(0, 2, 6, Assignment::new("a1", "Maths", "Charly"))
        .unwrap();

    let options = cell_options(&timetable, "b2", 0, 2, 6).unwrap();

    assert_eq!(options.current.as_deref(), Some(&english_b2()));
    let available: Vec<SlotHandle> = options.available.iter().map(|(h, _)| *h).collect();
    let unavailable: Vec<SlotHandle> = options.unavailable.iter().map(|(h, _)| *h).collect();
    assert_eq!(available, vec![english, maths]);
    assert_eq!(unavailable, vec![hebrew]);
    assert_eq!(options.free_teachers, vec!["Alice".to_string()]);
}

#[rstest]
fn test_cell_options_for_empty_cell(mut timetable: Timetable) {
    timetable.register(english_b2()).unwrap();

    let options = cell_options(&timetable, "b2", 0, 0, 0).unwrap();

    assert_eq!(options.current, None);
    assert_eq!(options.available.len(), 1);
    assert!(options.unavailable.is_empty());
    assert_eq!(options.free_teachers, vec!["Alice", "Bob", "Charly"]);
}

#[rstest]
fn test_cell_options_requires_a_class(timetable: Timetable) {
    assert_eq!(
        cell_options(&timetable, "Bob", 0, 0, 0),
        Err(TimetableError::UnknownEntity("Bob".to_string()))
    );
}

#[rstest]
fn test_apply_rejects_unregistered_assignment(mut timetable: Timetable) {
    let maths = Assignment::new("b2", "Maths", "Bob");

    let result = timetable.apply(PathUpdate::set(
        SchedulePath::cell("b2", 0, 1, 1),
        Some(Arc::new(maths.clone())),
    ));

    assert_eq!(result, Err(TimetableError::NotFound(maths.to_string())));
    assert_eq!(timetable.get("b2", 0, 1, 1).unwrap(), None);
    assert_eq!(timetable.get("Bob", 0, 1, 1).unwrap(), None);
    assert!(timetable.registry().is_empty());
}

#[rstest]
fn test_apply_rejects_transform_producing_unregistered_assignment(mut timetable: Timetable) {
    timetable.register(english_b2()).unwrap();
    let maths: Arc<Assignment> = Arc::new(Assignment::new("b2", "Maths", "Bob"));

    let result = timetable.apply(PathUpdate::transform(
        SchedulePath::week("b2", 0),
        move |_, day, hour| (day == 0 && hour == 0).then(|| Arc::clone(&maths)),
    ));

    assert!(matches!(result, Err(TimetableError::NotFound(_))));
    assert!(timetable.store().week("b2", 0).unwrap().is_empty());
}

#[rstest]
fn test_apply_accepts_registered_assignment(mut timetable: Timetable) {
    let handle = timetable.register(english_b2()).unwrap();
    let slot = timetable.resolve(handle).unwrap();

    let changes = timetable
        .apply(PathUpdate::set(SchedulePath::cell("Bob", 0, 1, 1), Some(slot)))
        .unwrap();
    assert_eq!(changes.len(), 2);
    assert_eq!(*timetable.get("b2", 0, 1, 1).unwrap().unwrap(), english_b2());

    timetable.unregister(handle).unwrap();
    assert_eq!(timetable.get("b2", 0, 1, 1).unwrap(), None);
    assert_eq!(timetable.get("Bob", 0, 1, 1).unwrap(), None);
}
