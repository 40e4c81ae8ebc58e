use color_eyre::eyre::Result;
use dotenv::dotenv;
use timetable_core::{config::TimetableConfig, models::assignment::Assignment};
use timetable_store::Timetable;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = TimetableConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut timetable = Timetable::from_config(&config)?;

    // Sample placement so the printed tables are not all blank
    let sample = Assignment::new("b2", "English", "Bob");
    let placed = timetable.register(sample).and_then(|handle| {
        timetable.place(0, 2, 6, handle)?;
        timetable.place(0, 2, 5, handle)
    });
    if let Err(e) = placed {
        warn!("Skipping sample placement: {}", e);
    }

    for entity in timetable.teachers().iter().chain(timetable.classes()) {
        print_week(&timetable, entity, 0)?;
    }

    if let Some(teacher) = timetable.teachers().first() {
        let snapshot = serde_json::to_string(timetable.store().timeline(teacher)?)?;
        info!("Timeline snapshot for {}: {}", teacher, snapshot);
    }

    Ok(())
}

fn print_week(timetable: &Timetable, entity: &str, week: usize) -> Result<()> {
    let is_teacher = timetable.teachers().iter().any(|t| t == entity);
    let calendar = timetable.calendar();

    println!("== {} (week {})", entity, week + 1);
    println!("{:<16}{}", "", calendar.day_labels().join(" | "));
    for slot in calendar.time_slots() {
        let cells: Vec<String> = timetable
            .by_hour(entity, week, slot.hour)?
            .into_iter()
            .map(|cell| match cell {
                Some(a) if is_teacher => a.teacher_label(),
                Some(a) => a.class_label(),
                None => "-".to_string(),
            })
            .collect();
        println!("{:>2} {:<13}{}", slot.number(), slot.label(), cells.join(" | "));
    }

    Ok(())
}
