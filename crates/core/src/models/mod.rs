pub mod assignment;
pub mod calendar;
pub mod tags;
