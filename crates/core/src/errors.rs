use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("Slot not found: {0}")]
    NotFound(String),

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown week {week} for entity {entity}")]
    UnknownWeek { entity: String, week: usize },

    #[error("Coordinate out of bounds: day {day}, hour {hour}")]
    OutOfBounds { day: usize, hour: usize },

    #[error("Entity mismatch: {0}")]
    EntityMismatch(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    #[error("Invalid tag: {0}")]
    InvalidTag(String),

    #[error("Grid has {found} cells, geometry needs {expected}")]
    GridShape { expected: usize, found: usize },

    #[error("No slot handles left")]
    HandlesExhausted,
}

pub type TimetableResult<T> = Result<T, TimetableError>;
