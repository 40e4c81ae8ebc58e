use std::fmt;

use serde::{Deserialize, Serialize};

/// One class/subject/teacher pairing occupying a timetable cell.
///
/// Equality is structural: two assignments with the same fields are the same
/// logical slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Assignment {
    pub class: String,
    pub subject: String,
    pub teacher: String,
}

impl Assignment {
    pub fn new(
        class: impl Into<String>,
        subject: impl Into<String>,
        teacher: impl Into<String>,
    ) -> Self {
        Self {
            class: class.into(),
            subject: subject.into(),
            teacher: teacher.into(),
        }
    }

    /// The key this assignment is filed under for the given kind of entity.
    pub fn key_for(&self, kind: EntityKind) -> &str {
        match kind {
            EntityKind::Class => &self.class,
            EntityKind::Teacher => &self.teacher,
        }
    }

    /// Whether this assignment may live in the timeline of `entity`.
    pub fn belongs_to(&self, kind: EntityKind, entity: &str) -> bool {
        self.key_for(kind) == entity
    }

    /// Cell text as shown on a teacher's timetable, e.g. `English to b2`.
    pub fn teacher_label(&self) -> String {
        format!("{} to {}", self.subject, self.class)
    }

    /// Cell text as shown on a class's timetable, e.g. `English with Bob`.
    pub fn class_label(&self) -> String {
        format!("{} with {}", self.subject, self.teacher)
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.subject, self.class, self.teacher)
    }
}

/// Interned identity of a registered [`Assignment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotHandle(pub u32);

impl fmt::Display for SlotHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The two disjoint namespaces a timeline can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Teacher,
    Class,
}

impl EntityKind {
    /// The namespace holding the other side of a placement.
    pub fn counterpart(self) -> Self {
        match self {
            Self::Teacher => Self::Class,
            Self::Class => Self::Teacher,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => f.write_str("teacher"),
            Self::Class => f.write_str("class"),
        }
    }
}
