use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::TimetableError,
    models::assignment::EntityKind,
};

const NONE_TAG: &str = "none";
const TEACHER_TAG: &str = "teach";
const CLASS_TAG: &str = "cls";
const SUBJECT_TAG: &str = "subj";

/// A namespaced name, used by renderers as a selector value.
///
/// The textual form is `<tag>:<value>`, e.g. `teach:Alice` or `cls:b2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Tag {
    None(String),
    Teacher(String),
    Class(String),
    Subject(String),
}

impl Tag {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::None(_) => NONE_TAG,
            Self::Teacher(_) => TEACHER_TAG,
            Self::Class(_) => CLASS_TAG,
            Self::Subject(_) => SUBJECT_TAG,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::None(value) | Self::Teacher(value) | Self::Class(value) | Self::Subject(value) => {
                value
            }
        }
    }

    /// The timeline this tag selects, if it names a teacher or a class.
    pub fn entity(&self) -> Option<(EntityKind, &str)> {
        match self {
            Self::Teacher(name) => Some((EntityKind::Teacher, name)),
            Self::Class(name) => Some((EntityKind::Class, name)),
            Self::None(_) | Self::Subject(_) => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None(_))
    }
}

impl From<(EntityKind, &str)> for Tag {
    fn from((kind, name): (EntityKind, &str)) -> Self {
        match kind {
            EntityKind::Teacher => Self::Teacher(name.to_string()),
            EntityKind::Class => Self::Class(name.to_string()),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix(), self.value())
    }
}

impl FromStr for Tag {
    type Err = TimetableError;

    fn from_str(tagged: &str) -> Result<Self, Self::Err> {
        let (prefix, value) = tagged
            .split_once(':')
            .ok_or_else(|| TimetableError::InvalidTag(tagged.to_string()))?;
        let value = value.to_string();

        match prefix {
            NONE_TAG => Ok(Self::None(value)),
            TEACHER_TAG => Ok(Self::Teacher(value)),
            CLASS_TAG => Ok(Self::Class(value)),
            SUBJECT_TAG => Ok(Self::Subject(value)),
            _ => Err(TimetableError::InvalidTag(tagged.to_string())),
        }
    }
}
