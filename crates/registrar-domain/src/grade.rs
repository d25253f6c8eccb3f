//! Letter grades derived from enrollment marks.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Valid marks, inclusive on both ends.
pub const MARKS_RANGE: RangeInclusive<i32> = 0..=100;

/// Letter grade band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    F,
}

/// Returned when a stored grade string is not a known band.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {0}")]
pub struct UnknownGrade(pub String);

impl Grade {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "F" => Ok(Self::F),
            other => Err(UnknownGrade(other.to_owned())),
        }
    }
}

/// Map marks to a grade band. `None` marks mean the enrollment is ungraded.
///
/// Total over any `i32`; range checking belongs to input validation
/// ([`marks_in_range`]), not here.
pub fn compute_grade(marks: Option<i32>) -> Option<Grade> {
    let marks = marks?;
    let grade = if marks >= 85 {
        Grade::A
    } else if marks >= 70 {
        Grade::B
    } else if marks >= 50 {
        Grade::C
    } else {
        Grade::F
    };
    Some(grade)
}

/// `true` if `marks` is absent or within [`MARKS_RANGE`].
pub fn marks_in_range(marks: Option<i32>) -> bool {
    marks.is_none_or(|m| MARKS_RANGE.contains(&m))
}
