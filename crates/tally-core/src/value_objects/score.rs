//! Score - the 1..=5 mark attached to a completed lesson

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of a DONE grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Score(u8);

impl Score {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    /// Get the numeric value
    #[inline]
    pub const fn value(self) -> i32 {
        self.0 as i32
    }
}

impl TryFrom<i32> for Score {
    type Error = ScoreOutOfRange;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ScoreOutOfRange(value))
        }
    }
}

impl From<Score> for i32 {
    fn from(score: Score) -> Self {
        score.value()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejected score value
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("score must be between 1 and 5, got {0}")]
pub struct ScoreOutOfRange(pub i32);
