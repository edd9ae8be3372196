use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder shown when a schedule is submitted without a name
pub const UNTITLED_SCHEDULE_NAME: &str = "（名称未設定）";

/// Maximum length (in characters) of schedule and candidate names
pub const MAX_NAME_CHARS: usize = 255;

/// User model, keyed by the external identity provider's id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
}

/// Schedule (poll) model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub schedule_id: Uuid,
    pub schedule_name: String,
    pub memo: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// One proposed date line of a schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: i32,
    pub candidate_name: String,
    pub schedule_id: Uuid,
}

/// Availability answer for a single candidate.
///
/// Stored as an integer column; a missing answer reads as `Unavailable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityKind {
    #[default]
    Unavailable,
    Undecided,
    Available,
}

impl AvailabilityKind {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Unavailable => 0,
            Self::Undecided => 1,
            Self::Available => 2,
        }
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Unavailable),
            1 => Some(Self::Undecided),
            2 => Some(Self::Available),
            _ => None,
        }
    }

    /// Short label rendered in the availability grid
    pub fn label(self) -> &'static str {
        match self {
            Self::Unavailable => "欠",
            Self::Undecided => "？",
            Self::Available => "出",
        }
    }
}

/// Availability of one user for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub candidate_id: i32,
    pub user_id: i64,
    pub availability: AvailabilityKind,
    pub schedule_id: Uuid,
}

/// Availability joined with the user who answered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityEntry {
    pub candidate_id: i32,
    pub user: User,
    pub availability: AvailabilityKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_kind_round_trips_through_column_value() {
        for kind in [
            AvailabilityKind::Unavailable,
            AvailabilityKind::Undecided,
            AvailabilityKind::Available,
        ] {
            assert_eq!(AvailabilityKind::from_i32(kind.as_i32()), Some(kind));
        }
        assert_eq!(AvailabilityKind::from_i32(3), None);
        assert_eq!(AvailabilityKind::from_i32(-1), None);
    }

    #[test]
    fn missing_answer_defaults_to_unavailable() {
        assert_eq!(AvailabilityKind::default(), AvailabilityKind::Unavailable);
    }
}
