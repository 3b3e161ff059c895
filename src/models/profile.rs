use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// RPE bounds shared by profiles, plans, and actuals.
pub const RPE_MIN: i64 = 1;
pub const RPE_MAX: i64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Kg,
    Lb,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Lb => "lb",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "lb" => Unit::Lb,
            _ => Unit::Kg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Cutting,
    #[default]
    Hypertrophy,
    Strength,
}

impl Goal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Goal::Cutting => "cutting",
            Goal::Hypertrophy => "hypertrophy",
            Goal::Strength => "strength",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "cutting" => Goal::Cutting,
            "strength" => Goal::Strength,
            _ => Goal::Hypertrophy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RpeInputMode {
    #[default]
    AllSets,
    LastSetOnly,
}

impl RpeInputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpeInputMode::AllSets => "all_sets",
            RpeInputMode::LastSetOnly => "last_set_only",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "last_set_only" => RpeInputMode::LastSetOnly,
            _ => RpeInputMode::AllSets,
        }
    }
}

/// Per-user training preferences, created lazily on first access.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub user_id: String,
    pub unit: Unit,
    pub goal: Goal,
    pub default_duration: i64,
    pub rpe_input_mode: RpeInputMode,
    pub rpe_quick_chips: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub const DEFAULT_DURATION: i64 = 30;
pub const DEFAULT_RPE_QUICK_CHIPS: &[i64] = &[3, 5, 7, 8, 9];

impl FromSqliteRow for Profile {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let unit: String = row.get("unit")?;
        let goal: String = row.get("goal")?;
        let mode: String = row.get("rpe_input_mode")?;
        let chips_json: String = row.get("rpe_quick_chips")?;
        let rpe_quick_chips = serde_json::from_str(&chips_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(Self {
            user_id: row.get("user_id")?,
            unit: Unit::parse(&unit),
            goal: Goal::parse(&goal),
            default_duration: row.get("default_duration")?,
            rpe_input_mode: RpeInputMode::parse(&mode),
            rpe_quick_chips,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfile {
    pub unit: Option<Unit>,
    pub goal: Option<Goal>,
    pub default_duration: Option<i64>,
    pub rpe_input_mode: Option<RpeInputMode>,
    pub rpe_quick_chips: Option<Vec<i64>>,
}

impl UpdateProfile {
    /// Reject out-of-range quick chips and non-positive durations before
    /// anything touches the database.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(duration) = self.default_duration {
            if duration <= 0 {
                return Err("default_duration must be positive".to_string());
            }
        }
        if let Some(chips) = &self.rpe_quick_chips {
            if chips
                .iter()
                .any(|chip| !(RPE_MIN..=RPE_MAX).contains(chip))
            {
                return Err(format!(
                    "rpe_quick_chips must be between {} and {}",
                    RPE_MIN, RPE_MAX
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_parse_roundtrip() {
        for goal in [Goal::Cutting, Goal::Hypertrophy, Goal::Strength] {
            assert_eq!(Goal::parse(goal.as_str()), goal);
        }
        assert_eq!(Goal::parse("unknown"), Goal::Hypertrophy);
    }

    #[test]
    fn test_unit_parse_roundtrip() {
        assert_eq!(Unit::parse("kg"), Unit::Kg);
        assert_eq!(Unit::parse("lb"), Unit::Lb);
        assert_eq!(Unit::parse(""), Unit::Kg);
    }

    #[test]
    fn test_update_profile_rejects_bad_chips() {
        let update = UpdateProfile {
            rpe_quick_chips: Some(vec![0, 5]),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        let update = UpdateProfile {
            rpe_quick_chips: Some(vec![11]),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_profile_rejects_bad_duration() {
        let update = UpdateProfile {
            default_duration: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_update_profile_accepts_valid() {
        let update = UpdateProfile {
            unit: Some(Unit::Lb),
            goal: Some(Goal::Strength),
            default_duration: Some(45),
            rpe_input_mode: Some(RpeInputMode::LastSetOnly),
            rpe_quick_chips: Some(vec![6, 7, 8]),
        };
        assert!(update.validate().is_ok());
    }
}
