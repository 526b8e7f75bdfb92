//! Enumeration types shared across the Ascension workspace.

use serde::{Deserialize, Serialize};

/// Gender of an avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Male avatar.
    Male,
    /// Female avatar.
    Female,
}

impl Gender {
    /// Both genders, for uniform random choice.
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];
}

/// The cause of an avatar's death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Health fell to zero or below.
    SeriousInjury,
    /// Age reached the avatar's lifespan.
    OldAge,
    /// Killed in combat during an action.
    Battle,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::SeriousInjury => write!(f, "succumbed to serious injuries"),
            Self::OldAge => write!(f, "passed away of old age"),
            Self::Battle => write!(f, "fell in battle"),
        }
    }
}

/// Predefined tags attached to metric snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricTag {
    /// Broke through to a new cultivation level.
    Breakthrough,
    /// Took damage.
    Injured,
    /// Recovered from injury.
    Recovered,
    /// Joined a sect.
    SectJoin,
    /// Left a sect.
    SectLeave,
    /// Learned a technique.
    TechniqueLearn,
    /// Died.
    Death,
    /// Fought a battle.
    Battle,
    /// Explored a dungeon.
    Dungeon,
}

impl MetricTag {
    /// Return the stable string form used in saves.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breakthrough => "breakthrough",
            Self::Injured => "injured",
            Self::Recovered => "recovered",
            Self::SectJoin => "sect_join",
            Self::SectLeave => "sect_leave",
            Self::TechniqueLearn => "technique_learn",
            Self::Death => "death",
            Self::Battle => "battle",
            Self::Dungeon => "dungeon",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn metric_tags_serialize_to_their_string_form() {
        for tag in [
            MetricTag::Breakthrough,
            MetricTag::Injured,
            MetricTag::Recovered,
            MetricTag::SectJoin,
            MetricTag::SectLeave,
            MetricTag::TechniqueLearn,
            MetricTag::Death,
            MetricTag::Battle,
            MetricTag::Dungeon,
        ] {
            let json = serde_json::to_string(&tag).unwrap();
            assert_eq!(json, format!("\"{}\"", tag.as_str()));
        }
    }

    #[test]
    fn death_cause_reads_as_a_phrase() {
        assert_eq!(DeathCause::OldAge.to_string(), "passed away of old age");
    }
}
