//! Per-month state snapshots used to track an avatar's growth trajectory.
//!
//! Snapshots are lightweight, immutable once recorded, and optional: only
//! avatars with metrics tracking enabled produce them.

use serde::{Deserialize, Serialize};

use crate::calendar::MonthStamp;
use crate::enums::MetricTag;

/// A snapshot of one avatar's key indicators at the end of a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarMetrics {
    /// Month the snapshot was taken.
    pub timestamp: MonthStamp,
    /// Age in whole years.
    pub age_years: u32,
    /// Cultivation level.
    pub cultivation_level: u32,
    /// Progress toward the next level.
    pub cultivation_progress: u32,
    /// Current health; may be negative after lethal damage.
    pub hp: i32,
    /// Maximum health.
    pub hp_max: i32,
    /// Spirit stones held.
    pub spirit_stones: u64,
    /// Number of established relations.
    pub relations_count: u32,
    /// Number of regions the avatar knows about.
    pub known_regions_count: u32,
    /// Notable things that happened since the previous snapshot.
    pub tags: Vec<MetricTag>,
}

impl AvatarMetrics {
    /// Convert to a serializable value for saves.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if conversion fails.
    pub fn to_save_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Rebuild a snapshot from a save value.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error if the value is malformed.
    pub fn from_save_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Whether the snapshot carries the given tag.
    pub fn has_tag(&self, tag: MetricTag) -> bool {
        self.tags.contains(&tag)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample() -> AvatarMetrics {
        AvatarMetrics {
            timestamp: MonthStamp::new(200),
            age_years: 30,
            cultivation_level: 10,
            cultivation_progress: 500,
            hp: 150,
            hp_max: 200,
            spirit_stones: 1000,
            relations_count: 5,
            known_regions_count: 10,
            tags: vec![MetricTag::Injured, MetricTag::Battle],
        }
    }

    #[test]
    fn save_value_uses_tag_strings() {
        let value = sample().to_save_value().unwrap();
        assert_eq!(value["age_years"], 30);
        assert_eq!(value["timestamp"], 200);
        let tags = value["tags"].as_array().unwrap();
        assert!(tags.iter().any(|t| t == "injured"));
        assert!(tags.iter().any(|t| t == "battle"));
    }

    #[test]
    fn restores_from_save_value() {
        let original = sample();
        let restored = AvatarMetrics::from_save_value(original.to_save_value().unwrap()).unwrap();
        assert_eq!(restored, original);
        assert!(restored.has_tag(MetricTag::Battle));
        assert!(!restored.has_tag(MetricTag::Death));
    }
}
