//! Feature vocabulary and sparse feature vectors.
//!
//! A [`FeatureVector`] maps [`Feature`] keys to values. Keys that were never
//! set read as `0.0`, and only present keys take part in
//! [`FeatureVector::dot`].

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::weights::WeightVector;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    SuccessorScore,
    DistanceToFood,
    GhostDist,
    DistanceToCapsule,
    Carrying,
    HomeDist,
    Stop,
    Reverse,
    OnOffense,
    Looping,
    OnDefense,
    NumInvaders,
    InvaderDistance,
    DistanceToPatrol,
}

impl Feature {
    pub const OFFENSIVE: [Self; 10] = [
        Self::SuccessorScore,
        Self::DistanceToFood,
        Self::GhostDist,
        Self::DistanceToCapsule,
        Self::Carrying,
        Self::HomeDist,
        Self::Stop,
        Self::Reverse,
        Self::OnOffense,
        Self::Looping,
    ];

    pub const DEFENSIVE: [Self; 6] = [
        Self::OnDefense,
        Self::NumInvaders,
        Self::InvaderDistance,
        Self::DistanceToPatrol,
        Self::Stop,
        Self::Reverse,
    ];

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::SuccessorScore => "successor_score",
            Self::DistanceToFood => "distance_to_food",
            Self::GhostDist => "ghost_dist",
            Self::DistanceToCapsule => "distance_to_capsule",
            Self::Carrying => "carrying",
            Self::HomeDist => "home_dist",
            Self::Stop => "stop",
            Self::Reverse => "reverse",
            Self::OnOffense => "on_offense",
            Self::Looping => "looping",
            Self::OnDefense => "on_defense",
            Self::NumInvaders => "num_invaders",
            Self::InvaderDistance => "invader_distance",
            Self::DistanceToPatrol => "distance_to_patrol",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    values: BTreeMap<Feature, f32>,
}

impl FeatureVector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, feature: Feature, value: f32) {
        self.values.insert(feature, value);
    }

    /// Sets `feature` to `1.0` when `flag` holds; leaves it absent otherwise.
    pub fn flag(&mut self, feature: Feature, flag: bool) {
        if flag {
            self.set(feature, 1.0);
        }
    }

    #[must_use]
    pub fn get(&self, feature: Feature) -> f32 {
        self.values.get(&feature).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.values.contains_key(&feature)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f32)> + '_ {
        self.values.iter().map(|(f, v)| (*f, *v))
    }

    /// Weighted sum over the features present in `self`.
    #[must_use]
    pub fn dot(&self, weights: &WeightVector) -> f32 {
        self.iter().map(|(f, v)| v * weights.get(f)).sum()
    }
}

impl FromIterator<(Feature, f32)> for FeatureVector {
    fn from_iter<T: IntoIterator<Item = (Feature, f32)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for FeatureVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (feature, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{feature}: {value}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_feature_reads_zero() {
        let features = FeatureVector::new();
        assert!(!features.contains(Feature::Looping));
        assert!(features.get(Feature::Looping).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dot_ignores_weights_without_feature() {
        let features: FeatureVector = [(Feature::GhostDist, 3.0), (Feature::Stop, 1.0)]
            .into_iter()
            .collect();
        let weights: WeightVector = [
            (Feature::GhostDist, 2.0),
            (Feature::Stop, -10.0),
            (Feature::Looping, -1000.0),
        ]
        .into_iter()
        .collect();
        assert!((features.dot(&weights) - (-4.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn test_feature_without_weight_contributes_nothing() {
        let features: FeatureVector = [(Feature::Carrying, 5.0)].into_iter().collect();
        assert!(features.dot(&WeightVector::default()).abs() < f32::EPSILON);
    }

    #[test]
    fn test_flag_leaves_false_absent() {
        let mut features = FeatureVector::new();
        features.flag(Feature::Stop, false);
        features.flag(Feature::Reverse, true);
        assert!(!features.contains(Feature::Stop));
        assert!((features.get(Feature::Reverse) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_ids_match_serde_names() {
        for feature in Feature::OFFENSIVE.into_iter().chain(Feature::DEFENSIVE) {
            let json = serde_json::to_string(&feature).unwrap();
            assert_eq!(json, format!("\"{}\"", feature.id()));
        }
    }
}
