//! Weight vectors and the conditional override cascade.
//!
//! Offensive weights are not a single table: they are a base vector plus an
//! ordered list of [`WeightStage`]s. Each stage whose [`StageCondition`] holds
//! overwrites its keys exactly, and stages apply in list order, so the last
//! matching stage wins on any key it shares with an earlier one.
//!
//! ```text
//! base ─▶ carrying > 2 ─▶ danger ≤ 2 ─▶ scared ghost visible ─▶ resolved
//! ```

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

use crate::feature::Feature;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightVector {
    values: BTreeMap<Feature, f32>,
}

impl WeightVector {
    /// Weight of `feature`, `0.0` when unset.
    #[must_use]
    pub fn get(&self, feature: Feature) -> f32 {
        self.values.get(&feature).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, feature: Feature, weight: f32) {
        self.values.insert(feature, weight);
    }

    #[must_use]
    pub fn contains(&self, feature: Feature) -> bool {
        self.values.contains_key(&feature)
    }

    /// Replaces every key present in `patch`; other keys are untouched.
    pub fn overwrite(&mut self, patch: &Self) {
        self.values
            .extend(patch.values.iter().map(|(f, w)| (*f, *w)));
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f32)> + '_ {
        self.values.iter().map(|(f, w)| (*f, *w))
    }
}

impl FromIterator<(Feature, f32)> for WeightVector {
    fn from_iter<T: IntoIterator<Item = (Feature, f32)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (feature, weight)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{feature}: {weight}")?;
        }
        f.write_str("}")
    }
}

/// Situation summary the cascade conditions are checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightContext {
    /// Pellets carried before the move.
    pub carrying: u32,
    /// Maze distance from the projected position to the nearest dangerous
    /// ghost, or the sentinel when none is visible.
    pub nearest_danger: u32,
    pub scared_ghost_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageCondition {
    CarryingAbove(u32),
    DangerWithin(u32),
    ScaredGhostVisible,
}

impl StageCondition {
    #[must_use]
    pub fn holds(self, context: &WeightContext) -> bool {
        match self {
            Self::CarryingAbove(limit) => context.carrying > limit,
            Self::DangerWithin(radius) => context.nearest_danger <= radius,
            Self::ScaredGhostVisible => context.scared_ghost_visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightStage {
    pub when: StageCondition,
    pub set: WeightVector,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSchedule {
    pub base: WeightVector,
    pub stages: Vec<WeightStage>,
}

impl WeightSchedule {
    /// Starts from `base` and applies every matching stage in order.
    #[must_use]
    pub fn resolve(&self, context: &WeightContext) -> WeightVector {
        let mut weights = self.base.clone();
        for stage in &self.stages {
            if stage.when.holds(context) {
                weights.overwrite(&stage.set);
            }
        }
        weights
    }

    /// Hand-tuned offensive schedule: forage, then return home, then escape.
    #[must_use]
    pub fn offensive() -> Self {
        use Feature::{
            Carrying, DistanceToCapsule, DistanceToFood, GhostDist, HomeDist, Looping, OnOffense,
            Reverse, Stop, SuccessorScore,
        };
        Self {
            base: [
                (SuccessorScore, 200.0),
                (DistanceToFood, -5.0),
                (GhostDist, 7.0),
                (DistanceToCapsule, 0.0),
                (Carrying, 10.0),
                (HomeDist, 0.0),
                (Stop, -100_000.0),
                (Reverse, -4.0),
                (Looping, -100_000.0),
                (OnOffense, 100.0),
            ]
            .into_iter()
            .collect(),
            stages: vec![
                WeightStage {
                    when: StageCondition::CarryingAbove(2),
                    set: [
                        (HomeDist, -10.0),
                        (DistanceToFood, 0.0),
                        (GhostDist, 10.0),
                        (OnOffense, 0.0),
                    ]
                    .into_iter()
                    .collect(),
                },
                WeightStage {
                    when: StageCondition::DangerWithin(2),
                    set: [
                        (DistanceToFood, 0.0),
                        (SuccessorScore, 0.0),
                        (GhostDist, 20.0),
                        (DistanceToCapsule, -5.0),
                        (OnOffense, 0.0),
                    ]
                    .into_iter()
                    .collect(),
                },
                WeightStage {
                    when: StageCondition::ScaredGhostVisible,
                    set: [(GhostDist, 0.0)].into_iter().collect(),
                },
            ],
        }
    }
}

/// Fixed defensive weights.
#[must_use]
pub fn defensive_weights() -> WeightVector {
    [
        (Feature::NumInvaders, -1000.0),
        (Feature::OnDefense, 100.0),
        (Feature::InvaderDistance, -10.0),
        (Feature::DistanceToPatrol, -1.5),
        (Feature::Stop, -100.0),
        (Feature::Reverse, -2.0),
    ]
    .into_iter()
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> WeightContext {
        WeightContext {
            carrying: 0,
            nearest_danger: 999,
            scared_ghost_visible: false,
        }
    }

    fn assert_weight(weights: &WeightVector, feature: Feature, expected: f32) {
        let actual = weights.get(feature);
        assert!(
            (actual - expected).abs() < f32::EPSILON,
            "{feature}: expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_base_weights_when_calm() {
        let weights = WeightSchedule::offensive().resolve(&calm());
        assert_eq!(weights, WeightSchedule::offensive().base);
    }

    #[test]
    fn test_carrying_stage_sends_home() {
        let weights = WeightSchedule::offensive().resolve(&WeightContext {
            carrying: 3,
            ..calm()
        });
        assert_weight(&weights, Feature::HomeDist, -10.0);
        assert_weight(&weights, Feature::DistanceToFood, 0.0);
        assert_weight(&weights, Feature::GhostDist, 10.0);
        assert_weight(&weights, Feature::OnOffense, 0.0);
        assert_weight(&weights, Feature::SuccessorScore, 200.0);
    }

    #[test]
    fn test_carrying_threshold_is_strict() {
        let weights = WeightSchedule::offensive().resolve(&WeightContext {
            carrying: 2,
            ..calm()
        });
        assert_weight(&weights, Feature::HomeDist, 0.0);
    }

    #[test]
    fn test_escape_overrides_return_home() {
        let weights = WeightSchedule::offensive().resolve(&WeightContext {
            carrying: 5,
            nearest_danger: 2,
            scared_ghost_visible: false,
        });
        assert_weight(&weights, Feature::SuccessorScore, 0.0);
        assert_weight(&weights, Feature::DistanceToFood, 0.0);
        assert_weight(&weights, Feature::GhostDist, 20.0);
        assert_weight(&weights, Feature::OnOffense, 0.0);
        assert_weight(&weights, Feature::DistanceToCapsule, -5.0);
        // untouched by escape, kept from the carrying stage
        assert_weight(&weights, Feature::HomeDist, -10.0);
    }

    #[test]
    fn test_scared_ghost_zeroes_ghost_weight_last() {
        let weights = WeightSchedule::offensive().resolve(&WeightContext {
            carrying: 5,
            nearest_danger: 1,
            scared_ghost_visible: true,
        });
        assert_weight(&weights, Feature::GhostDist, 0.0);
        assert_weight(&weights, Feature::DistanceToCapsule, -5.0);
    }

    #[test]
    fn test_stage_order_matters() {
        let ghost = |w: f32| -> WeightVector { [(Feature::GhostDist, w)].into_iter().collect() };
        let schedule = WeightSchedule {
            base: ghost(1.0),
            stages: vec![
                WeightStage {
                    when: StageCondition::ScaredGhostVisible,
                    set: ghost(0.0),
                },
                WeightStage {
                    when: StageCondition::DangerWithin(2),
                    set: ghost(20.0),
                },
            ],
        };
        let weights = schedule.resolve(&WeightContext {
            carrying: 0,
            nearest_danger: 1,
            scared_ghost_visible: true,
        });
        assert_weight(&weights, Feature::GhostDist, 20.0);
    }

    #[test]
    fn test_schedule_json_roundtrip_keeps_order() {
        let schedule = WeightSchedule::offensive();
        let json = serde_json::to_string(&schedule).unwrap();
        assert!(json.contains("\"carrying_above\":2"));
        assert!(json.contains("\"scared_ghost_visible\""));
        let parsed: WeightSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, schedule);
    }
}
