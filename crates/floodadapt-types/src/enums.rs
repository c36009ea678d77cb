//! Enumeration types for the flood adaptation simulation.

use serde::{Deserialize, Serialize};

/// The protective measure a household has adopted.
///
/// `NoAction` is the initial (unadapted) state. Every other variant is
/// terminal: a household moves out of `NoAction` at most once and never
/// returns. The discriminants are stable and used as the numeric code of
/// the action in summaries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AdaptationAction {
    /// The household has not adapted yet.
    #[default]
    NoAction = 0,
    /// Temporary or permanent barrier keeping water away from the house.
    FloodBarrier = 1,
    /// Structural changes to the building (elevation, sealing, reinforcement).
    StructuralMeasures = 2,
    /// Moving valuables and living space away from flood-exposed floors.
    AdaptiveBuildingUse = 3,
    /// Insurance cover against flood losses.
    FloodInsurance = 4,
}

impl AdaptationAction {
    /// The four adoptable measures, in code order.
    pub const MEASURES: [Self; 4] = [
        Self::FloodBarrier,
        Self::StructuralMeasures,
        Self::AdaptiveBuildingUse,
        Self::FloodInsurance,
    ];

    /// Numeric code of the action (`0` for `NoAction`, `1..=4` for measures).
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Whether this action represents an adopted measure.
    pub const fn is_measure(self) -> bool {
        !matches!(self, Self::NoAction)
    }

    /// Look an action up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::NoAction),
            1 => Some(Self::FloodBarrier),
            2 => Some(Self::StructuralMeasures),
            3 => Some(Self::AdaptiveBuildingUse),
            4 => Some(Self::FloodInsurance),
            _ => None,
        }
    }
}

impl core::fmt::Display for AdaptationAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::NoAction => "no_action",
            Self::FloodBarrier => "flood_barrier",
            Self::StructuralMeasures => "structural_measures",
            Self::AdaptiveBuildingUse => "adaptive_building_use",
            Self::FloodInsurance => "flood_insurance",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_declared_order() {
        assert_eq!(AdaptationAction::NoAction.code(), 0);
        assert_eq!(AdaptationAction::FloodBarrier.code(), 1);
        assert_eq!(AdaptationAction::StructuralMeasures.code(), 2);
        assert_eq!(AdaptationAction::AdaptiveBuildingUse.code(), 3);
        assert_eq!(AdaptationAction::FloodInsurance.code(), 4);
    }

    #[test]
    fn from_code_inverts_code() {
        for action in AdaptationAction::MEASURES {
            assert_eq!(AdaptationAction::from_code(action.code()), Some(action));
        }
        assert_eq!(AdaptationAction::from_code(9), None);
    }

    #[test]
    fn only_no_action_is_not_a_measure() {
        assert!(!AdaptationAction::default().is_measure());
        assert!(AdaptationAction::MEASURES.iter().all(|a| a.is_measure()));
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&AdaptationAction::AdaptiveBuildingUse).ok();
        assert_eq!(json.as_deref(), Some("\"adaptive_building_use\""));
    }
}
