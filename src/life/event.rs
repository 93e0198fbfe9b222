//! Life events and their impacts
//!
//! A `LifeEvent` is the unit of history: something that happened at a given
//! virtual age, with deltas for the well-being stats and the wealth ladder,
//! optionally offering the player a decision. The prose fields are owned by
//! the external generator and never interpreted here.

use crate::core::types::WealthTier;
use serde::{Deserialize, Serialize};

/// Closed set of event categories the generator may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Career,
    Education,
    Relationship,
    Health,
    Financial,
    Personal,
    Social,
    Achievement,
    Family,
}

impl EventType {
    /// Parse the generator's lowercase type tag.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "career" => Some(Self::Career),
            "education" => Some(Self::Education),
            "relationship" => Some(Self::Relationship),
            "health" => Some(Self::Health),
            "financial" => Some(Self::Financial),
            "personal" => Some(Self::Personal),
            "social" => Some(Self::Social),
            "achievement" => Some(Self::Achievement),
            "family" => Some(Self::Family),
            _ => None,
        }
    }
}

/// The wealth side of an impact, in exactly one of two encodings.
///
/// The canonical form is a numeric magnitude in [-20, 20]; some generator
/// variants instead name a tier directly, which the resolver treats as an
/// authoritative override. An event carrying both forms is rejected at the
/// generator boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WealthImpact {
    Magnitude(i32),
    Tier(WealthTier),
}

impl Default for WealthImpact {
    fn default() -> Self {
        Self::Magnitude(0)
    }
}

/// Deltas applied when an event (or one of its choices) resolves.
///
/// Missing fields in the generator payload deserialize to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventImpact {
    #[serde(default)]
    pub happiness: i32,
    #[serde(default)]
    pub health: i32,
    #[serde(default)]
    pub legacy: i32,
    #[serde(default)]
    pub wealth: WealthImpact,
}

impl EventImpact {
    pub fn new(happiness: i32, health: i32, legacy: i32, wealth: i32) -> Self {
        Self {
            happiness,
            health,
            legacy,
            wealth: WealthImpact::Magnitude(wealth),
        }
    }
}

/// One option presented to the player on a decision event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub text: String,
    pub impact: EventImpact,
}

/// Index value recorded when an event without choices is acknowledged.
pub const NO_CHOICE: i32 = -1;

/// A single milestone in a life's history.
///
/// Append-only once stored: the only permitted mutation afterwards is
/// completing the pending event via [`LifeEvent::complete`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifeEvent {
    /// Virtual age (whole years) at which the event was generated.
    pub age: u32,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub impact: EventImpact,
    /// Empty when the event offers no decision.
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub completed: bool,
    /// Index of the chosen option, or [`NO_CHOICE`] for acknowledgements.
    #[serde(default = "default_chosen_index")]
    pub chosen_index: i32,
}

fn default_chosen_index() -> i32 {
    NO_CHOICE
}

impl LifeEvent {
    /// The impact selected by `chosen`, validating it against this event's
    /// shape. `NO_CHOICE` is required when the event has no choices, and a
    /// valid choice index is required when it does.
    pub fn impact_for(&self, chosen: i32) -> Option<EventImpact> {
        if self.choices.is_empty() {
            (chosen == NO_CHOICE).then_some(self.impact)
        } else {
            usize::try_from(chosen)
                .ok()
                .and_then(|i| self.choices.get(i))
                .map(|c| c.impact)
        }
    }

    /// Mark the event resolved with the given choice index.
    pub fn complete(&mut self, chosen: i32) {
        self.completed = true;
        self.chosen_index = chosen;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_event() -> LifeEvent {
        LifeEvent {
            age: 22,
            title: "First job".into(),
            description: "You landed an entry-level position.".into(),
            kind: EventType::Career,
            impact: EventImpact::new(5, 0, 2, 8),
            choices: Vec::new(),
            completed: false,
            chosen_index: NO_CHOICE,
        }
    }

    fn decision_event() -> LifeEvent {
        LifeEvent {
            choices: vec![
                Choice {
                    text: "Accept".into(),
                    impact: EventImpact::new(10, -5, 0, 15),
                },
                Choice {
                    text: "Decline".into(),
                    impact: EventImpact::new(-5, 0, 0, 0),
                },
            ],
            ..plain_event()
        }
    }

    #[test]
    fn test_event_type_parse() {
        assert_eq!(EventType::parse("career"), Some(EventType::Career));
        assert_eq!(EventType::parse("family"), Some(EventType::Family));
        assert_eq!(EventType::parse("CAREER"), None);
        assert_eq!(EventType::parse("weather"), None);
    }

    #[test]
    fn test_impact_for_plain_event_requires_no_choice() {
        let ev = plain_event();
        assert_eq!(ev.impact_for(NO_CHOICE), Some(ev.impact));
        assert_eq!(ev.impact_for(0), None);
    }

    #[test]
    fn test_impact_for_decision_event_requires_valid_index() {
        let ev = decision_event();
        assert_eq!(ev.impact_for(0), Some(ev.choices[0].impact));
        assert_eq!(ev.impact_for(1), Some(ev.choices[1].impact));
        assert_eq!(ev.impact_for(2), None);
        assert_eq!(ev.impact_for(NO_CHOICE), None);
    }

    #[test]
    fn test_complete_records_choice() {
        let mut ev = decision_event();
        ev.complete(1);
        assert!(ev.completed);
        assert_eq!(ev.chosen_index, 1);
    }

    #[test]
    fn test_wealth_impact_untagged_serde() {
        let m: WealthImpact = serde_json::from_str("12").unwrap();
        assert_eq!(m, WealthImpact::Magnitude(12));
        let t: WealthImpact = serde_json::from_str("\"Comfortable\"").unwrap();
        assert_eq!(t, WealthImpact::Tier(WealthTier::Comfortable));
    }

    #[test]
    fn test_impact_missing_fields_default_to_zero() {
        let impact: EventImpact = serde_json::from_str(r#"{"happiness": 3}"#).unwrap();
        assert_eq!(impact.happiness, 3);
        assert_eq!(impact.health, 0);
        assert_eq!(impact.legacy, 0);
        assert_eq!(impact.wealth, WealthImpact::Magnitude(0));
    }
}
