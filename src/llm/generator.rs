//! Generator boundary: traits, prompts, and payload validation
//!
//! The external generator produces free-form JSON; nothing in it is trusted
//! until it has passed [`validate_event`]. Transport problems surface as
//! `GeneratorUnavailable` (retryable) and contract problems as
//! `MalformedEvent` — the two must stay distinct because the first means
//! "try again" and the second means "the collaborator is broken".

use crate::core::error::{LifeSimError, Result};
use crate::core::types::WealthTier;
use crate::life::event::{Choice, EventImpact, EventType, LifeEvent, WealthImpact, NO_CHOICE};
use crate::llm::client::LlmClient;
use crate::llm::context::{EventContext, SummaryContext};
use serde::Deserialize;

/// Widest delta a single impact field may carry.
pub const MAX_DELTA: i32 = 20;
/// Maximum number of choices a decision event may offer.
pub const MAX_CHOICES: usize = 4;

/// Produces the next life event for a simulation.
#[allow(async_fn_in_trait)]
pub trait EventGenerator {
    async fn generate(&self, ctx: &EventContext) -> Result<LifeEvent>;
}

/// Produces the terminal narrative once a life has ended.
#[allow(async_fn_in_trait)]
pub trait SummaryGenerator {
    async fn summarize(&self, ctx: &SummaryContext) -> Result<String>;
}

/// LLM-backed implementation of both generator roles.
pub struct LlmGenerator {
    client: LlmClient,
}

impl LlmGenerator {
    pub fn new(client: LlmClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(LlmClient::from_env()?))
    }
}

impl EventGenerator for LlmGenerator {
    async fn generate(&self, ctx: &EventContext) -> Result<LifeEvent> {
        let user_prompt = if ctx.recent_events.is_empty() {
            format!(
                "Generate the first life event for a person who is {} years old.",
                ctx.age
            )
        } else {
            format!(
                "Previous events in this person's life: {}. \
                 Current stats: happiness {}, health {}, legacy {}, wealth {}. \
                 Generate the next life event at age {}.",
                ctx.history_summary(),
                ctx.stats.happiness,
                ctx.stats.health,
                ctx.stats.legacy,
                ctx.wealth_tier,
                ctx.age
            )
        };
        let system_prompt = event_system_prompt(ctx);

        let response = self.client.complete(&system_prompt, &user_prompt).await?;
        let json = extract_json(&response)?;
        let raw: RawEvent = serde_json::from_str(json).map_err(|e| {
            LifeSimError::MalformedEvent(format!("not an event payload: {e} - response: {response}"))
        })?;
        validate_event(raw, ctx.age)
    }
}

impl SummaryGenerator for LlmGenerator {
    async fn summarize(&self, ctx: &SummaryContext) -> Result<String> {
        let user_prompt = format!(
            "This person was born in {}, studied to {} level, had an {} personality \
             and worked in {}. They lived to age {} and ended {} with happiness {}, \
             health {} and legacy {}. Their life events: {}. Write their life summary.",
            ctx.profile.country,
            ctx.profile.education,
            ctx.profile.personality,
            ctx.profile.career,
            ctx.final_age,
            ctx.wealth_tier,
            ctx.stats.happiness,
            ctx.stats.health,
            ctx.stats.legacy,
            ctx.history_summary(),
        );

        let narrative = self
            .client
            .complete(SUMMARY_SYSTEM_PROMPT, &user_prompt)
            .await?;
        let narrative = narrative.trim();
        if narrative.is_empty() {
            return Err(LifeSimError::MalformedEvent("empty narrative".into()));
        }
        Ok(narrative.to_string())
    }
}

/// Untrusted event payload as the generator emits it.
#[derive(Debug, Deserialize)]
pub struct RawEvent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub impact: RawImpact,
    #[serde(default, rename = "hasChoice")]
    pub has_choice: bool,
    #[serde(default)]
    pub choices: Vec<RawChoice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawImpact {
    pub happiness: Option<i32>,
    pub health: Option<i32>,
    pub legacy: Option<i32>,
    pub wealth: Option<i32>,
    #[serde(alias = "wealthLevel")]
    pub wealth_level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawChoice {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub impact: RawImpact,
}

/// Validate an untrusted payload into a pending [`LifeEvent`] at `age`.
pub fn validate_event(raw: RawEvent, age: u32) -> Result<LifeEvent> {
    let malformed = |msg: String| LifeSimError::MalformedEvent(msg);

    if raw.title.trim().is_empty() {
        return Err(malformed("missing title".into()));
    }
    if raw.description.trim().is_empty() {
        return Err(malformed("missing description".into()));
    }
    let kind = EventType::parse(&raw.kind)
        .ok_or_else(|| malformed(format!("unknown event type: {:?}", raw.kind)))?;

    let impact = validate_impact(&raw.impact)?;

    let choices = if raw.has_choice {
        if raw.choices.is_empty() {
            return Err(malformed("hasChoice is set but no choices given".into()));
        }
        if raw.choices.len() > MAX_CHOICES {
            return Err(malformed(format!(
                "too many choices: {} (max {MAX_CHOICES})",
                raw.choices.len()
            )));
        }
        raw.choices
            .iter()
            .map(|c| {
                if c.text.trim().is_empty() {
                    return Err(malformed("choice with empty text".into()));
                }
                Ok(Choice {
                    text: c.text.clone(),
                    impact: validate_impact(&c.impact)?,
                })
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        // Stray choices without hasChoice are dropped, not trusted.
        Vec::new()
    };

    Ok(LifeEvent {
        age,
        title: raw.title,
        description: raw.description,
        kind,
        impact,
        choices,
        completed: false,
        chosen_index: NO_CHOICE,
    })
}

fn validate_impact(raw: &RawImpact) -> Result<EventImpact> {
    let check = |name: &str, v: i32| -> Result<i32> {
        if v.abs() > MAX_DELTA {
            return Err(LifeSimError::MalformedEvent(format!(
                "{name} delta {v} outside [-{MAX_DELTA}, {MAX_DELTA}]"
            )));
        }
        Ok(v)
    };

    let wealth = match (raw.wealth, raw.wealth_level.as_deref()) {
        (Some(_), Some(_)) => {
            return Err(LifeSimError::MalformedEvent(
                "impact carries both a wealth magnitude and a tier label".into(),
            ))
        }
        (Some(m), None) => WealthImpact::Magnitude(check("wealth", m)?),
        (None, Some(label)) => WealthImpact::Tier(WealthTier::from_label(label).ok_or_else(
            || LifeSimError::MalformedEvent(format!("unknown wealth tier label: {label:?}")),
        )?),
        (None, None) => WealthImpact::Magnitude(0),
    };

    Ok(EventImpact {
        happiness: check("happiness", raw.happiness.unwrap_or(0))?,
        health: check("health", raw.health.unwrap_or(0))?,
        legacy: check("legacy", raw.legacy.unwrap_or(0))?,
        wealth,
    })
}

/// Extract the JSON object from an LLM response, tolerating surrounding
/// prose and markdown code fences.
pub fn extract_json(response: &str) -> Result<&str> {
    let start = response
        .find('{')
        .ok_or_else(|| LifeSimError::MalformedEvent("no JSON found in response".into()))?;
    let end = response
        .rfind('}')
        .ok_or_else(|| LifeSimError::MalformedEvent("no closing brace in response".into()))?;
    if end < start {
        return Err(LifeSimError::MalformedEvent("malformed JSON braces".into()));
    }
    Ok(&response[start..=end])
}

fn event_system_prompt(ctx: &EventContext) -> String {
    format!(
        r#"You are a life simulation engine. Generate realistic life events for a person based on their profile and current age. Events should be age-appropriate and reflect realistic life progressions.

Consider:
- Educational milestones (school, college, graduation)
- Career progression (entry level, promotions, challenges)
- Relationships (friendships, romance, marriage, family)
- Health events (minor illnesses, fitness achievements, serious conditions)
- Financial changes (savings, investments, losses, windfalls)
- Personal growth (hobbies, achievements, failures)
- Social connections (community involvement, networking)

Generate a single life event as a JSON object with this structure:
{{
  "title": "Brief event title",
  "description": "Detailed description of what happened",
  "type": "career|education|relationship|health|financial|personal|social|achievement|family",
  "impact": {{
    "happiness": number between -20 and 20,
    "wealth": number between -20 and 20,
    "health": number between -20 and 20,
    "legacy": number between -10 and 10
  }},
  "hasChoice": boolean,
  "choices": [
    {{
      "text": "Choice text",
      "impact": {{ same structure as above }}
    }}
  ] (only if hasChoice is true, at most {MAX_CHOICES} choices)
}}

Output JSON only, no explanation. Make the event realistic and appropriate for age {age}. Consider their background: {country}, {education}, {personality}, {career}, risk tolerance: {risk}."#,
        age = ctx.age,
        country = ctx.profile.country,
        education = ctx.profile.education,
        personality = ctx.profile.personality,
        career = ctx.profile.career,
        risk = ctx.profile.risk_tolerance,
    )
}

const SUMMARY_SYSTEM_PROMPT: &str = "You are a biographer summarizing a simulated life. \
Write a warm, reflective narrative of two or three paragraphs covering the arc of the \
life you are given: its beginnings, its turning points, and what the person leaves \
behind. Write prose only, no lists and no JSON.";
