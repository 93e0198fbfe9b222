//! Offline generator for running without an API key
//!
//! Serves canned but age-aware events so the simulation loop works end to
//! end with no network access. Prose quality is not the point; exercising
//! the full state machine is.

use crate::core::error::Result;
use crate::life::event::{Choice, EventImpact, EventType, LifeEvent, NO_CHOICE};
use crate::llm::context::{EventContext, SummaryContext};
use crate::llm::generator::{EventGenerator, SummaryGenerator};
use rand::seq::SliceRandom;
use rand::Rng;

pub struct OfflineGenerator;

struct Template {
    title: &'static str,
    description: &'static str,
    kind: EventType,
    impact: (i32, i32, i32, i32), // happiness, health, legacy, wealth
    choices: &'static [(&'static str, (i32, i32, i32, i32))],
}

const YOUNG: &[Template] = &[
    Template {
        title: "A mentor takes notice",
        description: "A senior figure in your field offers to guide you.",
        kind: EventType::Career,
        impact: (6, 0, 3, 4),
        choices: &[],
    },
    Template {
        title: "Scholarship opportunity",
        description: "A demanding program abroad has a place for you.",
        kind: EventType::Education,
        impact: (0, 0, 0, 0),
        choices: &[
            ("Take the place and move abroad", (8, -4, 6, -12)),
            ("Stay close to home", (2, 2, 0, 2)),
        ],
    },
    Template {
        title: "First serious relationship",
        description: "Someone you met through friends becomes important to you.",
        kind: EventType::Relationship,
        impact: (10, 0, 1, 0),
        choices: &[],
    },
];

const MIDLIFE: &[Template] = &[
    Template {
        title: "Startup offer",
        description: "A former colleague wants you as a co-founder.",
        kind: EventType::Financial,
        impact: (0, 0, 0, 0),
        choices: &[
            ("Quit and join the startup", (8, -6, 8, 15)),
            ("Keep the stable job", (0, 2, 0, 5)),
            ("Invest savings but stay employed", (3, 0, 2, -12)),
        ],
    },
    Template {
        title: "Health scare",
        description: "A routine checkup turns up something that needs attention.",
        kind: EventType::Health,
        impact: (-8, -12, 0, -4),
        choices: &[],
    },
    Template {
        title: "Community recognition",
        description: "Years of volunteering earn you a local award.",
        kind: EventType::Achievement,
        impact: (7, 0, 9, 0),
        choices: &[],
    },
];

const LATE: &[Template] = &[
    Template {
        title: "Grandchild arrives",
        description: "The family gathers for a new generation.",
        kind: EventType::Family,
        impact: (12, 2, 5, -2),
        choices: &[],
    },
    Template {
        title: "Memoir interest",
        description: "A small publisher asks about your life story.",
        kind: EventType::Personal,
        impact: (0, 0, 0, 0),
        choices: &[
            ("Write the memoir", (5, -2, 12, 4)),
            ("Politely decline", (1, 1, 0, 0)),
        ],
    },
    Template {
        title: "Slowing down",
        description: "The years are starting to make themselves felt.",
        kind: EventType::Health,
        impact: (-2, -10, 0, 0),
        choices: &[],
    },
];

fn impact_of((happiness, health, legacy, wealth): (i32, i32, i32, i32)) -> EventImpact {
    EventImpact::new(happiness, health, legacy, wealth)
}

impl EventGenerator for OfflineGenerator {
    async fn generate(&self, ctx: &EventContext) -> Result<LifeEvent> {
        let pool = match ctx.age {
            0..=29 => YOUNG,
            30..=59 => MIDLIFE,
            _ => LATE,
        };
        let mut rng = rand::thread_rng();
        let template = pool.choose(&mut rng).expect("template pools are non-empty");

        // Small jitter so repeated filler events do not apply identical
        // deltas every time.
        let jitter = rng.gen_range(-2..=2);
        let mut impact = impact_of(template.impact);
        impact.happiness = (impact.happiness + jitter).clamp(-20, 20);

        Ok(LifeEvent {
            age: ctx.age,
            title: template.title.to_string(),
            description: template.description.to_string(),
            kind: template.kind,
            impact,
            choices: template
                .choices
                .iter()
                .map(|(text, impact)| Choice {
                    text: (*text).to_string(),
                    impact: impact_of(*impact),
                })
                .collect(),
            completed: false,
            chosen_index: NO_CHOICE,
        })
    }
}

impl SummaryGenerator for OfflineGenerator {
    async fn summarize(&self, ctx: &SummaryContext) -> Result<String> {
        Ok(format!(
            "Born in {country}, they lived to {age}. A {personality} soul who worked in \
             {career}, they ended their days {tier} with a legacy score of {legacy}. \
             {events} moments marked the road.",
            country = ctx.profile.country,
            age = ctx.final_age,
            personality = ctx.profile.personality,
            career = ctx.profile.career,
            tier = ctx.wealth_tier,
            legacy = ctx.stats.legacy,
            events = ctx.events.len(),
        ))
    }
}
