//! Integration tests for clock catch-up and milestone scheduling
//!
//! Exercises the resume path: long absences crossing several milestones,
//! idempotent re-runs from persisted state, and durable recovery through
//! the JSON store after a simulated crash.

use jiff::Timestamp;
use parallel_life::core::config::SimulationConfig;
use parallel_life::core::error::Result;
use parallel_life::core::types::{Stats, WealthTier};
use parallel_life::life::event::{EventImpact, EventType, LifeEvent, NO_CHOICE};
use parallel_life::life::profile::Profile;
use parallel_life::life::simulation::Simulation;
use parallel_life::llm::context::{EventContext, SummaryContext};
use parallel_life::llm::generator::{EventGenerator, SummaryGenerator};
use parallel_life::sim::controller::SimulationController;
use parallel_life::store::{JsonStore, MemoryStore, SimulationStore};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

const SECS_PER_DAY: i64 = 86_400;

#[derive(Default)]
struct CountingGenerator {
    event_calls: Arc<AtomicU32>,
}

impl EventGenerator for CountingGenerator {
    async fn generate(&self, ctx: &EventContext) -> Result<LifeEvent> {
        self.event_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LifeEvent {
            age: ctx.age,
            title: format!("Milestone at {}", ctx.age),
            description: "Time passed.".into(),
            kind: EventType::Personal,
            impact: EventImpact::default(),
            choices: Vec::new(),
            completed: false,
            chosen_index: NO_CHOICE,
        })
    }
}

impl SummaryGenerator for CountingGenerator {
    async fn summarize(&self, _ctx: &SummaryContext) -> Result<String> {
        Ok("A life.".into())
    }
}

fn profile() -> Profile {
    Profile::new("japan", "master", "introvert", "arts", "low")
}

/// Simulation at `age` whose history is one completed event at `age`,
/// last updated at the epoch.
fn settled_simulation(age: u32) -> Simulation {
    let mut sim = Simulation::new(
        "alice",
        profile(),
        Timestamp::UNIX_EPOCH,
        &SimulationConfig::default(),
    );
    sim.virtual_months_elapsed = age * 12;
    sim.stats = Stats::new(50, 80, 10);
    sim.wealth_tier = WealthTier::StartingOut;
    sim.life_events.push(LifeEvent {
        age,
        title: format!("Settled at {age}"),
        description: "...".into(),
        kind: EventType::Personal,
        impact: EventImpact::default(),
        choices: Vec::new(),
        completed: true,
        chosen_index: NO_CHOICE,
    });
    sim
}

#[tokio::test]
async fn test_multi_milestone_jump_requests_exactly_one_event() {
    // Age 20 -> 37 in one absence: 204 virtual months = 102 real days,
    // crossing milestones 22, 25, 30 and 35.
    let sim = settled_simulation(20);
    let mut store = MemoryStore::new();
    store.insert(&sim).unwrap();

    let generator = CountingGenerator::default();
    let calls = Arc::clone(&generator.event_calls);
    let mut ctl = SimulationController::new(SimulationConfig::default(), generator, store);

    let now = Timestamp::from_second(102 * SECS_PER_DAY).unwrap();
    let event = ctl.resume("alice", now).await.unwrap();

    assert_eq!(ctl.simulation().unwrap().current_age(), 37);
    assert_eq!(event.age, 37);
    assert_eq!(calls.load(Ordering::SeqCst), 1, "one event, never three");

    // The skipped milestones stay skipped: only the seed event and the
    // catch-up event exist.
    let ages: Vec<u32> = ctl
        .simulation()
        .unwrap()
        .life_events
        .iter()
        .map(|e| e.age)
        .collect();
    assert_eq!(ages, vec![20, 37]);
}

#[tokio::test]
async fn test_resume_below_next_milestone_requests_filler() {
    // Age 18 settled; six real days later the age is still 19 and no
    // milestone is due, but the life is kept moving with a fresh event.
    let sim = settled_simulation(18);
    let mut store = MemoryStore::new();
    store.insert(&sim).unwrap();

    let generator = CountingGenerator::default();
    let calls = Arc::clone(&generator.event_calls);
    let mut ctl = SimulationController::new(SimulationConfig::default(), generator, store);

    let now = Timestamp::from_second(6 * SECS_PER_DAY).unwrap();
    let event = ctl.resume("alice", now).await.unwrap();
    assert_eq!(ctl.simulation().unwrap().current_age(), 19);
    assert_eq!(event.age, 19);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_pending_event_is_resurfaced_without_new_request() {
    let mut sim = settled_simulation(18);
    sim.life_events[0].completed = false; // still pending
    let mut store = MemoryStore::new();
    store.insert(&sim).unwrap();

    let generator = CountingGenerator::default();
    let calls = Arc::clone(&generator.event_calls);
    let mut ctl = SimulationController::new(SimulationConfig::default(), generator, store);

    let event = ctl.resume("alice", Timestamp::UNIX_EPOCH).await.unwrap();
    assert_eq!(event.title, "Settled at 18");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_crash_between_resumes_does_not_double_advance() {
    let path: PathBuf =
        std::env::temp_dir().join(format!("parallel-life-crash-{}.json", uuid::Uuid::new_v4()));
    let now = Timestamp::from_second(10 * SECS_PER_DAY).unwrap();

    {
        let mut store = JsonStore::open(&path).unwrap();
        store.insert(&settled_simulation(18)).unwrap();
    }

    // First session advances the clock and "crashes" right after.
    let months_after_first = {
        let store = JsonStore::open(&path).unwrap();
        let mut ctl =
            SimulationController::new(SimulationConfig::default(), CountingGenerator::default(), store);
        ctl.resume("alice", now).await.unwrap();
        ctl.simulation().unwrap().virtual_months_elapsed
    };
    assert_eq!(months_after_first, 18 * 12 + 20);

    // A second session resuming at the same instant sees the persisted
    // last_updated and proposes no further advance.
    let store = JsonStore::open(&path).unwrap();
    let mut ctl =
        SimulationController::new(SimulationConfig::default(), CountingGenerator::default(), store);
    ctl.resume("alice", now).await.unwrap();
    assert_eq!(
        ctl.simulation().unwrap().virtual_months_elapsed,
        months_after_first
    );

    std::fs::remove_file(&path).ok();
}
