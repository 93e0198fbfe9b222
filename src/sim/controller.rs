//! SimulationController: orchestration of one life
//!
//! Drives the pure components (clock, scheduler, accumulator, resolver,
//! termination) against a persisted simulation record and the external
//! generators. The owner is an explicit argument to every operation; the
//! controller holds no ambient session state beyond a cache of the record
//! it last loaded.
//!
//! Write ordering: every mutation is persisted through the store before the
//! in-memory copy is replaced, and a clock advance is persisted before any
//! generator call. A crash between read and write therefore never advances
//! the clock twice for the same real-time gap.

use crate::core::config::SimulationConfig;
use crate::core::error::{LifeSimError, Result};
use crate::life::event::LifeEvent;
use crate::life::profile::Profile;
use crate::life::simulation::Simulation;
use crate::llm::context::{EventContext, SummaryContext};
use crate::llm::generator::{EventGenerator, SummaryGenerator};
use crate::sim::clock;
use crate::sim::milestones::{self, ScheduleDecision};
use crate::sim::stats;
use crate::sim::termination;
use crate::sim::wealth;
use jiff::Timestamp;

/// Where a simulation stands in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No simulation loaded for the owner.
    Uninitialized,
    /// Alive, no pending event; the next event must be requested.
    AwaitingEvent,
    /// Alive with a pending event awaiting the player's decision.
    PendingChoice,
    /// The life has ended; immutable except for restart.
    Terminated,
}

/// Result of resolving a choice.
#[derive(Debug, Clone)]
pub enum ChoiceOutcome {
    /// Life goes on; the next pending event has been requested.
    Continued { next_event: LifeEvent },
    /// The life ended; the terminal narrative was generated and stored.
    Terminated { narrative: String },
}

pub struct SimulationController<Gen, Store> {
    config: SimulationConfig,
    generator: Gen,
    store: Store,
    current: Option<Simulation>,
    busy: bool,
}

impl<Gen, Store> SimulationController<Gen, Store>
where
    Gen: EventGenerator + SummaryGenerator,
    Store: crate::store::SimulationStore,
{
    pub fn new(config: SimulationConfig, generator: Gen, store: Store) -> Self {
        Self {
            config,
            generator,
            store,
            current: None,
            busy: false,
        }
    }

    /// The cached simulation record, if one is loaded.
    pub fn simulation(&self) -> Option<&Simulation> {
        self.current.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> Phase {
        match &self.current {
            None => Phase::Uninitialized,
            Some(sim) if !sim.is_alive => Phase::Terminated,
            Some(sim) if sim.pending_event().is_some() => Phase::PendingChoice,
            Some(_) => Phase::AwaitingEvent,
        }
    }

    /// Start a brand-new life for `owner` and request its first event.
    pub async fn start_life(
        &mut self,
        owner: &str,
        profile: Profile,
        now: Timestamp,
    ) -> Result<LifeEvent> {
        self.reject_if_busy()?;
        if self.store.find_alive(owner)?.is_some() {
            return Err(LifeSimError::InvalidOperation(format!(
                "owner {owner} already has an active life"
            )));
        }

        let sim = Simulation::new(owner, profile, now, &self.config);
        let starting_age = sim.current_age();
        self.store.insert(&sim)?;
        tracing::info!(owner, id = %sim.id, age = starting_age, "life started");
        self.current = Some(sim);

        self.request_event(starting_age).await
    }

    /// Resume `owner`'s life: advance the virtual clock from wall-clock
    /// time, then surface the event the scheduler calls for.
    pub async fn resume(&mut self, owner: &str, now: Timestamp) -> Result<LifeEvent> {
        self.reject_if_busy()?;
        self.load(owner)?;
        let sim = self.alive_simulation()?;

        let advance = clock::advance(
            sim.virtual_months_elapsed,
            sim.last_updated,
            now,
            self.config.months_per_real_day,
        );
        if !advance.is_noop() {
            let mut updated = sim.clone();
            updated.virtual_months_elapsed = advance.virtual_months;
            updated.last_updated = now;
            self.store.update(&updated)?;
            tracing::info!(
                owner,
                days = advance.days_elapsed,
                age = advance.age,
                "clock advanced"
            );
            self.current = Some(updated);
        }

        let (age, decision, pending) = {
            let sim = self.alive_simulation()?;
            let age = sim.current_age();
            let decision = milestones::decide(&sim.life_events, age);
            (age, decision, sim.pending_event().cloned())
        };
        tracing::debug!(owner, age, ?decision, "schedule decision");

        match decision {
            ScheduleDecision::ResurfacePending => {
                Ok(pending.expect("decision guarantees a pending event"))
            }
            ScheduleDecision::RequestMilestone { age } => self.request_event(age).await,
            ScheduleDecision::RequestFirst { age } => self.request_event(age).await,
            // The latest event is completed and no milestone is due; the
            // product behavior is to keep the life moving with a fresh
            // event rather than going idle.
            ScheduleDecision::ResurfaceLatest => self.request_event(age).await,
        }
    }

    /// Resolve the pending event with the player's choice. `NO_CHOICE`
    /// acknowledges an event without options.
    pub async fn submit_choice(&mut self, owner: &str, chosen: i32) -> Result<ChoiceOutcome> {
        self.reject_if_busy()?;
        self.load(owner)?;
        let sim = self.alive_simulation()?;

        let pending = sim
            .pending_event()
            .ok_or_else(|| LifeSimError::InvalidOperation("no pending event".into()))?;
        let impact = pending.impact_for(chosen).ok_or_else(|| {
            LifeSimError::InvalidOperation(format!(
                "choice index {chosen} does not fit an event with {} choices",
                pending.choices.len()
            ))
        })?;

        // One atomic unit: stats, tier, event completion, alive flag.
        let mut updated = sim.clone();
        updated.stats = stats::apply(updated.stats, &impact);
        updated.wealth_tier = wealth::resolve(updated.wealth_tier, impact.wealth);
        updated
            .pending_event_mut()
            .expect("pending checked above")
            .complete(chosen);

        let age = updated.current_age();
        let cause = termination::evaluate(&updated.stats, age, self.config.max_age_years);
        if cause.is_some() {
            updated.is_alive = false;
        }

        self.store.update(&updated)?;
        tracing::info!(
            owner,
            age,
            stats = ?updated.stats,
            tier = %updated.wealth_tier,
            ?cause,
            "choice applied"
        );
        self.current = Some(updated);

        if cause.is_some() {
            let narrative = self.request_summary().await?;
            Ok(ChoiceOutcome::Terminated { narrative })
        } else {
            tokio::time::sleep(self.config.next_event_delay).await;
            let next_event = self.request_event(age).await?;
            Ok(ChoiceOutcome::Continued { next_event })
        }
    }

    /// Re-request an event after a failed generator call, or re-surface the
    /// pending one.
    pub async fn retry_event(&mut self, owner: &str) -> Result<LifeEvent> {
        self.reject_if_busy()?;
        self.load(owner)?;
        let sim = self.alive_simulation()?;
        match sim.pending_event() {
            Some(event) => Ok(event.clone()),
            None => {
                let age = sim.current_age();
                self.request_event(age).await
            }
        }
    }

    /// End the life now at the current age, by the player's own hand.
    pub async fn end_life(&mut self, owner: &str) -> Result<String> {
        self.reject_if_busy()?;
        self.load(owner)?;
        let sim = self.alive_simulation()?;

        let mut updated = sim.clone();
        updated.is_alive = false;
        self.store.update(&updated)?;
        tracing::info!(owner, age = updated.current_age(), "life ended by player");
        self.current = Some(updated);

        self.request_summary().await
    }

    /// The terminal narrative, requesting it if an earlier attempt failed.
    pub async fn final_summary(&mut self, owner: &str) -> Result<String> {
        self.reject_if_busy()?;
        self.load(owner)?;
        let sim = self
            .current
            .as_ref()
            .ok_or_else(|| LifeSimError::NoActiveLife(owner.to_string()))?;
        if sim.is_alive {
            return Err(LifeSimError::InvalidOperation(
                "life has not ended yet".into(),
            ));
        }
        match &sim.summary {
            Some(narrative) => Ok(narrative.clone()),
            None => self.request_summary().await,
        }
    }

    /// Discard the terminated simulation context. The record stays in the
    /// store for history and leaderboards; the controller returns to
    /// Uninitialized so a new life can begin.
    pub fn restart(&mut self, owner: &str) -> Result<()> {
        if let Some(sim) = &self.current {
            if sim.owner == owner && sim.is_alive {
                return Err(LifeSimError::InvalidOperation(
                    "cannot restart while the life is still running".into(),
                ));
            }
        }
        self.current = None;
        tracing::info!(owner, "simulation context reset");
        Ok(())
    }

    /// Terminated lives ordered by legacy, for display.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<Simulation>> {
        self.store.leaderboard(limit)
    }

    fn reject_if_busy(&self) -> Result<()> {
        if self.busy {
            return Err(LifeSimError::Busy);
        }
        Ok(())
    }

    /// Ensure the cache holds `owner`'s simulation, loading the alive one
    /// from the store when the cache misses. A cached terminated record is
    /// kept so the summary/restart flow works after death.
    fn load(&mut self, owner: &str) -> Result<()> {
        if self.current.as_ref().is_some_and(|s| s.owner == owner) {
            return Ok(());
        }
        match self.store.find_alive(owner)? {
            Some(sim) => {
                self.current = Some(sim);
                Ok(())
            }
            None => Err(LifeSimError::NoActiveLife(owner.to_string())),
        }
    }

    fn alive_simulation(&self) -> Result<&Simulation> {
        let sim = self
            .current
            .as_ref()
            .expect("load() must run before alive_simulation()");
        if !sim.is_alive {
            return Err(LifeSimError::InvalidOperation(
                "this life has already ended".into(),
            ));
        }
        Ok(sim)
    }

    /// Request one event from the generator and persist it as pending.
    async fn request_event(&mut self, age: u32) -> Result<LifeEvent> {
        let sim = self
            .current
            .as_ref()
            .expect("request_event requires a loaded simulation");
        if sim.pending_event().is_some() {
            return Err(LifeSimError::InvalidOperation(
                "an event is already pending".into(),
            ));
        }
        let ctx = EventContext::from_simulation(sim, age, self.config.history_window);

        self.busy = true;
        let result = self.generator.generate(&ctx).await;
        self.busy = false;
        let event = result?;

        let mut updated = self.current.clone().expect("checked above");
        updated.life_events.push(event.clone());
        self.store.update(&updated)?;
        tracing::debug!(age, title = %event.title, "event generated");
        self.current = Some(updated);
        Ok(event)
    }

    /// Request the terminal narrative and persist it.
    async fn request_summary(&mut self) -> Result<String> {
        let sim = self
            .current
            .as_ref()
            .expect("request_summary requires a loaded simulation");
        let ctx = SummaryContext::from_simulation(sim);

        self.busy = true;
        let result = self.generator.summarize(&ctx).await;
        self.busy = false;
        let narrative = result?;

        let mut updated = self.current.clone().expect("checked above");
        updated.summary = Some(narrative.clone());
        self.store.update(&updated)?;
        tracing::info!(final_age = ctx.final_age, "terminal narrative stored");
        self.current = Some(updated);
        Ok(narrative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::life::event::{EventImpact, EventType, NO_CHOICE};
    use crate::store::MemoryStore;
    use std::cell::RefCell;
    use std::time::Duration;

    /// Generator that serves a scripted queue of results.
    struct Scripted {
        events: RefCell<Vec<Result<LifeEvent>>>,
    }

    impl Scripted {
        fn with_events(events: Vec<Result<LifeEvent>>) -> Self {
            Self {
                events: RefCell::new(events),
            }
        }
    }

    impl EventGenerator for Scripted {
        async fn generate(&self, ctx: &EventContext) -> Result<LifeEvent> {
            let mut queue = self.events.borrow_mut();
            if queue.is_empty() {
                return Ok(plain_event(ctx.age));
            }
            queue.remove(0)
        }
    }

    impl SummaryGenerator for Scripted {
        async fn summarize(&self, ctx: &SummaryContext) -> Result<String> {
            Ok(format!("A life that ended at {}.", ctx.final_age))
        }
    }

    fn plain_event(age: u32) -> LifeEvent {
        LifeEvent {
            age,
            title: format!("Event at {age}"),
            description: "...".into(),
            kind: EventType::Personal,
            impact: EventImpact::new(1, 0, 1, 0),
            choices: Vec::new(),
            completed: false,
            chosen_index: NO_CHOICE,
        }
    }

    fn fast_config() -> SimulationConfig {
        SimulationConfig {
            next_event_delay: Duration::ZERO,
            ..Default::default()
        }
    }

    fn controller(events: Vec<Result<LifeEvent>>) -> SimulationController<Scripted, MemoryStore> {
        SimulationController::new(
            fast_config(),
            Scripted::with_events(events),
            MemoryStore::new(),
        )
    }

    fn profile() -> Profile {
        Profile::new("usa", "bachelor", "ambivert", "tech", "medium")
    }

    #[tokio::test]
    async fn test_start_life_creates_pending_first_event() {
        let mut ctl = controller(vec![]);
        assert_eq!(ctl.phase(), Phase::Uninitialized);

        let event = ctl
            .start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        assert_eq!(event.age, 18);
        assert_eq!(ctl.phase(), Phase::PendingChoice);
        assert_eq!(ctl.simulation().unwrap().life_events.len(), 1);
    }

    #[tokio::test]
    async fn test_second_life_for_owner_rejected() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        let err = ctl
            .start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap_err();
        assert!(matches!(err, LifeSimError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_choice_without_pending_event_refused() {
        // Fail the follow-up request so the life lands in AwaitingEvent.
        let mut ctl = controller(vec![
            Ok(plain_event(18)),
            Err(LifeSimError::GeneratorUnavailable("down".into())),
        ]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        let _ = ctl.submit_choice("alice", NO_CHOICE).await;
        assert_eq!(ctl.phase(), Phase::AwaitingEvent);

        let err = ctl.submit_choice("alice", NO_CHOICE).await.unwrap_err();
        assert!(matches!(err, LifeSimError::InvalidOperation(_)));
    }

    #[tokio::test]
    async fn test_invalid_choice_index_refused() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        let err = ctl.submit_choice("alice", 3).await.unwrap_err();
        assert!(matches!(err, LifeSimError::InvalidOperation(_)));
        // Nothing was applied.
        let sim = ctl.simulation().unwrap();
        assert!(!sim.life_events[0].completed);
    }

    #[tokio::test]
    async fn test_busy_flag_rejects_entry_points() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        ctl.busy = true;
        assert!(matches!(
            ctl.submit_choice("alice", NO_CHOICE).await.unwrap_err(),
            LifeSimError::Busy
        ));
        assert!(matches!(
            ctl.resume("alice", Timestamp::UNIX_EPOCH).await.unwrap_err(),
            LifeSimError::Busy
        ));
        assert!(matches!(
            ctl.end_life("alice").await.unwrap_err(),
            LifeSimError::Busy
        ));
    }

    #[tokio::test]
    async fn test_generator_failure_leaves_state_untouched_and_retryable() {
        let mut ctl = controller(vec![
            Ok(plain_event(18)),
            Err(LifeSimError::GeneratorUnavailable("down".into())),
            Ok(plain_event(18)),
        ]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();

        let err = ctl.submit_choice("alice", NO_CHOICE).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(!ctl.is_busy());

        // The choice itself was applied and persisted; only the follow-up
        // event request failed.
        let sim = ctl.simulation().unwrap();
        assert!(sim.life_events[0].completed);
        assert_eq!(ctl.phase(), Phase::AwaitingEvent);

        let event = ctl.retry_event("alice").await.unwrap();
        assert_eq!(event.age, 18);
        assert_eq!(ctl.phase(), Phase::PendingChoice);
    }

    #[tokio::test]
    async fn test_resume_requests_milestone_event_after_clock_jump() {
        // Fail the post-choice request so no event is pending when the
        // clock later jumps past a milestone.
        let mut ctl = controller(vec![
            Ok(plain_event(18)),
            Err(LifeSimError::GeneratorUnavailable("down".into())),
        ]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        let _ = ctl.submit_choice("alice", NO_CHOICE).await;
        assert_eq!(ctl.phase(), Phase::AwaitingEvent);

        // 24 days = 48 virtual months: age 18 -> 22, a milestone.
        let later = Timestamp::from_second(24 * 86_400).unwrap();
        let event = ctl.resume("alice", later).await.unwrap();
        assert_eq!(ctl.simulation().unwrap().current_age(), 22);
        assert_eq!(event.age, 22);
    }

    #[tokio::test]
    async fn test_resume_twice_same_instant_does_not_advance_twice() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();

        let later = Timestamp::from_second(3 * 86_400).unwrap();
        ctl.resume("alice", later).await.unwrap();
        let months = ctl.simulation().unwrap().virtual_months_elapsed;
        ctl.submit_choice("alice", NO_CHOICE).await.unwrap();
        ctl.resume("alice", later).await.unwrap();
        assert_eq!(ctl.simulation().unwrap().virtual_months_elapsed, months);
    }

    #[tokio::test]
    async fn test_end_life_terminates_and_stores_narrative() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        let narrative = ctl.end_life("alice").await.unwrap();
        assert!(narrative.contains("18"));
        assert_eq!(ctl.phase(), Phase::Terminated);
        assert_eq!(ctl.simulation().unwrap().summary.as_deref(), Some(narrative.as_str()));

        // Terminated lives accept no further mutation.
        assert!(ctl.submit_choice("alice", NO_CHOICE).await.is_err());
        assert!(ctl.resume("alice", Timestamp::UNIX_EPOCH).await.is_err());
    }

    #[tokio::test]
    async fn test_restart_returns_to_uninitialized_and_keeps_history() {
        let mut ctl = controller(vec![]);
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        assert!(ctl.restart("alice").is_err());

        ctl.end_life("alice").await.unwrap();
        ctl.restart("alice").unwrap();
        assert_eq!(ctl.phase(), Phase::Uninitialized);

        // The dead record still shows up on the leaderboard.
        assert_eq!(ctl.leaderboard(10).unwrap().len(), 1);

        // And a new life can begin.
        ctl.start_life("alice", profile(), Timestamp::UNIX_EPOCH)
            .await
            .unwrap();
        assert_eq!(ctl.phase(), Phase::PendingChoice);
    }
}
