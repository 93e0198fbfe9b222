//! Parallel Life - Entry Point
//!
//! Interactive loop around the simulation controller: resume the owner's
//! life, surface events, take choices, and show the timeline and the
//! leaderboard. Generator calls run on a tokio runtime; with no API key the
//! offline generator keeps the loop fully playable.

use parallel_life::core::config::SimulationConfig;
use parallel_life::core::error::{LifeSimError, Result};
use parallel_life::life::event::{LifeEvent, NO_CHOICE};
use parallel_life::life::profile::Profile;
use parallel_life::life::simulation::Simulation;
use parallel_life::llm::generator::{EventGenerator, LlmGenerator, SummaryGenerator};
use parallel_life::llm::offline::OfflineGenerator;
use parallel_life::sim::controller::{ChoiceOutcome, SimulationController};
use parallel_life::store::JsonStore;

use jiff::Timestamp;
use std::io::{self, Write};
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "parallel_life=info".into()),
        )
        .init();

    tracing::info!("Parallel Life starting...");

    let rt = Runtime::new()?;

    let store_path =
        std::env::var("LIFE_STORE").unwrap_or_else(|_| "parallel_life.json".into());
    let store = JsonStore::open(store_path)?;

    let owner = std::env::var("USER").unwrap_or_else(|_| "player".into());
    let config = SimulationConfig::default();
    if let Err(e) = config.validate() {
        tracing::error!("invalid configuration: {e}");
    }

    println!("\n=== PARALLEL LIFE ===");
    println!("Live an alternate life, one milestone at a time");
    println!();
    println!("Commands:");
    println!("  new <country> <education> <personality> <career> <risk>");
    println!("                   - Start a new life");
    println!("  resume / r       - Catch up with your life");
    println!("  choose <n>       - Pick choice n of the pending event");
    println!("  continue / c     - Acknowledge an event without choices");
    println!("  status / s       - Show age, stats and wealth");
    println!("  timeline / t     - Show the event history");
    println!("  top              - Leaderboard of finished lives");
    println!("  end              - End this life now");
    println!("  restart          - Discard a finished life and start over");
    println!("  quit / q         - Exit");
    println!();

    // Prefer the real generator, fall back to canned events.
    match LlmGenerator::from_env() {
        Ok(generator) => {
            let ctl = SimulationController::new(config, generator, store);
            run(&rt, ctl, &owner)
        }
        Err(_) => {
            tracing::warn!("LLM_API_KEY not set - using the offline event generator");
            let ctl = SimulationController::new(config, OfflineGenerator, store);
            run(&rt, ctl, &owner)
        }
    }
}

fn run<Gen>(
    rt: &Runtime,
    mut ctl: SimulationController<Gen, JsonStore>,
    owner: &str,
) -> Result<()>
where
    Gen: EventGenerator + SummaryGenerator,
{
    // Pick up where the player left off, if a life exists.
    match rt.block_on(ctl.resume(owner, Timestamp::now())) {
        Ok(event) => {
            display_status(ctl.simulation());
            display_event(&event);
        }
        Err(LifeSimError::NoActiveLife(_)) => {
            println!("No life in progress. Start one with `new`.");
        }
        Err(e) => println!("Could not resume: {e}"),
    }

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if let Some(rest) = input.strip_prefix("new") {
            let parts: Vec<&str> = rest.split_whitespace().collect();
            if parts.len() != 5 {
                println!("Usage: new <country> <education> <personality> <career> <risk>");
                continue;
            }
            let profile = Profile::new(parts[0], parts[1], parts[2], parts[3], parts[4]);
            match rt.block_on(ctl.start_life(owner, profile, Timestamp::now())) {
                Ok(event) => {
                    display_status(ctl.simulation());
                    display_event(&event);
                }
                Err(e) => println!("Could not start a life: {e}"),
            }
            continue;
        }

        match input {
            "resume" | "r" => match rt.block_on(ctl.resume(owner, Timestamp::now())) {
                Ok(event) => {
                    display_status(ctl.simulation());
                    display_event(&event);
                }
                Err(e) => report(&e),
            },
            "continue" | "c" => submit(rt, &mut ctl, owner, NO_CHOICE),
            "status" | "s" => display_status(ctl.simulation()),
            "timeline" | "t" => display_timeline(ctl.simulation()),
            "top" => display_leaderboard(&ctl),
            "end" => match rt.block_on(ctl.end_life(owner)) {
                Ok(narrative) => {
                    println!("\n--- Your life, in summary ---\n{narrative}\n");
                }
                Err(e) => report(&e),
            },
            "restart" => match ctl.restart(owner) {
                Ok(()) => println!("Ready for a new life. Use `new` to begin."),
                Err(e) => report(&e),
            },
            _ => {
                if let Some(n) = input.strip_prefix("choose ").and_then(|s| s.parse().ok()) {
                    submit(rt, &mut ctl, owner, n);
                } else {
                    println!("Unknown command. Try: new, resume, choose <n>, continue, status, timeline, top, end, restart, quit");
                }
            }
        }
    }

    if let Some(sim) = ctl.simulation() {
        println!(
            "\nGoodbye! {} is {} years old after {} events.",
            sim.owner,
            sim.current_age(),
            sim.life_events.len()
        );
    }
    Ok(())
}

fn submit<Gen>(
    rt: &Runtime,
    ctl: &mut SimulationController<Gen, JsonStore>,
    owner: &str,
    chosen: i32,
) where
    Gen: EventGenerator + SummaryGenerator,
{
    match rt.block_on(ctl.submit_choice(owner, chosen)) {
        Ok(ChoiceOutcome::Continued { next_event }) => {
            display_status(ctl.simulation());
            display_event(&next_event);
        }
        Ok(ChoiceOutcome::Terminated { narrative }) => {
            display_status(ctl.simulation());
            println!("\n--- Your life, in summary ---\n{narrative}\n");
            println!("Use `restart` to begin a new life, or `top` for the leaderboard.");
        }
        Err(e) => report(&e),
    }
}

fn report(e: &LifeSimError) {
    if e.is_retryable() {
        println!("{e} - try again in a moment.");
    } else {
        println!("{e}");
    }
}

fn display_status(sim: Option<&Simulation>) {
    let Some(sim) = sim else {
        println!("No life loaded.");
        return;
    };
    let state = if sim.is_alive { "alive" } else { "ended" };
    println!();
    println!(
        "--- {} | Age {} years, {} months | {} ---",
        sim.owner,
        sim.current_age(),
        sim.months_this_year(),
        state
    );
    println!(
        "  Happiness {:>3}/100 | Health {:>3}/100 | Legacy {:>3}/100 | Wealth: {}",
        sim.stats.happiness, sim.stats.health, sim.stats.legacy, sim.wealth_tier
    );
    println!();
}

fn display_event(event: &LifeEvent) {
    println!("== {} (age {}) ==", event.title, event.age);
    println!("{}", event.description);
    if event.choices.is_empty() {
        println!("  [continue to acknowledge]");
    } else {
        println!("What will you do?");
        for (i, choice) in event.choices.iter().enumerate() {
            println!("  {i}. {}", choice.text);
        }
    }
}

fn display_timeline(sim: Option<&Simulation>) {
    let Some(sim) = sim else {
        println!("No life loaded.");
        return;
    };
    if sim.life_events.is_empty() {
        println!("Nothing has happened yet.");
        return;
    }
    for event in &sim.life_events {
        let mark = if event.completed { "x" } else { " " };
        println!("  [{mark}] age {:>2}: {} ({:?})", event.age, event.title, event.kind);
    }
}

fn display_leaderboard<Gen>(ctl: &SimulationController<Gen, JsonStore>)
where
    Gen: EventGenerator + SummaryGenerator,
{
    match ctl.leaderboard(10) {
        Ok(entries) if entries.is_empty() => println!("No finished lives yet."),
        Ok(entries) => {
            println!("Rank | Legacy | Age | Wealth        | Owner");
            for (rank, sim) in entries.iter().enumerate() {
                println!(
                    "{:>4} | {:>6} | {:>3} | {:<13} | {}",
                    rank + 1,
                    sim.stats.legacy,
                    sim.current_age(),
                    sim.wealth_tier.label(),
                    sim.owner
                );
            }
        }
        Err(e) => println!("Could not load leaderboard: {e}"),
    }
}
