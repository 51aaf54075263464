//! lead-sim: headless week simulation for the lead scheduler.
//!
//! Usage:
//!   lead-sim --seed 12345
//!   lead-sim --scenario scenarios/reference_week.json --db run.db
//!   lead-sim --start 2024-03-04

use anyhow::{Context, Result};
use chrono::NaiveDate;
use leadflow_core::{
    clock::SchedulerClock,
    config::ScenarioConfig,
    event::EventLogEntry,
    queue,
    rng::SchedulerRng,
    store::SchedStore,
    week,
    LeadScheduler,
};
use std::collections::BTreeMap;
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut scenario = match find_arg(&args, "--scenario") {
        Some(path) => ScenarioConfig::load(path)
            .with_context(|| format!("loading scenario {path}"))?,
        None => ScenarioConfig::default(),
    };
    if let Some(seed) = find_arg(&args, "--seed").and_then(|s| s.parse().ok()) {
        scenario.seed = Some(seed);
    }
    if let Some(raw) = find_arg(&args, "--start") {
        scenario.start_date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("bad --start date {raw}"))?;
    }
    let db = find_arg(&args, "--db").unwrap_or(":memory:");

    println!("lead-sim");
    println!("  seed:   {}", scenario.seed.map_or("entropy".to_string(), |s| s.to_string()));
    println!("  start:  {}", scenario.start_date);
    println!("  days:   {}", scenario.days());
    println!("  leads:  {}", scenario.total_leads());
    println!("  db:     {db}");
    println!();

    let mut store = if db == ":memory:" {
        SchedStore::in_memory()?
    } else {
        SchedStore::open(db)?
    };
    store.migrate()?;

    let run_id = format!("run-{}", uuid::Uuid::new_v4());
    store.insert_run(&run_id, scenario.seed, env!("CARGO_PKG_VERSION"))?;

    run_scenario(&scenario, &mut store, &run_id)
}

fn run_scenario(scenario: &ScenarioConfig, store: &mut SchedStore, run_id: &str) -> Result<()> {
    let rng = match scenario.seed {
        Some(seed) => SchedulerRng::new(seed),
        None => SchedulerRng::from_entropy(),
    };
    let mut scheduler = LeadScheduler::new(rng, SchedulerClock::at_date(scenario.start_date));

    let cohort = scheduler.initialize_weekly_participation(&scenario.participants)?;
    println!("=== COHORT (week of {}) ===", cohort[0].week_start);
    for p in &cohort {
        println!(
            "  {:<16} credits={:<3} share={:.1}%",
            p.user_name,
            p.credits,
            p.target_share * 100.0
        );
    }
    println!("  total credits: {}", cohort[0].total_credits);
    flush_events(&mut scheduler, store, run_id)?;

    for (day, &lead_count) in scenario.daily_lead_counts.iter().enumerate() {
        if day > 0 {
            scheduler.clock.advance_days(1);
        }
        let today = scheduler.clock.today();
        if scheduler.week_start() != Some(week::week_start_date(today)) {
            println!();
            println!("=== NEW WEEK ({}) ===", week::week_start_date(today));
            scheduler.initialize_weekly_participation(&scenario.participants)?;
        }

        let built = scheduler.build_daily_queue(today)?;
        println!();
        println!("=== DAY {} ({today}) ===", day + 1);
        let preview: Vec<&str> = built.iter().take(10).map(|q| q.user_name.as_str()).collect();
        println!("  queue ({} slots): {}", built.len(), preview.join(" -> "));
        let mut slots: Vec<_> = queue::slot_counts(&built).into_iter().collect();
        slots.sort();
        for (user_id, n) in slots {
            println!("    {user_id}: {n} slots");
        }

        let first_new = scheduler.assignments().len();
        let mut received: BTreeMap<String, u32> = BTreeMap::new();
        for i in 0..lead_count {
            let lead_id = format!("lead-day{}-{}", day + 1, i + 1);
            let assignment = scheduler.assign_lead(lead_id)?;
            *received.entry(assignment.user_name).or_default() += 1;
        }
        for a in &scheduler.assignments()[first_new..] {
            store.record_assignment(run_id, a)?;
        }
        println!("  dispatched {lead_count} leads:");
        for (name, n) in &received {
            println!("    {name}: {n}");
        }

        let deficits = scheduler.calculate_daily_deficit(today)?;
        store.save_deficits(run_id, &deficits)?;
        println!("  deficits:");
        for d in &deficits {
            println!(
                "    {:<16} target={:>5.1} actual={:>3} deficit={:>5.1} cumulative={:>5.1}",
                d.user_name, d.target_leads, d.actual_leads, d.deficit, d.cumulative_deficit
            );
        }

        flush_events(&mut scheduler, store, run_id)?;
        store.save_snapshot(run_id, today, &scheduler.snapshot().to_json()?)?;
        log::info!("day {} persisted: date={today} leads={lead_count}", day + 1);
    }

    println!();
    println!("=== WEEKLY REPORT ===");
    println!("{}", scheduler.weekly_report());

    let total = store.assignment_count(run_id)?;
    let days = scenario.days().max(1);
    println!("  run_id:          {run_id}");
    println!("  leads persisted: {total}");
    println!("  daily average:   {:.1}", total as f64 / days as f64);
    println!(
        "  leads/credit:    {:.2}",
        total as f64 / cohort[0].total_credits as f64
    );
    Ok(())
}

fn flush_events(scheduler: &mut LeadScheduler, store: &SchedStore, run_id: &str) -> Result<()> {
    for event in scheduler.drain_events() {
        store.append_event(&EventLogEntry::from_event(run_id, &event)?)?;
    }
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
