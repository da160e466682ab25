//! review-runner: headless review run for the data catalogue.
//!
//! Usage:
//!   review-runner --db catalogue.db
//!   review-runner --fixture data/demo_catalogue.json --now 2024-12-15
//!   review-runner --db catalogue.db --update-only --owner u-alice

use anyhow::Result;
use review_core::{
    clock::{Clock, FixedClock, SystemClock},
    config::ReviewConfig,
    engine::{ReviewEngine, RunReport},
    fixture::Fixture,
    item::parse_date,
    repository::ItemFilter,
    store::ReviewStore,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = arg_value(&args, "--db").unwrap_or(":memory:");
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let fixture = arg_value(&args, "--fixture");
    let owner = arg_value(&args, "--owner");
    let update_only = args.iter().any(|a| a == "--update-only");

    let clock: Box<dyn Clock> = match arg_value(&args, "--now") {
        Some(date) => Box::new(FixedClock::at_date(parse_date(date)?)),
        None => Box::new(SystemClock),
    };

    println!("Data Catalogue: review-runner");
    println!("  db:        {db}");
    println!("  data_dir:  {data_dir}");
    println!("  now:       {}", clock.now().format("%Y-%m-%d %H:%M UTC"));
    println!();

    let config = ReviewConfig::load(data_dir)?;
    let store = ReviewStore::open(db)?;
    store.migrate()?;

    if let Some(path) = fixture {
        Fixture::read(path)?.load_into(&store)?;
    }

    let mut filter = ItemFilter::reviewable();
    if let Some(owner_id) = owner {
        filter = filter.for_owner(owner_id);
    }

    let engine = ReviewEngine::new(config, clock, store)?;
    let report = if update_only {
        engine.run_updates_only(&filter)?
    } else {
        engine.run(&filter)?
    };

    print_summary(&engine, &report, update_only)
}

fn print_summary(engine: &ReviewEngine, report: &RunReport, update_only: bool) -> Result<()> {
    let u = &report.update;
    println!("=== RUN SUMMARY ===");
    println!("  run_id:        {}", report.run_id);
    println!("  evaluated:     {}", u.evaluated);
    println!("  changed:       {}", u.changed);
    println!("  write errors:  {}", u.failed);
    println!("  needed:        {}", u.needed);
    println!("  overdue:       {}", u.overdue);

    if !update_only {
        let d = &report.dispatch;
        println!();
        println!("=== REMINDERS ===");
        println!("  sent:          {}", d.sent);
        println!("  failed:        {}", d.failed);
        println!("  no address:    {}", d.no_address);
        println!("  empty:         {}", d.empty);
        for (owner_id, result) in &report.results {
            println!("    {owner_id:<16} {}", result.as_str());
        }
    }

    println!();
    println!("=== STORED STATUS ===");
    for (status, count) in engine.store().status_counts()? {
        println!("  {:<8} {count}", status.as_str());
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
