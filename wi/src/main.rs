use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use workoutindex::cli::{Cli, Command};
use workoutindex::config::Config;
use workoutindex::{SearchHit, SearchOptions, WorkoutIndex};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn print_hits(heading: &str, hits: &[SearchHit]) {
    if hits.is_empty() {
        return;
    }
    println!("{}", heading.bold());
    for hit in hits {
        let date = hit
            .created_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>2}. {} {} {}",
            hit.rank,
            hit.title.cyan(),
            format!("[{} / {}]", hit.workout_type, hit.track).dimmed(),
            format!("{:.3} {}", hit.distance, date).yellow()
        );
        if !hit.description.is_empty() {
            println!("      {}", hit.description.replace('\n', " "));
        }
    }
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let index_path = cli.index.clone().unwrap_or(config.index_path.clone());

    info!("workoutindex starting");

    match cli.command {
        Command::Search {
            query,
            k,
            no_warmups,
            no_cooldowns,
            json,
        } => {
            let index = WorkoutIndex::open(&index_path)?;
            let options = SearchOptions {
                include_warmups: !no_warmups,
                include_cooldowns: !no_cooldowns,
            };
            let results = index.search_grouped(&query, k.unwrap_or(config.default_top_k), &options);

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else if results.results.is_empty() && results.warmups.is_empty() && results.cooldowns.is_empty() {
                println!("No matching workouts");
            } else {
                print_hits("Workouts", &results.results);
                print_hits("Warmups", &results.warmups);
                print_hits("Cooldowns", &results.cooldowns);
            }
        }
        Command::Stats => {
            let index = WorkoutIndex::open(&index_path)?;
            let stats = index.stats();
            println!("Index: {}", index.path().display().to_string().cyan());
            println!("  Workouts: {}", stats.record_count);
            println!("  Tracks: {}", stats.track_count);
            for (category, count) in &stats.by_category {
                println!("  {}: {}", category, count);
            }
        }
    }

    Ok(())
}
