//! AI Simulator CLI - headless werewolf games for decision service evaluation.
//!
//! Runs whole games in memory through the orchestration service, with the
//! human seat answered by a seeded random player.

mod metrics;
mod output;
mod simulator;
mod types;

use std::time::Instant;

use clap::Parser;
use metrics::{build_game_metrics, GameConfig};
use output::OutputWriter;
use simulator::{GameResult, Simulator};
use tracing::{info, warn};
use types::{MetricsLevel, OutputFormat};
use werewolf_backend::ai::{by_name, registered_ais, FactoryArgs};
use werewolf_backend::domain::roles::Alignment;
use werewolf_backend::domain::rules::TableSetup;
use werewolf_backend::services::game_flow::FlowConfig;

#[derive(Parser)]
#[command(name = "ai-simulator")]
#[command(about = "Headless werewolf simulator for decision service evaluation")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Seats at the table (6..=12)
    #[arg(long, default_value = "8")]
    seat_count: u8,

    /// Seat answered by the scripted human
    #[arg(long, default_value = "0")]
    human_seat: u8,

    /// Registered decision service for autonomous seats
    #[arg(long, default_value = "RandomPlayer")]
    decision_service: String,

    /// Endpoint for services that need one
    #[arg(long)]
    decision_url: Option<String>,

    /// Decision calls per autonomous turn before the legal fallback
    #[arg(long, default_value = "2")]
    decision_attempts: u32,

    /// Base seed; game N uses seed + N - 1
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Show output summary and file paths
    #[arg(long)]
    show_output: bool,

    /// Output directory for results
    #[arg(long, default_value = "./simulation-results")]
    output_dir: String,

    /// Output format
    #[arg(long, default_value = "jsonl")]
    output_format: OutputFormat,

    /// Compress output files
    #[arg(long)]
    compress: bool,

    /// Metrics detail level
    #[arg(long, default_value = "detailed")]
    metrics_level: MetricsLevel,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings/errors
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let factory = by_name(&args.decision_service).ok_or_else(|| {
        let known: Vec<_> = registered_ais().iter().map(|f| f.name).collect();
        format!(
            "Unknown decision service '{}' (registered: {})",
            args.decision_service,
            known.join(", ")
        )
    })?;
    let setup = TableSetup::standard(args.seat_count, args.human_seat);
    let flow = FlowConfig {
        decision_attempts: args.decision_attempts.max(1),
    };

    if args.show_output {
        info!(
            games = args.games,
            seats = args.seat_count,
            decision_service = factory.name,
            "Starting AI simulator"
        );
    }

    let mut output_writer =
        OutputWriter::new(&args.output_dir, &args.output_format, args.compress)?;

    let start = Instant::now();
    let mut results = Vec::new();
    let mut errors = 0;
    let base_seed = args.seed.unwrap_or_else(rand::random);

    for game_num in 1..=args.games {
        let game_start = Instant::now();
        let seed = base_seed.wrapping_add(u64::from(game_num - 1));
        let decisions = (factory.make)(&FactoryArgs {
            seed: Some(seed),
            url: args.decision_url.as_deref(),
        })?;

        match Simulator::new(seed, game_num)
            .simulate_game(&setup, decisions, flow)
            .await
        {
            Ok(result) => {
                let duration_ms = game_start.elapsed().as_secs_f64() * 1000.0;
                let metrics = build_game_metrics(
                    game_num,
                    seed,
                    GameConfig {
                        decision_service: factory.name.to_string(),
                        seat_count: args.seat_count,
                        human_seat: args.human_seat,
                        total_games: args.games,
                    },
                    &result,
                    duration_ms,
                    &args.metrics_level,
                );
                if let Err(e) = output_writer.write_game(&metrics) {
                    warn!("Failed to write metrics for game {}: {}", game_num, e);
                }
                if args.verbose {
                    info!(game_num, winner = ?result.state.winner, days = result.state.day, "Game completed");
                }
                results.push(result);
            }
            Err(e) => {
                errors += 1;
                warn!("Game {} failed: {}", game_num, e);
            }
        }
    }

    let elapsed = start.elapsed();
    let (detail_path, csv_path) = output_writer.output_paths();
    let (detail_path, csv_path) = (detail_path.to_path_buf(), csv_path.to_path_buf());
    output_writer.finish()?;

    if args.show_output {
        info!("Detailed results written to: {}", detail_path.display());
        info!("Summary CSV written to: {}", csv_path.display());
        print_summary(&results, errors, elapsed, args.games);
    }

    Ok(())
}

fn print_summary(results: &[GameResult], errors: u32, elapsed: std::time::Duration, total: u32) {
    println!("\n=== Simulation Summary ===");
    println!("Games completed: {}/{}", results.len(), total);
    if errors > 0 {
        println!("Errors: {}", errors);
    }
    println!("Total time: {:?}", elapsed);
    if results.is_empty() {
        return;
    }
    println!(
        "Average time per game: {:?}",
        elapsed / results.len() as u32
    );

    let games = results.len() as f64;
    let wolf_wins = results
        .iter()
        .filter(|r| r.state.winner == Some(Alignment::Wolf))
        .count();
    let village_wins = results
        .iter()
        .filter(|r| r.state.winner == Some(Alignment::Village))
        .count();
    let total_days: u64 = results.iter().map(|r| u64::from(r.state.day)).sum();
    let human_survived = results
        .iter()
        .filter(|r| {
            r.state
                .human_seat()
                .is_some_and(|seat| r.state.is_alive(seat))
        })
        .count();

    println!("\n=== Results ===");
    println!(
        "Village wins: {} ({:.1}%)",
        village_wins,
        village_wins as f64 / games * 100.0
    );
    println!(
        "Wolf wins: {} ({:.1}%)",
        wolf_wins,
        wolf_wins as f64 / games * 100.0
    );
    println!("Average days: {:.2}", total_days as f64 / games);
    println!(
        "Human survived: {} ({:.1}%)",
        human_survived,
        human_survived as f64 / games * 100.0
    );
}
