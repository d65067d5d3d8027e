//! Shared types for the simulator.

use clap::ValueEnum;

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// One JSON object per game, written as games finish.
    Jsonl,
    /// One JSON array, written when the run ends.
    Json,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum MetricsLevel {
    /// Outcome only.
    Basic,
    /// Outcome plus per-day and per-seat breakdowns.
    Detailed,
}
