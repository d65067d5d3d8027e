//! Per-game metrics for simulation output.

use serde::Serialize;
use werewolf_backend::domain::roles::{Alignment, Role};
use werewolf_backend::domain::state::{DeathCause, Seat};

use crate::simulator::GameResult;
use crate::types::MetricsLevel;

/// Complete game metrics for output.
#[derive(Debug, Clone, Serialize)]
pub struct GameMetrics {
    pub game_id: u32,
    pub seed: u64,
    pub timestamp: String,
    pub config: GameConfig,
    pub result: GameResultMetrics,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DayMetrics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub player_metrics: Vec<PlayerMetrics>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameConfig {
    pub decision_service: String,
    pub seat_count: u8,
    pub human_seat: Seat,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameResultMetrics {
    pub winner: Option<Alignment>,
    pub days: u32,
    pub wolves_alive: u32,
    pub villagers_alive: u32,
    pub human_survived: bool,
    pub human_actions: u32,
    pub advances: u32,
    pub duration_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NightDeath {
    pub seat: Seat,
    pub cause: DeathCause,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayMetrics {
    pub day: u32,
    pub night_deaths: Vec<NightDeath>,
    pub peaceful_night: bool,
    pub eliminated: Option<Seat>,
    pub tied: bool,
    pub hunter_shots: Vec<Seat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub seat: Seat,
    pub role: Role,
    pub alignment: Alignment,
    pub is_human: bool,
    pub survived: bool,
    pub won: bool,
    pub votes_cast: u32,
    pub votes_received: u32,
}

/// Build metrics from a finished game.
pub fn build_game_metrics(
    game_id: u32,
    seed: u64,
    config: GameConfig,
    result: &GameResult,
    duration_ms: f64,
    level: &MetricsLevel,
) -> GameMetrics {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"));

    let state = &result.state;
    let alive_with = |alignment: Alignment| {
        state
            .players
            .iter()
            .filter(|p| p.alive && p.alignment() == alignment)
            .count() as u32
    };
    let human_survived = state
        .human_seat()
        .is_some_and(|seat| state.is_alive(seat));

    let (days, player_metrics) = match level {
        MetricsLevel::Basic => (Vec::new(), Vec::new()),
        MetricsLevel::Detailed => (build_day_metrics(result), build_player_metrics(result)),
    };

    GameMetrics {
        game_id,
        seed,
        timestamp,
        config,
        result: GameResultMetrics {
            winner: state.winner,
            days: state.day,
            wolves_alive: alive_with(Alignment::Wolf),
            villagers_alive: alive_with(Alignment::Village),
            human_survived,
            human_actions: result.human_actions,
            advances: result.advances,
            duration_ms,
        },
        days,
        player_metrics,
    }
}

fn build_day_metrics(result: &GameResult) -> Vec<DayMetrics> {
    let state = &result.state;
    (1..=state.day)
        .map(|day| {
            let night = state.night_history.get(&day);
            let record = state.day_history.get(&day);
            let hunter_shots = [
                night.and_then(|n| n.hunter_shot),
                record.and_then(|r| r.hunter_shot),
            ]
            .into_iter()
            .flatten()
            .collect();

            DayMetrics {
                day,
                night_deaths: night
                    .map(|n| {
                        n.deaths
                            .iter()
                            .map(|d| NightDeath {
                                seat: d.seat,
                                cause: d.cause,
                            })
                            .collect()
                    })
                    .unwrap_or_default(),
                peaceful_night: night.is_some_and(|n| n.peaceful),
                eliminated: record.and_then(|r| r.eliminated),
                tied: record.is_some_and(|r| r.tied),
                hunter_shots,
                summary: record.and_then(|r| r.summary.clone()),
            }
        })
        .collect()
}

fn build_player_metrics(result: &GameResult) -> Vec<PlayerMetrics> {
    let state = &result.state;
    state
        .players
        .iter()
        .map(|p| {
            let votes_cast = state
                .vote_history
                .values()
                .filter(|votes| votes.contains_key(&p.seat))
                .count() as u32;
            let votes_received = state
                .day_history
                .values()
                .filter_map(|record| record.tally.get(&p.seat))
                .sum();
            PlayerMetrics {
                seat: p.seat,
                role: p.role,
                alignment: p.alignment(),
                is_human: p.is_human,
                survived: p.alive,
                won: state.winner == Some(p.alignment()),
                votes_cast,
                votes_received,
            }
        })
        .collect()
}

/// CSV summary row for quick analysis.
#[derive(Debug, Serialize)]
pub struct CsvSummaryRow {
    pub game_id: u32,
    pub seed: u64,
    pub winner: String,
    pub days: u32,
    pub wolves_alive: u32,
    pub villagers_alive: u32,
    pub human_survived: bool,
    pub decision_service: String,
    pub duration_ms: f64,
}

impl From<&GameMetrics> for CsvSummaryRow {
    fn from(metrics: &GameMetrics) -> Self {
        CsvSummaryRow {
            game_id: metrics.game_id,
            seed: metrics.seed,
            winner: match metrics.result.winner {
                Some(Alignment::Wolf) => "WOLF".to_string(),
                Some(Alignment::Village) => "VILLAGE".to_string(),
                None => "NONE".to_string(),
            },
            days: metrics.result.days,
            wolves_alive: metrics.result.wolves_alive,
            villagers_alive: metrics.result.villagers_alive,
            human_survived: metrics.result.human_survived,
            decision_service: metrics.config.decision_service.clone(),
            duration_ms: metrics.result.duration_ms,
        }
    }
}
