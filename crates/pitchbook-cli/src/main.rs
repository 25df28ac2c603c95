//! pitchbook - football academy records from the command line.

mod report;

use std::io;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use pitchbook_core::cache::CacheManager;
use pitchbook_core::config::{Config, DataSource};
use pitchbook_core::models::{AttendanceStatus, Player, RosterEntry, Team};
use pitchbook_core::repository::{Backend, Repository, Snapshot};
use pitchbook_core::select::{
    find_player, latest_evaluation_by_player, search_evaluations, search_players,
    search_subscriptions, select_by_player, select_by_team, select_in_date_range, sort_by_date,
    SortOrder,
};
use pitchbook_core::stats::{build_dashboard_summary, compute_attendance_stats, compute_average_ratings};
use pitchbook_core::views::{
    build_attendance_rows, build_bar_series, build_evaluation_rows, build_player_radar,
    build_radar_series, build_subscription_rows, build_trend_series, ComparisonSelection,
};
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use report::Profile;

#[derive(Parser)]
#[command(name = "pitchbook")]
#[command(about = "Football academy players, evaluations and attendance", long_about = None)]
struct Cli {
    /// Data source: fixture (built-in sample) or remote (hosted database)
    #[arg(long, global = true)]
    source: Option<DataSource>,

    /// Read from the local cache only
    #[arg(long, global = true)]
    offline: bool,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List players
    Players {
        #[arg(long)]
        team: Option<Team>,

        /// Match name, national ID or team
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one player's profile
    Player { id: String },

    /// Compare up to three players on their latest evaluations
    Compare {
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show a player's ratings over time
    Trend { id: String },

    /// List evaluations, newest first
    Evaluations {
        #[arg(long)]
        team: Option<Team>,

        /// Match player name
        #[arg(long)]
        search: Option<String>,
    },

    /// Attendance summary for a team
    Attendance {
        #[arg(long)]
        team: Team,

        #[arg(long)]
        from: Option<NaiveDate>,

        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Record a training session; everyone not listed is marked present
    Record {
        #[arg(long)]
        team: Team,

        /// Session date, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, value_name = "ID")]
        absent: Vec<String>,

        #[arg(long, value_name = "ID")]
        late: Vec<String>,
    },

    /// Academy overview
    Dashboard,

    /// List subscriptions and their status
    Subscriptions {
        /// Match player name or plan
        #[arg(long)]
        search: Option<String>,

        /// Evaluate status on this date instead of today
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

/// Print `value` as JSON, or the text rendering.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}

fn require_player<'a>(players: &'a [Player], id: &str) -> Result<&'a Player> {
    find_player(players, id).with_context(|| format!("No player with id {}", id))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    init_tracing();

    let mut config = Config::load()?;
    config.apply_env(|name| std::env::var(name).ok())?;
    if let Some(source) = cli.source {
        config.source = source;
    }
    debug!(source = %config.source, offline = cli.offline, "Starting");

    let repo = Backend::from_config(&config, cli.offline)?;
    run(cli.command, cli.json, repo.as_ref(), &config).await
}

async fn run(command: Commands, json: bool, repo: &dyn Repository, config: &Config) -> Result<()> {
    let today = Local::now().date_naive();
    let snapshot = Snapshot::load(repo).await?;
    let Snapshot {
        players,
        evaluations,
        attendance,
        subscriptions,
    } = &snapshot;

    match command {
        Commands::Players { team, search } => {
            let matched = search_players(players, search.as_deref().unwrap_or(""));
            let matched = match team {
                Some(t) => select_by_team(matched, t),
                None => matched,
            };
            emit(json, &matched, || report::players_table(&matched, today))
        }
        Commands::Player { id } => {
            let player = require_player(players, &id)?;
            let own = select_by_player(evaluations, &id);
            let latest = latest_evaluation_by_player(own.iter().copied());
            let profile = Profile {
                player,
                averages: compute_average_ratings(own.iter().copied()),
                latest: latest.get(&id).map(|e| build_player_radar(e)),
                attendance: compute_attendance_stats(select_by_player(attendance, &id)),
                subscriptions: select_by_player(subscriptions, &id),
            };
            emit(json, &profile, || report::player_profile(&profile, today))
        }
        Commands::Compare { ids } => {
            let selection = ComparisonSelection::from_ids(ids)?;
            for id in selection.ids() {
                require_player(players, id)?;
            }
            let chosen = selection.players(players);
            let latest = latest_evaluation_by_player(evaluations);
            let radar = build_radar_series(&chosen, &latest);
            let bars = build_bar_series(&chosen, &latest);
            let value = serde_json::json!({ "radar": radar, "bars": bars });
            emit(json, &value, || report::comparison(&radar, &bars))
        }
        Commands::Trend { id } => {
            let player = require_player(players, &id)?;
            let points = build_trend_series(select_by_player(evaluations, &id));
            emit(json, &points, || report::trend_table(player, &points))
        }
        Commands::Evaluations { team, search } => {
            let matched = search_evaluations(evaluations, players, search.as_deref().unwrap_or(""), team);
            let rows = build_evaluation_rows(sort_by_date(matched, SortOrder::Descending), players);
            emit(json, &rows, || report::evaluations_table(&rows))
        }
        Commands::Attendance { team, from, to } => {
            if let (Some(f), Some(t)) = (from, to) {
                if f > t {
                    bail!("--from {} is after --to {}", f, t);
                }
            }
            let roster = select_by_team(players, team);
            let in_range: Vec<_> = select_in_date_range(attendance, from, to)
                .into_iter()
                .cloned()
                .collect();
            let rows = build_attendance_rows(&roster, &in_range);
            emit(json, &rows, || report::attendance_table(&rows))
        }
        Commands::Dashboard => {
            let summary = build_dashboard_summary(players, evaluations.len(), attendance.len());
            let ages = match config.source {
                DataSource::Remote => config
                    .cache_dir()
                    .and_then(CacheManager::new)
                    .map(|cache| cache.get_cache_ages())
                    .ok(),
                DataSource::Fixture => None,
            };
            emit(json, &summary, || {
                report::dashboard(config.academy_name(), &summary, ages)
            })
        }
        Commands::Subscriptions { search, as_of } => {
            let as_of = as_of.unwrap_or(today);
            let matched = search_subscriptions(subscriptions, players, search.as_deref().unwrap_or(""));
            let rows = build_subscription_rows(matched, players, as_of);
            emit(json, &rows, || report::subscriptions_table(&rows))
        }
        Commands::Record {
            team,
            date,
            absent,
            late,
        } => {
            let date = date.unwrap_or(today);
            let roster = select_by_team(players, team);
            if roster.is_empty() {
                bail!("No players on the {} team", team);
            }
            let entries = roster_entries(&roster, &absent, &late)?;
            if config.source == DataSource::Fixture {
                warn!("Recording into the built-in sample data; the session is not kept after exit");
            }
            record(repo, json, &roster, team, date, entries).await
        }
    }
}

/// Roster entries for one session: everyone on `roster` is present unless
/// listed. Listed ids that are not on the roster are passed through for the
/// store to reject.
fn roster_entries(roster: &[&Player], absent: &[String], late: &[String]) -> Result<Vec<RosterEntry>> {
    if let Some(id) = absent.iter().find(|id| late.contains(id)) {
        bail!("Player {} is listed as both absent and late", id);
    }

    let mut entries: Vec<RosterEntry> = roster.iter().map(|p| RosterEntry::present(p.id.clone())).collect();
    for (ids, status) in [(absent, AttendanceStatus::Absent), (late, AttendanceStatus::Late)] {
        for id in ids {
            match entries.iter_mut().find(|e| &e.player_id == id) {
                Some(entry) => entry.status = status,
                None => entries.push(RosterEntry {
                    player_id: id.clone(),
                    status,
                    notes: None,
                }),
            }
        }
    }
    Ok(entries)
}

/// Save one session for `roster` and print the result.
async fn record(
    repo: &dyn Repository,
    json: bool,
    roster: &[&Player],
    team: Team,
    date: NaiveDate,
    entries: Vec<RosterEntry>,
) -> Result<()> {
    let saved = repo.record_attendance(team, date, entries).await?;
    info!(team = %team, date = %date, count = saved.len(), "Session recorded");

    let rows = build_attendance_rows(roster, &saved);
    emit(json, &saved, || {
        format!(
            "Recorded {} player(s) for {} on {}\n\n{}",
            saved.len(),
            team,
            date,
            report::attendance_table(&rows)
        )
    })
}
