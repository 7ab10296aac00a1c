mod display;

use anyhow::Context;
use caster_insights::api::{GlobalSummary, StatsApiClient};
use caster_insights::config::Config;
use caster_insights::error::AppError;
use caster_insights::{logging, tournament, MatchupReport, ReportOptions};
use clap::Parser;
use display::output::{display_error, display_global, display_info, display_report, display_success};
use indicatif::ProgressBar;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "Caster Insights")]
#[command(about = "Pre-match talking points for an esports matchup", long_about = None)]
struct Args {
    /// Tournament data file (JSON array of map records, or an object with `maps`)
    file: PathBuf,

    /// First team
    team_a: String,

    /// Second team
    team_b: String,

    /// Number of recent maps in the form window (default: 5)
    #[arg(short, long)]
    form_window: Option<usize>,

    /// Minimum maps played to appear in the player spotlight (default: 2)
    #[arg(short, long)]
    min_maps: Option<usize>,

    /// Only use maps from this division
    #[arg(short, long)]
    division: Option<String>,

    /// Also query the stats service configured via STATS_API_URL
    #[arg(short, long)]
    global: bool,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    report: &'a MatchupReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    global: Option<&'a GlobalSummary>,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(window) = args.form_window {
        config.form_window = window;
    }
    if let Some(min_maps) = args.min_maps {
        config.spotlight_min_maps = min_maps;
    }

    let mut maps = tournament::load_maps(&args.file)
        .with_context(|| format!("Loading tournament data from {}", args.file.display()))?;
    if let Some(division) = &args.division {
        maps = tournament::filter_division(maps, division);
    }
    if maps.is_empty() {
        return Err(AppError::NoMaps(args.file.display().to_string()).into());
    }
    for team in [&args.team_a, &args.team_b] {
        if !tournament::has_team(&maps, team) {
            return Err(AppError::UnknownTeam(team.clone()).into());
        }
    }
    tracing::info!(maps = maps.len(), team_a = %args.team_a, team_b = %args.team_b, "Loaded tournament data");

    let options = ReportOptions {
        form_window: config.form_window,
        spotlight_min_maps: config.spotlight_min_maps,
    };
    let report = MatchupReport::build(&args.team_a, &args.team_b, &maps, &options);

    let global = if args.global {
        fetch_global(&config, &report, args.json)
    } else {
        None
    };

    if args.json {
        let output = JsonOutput {
            report: &report,
            global: global.as_ref(),
        };
        let json = serde_json::to_string_pretty(&output).context("Serializing report")?;
        println!("{}", json);
    } else {
        display_report(&report);
        if let Some(global) = &global {
            display_global(&report.team_a, &report.team_b, global);
        }
    }

    Ok(())
}

/// Cross-tournament lookups. Never fails the run: a missing service or failed
/// endpoints only leave gaps in the summary.
fn fetch_global(config: &Config, report: &MatchupReport, quiet: bool) -> Option<GlobalSummary> {
    let Some(client) = StatsApiClient::from_config(config) else {
        tracing::warn!("--global requested but STATS_API_URL is not set");
        if !quiet {
            display_info("STATS_API_URL not set, skipping global stats");
        }
        return None;
    };

    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_message("Fetching global stats");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let global = client.fetch_matchup(&report.team_a, &report.team_b);

    spinner.finish_and_clear();
    if !quiet {
        display_success(&format!(
            "Global stats: {}/{} lookups succeeded",
            global.succeeded(),
            global.outcomes.len()
        ));
    }

    Some(global.summary(config.form_window))
}
