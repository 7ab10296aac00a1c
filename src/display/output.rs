use caster_insights::analysis::common_opponents::{Advantage, CommonOpponents};
use caster_insights::analysis::head_to_head::HeadToHead;
use caster_insights::analysis::insights::{Insight, InsightKind};
use caster_insights::analysis::map_stats::{best_and_worst_map, MapStats};
use caster_insights::analysis::player_stats::{PlayerStats, PlayerTrend, Spotlight};
use caster_insights::analysis::recent_form::{FormTrend, RecentForm};
use caster_insights::analysis::Outcome;
use caster_insights::api::GlobalSummary;
use caster_insights::MatchupReport;
use colored::*;
use std::collections::{BTreeMap, BTreeSet};
use tabled::{builder::Builder, settings::Style, Table, Tabled};

#[derive(Tabled)]
struct HeadToHeadRow {
    #[tabled(rename = "#")]
    number: String,
    map: String,
    date: String,
    score: String,
    winner: String,
}

#[derive(Tabled)]
struct FormRow {
    #[tabled(rename = "#")]
    number: String,
    date: String,
    opponent: String,
    map: String,
    score: String,
    result: String,
}

#[derive(Tabled)]
struct OpponentRow {
    opponent: String,
    team_a: String,
    team_b: String,
    edge: String,
}

#[derive(Tabled)]
struct PlayerRow {
    rank: String,
    player: String,
    team: String,
    maps: String,
    kd: String,
    frags_per_map: String,
    trend: String,
}

fn header(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}\n", "=".repeat(60).cyan());
}

fn rounded<T: Tabled>(rows: Vec<T>) -> Table {
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table
}

pub fn display_report(report: &MatchupReport) {
    println!(
        "\n{}",
        format!("🎙️  Caster notes: {} vs {}", report.team_a, report.team_b)
            .bold()
            .cyan()
    );

    display_insights(&report.insights);
    display_head_to_head(&report.head_to_head);
    display_form(&report.team_a, &report.form_a);
    display_form(&report.team_b, &report.form_b);
    display_map_pool(&report.team_a, &report.maps_a, &report.team_b, &report.maps_b);
    display_common_opponents(&report.team_a, &report.team_b, &report.common_opponents);
    display_roster(&report.team_a, &report.roster_a);
    display_roster(&report.team_b, &report.roster_b);
    display_spotlight(&report.spotlight);
}

pub fn display_insights(insights: &[Insight]) {
    header("💬 TALKING POINTS");

    for (idx, insight) in insights.iter().enumerate() {
        let tag = match insight.kind {
            InsightKind::Advantage => "EDGE".green(),
            InsightKind::Consistency => "CONSISTENCY".blue(),
            InsightKind::Momentum => "MOMENTUM".yellow(),
            InsightKind::History => "HISTORY".magenta(),
        };
        println!("{}. [{}] {}", idx + 1, tag.bold(), insight.text);
    }
    println!();
}

pub fn display_head_to_head(h2h: &HeadToHead) {
    header(&format!("⚔️  HEAD TO HEAD: {} vs {}", h2h.team_a, h2h.team_b));

    if h2h.total_maps == 0 {
        println!("{}", "No previous meetings".yellow());
        return;
    }

    println!(
        "{} {} {} - {} {} ({} draws), frags {}-{}\n",
        "📈 Maps:".bold(),
        h2h.team_a,
        h2h.team_a_wins.to_string().green(),
        h2h.team_b_wins.to_string().red(),
        h2h.team_b,
        h2h.draws(),
        h2h.team_a_frags,
        h2h.team_b_frags
    );

    let rows: Vec<HeadToHeadRow> = h2h
        .per_map
        .iter()
        .enumerate()
        .map(|(idx, m)| {
            let winner = match Outcome::from_scores(m.team_a_score, m.team_b_score) {
                Outcome::Win => h2h.team_a.clone(),
                Outcome::Loss => h2h.team_b.clone(),
                Outcome::Draw => "draw".to_string(),
            };
            HeadToHeadRow {
                number: format!("{}", idx + 1),
                map: m.map.clone(),
                date: m.date.clone().unwrap_or_else(|| "-".to_string()),
                score: format!("{}-{}", m.team_a_score, m.team_b_score),
                winner,
            }
        })
        .collect();

    println!("{}\n", rounded(rows));
}

pub fn display_form(team: &str, form: &RecentForm) {
    header(&format!("📊 RECENT FORM: {}", team));

    if form.total_maps == 0 {
        println!("{}", "No maps played yet".yellow());
        return;
    }

    let trend = match form.trend {
        FormTrend::Rising => "rising".green(),
        FormTrend::Falling => "falling".red(),
        FormTrend::Stable => "stable".normal(),
    };
    let streak = match form.streak_type {
        Some(outcome) => format!("{}{}", form.streak, outcome.letter()),
        None => "-".to_string(),
    };
    println!(
        "{} {} over the last {} of {} maps | momentum {:.2} | trend {} | streak {}\n",
        "📈 Record:".bold(),
        form.record,
        form.last_n_results.len(),
        form.total_maps,
        form.momentum,
        trend,
        streak
    );

    let rows: Vec<FormRow> = form
        .last_n_results
        .iter()
        .enumerate()
        .map(|(idx, r)| FormRow {
            number: format!("{}", idx + 1),
            date: r.date.clone().unwrap_or_else(|| "-".to_string()),
            opponent: r.opponent.clone(),
            map: r.map.clone(),
            score: format!("{}-{}", r.frags_for, r.frags_against),
            result: match r.outcome {
                Outcome::Win => "WIN".green().to_string(),
                Outcome::Loss => "LOSS".red().to_string(),
                Outcome::Draw => "DRAW".yellow().to_string(),
            },
        })
        .collect();

    println!("{}\n", rounded(rows));
}

fn map_cell(stats: Option<&MapStats>) -> String {
    match stats {
        Some(s) => format!(
            "{}W-{}L ({:.0}%) {:+}",
            s.wins,
            s.losses,
            s.win_rate * 100.0,
            s.avg_frag_diff
        ),
        None => "-".to_string(),
    }
}

pub fn display_map_pool(
    team_a: &str,
    maps_a: &BTreeMap<String, MapStats>,
    team_b: &str,
    maps_b: &BTreeMap<String, MapStats>,
) {
    header("🗺️  MAP POOL");

    let names: BTreeSet<&String> = maps_a.keys().chain(maps_b.keys()).collect();
    if names.is_empty() {
        println!("{}", "No maps recorded".yellow());
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(["map".to_string(), team_a.to_string(), team_b.to_string()]);
    for name in names {
        builder.push_record([
            name.clone(),
            map_cell(maps_a.get(name)),
            map_cell(maps_b.get(name)),
        ]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{}", table);

    for (team, maps) in [(team_a, maps_a), (team_b, maps_b)] {
        if let Some((best, worst)) = best_and_worst_map(maps, 2) {
            if best != worst {
                println!("• {} is strongest on {} and weakest on {}", team, best.green(), worst.red());
            }
        }
    }
    println!();
}

pub fn display_common_opponents(team_a: &str, team_b: &str, common: &CommonOpponents) {
    header("🔗 COMMON OPPONENTS");

    if common.breakdown.is_empty() {
        println!("{}", "No common opponents".yellow());
        return;
    }

    let rows: Vec<OpponentRow> = common
        .breakdown
        .iter()
        .map(|e| OpponentRow {
            opponent: e.opponent.clone(),
            team_a: format!("{}W-{}L ({:+})", e.team_a.wins, e.team_a.losses, e.team_a.frag_diff),
            team_b: format!("{}W-{}L ({:+})", e.team_b.wins, e.team_b.losses, e.team_b.frag_diff),
            edge: match e.advantage {
                Advantage::Team1 => team_a.green().to_string(),
                Advantage::Team2 => team_b.green().to_string(),
                Advantage::Even => "even".to_string(),
            },
        })
        .collect();

    println!("{}", rounded(rows));

    let s = &common.summary;
    println!(
        "\n{} {} edges: {} {} | {} {} | avg dominance {:.0}% vs {:.0}%\n",
        "Summary".bold().yellow(),
        s.common_count,
        team_a,
        s.team_a_advantages,
        team_b,
        s.team_b_advantages,
        s.team_a_avg_dominance * 100.0,
        s.team_b_avg_dominance * 100.0
    );
}

fn player_rows(players: &[PlayerStats]) -> Vec<PlayerRow> {
    players
        .iter()
        .enumerate()
        .map(|(idx, p)| PlayerRow {
            rank: format!("#{}", idx + 1),
            player: p.name.clone(),
            team: p.team.clone(),
            maps: format!("{}", p.maps_played),
            kd: format!("{:.2}", p.kd_ratio),
            frags_per_map: format!("{:.1}", p.frags_per_map),
            trend: match p.trend {
                PlayerTrend::Hot => "🔥 hot".red().to_string(),
                PlayerTrend::Cold => "🧊 cold".blue().to_string(),
                PlayerTrend::Steady => "steady".to_string(),
            },
        })
        .collect()
}

pub fn display_roster(team: &str, roster: &[PlayerStats]) {
    header(&format!("👥 ROSTER: {}", team));

    if roster.is_empty() {
        println!("{}", "No player lines recorded".yellow());
        return;
    }

    println!("{}\n", rounded(player_rows(roster)));
}

pub fn display_spotlight(spotlight: &Spotlight) {
    header("🌟 PLAYER SPOTLIGHT");

    if spotlight.hot_hands.is_empty() {
        println!("{}", "Not enough player data".yellow());
        return;
    }

    println!("{}", "Hot hands".bold().green());
    println!("{}\n", rounded(player_rows(&spotlight.hot_hands)));
    println!("{}", "Struggling".bold().red());
    println!("{}\n", rounded(player_rows(&spotlight.struggling)));
}

pub fn display_global(team_a: &str, team_b: &str, global: &GlobalSummary) {
    header("🌍 GLOBAL STATS");

    match &global.head_to_head {
        Some(h2h) => println!(
            "• All-time head-to-head: {} {}-{} {} over {} maps",
            team_a, h2h.team_a_wins, h2h.team_b_wins, team_b, h2h.total_maps
        ),
        None => println!("• All-time head-to-head: {}", "no data".dimmed()),
    }

    for (team, form, maps, roster) in [
        (team_a, &global.form_a, &global.maps_a, &global.roster_a),
        (team_b, &global.form_b, &global.maps_b, &global.roster_b),
    ] {
        let form_text = form
            .as_ref()
            .map(|f| format!("{} (momentum {:.2})", f.record, f.momentum))
            .unwrap_or_else(|| "no data".to_string());
        let map_text = maps
            .as_ref()
            .and_then(|m| best_and_worst_map(m, 1))
            .map(|(best, _)| format!("best map {}", best))
            .unwrap_or_else(|| "no map data".to_string());
        let roster_text = roster
            .as_ref()
            .map(|r| r.join(", "))
            .unwrap_or_else(|| "no roster".to_string());

        println!("• {}: {} | {} | {}", team.bold(), form_text, map_text, roster_text);
    }

    if !global.failures.is_empty() {
        println!(
            "\n{} {} lookup(s) failed:",
            "⚠️".yellow(),
            global.failures.len()
        );
        for failure in &global.failures {
            println!("  {}", failure.dimmed());
        }
    }
    println!();
}

pub fn display_error(error: &str) {
    eprintln!("{} {}", "❌ Error:".red().bold(), error);
}

pub fn display_info(message: &str) {
    eprintln!("{} {}", "ℹ️".cyan(), message);
}

pub fn display_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}
