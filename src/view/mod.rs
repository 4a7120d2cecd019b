//! Markup for every screen of the race client
//!
//! All functions here are pure: the same input always yields the same
//! markup and inputs are never modified. Putting markup on screen is the
//! job of a [`Surface`].

mod surface;

pub use surface::{text_lines, MemorySurface, Mount, Surface, TerminalSurface};

use crate::models::{PositionEntry, Racer, Track};

/// Container selectors
pub const TRACKS: &str = "#tracks";
pub const RACERS: &str = "#racers";
pub const RACE: &str = "#race";
pub const LEADERBOARD: &str = "#leaderBoard";
pub const COUNTDOWN: &str = "#big-numbers";

/// Escape text placed inside markup
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn selected_class(id: u32, selected: Option<u32>) -> &'static str {
    if selected == Some(id) {
        " selected"
    } else {
        ""
    }
}

pub fn render_track_list(tracks: &[Track], selected: Option<u32>) -> String {
    if tracks.is_empty() {
        return "<h4>Loading Tracks...</h4>".to_string();
    }

    let cards: String = tracks
        .iter()
        .map(|track| {
            format!(
                r#"<li id="{}" class="card track{}"><h3>{}</h3></li>"#,
                track.id,
                selected_class(track.id, selected),
                escape(&track.name)
            )
        })
        .collect();

    format!(r#"<ul id="tracks">{}</ul>"#, cards)
}

pub fn render_racer_list(racers: &[Racer], selected: Option<u32>) -> String {
    if racers.is_empty() {
        return "<h4>Loading Racers...</h4>".to_string();
    }

    let cards: String = racers
        .iter()
        .map(|racer| {
            format!(
                concat!(
                    r#"<li class="card podracer{}" id="{}">"#,
                    "<h3>{}</h3>",
                    "<p>Speed: {}</p>",
                    "<p>Acceleration: {}</p>",
                    "<p>Handling: {}</p>",
                    "</li>"
                ),
                selected_class(racer.id, selected),
                racer.id,
                escape(&racer.driver_name),
                racer.top_speed,
                racer.acceleration,
                racer.handling
            )
        })
        .collect();

    format!(r#"<ul id="racers">{}</ul>"#, cards)
}

pub fn render_countdown(count: u32) -> String {
    format!(
        r#"<h2>Race Starts In...</h2><p id="big-numbers">{}</p>"#,
        count
    )
}

/// Race screen shown the moment a race is requested
pub fn render_race_start(track_name: &str) -> String {
    format!(
        concat!(
            "<header><h1>Race: {}</h1></header>",
            r#"<main id="two-columns">"#,
            r#"<section id="leaderBoard">{}</section>"#,
            r#"<section id="accelerate">"#,
            "<h2>Directions</h2>",
            "<p>Hit the gas as fast as you can to make your racer go faster!</p>",
            r#"<button id="gas-peddle">Click Me To Win!</button>"#,
            "</section>",
            "</main>"
        ),
        escape(track_name),
        render_countdown(3)
    )
}

/// Numbered standings, tagging the player's own entry
fn standings(positions: &[&PositionEntry], player_id: Option<u32>) -> String {
    let mut tagged = false;
    let rows: String = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut name = escape(&p.driver_name);
            if !tagged && player_id == Some(p.id) {
                name.push_str(" (you)");
                tagged = true;
            }
            format!("<tr><td><h3>{} - {}</h3></td></tr>", i + 1, name)
        })
        .collect();

    format!(
        r#"<main><h3>Leaderboard</h3><section id="leaderBoard">{}</section></main>"#,
        rows
    )
}

/// Live standings: furthest segment first
pub fn render_leaderboard(positions: &[PositionEntry], player_id: Option<u32>) -> String {
    let mut sorted: Vec<&PositionEntry> = positions.iter().collect();
    sorted.sort_by(|a, b| b.segment.total_cmp(&a.segment));
    standings(&sorted, player_id)
}

/// Final standings: 1st place first, unplaced entries last
pub fn render_results(positions: &[PositionEntry], player_id: Option<u32>) -> String {
    let mut sorted: Vec<&PositionEntry> = positions.iter().collect();
    sorted.sort_by_key(|p| (p.final_position.is_none(), p.final_position));

    format!(
        concat!(
            "<header><h1>Race Results</h1></header>",
            "<main>{}",
            r#"<a href="/race">Start a new race</a>"#,
            "</main>"
        ),
        standings(&sorted, player_id)
    )
}
