//! Text payloads for the read-only commands.
//!
//! Each function renders from the state it is given and mutates nothing.

use chrono::Utc;

use super::all_commands;
use crate::character::{CatalogEntry, Character};
use crate::core::session::Session;

const BAR_WIDTH: usize = 20;

pub fn help_text() -> String {
    let mut text = String::from("Commands:\n");
    let width = all_commands()
        .iter()
        .map(|command| command.usage.len())
        .max()
        .unwrap_or(0);
    for command in all_commands() {
        text.push_str(&format!(
            "  {:width$}  {}",
            command.usage,
            command.help,
            width = width
        ));
        if !command.aliases.is_empty() {
            let aliases: Vec<String> = command.aliases.iter().map(|a| format!("/{a}")).collect();
            text.push_str(&format!(" (also {})", aliases.join(", ")));
        }
        text.push('\n');
    }
    text.push_str(
        "\nKeys:\n  \
         Enter         Send the message or run the command\n  \
         Alt+Enter     Insert a newline\n  \
         Up/Down       Browse input history (scroll when messages are focused)\n  \
         PageUp/Down   Scroll the transcript when messages are focused\n  \
         Tab           Toggle focus between input and messages\n  \
         Ctrl+C        Save and quit",
    );
    text
}

pub fn stats_text(session: &Session) -> String {
    let metrics = &session.metrics;
    format!(
        "Session statistics:\n  \
         Requests:          {}\n  \
         Cache hits:        {}\n  \
         Cache hit rate:    {}\n  \
         Last tokens saved: {}",
        metrics.total_requests,
        metrics.cache_hits,
        metrics.format_hit_rate(),
        metrics.last_tokens_saved
    )
}

pub fn mood_text(character: &Character) -> String {
    let intensities = character.mood.intensities();
    let scale = intensities
        .iter()
        .map(|(_, value)| *value)
        .fold(1.0_f32, f32::max);

    let mut text = format!(
        "{} is feeling {}:\n",
        character.name,
        character.mood_summary()
    );
    for (label, value) in intensities {
        text.push_str(&format!(
            "  {:<9} {} {:.2}\n",
            label,
            bar(value / scale),
            value
        ));
    }
    text.truncate(text.trim_end().len());
    text
}

pub fn personality_text(character: &Character) -> String {
    let mut text = format!("{}'s personality:\n", character.name);
    for (label, value) in character.personality.traits() {
        text.push_str(&format!("  {:<17} {} {:.2}\n", label, bar(value), value));
    }
    text.truncate(text.trim_end().len());
    text
}

pub fn session_text(session: &Session) -> String {
    let elapsed = Utc::now().signed_duration_since(session.context.started_at);
    let minutes = elapsed.num_minutes().max(0);
    let seconds = (elapsed.num_seconds().max(0)) % 60;
    let mut text = format!(
        "Session:\n  \
         Session id: {}\n  \
         User:       {}\n  \
         Character:  {}\n  \
         Started:    {} ({}m {}s ago)\n  \
         Turns:      {}",
        session.session_id,
        session.user_id,
        session.character.display_label(),
        session.context.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        minutes,
        seconds,
        session.context.turns.len()
    );
    if let Some(scenario) = &session.scenario_id {
        text.push_str(&format!("\n  Scenario:   {scenario}"));
    }
    text
}

pub fn list_text(entries: &[CatalogEntry], active_id: &str) -> String {
    if entries.is_empty() {
        return "No characters available.".to_string();
    }
    let mut text = String::from("Available characters:\n");
    for entry in entries {
        let marker = if entry.id == active_id { "*" } else { " " };
        text.push_str(&format!("{} {}\n", marker, entry.label()));
    }
    text.push_str("Use /switch <name|id> to change character.");
    text
}

/// Fixed-width bar for a value in `[0, 1]`.
fn bar(fraction: f32) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let filled = (fraction * BAR_WIDTH as f32).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_is_fixed_width() {
        for fraction in [0.0, 0.33, 0.5, 1.0, 2.0, -1.0, f32::NAN] {
            assert_eq!(bar(fraction).chars().count(), BAR_WIDTH);
        }
        assert_eq!(bar(1.0), "█".repeat(BAR_WIDTH));
    }
}
