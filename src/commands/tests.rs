use super::handlers::{help_text, list_text, mood_text, personality_text, stats_text};
use super::*;
use crate::character::Mood;
use crate::utils::test_utils::{create_test_session, sample_character};

#[test]
fn exit_aliases_all_parse_to_quit() {
    for line in ["/exit", "/quit", "/q", "/QUIT", "  /Exit  "] {
        assert_eq!(parse_command(line), Ok(Command::Quit), "line: {line:?}");
    }
}

#[test]
fn help_and_clear_aliases() {
    assert_eq!(parse_command("/h"), Ok(Command::Help));
    assert_eq!(parse_command("/HELP"), Ok(Command::Help));
    assert_eq!(parse_command("/c"), Ok(Command::Clear));
    assert_eq!(parse_command("/clear"), Ok(Command::Clear));
}

#[test]
fn switch_takes_exactly_one_argument() {
    assert_eq!(
        parse_command("/switch Alice"),
        Ok(Command::Switch {
            query: "Alice".to_string()
        })
    );
    assert_eq!(
        parse_command("/switch"),
        Err(SessionError::Usage("/switch <name|id>".to_string()))
    );
    assert_eq!(
        parse_command("/switch   "),
        Err(SessionError::Usage("/switch <name|id>".to_string()))
    );
    assert!(matches!(
        parse_command("/switch alice bob"),
        Err(SessionError::Usage(_))
    ));
}

#[test]
fn argument_free_commands_reject_arguments() {
    for line in ["/list all", "/stats now", "/exit please", "/mood x"] {
        assert!(
            matches!(parse_command(line), Err(SessionError::Usage(_))),
            "line: {line:?}"
        );
    }
}

#[test]
fn unknown_command_names_the_token() {
    assert_eq!(
        parse_command("/dance wildly"),
        Err(SessionError::UnknownCommand("/dance".to_string()))
    );
    assert_eq!(
        parse_command("/"),
        Err(SessionError::UnknownCommand("/".to_string()))
    );
}

#[test]
fn is_command_checks_leading_slash() {
    assert!(is_command("/help"));
    assert!(is_command("   /help"));
    assert!(!is_command("hello /help"));
}

#[test]
fn every_registered_command_is_reachable_by_name_and_alias() {
    for spec in all_commands() {
        assert_eq!(find_command(spec.name).map(|s| s.kind), Some(spec.kind));
        for alias in spec.aliases {
            assert_eq!(find_command(alias).map(|s| s.kind), Some(spec.kind));
        }
    }
}

#[test]
fn help_lists_every_usage() {
    let text = help_text();
    for spec in all_commands() {
        assert!(text.contains(spec.usage), "missing {}", spec.usage);
    }
    assert!(text.contains("/quit"));
}

#[test]
fn stats_shows_zero_percent_without_requests() {
    let session = create_test_session();
    let text = stats_text(&session);
    assert!(text.contains("Requests:          0"));
    assert!(text.contains("0%"));
}

#[test]
fn stats_shows_hit_rate() {
    let mut session = create_test_session();
    session.metrics.total_requests = 3;
    session.metrics.cache_hits = 1;
    session.metrics.last_tokens_saved = 42;
    let text = stats_text(&session);
    assert!(text.contains("33.3%"));
    assert!(text.contains("42"));
}

#[test]
fn mood_names_dominant_emotion() {
    let mut character = sample_character("alice", "Alice");
    character.mood = Mood {
        joy: 0.2,
        anger: 0.9,
        ..Mood::default()
    };
    let text = mood_text(&character);
    assert!(text.starts_with("Alice is feeling anger"));
    assert!(text.contains("Joy"));
}

#[test]
fn personality_lists_five_traits() {
    let text = personality_text(&sample_character("alice", "Alice"));
    assert_eq!(text.lines().count(), 6);
    assert!(text.contains("Neuroticism"));
}

#[test]
fn list_marks_active_character() {
    let entries = vec![
        CatalogEntry::new("alice", "Alice"),
        CatalogEntry::new("bob", "Bob"),
    ];
    let text = list_text(&entries, "bob");
    assert!(text.contains("  Alice (alice)"));
    assert!(text.contains("* Bob (bob)"));
    assert_eq!(list_text(&[], "bob"), "No characters available.");
}
