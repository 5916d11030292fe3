use std::error::Error;

use crate::character::{CatalogEntry, CharacterStore, FileCharacterStore};
use crate::core::config::data::path_display;
use crate::core::config::Config;

pub fn list_characters(config: &Config) -> Result<(), Box<dyn Error>> {
    let dir = config.characters_dir();
    let store = FileCharacterStore::new(&dir);

    let entries = match store.character_info() {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("❌ Error listing characters: {}", e);
            return Err(e.into());
        }
    };

    print!(
        "{}",
        format_character_list(
            &path_display(&dir),
            &entries,
            config.default_character.as_deref()
        )
    );
    Ok(())
}

/// Listing text for `cameo characters`. The configured default, if it names
/// an entry's id, is starred.
pub fn format_character_list(
    dir_display: &str,
    entries: &[CatalogEntry],
    default_character: Option<&str>,
) -> String {
    let mut out = format!("Available characters (from {}):\n\n", dir_display);

    if entries.is_empty() {
        out.push_str("  No characters found.\n");
        out.push_str("\n💡 Add a character by saving its JSON document in that directory.\n");
        return out;
    }

    for entry in entries {
        let marker = if default_character == Some(entry.id.as_str()) {
            " ⭐"
        } else {
            ""
        };
        out.push_str(&format!("  • {}{}\n", entry.label(), marker));
    }
    out.push_str("\n💡 Start a chat with a character using:\n");
    out.push_str("   cameo -c <name|id>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_entries_and_marks_default() {
        let entries = vec![
            CatalogEntry::new("alice", "Alice"),
            CatalogEntry::new("bob", "Bob"),
        ];
        let text = format_character_list("~/chars", &entries, Some("bob"));

        assert!(text.starts_with("Available characters (from ~/chars):"));
        assert!(text.contains("  • Alice (alice)\n"));
        assert!(text.contains("  • Bob (bob) ⭐\n"));
        assert!(text.contains("cameo -c <name|id>"));
    }

    #[test]
    fn empty_catalog_explains_how_to_add() {
        let text = format_character_list("~/chars", &[], None);
        assert!(text.contains("No characters found."));
        assert!(!text.contains("cameo -c"));
    }
}
