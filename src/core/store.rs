use std::{
    fs,
    path::Path,
};

use serde_json::Value;

use crate::core::{
    card::Card,
    errors::AnkiflowError,
};

/// Loads an ordered card collection from a JSON file. A single bare object
/// is accepted as a one-card collection for older generated files. Any
/// malformed element or timestamp fails the whole load; callers never see a
/// partial collection.
pub fn load_cards(path: &Path) -> Result<Vec<Card>, AnkiflowError> {
    let raw = fs::read_to_string(path)?;

    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| AnkiflowError::Format(format!("{}: {}", path.display(), e)))?;

    let elements = match value {
        Value::Array(items) => items,
        Value::Object(_) => vec![value],
        other => {
            return Err(AnkiflowError::Format(format!(
                "{}: expected an array of cards, got {}",
                path.display(),
                json_type_name(&other)
            )))
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(i, element)| {
            serde_json::from_value(element)
                .map_err(|e| AnkiflowError::Format(format!("{} card {}: {}", path.display(), i, e)))
        })
        .collect()
}

/// Rewrites the whole collection. Pretty-printed with stable field order so
/// the file diffs cleanly; serde_json leaves non-ASCII text unescaped.
/// There is no file locking: two sessions writing the same path race, and
/// the last writer wins. Single-reviewer usage is assumed.
pub fn save_cards(cards: &[Card], path: &Path) -> Result<(), AnkiflowError> {
    let json = serde_json::to_string_pretty(cards)?;
    fs::write(path, json)?;
    Ok(())
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{
        TimeZone,
        Utc,
    };
    use tempfile::tempdir;

    use super::*;
    use crate::core::card::CardStatus;

    fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn round_trips_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");

        let mut added = Card::new("Q1?", "A1");
        added.context = "より詳しい説明".to_string();
        added.tags = vec!["rust".to_string(), "ownership".to_string()];
        added.source = "https://example.com/article".to_string();
        added.mark_added(1234, Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap());

        let cards = vec![added, Card::new("Q2?", "A2")];
        save_cards(&cards, &path).unwrap();
        let loaded = load_cards(&path).unwrap();
        assert_eq!(loaded, cards);
    }

    #[test]
    fn round_trips_empty_collection() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        save_cards(&[], &path).unwrap();
        assert!(load_cards(&path).unwrap().is_empty());
    }

    #[test]
    fn non_ascii_saved_literally() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cards.json");
        save_cards(&[Card::new("日本語の質問?", "答え")], &path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("日本語の質問?"));
        assert!(!raw.contains("\\u"));
    }

    #[test]
    fn bare_object_loads_as_single_card() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "one.json", r#"{"front": "Q?", "back": "A"}"#);

        let cards = load_cards(&path).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "Q?");
        assert_eq!(cards[0].status, CardStatus::Pending);
        assert_eq!(cards[0].deck, "Default");
    }

    #[test]
    fn invalid_json_is_a_format_error() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "bad.json", "{not json");
        assert!(matches!(load_cards(&path), Err(AnkiflowError::Format(_))));
    }

    #[test]
    fn non_object_elements_fail_the_load() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "bad.json", r#"["just a string"]"#);
        assert!(matches!(load_cards(&path), Err(AnkiflowError::Format(_))));
    }

    #[test]
    fn malformed_timestamp_fails_the_load() {
        let dir = tempdir().unwrap();
        let path = write_file(
            &dir,
            "bad_ts.json",
            r#"[{"front": "Q?", "back": "A", "status": "added", "anki_id": 1, "added_at": "not-a-date"}]"#,
        );
        assert!(matches!(load_cards(&path), Err(AnkiflowError::Format(_))));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = tempdir().unwrap();
        let path =
            write_file(&dir, "extra.json", r#"[{"front": "Q?", "back": "A", "frnot": "typo"}]"#);
        assert!(matches!(load_cards(&path), Err(AnkiflowError::Format(_))));
    }

    #[test]
    fn missing_front_fails_the_load() {
        let dir = tempdir().unwrap();
        let path = write_file(&dir, "missing.json", r#"[{"back": "A"}]"#);
        assert!(matches!(load_cards(&path), Err(AnkiflowError::Format(_))));
    }
}
