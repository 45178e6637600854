//! Validation and cleanup of user-entered and stored records.

use crate::store::KeyValueStore;
use crate::{MoodEntry, Result, TechniqueUsage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Default limit for free-text notes
pub const DEFAULT_TEXT_LIMIT: usize = 500;

/// Preference fields that must be booleans when present
pub const BOOLEAN_PREFERENCES: &[&str] = &[
    "dark_mode",
    "notifications",
    "mood_reminders",
    "breathing_reminders",
    "haptic_feedback",
    "data_sharing",
];

/// Trim and cap free text at `max_chars` characters
pub fn sanitize_text(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}

pub fn validate_mood_entry(entry: &MoodEntry) -> bool {
    (1..=5).contains(&entry.mood) && !entry.mood_name.trim().is_empty() && !entry.date.is_empty()
}

pub fn validate_technique_usage(usage: &TechniqueUsage) -> bool {
    if usage.technique.trim().is_empty() || usage.date.is_empty() {
        return false;
    }
    match usage.effectiveness {
        Some(rating) => (1..=5).contains(&rating),
        None => true,
    }
}

/// Preferences must be a JSON object whose known flags are booleans
pub fn validate_preferences(prefs: &Value) -> bool {
    let Some(map) = prefs.as_object() else {
        return false;
    };
    BOOLEAN_PREFERENCES
        .iter()
        .all(|field| map.get(*field).map_or(true, Value::is_boolean))
}

/// Load a stored list, dropping entries that fail to parse or validate.
///
/// The cleaned list is written back only when something was dropped.
/// Missing or non-array data reads as an empty list.
pub fn clean_stored_list<T, S, F>(store: &mut S, key: &str, validator: F) -> Result<Vec<T>>
where
    T: DeserializeOwned + Serialize,
    S: KeyValueStore + ?Sized,
    F: Fn(&T) -> bool,
{
    let raw = match store.get_raw(key)? {
        Some(Value::Array(items)) => items,
        Some(_) => {
            tracing::warn!("Stored value for '{}' is not a list, ignoring it", key);
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    let original_len = raw.len();
    let valid: Vec<T> = raw
        .into_iter()
        .filter_map(|item| serde_json::from_value::<T>(item).ok())
        .filter(|item| validator(item))
        .collect();

    if valid.len() != original_len {
        tracing::warn!(
            "Dropped {} invalid entries from '{}'",
            original_len - valid.len(),
            key
        );
        store.set_raw(key, &serde_json::to_value(&valid)?)?;
    }

    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{keys, KeyValueStoreExt, MemoryStore};
    use crate::TechniqueCategory;
    use chrono::Utc;
    use serde_json::json;

    fn mood_entry(mood: u8) -> MoodEntry {
        MoodEntry {
            mood,
            mood_name: "Okay".into(),
            notes: "Feeling okay today".into(),
            timestamp: Utc::now(),
            date: "Mon Nov 10 2025".into(),
        }
    }

    fn usage(effectiveness: Option<u8>) -> TechniqueUsage {
        TechniqueUsage {
            technique: "Box Breathing".into(),
            category: TechniqueCategory::Grounding,
            timestamp: Utc::now(),
            date: "Mon Nov 10 2025".into(),
            effectiveness,
        }
    }

    #[test]
    fn test_validate_mood_entry() {
        assert!(validate_mood_entry(&mood_entry(3)));
        assert!(!validate_mood_entry(&mood_entry(0)));
        assert!(!validate_mood_entry(&mood_entry(6)));

        let mut nameless = mood_entry(3);
        nameless.mood_name = "  ".into();
        assert!(!validate_mood_entry(&nameless));

        let mut undated = mood_entry(3);
        undated.date.clear();
        assert!(!validate_mood_entry(&undated));
    }

    #[test]
    fn test_validate_technique_usage() {
        assert!(validate_technique_usage(&usage(None)));
        assert!(validate_technique_usage(&usage(Some(5))));
        assert!(!validate_technique_usage(&usage(Some(0))));
        assert!(!validate_technique_usage(&usage(Some(6))));

        let mut unnamed = usage(None);
        unnamed.technique.clear();
        assert!(!validate_technique_usage(&unnamed));
    }

    #[test]
    fn test_sanitize_text() {
        assert_eq!(sanitize_text("  hello  ", DEFAULT_TEXT_LIMIT), "hello");
        assert_eq!(sanitize_text("", DEFAULT_TEXT_LIMIT), "");
        assert_eq!(sanitize_text(&"a".repeat(600), DEFAULT_TEXT_LIMIT).len(), 500);
        // Counts characters, not bytes
        assert_eq!(sanitize_text("ééé", 2), "éé");
    }

    #[test]
    fn test_validate_preferences() {
        assert!(validate_preferences(&json!({ "dark_mode": true, "notifications": false })));
        assert!(validate_preferences(&json!({ "theme": "blue" })));
        assert!(!validate_preferences(&json!({ "dark_mode": "yes" })));
        assert!(!validate_preferences(&json!(null)));
        assert!(!validate_preferences(&json!([true])));
    }

    #[test]
    fn test_clean_stored_list_drops_invalid_and_writes_back() {
        let mut store = MemoryStore::new();
        let good = serde_json::to_value(mood_entry(4)).unwrap();
        let out_of_range = serde_json::to_value(mood_entry(9)).unwrap();
        store
            .set_raw(keys::MOOD_LOGS, &json!([good, out_of_range, { "junk": 1 }]))
            .unwrap();

        let cleaned: Vec<MoodEntry> =
            clean_stored_list(&mut store, keys::MOOD_LOGS, validate_mood_entry).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned[0].mood, 4);

        let stored: Vec<MoodEntry> = store.get(keys::MOOD_LOGS).unwrap().unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[test]
    fn test_clean_stored_list_missing_or_not_a_list() {
        let mut store = MemoryStore::new();
        let empty: Vec<MoodEntry> =
            clean_stored_list(&mut store, keys::MOOD_LOGS, validate_mood_entry).unwrap();
        assert!(empty.is_empty());

        store.set_raw(keys::MOOD_LOGS, &json!({ "mood": 3 })).unwrap();
        let empty: Vec<MoodEntry> =
            clean_stored_list(&mut store, keys::MOOD_LOGS, validate_mood_entry).unwrap();
        assert!(empty.is_empty());
    }
}
