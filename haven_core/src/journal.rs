//! Journal persistence: mood logs, technique usage, the safety plan,
//! conversation history, preferences and medication reminders.
//!
//! Lists are stored newest first, except the conversation, which is kept in
//! chronological order and capped.

use crate::catalog::default_catalog;
use crate::chat::ChatMessage;
use crate::config::JournalConfig;
use crate::schedule::Medication;
use crate::store::{keys, KeyValueStore, KeyValueStoreExt};
use crate::types::day_string;
use crate::validation::{
    clean_stored_list, sanitize_text, validate_mood_entry, validate_preferences,
    validate_technique_usage,
};
use crate::{Error, Mood, MoodEntry, Result, SafetyPlan, SafetyPlanSection, TechniqueUsage};
use chrono::{DateTime, Local, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A chat message as kept in the stored conversation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConversationEntry {
    #[serde(flatten)]
    pub message: ChatMessage,
    pub timestamp: DateTime<Utc>,
}

/// Read a stored list without rewriting it; unparsable entries are skipped
fn read_list<T, S>(store: &S, key: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_raw(key)? {
        Some(Value::Array(items)) => {
            let total = items.len();
            let parsed: Vec<T> = items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect();
            if parsed.len() != total {
                tracing::warn!("Skipped {} unreadable entries in '{}'", total - parsed.len(), key);
            }
            Ok(parsed)
        }
        Some(_) => {
            tracing::warn!("Stored value for '{}' is not a list, ignoring it", key);
            Ok(Vec::new())
        }
        None => Ok(Vec::new()),
    }
}

// ============================================================================
// Mood
// ============================================================================

/// Record a mood, newest first
pub fn log_mood<S: KeyValueStore + ?Sized>(
    store: &mut S,
    mood: Mood,
    notes: &str,
    config: &JournalConfig,
    now: DateTime<Local>,
) -> Result<MoodEntry> {
    let entry = MoodEntry {
        mood: mood.value(),
        mood_name: mood.name().to_string(),
        notes: sanitize_text(notes, config.notes_max_chars),
        timestamp: now.with_timezone(&Utc),
        date: day_string(now.date_naive()),
    };

    if !validate_mood_entry(&entry) {
        return Err(Error::Validation("invalid mood entry".into()));
    }

    let mut logs: Vec<MoodEntry> = clean_stored_list(store, keys::MOOD_LOGS, validate_mood_entry)?;
    logs.insert(0, entry.clone());
    store.set(keys::MOOD_LOGS, &logs)?;

    tracing::info!("Logged mood {} ({})", entry.mood_name, entry.mood);
    Ok(entry)
}

/// Stored mood logs, newest first
pub fn mood_logs<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<MoodEntry>> {
    let logs: Vec<MoodEntry> = read_list(store, keys::MOOD_LOGS)?;
    Ok(logs.into_iter().filter(validate_mood_entry).collect())
}

// ============================================================================
// Technique Usage
// ============================================================================

/// Record that a catalog technique was used, optionally rated 1-5
pub fn log_technique_usage<S: KeyValueStore + ?Sized>(
    store: &mut S,
    technique_name: &str,
    effectiveness: Option<u8>,
    now: DateTime<Local>,
) -> Result<TechniqueUsage> {
    let (category, technique) = default_catalog()
        .find(technique_name)
        .ok_or_else(|| Error::Validation(format!("Unknown technique: {}", technique_name)))?;

    let usage = TechniqueUsage {
        technique: technique.name.clone(),
        category,
        timestamp: now.with_timezone(&Utc),
        date: day_string(now.date_naive()),
        effectiveness,
    };

    if !validate_technique_usage(&usage) {
        return Err(Error::Validation(
            "effectiveness must be between 1 and 5".into(),
        ));
    }

    let mut history: Vec<TechniqueUsage> =
        clean_stored_list(store, keys::TECHNIQUE_USAGE, validate_technique_usage)?;
    history.insert(0, usage.clone());
    store.set(keys::TECHNIQUE_USAGE, &history)?;

    tracing::info!("Logged use of {} ({})", usage.technique, usage.category);
    Ok(usage)
}

/// Stored technique usage, newest first
pub fn technique_usage<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<TechniqueUsage>> {
    let usage: Vec<TechniqueUsage> = read_list(store, keys::TECHNIQUE_USAGE)?;
    Ok(usage.into_iter().filter(validate_technique_usage).collect())
}

// ============================================================================
// Safety Plan
// ============================================================================

/// Returns an empty plan if none is stored or the stored one is unreadable.
pub fn load_safety_plan<S: KeyValueStore + ?Sized>(store: &S) -> Result<SafetyPlan> {
    match store.get::<SafetyPlan>(keys::SAFETY_PLAN) {
        Ok(Some(plan)) => Ok(plan),
        Ok(None) => Ok(SafetyPlan::default()),
        Err(Error::Json(e)) => {
            tracing::warn!("Failed to parse stored safety plan: {}. Using empty plan.", e);
            Ok(SafetyPlan::default())
        }
        Err(e) => Err(e),
    }
}

pub fn save_safety_plan<S: KeyValueStore + ?Sized>(store: &mut S, plan: &SafetyPlan) -> Result<()> {
    store.set(keys::SAFETY_PLAN, plan)?;
    tracing::info!("Saved safety plan");
    Ok(())
}

/// Load the plan, replace one section and save it back
pub fn update_safety_plan<S: KeyValueStore + ?Sized>(
    store: &mut S,
    section: SafetyPlanSection,
    text: &str,
) -> Result<SafetyPlan> {
    let mut plan = load_safety_plan(&*store)?;
    plan.set_section(section, text.trim().to_string());
    save_safety_plan(store, &plan)?;
    Ok(plan)
}

// ============================================================================
// Conversation
// ============================================================================

/// Append a message, keeping only the newest `config.conversation_limit`
pub fn append_conversation<S: KeyValueStore + ?Sized>(
    store: &mut S,
    message: ChatMessage,
    config: &JournalConfig,
    now: DateTime<Utc>,
) -> Result<()> {
    let mut history: Vec<ConversationEntry> = read_list(&*store, keys::CONVERSATION_HISTORY)?;
    history.push(ConversationEntry {
        message,
        timestamp: now,
    });

    if history.len() > config.conversation_limit {
        let excess = history.len() - config.conversation_limit;
        history.drain(..excess);
    }

    store.set(keys::CONVERSATION_HISTORY, &history)
}

/// Stored conversation, oldest first
pub fn conversation_history<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<ConversationEntry>> {
    read_list(store, keys::CONVERSATION_HISTORY)
}

// ============================================================================
// Medications
// ============================================================================

pub fn add_medication<S: KeyValueStore + ?Sized>(
    store: &mut S,
    medication: Medication,
) -> Result<Vec<Medication>> {
    medication.validate()?;

    let mut medications = medications(&*store)?;
    medications.push(medication);
    store.set(keys::MEDICATION_REMINDERS, &medications)?;
    Ok(medications)
}

pub fn medications<S: KeyValueStore + ?Sized>(store: &S) -> Result<Vec<Medication>> {
    let stored: Vec<Medication> = read_list(store, keys::MEDICATION_REMINDERS)?;
    Ok(stored.into_iter().filter(|m| m.validate().is_ok()).collect())
}

// ============================================================================
// Preferences
// ============================================================================

/// Stored preferences; anything that fails validation reads as empty
pub fn load_preferences<S: KeyValueStore + ?Sized>(store: &S) -> Result<Map<String, Value>> {
    match store.get_raw(keys::USER_PREFERENCES)? {
        Some(prefs) if validate_preferences(&prefs) => Ok(into_object(prefs)),
        Some(_) => {
            tracing::warn!("Stored preferences are invalid, using defaults");
            Ok(Map::new())
        }
        None => Ok(Map::new()),
    }
}

/// Set one preference; known flags only accept booleans
pub fn set_preference<S: KeyValueStore + ?Sized>(
    store: &mut S,
    name: &str,
    value: Value,
) -> Result<Map<String, Value>> {
    let mut prefs = load_preferences(&*store)?;
    prefs.insert(name.to_string(), value);

    let prefs = Value::Object(prefs);
    if !validate_preferences(&prefs) {
        return Err(Error::Validation(format!("{} must be true or false", name)));
    }
    store.set_raw(keys::USER_PREFERENCES, &prefs)?;
    Ok(into_object(prefs))
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Delete every stored journal key
pub fn clear_all<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<()> {
    for key in keys::ALL {
        store.remove(key)?;
    }
    tracing::info!("Cleared all stored data");
    Ok(())
}
