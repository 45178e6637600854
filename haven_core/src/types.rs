//! Core domain types for Haven.
//!
//! This module defines the fundamental types used throughout the system:
//! - Coping techniques and their categories
//! - Matcher suggestions
//! - Mood and technique-usage records
//! - The personal safety plan

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Technique Types
// ============================================================================

/// Category a coping technique belongs to.
///
/// Variant order is the taxonomy's enumeration order and is relied on by the
/// matcher for tie-breaking.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TechniqueCategory {
    Grounding,
    DistressTolerance,
    EmotionRegulation,
    Interpersonal,
    Mindfulness,
    Cognitive,
}

impl TechniqueCategory {
    /// All categories in enumeration order
    pub const ALL: [TechniqueCategory; 6] = [
        TechniqueCategory::Grounding,
        TechniqueCategory::DistressTolerance,
        TechniqueCategory::EmotionRegulation,
        TechniqueCategory::Interpersonal,
        TechniqueCategory::Mindfulness,
        TechniqueCategory::Cognitive,
    ];

    /// Storage name, e.g. `distress_tolerance`
    pub fn as_str(&self) -> &'static str {
        match self {
            TechniqueCategory::Grounding => "grounding",
            TechniqueCategory::DistressTolerance => "distress_tolerance",
            TechniqueCategory::EmotionRegulation => "emotion_regulation",
            TechniqueCategory::Interpersonal => "interpersonal",
            TechniqueCategory::Mindfulness => "mindfulness",
            TechniqueCategory::Cognitive => "cognitive",
        }
    }

    /// Human-readable name, e.g. `Distress Tolerance`
    pub fn display_name(&self) -> &'static str {
        match self {
            TechniqueCategory::Grounding => "Grounding",
            TechniqueCategory::DistressTolerance => "Distress Tolerance",
            TechniqueCategory::EmotionRegulation => "Emotion Regulation",
            TechniqueCategory::Interpersonal => "Interpersonal",
            TechniqueCategory::Mindfulness => "Mindfulness",
            TechniqueCategory::Cognitive => "Cognitive",
        }
    }
}

impl fmt::Display for TechniqueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TechniqueCategory {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        TechniqueCategory::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == normalized)
            .ok_or_else(|| crate::Error::Other(format!("Unknown technique category: {}", s)))
    }
}

/// A coping technique from the static taxonomy
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Technique {
    pub name: String,
    pub description: String,
    pub example: String,
    /// Lower-case match terms; a keyword may span several words
    pub keywords: Vec<String>,
}

/// A technique returned by the matcher, annotated with its category and score
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct Suggestion {
    #[serde(flatten)]
    pub technique: Technique,
    pub category: TechniqueCategory,
    pub score: u32,
}

// ============================================================================
// Journal Records
// ============================================================================

/// Self-reported mood on a five-point scale
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mood {
    Terrible,
    Poor,
    Okay,
    Good,
    Excellent,
}

impl Mood {
    /// All moods, best first (the order they are offered in)
    pub const ALL: [Mood; 5] = [
        Mood::Excellent,
        Mood::Good,
        Mood::Okay,
        Mood::Poor,
        Mood::Terrible,
    ];

    pub fn value(&self) -> u8 {
        match self {
            Mood::Terrible => 1,
            Mood::Poor => 2,
            Mood::Okay => 3,
            Mood::Good => 4,
            Mood::Excellent => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mood::Terrible => "Terrible",
            Mood::Poor => "Poor",
            Mood::Okay => "Okay",
            Mood::Good => "Good",
            Mood::Excellent => "Excellent",
        }
    }

    pub fn from_value(value: u8) -> Option<Mood> {
        Mood::ALL.iter().copied().find(|m| m.value() == value)
    }
}

impl FromStr for Mood {
    type Err = crate::Error;

    /// Accepts either the mood name (any case) or its 1-5 value
    fn from_str(s: &str) -> crate::Result<Self> {
        let s = s.trim();
        if let Ok(value) = s.parse::<u8>() {
            return Mood::from_value(value)
                .ok_or_else(|| crate::Error::Validation(format!("Mood must be 1-5, got {}", value)));
        }
        Mood::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| crate::Error::Validation(format!("Unknown mood: {}", s)))
    }
}

/// A logged mood entry as persisted under `mood_logs`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    pub mood: u8,
    pub mood_name: String,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
    /// Local calendar day, see [`day_string`]
    pub date: String,
}

/// A logged use of a technique as persisted under `technique_usage`
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TechniqueUsage {
    pub technique: String,
    pub category: TechniqueCategory,
    pub timestamp: DateTime<Utc>,
    pub date: String,
    /// 1-5 rating, if the user gave one
    #[serde(default)]
    pub effectiveness: Option<u8>,
}

// ============================================================================
// Safety Plan
// ============================================================================

/// Personal safety plan, one free-text field per section
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SafetyPlan {
    #[serde(default)]
    pub warning_signs: String,
    #[serde(default)]
    pub coping_strategies: String,
    #[serde(default)]
    pub social_contacts: String,
    #[serde(default)]
    pub professional_contacts: String,
    #[serde(default)]
    pub environment_safety: String,
    #[serde(default)]
    pub reasons_to_live: String,
}

/// Addressable section of a [`SafetyPlan`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SafetyPlanSection {
    WarningSigns,
    CopingStrategies,
    SocialContacts,
    ProfessionalContacts,
    EnvironmentSafety,
    ReasonsToLive,
}

impl SafetyPlanSection {
    pub const ALL: [SafetyPlanSection; 6] = [
        SafetyPlanSection::WarningSigns,
        SafetyPlanSection::CopingStrategies,
        SafetyPlanSection::SocialContacts,
        SafetyPlanSection::ProfessionalContacts,
        SafetyPlanSection::EnvironmentSafety,
        SafetyPlanSection::ReasonsToLive,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SafetyPlanSection::WarningSigns => "warning_signs",
            SafetyPlanSection::CopingStrategies => "coping_strategies",
            SafetyPlanSection::SocialContacts => "social_contacts",
            SafetyPlanSection::ProfessionalContacts => "professional_contacts",
            SafetyPlanSection::EnvironmentSafety => "environment_safety",
            SafetyPlanSection::ReasonsToLive => "reasons_to_live",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            SafetyPlanSection::WarningSigns => "Warning Signs",
            SafetyPlanSection::CopingStrategies => "Coping Strategies",
            SafetyPlanSection::SocialContacts => "Social Support",
            SafetyPlanSection::ProfessionalContacts => "Professional Contacts",
            SafetyPlanSection::EnvironmentSafety => "Environment Safety",
            SafetyPlanSection::ReasonsToLive => "Reasons for Living",
        }
    }
}

impl FromStr for SafetyPlanSection {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        SafetyPlanSection::ALL
            .iter()
            .copied()
            .find(|section| section.key() == normalized)
            .ok_or_else(|| crate::Error::Other(format!("Unknown safety plan section: {}", s)))
    }
}

impl SafetyPlan {
    pub fn section(&self, section: SafetyPlanSection) -> &str {
        match section {
            SafetyPlanSection::WarningSigns => &self.warning_signs,
            SafetyPlanSection::CopingStrategies => &self.coping_strategies,
            SafetyPlanSection::SocialContacts => &self.social_contacts,
            SafetyPlanSection::ProfessionalContacts => &self.professional_contacts,
            SafetyPlanSection::EnvironmentSafety => &self.environment_safety,
            SafetyPlanSection::ReasonsToLive => &self.reasons_to_live,
        }
    }

    pub fn set_section(&mut self, section: SafetyPlanSection, text: String) {
        let slot = match section {
            SafetyPlanSection::WarningSigns => &mut self.warning_signs,
            SafetyPlanSection::CopingStrategies => &mut self.coping_strategies,
            SafetyPlanSection::SocialContacts => &mut self.social_contacts,
            SafetyPlanSection::ProfessionalContacts => &mut self.professional_contacts,
            SafetyPlanSection::EnvironmentSafety => &mut self.environment_safety,
            SafetyPlanSection::ReasonsToLive => &mut self.reasons_to_live,
        };
        *slot = text;
    }

    pub fn is_empty(&self) -> bool {
        SafetyPlanSection::ALL
            .iter()
            .all(|s| self.section(*s).trim().is_empty())
    }
}

// ============================================================================
// Catalog Type
// ============================================================================

/// The complete technique taxonomy, categories and techniques in enumeration order
#[derive(Clone, Debug)]
pub struct TechniqueCatalog {
    pub categories: Vec<(TechniqueCategory, Vec<Technique>)>,
}

// ============================================================================
// Calendar Days
// ============================================================================

/// Calendar-day string used as the per-day key for records and reminders,
/// e.g. `Mon Nov 10 2025`.
pub fn day_string(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_accepts_variants() {
        assert_eq!(
            "distress-tolerance".parse::<TechniqueCategory>().unwrap(),
            TechniqueCategory::DistressTolerance
        );
        assert_eq!(
            "Emotion Regulation".parse::<TechniqueCategory>().unwrap(),
            TechniqueCategory::EmotionRegulation
        );
        assert!("breathing".parse::<TechniqueCategory>().is_err());
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&TechniqueCategory::DistressTolerance).unwrap();
        assert_eq!(json, "\"distress_tolerance\"");
    }

    #[test]
    fn test_mood_parse() {
        assert_eq!("good".parse::<Mood>().unwrap(), Mood::Good);
        assert_eq!("1".parse::<Mood>().unwrap(), Mood::Terrible);
        assert!("6".parse::<Mood>().is_err());
        assert!("meh".parse::<Mood>().is_err());
    }

    #[test]
    fn test_safety_plan_sections() {
        let mut plan = SafetyPlan::default();
        assert!(plan.is_empty());

        let section: SafetyPlanSection = "reasons-to-live".parse().unwrap();
        plan.set_section(section, "My dog".into());

        assert_eq!(plan.reasons_to_live, "My dog");
        assert_eq!(plan.section(SafetyPlanSection::ReasonsToLive), "My dog");
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_day_string_format() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        assert_eq!(day_string(date), "Mon Nov 10 2025");

        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        assert_eq!(day_string(date), "Tue Mar 04 2025");
    }

    #[test]
    fn test_suggestion_serializes_flat() {
        let suggestion = Suggestion {
            technique: Technique {
                name: "Box Breathing".into(),
                description: "d".into(),
                example: "e".into(),
                keywords: vec!["panic".into()],
            },
            category: TechniqueCategory::Grounding,
            score: 1,
        };
        let value = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(value["name"], "Box Breathing");
        assert_eq!(value["category"], "grounding");
        assert_eq!(value["score"], 1);
    }
}
