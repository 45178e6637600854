//! Default catalog of DBT/CBT coping techniques.
//!
//! This module provides the built-in technique taxonomy used by the matcher
//! and the technique browser.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Cached default catalog - built once and shared read-only for the process lifetime
static DEFAULT_CATALOG: Lazy<TechniqueCatalog> = Lazy::new(build_default_catalog);

/// Get a reference to the cached default catalog
pub fn default_catalog() -> &'static TechniqueCatalog {
    &DEFAULT_CATALOG
}

fn technique(name: &str, description: &str, example: &str, keywords: &[&str]) -> Technique {
    Technique {
        name: name.into(),
        description: description.into(),
        example: example.into(),
        keywords: keywords.iter().map(|k| (*k).into()).collect(),
    }
}

/// Builds the default catalog
///
/// **Note**: Prefer `default_catalog()` outside of tests.
pub fn build_default_catalog() -> TechniqueCatalog {
    let grounding = vec![
        technique(
            "5-4-3-2-1 Technique",
            "5 things you see, 4 you hear, 3 you touch, 2 you smell, 1 you taste",
            "Example: \"I see my phone, a chair, the wall, a lamp, my hands. I hear traffic, a clock ticking, my breathing, birds. I touch my shirt, the couch, my hair. I smell coffee, fresh air. I taste mint from my gum.\"",
            &["panic", "overwhelmed", "dissociation", "flashback"],
        ),
        technique(
            "Box Breathing",
            "Breathe in 4, hold 4, out 4, hold 4",
            "Example: Inhale slowly counting 1-2-3-4, hold your breath 1-2-3-4, exhale slowly 1-2-3-4, hold empty 1-2-3-4. Repeat 4-5 times until you feel calmer.",
            &["anxiety", "panic", "hyperventilation", "stress"],
        ),
        technique(
            "Progressive Muscle Relaxation",
            "Tense and release muscle groups",
            "Example: Clench your fists tight for 5 seconds, then release. Tense your shoulders up to your ears for 5 seconds, then drop. Continue with jaw, stomach, legs, and feet.",
            &["tension", "stress", "physical", "body"],
        ),
    ];

    let distress_tolerance = vec![
        technique(
            "TIPP",
            "Temperature, Intense exercise, Paced breathing, Paired muscle relaxation",
            "Example: Splash cold water on your face or hold ice cubes. Do 20 jumping jacks. Practice slow breathing. Tense and release your muscles while breathing deeply.",
            &["crisis", "intense", "emergency", "overwhelming"],
        ),
        technique(
            "Distract with ACCEPTS",
            "Activities, Contributing, Comparisons, Emotions, Push away, Thoughts, Sensations",
            "Example: Clean your room (Activity), text a friend support (Contributing), remember a harder time you survived (Comparisons), watch a funny video (Emotions), visualize putting worries in a box (Push away).",
            &["urges", "impulse", "distraction", "coping"],
        ),
        technique(
            "Self-Soothe",
            "Use your 5 senses to comfort yourself",
            "Example: Look at photos you love, listen to calming music, pet a soft blanket, smell lavender or coffee, eat a piece of chocolate slowly.",
            &["comfort", "calm", "soothe", "relax"],
        ),
    ];

    let emotion_regulation = vec![
        technique(
            "PLEASE",
            "Treat PhysicaL illness, balance Eating, avoid mood-Altering substances, balance Sleep, get Exercise",
            "Example: Take prescribed medications, eat 3 balanced meals, limit alcohol/caffeine, maintain 7-8 hours sleep schedule, take a 15-minute walk daily.",
            &["mood", "emotional", "stability", "routine"],
        ),
        technique(
            "Opposite Action",
            "Act opposite to your emotional urge",
            "Example: If depressed and want to stay in bed → Get up and go outside. If angry and want to yell → Speak softly. If anxious and want to avoid → Approach gently.",
            &["depression", "anger", "fear", "avoidance"],
        ),
        technique(
            "Check the Facts",
            "Is my emotion fitting the facts?",
            "Example: \"I feel like everyone hates me. Facts: My friend texted me yesterday. My coworker smiled at me. No one has said they hate me. My emotion doesn't fit the facts.\"",
            &["thoughts", "reality", "perspective", "rational"],
        ),
    ];

    let interpersonal = vec![
        technique(
            "DEAR MAN",
            "Describe, Express, Assert, Reinforce, Mindful, Appear confident, Negotiate",
            "Example: \"When you cancel plans last minute (Describe), I feel hurt (Express). I need advance notice (Assert). This will help our friendship (Reinforce). Can we agree on 24 hours notice? (Negotiate)\"",
            &["communication", "boundaries", "conflict", "assertive"],
        ),
        technique(
            "GIVE",
            "Gentle, Interested, Validate, Easy manner",
            "Example: Use a calm tone (Gentle), ask \"How are you feeling?\" (Interested), say \"That makes sense\" (Validate), smile and stay relaxed (Easy manner).",
            &["relationships", "connection", "empathy", "social"],
        ),
    ];

    let mindfulness = vec![
        technique(
            "Observe",
            "Notice thoughts and feelings without judgment",
            "Example: \"I notice I'm having the thought that I'm not good enough. I notice tension in my chest. I'm observing these without judging them as good or bad.\"",
            &["awareness", "present", "mindful", "observe"],
        ),
        technique(
            "Describe",
            "Put words to your experience",
            "Example: \"My heart is racing. My palms are sweaty. I'm thinking about the meeting. I feel nervous.\" Just describe what is, not what it means.",
            &["thoughts", "feelings", "awareness", "verbal"],
        ),
        technique(
            "Participate",
            "Throw yourself into the activity",
            "Example: When washing dishes, feel the warm water, notice the soap bubbles, hear the water running. Be fully present in just that moment and activity.",
            &["engagement", "flow", "present", "activity"],
        ),
    ];

    let cognitive = vec![
        technique(
            "Thought Record",
            "Identify situation, mood, thoughts, evidence for/against",
            "Example: Situation: Friend didn't text back. Mood: Sad. Thought: \"They hate me.\" Evidence for: None. Evidence against: They're usually busy at work. Alternative: \"They're probably just busy.\"",
            &["negative thoughts", "cognitive", "thinking", "beliefs"],
        ),
        technique(
            "Behavioral Activation",
            "Schedule pleasant activities",
            "Example: Monday 10am - coffee at favorite café. Tuesday 6pm - call a friend. Wednesday 7pm - watch favorite show. Thursday 5pm - take a walk in the park.",
            &["depression", "motivation", "activity", "mood"],
        ),
        technique(
            "Exposure",
            "Gradually face feared situations",
            "Example: Fear of crowds: Week 1 - walk past a store. Week 2 - enter store for 5 min. Week 3 - stay 15 min. Week 4 - go during busy time. Gradually increase difficulty.",
            &["avoidance", "fear", "phobia", "anxiety"],
        ),
    ];

    TechniqueCatalog {
        categories: vec![
            (TechniqueCategory::Grounding, grounding),
            (TechniqueCategory::DistressTolerance, distress_tolerance),
            (TechniqueCategory::EmotionRegulation, emotion_regulation),
            (TechniqueCategory::Interpersonal, interpersonal),
            (TechniqueCategory::Mindfulness, mindfulness),
            (TechniqueCategory::Cognitive, cognitive),
        ],
    }
}

impl TechniqueCatalog {
    /// Iterate over every technique with its category, in enumeration order
    pub fn iter(&self) -> impl Iterator<Item = (TechniqueCategory, &Technique)> + '_ {
        self.categories
            .iter()
            .flat_map(|(category, techniques)| techniques.iter().map(move |t| (*category, t)))
    }

    /// Techniques in one category (empty if the category is absent)
    pub fn techniques_in(&self, category: TechniqueCategory) -> &[Technique] {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, techniques)| techniques.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a technique by name, ignoring case
    pub fn find(&self, name: &str) -> Option<(TechniqueCategory, &Technique)> {
        let name = name.trim();
        self.iter().find(|(_, t)| t.name.eq_ignore_ascii_case(name))
    }

    /// Total number of techniques
    pub fn len(&self) -> usize {
        self.categories.iter().map(|(_, t)| t.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let mut seen_categories = HashSet::new();
        let mut seen_names = HashSet::new();

        for (category, techniques) in &self.categories {
            if !seen_categories.insert(*category) {
                errors.push(format!("Category '{}' listed more than once", category));
            }
            if techniques.is_empty() {
                errors.push(format!("Category '{}' has no techniques", category));
            }

            for technique in techniques {
                if technique.name.trim().is_empty() {
                    errors.push(format!("Technique in '{}' has empty name", category));
                }
                if !seen_names.insert(technique.name.to_lowercase()) {
                    errors.push(format!("Duplicate technique name '{}'", technique.name));
                }
                if technique.description.trim().is_empty() {
                    errors.push(format!("Technique '{}' has empty description", technique.name));
                }
                if technique.keywords.is_empty() {
                    errors.push(format!("Technique '{}' has no keywords", technique.name));
                }

                // The matcher lower-cases input only, so keywords must already be lower case
                for keyword in &technique.keywords {
                    if keyword.trim().is_empty() {
                        errors.push(format!("Technique '{}' has a blank keyword", technique.name));
                    } else if keyword.to_lowercase() != *keyword {
                        errors.push(format!(
                            "Technique '{}': keyword '{}' is not lower case",
                            technique.name, keyword
                        ));
                    }
                }
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_loads() {
        let catalog = build_default_catalog();
        assert_eq!(catalog.categories.len(), 6);
        assert_eq!(catalog.len(), 17);
    }

    #[test]
    fn test_categories_in_enumeration_order() {
        let catalog = build_default_catalog();
        let order: Vec<_> = catalog.categories.iter().map(|(c, _)| *c).collect();
        assert_eq!(order, TechniqueCategory::ALL.to_vec());
    }

    #[test]
    fn test_every_technique_has_keywords() {
        let catalog = build_default_catalog();
        for (_, technique) in catalog.iter() {
            assert!(
                !technique.keywords.is_empty(),
                "Technique {} has no keywords",
                technique.name
            );
        }
    }

    #[test]
    fn test_default_catalog_validates() {
        let catalog = build_default_catalog();
        let errors = catalog.validate();
        assert!(
            errors.is_empty(),
            "Default catalog has validation errors: {:?}",
            errors
        );
    }

    #[test]
    fn test_validate_flags_bad_keywords() {
        let mut catalog = build_default_catalog();
        catalog.categories[0].1[0].keywords = vec!["Panic".into()];
        catalog.categories[0].1[1].keywords.clear();

        let errors = catalog.validate();
        assert!(errors.iter().any(|e| e.contains("not lower case")));
        assert!(errors.iter().any(|e| e.contains("has no keywords")));
    }

    #[test]
    fn test_find_is_case_insensitive() {
        let catalog = default_catalog();
        let (category, technique) = catalog.find("box breathing").unwrap();
        assert_eq!(category, TechniqueCategory::Grounding);
        assert_eq!(technique.name, "Box Breathing");
        assert!(catalog.find("Juggling").is_none());
    }

    #[test]
    fn test_techniques_in_category() {
        let catalog = default_catalog();
        let names: Vec<_> = catalog
            .techniques_in(TechniqueCategory::Interpersonal)
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(names, vec!["DEAR MAN", "GIVE"]);
    }
}
