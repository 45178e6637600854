//! Technique matcher: free text in, ranked coping techniques out.
//!
//! Scoring is plain keyword containment against the lower-cased input:
//! - each keyword found anywhere in the input adds one point
//! - techniques scoring zero are dropped
//! - ties keep taxonomy order (category order, then technique order)

use crate::catalog::default_catalog;
use crate::{Suggestion, Technique, TechniqueCatalog, TechniqueCategory};

/// Maximum number of suggestions returned per query
pub const MAX_SUGGESTIONS: usize = 3;

/// Suggest up to three techniques from the default catalog for `input`
pub fn suggest_techniques(input: &str) -> Vec<Suggestion> {
    suggest_from(default_catalog(), input)
}

/// Suggest up to three techniques from `catalog` for `input`
///
/// Total over any input: empty, whitespace-only or keyword-free text
/// yields an empty list.
pub fn suggest_from(catalog: &TechniqueCatalog, input: &str) -> Vec<Suggestion> {
    if input.trim().is_empty() {
        return Vec::new();
    }

    let input = input.to_lowercase();

    let mut scored: Vec<(u32, TechniqueCategory, &Technique)> = catalog
        .iter()
        .filter_map(|(category, technique)| {
            let score = score_technique(technique, &input);
            (score > 0).then_some((score, category, technique))
        })
        .collect();

    // sort_by is stable, so equal scores stay in taxonomy order
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    let suggestions: Vec<Suggestion> = scored
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(score, category, technique)| Suggestion {
            technique: technique.clone(),
            category,
            score,
        })
        .collect();

    tracing::debug!(
        "Matched {} technique(s) for {}-char input",
        suggestions.len(),
        input.chars().count()
    );

    suggestions
}

/// Suggestions for text that is still being typed.
///
/// Returns nothing until the draft is longer than `after_chars`, measured in
/// UTF-16 code units (an emoji outside the BMP counts as two).
pub fn suggest_for_draft(draft: &str, after_chars: usize) -> Vec<Suggestion> {
    if draft.encode_utf16().count() <= after_chars {
        return Vec::new();
    }
    suggest_techniques(draft)
}

/// Number of the technique's keywords contained in `lowered_input`
fn score_technique(technique: &Technique, lowered_input: &str) -> u32 {
    technique
        .keywords
        .iter()
        .filter(|keyword| lowered_input.contains(keyword.as_str()))
        .count() as u32
}
