//! Progress statistics over the mood journal and technique usage.

use crate::{MoodEntry, TechniqueUsage};
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;

/// Days shown in the mood trend
pub const TREND_DAYS: u32 = 7;

/// Techniques shown in the most-used list
pub const TOP_TECHNIQUES: usize = 5;

/// Mean mood for one calendar day
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct DayMood {
    pub date: NaiveDate,
    pub average: Option<f64>,
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct TechniqueCount {
    pub technique: String,
    pub count: usize,
}

fn local_day(entry: &MoodEntry) -> NaiveDate {
    entry.timestamp.with_timezone(&Local).date_naive()
}

/// One point per day for the `days` days ending at `today`, oldest first.
///
/// Days are local calendar days of each entry's timestamp.
pub fn mood_trend(logs: &[MoodEntry], today: NaiveDate, days: u32) -> Vec<DayMood> {
    (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .map(|date| {
            let scores: Vec<f64> = logs
                .iter()
                .filter(|entry| local_day(entry) == date)
                .map(|entry| f64::from(entry.mood))
                .collect();
            let average = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            DayMood { date, average }
        })
        .collect()
}

/// Most used techniques, by count descending; ties keep first-seen order
pub fn technique_counts(usage: &[TechniqueUsage], limit: usize) -> Vec<TechniqueCount> {
    let mut counts: Vec<TechniqueCount> = Vec::new();
    for entry in usage {
        match counts.iter_mut().find(|c| c.technique == entry.technique) {
            Some(existing) => existing.count += 1,
            None => counts.push(TechniqueCount {
                technique: entry.technique.clone(),
                count: 1,
            }),
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// Headline numbers for the progress view
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressSummary {
    pub trend: Vec<DayMood>,
    /// Days in the trend window with at least one mood log
    pub days_logged: usize,
    pub total_mood_logs: usize,
    pub total_technique_uses: usize,
    /// Mean of the daily averages in the trend window
    pub average_mood: Option<f64>,
    pub top_techniques: Vec<TechniqueCount>,
}

impl ProgressSummary {
    pub fn compute(logs: &[MoodEntry], usage: &[TechniqueUsage], today: NaiveDate) -> Self {
        let trend = mood_trend(logs, today, TREND_DAYS);
        let daily: Vec<f64> = trend.iter().filter_map(|day| day.average).collect();
        let average_mood = if daily.is_empty() {
            None
        } else {
            Some(daily.iter().sum::<f64>() / daily.len() as f64)
        };

        Self {
            days_logged: daily.len(),
            total_mood_logs: logs.len(),
            total_technique_uses: usage.len(),
            average_mood,
            top_techniques: technique_counts(usage, TOP_TECHNIQUES),
            trend,
        }
    }
}
