//! Recurring reminder schedules.
//!
//! Describes what should be delivered and when; handing the schedule to an
//! OS notification service is up to the front end.

use crate::config::ReminderConfig;
use crate::{Error, Result};
use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// When a reminder fires
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trigger {
    /// Every day at a wall-clock time
    Daily { hour: u32, minute: u32 },
    /// Repeatedly, a fixed number of seconds apart
    Every { seconds: u64 },
}

impl Trigger {
    /// Next fire time strictly after `now`, in the same time zone.
    ///
    /// Daily triggers that land in a DST gap move to the next day on which
    /// the wall-clock time exists.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        match *self {
            Trigger::Every { seconds } => {
                let step = Duration::try_seconds(i64::try_from(seconds).ok()?)?;
                now.clone().checked_add_signed(step)
            }
            Trigger::Daily { hour, minute } => {
                let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
                let tz = now.timezone();
                let mut date = now.date_naive();
                for _ in 0..3 {
                    if let Some(candidate) = tz.from_local_datetime(&date.and_time(time)).earliest() {
                        if candidate > *now {
                            return Some(candidate);
                        }
                    }
                    date = date.succ_opt()?;
                }
                None
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Trigger::Daily { hour, minute } => format!("daily at {:02}:{:02}", hour, minute),
            Trigger::Every { seconds } if seconds % 3600 == 0 => {
                format!("every {} hour(s)", seconds / 3600)
            }
            Trigger::Every { seconds } if seconds % 60 == 0 => {
                format!("every {} minute(s)", seconds / 60)
            }
            Trigger::Every { seconds } => format!("every {} second(s)", seconds),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReminderKind {
    MoodCheckIn,
    BreathingBreak,
    Medication { medication_id: Uuid },
}

/// A notification to deliver on a trigger
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReminderSchedule {
    pub kind: ReminderKind,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
}

impl ReminderSchedule {
    pub fn mood_check_in(config: &ReminderConfig) -> Self {
        Self {
            kind: ReminderKind::MoodCheckIn,
            title: "Daily Check-in".into(),
            body: "How are you feeling today? Take a moment to log your mood.".into(),
            trigger: Trigger::Daily {
                hour: config.mood_hour,
                minute: config.mood_minute,
            },
        }
    }

    pub fn breathing_break(config: &ReminderConfig) -> Self {
        Self {
            kind: ReminderKind::BreathingBreak,
            title: "Breathing Break".into(),
            body: "Take a moment for a quick breathing exercise".into(),
            trigger: Trigger::Every {
                seconds: config.breathing_interval_secs,
            },
        }
    }

    pub fn medication(medication: &Medication) -> Self {
        Self {
            kind: ReminderKind::Medication {
                medication_id: medication.id,
            },
            title: "Medication Reminder".into(),
            body: format!("Time to take your {}", medication.name),
            trigger: Trigger::Daily {
                hour: medication.hour,
                minute: medication.minute,
            },
        }
    }
}

/// Every reminder that should be active: mood check-in, breathing breaks,
/// then one per medication
pub fn active_schedules(config: &ReminderConfig, medications: &[Medication]) -> Vec<ReminderSchedule> {
    let mut schedules = vec![
        ReminderSchedule::mood_check_in(config),
        ReminderSchedule::breathing_break(config),
    ];
    schedules.extend(medications.iter().map(ReminderSchedule::medication));
    schedules
}

// ============================================================================
// Medications
// ============================================================================

/// A medication taken daily at a fixed time
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Medication {
    pub id: Uuid,
    pub name: String,
    pub hour: u32,
    pub minute: u32,
}

impl Medication {
    pub fn new(name: impl Into<String>, hour: u32, minute: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            hour,
            minute,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("medication name is empty".into()));
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(Error::Validation(format!(
                "{:02}:{:02} is not a valid time of day",
                self.hour, self.minute
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_daily_later_today() {
        let trigger = Trigger::Daily { hour: 20, minute: 0 };
        assert_eq!(trigger.next_after(&at(9, 15)), Some(at(20, 0)));
    }

    #[test]
    fn test_daily_rolls_to_tomorrow() {
        let trigger = Trigger::Daily { hour: 20, minute: 0 };
        let expected = Utc.with_ymd_and_hms(2025, 11, 11, 20, 0, 0).unwrap();
        assert_eq!(trigger.next_after(&at(21, 0)), Some(expected));
        // Strictly after: firing time itself rolls over
        assert_eq!(trigger.next_after(&at(20, 0)), Some(expected));
    }

    #[test]
    fn test_every_interval() {
        let trigger = Trigger::Every { seconds: 3600 };
        assert_eq!(trigger.next_after(&at(9, 15)), Some(at(10, 15)));
    }

    #[test]
    fn test_invalid_daily_time() {
        let trigger = Trigger::Daily { hour: 24, minute: 0 };
        assert_eq!(trigger.next_after(&at(9, 0)), None);
    }

    #[test]
    fn test_describe() {
        assert_eq!(Trigger::Daily { hour: 8, minute: 5 }.describe(), "daily at 08:05");
        assert_eq!(Trigger::Every { seconds: 3600 }.describe(), "every 1 hour(s)");
        assert_eq!(Trigger::Every { seconds: 90 }.describe(), "every 90 second(s)");
    }

    #[test]
    fn test_default_schedules() {
        let medication = Medication::new("Prazosin", 21, 30);
        let schedules = active_schedules(&ReminderConfig::default(), &[medication.clone()]);

        assert_eq!(schedules.len(), 3);
        assert_eq!(schedules[0].trigger, Trigger::Daily { hour: 20, minute: 0 });
        assert_eq!(schedules[1].trigger, Trigger::Every { seconds: 3600 });
        assert_eq!(schedules[2].body, "Time to take your Prazosin");
        assert_eq!(
            schedules[2].kind,
            ReminderKind::Medication {
                medication_id: medication.id
            }
        );
    }

    #[test]
    fn test_medication_validation() {
        assert!(Medication::new("Sertraline", 8, 0).validate().is_ok());
        assert!(Medication::new(" ", 8, 0).validate().is_err());
        assert!(Medication::new("Sertraline", 8, 60).validate().is_err());
    }
}
