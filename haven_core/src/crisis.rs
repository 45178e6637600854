//! Crisis line directory.

use serde::Serialize;

/// A crisis support line
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct CrisisResource {
    pub name: &'static str,
    pub number: &'static str,
    pub description: &'static str,
    /// Message body for text-only lines; `None` means the line takes calls
    pub text_body: Option<&'static str>,
}

pub const CRISIS_RESOURCES: &[CrisisResource] = &[
    CrisisResource {
        name: "National Suicide Prevention Lifeline",
        number: "988",
        description: "24/7 free and confidential support",
        text_body: None,
    },
    CrisisResource {
        name: "Crisis Text Line",
        number: "741741",
        description: "Text HOME to connect with a crisis counselor",
        text_body: Some("HOME"),
    },
    CrisisResource {
        name: "Veterans Crisis Line",
        number: "1-800-273-8255",
        description: "Support for veterans and their families",
        text_body: None,
    },
    CrisisResource {
        name: "SAMHSA National Helpline",
        number: "1-800-662-4357",
        description: "Treatment referral and information, 24/7",
        text_body: None,
    },
];

/// Number to call when in immediate danger
pub const EMERGENCY_NUMBER: &str = "911";

impl CrisisResource {
    pub fn is_text(&self) -> bool {
        self.text_body.is_some()
    }

    /// `tel:` URI for call lines, `sms:` URI with the message body for text lines
    pub fn contact_uri(&self) -> String {
        match self.text_body {
            Some(body) => format!("sms:{}&body={}", self.number, body),
            None => format!("tel:{}", self.number),
        }
    }

    /// One-line label, e.g. `Crisis Text Line, Text 741741`
    pub fn label(&self) -> String {
        let verb = if self.is_text() { "Text" } else { "Call" };
        format!("{}, {} {}", self.name, verb, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_line_uri() {
        let text_line = CRISIS_RESOURCES
            .iter()
            .find(|r| r.name == "Crisis Text Line")
            .unwrap();
        assert_eq!(text_line.contact_uri(), "sms:741741&body=HOME");
        assert_eq!(text_line.label(), "Crisis Text Line, Text 741741");
    }

    #[test]
    fn test_call_line_uri() {
        assert_eq!(CRISIS_RESOURCES[0].contact_uri(), "tel:988");
        assert!(!CRISIS_RESOURCES[0].is_text());
    }

    #[test]
    fn test_directory_contents() {
        let names: Vec<_> = CRISIS_RESOURCES.iter().map(|r| r.name).collect();
        assert!(names.contains(&"Veterans Crisis Line"));
        assert!(names.contains(&"SAMHSA National Helpline"));
        assert_eq!(CRISIS_RESOURCES.len(), 4);
    }
}
