use crate::core::card::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ValidationWarning {
    pub message: String,
    pub severity: Severity,
}

impl ValidationWarning {
    fn error(message: &str) -> Self {
        ValidationWarning { message: message.to_string(), severity: Severity::Error }
    }
}

/// Structural checks only. Error-severity findings block publishing; the
/// card still loads and displays so the reviewer can fix it.
pub fn validate_card(card: &Card) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if card.front.trim().is_empty() {
        warnings.push(ValidationWarning::error("Front (question) cannot be empty."));
    }

    if card.back.trim().is_empty() {
        warnings.push(ValidationWarning::error("Back (answer) cannot be empty."));
    }

    warnings
}

pub fn is_publishable(card: &Card) -> bool {
    validate_card(card).iter().all(|w| w.severity != Severity::Error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_card_has_no_warnings() {
        let card = Card::new("What is a borrow?", "A reference without ownership");
        assert!(validate_card(&card).is_empty());
        assert!(is_publishable(&card));
    }

    #[test]
    fn empty_front_is_one_error() {
        let card = Card::new("", "A");
        let warnings = validate_card(&card);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Error);
        assert!(!is_publishable(&card));
    }

    #[test]
    fn whitespace_only_back_is_one_error() {
        let card = Card::new("Q?", "   ");
        let warnings = validate_card(&card);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].severity, Severity::Error);
        assert!(!is_publishable(&card));
    }

    #[test]
    fn both_blank_yields_two_errors() {
        let card = Card::new(" ", "");
        assert_eq!(validate_card(&card).len(), 2);
    }
}
