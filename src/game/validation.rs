//! Word validation
//!
//! Validates a spelled snake against:
//! - Minimum length (3 characters; "Qu" counts as two)
//! - Dictionary presence

use super::dictionary::Dictionary;

/// Minimum word length for valid submissions
pub const MIN_WORD_LENGTH: usize = 3;

/// Result of word validation with specific error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Word is valid
    Valid,
    /// Word is too short (less than 3 characters)
    TooShort { length: usize },
    /// Word not found in dictionary
    NotInDictionary,
}

impl ValidationResult {
    /// Returns true if the word is valid
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Returns a user-friendly error message
    pub fn message(&self) -> String {
        match self {
            ValidationResult::Valid => "Valid word!".to_string(),
            ValidationResult::TooShort { length } => {
                format!("Too short ({} chars, need {}+)", length, MIN_WORD_LENGTH)
            }
            ValidationResult::NotInDictionary => "Not in dictionary".to_string(),
        }
    }
}

/// Validate a spelled word
///
/// Checks in order:
/// 1. Length >= 3
/// 2. Word exists in dictionary
pub fn validate_word(word: &str, dictionary: &Dictionary) -> ValidationResult {
    let length = word.chars().count();
    if length < MIN_WORD_LENGTH {
        return ValidationResult::TooShort { length };
    }
    if !dictionary.contains(word) {
        return ValidationResult::NotInDictionary;
    }
    ValidationResult::Valid
}
