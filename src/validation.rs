//! Charset Validation - Rule Composition
//!
//! Rules run in order and the first failure wins.
//! Characters are checked before lengths, lengths before structure.

use serde::{Deserialize, Serialize};

use crate::checksum::{self, EncodeOptions};
use crate::error::CharsetError;
use crate::symbology::Symbology;

/// Input that passed every rule, normalized for the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedData {
    symbology: Symbology,
    payload: String,
    supplied_check: Option<char>,
}

impl ValidatedData {
    pub fn symbology(&self) -> Symbology {
        self.symbology
    }

    /// Data characters, without any check digit the caller supplied.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn supplied_check(&self) -> Option<char> {
        self.supplied_check
    }
}

/// What a rule gets to look at.
pub struct RuleInput<'a> {
    pub data: &'a str,
    pub symbology: Symbology,
    pub options: &'a EncodeOptions,
}

impl RuleInput<'_> {
    fn len(&self) -> usize {
        significant(self.data, self.symbology).count()
    }
}

/// Charset rule trait - first violation is returned
pub trait CharsetRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn check(&self, input: &RuleInput<'_>) -> Result<(), CharsetError>;
}

/// PostNet separators do not count towards anything.
fn significant(data: &str, symbology: Symbology) -> impl Iterator<Item = char> + '_ {
    data.chars()
        .filter(move |c| !(symbology == Symbology::PostNet && *c == '-'))
}

const CODE39_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";
const CODABAR_ALPHABET: &str = "0123456789-$:/.+";

// --- Concrete Rules ---

pub struct AlphabetRule;

impl AlphabetRule {
    fn allowed(symbology: Symbology, index: usize, len: usize, ch: char) -> bool {
        let last = index + 1 == len;
        match symbology {
            Symbology::Code39 => CODE39_ALPHABET.contains(ch),
            Symbology::Code39Extended
            | Symbology::Code93
            | Symbology::Code128
            | Symbology::Telepen => ch.is_ascii(),
            Symbology::Code128A => (ch as u32) < 96,
            Symbology::Code128B => (32..128).contains(&(ch as u32)),
            Symbology::Codabar => {
                CODABAR_ALPHABET.contains(ch)
                    || ((index == 0 || last) && matches!(ch.to_ascii_uppercase(), 'A'..='D'))
            }
            Symbology::Code11 => ch.is_ascii_digit() || ch == '-',
            Symbology::PostNet => ch.is_ascii_digit() || ch == '-',
            Symbology::Fim => matches!(ch.to_ascii_uppercase(), 'A'..='E'),
            Symbology::Isbn => ch.is_ascii_digit() || (last && len == 10 && matches!(ch, 'X' | 'x')),
            _ => ch.is_ascii_digit(),
        }
    }
}

impl CharsetRule for AlphabetRule {
    fn name(&self) -> &'static str { "alphabet" }

    fn check(&self, input: &RuleInput<'_>) -> Result<(), CharsetError> {
        let len = input.data.chars().count();
        for (index, ch) in input.data.chars().enumerate() {
            if !Self::allowed(input.symbology, index, len, ch) {
                return Err(CharsetError::InvalidCharacter { index, ch });
            }
        }
        Ok(())
    }
}

pub struct LengthRule;

impl LengthRule {
    fn accepts(symbology: Symbology, len: usize, options: &EncodeOptions) -> Result<(), &'static str> {
        let ok = |valid: bool, expected: &'static str| if valid { Ok(()) } else { Err(expected) };
        match symbology {
            Symbology::Ean13 | Symbology::Jan13 => ok(matches!(len, 12 | 13), "12 or 13"),
            Symbology::UpcA => ok(matches!(len, 11 | 12), "11 or 12"),
            Symbology::Ean8 => ok(matches!(len, 7 | 8), "7 or 8"),
            Symbology::UpcE => ok(matches!(len, 6 | 7 | 8 | 11 | 12), "6, 7, 8, 11 or 12"),
            Symbology::UpcSupplement2 => ok(len == 2, "2"),
            Symbology::UpcSupplement5 => ok(len == 5, "5"),
            Symbology::Isbn => ok(matches!(len, 9 | 10 | 12 | 13), "9, 10, 12 or 13"),
            Symbology::Itf14 => ok(matches!(len, 13 | 14), "13 or 14"),
            Symbology::Iata2of5 => ok(matches!(len, 16 | 17), "16 or 17"),
            Symbology::PostNet => ok(matches!(len, 5 | 6 | 9 | 11), "5, 6, 9 or 11"),
            Symbology::Fim => ok(len == 1, "1"),
            Symbology::Pharmacode => ok((1..=6).contains(&len), "1 to 6"),
            Symbology::Code128C => ok(len > 0 && len % 2 == 0, "an even number of digits"),
            Symbology::Codabar => ok(len > 0, "at least 1"),
            Symbology::Interleaved2of5 if options.checksum => {
                ok(len % 2 == 1, "an odd number of digits when a check digit is appended")
            }
            Symbology::Interleaved2of5 => ok(len > 0 && len % 2 == 0, "an even number of digits"),
            _ => ok(len > 0, "at least 1"),
        }
    }
}

impl CharsetRule for LengthRule {
    fn name(&self) -> &'static str { "length" }

    fn check(&self, input: &RuleInput<'_>) -> Result<(), CharsetError> {
        let actual = input.len();
        Self::accepts(input.symbology, actual, input.options).map_err(|expected| {
            CharsetError::InvalidLength { expected: expected.to_string(), actual }
        })
    }
}

/// Prefixes, framing characters and numeric ranges.
pub struct StructureRule;

impl StructureRule {
    fn prefix(data: &str, allowed: &[&str], expected: &str) -> Result<(), CharsetError> {
        if allowed.iter().any(|p| data.starts_with(p)) {
            Ok(())
        } else {
            Err(CharsetError::InvalidPrefix {
                expected: expected.to_string(),
                actual: data.chars().take(3).collect(),
            })
        }
    }
}

impl CharsetRule for StructureRule {
    fn name(&self) -> &'static str { "structure" }

    fn check(&self, input: &RuleInput<'_>) -> Result<(), CharsetError> {
        let data = input.data;
        match input.symbology {
            Symbology::Jan13 => Self::prefix(data, &["45", "49"], "45 or 49"),
            Symbology::Isbn if data.len() >= 12 => Self::prefix(data, &["978", "979"], "978 or 979"),
            Symbology::Isbn if data.len() == 10 => {
                let expected = checksum::isbn10(&data[..9]);
                let actual = data[9..].chars().next().map(|c| c.to_ascii_uppercase()).unwrap_or(' ');
                if expected == actual {
                    Ok(())
                } else {
                    Err(CharsetError::CheckDigitMismatch { expected, actual })
                }
            }
            Symbology::UpcE => {
                // 6-digit input implies number system 0
                if data.len() == 6 {
                    return Ok(());
                }
                Self::prefix(data, &["0", "1"], "number system 0 or 1")
            }
            Symbology::Codabar => {
                let is_frame = |c: Option<char>| {
                    c.map_or(false, |c| matches!(c.to_ascii_uppercase(), 'A'..='D'))
                };
                let starts = is_frame(data.chars().next());
                let ends = is_frame(data.chars().last());
                let len = data.chars().count();
                // a start without a stop is reported where the stop belongs,
                // a stop without a start at the stray stop itself
                if starts != ends || (starts && len < 2) {
                    let ch = data.chars().last().unwrap_or(' ');
                    return Err(CharsetError::InvalidCharacter { index: len - 1, ch });
                }
                Ok(())
            }
            Symbology::Pharmacode => {
                let value: u64 = data.parse().unwrap_or(0);
                if (3..=131_070).contains(&value) {
                    Ok(())
                } else {
                    Err(CharsetError::OutOfRange { value, min: 3, max: 131_070 })
                }
            }
            _ => Ok(()),
        }
    }
}

/// Validator orchestrates rules and normalizes accepted input
pub struct Validator {
    rules: Vec<Box<dyn CharsetRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(AlphabetRule),
                Box::new(LengthRule),
                Box::new(StructureRule),
            ],
        }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn validate(
        &self,
        data: &str,
        symbology: Symbology,
        options: &EncodeOptions,
    ) -> Result<ValidatedData, CharsetError> {
        if data.is_empty() {
            return Err(CharsetError::Empty);
        }

        let input = RuleInput { data, symbology, options };
        for rule in &self.rules {
            rule.check(&input).inspect_err(|e| {
                log::debug!("{} rejected {:?} for {}: {}", rule.name(), data, symbology, e);
            })?;
        }

        let validated = normalize(data, symbology);
        verify_supplied_check(&validated, options)?;
        Ok(validated)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate with default encode options.
pub fn validate(data: &str, symbology: Symbology) -> Result<ValidatedData, CharsetError> {
    Validator::new().validate(data, symbology, &EncodeOptions::default())
}

pub fn validate_with(
    data: &str,
    symbology: Symbology,
    options: &EncodeOptions,
) -> Result<ValidatedData, CharsetError> {
    Validator::new().validate(data, symbology, options)
}

fn split_check(data: &str, body_len: usize) -> (String, Option<char>) {
    if data.len() > body_len {
        (data[..body_len].to_string(), data[body_len..].chars().next())
    } else {
        (data.to_string(), None)
    }
}

fn normalize(data: &str, symbology: Symbology) -> ValidatedData {
    let (payload, supplied_check) = match symbology {
        Symbology::Ean13 | Symbology::Jan13 => split_check(data, 12),
        Symbology::UpcA => split_check(data, 11),
        Symbology::Ean8 => split_check(data, 7),
        Symbology::Itf14 => split_check(data, 13),
        Symbology::Iata2of5 => split_check(data, 16),
        Symbology::Isbn => match data.len() {
            9 | 10 => (format!("978{}", &data[..9]), None),
            _ => split_check(data, 12),
        },
        Symbology::UpcE => match data.len() {
            6 => (format!("0{}", data), None),
            7 | 8 => split_check(data, 7),
            _ => split_check(data, 11),
        },
        Symbology::Codabar => {
            let upper = data.to_ascii_uppercase();
            let framed = upper.starts_with(|c: char| matches!(c, 'A'..='D'));
            if framed {
                (upper, None)
            } else {
                (format!("A{}A", upper), None)
            }
        }
        Symbology::Fim => (data.to_ascii_uppercase(), None),
        Symbology::PostNet => (significant(data, symbology).collect(), None),
        _ => (data.to_string(), None),
    };
    ValidatedData { symbology, payload, supplied_check }
}

fn verify_supplied_check(validated: &ValidatedData, options: &EncodeOptions) -> Result<(), CharsetError> {
    let Some(actual) = validated.supplied_check else {
        return Ok(());
    };
    let expected = checksum::compute(validated, options).and_then(|c| c.first_char());
    match expected {
        Some(expected) if expected == actual => Ok(()),
        Some(expected) => Err(CharsetError::CheckDigitMismatch { expected, actual }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_characters_checked_before_length() {
        let err = validate("12AB", Symbology::Ean13).unwrap_err();
        assert_eq!(err, CharsetError::InvalidCharacter { index: 2, ch: 'A' });
    }

    #[test]
    fn test_ean13_length() {
        let err = validate("12345", Symbology::Ean13).unwrap_err();
        assert_eq!(err, CharsetError::InvalidLength { expected: "12 or 13".into(), actual: 5 });
    }

    #[test]
    fn test_supplied_check_digit_verified() {
        let ok = validate("123456789012", Symbology::UpcA).unwrap();
        assert_eq!(ok.payload(), "12345678901");
        assert_eq!(ok.supplied_check(), Some('2'));

        let err = validate("123456789015", Symbology::UpcA).unwrap_err();
        assert_eq!(err, CharsetError::CheckDigitMismatch { expected: '2', actual: '5' });
    }

    #[test]
    fn test_code39_rejects_lowercase_and_asterisk() {
        assert!(matches!(
            validate("abc", Symbology::Code39),
            Err(CharsetError::InvalidCharacter { index: 0, ch: 'a' })
        ));
        assert!(matches!(
            validate("A*B", Symbology::Code39),
            Err(CharsetError::InvalidCharacter { index: 1, ch: '*' })
        ));
        assert!(validate("abc", Symbology::Code39Extended).is_ok());
    }

    #[test]
    fn test_interleaved_parity_follows_checksum_flag() {
        assert!(validate("1234", Symbology::Interleaved2of5).is_ok());
        assert!(validate("123", Symbology::Interleaved2of5).is_err());
        let with_check = EncodeOptions::with_checksum();
        assert!(validate_with("123", Symbology::Interleaved2of5, &with_check).is_ok());
    }

    #[test]
    fn test_codabar_framing() {
        let framed = validate("a1234b", Symbology::Codabar).unwrap();
        assert_eq!(framed.payload(), "A1234B");
        let bare = validate("1234", Symbology::Codabar).unwrap();
        assert_eq!(bare.payload(), "A1234A");
        assert!(matches!(
            validate("A1234", Symbology::Codabar),
            Err(CharsetError::InvalidCharacter { index: 4, .. })
        ));
        assert_eq!(
            validate("1234A", Symbology::Codabar).unwrap_err(),
            CharsetError::InvalidCharacter { index: 4, ch: 'A' }
        );
        assert!(matches!(
            validate("12A34", Symbology::Codabar),
            Err(CharsetError::InvalidCharacter { index: 2, ch: 'A' })
        ));
    }

    #[test]
    fn test_isbn_forms() {
        assert_eq!(validate("0306406152", Symbology::Isbn).unwrap().payload(), "978030640615");
        assert!(matches!(
            validate("0306406153", Symbology::Isbn),
            Err(CharsetError::CheckDigitMismatch { expected: '2', actual: '3' })
        ));
        assert!(matches!(
            validate("123456789012", Symbology::Isbn),
            Err(CharsetError::InvalidPrefix { .. })
        ));
    }

    #[test]
    fn test_jan_prefix() {
        assert!(validate("490123456789", Symbology::Jan13).is_ok());
        assert!(validate("400638133393", Symbology::Jan13).is_err());
    }

    #[test]
    fn test_pharmacode_range() {
        assert!(validate("3", Symbology::Pharmacode).is_ok());
        assert!(validate("131070", Symbology::Pharmacode).is_ok());
        assert_eq!(
            validate("2", Symbology::Pharmacode).unwrap_err(),
            CharsetError::OutOfRange { value: 2, min: 3, max: 131_070 }
        );
    }

    #[test]
    fn test_postnet_ignores_dashes() {
        let zip = validate("12345-6789", Symbology::PostNet).unwrap();
        assert_eq!(zip.payload(), "123456789");
    }

    #[test]
    fn test_empty_rejected() {
        assert_eq!(validate("", Symbology::Code128).unwrap_err(), CharsetError::Empty);
    }
}
