//! Code 11 (USD-8)

use super::EncodedSymbol;
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};

/// Digits 0-9 then `-`; three bars and two spaces each.
const PATTERNS: [&str; 11] = [
    "11112", "21112", "12112", "22111", "11212", "21211",
    "12211", "11122", "21121", "21111", "11211",
];

const START_STOP: &str = "11221";

fn pattern(index: usize, ch: char) -> Result<Codeword, EncodeError> {
    let slot = match ch {
        '-' => 10,
        _ => ch.to_digit(10).ok_or(EncodeError::UnsupportedCharacter { index, ch })? as usize,
    };
    Ok(Codeword::from_widths(PATTERNS[slot], Polarity::Bar))
}

pub fn encode(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let data = payload
        .chars()
        .enumerate()
        .map(|(i, ch)| pattern(i, ch))
        .collect::<Result<Vec<_>, _>>()?;

    let offset = data.len();
    let checks = match check {
        Some(c) => c
            .text
            .chars()
            .enumerate()
            .map(|(i, ch)| pattern(offset + i, ch))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    let frame = Codeword::from_widths(START_STOP, Polarity::Bar);
    Ok(EncodedSymbol::new(frame.clone(), data, frame)
        .with_check(checks)
        .with_gap(1)
        .with_text(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum;

    #[test]
    fn test_dash_has_pattern() {
        assert!(pattern(0, '-').is_ok());
        assert!(pattern(0, 'A').is_err());
    }

    #[test]
    fn test_long_data_gets_two_checks() {
        let check = checksum::code11("1234567890");
        let symbol = encode("1234567890", Some(&check)).unwrap();
        assert_eq!(symbol.check.len(), 2);
    }
}
