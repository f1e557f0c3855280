//! Codabar (NW-7)

use super::EncodedSymbol;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};

const PATTERNS: [(char, &str); 20] = [
    ('0', "1111122"), ('1', "1111221"), ('2', "1112112"), ('3', "2211111"),
    ('4', "1121121"), ('5', "2111121"), ('6', "1211112"), ('7', "1211211"),
    ('8', "1221111"), ('9', "2112111"), ('-', "1112211"), ('$', "1122111"),
    (':', "2111212"), ('/', "2121112"), ('.', "2121211"), ('+', "1121212"),
    ('A', "1122121"), ('B', "1212112"), ('C', "1112122"), ('D', "1112221"),
];

fn pattern(index: usize, ch: char) -> Result<Codeword, EncodeError> {
    PATTERNS
        .iter()
        .find(|(c, _)| *c == ch)
        .map(|(_, w)| Codeword::from_widths(w, Polarity::Bar))
        .ok_or(EncodeError::UnsupportedCharacter { index, ch })
}

/// `payload` carries its start and stop letters.
pub fn encode(payload: &str) -> Result<EncodedSymbol, EncodeError> {
    let chars: Vec<char> = payload.chars().collect();
    let (first, rest) = chars
        .split_first()
        .ok_or(EncodeError::UnsupportedCharacter { index: 0, ch: ' ' })?;
    let (last, inner) = rest
        .split_last()
        .ok_or(EncodeError::UnsupportedCharacter { index: 0, ch: *first })?;

    let data = inner
        .iter()
        .enumerate()
        .map(|(i, ch)| pattern(i + 1, *ch))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(EncodedSymbol::new(pattern(0, *first)?, data, pattern(chars.len() - 1, *last)?)
        .with_gap(1)
        .with_text(payload))
}
