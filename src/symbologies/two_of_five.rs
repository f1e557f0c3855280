//! 2 of 5 family - Interleaved (and ITF-14), Standard and IATA

use super::{digit_at, digit_check, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Module, Polarity};

/// Narrow/wide elements per digit; exactly two wide.
const NW_PATTERNS: [&str; 10] = [
    "NNWWN", "WNNNW", "NWNNW", "WWNNN", "NNWNW",
    "WNWNN", "NWWNN", "NNNWW", "WNNWN", "NWNWN",
];

const INTERLEAVED_WIDE: u32 = 2;

/// Standard/IATA digits: information in the bars, wide bar = 3 units.
const STANDARD_WIDTHS: [&str; 10] = [
    "1111313111", "3111111131", "1131111131", "3131111111", "1111311131",
    "3111311111", "1131311111", "1111113131", "3111113111", "1131113111",
];

fn element_width(element: u8) -> u32 {
    if element == b'W' { INTERLEAVED_WIDE } else { 1 }
}

/// One interleaved pair: first digit in the bars, second in the spaces.
fn interleaved_pair(bars: usize, spaces: usize) -> Option<Codeword> {
    let bar_pattern = NW_PATTERNS.get(bars)?.as_bytes();
    let space_pattern = NW_PATTERNS.get(spaces)?.as_bytes();
    let mut codeword = Codeword::empty();
    for (b, s) in bar_pattern.iter().zip(space_pattern) {
        codeword.push(Module::bar(element_width(*b)));
        codeword.push(Module::space(element_width(*s)));
    }
    Some(codeword)
}

fn with_check(payload: &str, check: Option<&CheckDigit>) -> String {
    format!("{}{}", payload, check.map(|c| c.text.as_str()).unwrap_or(""))
}

pub fn encode_interleaved(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let full = with_check(payload, check);
    let chars: Vec<char> = full.chars().collect();
    if chars.len() % 2 == 1 {
        let index = chars.len() - 1;
        return Err(EncodeError::UnsupportedCharacter { index, ch: chars[index] });
    }

    let mut data = Vec::with_capacity(chars.len() / 2);
    for (pair, digits) in chars.chunks(2).enumerate() {
        let index = pair * 2;
        let bars = digit_at(index, digits[0])?;
        let spaces = digit_at(index + 1, digits[1])?;
        let codeword = interleaved_pair(bars, spaces)
            .ok_or(EncodeError::UnsupportedCharacter { index, ch: digits[0] })?;
        data.push(codeword);
    }

    Ok(EncodedSymbol::new(
        Codeword::from_widths("1111", Polarity::Bar),
        data,
        Codeword::from_widths("211", Polarity::Bar),
    )
    .with_text(full))
}

fn standard_digit(digit: usize) -> Option<Codeword> {
    STANDARD_WIDTHS.get(digit).map(|w| Codeword::from_widths(w, Polarity::Bar))
}

fn encode_discrete(
    payload: &str,
    check: Option<&CheckDigit>,
    start: &str,
    stop: &str,
) -> Result<EncodedSymbol, EncodeError> {
    let mut data = Vec::with_capacity(payload.len());
    for (index, ch) in payload.char_indices() {
        let digit = digit_at(index, ch)?;
        data.push(standard_digit(digit).ok_or(EncodeError::UnsupportedCharacter { index, ch })?);
    }

    Ok(EncodedSymbol::new(
        Codeword::from_widths(start, Polarity::Bar),
        data,
        Codeword::from_widths(stop, Polarity::Bar),
    )
    .with_check(digit_check(check, payload.len(), standard_digit)?)
    .with_text(with_check(payload, check)))
}

pub fn encode_standard(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    encode_discrete(payload, check, "212111", "21112")
}

pub fn encode_iata(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    encode_discrete(payload, check, "1111", "311")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_digit_has_two_wide() {
        for p in NW_PATTERNS {
            assert_eq!(p.matches('W').count(), 2);
        }
    }

    #[test]
    fn test_pair_interleaves() {
        let cw = interleaved_pair(1, 2).unwrap();
        let widths: Vec<u32> = cw.modules().iter().map(|m| m.width).collect();
        // 1 = WNNNW in bars, 2 = NWNNW in spaces
        assert_eq!(widths, vec![2, 1, 1, 2, 1, 1, 1, 1, 2, 2]);
    }

    #[test]
    fn test_itf14_pairs_include_check() {
        let symbol = encode_interleaved("1234567890123", Some(&CheckDigit::digit(1))).unwrap();
        assert_eq!(symbol.data.len(), 7);
        assert_eq!(symbol.text, "12345678901231");
    }

    #[test]
    fn test_standard_appends_check_codeword() {
        let symbol = encode_standard("123", Some(&CheckDigit::digit(0))).unwrap();
        assert_eq!(symbol.data.len(), 3);
        assert_eq!(symbol.check.len(), 1);
        assert_eq!(symbol.text, "1230");
    }
}
