//! Code 39 and Code 39 Extended (full ASCII)

use super::{bad_check, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity, WidthSequence};

/// Characters in mod-43 value order.
const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Bar/space widths per mod-43 value; index 43 is the `*` start/stop.
const PATTERNS: [&str; 44] = [
    "111221211", "211211112", "112211112", "212211111", "111221112",
    "211221111", "112221111", "111211212", "211211211", "112211211",
    "211112112", "112112112", "212112111", "111122112", "211122111",
    "112122111", "111112212", "211112211", "112112211", "111122211",
    "211111122", "112111122", "212111121", "111121122", "211121121",
    "112121121", "111111222", "211111221", "112111221", "111121221",
    "221111112", "122111112", "222111111", "121121112", "221121111",
    "122121111", "121111212", "221111211", "122111211", "121212111",
    "121211121", "121112121", "111212121", "121121211",
];

const START_STOP: usize = 43;

pub fn mod43_value(ch: char) -> Option<u32> {
    CHARSET.find(ch).map(|i| i as u32)
}

pub fn mod43_char(value: u32) -> Option<char> {
    CHARSET.chars().nth(value as usize)
}

fn pattern(index: usize) -> Option<Codeword> {
    PATTERNS.get(index).map(|w| Codeword::from_widths(w, Polarity::Bar))
}

fn letter(base: u8, offset: u32) -> char {
    char::from(base + offset as u8)
}

/// Full-ASCII expansion of one character into basic Code 39 characters.
fn extended(ch: char) -> Option<String> {
    let code = ch as u32;
    let expansion = match ch {
        '0'..='9' | 'A'..='Z' | ' ' | '-' | '.' => ch.to_string(),
        '\u{0}' => "%U".to_string(),
        '\u{1}'..='\u{1a}' => format!("${}", letter(b'A', code - 1)),
        '\u{1b}'..='\u{1f}' => format!("%{}", letter(b'A', code - 27)),
        '!'..=',' => format!("/{}", letter(b'A', code - 33)),
        '/' => "/O".to_string(),
        ':' => "/Z".to_string(),
        ';'..='?' => format!("%{}", letter(b'F', code - 59)),
        '@' => "%V".to_string(),
        '['..='_' => format!("%{}", letter(b'K', code - 91)),
        '`' => "%W".to_string(),
        'a'..='z' => format!("+{}", letter(b'A', code - 97)),
        '{'..='~' => format!("%{}", letter(b'P', code - 123)),
        '\u{7f}' => "%T".to_string(),
        _ => return None,
    };
    Some(expansion)
}

/// Translate full ASCII into the basic 43-character set.
pub fn translate_extended(data: &str) -> Result<String, EncodeError> {
    let mut out = String::with_capacity(data.len() * 2);
    for (index, ch) in data.chars().enumerate() {
        let expansion = extended(ch).ok_or(EncodeError::UnsupportedCharacter { index, ch })?;
        out.push_str(&expansion);
    }
    Ok(out)
}

pub fn encode(payload: &str, check: Option<&CheckDigit>, extended: bool) -> Result<EncodedSymbol, EncodeError> {
    let text = if extended {
        translate_extended(payload)?
    } else {
        payload.to_string()
    };

    let mut data = Vec::with_capacity(text.len());
    for (index, ch) in text.chars().enumerate() {
        let codeword = mod43_value(ch)
            .and_then(|v| pattern(v as usize))
            .ok_or(EncodeError::UnsupportedCharacter { index, ch })?;
        data.push(codeword);
    }

    let mut checks = Vec::new();
    if let Some(check) = check {
        for value in &check.values {
            checks.push(pattern(*value as usize).ok_or_else(|| bad_check(text.len(), *value))?);
        }
    }

    let frame = pattern(START_STOP).unwrap_or_default();
    Ok(EncodedSymbol::new(frame.clone(), data, frame)
        .with_check(checks)
        .with_gap(1)
        .with_text(payload))
}

/// Reference decoder: reads the characters between the `*` frames.
///
/// Returns `None` for anything that is not a well-formed Code 39 symbol.
/// Check characters, if present, come back as part of the text.
pub fn decode(sequence: &WidthSequence) -> Option<String> {
    let modules = sequence.symbol_modules();
    let mut indices = Vec::new();
    for chunk in modules.chunks(10) {
        if chunk.len() < 9 {
            return None;
        }
        if let Some(gap) = chunk.get(9) {
            if gap.is_bar() || gap.width != 1 {
                return None;
            }
        }
        if !chunk[0].is_bar() {
            return None;
        }
        let widths = chunk[..9]
            .iter()
            .map(|m| char::from_digit(m.width, 10))
            .collect::<Option<String>>()?;
        indices.push(PATTERNS.iter().position(|p| *p == widths)?);
    }

    let (first, rest) = indices.split_first()?;
    let (last, inner) = rest.split_last()?;
    if *first != START_STOP || *last != START_STOP {
        return None;
    }
    inner.iter().map(|i| mod43_char(*i as u32)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_have_three_wide_elements() {
        for p in PATTERNS {
            assert_eq!(p.len(), 9);
            assert_eq!(p.chars().filter(|c| *c == '2').count(), 3, "{}", p);
        }
    }

    #[test]
    fn test_extended_translation() {
        assert_eq!(translate_extended("a").unwrap(), "+A");
        assert_eq!(translate_extended("Code!").unwrap(), "C+O+D+E/A");
        assert_eq!(translate_extended("\u{0}\u{7f}").unwrap(), "%U%T");
        assert_eq!(translate_extended("@`").unwrap(), "%V%W");
        assert!(translate_extended("é").is_err());
    }

    #[test]
    fn test_encode_frames_with_asterisk() {
        let symbol = encode("A", None, false).unwrap();
        assert_eq!(symbol.start, pattern(START_STOP).unwrap());
        assert_eq!(symbol.stop, symbol.start);
        assert_eq!(symbol.data.len(), 1);
        assert_eq!(symbol.inter_character_gap, Some(1));
    }
}
