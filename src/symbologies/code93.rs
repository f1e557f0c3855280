//! Code 93 with full ASCII through the four shift codewords

use super::{bad_check, code39, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};

const CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Widths per value 0..=46; 43..=46 are the ($) (%) (/) (+) shifts.
const PATTERNS: [&str; 47] = [
    "131112", "111213", "111312", "111411", "121113", "121212", "121311", "111114",
    "131211", "141111", "211113", "211212", "211311", "221112", "221211", "231111",
    "112113", "112212", "112311", "122112", "132111", "111123", "111222", "111321",
    "121122", "131121", "212112", "212211", "211122", "211221", "221121", "222111",
    "112122", "112221", "122121", "123111", "121131", "311112", "311211", "321111",
    "112131", "113121", "211131", "121221", "312111", "311121", "122211",
];

const START: &str = "111141";
/// Stop pattern followed by the termination bar.
const STOP: &str = "1111411";

const SHIFT_NAMES: [&str; 4] = ["($)", "(%)", "(/)", "(+)"];

fn shift_value(shift: char) -> Option<u32> {
    match shift {
        '$' => Some(43),
        '%' => Some(44),
        '/' => Some(45),
        '+' => Some(46),
        _ => None,
    }
}

fn base_value(ch: char) -> Option<u32> {
    CHARSET.find(ch).map(|i| i as u32)
}

/// Codeword values for the data, expanding non-basic characters into shift pairs.
pub fn values(data: &str) -> Result<Vec<u32>, EncodeError> {
    let mut out = Vec::with_capacity(data.len());
    for (index, ch) in data.chars().enumerate() {
        if let Some(value) = base_value(ch) {
            out.push(value);
            continue;
        }
        let unsupported = EncodeError::UnsupportedCharacter { index, ch };
        let pair = code39::translate_extended(&ch.to_string()).map_err(|_| unsupported.clone())?;
        let mut chars = pair.chars();
        let shift = chars.next().and_then(shift_value).ok_or(unsupported.clone())?;
        let letter = chars.next().and_then(base_value).ok_or(unsupported)?;
        out.push(shift);
        out.push(letter);
    }
    Ok(out)
}

/// Printable name of a value, shifts shown in parentheses.
pub fn display(value: u32) -> String {
    match value {
        0..=42 => CHARSET.chars().nth(value as usize).map(String::from).unwrap_or_default(),
        43..=46 => SHIFT_NAMES[(value - 43) as usize].to_string(),
        _ => String::new(),
    }
}

fn pattern(value: u32) -> Option<Codeword> {
    PATTERNS.get(value as usize).map(|w| Codeword::from_widths(w, Polarity::Bar))
}

pub fn encode(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let values = values(payload)?;
    let data = values
        .iter()
        .enumerate()
        .map(|(i, v)| pattern(*v).ok_or_else(|| bad_check(i, *v)))
        .collect::<Result<Vec<_>, _>>()?;

    let checks = match check {
        Some(check) => check
            .values
            .iter()
            .map(|v| pattern(*v).ok_or_else(|| bad_check(values.len(), *v)))
            .collect::<Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(EncodedSymbol::new(
        Codeword::from_widths(START, Polarity::Bar),
        data,
        Codeword::from_widths(STOP, Polarity::Bar),
    )
    .with_check(checks)
    .with_text(payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::mod47_pair;

    #[test]
    fn test_patterns_are_nine_units() {
        for p in PATTERNS {
            let units: u32 = p.chars().filter_map(|c| c.to_digit(10)).sum();
            assert_eq!(units, 9, "{}", p);
        }
    }

    #[test]
    fn test_lowercase_uses_shift() {
        assert_eq!(values("a").unwrap(), vec![46, 10]);
        assert_eq!(values("A").unwrap(), vec![10]);
    }

    #[test]
    fn test_check_values_for_test93() {
        // TEST93 -> C = '+', K = '6'
        let v = values("TEST93").unwrap();
        let (c, k) = mod47_pair(&v);
        assert_eq!(display(c), "+");
        assert_eq!(display(k), "6");
    }
}
