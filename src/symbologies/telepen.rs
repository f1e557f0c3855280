//! Telepen - full ASCII with a double-density numeric mode

use super::{bad_check, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};

/// Widths for ASCII 0..=127; every pattern is 16 units.
const ASCII: [&str; 128] = [
    "31313131", "1131313111", "33313111", "1111313131", "3111313111", "11333131",
    "13133131", "111111313111", "31333111", "1131113131", "33113131", "1111333111",
    "3111113131", "1113133111", "1311133111", "111111113131", "3131113111", "11313331",
    "333331", "111131113111", "31113331", "1133113111", "1313113111", "1111113331",
    "31131331", "113111113111", "3311113111", "1111131331", "311111113111", "1113111331",
    "1311111331", "11111111113111", "31313311", "1131311131", "33311131", "1111313311",
    "3111311131", "11333311", "13133311", "111111311131", "31331131", "1131113311",
    "33113311", "1111331131", "3111113311", "1113131131", "1311131131", "111111113311",
    "3131111131", "1131131311", "33131311", "111131111131", "3111131311", "1133111131",
    "1313111131", "111111131311", "3113111311", "113111111131", "3311111131", "111113111311",
    "311111111131", "111311111311", "131111111311", "11111111111131", "3131311111", "11313133",
    "333133", "111131311111", "31113133", "1133311111", "1313311111", "1111113133",
    "313333", "113111311111", "3311311111", "11113333", "311111311111", "11131333",
    "13111333", "11111111311111", "31311133", "1131331111", "33331111", "1111311133",
    "3111331111", "11331133", "13131133", "111111331111", "3113131111", "1131111133",
    "33111133", "111113131111", "3111111133", "111311131111", "131111131111", "111111111133",
    "31311313", "113131111111", "3331111111", "1111311313", "311131111111", "11331313",
    "13131313", "11111131111111", "3133111111", "1131111313", "33111313", "111133111111",
    "3111111313", "111313111111", "131113111111", "111111111313", "313111111111", "1131131113",
    "33131113", "11113111111111", "3111131113", "113311111111", "131311111111", "111111131113",
    "3113111113", "11311111111111", "331111111111", "111113111113", "31111111111111", "111311111113",
    "131111111113", "1111111111111111",
];

/// Data link escape, switches between ASCII and numeric mode.
const DLE: u32 = 16;
/// Numeric pairs 00..=99 are sent as ASCII 27..=126.
const NUMERIC_OFFSET: u32 = 27;

/// Start and stop pairs per mode. Stops omit the final space so the
/// symbol ends on a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Ascii,
    NumericFirst,
    AsciiFirst,
}

impl Mode {
    fn start(self) -> &'static str {
        match self {
            Mode::Ascii => "111111111133",
            Mode::NumericFirst => "111111113113",
            Mode::AsciiFirst => "111111311113",
        }
    }

    fn stop(self) -> &'static str {
        match self {
            Mode::Ascii => "33111111111",
            Mode::NumericFirst => "31131111111",
            Mode::AsciiFirst => "31111311111",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub mode: Mode,
    pub values: Vec<u32>,
}

fn push_ascii(values: &mut Vec<u32>, chars: &[char], offset: usize) -> Result<(), EncodeError> {
    for (i, ch) in chars.iter().enumerate() {
        if !ch.is_ascii() {
            return Err(EncodeError::UnsupportedCharacter { index: offset + i, ch: *ch });
        }
        values.push(*ch as u32);
    }
    Ok(())
}

fn push_numeric(values: &mut Vec<u32>, chars: &[char], offset: usize) -> Result<(), EncodeError> {
    for (pair, digits) in chars.chunks(2).enumerate() {
        let index = offset + pair * 2;
        let digit = |i: usize| {
            digits
                .get(i)
                .and_then(|c| c.to_digit(10))
                .ok_or(EncodeError::UnsupportedCharacter { index: index + i, ch: digits[0] })
        };
        values.push(digit(0)? * 10 + digit(1)? + NUMERIC_OFFSET);
    }
    Ok(())
}

/// Choose the mode and produce the ASCII values that get encoded.
///
/// Four or more digits at either end of the data go to numeric mode; an
/// all-digit input is numeric throughout, with an odd last digit sent in
/// ASCII after a DLE.
pub fn plan(data: &str) -> Result<Plan, EncodeError> {
    let chars: Vec<char> = data.chars().collect();
    let n = chars.len();
    let leading = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    let trailing = chars.iter().rev().take_while(|c| c.is_ascii_digit()).count();
    let mut values = Vec::with_capacity(n);

    let mode = if leading == n || (leading >= 4 && leading > trailing) {
        let split = leading - leading % 2;
        push_numeric(&mut values, &chars[..split], 0)?;
        if split < n {
            values.push(DLE);
            push_ascii(&mut values, &chars[split..], split)?;
        }
        Mode::NumericFirst
    } else if trailing >= 4 {
        let split = n - (trailing - trailing % 2);
        push_ascii(&mut values, &chars[..split], 0)?;
        values.push(DLE);
        push_numeric(&mut values, &chars[split..], split)?;
        Mode::AsciiFirst
    } else {
        push_ascii(&mut values, &chars, 0)?;
        Mode::Ascii
    };

    Ok(Plan { mode, values })
}

fn pattern(value: u32) -> Option<Codeword> {
    ASCII.get(value as usize).map(|w| Codeword::from_widths(w, Polarity::Bar))
}

pub fn encode(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let plan = plan(payload)?;
    let data = plan
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| pattern(*v).ok_or_else(|| bad_check(i, *v)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut checks = Vec::new();
    if let Some(check) = check {
        for value in &check.values {
            checks.push(pattern(*value).ok_or_else(|| bad_check(plan.values.len(), *value))?);
        }
    }

    Ok(EncodedSymbol::new(
        Codeword::from_widths(plan.mode.start(), Polarity::Bar),
        data,
        Codeword::from_widths(plan.mode.stop(), Polarity::Bar),
    )
    .with_check(checks)
    .with_text(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_is_sixteen_units() {
        for w in ASCII {
            let units: u32 = w.chars().filter_map(|c| c.to_digit(10)).sum();
            assert_eq!(units, 16, "{}", w);
        }
    }

    #[test]
    fn test_start_matches_underscore() {
        assert_eq!(Mode::Ascii.start(), ASCII[b'_' as usize]);
    }

    #[test]
    fn test_text_is_ascii_mode() {
        let p = plan("AB").unwrap();
        assert_eq!(p.mode, Mode::Ascii);
        assert_eq!(p.values, vec![65, 66]);
    }

    #[test]
    fn test_digits_pack_in_pairs() {
        let p = plan("1234").unwrap();
        assert_eq!(p.mode, Mode::NumericFirst);
        assert_eq!(p.values, vec![12 + 27, 34 + 27]);
    }

    #[test]
    fn test_odd_digits_end_in_ascii() {
        let p = plan("123").unwrap();
        assert_eq!(p.values, vec![12 + 27, DLE, '3' as u32]);
    }

    #[test]
    fn test_trailing_digits_switch_late() {
        let p = plan("AB12345").unwrap();
        assert_eq!(p.mode, Mode::AsciiFirst);
        assert_eq!(p.values, vec![65, 66, '1' as u32, DLE, 23 + 27, 45 + 27]);
    }
}
