//! Pharmacode (Laetus) - binary value in narrow and wide bars

use super::EncodedSymbol;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Module};
use crate::symbology::Symbology;

const NARROW: u32 = 1;
const WIDE: u32 = 3;
const GAP: u32 = 2;

pub const MIN_VALUE: u32 = 3;
pub const MAX_VALUE: u32 = 131_070;

/// Bar widths left to right. A narrow bar at position i (from the right)
/// weighs 2^i, a wide bar 2^(i+1).
pub fn bar_widths(value: u32) -> Vec<u32> {
    let mut n = value;
    let mut widths = Vec::new();
    while n > 0 {
        if n % 2 == 0 {
            widths.push(WIDE);
            n = (n - 2) / 2;
        } else {
            widths.push(NARROW);
            n = (n - 1) / 2;
        }
    }
    widths.reverse();
    widths
}

pub fn encode(payload: &str) -> Result<EncodedSymbol, EncodeError> {
    let value: u32 = payload.parse().map_err(|_| EncodeError::UnsupportedCharacter {
        index: 0,
        ch: payload.chars().next().unwrap_or(' '),
    })?;
    if value > MAX_VALUE {
        return Err(EncodeError::DataTooLongForFixedFormat {
            symbology: Symbology::Pharmacode,
            max: 6,
            actual: payload.len(),
        });
    }

    let data = bar_widths(value)
        .into_iter()
        .map(|w| Codeword::new(vec![Module::bar(w)]))
        .collect();

    Ok(EncodedSymbol::new(Codeword::empty(), data, Codeword::empty())
        .with_gap(GAP)
        .with_text(value.to_string()))
}
