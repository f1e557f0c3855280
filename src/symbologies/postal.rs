//! Postal and mail-handling marks - PostNet and FIM

use super::{digit_at, digit_check, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Module};

/// Five bars per digit, `1` full height and `0` half height.
const POSTNET: [&str; 10] = [
    "11000", "00011", "00101", "00110", "01001",
    "01010", "01100", "10001", "10010", "10100",
];

/// Facing identification marks A-E, `1` where a bar is printed.
const FIM: [&str; 5] = ["110010011", "101101101", "110101011", "111010111", "101000101"];

fn postnet_digit(digit: usize) -> Option<Codeword> {
    let heights = POSTNET.get(digit)?;
    let mut codeword = Codeword::empty();
    for h in heights.chars() {
        codeword.push(if h == '1' { Module::bar(1) } else { Module::half_bar(1) });
        codeword.push(Module::space(1));
    }
    Some(codeword)
}

pub fn encode_postnet(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let mut data = Vec::with_capacity(payload.len());
    for (index, ch) in payload.char_indices() {
        let digit = digit_at(index, ch)?;
        data.push(postnet_digit(digit).ok_or(EncodeError::UnsupportedCharacter { index, ch })?);
    }

    Ok(EncodedSymbol::new(
        Codeword::new(vec![Module::bar(1), Module::space(1)]),
        data,
        Codeword::new(vec![Module::bar(1)]),
    )
    .with_check(digit_check(check, payload.len(), postnet_digit)?)
    .with_text(payload))
}

pub fn encode_fim(payload: &str) -> Result<EncodedSymbol, EncodeError> {
    let ch = payload.chars().next().unwrap_or(' ');
    let index = match ch {
        'A'..='E' => (ch as u8 - b'A') as usize,
        _ => return Err(EncodeError::UnsupportedCharacter { index: 0, ch }),
    };

    // every mark position is followed by a one-unit space
    let bits: String = FIM[index]
        .chars()
        .flat_map(|b| [b, '0'])
        .collect();
    let mark = Codeword::from_bits(bits.trim_end_matches('0'));

    Ok(EncodedSymbol::new(Codeword::empty(), vec![mark], Codeword::empty())
        .with_text(format!("FIM {}", ch)))
}
