//! MSI (Modified Plessey)

use super::{digit_at, EncodedSymbol};
use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};

/// Four BCD bits per digit, each bit a bar/space pair.
const DIGITS: [&str; 10] = [
    "12121212", "12121221", "12122112", "12122121", "12211212",
    "12211221", "12212112", "12212121", "21121212", "21121221",
];

fn digits(text: &str, offset: usize) -> Result<Vec<Codeword>, EncodeError> {
    text.char_indices()
        .map(|(i, ch)| {
            let d = digit_at(offset + i, ch)?;
            Ok(Codeword::from_widths(DIGITS[d], Polarity::Bar))
        })
        .collect()
}

pub fn encode(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let data = digits(payload, 0)?;
    let check_text = check.map(|c| c.text.as_str()).unwrap_or("");
    let checks = digits(check_text, payload.len())?;

    Ok(EncodedSymbol::new(
        Codeword::from_widths("21", Polarity::Bar),
        data,
        Codeword::from_widths("121", Polarity::Bar),
    )
    .with_check(checks)
    .with_text(format!("{}{}", payload, check_text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::{msi, MsiCheck};

    #[test]
    fn test_mod11_ten_encodes_two_digits() {
        // weights 2..7 from the right give a remainder of 1 -> check 10
        let check = msi("6", MsiCheck::Mod11);
        assert_eq!(check.text, "10");
        let symbol = encode("6", Some(&check)).unwrap();
        assert_eq!(symbol.check.len(), 2);
    }

    #[test]
    fn test_digit_bits() {
        let symbol = encode("9", None).unwrap();
        assert_eq!(symbol.data[0].units(), 12);
        assert!(symbol.check.is_empty());
    }
}
