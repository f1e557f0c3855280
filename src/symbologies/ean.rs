//! EAN/UPC family - EAN-13, UPC-A, EAN-8, UPC-E and add-on supplements

use super::{digit_at, digit_check, EncodedSymbol};
use crate::checksum::{self, CheckDigit};
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};
use crate::symbology::Symbology;

/// Odd-parity (L) widths, space first. R codes are the same widths bar first.
const L_WIDTHS: [&str; 10] = [
    "3211", "2221", "2122", "1411", "1132", "1231", "1114", "1312", "1213", "3112",
];

/// Even-parity (G) widths, space first.
const G_WIDTHS: [&str; 10] = [
    "1123", "1222", "2212", "1141", "2311", "1321", "4111", "2131", "3121", "2113",
];

/// EAN-13 left-half parity selected by the leading digit.
const EAN13_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG",
    "LGGLLG", "LGGGLL", "LGLGLG", "LGLGGL", "LGGLGL",
];

/// UPC-E parity for number system 0, selected by the check digit.
/// Number system 1 uses the mirror image.
const UPCE_PARITY: [&str; 10] = [
    "GGGLLL", "GGLGLL", "GGLLGL", "GGLLLG", "GLGGLL",
    "GLLGGL", "GLLLGG", "GLGLGL", "GLGLLG", "GLLGLG",
];

const SUPPLEMENT5_PARITY: [&str; 10] = [
    "GGLLL", "GLGLL", "GLLGL", "GLLLG", "LGGLL",
    "LLGGL", "LLLGG", "LGLGL", "LGLLG", "LLGLG",
];

const SUPPLEMENT2_PARITY: [&str; 4] = ["LL", "LG", "GL", "GG"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Code {
    L,
    G,
    R,
}

impl Code {
    fn from_parity(p: char) -> Self {
        if p == 'G' { Code::G } else { Code::L }
    }

    fn mirrored(self) -> Self {
        match self {
            Code::L => Code::G,
            Code::G => Code::L,
            Code::R => Code::R,
        }
    }
}

fn digit_codeword(code: Code, digit: usize) -> Option<Codeword> {
    match code {
        Code::L => L_WIDTHS.get(digit).map(|w| Codeword::from_widths(w, Polarity::Space)),
        Code::G => G_WIDTHS.get(digit).map(|w| Codeword::from_widths(w, Polarity::Space)),
        Code::R => L_WIDTHS.get(digit).map(|w| Codeword::from_widths(w, Polarity::Bar)),
    }
}

fn encode_digit(code: Code, index: usize, ch: char) -> Result<Codeword, EncodeError> {
    let digit = digit_at(index, ch)?;
    digit_codeword(code, digit).ok_or(EncodeError::UnsupportedCharacter { index, ch })
}

fn normal_guard() -> Codeword {
    Codeword::from_widths("111", Polarity::Bar)
}

fn centre_guard() -> Codeword {
    Codeword::from_widths("11111", Polarity::Space)
}

fn fixed_length(symbology: Symbology, payload: &str, max: usize) -> Result<(), EncodeError> {
    let actual = payload.chars().count();
    if actual > max {
        return Err(EncodeError::DataTooLongForFixedFormat { symbology, max, actual });
    }
    Ok(())
}

/// Left half with per-digit codes, centre guard, right half in R codes.
fn two_halves(
    left: impl Iterator<Item = (usize, char, Code)>,
    right: impl Iterator<Item = (usize, char)>,
) -> Result<Vec<Codeword>, EncodeError> {
    let mut data = Vec::new();
    for (index, ch, code) in left {
        data.push(encode_digit(code, index, ch)?);
    }
    data.push(centre_guard());
    for (index, ch) in right {
        data.push(encode_digit(Code::R, index, ch)?);
    }
    Ok(data)
}

fn full_text(payload: &str, check: Option<&CheckDigit>) -> String {
    format!("{}{}", payload, check.map(|c| c.text.as_str()).unwrap_or(""))
}

/// EAN-13, also used for JAN-13 and Bookland numbers.
pub fn encode_ean13(payload: &str, check: Option<&CheckDigit>, symbology: Symbology) -> Result<EncodedSymbol, EncodeError> {
    fixed_length(symbology, payload, 12)?;
    let first = payload.chars().next().map_or(Ok(0), |c| digit_at(0, c))?;
    let parity = EAN13_PARITY[first];

    let left = payload
        .char_indices()
        .skip(1)
        .take(6)
        .zip(parity.chars())
        .map(|((i, ch), p)| (i, ch, Code::from_parity(p)));
    let right = payload.char_indices().skip(7);
    let data = two_halves(left, right)?;

    Ok(EncodedSymbol::new(normal_guard(), data, normal_guard())
        .with_check(digit_check(check, 12, |d| digit_codeword(Code::R, d))?)
        .with_text(full_text(payload, check)))
}

pub fn encode_upc_a(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    fixed_length(Symbology::UpcA, payload, 11)?;
    let left = payload.char_indices().take(6).map(|(i, ch)| (i, ch, Code::L));
    let right = payload.char_indices().skip(6);
    let data = two_halves(left, right)?;

    Ok(EncodedSymbol::new(normal_guard(), data, normal_guard())
        .with_check(digit_check(check, 11, |d| digit_codeword(Code::R, d))?)
        .with_text(full_text(payload, check)))
}

pub fn encode_ean8(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    fixed_length(Symbology::Ean8, payload, 7)?;
    let left = payload.char_indices().take(4).map(|(i, ch)| (i, ch, Code::L));
    let right = payload.char_indices().skip(4);
    let data = two_halves(left, right)?;

    Ok(EncodedSymbol::new(normal_guard(), data, normal_guard())
        .with_check(digit_check(check, 7, |d| digit_codeword(Code::R, d))?)
        .with_text(full_text(payload, check)))
}

/// Expand number system + six UPC-E digits into the 11-digit UPC-A body.
pub fn expand_upc_e(short: &str) -> Option<String> {
    let digits: Vec<char> = short.chars().collect();
    if digits.len() != 7 || !digits.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let ns = digits[0];
    let d: String = digits[1..].iter().collect();
    let body = match digits[6] {
        '0'..='2' => format!("{}{}{}0000{}", ns, &d[0..2], &d[5..6], &d[2..5]),
        '3' => format!("{}{}00000{}", ns, &d[0..3], &d[3..5]),
        '4' => format!("{}{}00000{}", ns, &d[0..4], &d[4..5]),
        _ => format!("{}{}0000{}", ns, &d[0..5], &d[5..6]),
    };
    Some(body)
}

/// Compress an 11-digit UPC-A body into number system + six digits.
pub fn compress_upc_a(body: &str) -> Option<String> {
    if body.len() != 11 || !body.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let ns = &body[0..1];
    let mfr = &body[1..6];
    let product = &body[6..11];

    let candidate = if matches!(&mfr[2..], "000" | "100" | "200") && product.starts_with("00") {
        format!("{}{}{}{}", ns, &mfr[0..2], &product[2..5], &mfr[2..3])
    } else if mfr.ends_with("00") && product.starts_with("000") {
        format!("{}{}{}3", ns, &mfr[0..3], &product[3..5])
    } else if mfr.ends_with('0') && product.starts_with("0000") {
        format!("{}{}{}4", ns, &mfr[0..4], &product[4..5])
    } else if product.starts_with("0000") && product.as_bytes()[4] >= b'5' {
        format!("{}{}{}", ns, mfr, &product[4..5])
    } else {
        return None;
    };

    // Round trip guards against the ambiguous manufacturer/product splits.
    (expand_upc_e(&candidate).as_deref() == Some(body)).then_some(candidate)
}

pub fn encode_upc_e(payload: &str, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let short = if payload.len() == 11 {
        compress_upc_a(payload).ok_or_else(|| EncodeError::NotCompressible(payload.to_string()))?
    } else {
        payload.to_string()
    };
    fixed_length(Symbology::UpcE, &short, 7)?;

    let mut chars = short.chars();
    let ns = chars.next().map_or(Ok(0), |c| digit_at(0, c))?;
    let check_digit = check.and_then(|c| c.values.first().copied()).unwrap_or(0) as usize;
    let parity = UPCE_PARITY
        .get(check_digit)
        .ok_or_else(|| super::bad_check(7, check_digit as u32))?;

    let mut data = Vec::with_capacity(6);
    for ((index, ch), p) in short.char_indices().skip(1).zip(parity.chars()) {
        let code = Code::from_parity(p);
        let code = if ns == 1 { code.mirrored() } else { code };
        data.push(encode_digit(code, index, ch)?);
    }

    Ok(EncodedSymbol::new(
        normal_guard(),
        data,
        Codeword::from_widths("111111", Polarity::Space),
    )
    .with_text(full_text(&short, check)))
}

/// Two- and five-digit add-on symbols.
pub fn encode_supplement(payload: &str) -> Result<EncodedSymbol, EncodeError> {
    let parity = match payload.len() {
        2 => {
            let value: usize = payload.parse().map_err(|_| EncodeError::UnsupportedCharacter {
                index: 0,
                ch: payload.chars().next().unwrap_or(' '),
            })?;
            SUPPLEMENT2_PARITY[value % 4]
        }
        5 => SUPPLEMENT5_PARITY[checksum::supplement5(payload) as usize],
        actual => {
            return Err(EncodeError::DataTooLongForFixedFormat {
                symbology: Symbology::UpcSupplement5,
                max: 5,
                actual,
            })
        }
    };

    let mut data = Vec::with_capacity(payload.len() * 2);
    for ((index, ch), p) in payload.char_indices().zip(parity.chars()) {
        if index > 0 {
            data.push(Codeword::from_widths("11", Polarity::Space));
        }
        data.push(encode_digit(Code::from_parity(p), index, ch)?);
    }

    Ok(EncodedSymbol::new(Codeword::from_widths("112", Polarity::Bar), data, Codeword::empty())
        .with_text(payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(symbol: &EncodedSymbol) -> u32 {
        symbol.codewords().map(|cw| cw.units()).sum()
    }

    #[test]
    fn test_digit_tables_are_seven_units() {
        for w in L_WIDTHS.iter().chain(G_WIDTHS.iter()) {
            let sum: u32 = w.chars().filter_map(|c| c.to_digit(10)).sum();
            assert_eq!(sum, 7);
        }
    }

    #[test]
    fn test_ean13_is_95_units() {
        let symbol = encode_ean13("400638133393", Some(&CheckDigit::digit(1)), Symbology::Ean13).unwrap();
        assert_eq!(units(&symbol), 95);
        assert_eq!(symbol.text, "4006381333931");
    }

    #[test]
    fn test_ean8_is_67_units() {
        let symbol = encode_ean8("9638507", Some(&CheckDigit::digit(4))).unwrap();
        assert_eq!(units(&symbol), 67);
    }

    #[test]
    fn test_upc_e_expansion_rules() {
        assert_eq!(expand_upc_e("0123450").as_deref(), Some("01200000345"));
        assert_eq!(expand_upc_e("0123453").as_deref(), Some("01230000045"));
        assert_eq!(expand_upc_e("0123454").as_deref(), Some("01234000005"));
        assert_eq!(expand_upc_e("0123457").as_deref(), Some("01234500007"));
    }

    #[test]
    fn test_upc_a_compresses_back() {
        for short in ["0123450", "0123453", "0123454", "0123457", "1654321"] {
            let long = expand_upc_e(short).unwrap();
            assert_eq!(compress_upc_a(&long).as_deref(), Some(short), "{}", long);
        }
        assert_eq!(compress_upc_a("01234567890"), None);
    }

    #[test]
    fn test_upc_e_is_51_units() {
        let symbol = encode_upc_e("0123457", Some(&CheckDigit::digit(0))).unwrap();
        assert_eq!(units(&symbol), 51);
    }

    #[test]
    fn test_too_long_for_fixed_format() {
        let err = encode_ean8("12345678", None).unwrap_err();
        assert_eq!(
            err,
            EncodeError::DataTooLongForFixedFormat { symbology: Symbology::Ean8, max: 7, actual: 8 }
        );
    }

    #[test]
    fn test_supplements() {
        let two = encode_supplement("12").unwrap();
        assert_eq!(units(&two), 4 + 7 + 2 + 7);
        let five = encode_supplement("52495").unwrap();
        assert_eq!(units(&five), 4 + 5 * 7 + 4 * 2);
    }
}
