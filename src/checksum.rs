//! Checksum Calculator - check digit algorithms selected per symbology

use serde::{Deserialize, Serialize};

use crate::symbologies::{code128, code39, code93, ean, telepen};
use crate::symbology::Symbology;
use crate::validation::ValidatedData;

/// Encoder switches that are not part of the data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodeOptions {
    /// Append the check character of symbologies where it is optional.
    #[serde(default)]
    pub checksum: bool,
    #[serde(default)]
    pub msi_check: MsiCheck,
}

impl EncodeOptions {
    pub fn with_checksum() -> Self {
        Self { checksum: true, ..Self::default() }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsiCheck {
    #[default]
    Mod10,
    Mod10Mod10,
    Mod11,
    Mod11Mod10,
}

/// Check characters appended to a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckDigit {
    /// Symbology values of the check characters, in symbol order.
    pub values: Vec<u32>,
    /// Printable form; empty when the check has no human-readable character.
    pub text: String,
}

impl CheckDigit {
    pub fn digit(value: u32) -> Self {
        Self { values: vec![value], text: value.to_string() }
    }

    pub fn new(values: Vec<u32>, text: impl Into<String>) -> Self {
        Self { values, text: text.into() }
    }

    pub fn first_char(&self) -> Option<char> {
        self.text.chars().next()
    }
}

/// Compute the check characters for already validated data.
///
/// Returns `None` when the symbology has no check or the optional one is off.
pub fn compute(validated: &ValidatedData, options: &EncodeOptions) -> Option<CheckDigit> {
    let payload = validated.payload();
    match validated.symbology() {
        Symbology::Ean13
        | Symbology::Ean8
        | Symbology::UpcA
        | Symbology::Isbn
        | Symbology::Jan13
        | Symbology::Itf14
        | Symbology::Iata2of5 => Some(CheckDigit::digit(gs1_mod10(payload))),
        Symbology::UpcE => {
            let upc_a = if payload.len() == 11 {
                payload.to_string()
            } else {
                ean::expand_upc_e(payload)?
            };
            Some(CheckDigit::digit(gs1_mod10(&upc_a)))
        }
        Symbology::Interleaved2of5 | Symbology::Standard2of5 if options.checksum => {
            Some(CheckDigit::digit(gs1_mod10(payload)))
        }
        Symbology::Code39 if options.checksum => mod43(payload),
        Symbology::Code39Extended if options.checksum => {
            let translated = code39::translate_extended(payload).ok()?;
            mod43(&translated)
        }
        Symbology::Msi if options.checksum => Some(msi(payload, options.msi_check)),
        Symbology::Code93 => {
            let values = code93::values(payload).ok()?;
            let (c, k) = mod47_pair(&values);
            let text = format!("{}{}", code93::display(c), code93::display(k));
            Some(CheckDigit::new(vec![c, k], text))
        }
        Symbology::Code128 | Symbology::Code128A | Symbology::Code128B | Symbology::Code128C => {
            let plan = code128::plan(payload, validated.symbology()).ok()?;
            Some(CheckDigit::new(vec![mod103(plan.start, &plan.values)], ""))
        }
        Symbology::Code11 => Some(code11(payload)),
        Symbology::Telepen => {
            let plan = telepen::plan(payload).ok()?;
            Some(CheckDigit::new(vec![telepen_mod127(&plan.values)], ""))
        }
        Symbology::PostNet => Some(CheckDigit::digit(postnet(payload))),
        _ => None,
    }
}

fn digits(text: &str) -> impl DoubleEndedIterator<Item = u32> + '_ {
    text.chars().filter_map(|c| c.to_digit(10))
}

/// Weights 3,1,3,... from the rightmost digit; `(10 - sum mod 10) mod 10`.
pub fn gs1_mod10(text: &str) -> u32 {
    let sum: u64 = digits(text)
        .rev()
        .enumerate()
        .map(|(i, d)| u64::from(if i % 2 == 0 { d * 3 } else { d }))
        .sum();
    (10 - (sum % 10) as u32) % 10
}

pub fn mod43(text: &str) -> Option<CheckDigit> {
    let mut sum = 0u64;
    for ch in text.chars() {
        sum += u64::from(code39::mod43_value(ch)?);
    }
    let value = (sum % 43) as u32;
    let ch = code39::mod43_char(value)?;
    Some(CheckDigit::new(vec![value], ch.to_string()))
}

/// `(start + Σ value_i · i) mod 103`, positions counted from 1.
pub fn mod103(start: u32, values: &[u32]) -> u32 {
    let weighted: u64 = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as u64 + 1) * u64::from(*v))
        .sum();
    ((u64::from(start) + weighted) % 103) as u32
}

/// Σ value · weight, weights 1..=max_weight cycling from the rightmost value.
fn weighted_sum(values: &[u32], max_weight: u32) -> u64 {
    let max_weight = u64::from(max_weight.max(1));
    values
        .iter()
        .rev()
        .enumerate()
        .map(|(i, v)| (i as u64 % max_weight + 1) * u64::from(*v))
        .sum()
}

/// Weighted mod 47 with weights 1..=max_weight cycling from the right.
pub fn mod47(values: &[u32], max_weight: u32) -> u32 {
    (weighted_sum(values, max_weight) % 47) as u32
}

/// Code 93 C and K check values.
pub fn mod47_pair(values: &[u32]) -> (u32, u32) {
    let c = mod47(values, 20);
    let mut with_c = values.to_vec();
    with_c.push(c);
    let k = mod47(&with_c, 15);
    (c, k)
}

/// Luhn variant: double every other digit starting at the rightmost.
pub fn luhn_mod10(text: &str) -> u32 {
    let sum: u64 = digits(text)
        .rev()
        .enumerate()
        .map(|(i, d)| {
            if i % 2 == 0 {
                let doubled = d * 2;
                u64::from(doubled / 10 + doubled % 10)
            } else {
                u64::from(d)
            }
        })
        .sum();
    (10 - (sum % 10) as u32) % 10
}

/// IBM mod 11 with weights 2..=7 from the right. May yield 10.
pub fn mod11_ibm(text: &str) -> u32 {
    let sum: u64 = digits(text)
        .rev()
        .enumerate()
        .map(|(i, d)| (i as u64 % 6 + 2) * u64::from(d))
        .sum();
    (11 - (sum % 11) as u32) % 11
}

pub fn msi(text: &str, scheme: MsiCheck) -> CheckDigit {
    let steps: &[fn(&str) -> u32] = match scheme {
        MsiCheck::Mod10 => &[luhn_mod10],
        MsiCheck::Mod10Mod10 => &[luhn_mod10, luhn_mod10],
        MsiCheck::Mod11 => &[mod11_ibm],
        MsiCheck::Mod11Mod10 => &[mod11_ibm, luhn_mod10],
    };
    let mut working = text.to_string();
    let mut appended = String::new();
    for step in steps {
        let digit = step(&working).to_string();
        working.push_str(&digit);
        appended.push_str(&digit);
    }
    let values = digits(&appended).collect();
    CheckDigit::new(values, appended)
}

fn code11_value(ch: char) -> u32 {
    if ch == '-' {
        10
    } else {
        ch.to_digit(10).unwrap_or(0)
    }
}

fn code11_char(value: u32) -> char {
    char::from_digit(value, 10).unwrap_or('-')
}

fn code11_weighted(values: &[u32], max_weight: u32) -> u32 {
    (weighted_sum(values, max_weight) % 11) as u32
}

/// Code 11 C check, plus K when the data is 10 characters or longer.
pub fn code11(text: &str) -> CheckDigit {
    let mut values: Vec<u32> = text.chars().map(code11_value).collect();
    let c = code11_weighted(&values, 10);
    let mut checks = vec![c];
    if text.chars().count() >= 10 {
        values.push(c);
        checks.push(code11_weighted(&values, 9));
    }
    let text = checks.iter().map(|v| code11_char(*v)).collect::<String>();
    CheckDigit::new(checks, text)
}

/// `127 - (sum mod 127)`, where a result of 127 is written as 0.
pub fn telepen_mod127(values: &[u32]) -> u32 {
    let sum: u64 = values.iter().map(|v| u64::from(*v)).sum();
    (127 - (sum % 127) as u32) % 127
}

pub fn postnet(text: &str) -> u32 {
    let sum: u64 = digits(text).map(u64::from).sum();
    (10 - (sum % 10) as u32) % 10
}

/// ISBN-10 check character over nine digits, weights 10..=2.
pub fn isbn10(nine: &str) -> char {
    let sum: u32 = digits(nine)
        .enumerate()
        .map(|(i, d)| (10 - i as u32) * d)
        .sum();
    match (11 - sum % 11) % 11 {
        10 => 'X',
        v => char::from_digit(v, 10).unwrap_or('0'),
    }
}

/// 5-digit UPC supplement parity selector.
pub fn supplement5(text: &str) -> u32 {
    let sum: u32 = digits(text)
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d * 3 } else { d * 9 })
        .sum();
    sum % 10
}
