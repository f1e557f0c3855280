//! Symbology Encoders - one module per family
//!
//! Every encoder turns validated data plus its check characters into
//! codewords. Dispatch is a single match on `Symbology`.

pub mod codabar;
pub mod code11;
pub mod code128;
pub mod code39;
pub mod code93;
pub mod ean;
pub mod gs1;
pub mod msi;
pub mod pharmacode;
pub mod postal;
pub mod telepen;
pub mod two_of_five;

use crate::checksum::CheckDigit;
use crate::error::EncodeError;
use crate::pattern::Codeword;
use crate::symbology::Symbology;
use crate::validation::ValidatedData;

/// Codewords of one symbol, before quiet zones and gaps are added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncodedSymbol {
    pub start: Codeword,
    pub data: Vec<Codeword>,
    pub check: Vec<Codeword>,
    pub stop: Codeword,
    /// Narrow space between adjacent codewords, for discrete symbologies.
    pub inter_character_gap: Option<u32>,
    /// Human-readable interpretation.
    pub text: String,
}

impl EncodedSymbol {
    pub fn new(start: Codeword, data: Vec<Codeword>, stop: Codeword) -> Self {
        Self { start, data, stop, ..Self::default() }
    }

    pub fn with_check(mut self, check: Vec<Codeword>) -> Self {
        self.check = check;
        self
    }

    pub fn with_gap(mut self, units: u32) -> Self {
        self.inter_character_gap = Some(units);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Start, data, check and stop in symbol order, skipping empty parts.
    pub fn codewords(&self) -> impl Iterator<Item = &Codeword> {
        std::iter::once(&self.start)
            .chain(self.data.iter())
            .chain(self.check.iter())
            .chain(std::iter::once(&self.stop))
            .filter(|cw| !cw.is_empty())
    }
}

/// Encode validated data. `check` comes from the checksum stage.
pub fn encode(validated: &ValidatedData, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let payload = validated.payload();
    let symbology = validated.symbology();
    match symbology {
        Symbology::Code39 => code39::encode(payload, check, false),
        Symbology::Code39Extended => code39::encode(payload, check, true),
        Symbology::Code93 => code93::encode(payload, check),
        Symbology::Code128 | Symbology::Code128A | Symbology::Code128B | Symbology::Code128C => {
            code128::encode(payload, symbology, check)
        }
        Symbology::Ean13 | Symbology::Jan13 | Symbology::Isbn => ean::encode_ean13(payload, check, symbology),
        Symbology::UpcA => ean::encode_upc_a(payload, check),
        Symbology::Ean8 => ean::encode_ean8(payload, check),
        Symbology::UpcE => ean::encode_upc_e(payload, check),
        Symbology::UpcSupplement2 | Symbology::UpcSupplement5 => ean::encode_supplement(payload),
        Symbology::Codabar => codabar::encode(payload),
        Symbology::Interleaved2of5 | Symbology::Itf14 => two_of_five::encode_interleaved(payload, check),
        Symbology::Standard2of5 => two_of_five::encode_standard(payload, check),
        Symbology::Iata2of5 => two_of_five::encode_iata(payload, check),
        Symbology::Msi => msi::encode(payload, check),
        Symbology::Code11 => code11::encode(payload, check),
        Symbology::Telepen => telepen::encode(payload, check),
        Symbology::Pharmacode => pharmacode::encode(payload),
        Symbology::PostNet => postal::encode_postnet(payload, check),
        Symbology::Fim => postal::encode_fim(payload),
    }
}

/// Digit value of an ASCII digit, or the defensive encode error.
pub(crate) fn digit_at(index: usize, ch: char) -> Result<usize, EncodeError> {
    ch.to_digit(10)
        .map(|d| d as usize)
        .ok_or(EncodeError::UnsupportedCharacter { index, ch })
}

/// Check value that has no pattern in the table it indexes.
pub(crate) fn bad_check(position: usize, value: u32) -> EncodeError {
    EncodeError::UnsupportedCharacter {
        index: position,
        ch: char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}

/// Check codewords for single-digit checks drawn from a digit table.
pub(crate) fn digit_check<F>(check: Option<&CheckDigit>, position: usize, table: F) -> Result<Vec<Codeword>, EncodeError>
where
    F: Fn(usize) -> Option<Codeword>,
{
    let Some(check) = check else {
        return Ok(Vec::new());
    };
    check
        .values
        .iter()
        .map(|v| table(*v as usize).ok_or_else(|| bad_check(position, *v)))
        .collect()
}
