//! Symbology Registry - the tagged variant every stage dispatches on

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbology {
    Code39,
    Code39Extended,
    Code93,
    Code128,
    Code128A,
    Code128B,
    Code128C,
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    UpcSupplement2,
    UpcSupplement5,
    Isbn,
    Jan13,
    Codabar,
    Interleaved2of5,
    Standard2of5,
    Iata2of5,
    Itf14,
    Msi,
    Code11,
    Telepen,
    Pharmacode,
    PostNet,
    Fim,
}

/// Whether a symbology carries a check character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    None,
    Optional,
    Mandatory,
}

impl Symbology {
    pub const ALL: [Symbology; 26] = [
        Symbology::Code39,
        Symbology::Code39Extended,
        Symbology::Code93,
        Symbology::Code128,
        Symbology::Code128A,
        Symbology::Code128B,
        Symbology::Code128C,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::UpcSupplement2,
        Symbology::UpcSupplement5,
        Symbology::Isbn,
        Symbology::Jan13,
        Symbology::Codabar,
        Symbology::Interleaved2of5,
        Symbology::Standard2of5,
        Symbology::Iata2of5,
        Symbology::Itf14,
        Symbology::Msi,
        Symbology::Code11,
        Symbology::Telepen,
        Symbology::Pharmacode,
        Symbology::PostNet,
        Symbology::Fim,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Symbology::Code39 => "Code 39",
            Symbology::Code39Extended => "Code 39 Extended",
            Symbology::Code93 => "Code 93",
            Symbology::Code128 => "Code 128",
            Symbology::Code128A => "Code 128-A",
            Symbology::Code128B => "Code 128-B",
            Symbology::Code128C => "Code 128-C",
            Symbology::Ean13 => "EAN-13",
            Symbology::Ean8 => "EAN-8",
            Symbology::UpcA => "UPC-A",
            Symbology::UpcE => "UPC-E",
            Symbology::UpcSupplement2 => "UPC 2-digit supplement",
            Symbology::UpcSupplement5 => "UPC 5-digit supplement",
            Symbology::Isbn => "ISBN (Bookland)",
            Symbology::Jan13 => "JAN-13",
            Symbology::Codabar => "Codabar",
            Symbology::Interleaved2of5 => "Interleaved 2 of 5",
            Symbology::Standard2of5 => "Standard 2 of 5",
            Symbology::Iata2of5 => "IATA 2 of 5",
            Symbology::Itf14 => "ITF-14",
            Symbology::Msi => "MSI",
            Symbology::Code11 => "Code 11",
            Symbology::Telepen => "Telepen",
            Symbology::Pharmacode => "Pharmacode",
            Symbology::PostNet => "PostNet",
            Symbology::Fim => "FIM",
        }
    }

    /// Minimum quiet zone on each side, in units.
    pub fn quiet_zone(&self) -> u32 {
        match self {
            Symbology::Ean13 | Symbology::Isbn | Symbology::Jan13 => 11,
            Symbology::Ean8 => 7,
            Symbology::UpcA | Symbology::UpcE => 9,
            Symbology::UpcSupplement2 | Symbology::UpcSupplement5 => 5,
            Symbology::Pharmacode | Symbology::PostNet | Symbology::Fim => 6,
            _ => 10,
        }
    }

    pub fn checksum_policy(&self) -> ChecksumPolicy {
        match self {
            Symbology::Code39
            | Symbology::Code39Extended
            | Symbology::Interleaved2of5
            | Symbology::Standard2of5
            | Symbology::Msi => ChecksumPolicy::Optional,
            Symbology::Codabar
            | Symbology::Pharmacode
            | Symbology::Fim
            | Symbology::UpcSupplement2
            | Symbology::UpcSupplement5 => ChecksumPolicy::None,
            _ => ChecksumPolicy::Mandatory,
        }
    }

    /// Narrow space inserted between adjacent codewords, in units.
    pub fn inter_character_gap(&self) -> Option<u32> {
        match self {
            Symbology::Code39
            | Symbology::Code39Extended
            | Symbology::Codabar
            | Symbology::Code11 => Some(1),
            _ => None,
        }
    }

    pub fn is_fixed_length(&self) -> bool {
        matches!(
            self,
            Symbology::Ean13
                | Symbology::Ean8
                | Symbology::UpcA
                | Symbology::UpcE
                | Symbology::UpcSupplement2
                | Symbology::UpcSupplement5
                | Symbology::Isbn
                | Symbology::Jan13
                | Symbology::Itf14
                | Symbology::Iata2of5
                | Symbology::PostNet
                | Symbology::Fim
        )
    }

    /// EAN/UPC family symbols carry a GS1 prefix.
    pub fn is_gs1_retail(&self) -> bool {
        matches!(
            self,
            Symbology::Ean13 | Symbology::UpcA | Symbology::Isbn | Symbology::Jan13
        )
    }

    pub fn default_bearer_bars(&self) -> bool {
        *self == Symbology::Itf14
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown symbology: {0}")]
pub struct UnknownSymbology(pub String);

impl FromStr for Symbology {
    type Err = UnknownSymbology;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let symbology = match key.as_str() {
            "code39" | "logmars" => Symbology::Code39,
            "code39extended" | "code39ext" => Symbology::Code39Extended,
            "code93" => Symbology::Code93,
            "code128" => Symbology::Code128,
            "code128a" => Symbology::Code128A,
            "code128b" => Symbology::Code128B,
            "code128c" => Symbology::Code128C,
            "ean13" | "ucc13" => Symbology::Ean13,
            "ean8" => Symbology::Ean8,
            "upca" | "ucc12" => Symbology::UpcA,
            "upce" => Symbology::UpcE,
            "upcsupplement2" | "upc2" => Symbology::UpcSupplement2,
            "upcsupplement5" | "upc5" => Symbology::UpcSupplement5,
            "isbn" | "bookland" => Symbology::Isbn,
            "jan13" => Symbology::Jan13,
            "codabar" => Symbology::Codabar,
            "interleaved2of5" | "i2of5" => Symbology::Interleaved2of5,
            "standard2of5" | "s2of5" | "industrial2of5" => Symbology::Standard2of5,
            "iata2of5" => Symbology::Iata2of5,
            "itf14" => Symbology::Itf14,
            "msi" | "modifiedplessey" => Symbology::Msi,
            "code11" | "usd8" => Symbology::Code11,
            "telepen" => Symbology::Telepen,
            "pharmacode" => Symbology::Pharmacode,
            "postnet" => Symbology::PostNet,
            "fim" => Symbology::Fim,
            _ => return Err(UnknownSymbology(s.to_string())),
        };
        Ok(symbology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!("UPC-A".parse::<Symbology>(), Ok(Symbology::UpcA));
        assert_eq!("ean_13".parse::<Symbology>(), Ok(Symbology::Ean13));
        assert_eq!("Interleaved 2 of 5".parse::<Symbology>(), Ok(Symbology::Interleaved2of5));
        assert!("qr".parse::<Symbology>().is_err());
    }

    #[test]
    fn test_parse_legacy_names() {
        assert_eq!("LOGMARS".parse::<Symbology>(), Ok(Symbology::Code39));
        assert_eq!("UCC12".parse::<Symbology>(), Ok(Symbology::UpcA));
        assert_eq!("UCC-13".parse::<Symbology>(), Ok(Symbology::Ean13));
        assert_eq!("USD8".parse::<Symbology>(), Ok(Symbology::Code11));
        assert_eq!("modified_plessey".parse::<Symbology>(), Ok(Symbology::Msi));
        assert_eq!("Industrial2of5".parse::<Symbology>(), Ok(Symbology::Standard2of5));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&Symbology::Code128C).unwrap();
        assert_eq!(json, r#""code128_c""#);
        let back: Symbology = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Symbology::Code128C);
    }

    #[test]
    fn test_all_names_parse_back() {
        for symbology in Symbology::ALL {
            let key = serde_json::to_value(symbology).unwrap();
            let parsed: Symbology = key.as_str().unwrap().parse().unwrap();
            assert_eq!(parsed, symbology);
        }
    }
}
