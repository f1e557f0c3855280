//! Pattern Model - Modules, Codewords, Width Sequences
//!
//! Everything downstream of an encoder speaks in integer units.
//! A unit is one narrow module; pixels only appear in the renderer.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Bar,
    Space,
}

impl Polarity {
    pub fn flip(self) -> Self {
        match self {
            Polarity::Bar => Polarity::Space,
            Polarity::Space => Polarity::Bar,
        }
    }
}

/// Vertical extent of a bar. Only height-encoded symbologies use `Half`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarHeight {
    #[default]
    Full,
    Half,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Module {
    pub polarity: Polarity,
    pub width: u32,
    #[serde(default)]
    pub height: BarHeight,
}

impl Module {
    pub fn bar(width: u32) -> Self {
        Self { polarity: Polarity::Bar, width, height: BarHeight::Full }
    }

    pub fn half_bar(width: u32) -> Self {
        Self { polarity: Polarity::Bar, width, height: BarHeight::Half }
    }

    pub fn space(width: u32) -> Self {
        Self { polarity: Polarity::Space, width, height: BarHeight::Full }
    }

    pub fn is_bar(&self) -> bool {
        self.polarity == Polarity::Bar
    }
}

/// One symbology-internal unit (a character, a value, a guard) as modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Codeword {
    modules: Vec<Module>,
}

impl Codeword {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from a run-length string such as `"212222"`, alternating
    /// polarity from `first`.
    pub fn from_widths(widths: &str, first: Polarity) -> Self {
        let mut polarity = first;
        let mut modules = Vec::with_capacity(widths.len());
        for digit in widths.chars() {
            let width = digit.to_digit(10).unwrap_or(0);
            modules.push(Module { polarity, width, height: BarHeight::Full });
            polarity = polarity.flip();
        }
        Self { modules }
    }

    /// Build from a module bit string (`1` = bar unit, `0` = space unit).
    pub fn from_bits(bits: &str) -> Self {
        let mut modules: Vec<Module> = Vec::new();
        for bit in bits.chars() {
            let polarity = if bit == '1' { Polarity::Bar } else { Polarity::Space };
            match modules.last_mut() {
                Some(last) if last.polarity == polarity => last.width += 1,
                _ => modules.push(Module { polarity, width: 1, height: BarHeight::Full }),
            }
        }
        Self { modules }
    }

    pub fn push(&mut self, module: Module) {
        self.modules.push(module);
    }

    pub fn extend(&mut self, other: &Codeword) {
        self.modules.extend_from_slice(&other.modules);
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn units(&self) -> u32 {
        self.modules.iter().map(|m| m.width).sum()
    }

    pub fn first_polarity(&self) -> Option<Polarity> {
        self.modules.first().map(|m| m.polarity)
    }

    pub fn last_polarity(&self) -> Option<Polarity> {
        self.modules.last().map(|m| m.polarity)
    }
}

/// The complete printable symbol, quiet zones included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthSequence {
    modules: Vec<Module>,
    quiet_zone: u32,
}

impl WidthSequence {
    /// Only the assembler constructs sequences; it checks the invariants first.
    pub(crate) fn from_checked(modules: Vec<Module>, quiet_zone: u32) -> Self {
        Self { modules, quiet_zone }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn total_units(&self) -> u32 {
        self.modules.iter().map(|m| m.width).sum()
    }

    pub fn quiet_zone_units(&self) -> u32 {
        self.quiet_zone
    }

    /// Width of the symbol proper, without the two quiet zones.
    pub fn symbol_units(&self) -> u32 {
        self.total_units().saturating_sub(2 * self.quiet_zone)
    }

    /// Modules between the quiet zones.
    pub fn symbol_modules(&self) -> &[Module] {
        match self.modules.len() {
            0..=2 => &[],
            n => &self.modules[1..n - 1],
        }
    }

    pub fn has_half_height_bars(&self) -> bool {
        self.modules.iter().any(|m| m.is_bar() && m.height == BarHeight::Half)
    }

    /// Iterate `(start_unit, module)` pairs.
    pub fn positioned(&self) -> impl Iterator<Item = (u32, &Module)> {
        self.modules.iter().scan(0u32, |cursor, module| {
            let start = *cursor;
            *cursor += module.width;
            Some((start, module))
        })
    }

    pub fn to_bit_string(&self) -> String {
        let mut bits = String::with_capacity(self.symbol_units() as usize);
        for module in self.symbol_modules() {
            let ch = if module.is_bar() { '1' } else { '0' };
            for _ in 0..module.width {
                bits.push(ch);
            }
        }
        bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_widths_alternates() {
        let cw = Codeword::from_widths("2131", Polarity::Bar);
        let polarities: Vec<_> = cw.modules().iter().map(|m| m.polarity).collect();
        assert_eq!(polarities, vec![Polarity::Bar, Polarity::Space, Polarity::Bar, Polarity::Space]);
        assert_eq!(cw.units(), 7);
    }

    #[test]
    fn test_from_bits_merges_runs() {
        let cw = Codeword::from_bits("1101000");
        let widths: Vec<_> = cw.modules().iter().map(|m| m.width).collect();
        assert_eq!(widths, vec![2, 1, 1, 3]);
        assert_eq!(cw.first_polarity(), Some(Polarity::Bar));
        assert_eq!(cw.last_polarity(), Some(Polarity::Space));
    }

    #[test]
    fn test_positioned_offsets() {
        let seq = WidthSequence::from_checked(
            vec![Module::space(3), Module::bar(2), Module::space(3)],
            3,
        );
        let starts: Vec<_> = seq.positioned().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![0, 3, 5]);
        assert_eq!(seq.symbol_units(), 2);
        assert_eq!(seq.to_bit_string(), "11");
    }
}
