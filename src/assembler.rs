//! Pattern Assembler - codewords to a complete WidthSequence
//!
//! Concatenates start, data, check and stop, inserts inter-character
//! gaps, wraps the result in quiet zones and checks the sequence before
//! handing it to the renderer.

use crate::error::AssemblyError;
use crate::pattern::{Module, Polarity, WidthSequence};
use crate::symbologies::EncodedSymbol;

pub fn assemble(symbol: &EncodedSymbol, quiet_zone: u32) -> Result<WidthSequence, AssemblyError> {
    let mut modules = vec![Module::space(quiet_zone)];
    let mut codewords = 0usize;

    for codeword in symbol.codewords() {
        if codewords > 0 {
            if let Some(gap) = symbol.inter_character_gap {
                modules.push(Module::space(gap));
            }
        }
        modules.extend_from_slice(codeword.modules());
        codewords += 1;
    }

    if codewords == 0 {
        return Err(AssemblyError::EmptySymbol);
    }
    modules.push(Module::space(quiet_zone));

    check(&modules)?;

    let sequence = WidthSequence::from_checked(modules, quiet_zone);
    log::debug!(
        "assembled {} codewords into {} modules ({} units)",
        codewords,
        sequence.len(),
        sequence.total_units()
    );
    Ok(sequence)
}

fn check(modules: &[Module]) -> Result<(), AssemblyError> {
    let mut previous: Option<Polarity> = None;
    for (index, module) in modules.iter().enumerate() {
        if module.width == 0 {
            return Err(AssemblyError::ZeroWidthModule { index });
        }
        if previous == Some(module.polarity) {
            return Err(AssemblyError::PolarityViolation { index });
        }
        previous = Some(module.polarity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::Codeword;

    fn bars(widths: &str) -> Codeword {
        Codeword::from_widths(widths, Polarity::Bar)
    }

    #[test]
    fn test_empty_symbol() {
        let symbol = EncodedSymbol::default();
        assert_eq!(assemble(&symbol, 10), Err(AssemblyError::EmptySymbol));
    }

    #[test]
    fn test_quiet_zones_wrap_symbol() {
        let symbol = EncodedSymbol::new(bars("1"), vec![], Codeword::empty());
        let seq = assemble(&symbol, 10).unwrap();
        assert_eq!(seq.total_units(), 21);
        assert_eq!(seq.quiet_zone_units(), 10);
        assert_eq!(seq.to_bit_string(), "1");
    }

    #[test]
    fn test_gap_between_codewords_only() {
        let symbol = EncodedSymbol::new(bars("1"), vec![bars("2")], bars("3")).with_gap(1);
        let seq = assemble(&symbol, 5).unwrap();
        assert_eq!(seq.to_bit_string(), "10110111");
    }

    #[test]
    fn test_adjacent_bars_rejected() {
        // data codeword ends on a bar and no gap follows
        let symbol = EncodedSymbol::new(Codeword::empty(), vec![bars("1"), bars("1")], Codeword::empty());
        assert_eq!(assemble(&symbol, 5), Err(AssemblyError::PolarityViolation { index: 2 }));
    }

    #[test]
    fn test_zero_width_rejected() {
        let symbol = EncodedSymbol::new(bars("101"), vec![], Codeword::empty());
        assert_eq!(assemble(&symbol, 5), Err(AssemblyError::ZeroWidthModule { index: 2 }));
        let symbol = EncodedSymbol::new(bars("1"), vec![], Codeword::empty());
        assert_eq!(assemble(&symbol, 0), Err(AssemblyError::ZeroWidthModule { index: 0 }));
    }
}
