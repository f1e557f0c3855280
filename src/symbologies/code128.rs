//! Code 128 - Subset Planner
//!
//! The only symbology whose codewords depend on encoder state. The planner
//! walks the data once and picks subsets greedily:
//! - digit runs of 4 or more go to subset C, two digits per codeword
//! - a lone character from the other of A/B is reached with SHIFT
//! - otherwise the planner switches subsets explicitly

use super::{bad_check, EncodedSymbol};
use crate::checksum::{self, CheckDigit};
use crate::error::EncodeError;
use crate::pattern::{Codeword, Polarity};
use crate::symbology::Symbology;

/// Widths for values 0..=105.
const PATTERNS: [&str; 106] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312",
    "132212", "221213", "221312", "231212", "112232", "122132", "122231", "113222",
    "123122", "123221", "223211", "221132", "221231", "213212", "223112", "312131",
    "311222", "321122", "321221", "312212", "322112", "322211", "212123", "212321",
    "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313",
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121",
    "313121", "211331", "231131", "213113", "213311", "213131", "311123", "311321",
    "331121", "312113", "312311", "332111", "314111", "221411", "431111", "111224",
    "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111",
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112",
    "421211", "212141", "214121", "412121", "111143", "111341", "131141", "114113",
    "114311", "411113", "411311", "113141", "114131", "311141", "411131", "211412",
    "211214", "211232",
];

/// Stop pattern with the trailing 2-unit termination bar.
const STOP: &str = "2331112";

pub const SHIFT: u32 = 98;
pub const CODE_C: u32 = 99;
pub const CODE_B: u32 = 100;
pub const CODE_A: u32 = 101;
pub const START_A: u32 = 103;
pub const START_B: u32 = 104;
pub const START_C: u32 = 105;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subset {
    A,
    B,
    C,
}

impl Subset {
    fn start(self) -> u32 {
        match self {
            Subset::A => START_A,
            Subset::B => START_B,
            Subset::C => START_C,
        }
    }

    fn switch_to(self) -> u32 {
        match self {
            Subset::A => CODE_A,
            Subset::B => CODE_B,
            Subset::C => CODE_C,
        }
    }

    fn other(self) -> Subset {
        match self {
            Subset::A => Subset::B,
            _ => Subset::A,
        }
    }

    /// Value of a single character in subset A or B.
    fn value_of(self, ch: char) -> Option<u32> {
        let code = ch as u32;
        match self {
            Subset::A if code < 32 => Some(code + 64),
            Subset::A if code < 96 => Some(code - 32),
            Subset::B if (32..128).contains(&code) => Some(code - 32),
            _ => None,
        }
    }
}

/// Start value plus data codeword values, check excluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub start: u32,
    pub values: Vec<u32>,
}

fn digit_run(chars: &[char], from: usize) -> usize {
    chars[from..].iter().take_while(|c| c.is_ascii_digit()).count()
}

/// A when a control character shows up before any lowercase one.
fn pick_a_or_b(chars: &[char], from: usize) -> Subset {
    for ch in &chars[from..] {
        let code = *ch as u32;
        if code < 32 {
            return Subset::A;
        }
        if (96..128).contains(&code) {
            return Subset::B;
        }
    }
    Subset::B
}

fn pair_value(chars: &[char], at: usize) -> Result<u32, EncodeError> {
    let digit = |i: usize| {
        chars[i]
            .to_digit(10)
            .ok_or(EncodeError::UnsupportedCharacter { index: i, ch: chars[i] })
    };
    Ok(digit(at)? * 10 + digit(at + 1)?)
}

fn single(subset: Subset, chars: &[char], at: usize) -> Result<u32, EncodeError> {
    subset
        .value_of(chars[at])
        .ok_or(EncodeError::UnsupportedCharacter { index: at, ch: chars[at] })
}

fn plan_forced(chars: &[char], subset: Subset) -> Result<Plan, EncodeError> {
    let mut values = Vec::with_capacity(chars.len());
    match subset {
        Subset::C => {
            if chars.len() % 2 == 1 {
                let index = chars.len() - 1;
                return Err(EncodeError::UnsupportedCharacter { index, ch: chars[index] });
            }
            for at in (0..chars.len()).step_by(2) {
                values.push(pair_value(chars, at)?);
            }
        }
        _ => {
            for at in 0..chars.len() {
                values.push(single(subset, chars, at)?);
            }
        }
    }
    Ok(Plan { start: subset.start(), values })
}

fn plan_auto(chars: &[char]) -> Result<Plan, EncodeError> {
    let n = chars.len();
    let leading = digit_run(chars, 0);
    let mut current = if leading >= 4 || (leading == 2 && n == 2) {
        Subset::C
    } else {
        pick_a_or_b(chars, 0)
    };
    let start = current.start();
    let mut values = Vec::with_capacity(n);
    let mut i = 0;

    while i < n {
        if current == Subset::C {
            if digit_run(chars, i) >= 2 {
                values.push(pair_value(chars, i)?);
                i += 2;
            } else {
                current = pick_a_or_b(chars, i);
                values.push(current.switch_to());
            }
            continue;
        }

        let run = digit_run(chars, i);
        if run >= 4 {
            if run % 2 == 1 {
                values.push(single(current, chars, i)?);
                i += 1;
            }
            current = Subset::C;
            values.push(CODE_C);
            continue;
        }

        if let Some(value) = current.value_of(chars[i]) {
            values.push(value);
            i += 1;
            continue;
        }

        let other = current.other();
        if other.value_of(chars[i]).is_none() {
            return Err(EncodeError::UnsupportedCharacter { index: i, ch: chars[i] });
        }
        let next_stays = chars.get(i + 1).map_or(false, |c| current.value_of(*c).is_some());
        if next_stays {
            values.push(SHIFT);
            values.push(single(other, chars, i)?);
            i += 1;
        } else {
            current = other;
            values.push(current.switch_to());
        }
    }

    Ok(Plan { start, values })
}

/// Codeword values for `data`; forced variants never change subset.
pub fn plan(data: &str, symbology: Symbology) -> Result<Plan, EncodeError> {
    let chars: Vec<char> = data.chars().collect();
    match symbology {
        Symbology::Code128A => plan_forced(&chars, Subset::A),
        Symbology::Code128B => plan_forced(&chars, Subset::B),
        Symbology::Code128C => plan_forced(&chars, Subset::C),
        _ => plan_auto(&chars),
    }
}

fn pattern(value: u32) -> Option<Codeword> {
    PATTERNS.get(value as usize).map(|w| Codeword::from_widths(w, Polarity::Bar))
}

pub fn encode(payload: &str, symbology: Symbology, check: Option<&CheckDigit>) -> Result<EncodedSymbol, EncodeError> {
    let plan = plan(payload, symbology)?;
    let check_value = check
        .and_then(|c| c.values.first().copied())
        .unwrap_or_else(|| checksum::mod103(plan.start, &plan.values));

    let data = plan
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| pattern(*v).ok_or_else(|| bad_check(i, *v)))
        .collect::<Result<Vec<_>, _>>()?;
    let start = pattern(plan.start).ok_or_else(|| bad_check(0, plan.start))?;
    let check = pattern(check_value).ok_or_else(|| bad_check(plan.values.len(), check_value))?;

    log::debug!(
        "code128 plan for {:?}: start {} + {} codewords",
        payload,
        plan.start,
        plan.values.len()
    );

    let text: String = payload.chars().map(|c| if c.is_control() { ' ' } else { c }).collect();
    Ok(EncodedSymbol::new(start, data, Codeword::from_widths(STOP, Polarity::Bar))
        .with_check(vec![check])
        .with_text(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto(data: &str) -> Plan {
        plan(data, Symbology::Code128).unwrap()
    }

    #[test]
    fn test_all_digits_start_in_c() {
        let p = auto("123456");
        assert_eq!(p.start, START_C);
        assert_eq!(p.values, vec![12, 34, 56]);
    }

    #[test]
    fn test_two_digits_alone_use_c() {
        assert_eq!(auto("42").start, START_C);
        assert_eq!(auto("42").values, vec![42]);
    }

    #[test]
    fn test_short_digit_run_stays_in_b() {
        let p = auto("AB12");
        assert_eq!(p.start, START_B);
        assert_eq!(p.values, vec![33, 34, 17, 18]);
    }

    #[test]
    fn test_long_digit_run_switches_to_c() {
        let p = auto("AB1234");
        assert_eq!(p.values, vec![33, 34, CODE_C, 12, 34]);
    }

    #[test]
    fn test_odd_digit_run_emits_one_digit_first() {
        let p = auto("A12345");
        assert_eq!(p.values, vec![33, 17, CODE_C, 23, 45]);
    }

    #[test]
    fn test_leaving_c_for_trailing_letters() {
        let p = auto("1234ab");
        assert_eq!(p.start, START_C);
        assert_eq!(p.values, vec![12, 34, CODE_B, 65, 66]);
    }

    #[test]
    fn test_control_char_starts_in_a() {
        let p = auto("\tA");
        assert_eq!(p.start, START_A);
        assert_eq!(p.values, vec![73, 33]);
    }

    #[test]
    fn test_single_foreign_char_uses_shift() {
        let p = auto("ab\tcd");
        assert_eq!(p.start, START_B);
        assert_eq!(p.values, vec![65, 66, SHIFT, 73, 67, 68]);
    }

    #[test]
    fn test_foreign_run_switches() {
        let p = auto("a\t\n");
        assert_eq!(p.values, vec![65, CODE_A, 73, 74]);
    }

    #[test]
    fn test_forced_subset_b() {
        let p = plan("1234", Symbology::Code128B).unwrap();
        assert_eq!(p.start, START_B);
        assert_eq!(p.values, vec![17, 18, 19, 20]);
    }

    #[test]
    fn test_encode_appends_mod103_and_stop() {
        let symbol = encode("AIM", Symbology::Code128, None).unwrap();
        assert_eq!(symbol.check, vec![pattern(45).unwrap()]);
        assert_eq!(symbol.stop.units(), 13);
        assert!(symbol.data.iter().all(|cw| cw.units() == 11));
    }
}
