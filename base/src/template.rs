//! Bit-pattern templates.
//!
//! An instruction encoding is written the way the AVR instruction set
//! manual writes it, for example `0010 01rd dddd rrrr` for `EOR Rd,Rr`.
//! `0` and `1` are literal bits, spaces are ignored, and letters are
//! placeholders for operand bits.  Each letter is bound to one of the
//! two operands.  Reading the template from its least significant
//! (rightmost) position, every occurrence of a letter takes the next
//! bit of its operand, starting with bit 0.  Each letter counts
//! independently, so the same operand can appear twice in one word
//! (`CLR Rd` is `EOR Rd,Rd`: both `d` and `r` are bound to the first
//! operand).
//!
//! Templates are 16 or 32 bits long.  The leftmost 16 positions form
//! the first instruction word, so a 32-bit template yields its words
//! in the order in which its fields are written.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

/// The length of an instruction word in bits.
pub const WORD_BITS: usize = 16;

/// One position in a parsed template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateBit {
    Literal(bool),
    /// Bit number `bit` of operand number `operand` (0 or 1).
    Operand { operand: usize, bit: u32 },
}

/// A parsed bit-pattern template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// The bits in the order in which they are written, most
    /// significant bit of the first word first.
    bits: Vec<TemplateBit>,
    /// The number of bits of each operand the template consumes.
    widths: [u32; 2],
}

/// Problems found when parsing a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    BadLength(usize),
    UnexpectedCharacter(char),
    /// A placeholder letter appears in the template but is bound to
    /// neither operand.
    UnboundPlaceholder(char),
    /// A letter is bound to both operands.
    AmbiguousPlaceholder(char),
    /// A letter is bound to an operand but never appears.
    UnusedPlaceholder(char),
    /// Two letters bound to the same operand appear a different number
    /// of times, so they would describe different widths.
    InconsistentWidth { operand: usize, letters: (char, char) },
}

impl Display for TemplateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::BadLength(n) => {
                write!(f, "template has {n} bits, but it should have 16 or 32")
            }
            TemplateError::UnexpectedCharacter(ch) => {
                write!(f, "unexpected character '{ch}' in template")
            }
            TemplateError::UnboundPlaceholder(ch) => {
                write!(f, "placeholder '{ch}' is not bound to an operand")
            }
            TemplateError::AmbiguousPlaceholder(ch) => {
                write!(f, "placeholder '{ch}' is bound to both operands")
            }
            TemplateError::UnusedPlaceholder(ch) => {
                write!(f, "placeholder '{ch}' does not appear in the template")
            }
            TemplateError::InconsistentWidth {
                operand,
                letters: (a, b),
            } => write!(
                f,
                "placeholders '{a}' and '{b}' of operand {} have different widths",
                operand + 1
            ),
        }
    }
}

impl Error for TemplateError {}

impl Template {
    /// Parse `text`.  `letters[i]` lists the placeholder letters
    /// bound to operand `i`.
    ///
    /// # Errors
    ///
    /// See [`TemplateError`].
    pub fn parse(text: &str, letters: [&str; 2]) -> Result<Template, TemplateError> {
        let operand_of = |ch: char| -> Result<usize, TemplateError> {
            match (letters[0].contains(ch), letters[1].contains(ch)) {
                (true, false) => Ok(0),
                (false, true) => Ok(1),
                (true, true) => Err(TemplateError::AmbiguousPlaceholder(ch)),
                (false, false) => Err(TemplateError::UnboundPlaceholder(ch)),
            }
        };

        let symbols: Vec<char> = text.chars().filter(|ch| !ch.is_whitespace()).collect();
        if symbols.len() != WORD_BITS && symbols.len() != 2 * WORD_BITS {
            return Err(TemplateError::BadLength(symbols.len()));
        }

        // Occurrence counts per letter, in order of first appearance
        // from the least significant end.
        let mut counts: Vec<(char, u32)> = Vec::new();
        let mut bits: Vec<TemplateBit> = Vec::with_capacity(symbols.len());
        for ch in symbols.iter().rev().copied() {
            let bit = match ch {
                '0' => TemplateBit::Literal(false),
                '1' => TemplateBit::Literal(true),
                ch if ch.is_ascii_alphabetic() => {
                    let operand = operand_of(ch)?;
                    let index = match counts.iter().position(|(letter, _)| *letter == ch) {
                        Some(index) => index,
                        None => {
                            counts.push((ch, 0));
                            counts.len() - 1
                        }
                    };
                    let bit = counts[index].1;
                    counts[index].1 += 1;
                    TemplateBit::Operand { operand, bit }
                }
                other => {
                    return Err(TemplateError::UnexpectedCharacter(other));
                }
            };
            bits.push(bit);
        }
        bits.reverse();

        let mut widths: [u32; 2] = [0, 0];
        for (operand, bound) in letters.iter().enumerate() {
            let mut first: Option<(char, u32)> = None;
            for letter in bound.chars() {
                let count = counts
                    .iter()
                    .find(|(ch, _)| *ch == letter)
                    .map(|(_, count)| *count)
                    .ok_or(TemplateError::UnusedPlaceholder(letter))?;
                match first {
                    None => {
                        first = Some((letter, count));
                    }
                    Some((other, width)) if width != count => {
                        return Err(TemplateError::InconsistentWidth {
                            operand,
                            letters: (other, letter),
                        });
                    }
                    Some(_) => (),
                }
            }
            widths[operand] = first.map_or(0, |(_, width)| width);
        }

        Ok(Template { bits, widths })
    }

    /// The number of 16-bit words this template produces.
    #[must_use]
    pub fn words(&self) -> usize {
        self.bits.len() / WORD_BITS
    }

    /// The number of bits of operand `operand` (0 or 1) which the
    /// template holds.
    #[must_use]
    pub fn width(&self, operand: usize) -> u32 {
        self.widths[operand]
    }

    #[must_use]
    pub fn bits(&self) -> &[TemplateBit] {
        &self.bits
    }

    /// Pack the operand values into instruction words.  Only the low
    /// [`Template::width`] bits of each value are used; the caller is
    /// responsible for having range-checked them.
    #[must_use]
    pub fn pack(&self, operands: [i64; 2]) -> Vec<u16> {
        self.bits
            .chunks(WORD_BITS)
            .map(|chunk| {
                chunk.iter().fold(0_u16, |word, bit| {
                    let b: u16 = match *bit {
                        TemplateBit::Literal(b) => u16::from(b),
                        TemplateBit::Operand { operand, bit } => {
                            u16::from((operands[operand] >> bit) & 1 == 1)
                        }
                    };
                    (word << 1) | b
                })
            })
            .collect()
    }

    /// Recover the operand bits from instruction words.  Returns
    /// `None` if the words do not match this template (wrong length,
    /// literal bits differ, or repeated placeholders disagree).
    #[must_use]
    pub fn unpack(&self, words: &[u16]) -> Option<[u64; 2]> {
        if words.len() != self.words() {
            return None;
        }
        let mut result: [u64; 2] = [0, 0];
        let mut seen: [u64; 2] = [0, 0];
        for (pos, template_bit) in self.bits.iter().enumerate() {
            let word = words[pos / WORD_BITS];
            let shift = WORD_BITS - 1 - (pos % WORD_BITS);
            let actual = (word >> shift) & 1 == 1;
            match *template_bit {
                TemplateBit::Literal(expected) => {
                    if expected != actual {
                        return None;
                    }
                }
                TemplateBit::Operand { operand, bit } => {
                    let mask = 1_u64 << bit;
                    if seen[operand] & mask != 0 {
                        if (result[operand] & mask != 0) != actual {
                            return None;
                        }
                    } else {
                        seen[operand] |= mask;
                        if actual {
                            result[operand] |= mask;
                        }
                    }
                }
            }
        }
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_template() {
        let t = Template::parse("1001 0101 0000 1000", ["", ""]).expect("valid template");
        assert_eq!(t.words(), 1);
        assert_eq!(t.width(0), 0);
        assert_eq!(t.pack([0, 0]), vec![0x9508]);
    }

    #[test]
    fn register_and_immediate() {
        // LDI r16, 0xAB
        let t = Template::parse("1110 KKKK dddd KKKK", ["d", "K"]).expect("valid template");
        assert_eq!(t.width(0), 4);
        assert_eq!(t.width(1), 8);
        assert_eq!(t.pack([0, 0xAB]), vec![0xEA0B]);
    }

    #[test]
    fn split_fields_are_filled_from_the_right() {
        // ADD r1, r31: 0000 11rd dddd rrrr
        let t = Template::parse("0000 11rd dddd rrrr", ["d", "r"]).expect("valid template");
        assert_eq!(t.pack([1, 31]), vec![0b0000_1110_0001_1111]);
    }

    #[test]
    fn repeated_operand() {
        // CLR r17 is EOR r17, r17.
        let t = Template::parse("0010 01rd dddd rrrr", ["dr", ""]).expect("valid template");
        assert_eq!(t.width(0), 5);
        assert_eq!(t.pack([17, 0]), vec![0b0010_0111_0001_0001]);
        assert_eq!(t.unpack(&[0b0010_0111_0001_0001]), Some([17, 0]));
        // The two copies of the operand disagree.
        assert_eq!(t.unpack(&[0b0010_0111_0001_0000]), None);
    }

    #[test]
    fn two_word_template() {
        // JMP 0x3F_1234
        let t = Template::parse("1001 010k kkkk 110k kkkk kkkk kkkk kkkk", ["k", ""])
            .expect("valid template");
        assert_eq!(t.words(), 2);
        assert_eq!(t.width(0), 22);
        assert_eq!(t.pack([0, 0]), vec![0x940C, 0x0000]);
        assert_eq!(t.pack([0x3F_1234, 0]), vec![0x95FD, 0x1234]);
        assert_eq!(t.unpack(&[0x95FD, 0x1234]), Some([0x3F_1234, 0]));
    }

    #[test]
    fn literal_mismatch_does_not_unpack() {
        let t = Template::parse("1100 kkkk kkkk kkkk", ["k", ""]).expect("valid template");
        assert_eq!(t.unpack(&[0xD000]), None);
        assert_eq!(t.unpack(&[0xC000, 0]), None);
    }

    #[test]
    fn bad_templates() {
        assert_eq!(
            Template::parse("1001 0101 0000 100", ["", ""]),
            Err(TemplateError::BadLength(15))
        );
        assert_eq!(
            Template::parse("1001 0101 0000 100?", ["", ""]),
            Err(TemplateError::UnexpectedCharacter('?'))
        );
        assert_eq!(
            Template::parse("1001 010d dddd 0000", ["", ""]),
            Err(TemplateError::UnboundPlaceholder('d'))
        );
        assert_eq!(
            Template::parse("1001 010d dddd 0000", ["d", "d"]),
            Err(TemplateError::AmbiguousPlaceholder('d'))
        );
        assert_eq!(
            Template::parse("1001 010d dddd 0000", ["d", "r"]),
            Err(TemplateError::UnusedPlaceholder('r'))
        );
        assert_eq!(
            Template::parse("1001 01rd dddd 0rrr", ["dr", ""]),
            Err(TemplateError::InconsistentWidth {
                operand: 0,
                letters: ('d', 'r')
            })
        );
    }
}
