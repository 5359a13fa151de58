//! Dot patterns to Unicode Braille text.

use super::cell::{DotPattern, BASE_BRAILLE_CODEPOINT};

/// Inserted between lines; read as a word break by the text translators
pub const ROW_SEPARATOR: char = ' ';

impl DotPattern {
    pub fn to_symbol(self) -> char {
        // 0x2800..=0x283F are all assigned scalar values
        char::from_u32(BASE_BRAILLE_CODEPOINT + self.bits() as u32).unwrap_or('\u{2800}')
    }

    /// Inverse of [`DotPattern::to_symbol`]; `None` outside the six-dot range
    #[cfg(test)]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let offset = (symbol as u32).checked_sub(BASE_BRAILLE_CODEPOINT)?;
        u8::try_from(offset).ok().and_then(DotPattern::new)
    }
}

/// Concatenate each line's symbols and join lines with [`ROW_SEPARATOR`].
pub fn render(rows: &[Vec<DotPattern>]) -> String {
    let mut out = String::new();
    for (i, row) in rows.iter().enumerate() {
        if i > 0 {
            out.push(ROW_SEPARATOR);
        }
        out.extend(row.iter().map(|p| p.to_symbol()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_round_trips_through_its_symbol() {
        for bits in 0..=63u8 {
            let pattern = DotPattern::new(bits).unwrap();
            assert_eq!(DotPattern::from_symbol(pattern.to_symbol()), Some(pattern));
        }
    }

    #[test]
    fn test_known_symbols() {
        assert_eq!(DotPattern::EMPTY.to_symbol(), '⠀');
        assert_eq!(DotPattern::FULL.to_symbol(), '⠿');
        assert_eq!(DotPattern::from_positions(&[1]).unwrap().to_symbol(), '⠁');
        assert_eq!(DotPattern::from_positions(&[1, 6]).unwrap().to_symbol(), '⠡');
    }

    #[test]
    fn test_from_symbol_rejects_other_characters() {
        assert_eq!(DotPattern::from_symbol('a'), None);
        // eight-dot patterns are outside the six-dot range
        assert_eq!(DotPattern::from_symbol('\u{2840}'), None);
        assert_eq!(DotPattern::from_symbol('\u{28FF}'), None);
    }

    #[test]
    fn test_render_separates_rows_once() {
        let a = DotPattern::from_positions(&[1]).unwrap();
        let b = DotPattern::from_positions(&[1, 2]).unwrap();
        let rows = vec![vec![a, b], vec![b, a]];

        assert_eq!(render(&rows), "⠁⠃ ⠃⠁");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render(&[]), "");
    }
}
