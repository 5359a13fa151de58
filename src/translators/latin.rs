//! English (Grade 1) Braille table

use crate::translator::BrailleTranslator;
use std::collections::HashMap;
use std::sync::LazyLock;

const NUMBER_SIGN: char = '⠼';

/// Character table; earlier entries win when several characters share cells
const CHAR_TO_BRAILLE: &[(char, &str)] = &[
    (' ', "⠀"),
    ('a', "⠁"),
    ('b', "⠃"),
    ('c', "⠉"),
    ('d', "⠙"),
    ('e', "⠑"),
    ('f', "⠋"),
    ('g', "⠛"),
    ('h', "⠓"),
    ('i', "⠊"),
    ('j', "⠚"),
    ('k', "⠅"),
    ('l', "⠇"),
    ('m', "⠍"),
    ('n', "⠝"),
    ('o', "⠕"),
    ('p', "⠏"),
    ('q', "⠟"),
    ('r', "⠗"),
    ('s', "⠎"),
    ('t', "⠞"),
    ('u', "⠥"),
    ('v', "⠧"),
    ('w', "⠺"),
    ('x', "⠭"),
    ('y', "⠽"),
    ('z', "⠵"),
    ('1', "⠼⠁"),
    ('2', "⠼⠃"),
    ('3', "⠼⠉"),
    ('4', "⠼⠙"),
    ('5', "⠼⠑"),
    ('6', "⠼⠋"),
    ('7', "⠼⠛"),
    ('8', "⠼⠓"),
    ('9', "⠼⠊"),
    ('0', "⠼⠚"),
    ('.', "⠲"),
    (',', "⠂"),
    (';', "⠆"),
    (':', "⠒"),
    ('?', "⠦"),
    ('!', "⠖"),
    ('"', "⠦"),
    ('\'', "⠄"),
    ('(', "⠐⠣"),
    (')', "⠐⠜"),
    ('-', "⠤"),
    ('@', "⠈⠁"),
];

/// Reverse table keyed by cell sequence, digits excluded (handled via the number sign)
static BRAILLE_TO_CHAR: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for &(ch, cells) in CHAR_TO_BRAILLE {
        if !ch.is_ascii_digit() {
            map.entry(cells).or_insert(ch);
        }
    }
    map
});

/// Cell after a number sign to the digit it stands for
fn digit_for(cell: char) -> Option<char> {
    CHAR_TO_BRAILLE
        .iter()
        .filter(|(ch, _)| ch.is_ascii_digit())
        .find(|(_, cells)| cells.chars().nth(1) == Some(cell))
        .map(|(ch, _)| *ch)
}

pub struct LatinTranslator;

impl BrailleTranslator for LatinTranslator {
    fn name(&self) -> &'static str {
        "english"
    }

    fn description(&self) -> &'static str {
        "English Grade 1 Braille: letters, digits with number sign, common punctuation"
    }

    fn lookup(&self, ch: char) -> Option<&'static str> {
        let lower = ch.to_ascii_lowercase();
        CHAR_TO_BRAILLE
            .iter()
            .find(|(c, _)| *c == lower)
            .map(|(_, cells)| *cells)
    }

    fn text_to_braille(&self, text: &str) -> String {
        text.chars()
            .flat_map(char::to_lowercase)
            .map(|ch| match self.lookup(ch) {
                Some(cells) => cells.to_string(),
                None => ch.to_string(),
            })
            .collect()
    }

    fn braille_to_text(&self, braille: &str) -> String {
        let cells: Vec<char> = braille.chars().collect();
        let mut text = String::with_capacity(cells.len());
        let mut i = 0;

        while i < cells.len() {
            if cells[i] == NUMBER_SIGN {
                if let Some(digit) = cells.get(i + 1).copied().and_then(digit_for) {
                    text.push(digit);
                    i += 2;
                    continue;
                }
            }

            if let Some(pair) = cells.get(i..i + 2) {
                let key: String = pair.iter().collect();
                if let Some(&ch) = BRAILLE_TO_CHAR.get(key.as_str()) {
                    text.push(ch);
                    i += 2;
                    continue;
                }
            }

            let key = cells[i].to_string();
            text.push(BRAILLE_TO_CHAR.get(key.as_str()).copied().unwrap_or(cells[i]));
            i += 1;
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_braille_lowercases() {
        assert_eq!(LatinTranslator.text_to_braille("Hi!"), "⠓⠊⠖");
    }

    #[test]
    fn test_digits_use_number_sign() {
        assert_eq!(LatinTranslator.text_to_braille("42"), "⠼⠙⠼⠃");
        assert_eq!(LatinTranslator.braille_to_text("⠼⠙⠼⠃"), "42");
    }

    #[test]
    fn test_round_trip_sentence() {
        let text = "hello world (test-1) @home";
        let braille = LatinTranslator.text_to_braille(text);
        assert_eq!(LatinTranslator.braille_to_text(&braille), text);
    }

    #[test]
    fn test_ambiguous_cell_prefers_first_entry() {
        assert_eq!(LatinTranslator.braille_to_text("⠦"), "?");
    }

    #[test]
    fn test_unknown_characters_pass_through() {
        assert_eq!(LatinTranslator.text_to_braille("é"), "é");
        // ASCII space is the row separator from the image decoder
        assert_eq!(LatinTranslator.braille_to_text("⠁⠃ ⠉⠿"), "ab c⠿");
    }

    #[test]
    fn test_detailed_mapping_names_spaces() {
        let mapping = LatinTranslator.detailed_mapping("a 1");
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping[0].braille, "⠁");
        assert_eq!(mapping[1].original, "space");
        assert_eq!(mapping[1].braille, "⠀");
        assert_eq!(mapping[2].braille, "⠼⠁");
    }
}
