//! Hindi (Bharati) Braille table

use crate::translator::BrailleTranslator;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Character table. Several letters share a cell, so reverse lookups take the
/// first entry: independent vowels win over matras, digits are never produced.
const CHAR_TO_BRAILLE: &[(char, &str)] = &[
    // vowels
    ('अ', "⠁"),
    ('आ', "⠜"),
    ('इ', "⠊"),
    ('ई', "⠔"),
    ('उ', "⠥"),
    ('ऊ', "⠳"),
    ('ऋ', "⠗"),
    ('ए', "⠑"),
    ('ऐ', "⠌"),
    ('ओ', "⠕"),
    ('औ', "⠪"),
    // velar, palatal, retroflex, dental, labial
    ('क', "⠅"),
    ('ख', "⠨"),
    ('ग', "⠛"),
    ('घ', "⠣"),
    ('ङ', "⠒"),
    ('च', "⠉"),
    ('छ', "⠡"),
    ('ज', "⠚"),
    ('झ', "⠴"),
    ('ञ', "⠒"),
    ('ट', "⠞"),
    ('ठ', "⠺"),
    ('ड', "⠙"),
    ('ढ', "⠮"),
    ('ण', "⠝"),
    ('त', "⠞"),
    ('थ', "⠹"),
    ('द', "⠙"),
    ('ध', "⠫"),
    ('न', "⠝"),
    ('प', "⠏"),
    ('फ', "⠋"),
    ('ब', "⠃"),
    ('भ', "⠘"),
    ('म', "⠍"),
    // semivowels, sibilants
    ('य', "⠽"),
    ('र', "⠗"),
    ('ल', "⠇"),
    ('व', "⠧"),
    ('श', "⠩"),
    ('ष', "⠯"),
    ('स', "⠎"),
    ('ह', "⠓"),
    // matras share the cell of their vowel
    ('ा', "⠜"),
    ('ि', "⠊"),
    ('ी', "⠔"),
    ('ु', "⠥"),
    ('ू', "⠳"),
    ('ृ', "⠗"),
    ('े', "⠑"),
    ('ै', "⠌"),
    ('ो', "⠕"),
    ('ौ', "⠪"),
    ('०', "⠚"),
    ('१', "⠁"),
    ('२', "⠃"),
    ('३', "⠉"),
    ('४', "⠙"),
    ('५', "⠑"),
    ('६', "⠋"),
    ('७', "⠛"),
    ('८', "⠓"),
    ('९', "⠊"),
    ('।', "⠲"),
    ('॥', "⠲⠲"),
    ('ं', "⠰"),
    ('ः', "⠱"),
    ('्', "⠈"),
    (' ', "⠀"),
    ('.', "⠲"),
    (',', "⠂"),
    ('?', "⠦"),
    ('!', "⠖"),
    (':', "⠒"),
    (';', "⠆"),
    ('-', "⠤"),
    ('"', "⠦"),
    ('\'', "⠄"),
];

static BRAILLE_TO_CHAR: LazyLock<HashMap<&'static str, char>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for &(ch, cells) in CHAR_TO_BRAILLE {
        if !is_devanagari_digit(ch) {
            map.entry(cells).or_insert(ch);
        }
    }
    map
});

fn is_devanagari_digit(ch: char) -> bool {
    ('०'..='९').contains(&ch)
}

pub struct DevanagariTranslator;

impl BrailleTranslator for DevanagariTranslator {
    fn name(&self) -> &'static str {
        "hindi"
    }

    fn description(&self) -> &'static str {
        "Hindi Bharati Braille: vowels, consonants, matras, digits, danda"
    }

    fn lookup(&self, ch: char) -> Option<&'static str> {
        CHAR_TO_BRAILLE
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, cells)| *cells)
    }

    fn text_to_braille(&self, text: &str) -> String {
        text.chars()
            .map(|ch| match self.lookup(ch) {
                Some(cells) => cells.to_string(),
                None => ch.to_string(),
            })
            .collect()
    }

    fn braille_to_text(&self, braille: &str) -> String {
        let cells: Vec<char> = braille.chars().collect();
        let mut text = String::with_capacity(braille.len());
        let mut i = 0;

        while i < cells.len() {
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
