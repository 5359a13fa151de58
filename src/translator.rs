use serde::Serialize;

/// One character of input and the cells it became
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharMapping {
    pub original: String,
    pub braille: String,
}

/// Blank Braille cell, used for spaces
pub const BRAILLE_SPACE: &str = "\u{2800}";

/// Trait that all script translators must implement
pub trait BrailleTranslator: Send + Sync {
    /// Returns the translator identifier (e.g., "english", "hindi")
    fn name(&self) -> &'static str;

    /// Returns a human-readable description of the translator
    fn description(&self) -> &'static str;

    /// Braille cells for one character of this script
    fn lookup(&self, ch: char) -> Option<&'static str>;

    /// Convert text to Braille; characters without a mapping pass through
    fn text_to_braille(&self, text: &str) -> String;

    /// Convert a Braille symbol stream back to text
    fn braille_to_text(&self, braille: &str) -> String;

    /// Per-character breakdown of a conversion
    fn detailed_mapping(&self, text: &str) -> Vec<CharMapping> {
        text.chars()
            .map(|ch| {
                if ch == ' ' {
                    CharMapping {
                        original: "space".to_string(),
                        braille: BRAILLE_SPACE.to_string(),
                    }
                } else {
                    let braille = self.text_to_braille(&ch.to_string());
                    CharMapping {
                        original: ch.to_string(),
                        braille,
                    }
                }
            })
            .collect()
    }
}
