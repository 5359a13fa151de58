//! Braille translator implementations
//!
//! Each translator wraps a static per-script lookup table. Tables are
//! immutable and shared freely between concurrent requests.

pub mod devanagari;
pub mod latin;

use crate::translator::BrailleTranslator;
use serde::Serialize;
use std::sync::Arc;

/// Information about an available translator
#[derive(Debug, Clone, Serialize)]
pub struct TranslatorInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Registry of available translators
pub struct TranslatorRegistry {
    translators: Vec<Arc<dyn BrailleTranslator>>,
    default_translator: String,
}

impl TranslatorRegistry {
    /// Create a registry with every script; falls back to English when
    /// `default_language` names no known translator
    pub fn new(default_language: &str) -> Self {
        let translators: Vec<Arc<dyn BrailleTranslator>> = vec![
            Arc::new(latin::LatinTranslator),
            Arc::new(devanagari::DevanagariTranslator),
        ];

        let mut registry = Self {
            translators,
            default_translator: "english".to_string(),
        };

        match registry.get(default_language) {
            Some(t) => registry.default_translator = t.name().to_string(),
            None => tracing::warn!(
                "Unknown default language '{}', using english",
                default_language
            ),
        }

        registry
    }

    /// Get a translator by name or ISO 639-2 alias
    pub fn get(&self, name: &str) -> Option<Arc<dyn BrailleTranslator>> {
        let name = match name.trim().to_lowercase().as_str() {
            "eng" | "en" => "english".to_string(),
            "hin" | "hi" => "hindi".to_string(),
            other => other.to_string(),
        };
        self.translators.iter().find(|t| t.name() == name).cloned()
    }

    /// Get the default translator
    pub fn default(&self) -> Option<Arc<dyn BrailleTranslator>> {
        self.get(&self.default_translator)
    }

    /// Get the default translator name
    pub fn default_name(&self) -> &str {
        &self.default_translator
    }

    /// Get info about all available translators
    pub fn info(&self) -> Vec<TranslatorInfo> {
        self.translators
            .iter()
            .map(|t| TranslatorInfo {
                name: t.name(),
                description: t.description(),
            })
            .collect()
    }
}
