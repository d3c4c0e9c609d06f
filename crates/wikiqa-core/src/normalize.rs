//! The normalization contract shared by index build and query time.

use std::sync::Arc;

use crate::analyzer::EnglishAnalyzer;
use crate::stemmer::stem;
use crate::traits::TextAnalyzer;
use crate::types::NormalizationMode;

/// Lower-cases, segments and reduces text into index terms.
///
/// Cloning is cheap; the analyzer is shared.
#[derive(Clone)]
pub struct TextNormalizer {
    analyzer: Arc<dyn TextAnalyzer>,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(EnglishAnalyzer::new()))
    }
}

impl TextNormalizer {
    pub fn new(analyzer: Arc<dyn TextAnalyzer>) -> Self {
        Self { analyzer }
    }

    pub fn normalize(&self, text: &str, mode: NormalizationMode) -> Vec<String> {
        let lowered = text.to_lowercase();
        match mode {
            NormalizationMode::None => self.analyzer.word_tokens(&lowered),
            NormalizationMode::Stem => {
                self.analyzer.word_tokens(&lowered).iter().map(|w| stem(w)).collect()
            }
            NormalizationMode::Lemmatize => self.analyzer.lemmas(&lowered),
        }
    }

    /// [`normalize`](Self::normalize) joined with single spaces.
    pub fn normalize_joined(&self, text: &str, mode: NormalizationMode) -> String {
        self.normalize(text, mode).join(" ")
    }
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer").finish_non_exhaustive()
    }
}
