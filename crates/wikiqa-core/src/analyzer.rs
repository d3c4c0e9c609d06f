//! Default English [`TextAnalyzer`].
//!
//! Words come from Unicode word boundaries (UAX #29), so punctuation never
//! becomes a token and contractions stay whole. Lemmas come from an
//! irregular-form table followed by inflectional suffix rules; there is no
//! part-of-speech tagging, so the rules stay conservative and leave words
//! alone when in doubt.

use std::collections::HashMap;
use std::sync::OnceLock;

use unicode_segmentation::UnicodeSegmentation;

use crate::traits::TextAnalyzer;

#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishAnalyzer;

impl EnglishAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl TextAnalyzer for EnglishAnalyzer {
    fn word_tokens(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(str::to_string).collect()
    }

    fn lemmas(&self, text: &str) -> Vec<String> {
        text.unicode_words().map(lemmatize_word).collect()
    }
}

const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("being", "be"),
    ("has", "have"),
    ("had", "have"),
    ("having", "have"),
    ("does", "do"),
    ("did", "do"),
    ("done", "do"),
    ("doing", "do"),
    ("going", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("goes", "go"),
    ("made", "make"),
    ("said", "say"),
    ("took", "take"),
    ("taken", "take"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("knew", "know"),
    ("known", "know"),
    ("got", "get"),
    ("gotten", "get"),
    ("gave", "give"),
    ("given", "give"),
    ("found", "find"),
    ("thought", "think"),
    ("told", "tell"),
    ("became", "become"),
    ("left", "leave"),
    ("felt", "feel"),
    ("brought", "bring"),
    ("began", "begin"),
    ("begun", "begin"),
    ("kept", "keep"),
    ("held", "hold"),
    ("wrote", "write"),
    ("written", "write"),
    ("stood", "stand"),
    ("heard", "hear"),
    ("meant", "mean"),
    ("met", "meet"),
    ("ran", "run"),
    ("paid", "pay"),
    ("sat", "sit"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("led", "lead"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("lost", "lose"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("sent", "send"),
    ("built", "build"),
    ("understood", "understand"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("broke", "break"),
    ("broken", "break"),
    ("spent", "spend"),
    ("won", "win"),
    ("taught", "teach"),
    ("bought", "buy"),
    ("caught", "catch"),
    ("fought", "fight"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("sang", "sing"),
    ("sung", "sing"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("born", "bear"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("died", "die"),
    ("lay", "lie"),
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("lives", "life"),
    ("wives", "wife"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("wolves", "wolf"),
    ("halves", "half"),
    ("shelves", "shelf"),
    ("better", "good"),
    ("best", "good"),
    ("worse", "bad"),
    ("worst", "bad"),
    ("us", "we"),
    ("them", "they"),
    ("him", "he"),
    ("her", "she"),
    ("me", "i"),
];

/// Words that look inflected but are already base forms.
const UNINFLECTED: &[&str] = &[
    "this", "thus", "news", "series", "species", "always", "perhaps", "whereas", "towards",
    "across", "less", "unless", "lens", "chaos", "physics", "mathematics", "economics", "politics",
    "athletics", "billiards", "means", "sometimes", "during", "morning", "evening", "nothing",
    "something", "anything", "everything", "ceiling", "string", "spring", "wedding", "hundred",
    "sacred", "naked", "wicked", "kindred",
];

fn irregular_forms() -> &'static HashMap<&'static str, &'static str> {
    static FORMS: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    FORMS.get_or_init(|| IRREGULAR_FORMS.iter().copied().collect())
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

fn has_vowel(s: &str) -> bool {
    s.chars().any(|c| is_vowel(c) || c == 'y')
}

/// Dictionary base form of one word, as far as rules can tell.
pub fn lemmatize_word(word: &str) -> String {
    let lower = word.to_lowercase();
    if let Some(base) = irregular_forms().get(lower.as_str()) {
        return (*base).to_string();
    }
    if lower.chars().count() <= 3 || !lower.chars().all(|c| c.is_alphabetic() || c == '\'') {
        return lower;
    }
    if UNINFLECTED.contains(&lower.as_str()) {
        return lower;
    }
    if let Some(base) = strip_plural(&lower) {
        return base;
    }
    if let Some(base) = strip_verb_suffix(&lower) {
        return base;
    }
    lower
}

fn strip_plural(word: &str) -> Option<String> {
    if let Some(stem) = word.strip_suffix("ies") {
        return Some(format!("{}y", stem));
    }
    for suffix in ["sses", "shes", "ches", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return Some(word[..word.len() - 2].to_string());
        }
    }
    if ["ss", "us", "is", "'s"].iter().any(|suffix| word.ends_with(suffix)) {
        return None;
    }
    word.strip_suffix('s').map(str::to_string)
}

fn strip_verb_suffix(word: &str) -> Option<String> {
    let stem = if let Some(stem) = word.strip_suffix("ing") {
        stem
    } else if let Some(stem) = word.strip_suffix("ied") {
        return Some(format!("{}y", stem));
    } else if let Some(stem) = word.strip_suffix("ed") {
        stem
    } else {
        return None;
    };
    if stem.chars().count() < 3 || !has_vowel(stem) {
        return None;
    }
    Some(restore_verb_stem(stem))
}

/// Undo the spelling changes inflection makes to a verb stem: doubled final
/// consonants (`running`) and dropped silent `e` (`making`).
fn restore_verb_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];
    if n >= 3 && last == chars[n - 2] && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z' | 'f') {
        return chars[..n - 1].iter().collect();
    }
    if ["at", "iz", "bl", "dg", "v"].iter().any(|suffix| stem.ends_with(suffix)) {
        return format!("{}e", stem);
    }
    // short consonant-vowel-consonant stems usually lost a silent e: mak(e), hop(e)
    if (3..=4).contains(&n)
        && !is_vowel(chars[n - 3])
        && is_vowel(chars[n - 2])
        && !is_vowel(last)
        && !matches!(last, 'w' | 'x' | 'y')
    {
        return format!("{}e", stem);
    }
    stem.to_string()
}
