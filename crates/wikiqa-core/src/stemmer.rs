//! Porter suffix-stripping stemmer.
//!
//! Porter's 1980 algorithm: steps 1a through 5b, each governed by the
//! measure `m` of the candidate stem (the number of vowel-consonant runs).
//! Within a step only the longest matching suffix is considered; when its
//! condition fails the step leaves the word alone.
//!
//! Indices built with `stem` are compared against each other, so the rules
//! here must not drift from the reference reduction.

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Reduce one lower-case word to its Porter stem.
///
/// Words of two letters or fewer, and anything that is not purely ASCII
/// lower-case letters (numbers, contractions, mixed case), are returned
/// unchanged.
pub fn stem(word: &str) -> String {
    if word.len() <= 2 || !word.bytes().all(|b| b.is_ascii_lowercase()) {
        return word.to_string();
    }
    let mut w = Word { b: word.as_bytes().to_vec() };
    w.step1a();
    w.step1b();
    w.step1c();
    w.step2();
    w.step3();
    w.step4();
    w.step5a();
    w.step5b();
    w.b.into_iter().map(char::from).collect()
}

struct Word {
    b: Vec<u8>,
}

fn is_consonant(b: &[u8], i: usize) -> bool {
    match b[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(b, i - 1),
        _ => true,
    }
}

/// Number of VC sequences in `[C](VC)^m[V]`.
fn measure(b: &[u8]) -> usize {
    let n = b.len();
    let mut i = 0;
    while i < n && is_consonant(b, i) {
        i += 1;
    }
    let mut m = 0;
    loop {
        while i < n && !is_consonant(b, i) {
            i += 1;
        }
        if i >= n {
            return m;
        }
        while i < n && is_consonant(b, i) {
            i += 1;
        }
        m += 1;
    }
}

fn contains_vowel(b: &[u8]) -> bool {
    (0..b.len()).any(|i| !is_consonant(b, i))
}

fn ends_double_consonant(b: &[u8]) -> bool {
    let n = b.len();
    n >= 2 && b[n - 1] == b[n - 2] && is_consonant(b, n - 1)
}

/// `*o`: ends consonant-vowel-consonant, the last consonant not w, x or y.
fn ends_cvc(b: &[u8]) -> bool {
    let n = b.len();
    n >= 3
        && is_consonant(b, n - 3)
        && !is_consonant(b, n - 2)
        && is_consonant(b, n - 1)
        && !matches!(b[n - 1], b'w' | b'x' | b'y')
}

impl Word {
    fn ends_with(&self, suffix: &str) -> bool {
        self.b.ends_with(suffix.as_bytes())
    }

    fn stem_len(&self, suffix: &str) -> usize {
        self.b.len() - suffix.len()
    }

    fn replace_suffix(&mut self, suffix: &str, replacement: &str) {
        let keep = self.stem_len(suffix);
        self.b.truncate(keep);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    /// Longest rule whose suffix the word ends with.
    fn longest_match<'r>(&self, rules: &'r [(&'r str, &'r str)]) -> Option<(&'r str, &'r str)> {
        rules
            .iter()
            .filter(|(suffix, _)| self.ends_with(suffix))
            .max_by_key(|(suffix, _)| suffix.len())
            .copied()
    }

    fn apply_if_measure_above(&mut self, rules: &[(&str, &str)], min: usize) {
        if let Some((suffix, replacement)) = self.longest_match(rules) {
            if measure(&self.b[..self.stem_len(suffix)]) > min {
                self.replace_suffix(suffix, replacement);
            }
        }
    }

    fn step1a(&mut self) {
        if self.ends_with("sses") || self.ends_with("ies") {
            self.b.truncate(self.b.len() - 2);
        } else if self.ends_with("s") && !self.ends_with("ss") {
            self.b.pop();
        }
    }

    fn step1b(&mut self) {
        if self.ends_with("eed") {
            if measure(&self.b[..self.stem_len("eed")]) > 0 {
                self.b.pop();
            }
            return;
        }
        let suffix = if self.ends_with("ed") {
            "ed"
        } else if self.ends_with("ing") {
            "ing"
        } else {
            return;
        };
        if !contains_vowel(&self.b[..self.stem_len(suffix)]) {
            return;
        }
        self.b.truncate(self.stem_len(suffix));
        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.b.push(b'e');
        } else if ends_double_consonant(&self.b)
            && !matches!(self.b.last(), Some(b'l' | b's' | b'z'))
        {
            self.b.pop();
        } else if measure(&self.b) == 1 && ends_cvc(&self.b) {
            self.b.push(b'e');
        }
    }

    fn step1c(&mut self) {
        if self.ends_with("y") && contains_vowel(&self.b[..self.b.len() - 1]) {
            let last = self.b.len() - 1;
            self.b[last] = b'i';
        }
    }

    fn step2(&mut self) {
        self.apply_if_measure_above(STEP2_RULES, 0);
    }

    fn step3(&mut self) {
        self.apply_if_measure_above(STEP3_RULES, 0);
    }

    fn step4(&mut self) {
        let Some(suffix) = STEP4_SUFFIXES
            .iter()
            .filter(|suffix| self.ends_with(suffix))
            .max_by_key(|suffix| suffix.len())
        else {
            return;
        };
        let stem = &self.b[..self.stem_len(suffix)];
        if *suffix == "ion" && !matches!(stem.last(), Some(b's' | b't')) {
            return;
        }
        if measure(stem) > 1 {
            self.b.truncate(self.stem_len(suffix));
        }
    }

    fn step5a(&mut self) {
        if !self.ends_with("e") {
            return;
        }
        let stem = &self.b[..self.b.len() - 1];
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            self.b.pop();
        }
    }

    fn step5b(&mut self) {
        if self.ends_with("l") && ends_double_consonant(&self.b) && measure(&self.b) > 1 {
            self.b.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(cases: &[(&str, &str)]) {
        for (input, expected) in cases {
            assert_eq!(stem(input), *expected, "stem({})", input);
        }
    }

    #[test]
    fn measure_counts_vc_runs() {
        assert_eq!(measure(b"tr"), 0);
        assert_eq!(measure(b"ee"), 0);
        assert_eq!(measure(b"tree"), 0);
        assert_eq!(measure(b"trouble"), 1);
        assert_eq!(measure(b"oats"), 1);
        assert_eq!(measure(b"troubles"), 2);
        assert_eq!(measure(b"private"), 2);
    }

    #[test]
    fn step1_plurals_and_participles() {
        check(&[
            ("caresses", "caress"),
            ("ponies", "poni"),
            ("ties", "ti"),
            ("caress", "caress"),
            ("cats", "cat"),
            ("feed", "feed"),
            ("agreed", "agre"),
            ("plastered", "plaster"),
            ("bled", "bled"),
            ("motoring", "motor"),
            ("sing", "sing"),
            ("hopping", "hop"),
            ("falling", "fall"),
            ("hissing", "hiss"),
            ("happy", "happi"),
            ("sky", "sky"),
        ]);
    }

    #[test]
    fn derivational_suffixes() {
        check(&[
            ("relational", "relat"),
            ("connection", "connect"),
            ("connections", "connect"),
            ("connected", "connect"),
            ("connecting", "connect"),
            ("hopeful", "hope"),
            ("goodness", "good"),
            ("adjustable", "adjust"),
        ]);
    }

    #[test]
    fn running_reduces_to_run_and_run_is_stable() {
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("run"), "run");
        assert_eq!(stem(&stem("running")), "run");
    }

    #[test]
    fn short_and_non_alphabetic_tokens_pass_through() {
        check(&[
            ("a", "a"),
            ("is", "is"),
            ("1984", "1984"),
            ("don't", "don't"),
            ("Cats", "Cats"),
            ("", ""),
        ]);
    }
}
