//! Porter stemming algorithm implementation.
//!
//! Reduces English words to a root form with suffix-stripping rules applied
//! in five steps:
//! 1. Plurals, -ed/-ing suffixes and terminal -y
//! 2. -ational → -ate, -tional → -tion, etc.
//! 3. -icate → -ic, -ative → "", etc.
//! 4. Remove -al, -ance, -ence, etc.
//! 5. Remove final -e and reduce -ll
//!
//! Step 1 always runs. Steps 2 to 4 are tried in order and the first one that
//! rewrites the word ends stemming; step 5 only runs when none of them did.
//!
//! # Examples
//!
//! ```
//! use barrel_index::analysis::token_filter::stem::Stemmer;
//! use barrel_index::analysis::token_filter::stem::porter::PorterStemmer;
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("caresses"), "caress");
//! assert_eq!(stemmer.stem("motoring"), "motor");
//! assert_eq!(stemmer.stem("sensational"), "sensate");
//! ```

use crate::analysis::token_filter::stem::Stemmer;

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("bli", "ble"),
    ("alli", "al"),
    ("entli", "ent"),
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

/// Porter stemming algorithm implementation.
///
/// Operates on lowercase ASCII words. Words containing any non-ASCII
/// character, and words of two letters or fewer, are returned unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }

    /// A letter is a consonant unless it is a vowel; `y` is a consonant at the
    /// start of a word or after a vowel.
    #[allow(clippy::only_used_in_recursion)]
    fn is_consonant(&self, word: &[u8], i: usize) -> bool {
        match word[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.is_consonant(word, i - 1),
            _ => true,
        }
    }

    /// Number of vowel-run/consonant-run transitions after any leading
    /// consonants.
    fn measure(&self, word: &[u8]) -> usize {
        let n = word.len();
        let mut i = 0;
        let mut m = 0;

        while i < n && self.is_consonant(word, i) {
            i += 1;
        }

        loop {
            while i < n && !self.is_consonant(word, i) {
                i += 1;
            }
            if i >= n {
                break;
            }
            m += 1;
            while i < n && self.is_consonant(word, i) {
                i += 1;
            }
        }

        m
    }

    fn contains_vowel(&self, word: &[u8]) -> bool {
        (0..word.len()).any(|i| !self.is_consonant(word, i))
    }

    fn ends_with_double_consonant(&self, word: &[u8]) -> bool {
        let len = word.len();
        len >= 2 && word[len - 1] == word[len - 2] && self.is_consonant(word, len - 1)
    }

    /// Consonant-vowel-consonant ending where the last letter is not w, x or y.
    fn ends_cvc(&self, word: &[u8]) -> bool {
        let len = word.len();
        if len < 3 {
            return false;
        }

        self.is_consonant(word, len - 3)
            && !self.is_consonant(word, len - 2)
            && self.is_consonant(word, len - 1)
            && !matches!(word[len - 1], b'w' | b'x' | b'y')
    }

    fn step1a(&self, word: Vec<u8>) -> Vec<u8> {
        let mut word = word;
        if word.ends_with(b"sses") || word.ends_with(b"ies") {
            word.truncate(word.len() - 2);
        } else if word.ends_with(b"s") && !word.ends_with(b"ss") {
            word.pop();
        }
        word
    }

    fn step1b(&self, word: Vec<u8>) -> Vec<u8> {
        let mut word = word;

        if word.ends_with(b"eed") {
            if self.measure(&word[..word.len() - 3]) > 0 {
                word.pop();
            }
            return word;
        }

        let fired = if word.ends_with(b"ed") && self.contains_vowel(&word[..word.len() - 2]) {
            word.truncate(word.len() - 2);
            true
        } else if word.ends_with(b"ing") && self.contains_vowel(&word[..word.len() - 3]) {
            word.truncate(word.len() - 3);
            true
        } else {
            false
        };

        if !fired {
            return word;
        }

        if word.ends_with(b"at") || word.ends_with(b"bl") || word.ends_with(b"iz") {
            word.push(b'e');
        } else if self.ends_with_double_consonant(&word)
            && !matches!(word.last(), Some(b'l' | b's' | b'z'))
        {
            word.pop();
        } else if self.measure(&word) == 1 && self.ends_cvc(&word) {
            word.push(b'e');
        }

        word
    }

    fn step1c(&self, word: Vec<u8>) -> Vec<u8> {
        let mut word = word;
        let len = word.len();
        if word.ends_with(b"y") && self.contains_vowel(&word[..len - 1]) {
            word[len - 1] = b'i';
        }
        word
    }

    /// Apply the first rule whose suffix matches, if the remaining stem has
    /// positive measure.
    fn replace_first_suffix(&self, word: &[u8], rules: &[(&str, &str)]) -> Option<Vec<u8>> {
        let (suffix, replacement) = rules
            .iter()
            .find(|(suffix, _)| word.ends_with(suffix.as_bytes()))?;
        let stem = &word[..word.len() - suffix.len()];

        if self.measure(stem) > 0 {
            let mut result = stem.to_vec();
            result.extend_from_slice(replacement.as_bytes());
            Some(result)
        } else {
            None
        }
    }

    fn step2(&self, word: &[u8]) -> Option<Vec<u8>> {
        self.replace_first_suffix(word, STEP2_RULES)
    }

    fn step3(&self, word: &[u8]) -> Option<Vec<u8>> {
        self.replace_first_suffix(word, STEP3_RULES)
    }

    fn step4(&self, word: &[u8]) -> Option<Vec<u8>> {
        let suffix = STEP4_SUFFIXES
            .iter()
            .find(|suffix| word.ends_with(suffix.as_bytes()))?;
        let stem = &word[..word.len() - suffix.len()];

        if self.measure(stem) <= 1 {
            return None;
        }
        // -ion only after s or t
        if *suffix == "ion" && !matches!(stem.last(), Some(b's' | b't')) {
            return None;
        }

        Some(stem.to_vec())
    }

    fn step5(&self, word: Vec<u8>) -> Vec<u8> {
        let mut word = word;

        if word.ends_with(b"e") {
            let stem = &word[..word.len() - 1];
            let m = self.measure(stem);
            if m > 1 || (m == 1 && !self.ends_cvc(stem)) {
                word.pop();
            }
        }

        if word.ends_with(b"ll") && self.measure(&word) > 1 {
            word.pop();
        }

        word
    }

    fn stem_bytes(&self, word: Vec<u8>) -> Vec<u8> {
        let word = self.step1a(word);
        let word = self.step1b(word);
        let word = self.step1c(word);

        // The first of steps 2-4 that rewrites the word ends stemming, so
        // `sensational` stops at `sensate` instead of continuing to `sensat`.
        if let Some(word) = self.step2(&word) {
            return word;
        }
        if let Some(word) = self.step3(&word) {
            return word;
        }
        if let Some(word) = self.step4(&word) {
            return word;
        }
        self.step5(word)
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        if word.len() <= 2 || !word.is_ascii() {
            return word.to_string();
        }

        self.stem_bytes(word.as_bytes().to_vec())
            .into_iter()
            .map(char::from)
            .collect()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem(word: &str) -> String {
        PorterStemmer::new().stem(word)
    }

    #[test]
    fn test_golden_cases() {
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("feed"), "feed");
        assert_eq!(stem("plastered"), "plaster");
        assert_eq!(stem("motoring"), "motor");
        assert_eq!(stem("sensational"), "sensate");
    }

    #[test]
    fn test_step1() {
        assert_eq!(stem("caress"), "caress");
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("filing"), "file");
        assert_eq!(stem("conflated"), "conflat");
        assert_eq!(stem("troubled"), "troubl");
        assert_eq!(stem("sized"), "size");
        assert_eq!(stem("bled"), "bled");
        assert_eq!(stem("sing"), "sing");
        assert_eq!(stem("happy"), "happi");
        assert_eq!(stem("sky"), "sky");
    }

    #[test]
    fn test_step2_and_step3() {
        assert_eq!(stem("relational"), "relate");
        assert_eq!(stem("conditional"), "condition");
        assert_eq!(stem("valenci"), "valence");
        assert_eq!(stem("digitizer"), "digitize");
        assert_eq!(stem("conformabli"), "conformable");
        assert_eq!(stem("differentli"), "different");
        assert_eq!(stem("triplicate"), "triplic");
        assert_eq!(stem("formative"), "form");
        assert_eq!(stem("electrical"), "electric");
        assert_eq!(stem("hopeful"), "hope");
        assert_eq!(stem("goodness"), "good");
    }

    #[test]
    fn test_step4() {
        assert_eq!(stem("revival"), "reviv");
        assert_eq!(stem("allowance"), "allow");
        assert_eq!(stem("inference"), "infer");
        assert_eq!(stem("airliner"), "airlin");
        assert_eq!(stem("adjustable"), "adjust");
        assert_eq!(stem("replacement"), "replac");
        assert_eq!(stem("adjustment"), "adjust");
        assert_eq!(stem("dependent"), "depend");
        assert_eq!(stem("adoption"), "adopt");
        assert_eq!(stem("communism"), "commun");
        assert_eq!(stem("angulariti"), "angular");
        assert_eq!(stem("effective"), "effect");
    }

    #[test]
    fn test_step5() {
        assert_eq!(stem("probate"), "probat");
        assert_eq!(stem("rate"), "rate");
        assert_eq!(stem("cease"), "ceas");
        assert_eq!(stem("controll"), "control");
        assert_eq!(stem("roll"), "roll");
    }

    #[test]
    fn test_short_and_non_ascii_unchanged() {
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("as"), "as");
        assert_eq!(stem("naïves"), "naïves");
    }

    #[test]
    fn test_porter_measure() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.measure(b"tr"), 0);
        assert_eq!(stemmer.measure(b"tree"), 0);
        assert_eq!(stemmer.measure(b"trouble"), 1);
        assert_eq!(stemmer.measure(b"oats"), 1);
        assert_eq!(stemmer.measure(b"troubles"), 2);
        assert_eq!(stemmer.measure(b"private"), 2);
    }

    #[test]
    fn test_consonant_detection() {
        let stemmer = PorterStemmer::new();

        let word = b"toy";
        assert!(stemmer.is_consonant(word, 0));
        assert!(!stemmer.is_consonant(word, 1));
        assert!(stemmer.is_consonant(word, 2)); // y after a vowel

        let word = b"syzygy";
        assert!(!stemmer.is_consonant(word, 1)); // y after s
        assert!(stemmer.is_consonant(b"yes", 0)); // word-initial y
    }
}
