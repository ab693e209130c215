//! Porter stemmer, NLTK flavour
//!
//! Follows NLTK's `PorterStemmer` in its default `NLTK_EXTENSIONS` mode, the
//! stemmer `rouge_score` applies. Unlike Snowball English, `-li` forms are
//! kept ("fairly" stems to "fairli").

/// Words with a fixed stem, checked before any rule runs
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("skies", "sky"),
    ("sky", "sky"),
    ("dying", "die"),
    ("lying", "lie"),
    ("tying", "tie"),
    ("news", "news"),
    ("innings", "inning"),
    ("inning", "inning"),
    ("outings", "outing"),
    ("outing", "outing"),
    ("cannings", "canning"),
    ("canning", "canning"),
    ("howe", "howe"),
    ("proceed", "proceed"),
    ("exceed", "exceed"),
    ("succeed", "succeed"),
];

#[derive(Debug, Clone, Copy)]
enum Condition {
    Always,
    PositiveMeasure,
    MeasureAbove1,
    /// `-ion` is only dropped after `s` or `t`
    IonStem,
    /// `-logi` keeps its `l` when measuring the stem
    LogiStem,
}

impl Condition {
    fn holds(self, stem: &str) -> bool {
        match self {
            Condition::Always => true,
            Condition::PositiveMeasure => measure(stem) > 0,
            Condition::MeasureAbove1 => measure(stem) > 1,
            Condition::IonStem => {
                measure(stem) > 1 && matches!(stem.as_bytes().last(), Some(b's' | b't'))
            }
            Condition::LogiStem => measure(&format!("{}l", stem)) > 0,
        }
    }
}

type Rule = (&'static str, &'static str, Condition);

const STEP1A: &[Rule] = &[
    ("sses", "ss", Condition::Always),
    ("ies", "i", Condition::Always),
    ("ss", "ss", Condition::Always),
    ("s", "", Condition::Always),
];

const STEP2: &[Rule] = &[
    ("ational", "ate", Condition::PositiveMeasure),
    ("tional", "tion", Condition::PositiveMeasure),
    ("enci", "ence", Condition::PositiveMeasure),
    ("anci", "ance", Condition::PositiveMeasure),
    ("izer", "ize", Condition::PositiveMeasure),
    ("bli", "ble", Condition::PositiveMeasure),
    ("alli", "al", Condition::PositiveMeasure),
    ("entli", "ent", Condition::PositiveMeasure),
    ("eli", "e", Condition::PositiveMeasure),
    ("ousli", "ous", Condition::PositiveMeasure),
    ("ization", "ize", Condition::PositiveMeasure),
    ("ation", "ate", Condition::PositiveMeasure),
    ("ator", "ate", Condition::PositiveMeasure),
    ("alism", "al", Condition::PositiveMeasure),
    ("iveness", "ive", Condition::PositiveMeasure),
    ("fulness", "ful", Condition::PositiveMeasure),
    ("ousness", "ous", Condition::PositiveMeasure),
    ("aliti", "al", Condition::PositiveMeasure),
    ("iviti", "ive", Condition::PositiveMeasure),
    ("biliti", "ble", Condition::PositiveMeasure),
    ("fulli", "ful", Condition::PositiveMeasure),
    ("logi", "log", Condition::LogiStem),
];

const STEP3: &[Rule] = &[
    ("icate", "ic", Condition::PositiveMeasure),
    ("ative", "", Condition::PositiveMeasure),
    ("alize", "al", Condition::PositiveMeasure),
    ("iciti", "ic", Condition::PositiveMeasure),
    ("ical", "ic", Condition::PositiveMeasure),
    ("ful", "", Condition::PositiveMeasure),
    ("ness", "", Condition::PositiveMeasure),
];

const STEP4: &[Rule] = &[
    ("al", "", Condition::MeasureAbove1),
    ("ance", "", Condition::MeasureAbove1),
    ("ence", "", Condition::MeasureAbove1),
    ("er", "", Condition::MeasureAbove1),
    ("ic", "", Condition::MeasureAbove1),
    ("able", "", Condition::MeasureAbove1),
    ("ible", "", Condition::MeasureAbove1),
    ("ant", "", Condition::MeasureAbove1),
    ("ement", "", Condition::MeasureAbove1),
    ("ment", "", Condition::MeasureAbove1),
    ("ent", "", Condition::MeasureAbove1),
    ("ion", "", Condition::IonStem),
    ("ou", "", Condition::MeasureAbove1),
    ("ism", "", Condition::MeasureAbove1),
    ("ate", "", Condition::MeasureAbove1),
    ("iti", "", Condition::MeasureAbove1),
    ("ous", "", Condition::MeasureAbove1),
    ("ive", "", Condition::MeasureAbove1),
    ("ize", "", Condition::MeasureAbove1),
];

/// Stem a single word
pub fn stem(word: &str) -> String {
    let word = word.to_lowercase();
    if let Some(&(_, fixed)) = IRREGULAR_FORMS.iter().find(|(form, _)| *form == word) {
        return fixed.to_string();
    }
    if word.len() <= 2 || !word.is_ascii() {
        return word;
    }

    let word = step1a(word);
    let word = step1b(word);
    let word = step1c(word);
    let word = step2(word);
    let word = apply_rules(word, STEP3);
    let word = apply_rules(word, STEP4);
    let word = step5a(word);
    step5b(word)
}

fn is_consonant(word: &[u8], i: usize) -> bool {
    match word[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(word, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant transitions, the `m` of `[C](VC)^m[V]`
fn measure(stem: &str) -> usize {
    let bytes = stem.as_bytes();
    let mut count = 0;
    let mut after_vowel = false;
    for i in 0..bytes.len() {
        let consonant = is_consonant(bytes, i);
        if consonant && after_vowel {
            count += 1;
        }
        after_vowel = !consonant;
    }
    count
}

fn contains_vowel(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    (0..bytes.len()).any(|i| !is_consonant(bytes, i))
}

fn ends_double_consonant(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    n >= 2 && bytes[n - 1] == bytes[n - 2] && is_consonant(bytes, n - 1)
}

fn ends_cvc(word: &str) -> bool {
    let bytes = word.as_bytes();
    let n = bytes.len();
    let long_form = n >= 3
        && is_consonant(bytes, n - 3)
        && !is_consonant(bytes, n - 2)
        && is_consonant(bytes, n - 1)
        && !matches!(bytes[n - 1], b'w' | b'x' | b'y');
    let short_form = n == 2 && !is_consonant(bytes, 0) && is_consonant(bytes, 1);
    long_form || short_form
}

/// Apply the first rule whose suffix matches; a failed condition stops the step
fn apply_rules(word: String, rules: &[Rule]) -> String {
    for &(suffix, replacement, condition) in rules {
        if let Some(stem) = word.strip_suffix(suffix) {
            if condition.holds(stem) {
                return format!("{}{}", stem, replacement);
            }
            return word;
        }
    }
    word
}

fn step1a(word: String) -> String {
    if word.len() == 4 && word.ends_with("ies") {
        return format!("{}ie", &word[..1]);
    }
    apply_rules(word, STEP1A)
}

fn step1b(word: String) -> String {
    if let Some(stem) = word.strip_suffix("ied") {
        let replacement = if word.len() == 4 { "ie" } else { "i" };
        return format!("{}{}", stem, replacement);
    }
    if let Some(stem) = word.strip_suffix("eed") {
        if measure(stem) > 0 {
            return format!("{}ee", stem);
        }
        return word;
    }

    let found = ["ed", "ing"]
        .iter()
        .find_map(|suffix| word.strip_suffix(suffix).filter(|stem| contains_vowel(stem)))
        .map(str::to_string);
    let mut stem = match found {
        Some(stem) => stem,
        None => return word,
    };

    if stem.ends_with("at") || stem.ends_with("bl") || stem.ends_with("iz") {
        stem.push('e');
    } else if ends_double_consonant(&stem) {
        if !matches!(stem.as_bytes()[stem.len() - 1], b'l' | b's' | b'z') {
            stem.pop();
        }
    } else if measure(&stem) == 1 && ends_cvc(&stem) {
        stem.push('e');
    }
    stem
}

fn step1c(word: String) -> String {
    match word.strip_suffix('y') {
        Some(stem) if stem.len() > 1 && is_consonant(stem.as_bytes(), stem.len() - 1) => {
            format!("{}i", stem)
        }
        _ => word,
    }
}

fn step2(word: String) -> String {
    // `-alli` is reduced first and the result goes through the step again
    if let Some(stem) = word.strip_suffix("alli") {
        if measure(stem) > 0 {
            return step2(format!("{}al", stem));
        }
    }
    apply_rules(word, STEP2)
}

fn step5a(word: String) -> String {
    if let Some(stem) = word.strip_suffix('e') {
        let m = measure(stem);
        if m > 1 || (m == 1 && !ends_cvc(stem)) {
            return stem.to_string();
        }
    }
    word
}

fn step5b(mut word: String) -> String {
    if word.ends_with("ll") && measure(&word[..word.len() - 1]) > 1 {
        word.pop();
    }
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plurals_and_participles() {
        assert_eq!(stem("cats"), "cat");
        assert_eq!(stem("caresses"), "caress");
        assert_eq!(stem("ponies"), "poni");
        assert_eq!(stem("ties"), "tie");
        assert_eq!(stem("running"), "run");
        assert_eq!(stem("hopping"), "hop");
        assert_eq!(stem("falling"), "fall");
        assert_eq!(stem("agreed"), "agre");
        assert_eq!(stem("filing"), "file");
    }

    #[test]
    fn test_ly_forms_keep_li() {
        assert_eq!(stem("fairly"), "fairli");
        assert_eq!(stem("happily"), "happili");
        assert_eq!(stem("fair"), "fair");
    }

    #[test]
    fn test_derivational_suffixes() {
        assert_eq!(stem("relational"), "relat");
        assert_eq!(stem("generalization"), "gener");
        assert_eq!(stem("hopefulness"), "hope");
        assert_eq!(stem("adjustment"), "adjust");
        assert_eq!(stem("adoption"), "adopt");
    }

    #[test]
    fn test_irregular_and_short_words() {
        assert_eq!(stem("dying"), "die");
        assert_eq!(stem("skies"), "sky");
        assert_eq!(stem("news"), "news");
        assert_eq!(stem("is"), "is");
        assert_eq!(stem("Running"), "run");
    }

    #[test]
    fn test_measure() {
        assert_eq!(measure("tr"), 0);
        assert_eq!(measure("tree"), 0);
        assert_eq!(measure("trouble"), 1);
        assert_eq!(measure("oaten"), 2);
    }
}
