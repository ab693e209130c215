//! ROUGE overlap scoring
//!
//! Implements ROUGE-1, ROUGE-2 and both flavours of ROUGE-L:
//! - `rougeL`: sentence level, newlines are ignored
//! - `rougeLsum`: summary level, newlines separate sentences
//!
//! Scores follow Google Research's `rouge_score` package (lowercased
//! alphanumeric tokens, optional stemming of tokens longer than three
//! characters).

mod lcs;
mod porter;
mod tokenize;

pub use porter::stem;
pub use tokenize::tokenize;

use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Which overlap statistic to compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RougeType {
    /// Unigram overlap
    Rouge1,
    /// Bigram overlap
    Rouge2,
    /// Sentence-level longest common subsequence
    RougeL,
    /// Summary-level longest common subsequence
    RougeLsum,
}

impl RougeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RougeType::Rouge1 => "rouge1",
            RougeType::Rouge2 => "rouge2",
            RougeType::RougeL => "rougeL",
            RougeType::RougeLsum => "rougeLsum",
        }
    }
}

impl fmt::Display for RougeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RougeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rouge1" => Ok(RougeType::Rouge1),
            "rouge2" => Ok(RougeType::Rouge2),
            "rougeL" => Ok(RougeType::RougeL),
            "rougeLsum" => Ok(RougeType::RougeLsum),
            other => Err(Error::InvalidConfiguration(format!(
                "Unknown ROUGE type: {} (expected rouge1, rouge2, rougeL or rougeLsum)",
                other
            ))),
        }
    }
}

/// Precision, recall and F-measure of one comparison
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub precision: f64,
    pub recall: f64,
    pub fmeasure: f64,
}

impl Score {
    fn new(precision: f64, recall: f64) -> Self {
        let fmeasure = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Score {
            precision,
            recall,
            fmeasure,
        }
    }
}

/// Scores text pairs for one [`RougeType`]
pub struct RougeScorer {
    rouge_type: RougeType,
    use_stemmer: bool,
}

impl RougeScorer {
    pub fn new(rouge_type: RougeType, use_stemmer: bool) -> Self {
        RougeScorer {
            rouge_type,
            use_stemmer,
        }
    }

    pub fn rouge_type(&self) -> RougeType {
        self.rouge_type
    }

    /// Compare `prediction` against `target`
    ///
    /// Precision is relative to the prediction and recall to the target; the
    /// F-measure is symmetric.
    pub fn score(&self, target: &str, prediction: &str) -> Score {
        match self.rouge_type {
            RougeType::Rouge1 => self.score_ngrams(target, prediction, 1),
            RougeType::Rouge2 => self.score_ngrams(target, prediction, 2),
            RougeType::RougeL => {
                let target = self.tokens(target);
                let prediction = self.tokens(prediction);
                if target.is_empty() || prediction.is_empty() {
                    return Score::default();
                }
                let lcs = lcs::lcs_len(&target, &prediction) as f64;
                Score::new(lcs / prediction.len() as f64, lcs / target.len() as f64)
            }
            RougeType::RougeLsum => {
                let target = self.sentences(target);
                let prediction = self.sentences(prediction);
                let target_len: usize = target.iter().map(Vec::len).sum();
                let prediction_len: usize = prediction.iter().map(Vec::len).sum();
                if target_len == 0 || prediction_len == 0 {
                    return Score::default();
                }
                let hits = lcs::summary_lcs_hits(&target, &prediction) as f64;
                Score::new(hits / prediction_len as f64, hits / target_len as f64)
            }
        }
    }

    fn tokens(&self, text: &str) -> Vec<String> {
        tokenize(text, self.use_stemmer)
    }

    fn sentences(&self, text: &str) -> Vec<Vec<String>> {
        text.split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| self.tokens(line))
            .collect()
    }

    fn score_ngrams(&self, target: &str, prediction: &str, n: usize) -> Score {
        let target = self.tokens(target);
        let prediction = self.tokens(prediction);
        let target_ngrams = ngram_counts(&target, n);
        let prediction_ngrams = ngram_counts(&prediction, n);

        let intersection: usize = target_ngrams
            .iter()
            .map(|(ngram, &count)| count.min(prediction_ngrams.get(ngram).copied().unwrap_or(0)))
            .sum();
        let target_total: usize = target_ngrams.values().sum();
        let prediction_total: usize = prediction_ngrams.values().sum();

        Score::new(
            intersection as f64 / prediction_total.max(1) as f64,
            intersection as f64 / target_total.max(1) as f64,
        )
    }
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 {
        return counts;
    }
    for ngram in tokens.windows(n) {
        *counts.entry(ngram).or_insert(0) += 1;
    }
    counts
}

/// F-measure of each generated/reference pair
pub fn pairwise_fmeasure(
    rouge_type: RougeType,
    generated_outputs: &[String],
    reference_outputs: &[String],
) -> Vec<f64> {
    let scorer = RougeScorer::new(rouge_type, true);
    generated_outputs
        .iter()
        .zip(reference_outputs)
        .map(|(generated, reference)| scorer.score(generated, reference).fmeasure)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f1(rouge_type: RougeType, a: &str, b: &str) -> f64 {
        RougeScorer::new(rouge_type, true).score(a, b).fmeasure
    }

    #[test]
    fn test_rouge_type_names() {
        for name in ["rouge1", "rouge2", "rougeL", "rougeLsum"] {
            assert_eq!(name.parse::<RougeType>().unwrap().as_str(), name);
        }
        let err = "rouge3".parse::<RougeType>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn test_identical_text_scores_one() {
        let text = "The quick brown fox jumps over the lazy dog";
        for rouge_type in [
            RougeType::Rouge1,
            RougeType::Rouge2,
            RougeType::RougeL,
            RougeType::RougeLsum,
        ] {
            assert_eq!(f1(rouge_type, text, text), 1.0, "{rouge_type}");
        }
    }

    #[test]
    fn test_disjoint_vocabulary_scores_zero() {
        let a = "apples and oranges";
        let b = "trains leave stations";
        assert_eq!(f1(RougeType::Rouge1, a, b), 0.0);
        assert_eq!(f1(RougeType::Rouge2, a, b), 0.0);
        assert_eq!(f1(RougeType::RougeLsum, a, b), 0.0);
    }

    #[test]
    fn test_rouge1_partial_overlap() {
        // 5 of 6 tokens shared in each direction
        let score = RougeScorer::new(RougeType::Rouge1, false)
            .score("the cat sat on the mat", "the cat sat on a mat");
        assert!((score.precision - 5.0 / 6.0).abs() < 1e-12);
        assert!((score.recall - 5.0 / 6.0).abs() < 1e-12);
        assert!((score.fmeasure - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_rouge2_counts_bigrams() {
        // target bigrams: [the cat] [cat sat]; prediction: [the cat] [cat ran]
        let score = RougeScorer::new(RougeType::Rouge2, false).score("the cat sat", "the cat ran");
        assert!((score.fmeasure - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_stemming_matches_inflections() {
        assert_eq!(f1(RougeType::Rouge1, "cats running", "cat runs"), 1.0);
        let unstemmed = RougeScorer::new(RougeType::Rouge1, false)
            .score("cats running", "cat runs")
            .fmeasure;
        assert_eq!(unstemmed, 0.0);
    }

    #[test]
    fn test_ly_adverbs_do_not_collapse_to_adjectives() {
        assert_eq!(f1(RougeType::Rouge1, "fairly", "fair"), 0.0);
        assert_eq!(f1(RougeType::Rouge1, "happily", "happily"), 1.0);
    }

    #[test]
    fn test_precision_and_recall_directions() {
        let score = RougeScorer::new(RougeType::Rouge1, false).score("a b c d", "a b");
        assert_eq!(score.precision, 1.0);
        assert_eq!(score.recall, 0.5);
    }

    #[test]
    fn test_empty_text_scores_zero() {
        for rouge_type in [
            RougeType::Rouge1,
            RougeType::Rouge2,
            RougeType::RougeL,
            RougeType::RougeLsum,
        ] {
            assert_eq!(f1(rouge_type, "", "some words"), 0.0);
            assert_eq!(f1(rouge_type, "", ""), 0.0);
        }
    }

    #[test]
    fn test_summary_level_treats_newlines_as_boundaries() {
        let generated = "the cat sat on the mat\nthe dog ate my homework";
        let reference = "the dog ate my homework\nthe cat sat on the mat";

        assert_eq!(f1(RougeType::RougeLsum, generated, reference), 1.0);
        assert!(f1(RougeType::RougeL, generated, reference) < 1.0);
    }

    #[test]
    fn test_summary_level_ignores_blank_lines() {
        let generated = "first line here\n\nsecond line here\n";
        let reference = "first line here\nsecond line here";
        assert_eq!(f1(RougeType::RougeLsum, generated, reference), 1.0);
    }

    #[test]
    fn test_pairwise_fmeasure_bounds() {
        let generated = vec![
            "a b c".to_string(),
            "the weather is nice today".to_string(),
            String::new(),
        ];
        let reference = vec![
            "c b a".to_string(),
            "today the weather was nice".to_string(),
            "x".to_string(),
        ];
        for rouge_type in [RougeType::Rouge1, RougeType::Rouge2, RougeType::RougeLsum] {
            let scores = pairwise_fmeasure(rouge_type, &generated, &reference);
            assert_eq!(scores.len(), 3);
            assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));
        }
    }
}
