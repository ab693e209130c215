//! Longest common subsequence helpers for ROUGE-L

use std::collections::{BTreeSet, HashMap};

/// Dynamic-programming table; `table[i][j]` is the LCS length of
/// `reference[..i]` and `candidate[..j]`
fn lcs_table(reference: &[String], candidate: &[String]) -> Vec<Vec<usize>> {
    let mut table = vec![vec![0usize; candidate.len() + 1]; reference.len() + 1];
    for i in 1..=reference.len() {
        for j in 1..=candidate.len() {
            table[i][j] = if reference[i - 1] == candidate[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }
    table
}

/// Length of the longest common subsequence
pub fn lcs_len(reference: &[String], candidate: &[String]) -> usize {
    lcs_table(reference, candidate)[reference.len()][candidate.len()]
}

/// Indices into `reference` of one longest common subsequence
pub fn lcs_indices(reference: &[String], candidate: &[String]) -> Vec<usize> {
    let table = lcs_table(reference, candidate);
    let (mut i, mut j) = (reference.len(), candidate.len());
    let mut indices = Vec::with_capacity(table[i][j]);

    while i > 0 && j > 0 {
        if reference[i - 1] == candidate[j - 1] {
            indices.push(i - 1);
            i -= 1;
            j -= 1;
        } else if table[i][j - 1] > table[i - 1][j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }

    indices.reverse();
    indices
}

/// Number of union-LCS hits of summary-level ROUGE-L
///
/// For every reference sentence the tokens hit by an LCS against any
/// candidate sentence are pooled. A token type is counted at most as often as
/// it occurs in both texts.
pub fn summary_lcs_hits(reference: &[Vec<String>], candidate: &[Vec<String>]) -> usize {
    let mut reference_budget: HashMap<&str, usize> = HashMap::new();
    for token in reference.iter().flatten() {
        *reference_budget.entry(token.as_str()).or_default() += 1;
    }
    let mut candidate_budget: HashMap<&str, usize> = HashMap::new();
    for token in candidate.iter().flatten() {
        *candidate_budget.entry(token.as_str()).or_default() += 1;
    }

    let mut hits = 0;
    for sentence in reference {
        let union: BTreeSet<usize> = candidate
            .iter()
            .flat_map(|c| lcs_indices(sentence, c))
            .collect();

        for index in union {
            let token = sentence[index].as_str();
            let (Some(r), Some(c)) = (
                reference_budget.get_mut(token),
                candidate_budget.get_mut(token),
            ) else {
                continue;
            };
            if *r > 0 && *c > 0 {
                *r -= 1;
                *c -= 1;
                hits += 1;
            }
        }
    }
    hits
}
