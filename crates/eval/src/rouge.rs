//! ROUGE-1, ROUGE-2 and ROUGE-L over lowercased word tokens.

use std::collections::HashMap;
use taleweave_core::ScoreTriple;

/// Lowercase and split on every non-alphanumeric character.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for gram in tokens.windows(n) {
        *counts.entry(gram).or_insert(0) += 1;
    }
    counts
}

fn triple(overlap: usize, candidate_total: usize, reference_total: usize) -> ScoreTriple {
    let ratio = |total: usize| {
        if total == 0 {
            0.0
        } else {
            overlap as f64 / total as f64
        }
    };
    ScoreTriple::from_precision_recall(ratio(candidate_total), ratio(reference_total))
}

/// Clipped n-gram overlap.
pub fn rouge_n(candidate: &[String], reference: &[String], n: usize) -> ScoreTriple {
    let cand = ngram_counts(candidate, n);
    let refs = ngram_counts(reference, n);
    let overlap: usize = cand
        .iter()
        .map(|(gram, count)| (*count).min(refs.get(gram).copied().unwrap_or(0)))
        .sum();
    triple(overlap, cand.values().sum(), refs.values().sum())
}

/// Longest-common-subsequence overlap over the whole token sequences.
pub fn rouge_l(candidate: &[String], reference: &[String]) -> ScoreTriple {
    triple(lcs_len(candidate, reference), candidate.len(), reference.len())
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    for x in a {
        let mut row = vec![0usize; b.len() + 1];
        for (j, y) in b.iter().enumerate() {
            row[j + 1] = if x == y {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        prev = row;
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn tokenize_lowercases_and_drops_punctuation() {
        assert_eq!(toks("Kurt, KÜÇÜK kızı gördü!"), vec!["kurt", "küçük", "kızı", "gördü"]);
        assert!(toks(" ... ").is_empty());
    }

    #[test]
    fn self_match_is_perfect() {
        let t = toks("the wolf waited in the forest for the girl");
        for score in [rouge_n(&t, &t, 1), rouge_n(&t, &t, 2), rouge_l(&t, &t)] {
            assert_eq!(score.f1, 1.0);
            assert_eq!(score.precision, 1.0);
            assert_eq!(score.recall, 1.0);
        }
    }

    #[test]
    fn unigram_counts_are_clipped() {
        let cand = toks("the the the wolf");
        let refs = toks("the wolf ran");
        let s = rouge_n(&cand, &refs, 1);
        assert_eq!(s.precision, 0.5);
        assert!((s.recall - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn bigrams() {
        let s = rouge_n(&toks("a b c d"), &toks("a b x d"), 2);
        // candidate {ab, bc, cd}, reference {ab, bx, xd}
        assert!((s.precision - 1.0 / 3.0).abs() < 1e-12);
        assert!((s.recall - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn lcs_is_order_aware() {
        let s = rouge_l(&toks("a b c d e"), &toks("a c e x"));
        // lcs = a c e
        assert_eq!(s.precision, 0.6);
        assert_eq!(s.recall, 0.75);
    }

    #[test]
    fn empty_side_scores_zero() {
        let t = toks("a b");
        assert_eq!(rouge_n(&t, &[], 1), ScoreTriple::zero());
        assert_eq!(rouge_l(&[], &t), ScoreTriple::zero());
        assert_eq!(rouge_n(&toks("a"), &toks("a"), 2), ScoreTriple::zero());
    }
}
