//! TF-IDF ranking
//!
//! `idf(t) = log10((N + 1) / (df(t) + 1))` and
//! `tf(t, d) = count(t, d) / max(len(d), 1)`; a document scores the sum of
//! `tf * idf` over the query terms it contains.

use crate::schemas::SearchResult;
use docsearch_store::Posting;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Default number of results returned for a query
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Inverse document frequency of a term found in `document_frequency` of
/// `total_documents` documents
pub fn idf(total_documents: i64, document_frequency: usize) -> f64 {
    ((total_documents as f64 + 1.0) / (document_frequency as f64 + 1.0)).log10()
}

/// Frequency of a term within one document
pub fn tf(count: i64, word_count: i64) -> f64 {
    count as f64 / word_count.max(1) as f64
}

/// Rank documents for a query given the postings of each distinct term.
///
/// Results are ordered by descending score, then by name, and truncated to
/// `limit`. Negative or non-finite scores are dropped.
pub fn rank(total_documents: i64, postings_by_term: &[Vec<Posting>], limit: usize) -> Vec<SearchResult> {
    let mut scores: HashMap<i64, (&str, f64)> = HashMap::new();

    for postings in postings_by_term {
        if postings.is_empty() {
            continue;
        }
        let term_idf = idf(total_documents, postings.len());

        for posting in postings {
            let entry = scores
                .entry(posting.doc_id)
                .or_insert((posting.doc_name.as_str(), 0.0));
            entry.1 += tf(posting.count, posting.word_count) * term_idf;
        }
    }

    let mut results: Vec<SearchResult> = scores
        .into_values()
        .filter(|(_, score)| score.is_finite() && *score >= 0.0)
        .map(|(name, score)| SearchResult {
            name: name.to_string(),
            score,
        })
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });
    results.truncate(limit);
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc_id: i64, name: &str, count: i64, word_count: i64) -> Posting {
        Posting {
            doc_id,
            doc_name: name.to_string(),
            count,
            word_count,
        }
    }

    #[test]
    fn test_idf_is_zero_when_every_document_has_the_term() {
        assert_eq!(idf(3, 3), 0.0);
        assert!(idf(3, 1) > 0.0);
    }

    #[test]
    fn test_tf_guards_empty_documents() {
        assert_eq!(tf(2, 4), 0.5);
        assert_eq!(tf(0, 0), 0.0);
    }

    #[test]
    fn test_single_term_ranking() {
        // "rare" appears in two of four documents
        let postings = vec![vec![
            posting(1, "once.txt", 1, 10),
            posting(2, "often.txt", 5, 10),
        ]];

        let results = rank(4, &postings, DEFAULT_RESULT_LIMIT);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "often.txt");
        assert_eq!(results[1].name, "once.txt");

        let expected = 0.5 * (5.0_f64 / 3.0).log10();
        assert!((results[0].score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_scores_sum_over_terms() {
        let postings = vec![
            vec![posting(1, "a.txt", 1, 4), posting(2, "b.txt", 1, 4)],
            vec![posting(1, "a.txt", 1, 4)],
        ];

        let results = rank(3, &postings, DEFAULT_RESULT_LIMIT);
        assert_eq!(results[0].name, "a.txt");

        let shared = 0.25 * idf(3, 2);
        let unique = 0.25 * idf(3, 1);
        assert!((results[0].score - (shared + unique)).abs() < 1e-12);
        assert!((results[1].score - shared).abs() < 1e-12);
    }

    #[test]
    fn test_ties_break_by_name_and_zero_scores_are_kept() {
        let postings = vec![vec![
            posting(2, "zeta.txt", 1, 2),
            posting(1, "alpha.txt", 1, 2),
        ]];

        let results = rank(2, &postings, DEFAULT_RESULT_LIMIT);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "alpha.txt");
        assert_eq!(results[0].score, 0.0);
        assert_eq!(results[1].name, "zeta.txt");
    }

    #[test]
    fn test_limit_truncates() {
        let postings = vec![(1..=15)
            .map(|id| posting(id, &format!("doc{:02}.txt", id), id, 20))
            .collect::<Vec<_>>()];

        let results = rank(30, &postings, 10);
        assert_eq!(results.len(), 10);
        assert_eq!(results[0].name, "doc15.txt");
        assert_eq!(results[9].name, "doc06.txt");
    }

    #[test]
    fn test_no_postings() {
        assert!(rank(5, &[], DEFAULT_RESULT_LIMIT).is_empty());
        assert!(rank(5, &[Vec::new()], DEFAULT_RESULT_LIMIT).is_empty());
    }
}
