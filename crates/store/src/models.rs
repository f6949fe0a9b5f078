//! Row types for documents and the inverted index

use std::collections::BTreeMap;

/// A stored document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub content: String,
    /// Number of tokens in `content`
    pub word_count: i64,
}

/// A document ready to be written together with its term counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub name: String,
    pub content: String,
    pub word_count: i64,
    pub term_counts: BTreeMap<String, i64>,
}

impl NewDocument {
    /// Build from term counts; `word_count` is their sum so the index and the
    /// document total always agree.
    pub fn new<N, C>(name: N, content: C, term_counts: BTreeMap<String, i64>) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        let word_count = term_counts.values().sum();
        Self {
            name: name.into(),
            content: content.into(),
            word_count,
            term_counts,
        }
    }
}

/// One inverted index hit for a term, joined with its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub doc_id: i64,
    pub doc_name: String,
    /// Occurrences of the term in the document
    pub count: i64,
    pub word_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_is_sum_of_terms() {
        let counts = BTreeMap::from([("hello".to_string(), 2), ("world".to_string(), 1)]);
        let doc = NewDocument::new("greeting.txt", "hello hello world", counts);
        assert_eq!(doc.word_count, 3);
    }
}
