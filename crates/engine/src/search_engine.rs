//! Search engine service

use crate::error::{EngineError, EngineResult};
use crate::schemas::{DocumentCreate, DocumentResponse, SearchResult};
use crate::scoring::{self, DEFAULT_RESULT_LIMIT};
use crate::tokenizer::split_to_words;
use docsearch_cache::Cache;
use docsearch_store::{DocumentRepository, NewDocument, Posting, StoreError, StoreResult};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Prefix of every cached result key
pub const SEARCH_CACHE_PREFIX: &str = "search:";

/// Tuning for [`SearchEngine`]
#[derive(Debug, Clone)]
pub struct SearchEngineConfig {
    /// How long ranked results stay cached
    pub cache_ttl: Duration,
    pub result_limit: usize,
}

impl Default for SearchEngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Indexes uploaded documents and answers ranked queries, caching the answers
#[derive(Clone)]
pub struct SearchEngine {
    repository: Arc<dyn DocumentRepository>,
    cache: Cache,
    config: SearchEngineConfig,
    /// Bumped after every committed upload, before the cache flush
    generation: Arc<AtomicU64>,
}

impl SearchEngine {
    pub fn new(repository: Arc<dyn DocumentRepository>, cache: Cache) -> Self {
        Self::with_config(repository, cache, SearchEngineConfig::default())
    }

    pub fn with_config(
        repository: Arc<dyn DocumentRepository>,
        cache: Cache,
        config: SearchEngineConfig,
    ) -> Self {
        Self {
            repository,
            cache,
            config,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn config(&self) -> &SearchEngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Cache key for a normalized query
    pub fn cache_key(normalized_query: &str) -> String {
        format!("{}{}", SEARCH_CACHE_PREFIX, normalized_query)
    }

    /// Check the document store is reachable
    pub async fn ping(&self) -> EngineResult<()> {
        Ok(self.repository.ping().await?)
    }

    /// Validate, tokenize and index a document.
    ///
    /// Returns `Ok(None)` when the content holds no words; nothing is stored
    /// in that case. Every cached search result is dropped after a successful
    /// insert since any ranking may have changed.
    pub async fn add_document(
        &self,
        name: &str,
        content: &str,
    ) -> EngineResult<Option<DocumentResponse>> {
        let payload = DocumentCreate::new(name, content)?;

        let words = split_to_words(&payload.content);
        if words.is_empty() {
            warn!(name = %payload.name, "Document contains no words, skipping indexing");
            return Ok(None);
        }

        let mut term_counts: BTreeMap<String, i64> = BTreeMap::new();
        for word in words {
            *term_counts.entry(word).or_insert(0) += 1;
        }

        let new_document = NewDocument::new(payload.name, payload.content, term_counts);
        let stored = self
            .repository
            .insert_document(new_document)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => EngineError::Conflict(name.to_string()),
                other => EngineError::Store(other),
            })?;

        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Err(e) = self.cache.flush().await {
            warn!("Failed to invalidate search cache after upload: {}", e);
        }

        info!(
            doc_id = stored.id,
            word_count = stored.word_count,
            "Added document '{}'",
            stored.name
        );

        Ok(Some(DocumentResponse::from(stored)))
    }

    /// Rank documents against `query`.
    ///
    /// Storage failures are logged and produce an empty list.
    pub async fn search(&self, query: &str) -> EngineResult<Vec<SearchResult>> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return Ok(Vec::new());
        }

        let key = Self::cache_key(&normalized);
        match self.cache.get::<Vec<SearchResult>>(&key).await {
            Ok(Some(results)) => {
                debug!(query = %normalized, "Search cache hit");
                return Ok(results);
            }
            Ok(None) => debug!(query = %normalized, "Search cache miss"),
            Err(e) => warn!("Search cache read failed for '{}': {}", key, e),
        }

        let terms = distinct_terms(&normalized);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let generation = self.generation.load(Ordering::SeqCst);

        let results = match self.rank(&terms).await {
            Ok(results) => results,
            Err(e) => {
                error!("Search for '{}' failed: {}", normalized, e);
                return Ok(Vec::new());
            }
        };

        if !results.is_empty() {
            self.store_results(&key, &results, generation).await;
        }

        Ok(results)
    }

    /// Cache `results` unless an upload landed after they were read.
    ///
    /// The second check covers an upload whose flush ran between the first
    /// check and the put.
    async fn store_results(&self, key: &str, results: &[SearchResult], generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(key, "Index changed during search, not caching results");
            return;
        }

        if let Err(e) = self.cache.put(key, results, self.config.cache_ttl).await {
            warn!("Failed to cache results for '{}': {}", key, e);
            return;
        }

        if self.generation.load(Ordering::SeqCst) != generation {
            if let Err(e) = self.cache.forget(key).await {
                warn!("Failed to drop stale results for '{}': {}", key, e);
            }
        }
    }

    async fn rank(&self, terms: &[String]) -> StoreResult<Vec<SearchResult>> {
        let total_documents = self.repository.count_documents().await?;
        if total_documents == 0 {
            return Ok(Vec::new());
        }

        let mut postings_by_term: Vec<Vec<Posting>> = Vec::with_capacity(terms.len());
        for term in terms {
            postings_by_term.push(self.repository.postings(term).await?);
        }

        Ok(scoring::rank(
            total_documents,
            &postings_by_term,
            self.config.result_limit,
        ))
    }
}

impl std::fmt::Debug for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchEngine")
            .field("cache", &self.cache)
            .field("config", &self.config)
            .finish()
    }
}

/// Query tokens with repeats removed, first occurrence order kept
fn distinct_terms(query: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    split_to_words(query)
        .into_iter()
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_terms() {
        assert_eq!(
            distinct_terms("rust async rust tokio"),
            vec!["rust", "async", "tokio"]
        );
        assert!(distinct_terms("?!").is_empty());
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(SearchEngine::cache_key("hello world"), "search:hello world");
    }
}
