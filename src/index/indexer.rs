//! Document indexing pipeline: ties the N-gram splitter, posting
//! accumulator, and persistence bridge together into a single
//! tokenize-accumulate-persist flow, minus ranking and sharding concerns.

use crate::config::IndexConfig;
use crate::error::Result;
use crate::index::ngram::NgramSplitter;
use crate::index::persistence::{BlobStore, PersistenceBridge};
use crate::index::posting::{self, DocumentId, InvertedIndex, Position, QUERY_DOC_ID, TokenIdSource};
use crate::index::text_encoding::{codepoints_to_utf8, utf8_to_codepoints};

/// Drives one document (or one query) through the full tokenize →
/// accumulate → persist pipeline.
pub struct DocumentIndexer<'a, T: TokenIdSource, B: BlobStore> {
    token_service: &'a mut T,
    bridge: PersistenceBridge<'a, B>,
    ngram_n: usize,
}

impl<'a, T: TokenIdSource, B: BlobStore> DocumentIndexer<'a, T, B> {
    pub fn new(token_service: &'a mut T, blob_store: &'a mut B, config: &IndexConfig) -> Self {
        Self {
            token_service,
            bridge: PersistenceBridge::new(blob_store, config.compress),
            ngram_n: config.ngram_n,
        }
    }

    /// Indexes `text` under `doc_id`, merging its contribution into the
    /// persistent blob store. `doc_id` must be non-zero — see
    /// [`posting::QUERY_DOC_ID`].
    ///
    /// Calling this twice with the same `doc_id` double-counts that
    /// document's occurrences; same-document update is not supported (see
    /// DESIGN.md).
    pub fn index_document(&mut self, doc_id: DocumentId, text: &str) -> Result<()> {
        assert_ne!(doc_id, QUERY_DOC_ID, "doc_id 0 is reserved for query mode");

        self.bridge.record_document(doc_id)?;

        let local = self.build_index(doc_id, text, /* keep_tail = */ false)?;
        for (token_id, entry) in local {
            self.bridge.update(token_id, entry.postings)?;
        }
        Ok(())
    }

    /// Builds a transient index from a query string without touching the
    /// blob store. Tail tokens shorter than `ngram_n` are kept.
    pub fn index_query(&mut self, text: &str) -> Result<InvertedIndex> {
        self.build_index(QUERY_DOC_ID, text, /* keep_tail = */ true)
    }

    fn build_index(&mut self, doc_id: DocumentId, text: &str, keep_tail: bool) -> Result<InvertedIndex> {
        let codepoints = utf8_to_codepoints(text);
        let mut local = InvertedIndex::default();

        for (start, len) in NgramSplitter::new(&codepoints, self.ngram_n) {
            if len < self.ngram_n && !keep_tail {
                continue;
            }
            let token_utf8 = codepoints_to_utf8(&codepoints[start..start + len])?;
            posting::add_occurrence(
                &mut local,
                &mut *self.token_service,
                doc_id,
                &token_utf8,
                start as Position,
            )?;
        }

        Ok(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressMode;
    use crate::index::persistence::{MemoryBlobStore, MemoryTokenService};

    #[test]
    fn test_index_document_then_query_shares_tokens() {
        let mut tokens = MemoryTokenService::new();
        let mut blobs = MemoryBlobStore::new();
        let config = IndexConfig::new(2, CompressMode::Golomb);

        {
            let mut indexer = DocumentIndexer::new(&mut tokens, &mut blobs, &config);
            indexer.index_document(1, "ab cd").unwrap();
            indexer.index_document(2, "ab").unwrap();
        }

        let ab_id = tokens.get_token_id(b"ab", QUERY_DOC_ID).unwrap().0;
        let mut bridge = PersistenceBridge::new(&mut blobs, config.compress);
        let (list, docs_count) = bridge.fetch(ab_id).unwrap();
        assert_eq!(docs_count, 2);
        let ids: Vec<_> = list.postings.iter().map(|p| p.document_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_query_mode_keeps_short_tail_token() {
        let mut tokens = MemoryTokenService::new();
        let mut blobs = MemoryBlobStore::new();
        let config = IndexConfig::new(2, CompressMode::None);

        let mut indexer = DocumentIndexer::new(&mut tokens, &mut blobs, &config);
        let query_index = indexer.index_query("ab cd").unwrap();

        // "d" is a length-1 tail token; kept in query mode.
        let d_id = tokens.get_token_id(b"d", QUERY_DOC_ID).unwrap().0;
        assert!(query_index.contains_key(&d_id));
    }

    #[test]
    fn test_index_document_discards_short_tail_token() {
        let mut tokens = MemoryTokenService::new();
        let mut blobs = MemoryBlobStore::new();
        let config = IndexConfig::new(2, CompressMode::None);

        {
            let mut indexer = DocumentIndexer::new(&mut tokens, &mut blobs, &config);
            indexer.index_document(1, "ab cd").unwrap();
        }

        let d_id = tokens.get_token_id(b"d", QUERY_DOC_ID).unwrap().0;
        let mut bridge = PersistenceBridge::new(&mut blobs, config.compress);
        let (list, _) = bridge.fetch(d_id).unwrap();
        assert!(list.postings.is_empty());
    }

    #[test]
    fn test_index_document_bumps_document_count_without_manual_priming() {
        let mut tokens = MemoryTokenService::new();
        let mut blobs = MemoryBlobStore::new();
        let config = IndexConfig::new(2, CompressMode::Golomb);

        {
            let mut indexer = DocumentIndexer::new(&mut tokens, &mut blobs, &config);
            indexer.index_document(1, "ab cd").unwrap();
            indexer.index_document(2, "ab ef").unwrap();
        }

        assert_eq!(blobs.document_count().unwrap(), 2);
    }
}
