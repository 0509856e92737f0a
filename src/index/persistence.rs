//! Persistence bridge: fetch/merge/store of encoded posting blobs by token
//! id, plus in-memory reference implementations of the token-service and
//! blob-store collaborators named in SPEC_FULL.md §6.

use std::collections::HashMap;

use crate::config::CompressMode;
use crate::error::Result;
use crate::index::posting::{
    merge_postings, DocumentId, PostingList, TokenId, TokenIdSource, QUERY_DOC_ID,
};
use crate::index::posting_codec;

/// The blob-store half of the external interfaces in SPEC_FULL.md §6.
pub trait BlobStore {
    /// Returns the stored `docs_count` header and the raw encoded blob for
    /// `token_id`. An unseen token returns `(0, vec![])`.
    fn get_postings(&mut self, token_id: TokenId) -> Result<(u32, Vec<u8>)>;

    /// Atomically replaces the blob for `token_id`.
    fn put_postings(&mut self, token_id: TokenId, docs_count: u32, bytes: Vec<u8>) -> Result<()>;

    /// Total number of distinct documents indexed so far, used to derive
    /// `m_doc` at encode time.
    fn document_count(&self) -> Result<u32>;

    /// Registers `doc_id` as indexed, so `document_count` reflects it.
    /// Called once per document by the indexing pipeline; must be
    /// idempotent (indexing the same `doc_id` twice must not double count).
    fn record_document(&mut self, doc_id: DocumentId) -> Result<()>;
}

/// Loads the old blob for a token, merges it with a freshly built list, and
/// writes the result back.
pub struct PersistenceBridge<'a, B: BlobStore> {
    blob_store: &'a mut B,
    compress: CompressMode,
}

impl<'a, B: BlobStore> PersistenceBridge<'a, B> {
    pub fn new(blob_store: &'a mut B, compress: CompressMode) -> Self {
        Self { blob_store, compress }
    }

    /// Loads and decodes the current posting list for `token_id`.
    pub fn fetch(&mut self, token_id: TokenId) -> Result<(PostingList, u32)> {
        let (docs_count, bytes) = self.blob_store.get_postings(token_id)?;
        if bytes.is_empty() {
            return Ok((PostingList::default(), 0));
        }
        let list = posting_codec::decode(&bytes, self.compress)?;
        Ok((list, docs_count))
    }

    /// Registers `doc_id` as indexed with the underlying blob store. Called
    /// once per document by [`crate::index::indexer::DocumentIndexer`],
    /// before any per-token `update` for that document.
    pub fn record_document(&mut self, doc_id: DocumentId) -> Result<()> {
        self.blob_store.record_document(doc_id)
    }

    /// Merges `contribution` into the persisted list for `token_id` and
    /// stores the result. If the fetch fails, the update is abandoned and
    /// logged rather than propagated (SPEC_FULL.md §4.7).
    pub fn update(&mut self, token_id: TokenId, contribution: PostingList) -> Result<()> {
        let old = match self.fetch(token_id) {
            Ok((list, _docs_count)) => list,
            Err(err) => {
                eprintln!("persistence bridge: fetch failed for token {token_id}: {err} — update skipped");
                return Ok(());
            }
        };

        let merged = merge_postings(old, contribution);
        let docs_count = merged.docs_count();
        let total_documents = self.blob_store.document_count()?;
        let bytes = posting_codec::encode(&merged, self.compress, total_documents)?;
        self.blob_store.put_postings(token_id, docs_count, bytes)?;
        Ok(())
    }
}

/// In-memory reference [`TokenIdSource`], grounded on `ChunkedDictionary`'s
/// lookup-or-allocate pattern, stripped of on-disk chunking and LRU caching
/// (storage-engine internals are out of scope here).
///
/// Tracks each token's own `docs_count` internally: `get_token_id` bumps it
/// at most once per distinct `doc_id`, so repeated occurrences of the same
/// token within one document don't inflate the count (SPEC_FULL.md §6:
/// `doc_id = 0` means "lookup only, do not increment stored doc count").
#[derive(Default)]
pub struct MemoryTokenService {
    ids: HashMap<Vec<u8>, TokenId>,
    next_id: TokenId,
    docs_count: HashMap<TokenId, u32>,
    last_doc_seen: HashMap<TokenId, DocumentId>,
}

impl MemoryTokenService {
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            next_id: 1, // token id 0 is reserved for "none"
            docs_count: HashMap::new(),
            last_doc_seen: HashMap::new(),
        }
    }
}

impl TokenIdSource for MemoryTokenService {
    fn get_token_id(&mut self, token_utf8: &[u8], doc_id: DocumentId) -> Result<(TokenId, u32)> {
        let id = match self.ids.get(token_utf8) {
            Some(&id) => id,
            None => {
                let id = self.next_id;
                self.next_id += 1;
                self.ids.insert(token_utf8.to_vec(), id);
                id
            }
        };

        if doc_id != QUERY_DOC_ID && self.last_doc_seen.get(&id) != Some(&doc_id) {
            *self.docs_count.entry(id).or_insert(0) += 1;
            self.last_doc_seen.insert(id, doc_id);
        }

        Ok((id, *self.docs_count.get(&id).unwrap_or(&0)))
    }
}

/// In-memory reference [`BlobStore`], stripped of compaction/compression/
/// checksumming.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: HashMap<TokenId, (u32, Vec<u8>)>,
    seen_documents: std::collections::HashSet<DocumentId>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn get_postings(&mut self, token_id: TokenId) -> Result<(u32, Vec<u8>)> {
        Ok(self.blobs.get(&token_id).cloned().unwrap_or((0, Vec::new())))
    }

    fn put_postings(&mut self, token_id: TokenId, docs_count: u32, bytes: Vec<u8>) -> Result<()> {
        self.blobs.insert(token_id, (docs_count, bytes));
        Ok(())
    }

    fn document_count(&self) -> Result<u32> {
        Ok(self.seen_documents.len() as u32)
    }

    fn record_document(&mut self, doc_id: DocumentId) -> Result<()> {
        self.seen_documents.insert(doc_id);
        Ok(())
    }
}
