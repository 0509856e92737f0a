//! Inverted-index core
//!
//! N-gram tokenization, in-memory posting accumulation, and a Golomb-coded
//! posting-list codec, wired together by a document-indexing pipeline.
//!
//! ## Layout
//! - `config`: N-gram width and posting-list compression mode.
//! - `index::separator` / `index::ngram`: tokenization.
//! - `index::posting`: the in-memory inverted index and its accumulation
//!   rules.
//! - `index::bitstream` / `index::golomb` / `index::posting_codec`: the
//!   on-disk posting-list codec.
//! - `index::persistence`: the fetch/merge/store bridge, plus in-memory
//!   reference collaborators for tests.
//! - `index::indexer`: the end-to-end pipeline.

pub mod config;
pub mod index;

mod error;

pub use config::{CompressMode, IndexConfig};
pub use error::{IndexError, Result};

pub use index::bitstream::{BitReader, BitWriter};
pub use index::golomb::Golomb;
pub use index::indexer::DocumentIndexer;
pub use index::persistence::{BlobStore, MemoryBlobStore, MemoryTokenService, PersistenceBridge};
pub use index::posting::{
    add_occurrence, merge, merge_postings, DocumentId, InvertedEntry, InvertedIndex, Position,
    Posting, PostingList, TokenId, TokenIdSource, QUERY_DOC_ID,
};
pub use index::separator::is_separator;
pub use index::text_encoding::{codepoints_to_utf8, utf8_to_codepoints};
