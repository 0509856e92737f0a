//! The indexing core: tokenization, posting accumulation, and the
//! posting-list codec.

pub mod bitstream;
pub mod golomb;
pub mod indexer;
pub mod ngram;
pub mod persistence;
pub mod posting;
pub mod posting_codec;
pub mod separator;
pub mod text_encoding;
