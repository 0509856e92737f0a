//! Posting accumulator: builds and merges in-memory inverted indexes keyed
//! by token id.

use ahash::AHashMap;
use std::cmp::Ordering;

use crate::error::Result;

pub type TokenId = u32;
pub type DocumentId = u32;
pub type Position = u32;

/// Document id 0 is a sentinel meaning "this index is being built from a
/// query, not a real document".
pub const QUERY_DOC_ID: DocumentId = 0;

/// One document's contribution to a token's posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub document_id: DocumentId,
    pub positions: Vec<Position>,
}

/// An ordered sequence of postings, strictly ascending by `document_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingList {
    pub postings: Vec<Posting>,
}

impl PostingList {
    pub fn docs_count(&self) -> u32 {
        self.postings.len() as u32
    }

    pub fn positions_count(&self) -> u32 {
        self.postings.iter().map(|p| p.positions.len() as u32).sum()
    }
}

/// One token's full bookkeeping: its id, the invariant-maintained counts,
/// and its posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertedEntry {
    pub token_id: TokenId,
    pub docs_count: u32,
    pub positions_count: u32,
    pub postings: PostingList,
}

pub type InvertedIndex = AHashMap<TokenId, InvertedEntry>;

/// Something that can intern a token's UTF-8 bytes into a stable id, per the
/// external-collaborator contract in SPEC_FULL.md §6.
pub trait TokenIdSource {
    /// Returns the token's id and, for index-mode lookups, its current
    /// persisted `docs_count`.
    fn get_token_id(&mut self, token_utf8: &[u8], doc_id: DocumentId) -> Result<(TokenId, u32)>;
}

/// Records one occurrence of a token at `position` within `doc_id`,
/// allocating a fresh entry in `index` if this is the token's first
/// occurrence in this accumulation.
pub fn add_occurrence(
    index: &mut InvertedIndex,
    token_service: &mut dyn TokenIdSource,
    doc_id: DocumentId,
    token_utf8: &[u8],
    position: Position,
) -> Result<()> {
    let (token_id, current_docs_count) = token_service.get_token_id(token_utf8, doc_id)?;

    match index.get_mut(&token_id) {
        Some(entry) => {
            let last = entry
                .postings
                .postings
                .last_mut()
                .expect("an existing entry always has at least one posting");
            last.positions.push(position);
            entry.positions_count += 1;
        }
        None => {
            let initial_docs_count = if doc_id != QUERY_DOC_ID { 1 } else { current_docs_count };
            let entry = InvertedEntry {
                token_id,
                docs_count: initial_docs_count,
                positions_count: 1,
                postings: PostingList {
                    postings: vec![Posting {
                        document_id: doc_id,
                        positions: vec![position],
                    }],
                },
            };
            index.insert(token_id, entry);
        }
    }
    Ok(())
}

/// Destructively merges `other` into `base`. `other` is empty on return.
pub fn merge(base: &mut InvertedIndex, other: &mut InvertedIndex) {
    for (token_id, entry) in other.drain() {
        match base.get_mut(&token_id) {
            None => {
                base.insert(token_id, entry);
            }
            Some(existing) => {
                let merged = merge_postings(
                    std::mem::take(&mut existing.postings),
                    entry.postings,
                );
                existing.docs_count += entry.docs_count;
                existing.positions_count += entry.positions_count;
                existing.postings = merged;
            }
        }
    }
}

/// Merges two posting lists, each already sorted ascending by `document_id`,
/// into one sorted list.
///
/// Callers must supply lists with disjoint doc-id domains; a shared
/// `document_id` between `a` and `b` is a programming error (debug-asserted),
/// and is resolved by arbitrarily keeping `a`'s posting and discarding `b`'s.
pub fn merge_postings(a: PostingList, b: PostingList) -> PostingList {
    let mut result = Vec::with_capacity(a.postings.len() + b.postings.len());
    let mut ai = a.postings.into_iter().peekable();
    let mut bi = b.postings.into_iter().peekable();

    loop {
        match (ai.peek(), bi.peek()) {
            (Some(pa), Some(pb)) => match pa.document_id.cmp(&pb.document_id) {
                Ordering::Less => result.push(ai.next().unwrap()),
                Ordering::Greater => result.push(bi.next().unwrap()),
                Ordering::Equal => {
                    debug_assert!(
                        false,
                        "merge_postings called with overlapping document id {}",
                        pa.document_id
                    );
                    result.push(ai.next().unwrap());
                    bi.next();
                }
            },
            (Some(_), None) => result.push(ai.next().unwrap()),
            (None, Some(_)) => result.push(bi.next().unwrap()),
            (None, None) => break,
        }
    }

    PostingList { postings: result }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTokenService {
        next_id: TokenId,
        ids: AHashMap<Vec<u8>, TokenId>,
        docs_count: AHashMap<TokenId, u32>,
    }

    impl StubTokenService {
        fn new() -> Self {
            Self {
                next_id: 1,
                ids: AHashMap::new(),
                docs_count: AHashMap::new(),
            }
        }
    }

    impl TokenIdSource for StubTokenService {
        fn get_token_id(&mut self, token_utf8: &[u8], _doc_id: DocumentId) -> Result<(TokenId, u32)> {
            let id = *self.ids.entry(token_utf8.to_vec()).or_insert_with(|| {
                let id = self.next_id;
                self.next_id += 1;
                id
            });
            Ok((id, *self.docs_count.get(&id).unwrap_or(&0)))
        }
    }

    #[test]
    fn test_add_occurrence_new_and_repeat() {
        let mut index = InvertedIndex::default();
        let mut svc = StubTokenService::new();

        add_occurrence(&mut index, &mut svc, 1, b"ab", 0).unwrap();
        add_occurrence(&mut index, &mut svc, 1, b"ab", 5).unwrap();

        let entry = index.values().next().unwrap();
        assert_eq!(entry.docs_count, 1);
        assert_eq!(entry.positions_count, 2);
        assert_eq!(entry.postings.postings.len(), 1);
        assert_eq!(entry.postings.postings[0].positions, vec![0, 5]);
    }

    #[test]
    fn test_merge_persistent_and_transient() {
        // SPEC_FULL.md §8 scenario 4.
        let persistent = PostingList {
            postings: vec![
                Posting { document_id: 1, positions: vec![0] },
                Posting { document_id: 5, positions: vec![2] },
            ],
        };
        let transient = PostingList {
            postings: vec![Posting { document_id: 3, positions: vec![1] }],
        };

        let merged = merge_postings(persistent, transient);
        let ids: Vec<_> = merged.postings.iter().map(|p| p.document_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
        assert_eq!(merged.docs_count(), 3);
    }

    #[test]
    fn test_merge_index_sums_docs_count() {
        let mut base = InvertedIndex::default();
        base.insert(
            1,
            InvertedEntry {
                token_id: 1,
                docs_count: 1,
                positions_count: 1,
                postings: PostingList {
                    postings: vec![Posting { document_id: 1, positions: vec![0] }],
                },
            },
        );

        let mut other = InvertedIndex::default();
        other.insert(
            1,
            InvertedEntry {
                token_id: 1,
                docs_count: 1,
                positions_count: 1,
                postings: PostingList {
                    postings: vec![Posting { document_id: 2, positions: vec![4] }],
                },
            },
        );

        merge(&mut base, &mut other);
        assert!(other.is_empty());

        let entry = &base[&1];
        assert_eq!(entry.docs_count, 2);
        assert_eq!(entry.postings.postings.len(), 2);
    }

    #[test]
    fn test_merge_postings_ascending() {
        let a = PostingList {
            postings: vec![
                Posting { document_id: 2, positions: vec![0] },
                Posting { document_id: 4, positions: vec![0] },
            ],
        };
        let b = PostingList {
            postings: vec![
                Posting { document_id: 1, positions: vec![0] },
                Posting { document_id: 3, positions: vec![0] },
            ],
        };
        let merged = merge_postings(a, b);
        let ids: Vec<_> = merged.postings.iter().map(|p| p.document_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }
}
