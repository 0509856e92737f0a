//! Posting-list codec: encode/decode a [`PostingList`] to/from a compact byte
//! stream, either raw (uncompressed) or Golomb-coded.

use crate::config::CompressMode;
use crate::error::{IndexError, Result};
use crate::index::bitstream::{BitReader, BitWriter};
use crate::index::golomb::Golomb;
use crate::index::posting::{Posting, PostingList};

/// Encodes `list` per `mode`. `total_documents_in_corpus` is only consulted
/// by the Golomb mode, to derive `m_doc`.
pub fn encode(list: &PostingList, mode: CompressMode, total_documents_in_corpus: u32) -> Result<Vec<u8>> {
    match mode {
        CompressMode::None => Ok(raw::encode(list)),
        CompressMode::Golomb => golomb_codec::encode(list, total_documents_in_corpus),
    }
}

/// Decodes a blob produced by [`encode`] with the same `mode`.
pub fn decode(bytes: &[u8], mode: CompressMode) -> Result<PostingList> {
    match mode {
        CompressMode::None => raw::decode(bytes),
        CompressMode::Golomb => golomb_codec::decode(bytes),
    }
}

mod raw {
    use super::*;

    /// `(document_id: i32, positions_count: i32, positions: i32[...])*`,
    /// concatenated; the blob ends when the byte input is consumed.
    pub fn encode(list: &PostingList) -> Vec<u8> {
        let mut buf = Vec::new();
        for p in &list.postings {
            buf.extend_from_slice(&(p.document_id as i32).to_ne_bytes());
            buf.extend_from_slice(&(p.positions.len() as i32).to_ne_bytes());
            for &pos in &p.positions {
                buf.extend_from_slice(&(pos as i32).to_ne_bytes());
            }
        }
        buf
    }

    pub fn decode(bytes: &[u8]) -> Result<PostingList> {
        let mut postings = Vec::new();
        let mut offset = 0usize;

        while offset < bytes.len() {
            let doc_id = read_i32(bytes, &mut offset)?;
            let count = read_i32(bytes, &mut offset)?;
            if count < 0 {
                return Err(IndexError::DecodeCorrupt("negative positions_count".into()));
            }
            let count = count as usize;
            let mut positions = Vec::with_capacity(count);
            for _ in 0..count {
                positions.push(read_i32(bytes, &mut offset)? as u32);
            }
            postings.push(Posting {
                document_id: doc_id as u32,
                positions,
            });
        }

        Ok(PostingList { postings })
    }

    fn read_i32(bytes: &[u8], offset: &mut usize) -> Result<i32> {
        if *offset + 4 > bytes.len() {
            return Err(IndexError::DecodeCorrupt(
                "truncated raw posting-list blob".into(),
            ));
        }
        let v = i32::from_ne_bytes(bytes[*offset..*offset + 4].try_into().unwrap());
        *offset += 4;
        Ok(v)
    }
}

mod golomb_codec {
    use super::*;

    pub fn encode(list: &PostingList, total_documents_in_corpus: u32) -> Result<Vec<u8>> {
        let docs_count = list.docs_count();
        let mut buf = Vec::new();
        buf.extend_from_slice(&(docs_count as i32).to_ne_bytes());

        if docs_count > 0 {
            let m_doc = (total_documents_in_corpus / docs_count).max(1);
            buf.extend_from_slice(&(m_doc as i32).to_ne_bytes());

            let g = Golomb::new(m_doc);
            let mut w = BitWriter::new();
            let mut prev: i64 = 0;
            for (i, p) in list.postings.iter().enumerate() {
                let gap = if i == 0 {
                    p.document_id as i64 - 1
                } else {
                    p.document_id as i64 - prev - 1
                };
                if gap < 0 {
                    return Err(IndexError::InvalidData(
                        "posting list is not strictly ascending by document_id".into(),
                    ));
                }
                g.encode(gap as u32, &mut w);
                prev = p.document_id as i64;
            }
            buf.extend_from_slice(&w.into_bytes());
        }

        for p in &list.postings {
            let cnt = p.positions.len() as u32;
            buf.extend_from_slice(&(cnt as i32).to_ne_bytes());

            if cnt > 0 {
                let last_position = *p.positions.last().unwrap();
                let m_pos = ((last_position + 1) / cnt).max(1);
                buf.extend_from_slice(&(m_pos as i32).to_ne_bytes());

                let g = Golomb::new(m_pos);
                let mut w = BitWriter::new();
                let mut prev: i64 = -1;
                for &pos in &p.positions {
                    let gap = pos as i64 - prev - 1;
                    if gap < 0 {
                        return Err(IndexError::InvalidData(
                            "posting positions are not strictly ascending".into(),
                        ));
                    }
                    g.encode(gap as u32, &mut w);
                    prev = pos as i64;
                }
                buf.extend_from_slice(&w.into_bytes());
            }
        }

        Ok(buf)
    }

    pub fn decode(bytes: &[u8]) -> Result<PostingList> {
        let mut r = BitReader::new(bytes);

        let docs_count = r.read_i32_ne()?;
        if docs_count < 0 {
            return Err(IndexError::DecodeCorrupt("negative docs_count".into()));
        }
        let docs_count = docs_count as u32;

        let mut doc_ids = Vec::with_capacity(docs_count as usize);
        if docs_count > 0 {
            let m_doc = r.read_i32_ne()?;
            if m_doc <= 0 {
                return Err(IndexError::DecodeCorrupt("invalid m_doc".into()));
            }
            let g = Golomb::new(m_doc as u32);
            let mut prev: i64 = 0;
            for _ in 0..docs_count {
                let gap = g.decode(&mut r)? as i64;
                let doc_id = if doc_ids.is_empty() { gap + 1 } else { prev + gap + 1 };
                doc_ids.push(doc_id as u32);
                prev = doc_id;
            }
            r.align_to_byte();
        }

        let mut postings = Vec::with_capacity(doc_ids.len());
        for &doc_id in &doc_ids {
            let cnt = r.read_i32_ne()?;
            if cnt < 0 {
                return Err(IndexError::DecodeCorrupt("negative positions_count".into()));
            }
            let cnt = cnt as u32;

            let mut positions = Vec::with_capacity(cnt as usize);
            if cnt > 0 {
                let m_pos = r.read_i32_ne()?;
                if m_pos <= 0 {
                    return Err(IndexError::DecodeCorrupt("invalid m_pos".into()));
                }
                let g = Golomb::new(m_pos as u32);
                let mut prev: i64 = -1;
                for _ in 0..cnt {
                    let gap = g.decode(&mut r)? as i64;
                    let pos = prev + gap + 1;
                    positions.push(pos as u32);
                    prev = pos;
                }
                r.align_to_byte();
            }

            postings.push(Posting { document_id: doc_id, positions });
        }

        if postings.len() as u32 != docs_count {
            return Err(IndexError::DecodeCorrupt(format!(
                "posting list decode error: header docs_count={docs_count} but decoded {} entries",
                postings.len()
            )));
        }

        Ok(PostingList { postings })
    }
}
