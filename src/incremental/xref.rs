//! Cross-reference section writers for incremental updates.
//!
//! Unlike [`crate::writer::xref::XrefTable`], which always rewrites object 0
//! through the highest object number, these writers describe only the
//! objects an incremental update actually touches, and chain back to the
//! original document's xref via `/Prev`.

use crate::object::{Object, PdfDictionary, PdfStream};
use crate::types::ObjectId;
use crate::writer::Serializer;
use std::io;

/// Which cross-reference format an incremental update should emit.
///
/// PDF readers tolerate either, but writers conventionally continue in
/// whatever format the previous update used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XrefMode {
    /// A traditional `xref` keyword section plus a `trailer` dictionary.
    Table,
    /// A single cross-reference stream object (PDF 1.5+) that carries the
    /// trailer keys in its own dictionary.
    Stream,
}

/// Groups a sorted list of object numbers into contiguous runs, the way a
/// traditional xref table's subsections are written.
fn subsections(entries: &[(ObjectId, u64)]) -> Vec<(u32, u32)> {
    let mut numbers: Vec<u32> = entries.iter().map(|(id, _)| id.number).collect();
    numbers.sort_unstable();

    let mut subs = Vec::new();
    let mut iter = numbers.into_iter();
    let Some(first) = iter.next() else {
        return subs;
    };

    let mut start = first;
    let mut count = 1u32;
    let mut prev = first;

    for num in iter {
        if num == prev + 1 {
            count += 1;
        } else {
            subs.push((start, count));
            start = num;
            count = 1;
        }
        prev = num;
    }
    subs.push((start, count));
    subs
}

/// Writes a traditional, delta-only `xref` table describing only the new
/// and updated objects of this update, followed by a `trailer` dictionary
/// whose `/Prev` points at the original document's last xref section.
///
/// Returns the byte offset the xref section started at (the value to write
/// after `startxref`).
pub fn write_table<W: std::io::Write>(
    serializer: &mut Serializer<W>,
    entries: &[(ObjectId, u64)],
    trailer_dict: &PdfDictionary,
) -> io::Result<u64> {
    let xref_offset = serializer.position();

    serializer.write_str("xref\n")?;

    let mut sorted = entries.to_vec();
    sorted.sort_unstable_by_key(|(id, _)| id.number);
    let runs = subsections(&sorted);

    let mut cursor = 0usize;
    for (start, count) in runs {
        serializer.write_str(&format!("{} {}\n", start, count))?;
        for _ in 0..count {
            let (id, offset) = sorted[cursor];
            serializer.write_str(&format!("{:010} {:05} n \n", offset, id.generation))?;
            cursor += 1;
        }
    }

    serializer.write_str("trailer\n")?;
    serializer.write_str(&trailer_dict.to_pdf_string())?;
    serializer.write_newline()?;

    Ok(xref_offset)
}

/// Builds the body (as a byte vector plus field widths) of an xref stream
/// describing only the new and updated objects of this update.
///
/// Field widths are fixed at `[1, 4, 1]`: a one-byte type, a four-byte
/// big-endian offset, and a one-byte generation. Generation numbers never
/// exceed 255 in documents this library produces (every appended object is
/// generation 0, and rewritten objects keep their original generation).
#[cfg(feature = "compression")]
fn encode_entries(entries: &[(ObjectId, u64)]) -> (Vec<u8>, Vec<(u32, u32)>) {
    let mut sorted = entries.to_vec();
    sorted.sort_unstable_by_key(|(id, _)| id.number);
    let runs = subsections(&sorted);

    let mut data = Vec::with_capacity(sorted.len() * 6);
    let mut cursor = 0usize;
    for (_, count) in &runs {
        for _ in 0..*count {
            let (id, offset) = sorted[cursor];
            data.push(1u8); // type 1: in-use object
            data.extend_from_slice(&(offset as u32).to_be_bytes());
            data.push(id.generation as u8);
            cursor += 1;
        }
    }

    (data, runs)
}

/// Builds a cross-reference stream object for this update.
///
/// `entries` must include the xref stream's own object id with its own
/// (not-yet-known) offset; callers reserve an id up front via
/// `allocate_id`, build the rest of the update, and append this object's
/// own entry once its offset is also known (it offsets itself, which is
/// standard practice for xref streams).
///
/// The row data is flate-compressed with no PNG predictor, matching the
/// baseline `/Filter /FlateDecode` contract every PDF 1.5+ reader accepts.
#[cfg(feature = "compression")]
pub fn build_stream_object(
    self_id: ObjectId,
    entries: &[(ObjectId, u64)],
    trailer_dict: &PdfDictionary,
) -> (ObjectId, Object) {
    let (data, runs) = encode_entries(entries);

    let mut dict = trailer_dict.clone();
    dict.set("Type", Object::Name(crate::object::PdfName::new_unchecked("XRef")));
    dict.set("W", Object::Array(vec![Object::Integer(1), Object::Integer(4), Object::Integer(1)]));

    let index: Vec<Object> = runs
        .iter()
        .flat_map(|(start, count)| vec![Object::Integer(*start as i64), Object::Integer(*count as i64)])
        .collect();
    dict.set("Index", Object::Array(index));

    let stream = PdfStream::with_dictionary(dict, data);
    let stream = stream.with_compression().unwrap_or_else(|_| PdfStream::with_dictionary(trailer_dict.clone(), Vec::new()));
    (self_id, Object::Stream(stream))
}
