//! Incremental update support for appending new PDF objects to an existing
//! document without touching any of its original bytes.
//!
//! A PDF incremental update works by copying the original file verbatim,
//! appending new indirect objects after it, then appending a new
//! cross-reference section that describes only the new/updated objects and
//! a new trailer whose `/Prev` chains back to the original file's last xref
//! section. Every signing operation in this crate is built as one
//! incremental update.

mod xref;

pub use xref::XrefMode;

use crate::error::PdfError;
use crate::object::{Object, PdfDictionary};
use crate::types::ObjectId;
use crate::writer::Serializer;
use std::io::{self, Write};

/// Facts about the existing document an incremental update is appended to,
/// gathered by inspecting its trailer and xref chain.
#[derive(Debug, Clone)]
pub struct OriginalDocument {
    /// Length of the original file in bytes; new objects start here.
    pub length: u64,
    /// Byte offset of the original file's most recent xref section, used as
    /// this update's `/Prev`.
    pub prev_xref_offset: u64,
    /// Highest object number already in use in the original document.
    pub max_object_number: u32,
    /// The `/Root` reference from the original trailer.
    pub root: ObjectId,
    /// The `/ID` pair from the original trailer, if present.
    pub id: Option<(Vec<u8>, Vec<u8>)>,
    /// Whether the original document's xref chain ends in a cross-reference
    /// stream rather than a traditional table.
    pub xref_is_stream: bool,
}

impl OriginalDocument {
    /// Inspects an existing PDF and extracts what an incremental update
    /// needs to know in order to append to it safely.
    #[cfg(feature = "parser")]
    pub fn inspect(data: &[u8]) -> Result<Self, PdfError> {
        use crate::parser::PdfReader;

        let reader = PdfReader::from_bytes(data.to_vec())?;
        let trailer = reader.trailer();
        let max_object_number = reader
            .xref()
            .iter()
            .map(|(num, _)| *num)
            .max()
            .unwrap_or(0);

        Ok(Self {
            length: reader.len(),
            prev_xref_offset: reader.xref_offset(),
            max_object_number,
            root: trailer.root,
            id: trailer.id.clone(),
            xref_is_stream: reader.xref_is_stream(),
        })
    }
}

/// Appends new indirect objects and a closing incremental xref/trailer
/// section to a byte buffer that already holds an existing PDF.
///
/// Object numbers are allocated starting one above
/// [`OriginalDocument::max_object_number`], matching the rule that an
/// incremental update must never reuse or renumber an existing object
/// unless it intends to replace it (e.g. the catalog, when `/AcroForm` is
/// added).
pub struct IncrementalWriter {
    buffer: Vec<u8>,
    serializer_position: u64,
    original: OriginalDocument,
    next_object_number: u32,
    new_offsets: Vec<(ObjectId, u64)>,
}

impl IncrementalWriter {
    /// Starts a new incremental update over the given original document
    /// bytes. The bytes are copied verbatim into the output buffer; nothing
    /// before `original.length` is ever touched again.
    pub fn new(original_bytes: &[u8], original: OriginalDocument) -> Self {
        let mut buffer = Vec::with_capacity(original_bytes.len() + 4096);
        buffer.extend_from_slice(original_bytes);
        let position = buffer.len() as u64;

        Self {
            buffer,
            serializer_position: position,
            next_object_number: original.max_object_number + 1,
            new_offsets: Vec::new(),
            original,
        }
    }

    /// Allocates a fresh object number for a new object.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId::new(self.next_object_number);
        self.next_object_number += 1;
        id
    }

    /// Returns the object number that will be used to replace the original
    /// document's catalog, when the catalog itself needs new or changed
    /// keys (e.g. `/AcroForm`). Rewriting the catalog as a new object with
    /// the SAME object number and an incremented generation is also valid;
    /// this crate instead always writes the catalog as a brand new object
    /// number, which every reader accepts and is simpler to get right.
    pub fn next_object_number(&self) -> u32 {
        self.next_object_number
    }

    /// Writes a new indirect object, recording its offset for the closing
    /// xref section. Returns the offset the object was written at.
    pub fn write_object(&mut self, id: ObjectId, object: &Object) -> io::Result<u64> {
        let mut serializer = Serializer::new_at(&mut self.buffer, self.serializer_position);
        let offset = serializer.write_object(id, object)?;
        self.serializer_position = serializer.position();
        self.new_offsets.push((id, offset));
        Ok(offset)
    }

    /// Writes a new indirect object whose body is already-serialized PDF
    /// text rather than a typed [`Object`].
    ///
    /// Used for the signature dictionary, whose `/ByteRange` and `/Contents`
    /// entries must be literal, fixed-width placeholder text (later patched
    /// in place without changing the file's length) that `Object::Array` and
    /// `Object::String` have no way of producing. Framing matches
    /// [`Self::write_object`] exactly, so the two are interchangeable from a
    /// reader's point of view.
    pub fn write_raw_object(&mut self, id: ObjectId, body: &str) -> io::Result<u64> {
        let mut serializer = Serializer::new_at(&mut self.buffer, self.serializer_position);
        let offset = serializer.position();
        serializer.write_str(&format!("{} {} obj\n", id.number, id.generation))?;
        serializer.write_str(body)?;
        serializer.write_newline()?;
        serializer.write_str("endobj\n")?;
        self.serializer_position = serializer.position();
        self.new_offsets.push((id, offset));
        Ok(offset)
    }

    /// Current write position, i.e. where the next appended object (or the
    /// closing xref section) will start.
    pub fn position(&self) -> u64 {
        self.serializer_position
    }

    /// Writes the closing incremental xref/trailer section (traditional
    /// table form) and returns the finished byte buffer.
    pub fn finish_with_table(mut self, info: Option<ObjectId>, new_root: Option<ObjectId>) -> io::Result<Vec<u8>> {
        let mut trailer = PdfDictionary::new();
        trailer.set("Size", Object::Integer(self.next_object_number as i64));
        trailer.set(
            "Root",
            Object::Reference(new_root.unwrap_or(self.original.root)),
        );
        if let Some(info_id) = info {
            trailer.set("Info", Object::Reference(info_id));
        }
        if let Some((id1, id2)) = &self.original.id {
            trailer.set(
                "ID",
                Object::Array(vec![
                    Object::String(crate::object::PdfString::hex(id1.clone())),
                    Object::String(crate::object::PdfString::hex(id2.clone())),
                ]),
            );
        }
        trailer.set("Prev", Object::Integer(self.original.prev_xref_offset as i64));

        let mut serializer = Serializer::new_at(&mut self.buffer, self.serializer_position);
        let xref_offset = xref::write_table(&mut serializer, &self.new_offsets, &trailer)?;
        serializer.write_startxref(xref_offset)?;
        self.serializer_position = serializer.position();

        Ok(self.buffer)
    }

    /// Writes the closing incremental xref section as a cross-reference
    /// stream object and returns the finished byte buffer.
    #[cfg(feature = "compression")]
    pub fn finish_with_stream(mut self, info: Option<ObjectId>, new_root: Option<ObjectId>) -> io::Result<Vec<u8>> {
        let self_id = self.allocate_id();

        let mut trailer = PdfDictionary::new();
        trailer.set("Size", Object::Integer(self.next_object_number as i64));
        trailer.set(
            "Root",
            Object::Reference(new_root.unwrap_or(self.original.root)),
        );
        if let Some(info_id) = info {
            trailer.set("Info", Object::Reference(info_id));
        }
        if let Some((id1, id2)) = &self.original.id {
            trailer.set(
                "ID",
                Object::Array(vec![
                    Object::String(crate::object::PdfString::hex(id1.clone())),
                    Object::String(crate::object::PdfString::hex(id2.clone())),
                ]),
            );
        }
        trailer.set("Prev", Object::Integer(self.original.prev_xref_offset as i64));

        let xref_offset = self.serializer_position;
        let mut entries = self.new_offsets.clone();
        entries.push((self_id, xref_offset));

        let (_, stream_obj) = xref::build_stream_object(self_id, &entries, &trailer);

        let mut serializer = Serializer::new_at(&mut self.buffer, self.serializer_position);
        serializer.write_object(self_id, &stream_obj)?;
        serializer.write_startxref(xref_offset)?;
        self.serializer_position = serializer.position();

        Ok(self.buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::PdfName;

    fn fake_original() -> OriginalDocument {
        OriginalDocument {
            length: 100,
            prev_xref_offset: 50,
            max_object_number: 4,
            root: ObjectId::new(1),
            id: Some((vec![1, 2, 3], vec![4, 5, 6])),
            xref_is_stream: false,
        }
    }

    #[test]
    fn test_allocate_id_starts_above_original() {
        let bytes = vec![b'%'; 100];
        let mut writer = IncrementalWriter::new(&bytes, fake_original());
        assert_eq!(writer.allocate_id().number, 5);
        assert_eq!(writer.allocate_id().number, 6);
    }

    #[test]
    fn test_finish_with_table_preserves_prefix() {
        let bytes = b"%PDF-1.7\n...original bytes...".to_vec();
        let mut writer = IncrementalWriter::new(&bytes, fake_original());

        let id = writer.allocate_id();
        let mut dict = PdfDictionary::new();
        dict.set("Type", Object::Name(PdfName::new_unchecked("Sig")));
        writer.write_object(id, &Object::Dictionary(dict)).unwrap();

        let out = writer.finish_with_table(None, None).unwrap();
        assert!(out.starts_with(&bytes));

        let tail = String::from_utf8_lossy(&out[bytes.len()..]);
        assert!(tail.contains("5 0 obj"));
        assert!(tail.contains("xref\n5 1\n"));
        assert!(tail.contains("/Prev 50"));
        assert!(tail.contains("startxref"));
        assert!(tail.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn test_write_raw_object_matches_typed_framing() {
        let bytes = b"%PDF-1.7\n...original bytes...".to_vec();
        let mut writer = IncrementalWriter::new(&bytes, fake_original());

        let id = writer.allocate_id();
        let offset = writer
            .write_raw_object(id, "<< /Type /Sig /ByteRange[0 ********** ********** **********] >>")
            .unwrap();
        assert_eq!(offset, bytes.len() as u64);

        let out = writer.finish_with_table(None, None).unwrap();
        let tail = String::from_utf8_lossy(&out[bytes.len()..]);
        assert!(tail.starts_with("5 0 obj\n<< /Type /Sig"));
        assert!(tail.contains("**********"));
        assert!(tail.contains("endobj\n"));
    }
}
