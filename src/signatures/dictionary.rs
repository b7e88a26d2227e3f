//! Signature Dictionary Builder: produces the `/Sig` or `/DocTimeStamp`
//! dictionary an incremental update appends, including the fixed-width
//! `/ByteRange` and `/Contents` placeholders that the byte-range patcher
//! later overwrites in place without changing the file's length.
//!
//! `/ByteRange` and `/Contents` can't be expressed as typed [`Object`]
//! values here: their placeholder text (literal `*` runs, a run of `0` hex
//! digits) has to survive byte-for-byte until the real CMS bytes exist, so
//! this module builds the dictionary body as text and writes it through
//! [`IncrementalWriter::write_raw_object`] instead of the typed
//! `write_object` path.

use super::config::{DocMdpPermission, SignatureCategory};
use crate::incremental::IncrementalWriter;
use crate::object::{Object, PdfArray, PdfDictionary, PdfName, PdfString};
use crate::types::ObjectId;
use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Timelike};
use std::io;

/// Width, in characters, reserved for each of the three rewritable
/// `/ByteRange` integers (`L1`, `O2`, `L2`; the leading `0` is fixed).
const BYTE_RANGE_SLOT_WIDTH: usize = 10;

/// Inputs the orchestrator has settled on before the CMS bytes exist.
pub struct SignatureDictionaryParams {
    pub is_timestamp: bool,
    pub category: SignatureCategory,
    pub docmdp_permission: DocMdpPermission,
    pub contents_reserved_hex_len: usize,
    /// Omitted when a TSA is configured, per §4.4 (the TSA's own timestamp
    /// is the time of record then).
    pub signing_time: Option<DateTime<FixedOffset>>,
    pub name: Option<String>,
    pub reason: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
}

/// Where, in the finished output buffer, the two rewritable regions of a
/// written signature dictionary ended up.
#[derive(Debug, Clone, Copy)]
pub struct SignaturePlaceholders {
    pub object_id: ObjectId,
    pub object_offset: u64,
    /// Offset of the first byte after `/ByteRange[`.
    pub byte_range_start: u64,
    /// Number of characters between `[` and `]`, i.e. the fixed width the
    /// real `0 L1 O2 L2` text must be padded to.
    pub byte_range_content_len: usize,
    /// Offset of the first hex digit inside `/Contents<...>`.
    pub contents_start: u64,
    pub contents_reserved_hex_len: usize,
}

/// Writes a signature dictionary as a new indirect object and returns the
/// absolute offsets of its two rewritable regions.
pub fn write_signature_dictionary(
    writer: &mut IncrementalWriter,
    id: ObjectId,
    params: &SignatureDictionaryParams,
) -> io::Result<SignaturePlaceholders> {
    let built = build_body(params);
    let header_len = format!("{} {} obj\n", id.number, id.generation).len() as u64;

    let object_offset = writer.write_raw_object(id, &built.body)?;
    let body_start = object_offset + header_len;

    Ok(SignaturePlaceholders {
        object_id: id,
        object_offset,
        byte_range_start: body_start + built.byte_range_content_offset as u64,
        byte_range_content_len: built.byte_range_content_len,
        contents_start: body_start + built.contents_hex_offset as u64,
        contents_reserved_hex_len: params.contents_reserved_hex_len,
    })
}

struct BuiltBody {
    body: String,
    byte_range_content_offset: usize,
    byte_range_content_len: usize,
    contents_hex_offset: usize,
}

fn build_body(params: &SignatureDictionaryParams) -> BuiltBody {
    let mut dict = PdfDictionary::new();
    dict.set(
        "Type",
        Object::Name(PdfName::new_unchecked(if params.is_timestamp {
            "DocTimeStamp"
        } else {
            "Sig"
        })),
    );
    dict.set("Filter", Object::Name(PdfName::new_unchecked("Adobe.PPKLite")));
    dict.set(
        "SubFilter",
        Object::Name(PdfName::new_unchecked(if params.is_timestamp {
            "ETSI.RFC3161"
        } else {
            "adbe.pkcs7.detached"
        })),
    );

    if let Some(name) = &params.name {
        dict.set("Name", Object::String(PdfString::pdf_text(name)));
    }
    if let Some(reason) = &params.reason {
        dict.set("Reason", Object::String(PdfString::pdf_text(reason)));
    }
    if let Some(location) = &params.location {
        dict.set("Location", Object::String(PdfString::pdf_text(location)));
    }
    if let Some(contact_info) = &params.contact_info {
        dict.set("ContactInfo", Object::String(PdfString::pdf_text(contact_info)));
    }

    if !params.is_timestamp {
        if let Some(time) = params.signing_time {
            dict.set("M", Object::String(PdfString::literal(pdf_date(time))));
        }
    }

    if let Some(reference) = reference_array_for(params.category, params.docmdp_permission) {
        dict.set("Reference", reference);
    }

    let mut body = dict.to_pdf_string();
    debug_assert!(body.ends_with(" >>"));
    body.truncate(body.len() - 3); // drop the closing " >>"; more keys follow

    body.push_str(" /ByteRange[");
    let byte_range_content_offset = body.len();
    let byte_range_placeholder = format!(
        "0 {0} {0} {0}",
        "*".repeat(BYTE_RANGE_SLOT_WIDTH)
    );
    let byte_range_content_len = byte_range_placeholder.len();
    body.push_str(&byte_range_placeholder);
    body.push(']');

    body.push_str(" /Contents<");
    let contents_hex_offset = body.len();
    body.push_str(&"0".repeat(params.contents_reserved_hex_len));
    body.push('>');

    body.push_str(" >>");

    BuiltBody {
        body,
        byte_range_content_offset,
        byte_range_content_len,
        contents_hex_offset,
    }
}

/// Builds the `/Reference` array's single `/SigRef` entry for categories
/// that carry MDP semantics. `TimeStampOnly` carries none.
fn reference_array_for(category: SignatureCategory, docmdp_permission: DocMdpPermission) -> Option<Object> {
    let mut transform_params = PdfDictionary::new();
    transform_params.set("Type", Object::Name(PdfName::new_unchecked("TransformParams")));

    let (transform_method, version) = match category {
        SignatureCategory::Certification => {
            transform_params.set("P", Object::Integer(docmdp_permission.p_value()));
            ("DocMDP", "1.2")
        }
        SignatureCategory::UsageRights => ("UR3", "2.2"),
        SignatureCategory::Approval => {
            transform_params.set("Action", Object::Name(PdfName::new_unchecked("All")));
            ("FieldMDP", "1.2")
        }
        SignatureCategory::TimeStampOnly => return None,
    };
    transform_params.set("V", Object::Name(PdfName::new_unchecked(version)));

    let mut sig_ref = PdfDictionary::new();
    sig_ref.set("Type", Object::Name(PdfName::new_unchecked("SigRef")));
    sig_ref.set("TransformMethod", Object::Name(PdfName::new_unchecked(transform_method)));
    sig_ref.set("TransformParams", Object::Dictionary(transform_params));

    Some(Object::Array(PdfArray::from_objects(vec![Object::Dictionary(sig_ref)])))
}

/// Formats a timestamp as a PDF date string with an always-signed UTC
/// offset (`D:YYYYMMDDHHmmSS+HH'mm'`), never a bare `Z`, regardless of
/// whether the offset is zero.
pub fn pdf_date(time: DateTime<FixedOffset>) -> String {
    let offset_seconds = time.offset().local_minus_utc();
    let sign = if offset_seconds < 0 { '-' } else { '+' };
    let offset_seconds = offset_seconds.abs();
    let offset_hours = offset_seconds / 3600;
    let offset_minutes = (offset_seconds % 3600) / 60;

    format!(
        "D:{:04}{:02}{:02}{:02}{:02}{:02}{}{:02}'{:02}'",
        time.year(),
        time.month(),
        time.day(),
        time.hour(),
        time.minute(),
        time.second(),
        sign,
        offset_hours,
        offset_minutes,
    )
}

/// Parses a PDF date string (`D:YYYYMMDDHHmmSS` optionally followed by
/// `Z` or a signed `HH'mm'` offset) back into a [`DateTime<FixedOffset>`].
///
/// Accepts the bare `D:YYYYMMDDHHmmSS` form (offset defaults to UTC) since
/// some producers omit it entirely, not just the `Z` this crate itself
/// never writes via [`pdf_date`].
pub fn parse_pdf_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    if s.len() < 14 {
        return None;
    }
    let year: i32 = s.get(0..4)?.parse().ok()?;
    let month: u32 = s.get(4..6)?.parse().ok()?;
    let day: u32 = s.get(6..8)?.parse().ok()?;
    let hour: u32 = s.get(8..10)?.parse().ok()?;
    let minute: u32 = s.get(10..12)?.parse().ok()?;
    let second: u32 = s.get(12..14)?.parse().ok()?;
    let rest = &s[14..];

    let offset_seconds = if rest.is_empty() || rest == "Z" {
        0
    } else {
        let sign = match rest.as_bytes().first()? {
            b'+' => 1,
            b'-' => -1,
            _ => return None,
        };
        let hh: i32 = rest.get(1..3)?.parse().ok()?;
        let mm: i32 = rest
            .get(4..6)
            .or_else(|| rest.get(3..5))
            .and_then(|m| m.parse().ok())
            .unwrap_or(0);
        sign * (hh * 3600 + mm * 60)
    };

    let offset = FixedOffset::east_opt(offset_seconds)?;
    offset.with_ymd_and_hms(year, month, day, hour, minute, second).single()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incremental::OriginalDocument;

    fn params(category: SignatureCategory, is_timestamp: bool) -> SignatureDictionaryParams {
        SignatureDictionaryParams {
            is_timestamp,
            category,
            docmdp_permission: DocMdpPermission::FormFillingAndSigning,
            contents_reserved_hex_len: 256,
            signing_time: Some(DateTime::parse_from_rfc3339("2026-07-29T12:00:00+00:00").unwrap()),
            name: Some("Jane Doe".to_string()),
            reason: None,
            location: None,
            contact_info: None,
        }
    }

    #[test]
    fn test_pdf_date_uses_signed_offset_not_z() {
        let time = DateTime::parse_from_rfc3339("2026-07-29T12:34:56+00:00").unwrap();
        assert_eq!(pdf_date(time), "D:20260729123456+00'00'");
    }

    #[test]
    fn test_pdf_date_preserves_nonzero_offset() {
        let time = DateTime::parse_from_rfc3339("2026-07-29T12:34:56-05:30").unwrap();
        assert_eq!(pdf_date(time), "D:20260729123456-05'30'");
    }

    #[test]
    fn test_parse_pdf_date_round_trips_with_pdf_date() {
        let time = DateTime::parse_from_rfc3339("2026-07-29T12:34:56-05:30").unwrap();
        let formatted = pdf_date(time);
        let parsed = parse_pdf_date(&formatted).unwrap();
        assert_eq!(parsed, time);
    }

    #[test]
    fn test_parse_pdf_date_accepts_bare_z() {
        let parsed = parse_pdf_date("D:20260729123456Z").unwrap();
        assert_eq!(parsed, DateTime::parse_from_rfc3339("2026-07-29T12:34:56+00:00").unwrap());
    }

    #[test]
    fn test_parse_pdf_date_accepts_no_offset() {
        let parsed = parse_pdf_date("D:20260729123456").unwrap();
        assert_eq!(parsed, DateTime::parse_from_rfc3339("2026-07-29T12:34:56+00:00").unwrap());
    }

    #[test]
    fn test_parse_pdf_date_rejects_too_short() {
        assert!(parse_pdf_date("D:2026").is_none());
    }

    #[test]
    fn test_build_body_byte_range_and_contents_placeholders() {
        let built = build_body(&params(SignatureCategory::Approval, false));

        let content = &built.body[built.byte_range_content_offset
            ..built.byte_range_content_offset + built.byte_range_content_len];
        assert_eq!(content, format!("0 {0} {0} {0}", "*".repeat(BYTE_RANGE_SLOT_WIDTH)));

        let hex = &built.body[built.contents_hex_offset..built.contents_hex_offset + 256];
        assert_eq!(hex, "0".repeat(256));
        assert_eq!(&built.body[built.contents_hex_offset + 256..built.contents_hex_offset + 257], ">");
    }

    #[test]
    fn test_docmdp_reference_for_certification() {
        let built = build_body(&params(SignatureCategory::Certification, false));
        assert!(built.body.contains("/TransformMethod /DocMDP"));
        assert!(built.body.contains("/P 2"));
        assert!(built.body.contains("/V /1.2"));
    }

    #[test]
    fn test_ur3_reference_for_usage_rights() {
        let built = build_body(&params(SignatureCategory::UsageRights, false));
        assert!(built.body.contains("/TransformMethod /UR3"));
        assert!(built.body.contains("/V /2.2"));
    }

    #[test]
    fn test_fieldmdp_reference_for_approval() {
        let built = build_body(&params(SignatureCategory::Approval, false));
        assert!(built.body.contains("/TransformMethod /FieldMDP"));
        assert!(built.body.contains("/Action /All"));
    }

    #[test]
    fn test_timestamp_only_has_no_reference_and_no_m() {
        let mut p = params(SignatureCategory::TimeStampOnly, true);
        p.signing_time = None;
        let built = build_body(&p);
        assert!(!built.body.contains("/Reference"));
        assert!(!built.body.contains("/M ("));
        assert!(built.body.contains("/Type /DocTimeStamp"));
        assert!(built.body.contains("/SubFilter /ETSI.RFC3161"));
    }

    #[test]
    fn test_timestamp_configured_omits_m_even_when_not_timestamp_category() {
        // A regular signature with a TSA configured must omit /M; callers
        // enforce this by simply not passing a signing_time in that case.
        let mut p = params(SignatureCategory::Approval, false);
        p.signing_time = None;
        let built = build_body(&p);
        assert!(!built.body.contains("/M ("));
    }

    #[test]
    fn test_write_signature_dictionary_offsets_land_on_placeholders() {
        let original_bytes = b"%PDF-1.7\n...original...".to_vec();
        let original = OriginalDocument {
            length: original_bytes.len() as u64,
            prev_xref_offset: 10,
            max_object_number: 3,
            root: ObjectId::new(1),
            id: None,
            xref_is_stream: false,
        };
        let mut writer = IncrementalWriter::new(&original_bytes, original);
        let id = writer.allocate_id();
        let p = params(SignatureCategory::Approval, false);

        let placeholders = write_signature_dictionary(&mut writer, id, &p).unwrap();
        let buffer_snapshot = {
            // Peek at what's been written so far by finishing a throwaway copy.
            let out = writer.finish_with_table(None, None).unwrap();
            out
        };

        let byte_range_region = &buffer_snapshot[placeholders.byte_range_start as usize
            ..placeholders.byte_range_start as usize + placeholders.byte_range_content_len];
        assert!(byte_range_region.starts_with(b"0 "));
        assert!(byte_range_region.iter().filter(|&&b| b == b'*').count() == BYTE_RANGE_SLOT_WIDTH * 3);

        let contents_region = &buffer_snapshot[placeholders.contents_start as usize
            ..placeholders.contents_start as usize + placeholders.contents_reserved_hex_len];
        assert!(contents_region.iter().all(|&b| b == b'0'));
    }
}
