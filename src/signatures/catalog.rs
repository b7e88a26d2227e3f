//! AcroForm & Catalog Rewriter: builds the new `/Root` catalog object an
//! incremental update points the trailer at, carrying every key of the
//! original catalog except the ones this pass itself rewrites.

use crate::error::{PdfResult, WriterError};
use crate::object::{Object, PdfArray, PdfDictionary, PdfName};
use crate::types::ObjectId;

/// The lowest catalog `/Version` a signed document is promoted to, matching
/// the PDF version that introduced `/AcroForm` digital signature fields.
const MINIMUM_VERSION: &str = "1.5";

/// Rewrites a catalog, replacing `/AcroForm` (and bumping `/Version` if
/// needed) while copying every other key unchanged.
///
/// `existing_sig_fields` are the object IDs of widget annotations already
/// listed in `/AcroForm/Fields` (from prior signatures on the same
/// document); `new_widget` is the one this pass is adding.
pub fn rewrite_catalog(
    original: &PdfDictionary,
    header_version: &str,
    existing_sig_fields: &[ObjectId],
    new_widget: ObjectId,
    sig_flags: i64,
) -> PdfResult<PdfDictionary> {
    reject_direct_streams(original)?;

    let mut catalog = PdfDictionary::new();
    for (key, value) in original.iter() {
        if key == "AcroForm" || key == "Version" {
            continue;
        }
        catalog.set(key.clone(), value.clone());
    }

    if needs_version_bump(header_version) {
        catalog.set("Version", Object::Name(PdfName::new_unchecked(MINIMUM_VERSION)));
    }

    let mut fields = PdfArray::new();
    for id in existing_sig_fields {
        fields.push(Object::Reference(*id));
    }
    fields.push(Object::Reference(new_widget));

    let mut acroform = PdfDictionary::new();
    acroform.set("Fields", Object::Array(fields));
    acroform.set("SigFlags", Object::Integer(sig_flags));
    catalog.set("AcroForm", Object::Dictionary(acroform));

    Ok(catalog)
}

/// Reads the signature widget object IDs already present in
/// `/AcroForm/Fields` on the original catalog, so a second signature on the
/// same document appends to the list instead of replacing it.
pub fn existing_acroform_fields(original: &PdfDictionary) -> Vec<ObjectId> {
    let Some(Object::Dictionary(acroform)) = original.get("AcroForm") else {
        return Vec::new();
    };
    let Some(Object::Array(fields)) = acroform.get("Fields") else {
        return Vec::new();
    };
    fields
        .iter()
        .filter_map(|obj| match obj {
            Object::Reference(id) => Some(*id),
            _ => None,
        })
        .collect()
}

/// `/Version` only needs bumping when the header declares something lower
/// than [`MINIMUM_VERSION`]; an already-newer document is left alone.
fn needs_version_bump(header_version: &str) -> bool {
    parse_version(header_version) < parse_version(MINIMUM_VERSION)
}

fn parse_version(version: &str) -> (u32, u32) {
    let mut parts = version.splitn(2, '.');
    let major = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let minor = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (major, minor)
}

/// Catalogs must never contain a stream as a direct value (only as an
/// indirect reference); this walks the tree looking for one.
fn reject_direct_streams(dict: &PdfDictionary) -> PdfResult<()> {
    for (key, value) in dict.iter() {
        check_object(key, value)?;
    }
    Ok(())
}

fn check_object(key: &str, object: &Object) -> PdfResult<()> {
    match object {
        Object::Stream(_) => Err(WriterError::Structure(format!(
            "catalog key /{key} is a direct stream, which PDF forbids as a catalog value"
        ))
        .into()),
        Object::Dictionary(nested) => {
            for (nested_key, nested_value) in nested.iter() {
                check_object(nested_key, nested_value)?;
            }
            Ok(())
        }
        Object::Array(array) => {
            for element in array.iter() {
                check_object(key, element)?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preserves_unrelated_keys() {
        let mut original = PdfDictionary::new();
        original.set("Type", Object::Name(PdfName::new_unchecked("Catalog")));
        original.set("Pages", Object::Reference(ObjectId::new(2)));
        original.set("Lang", Object::String(crate::object::PdfString::literal("en")));

        let rewritten = rewrite_catalog(&original, "1.7", &[], ObjectId::new(10), 3).unwrap();
        assert_eq!(rewritten.get("Pages"), Some(&Object::Reference(ObjectId::new(2))));
        assert_eq!(
            rewritten.get("Lang"),
            Some(&Object::String(crate::object::PdfString::literal("en")))
        );
    }

    #[test]
    fn test_bumps_version_below_1_5() {
        let original = PdfDictionary::new();
        let rewritten = rewrite_catalog(&original, "1.4", &[], ObjectId::new(10), 3).unwrap();
        assert_eq!(rewritten.get("Version"), Some(&Object::Name(PdfName::new_unchecked("1.5"))));
    }

    #[test]
    fn test_does_not_downgrade_newer_version() {
        let mut original = PdfDictionary::new();
        original.set("Version", Object::Name(PdfName::new_unchecked("1.7")));
        let rewritten = rewrite_catalog(&original, "1.7", &[], ObjectId::new(10), 3).unwrap();
        assert_eq!(rewritten.get("Version"), None);
    }

    #[test]
    fn test_sig_flags_and_fields_written() {
        let original = PdfDictionary::new();
        let rewritten =
            rewrite_catalog(&original, "1.7", &[ObjectId::new(7)], ObjectId::new(11), 3).unwrap();
        let Some(Object::Dictionary(acroform)) = rewritten.get("AcroForm") else {
            panic!("expected AcroForm dictionary");
        };
        assert_eq!(acroform.get("SigFlags"), Some(&Object::Integer(3)));
        let Some(Object::Array(fields)) = acroform.get("Fields") else {
            panic!("expected Fields array");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get(0), Some(&Object::Reference(ObjectId::new(7))));
        assert_eq!(fields.get(1), Some(&Object::Reference(ObjectId::new(11))));
    }

    #[test]
    fn test_existing_acroform_fields_extracted() {
        let mut fields = PdfArray::new();
        fields.push(Object::Reference(ObjectId::new(3)));
        fields.push(Object::Reference(ObjectId::new(4)));
        let mut acroform = PdfDictionary::new();
        acroform.set("Fields", Object::Array(fields));
        let mut original = PdfDictionary::new();
        original.set("AcroForm", Object::Dictionary(acroform));

        let ids = existing_acroform_fields(&original);
        assert_eq!(ids, vec![ObjectId::new(3), ObjectId::new(4)]);
    }

    #[test]
    fn test_rejects_direct_stream_value() {
        let mut original = PdfDictionary::new();
        let stream = crate::object::PdfStream::with_dictionary(PdfDictionary::new(), Vec::new());
        original.set("Weird", Object::Stream(stream));

        let result = rewrite_catalog(&original, "1.7", &[], ObjectId::new(10), 3);
        assert!(result.is_err());
    }
}
