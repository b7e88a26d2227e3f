//! RFC 3161 Time-Stamp Protocol: request construction, a blocking HTTP round
//! trip to the TSA, response parsing and messageImprint verification.
//!
//! Used two ways: as an unsigned attribute baked into an otherwise-ordinary
//! CMS signature (`SignatureConfig::timestamp`), and as the entire signature
//! for [`SignatureCategory::TimeStampOnly`] documents, where the `/Contents`
//! is nothing but the raw `TimeStampToken`.

use super::certificate::DigestAlgorithm;
use super::config::TimestampConfig;
use super::dictionary::{write_signature_dictionary, SignatureDictionaryParams};
use super::SignatureResult;
use crate::error::{SignatureError, TimestampError};
use crate::incremental::{IncrementalWriter, OriginalDocument};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use rand::RngCore;
use std::path::Path;

use super::asn1;

const SIGNED_DATA_OID: &str = "1.2.840.113549.1.7.2";

fn algorithm_identifier(oid_dotted: &str) -> Vec<u8> {
    asn1::sequence(&[asn1::oid(oid_dotted), asn1::null()].concat())
}

/// Builds a `TimeStampReq` DER blob over an already-computed hash, always
/// setting `certReq` so the TSA includes its own signing certificate in the
/// returned token (needed since this crate has no other way to obtain it).
fn build_request(hashed_message: &[u8], digest_algorithm: DigestAlgorithm, nonce: u64) -> Vec<u8> {
    let message_imprint = asn1::sequence(
        &[algorithm_identifier(digest_algorithm.oid()), asn1::octet_string(hashed_message)].concat(),
    );

    let mut body = Vec::new();
    body.extend(asn1::integer_u64(1)); // version
    body.extend(message_imprint);
    body.extend(asn1::integer_u64(nonce));
    body.extend(asn1::boolean(true)); // certReq
    asn1::sequence(&body)
}

struct ParsedResponse {
    status: i64,
    token_der: Option<Vec<u8>>,
}

fn parse_response(der: &[u8]) -> SignatureResult<ParsedResponse> {
    let outer = asn1::read_tlv(der).ok_or_else(|| TimestampError::InvalidToken("malformed TimeStampResp".into()))?;
    let fields = asn1::read_all(outer.content);
    let status_info = fields.first().ok_or_else(|| TimestampError::InvalidToken("missing status".into()))?;
    let status_fields = asn1::read_all(status_info.content);
    let status = status_fields
        .first()
        .map(|f| decode_integer(f.content))
        .unwrap_or(2);

    let token_der = fields.get(1).map(|tlv| {
        let mut out = vec![tlv.tag];
        out.extend(asn1::encode_length(tlv.content.len()));
        out.extend_from_slice(tlv.content);
        out
    });

    Ok(ParsedResponse { status, token_der })
}

fn decode_integer(bytes: &[u8]) -> i64 {
    let mut value: i64 = 0;
    for &b in bytes {
        value = (value << 8) | b as i64;
    }
    value
}

fn parse_generalized_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ").ok()?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
}

/// The fields of a parsed `TSTInfo`, read back out of a token this crate
/// just received, to confirm the TSA actually timestamped what was asked.
pub struct TstInfo {
    pub hashed_message: Vec<u8>,
    /// The digest algorithm OID the TSA declared in `messageImprint`, used to
    /// pick the right hash when re-deriving it from the signature bytes.
    pub hash_algorithm_oid: String,
    pub gen_time: Option<DateTime<FixedOffset>>,
}

/// Extracts `TSTInfo` from a `TimeStampToken` (a `SignedData` `ContentInfo`
/// whose `encapContentInfo` carries the `TSTInfo` as its `eContent`).
pub fn parse_tst_info(token_der: &[u8]) -> SignatureResult<TstInfo> {
    let content_info =
        asn1::read_tlv(token_der).ok_or_else(|| TimestampError::InvalidToken("malformed token".into()))?;
    let ci_fields = asn1::read_all(content_info.content);
    let content_type = ci_fields.first().map(|f| asn1::decode_oid(f.content)).unwrap_or_default();
    if content_type != SIGNED_DATA_OID {
        return Err(TimestampError::InvalidToken(format!("unexpected token content type: {content_type}")).into());
    }
    let explicit = ci_fields.get(1).ok_or_else(|| TimestampError::InvalidToken("token missing content".into()))?;
    let signed_data =
        asn1::read_tlv(explicit.content).ok_or_else(|| TimestampError::InvalidToken("malformed SignedData".into()))?;
    let sd_fields = asn1::read_all(signed_data.content);
    let encap_content_info = sd_fields
        .get(2)
        .ok_or_else(|| TimestampError::InvalidToken("SignedData missing encapContentInfo".into()))?;
    let encap_fields = asn1::read_all(encap_content_info.content);
    let econtent_explicit = encap_fields
        .get(1)
        .ok_or_else(|| TimestampError::InvalidToken("token is not a TSTInfo-carrying SignedData".into()))?;
    let octet_string = asn1::read_tlv(econtent_explicit.content)
        .ok_or_else(|| TimestampError::InvalidToken("malformed eContent".into()))?;

    let tst_info_outer =
        asn1::read_tlv(octet_string.content).ok_or_else(|| TimestampError::InvalidToken("malformed TSTInfo".into()))?;
    let tst_fields = asn1::read_all(tst_info_outer.content);
    let message_imprint = tst_fields
        .get(2)
        .ok_or_else(|| TimestampError::InvalidToken("TSTInfo missing messageImprint".into()))?;
    let imprint_fields = asn1::read_all(message_imprint.content);
    let hash_algorithm_oid = imprint_fields
        .first()
        .map(|f| asn1::read_all(f.content))
        .and_then(|alg_fields| alg_fields.first().map(|f| asn1::decode_oid(f.content)))
        .unwrap_or_default();
    let hashed_message = imprint_fields.get(1).map(|f| f.content.to_vec()).unwrap_or_default();

    let gen_time = tst_fields
        .get(4)
        .and_then(|f| std::str::from_utf8(f.content).ok())
        .and_then(parse_generalized_time);

    Ok(TstInfo { hashed_message, hash_algorithm_oid, gen_time })
}

/// Requests an RFC 3161 timestamp token over `data`, verifies the returned
/// token's messageImprint matches what was asked, and returns the raw
/// `TimeStampToken` `ContentInfo` DER.
pub fn request_timestamp_token(
    data: &[u8],
    config: &TimestampConfig,
    digest_algorithm: DigestAlgorithm,
) -> SignatureResult<Vec<u8>> {
    let hashed_message = digest_algorithm.digest(data);
    let nonce = rand::thread_rng().next_u64();
    let request_der = build_request(&hashed_message, digest_algorithm, nonce);

    log::debug!("requesting RFC 3161 timestamp from {}", config.url);

    let client = reqwest::blocking::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| TimestampError::Request(e.to_string()))?;

    let mut request = client
        .post(&config.url)
        .header("Content-Type", "application/timestamp-query")
        .body(request_der);

    if let Some(username) = &config.username {
        request = request.basic_auth(username, config.password.as_ref());
    }

    let response = request.send().map_err(|e| TimestampError::Request(e.to_string()))?;
    if !response.status().is_success() {
        return Err(TimestampError::Request(format!("TSA returned HTTP {}", response.status())).into());
    }
    let body = response.bytes().map_err(|e| TimestampError::Request(e.to_string()))?;

    let parsed = parse_response(&body)?;
    if parsed.status > 1 {
        return Err(TimestampError::Rejected(format!("TSA returned PKIStatus {}", parsed.status)).into());
    }
    let token_der = parsed
        .token_der
        .ok_or_else(|| TimestampError::Rejected("TSA granted status but returned no token".into()))?;

    let tst_info = parse_tst_info(&token_der)?;
    if tst_info.hashed_message != hashed_message {
        return Err(TimestampError::ImprintMismatch.into());
    }

    log::info!("received timestamp token, TSA genTime = {:?}", tst_info.gen_time);
    Ok(token_der)
}

pub(super) fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write as _;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(out, "{:02x}", b);
    }
    out
}

/// Appends a bare RFC 3161 `/DocTimeStamp` to an existing PDF: no signing
/// keypair, just an archival timestamp token over the document's bytes,
/// embedded via the same incremental-update/`ByteRange` mechanism a regular
/// signature uses.
pub fn timestamp_file(input_path: &Path, output_path: &Path, config: &TimestampConfig) -> SignatureResult<()> {
    use super::catalog;
    use super::config::{DocMdpPermission, SignatureCategory};
    use super::placeholder::{unknown_key_fallback_hex_len, PlaceholderPlanner};
    use crate::object::Object;
    use crate::parser::PdfReader;

    let original_bytes = std::fs::read(input_path)?;
    let mut contents_hex_len = unknown_key_fallback_hex_len();

    for attempt in 0..2 {
        let original = OriginalDocument::inspect(&original_bytes)?;
        let reader = PdfReader::from_bytes(original_bytes.clone())?;
        let header_version = reader.version().as_str().to_string();
        let original_catalog = reader
            .catalog()
            .ok_or_else(|| crate::error::WriterError::Structure("missing catalog".into()))?;
        let existing_sig_fields = catalog::existing_acroform_fields(&original_catalog);
        let prior_sig_flags = match original_catalog.get("AcroForm") {
            Some(Object::Dictionary(acroform)) => match acroform.get("SigFlags") {
                Some(Object::Integer(n)) => *n,
                _ => 0,
            },
            _ => 0,
        };

        let xref_is_stream = original.xref_is_stream;
        let mut writer = IncrementalWriter::new(&original_bytes, original);
        let sig_id = writer.allocate_id();
        let params = SignatureDictionaryParams {
            is_timestamp: true,
            category: SignatureCategory::TimeStampOnly,
            docmdp_permission: DocMdpPermission::FormFillingAndSigning,
            contents_reserved_hex_len: contents_hex_len,
            signing_time: None,
            name: None,
            reason: None,
            location: None,
            contact_info: None,
        };
        let placeholders = write_signature_dictionary(&mut writer, sig_id, &params)?;

        let field_name = format!("Signature{}", existing_sig_fields.len() + 1);
        let synthesized = super::appearance::synthesize_widget(
            &mut writer,
            &reader,
            &super::config::AppearanceConfig::invisible(0),
            &field_name,
            sig_id,
        )?;

        let sig_flags = prior_sig_flags | SignatureCategory::TimeStampOnly.sig_flags();
        let new_catalog = catalog::rewrite_catalog(
            &original_catalog,
            &header_version,
            &existing_sig_fields,
            synthesized.widget_id,
            sig_flags,
        )?;
        let catalog_id = writer.allocate_id();
        writer.write_object(catalog_id, &Object::Dictionary(new_catalog))?;

        let mut buffer = if xref_is_stream {
            writer.finish_with_stream(None, Some(catalog_id))?
        } else {
            writer.finish_with_table(None, Some(catalog_id))?
        };

        let total_len = buffer.len() as u64;
        let l1 = placeholders.contents_start - 1;
        let o2 = placeholders.contents_start + placeholders.contents_reserved_hex_len as u64 + 1;
        let l2 = total_len - o2;
        let byte_range_text = format!(
            "0 {:<10} {:<10} {:<10}",
            l1,
            o2,
            l2
        );
        debug_assert_eq!(byte_range_text.len(), placeholders.byte_range_content_len);
        let br_start = placeholders.byte_range_start as usize;
        buffer[br_start..br_start + byte_range_text.len()].copy_from_slice(byte_range_text.as_bytes());

        let signed_bytes: Vec<u8> =
            buffer[..l1 as usize].iter().chain(buffer[o2 as usize..].iter()).copied().collect();
        let token_der = request_timestamp_token(&signed_bytes, config, DigestAlgorithm::Sha256)?;
        let hex = hex_encode(&token_der);

        if hex.len() > contents_hex_len {
            if attempt == 1 {
                return Err(SignatureError::PlaceholderTooSmall { needed: hex.len(), reserved: contents_hex_len }.into());
            }
            contents_hex_len = PlaceholderPlanner::grow(contents_hex_len, hex.len());
            continue;
        }

        let mut padded_hex = hex;
        padded_hex.push_str(&"0".repeat(contents_hex_len - padded_hex.len()));
        let contents_start = placeholders.contents_start as usize;
        buffer[contents_start..contents_start + contents_hex_len].copy_from_slice(padded_hex.as_bytes());

        std::fs::write(output_path, &buffer)?;
        return Ok(());
    }

    unreachable!("loop always returns within two attempts")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_includes_message_imprint() {
        let hashed = DigestAlgorithm::Sha256.digest(b"hello world");
        let request = build_request(&hashed, DigestAlgorithm::Sha256, 42);
        assert_eq!(request[0], 0x30); // SEQUENCE

        let outer = asn1::read_tlv(&request).unwrap();
        let fields = asn1::read_all(outer.content);
        let message_imprint_fields = asn1::read_all(fields[1].content);
        assert_eq!(message_imprint_fields[1].content, hashed.as_slice());
    }

    #[test]
    fn test_parse_response_rejects_failure_status() {
        let status_info = asn1::sequence(&asn1::integer_u64(2));
        let response = asn1::sequence(&status_info);
        let parsed = parse_response(&response).unwrap();
        assert_eq!(parsed.status, 2);
        assert!(parsed.token_der.is_none());
    }
}
