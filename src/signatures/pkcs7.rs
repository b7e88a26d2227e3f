//! CMS (RFC 5652) `SignedData` builder and parser for detached PDF
//! signatures: signed/unsigned attributes, signer info, certificate set.
//!
//! Built by hand on top of [`super::asn1`] rather than the `cms`/`der` crates'
//! typed API, so the signer and verifier share one small DER layer with the
//! RFC 3161 and revocation code.

use super::asn1;
use super::certificate::{Certificate, DigestAlgorithm, KeyAlgorithm};
use super::SignatureResult;
use crate::error::SignatureError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

const CONTENT_TYPE_OID: &str = "1.2.840.113549.1.9.3";
const MESSAGE_DIGEST_OID: &str = "1.2.840.113549.1.9.4";
const SIGNING_TIME_OID: &str = "1.2.840.113549.1.9.5";
const SIGNING_CERTIFICATE_V1_OID: &str = "1.2.840.113549.1.9.16.2.12";
const SIGNING_CERTIFICATE_V2_OID: &str = "1.2.840.113549.1.9.16.2.47";
/// Adobe's `adbe-revocationInfoArchival` attribute, carrying embedded
/// OCSP/CRL evidence inside the CMS blob itself.
const REVOCATION_INFO_ARCHIVAL_OID: &str = "1.2.840.113583.1.1.8";
/// `id-aa-timeStampToken`, an unsigned attribute carrying an RFC 3161 token
/// over the signature value.
const TIME_STAMP_TOKEN_OID: &str = "1.2.840.113549.1.9.16.2.14";
const DATA_OID: &str = "1.2.840.113549.1.7.1";
const SIGNED_DATA_OID: &str = "1.2.840.113549.1.7.2";

fn algorithm_identifier(oid_dotted: &str) -> Vec<u8> {
    asn1::sequence(&[asn1::oid(oid_dotted), asn1::null()].concat())
}

fn attribute(oid_dotted: &str, value_der: &[u8]) -> Vec<u8> {
    asn1::sequence(&[asn1::oid(oid_dotted), asn1::set(value_der)].concat())
}

/// Re-tags a universal `SET` (tag `0x31`) as an `[n] IMPLICIT` context tag,
/// i.e. swaps the tag byte while keeping the same content — used both to
/// turn a built `signedAttrs`/`unsignedAttrs` SET into its transmitted form
/// and, in the parser, to turn it back for re-hashing.
fn set_content(set_der: &[u8]) -> SignatureResult<&[u8]> {
    asn1::read_tlv(set_der)
        .map(|t| t.content)
        .ok_or_else(|| SignatureError::Cms("malformed SET".into()))
}

fn format_utc_time(time: DateTime<FixedOffset>) -> String {
    time.with_timezone(&Utc).format("%y%m%d%H%M%SZ").to_string()
}

fn parse_utc_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(s, "%y%m%d%H%M%SZ").ok()?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
}

fn parse_generalized_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let naive = NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%SZ").ok()?;
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).fixed_offset())
}

fn build_issuer_serial(end_entity: &Certificate) -> Vec<u8> {
    let general_name = asn1::context_constructed(4, end_entity.issuer_der());
    let general_names = asn1::sequence(&general_name);
    asn1::sequence(&[general_names, end_entity.serial_der().to_vec()].concat())
}

/// Builds the ESS `signing-certificate`/`signing-certificate-v2` attribute
/// binding the signed attributes to the end-entity certificate that will
/// appear in the `certificates` set. Uses v1 (SHA-1 cert hash, fixed by RFC
/// 2634) only when the message digest algorithm itself is SHA-1; every other
/// digest algorithm uses v2 with an explicit hash algorithm, omitted only
/// when it is the v2 default of SHA-256.
fn build_signing_certificate_attribute(digest_algorithm: DigestAlgorithm, end_entity: &Certificate) -> Vec<u8> {
    let issuer_serial = build_issuer_serial(end_entity);

    if digest_algorithm == DigestAlgorithm::Sha1 {
        let cert_hash = DigestAlgorithm::Sha1.digest(end_entity.der_bytes());
        let ess_cert_id = asn1::sequence(&[asn1::octet_string(&cert_hash), issuer_serial].concat());
        let certs = asn1::sequence(&ess_cert_id);
        let value = asn1::sequence(&certs);
        attribute(SIGNING_CERTIFICATE_V1_OID, &value)
    } else {
        let cert_hash = digest_algorithm.digest(end_entity.der_bytes());
        let mut body = Vec::new();
        if digest_algorithm != DigestAlgorithm::Sha256 {
            body.extend(algorithm_identifier(digest_algorithm.oid()));
        }
        body.extend(asn1::octet_string(&cert_hash));
        body.extend(issuer_serial);
        let ess_cert_id_v2 = asn1::sequence(&body);
        let certs = asn1::sequence(&ess_cert_id_v2);
        let value = asn1::sequence(&certs);
        attribute(SIGNING_CERTIFICATE_V2_OID, &value)
    }
}

/// Everything the Signature Dictionary/ByteRange patcher has settled on
/// before the signature's own bytes exist, needed to build `signedAttrs`.
pub struct SignedAttributesInput<'a> {
    pub message_digest: &'a [u8],
    pub digest_algorithm: DigestAlgorithm,
    pub end_entity: &'a Certificate,
    /// Omitted when a TSA is configured (§4.4: the TSA's token is the time
    /// of record then, not a self-asserted `signingTime`).
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// Full `RevocationInfoArchival` SEQUENCE DER, if revocation evidence is
    /// being embedded directly in the signed attributes.
    pub revocation_info_der: Option<&'a [u8]>,
}

/// Builds the DER-encoded `signedAttrs` `SET` (tag `0x31`, DER-sorted) that
/// must be hashed and signed to produce the `SignerInfo`'s signature value.
pub fn build_signed_attributes(input: &SignedAttributesInput) -> Vec<u8> {
    let mut elements = vec![
        attribute(CONTENT_TYPE_OID, &asn1::oid(DATA_OID)),
        attribute(MESSAGE_DIGEST_OID, &asn1::octet_string(input.message_digest)),
        build_signing_certificate_attribute(input.digest_algorithm, input.end_entity),
    ];
    if let Some(time) = input.signing_time {
        elements.push(attribute(SIGNING_TIME_OID, &asn1::utc_time(&format_utc_time(time))));
    }
    if let Some(revocation_der) = input.revocation_info_der {
        elements.push(attribute(REVOCATION_INFO_ARCHIVAL_OID, revocation_der));
    }
    asn1::set_sorted(elements)
}

/// Everything needed to assemble the final `SignedData` once a signature
/// value (over the hashed `signedAttrs`) has been produced.
pub struct SignedDataInput<'a> {
    pub digest_algorithm: DigestAlgorithm,
    pub key_algorithm: KeyAlgorithm,
    /// The `signedAttrs` SET exactly as returned by
    /// [`build_signed_attributes`] (tag `0x31`).
    pub signed_attrs_der: &'a [u8],
    pub signature_value: &'a [u8],
    pub end_entity: &'a Certificate,
    pub chain: &'a [Certificate],
    pub embed_certificate_chain: bool,
    /// A pre-fetched RFC 3161 `TimeStampToken` `ContentInfo` DER, embedded as
    /// the `id-aa-timeStampToken` unsigned attribute.
    pub timestamp_token_der: Option<&'a [u8]>,
}

/// Assembles the full detached `SignedData` `ContentInfo` DER.
pub fn build_signed_data(input: &SignedDataInput) -> SignatureResult<Vec<u8>> {
    let digest_alg_id = algorithm_identifier(input.digest_algorithm.oid());
    let digest_algorithms_set = asn1::set(&digest_alg_id);

    let encap_content_info = asn1::sequence(&asn1::oid(DATA_OID));

    let mut certs_der = Vec::new();
    certs_der.extend_from_slice(input.end_entity.der_bytes());
    if input.embed_certificate_chain {
        for intermediate in input.chain {
            certs_der.extend_from_slice(intermediate.der_bytes());
        }
    }
    let certificates = asn1::context_constructed(0, &certs_der);

    let issuer_and_serial =
        asn1::sequence(&[input.end_entity.issuer_der().to_vec(), input.end_entity.serial_der().to_vec()].concat());

    let signature_algorithm_oid = input.key_algorithm.signature_oid(input.digest_algorithm)?;
    let signature_algorithm_id = algorithm_identifier(signature_algorithm_oid);

    let signed_attrs_implicit = asn1::context_constructed(0, set_content(input.signed_attrs_der)?);

    let mut signer_info = Vec::new();
    signer_info.extend(asn1::integer_u64(1)); // version 1: issuerAndSerialNumber SignerIdentifier
    signer_info.extend(issuer_and_serial);
    signer_info.extend(digest_alg_id);
    signer_info.extend(signed_attrs_implicit);
    signer_info.extend(signature_algorithm_id);
    signer_info.extend(asn1::octet_string(input.signature_value));

    if let Some(token_der) = input.timestamp_token_der {
        let timestamp_attr = attribute(TIME_STAMP_TOKEN_OID, token_der);
        let unsigned_attrs_set = asn1::set(&timestamp_attr);
        let unsigned_attrs_implicit = asn1::context_constructed(1, set_content(&unsigned_attrs_set)?);
        signer_info.extend(unsigned_attrs_implicit);
    }

    let signer_infos_set = asn1::set(&asn1::sequence(&signer_info));

    let mut signed_data = Vec::new();
    signed_data.extend(asn1::integer_u64(1)); // version 1: no pre-1.8 attribute certificates
    signed_data.extend(digest_algorithms_set);
    signed_data.extend(encap_content_info);
    signed_data.extend(certificates);
    signed_data.extend(signer_infos_set);
    let signed_data_seq = asn1::sequence(&signed_data);

    let mut content_info = Vec::new();
    content_info.extend(asn1::oid(SIGNED_DATA_OID));
    content_info.extend(asn1::context_constructed(0, &signed_data_seq)); // [0] EXPLICIT
    Ok(asn1::sequence(&content_info))
}

/// A `SignerInfo` as reconstructed by [`parse_signed_data`].
#[derive(Debug, Clone)]
pub struct ParsedSignerInfo {
    pub digest_algorithm: DigestAlgorithm,
    /// `signedAttrs`, re-tagged back to a universal `SET` (`0x31`) so it can
    /// be re-hashed exactly as the signer hashed it.
    pub signed_attrs_der: Vec<u8>,
    pub content_type_oid: String,
    pub message_digest: Vec<u8>,
    pub signing_time: Option<DateTime<FixedOffset>>,
    pub revocation_info_der: Option<Vec<u8>>,
    pub signature_algorithm_oid: String,
    pub signature: Vec<u8>,
    pub issuer_der: Vec<u8>,
    pub serial_der: Vec<u8>,
    /// The embedded `id-aa-timeStampToken` unsigned attribute value, if any.
    pub timestamp_token_der: Option<Vec<u8>>,
}

/// A parsed `SignedData`: the certificate set plus the one `SignerInfo` this
/// crate's own signatures always carry. PDF signatures are always
/// single-signer CMS blobs; a multi-signer `SignedData` is not something
/// this library produces, so the parser reads only the first `SignerInfo`.
#[derive(Debug, Clone)]
pub struct ParsedSignedData {
    /// Raw DER bytes of every certificate in the `certificates` set, in the
    /// order they were embedded.
    pub certificates: Vec<Vec<u8>>,
    pub signer_info: ParsedSignerInfo,
}

fn raw_tlv(tlv: &asn1::Tlv<'_>) -> Vec<u8> {
    let mut out = vec![tlv.tag];
    out.extend(asn1::encode_length(tlv.content.len()));
    out.extend_from_slice(tlv.content);
    out
}

fn split_top_level(data: &[u8]) -> Vec<&[u8]> {
    let mut out = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        match asn1::read_tlv(rest) {
            Some(t) => {
                out.push(&rest[..t.consumed]);
                rest = &rest[t.consumed..];
            }
            None => break,
        }
    }
    out
}

fn parse_attribute_value<'a>(attr: &asn1::Tlv<'a>) -> Option<(String, asn1::Tlv<'a>)> {
    let fields = asn1::read_all(attr.content);
    let oid_tlv = fields.first()?;
    let values_tlv = fields.get(1)?;
    let first_value = asn1::read_all(values_tlv.content).into_iter().next()?;
    Some((asn1::decode_oid(oid_tlv.content), first_value))
}

fn parse_signer_info(signer_info_bytes: &[u8]) -> SignatureResult<ParsedSignerInfo> {
    let outer = asn1::read_tlv(signer_info_bytes)
        .ok_or_else(|| SignatureError::Cms("malformed SignerInfo".into()))?;
    let fields = asn1::read_all(outer.content);
    if fields.len() < 5 {
        return Err(SignatureError::Cms("SignerInfo missing required fields".into()));
    }

    let sid = &fields[1];
    let (issuer_der, serial_der) = if sid.tag == 0x30 {
        let sid_fields = asn1::read_all(sid.content);
        let issuer = sid_fields.first().map(raw_tlv).unwrap_or_default();
        let serial = sid_fields.get(1).map(raw_tlv).unwrap_or_default();
        (issuer, serial)
    } else {
        (Vec::new(), Vec::new())
    };

    let digest_alg_fields = asn1::read_all(fields[2].content);
    let digest_algorithm = digest_alg_fields
        .first()
        .map(|f| DigestAlgorithm::from_oid(&asn1::decode_oid(f.content)))
        .unwrap_or_default();

    let mut idx = 3;
    let mut content_type_oid = String::new();
    let mut message_digest = Vec::new();
    let mut signing_time = None;
    let mut revocation_info_der = None;
    let mut signed_attrs_der = Vec::new();

    if fields[idx].tag == 0xa0 {
        signed_attrs_der = asn1::set(fields[idx].content);
        for attr in asn1::read_all(fields[idx].content) {
            if let Some((oid, value)) = parse_attribute_value(&attr) {
                match oid.as_str() {
                    CONTENT_TYPE_OID => content_type_oid = asn1::decode_oid(value.content),
                    MESSAGE_DIGEST_OID => message_digest = value.content.to_vec(),
                    SIGNING_TIME_OID => {
                        signing_time = std::str::from_utf8(value.content).ok().and_then(|s| {
                            if value.tag == 0x17 {
                                parse_utc_time(s)
                            } else {
                                parse_generalized_time(s)
                            }
                        });
                    }
                    REVOCATION_INFO_ARCHIVAL_OID => revocation_info_der = Some(raw_tlv(&value)),
                    _ => {}
                }
            }
        }
        idx += 1;
    }

    let signature_algorithm_oid = asn1::read_all(fields[idx].content)
        .first()
        .map(|f| asn1::decode_oid(f.content))
        .unwrap_or_default();
    idx += 1;

    let signature = fields[idx].content.to_vec();
    idx += 1;

    let mut timestamp_token_der = None;
    if let Some(unsigned) = fields.get(idx) {
        if unsigned.tag == 0xa1 {
            for attr in asn1::read_all(unsigned.content) {
                if let Some((oid, value)) = parse_attribute_value(&attr) {
                    if oid == TIME_STAMP_TOKEN_OID {
                        timestamp_token_der = Some(raw_tlv(&value));
                    }
                }
            }
        }
    }

    Ok(ParsedSignerInfo {
        digest_algorithm,
        signed_attrs_der,
        content_type_oid,
        message_digest,
        signing_time,
        revocation_info_der,
        signature_algorithm_oid,
        signature,
        issuer_der,
        serial_der,
        timestamp_token_der,
    })
}

/// Parses a detached `SignedData` `ContentInfo` DER blob, as embedded in a
/// PDF signature's `/Contents`, into its certificate set and first
/// `SignerInfo`.
pub fn parse_signed_data(der: &[u8]) -> SignatureResult<ParsedSignedData> {
    let content_info = asn1::read_tlv(der).ok_or_else(|| SignatureError::Cms("malformed ContentInfo".into()))?;
    let ci_fields = asn1::read_all(content_info.content);
    let content_type = ci_fields.first().map(|f| asn1::decode_oid(f.content)).unwrap_or_default();
    if content_type != SIGNED_DATA_OID {
        return Err(SignatureError::Cms(format!("unexpected content type: {content_type}")));
    }

    let explicit_content = ci_fields.get(1).ok_or_else(|| SignatureError::Cms("ContentInfo missing content".into()))?;
    let signed_data = asn1::read_tlv(explicit_content.content)
        .ok_or_else(|| SignatureError::Cms("malformed SignedData".into()))?;
    let sd_fields = asn1::read_all(signed_data.content);
    if sd_fields.len() < 4 {
        return Err(SignatureError::Cms("SignedData missing required fields".into()));
    }

    let mut idx = 3;
    let mut certificates = Vec::new();
    if sd_fields[idx].tag == 0xa0 {
        certificates = split_top_level(sd_fields[idx].content).into_iter().map(|v| v.to_vec()).collect();
        idx += 1;
    }
    if let Some(f) = sd_fields.get(idx) {
        if f.tag == 0xa1 {
            idx += 1; // crls: unused, this crate carries revocation in signed attrs instead
        }
    }

    let signer_infos = sd_fields
        .get(idx)
        .ok_or_else(|| SignatureError::Cms("SignedData missing signerInfos".into()))?;
    let first_signer_info = split_top_level(signer_infos.content)
        .into_iter()
        .next()
        .ok_or_else(|| SignatureError::Cms("SignedData has no SignerInfo".into()))?;

    let signer_info = parse_signer_info(first_signer_info)?;

    Ok(ParsedSignedData { certificates, signer_info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::test_support;

    #[test]
    fn test_build_and_parse_round_trip_rsa() {
        let (cert, key) = test_support::self_signed_rsa("Jane Doe", 2048);
        let message_digest = DigestAlgorithm::Sha256.digest(b"document bytes");

        let attrs_input = SignedAttributesInput {
            message_digest: &message_digest,
            digest_algorithm: DigestAlgorithm::Sha256,
            end_entity: &cert,
            signing_time: Some(DateTime::parse_from_rfc3339("2026-07-29T12:00:00+00:00").unwrap()),
            revocation_info_der: None,
        };
        let signed_attrs_der = build_signed_attributes(&attrs_input);
        let attrs_digest = DigestAlgorithm::Sha256.digest(&signed_attrs_der);
        let signature_value = key.sign(&attrs_digest, DigestAlgorithm::Sha256).unwrap();

        let key_algorithm = cert.public_key_info().unwrap().algorithm;
        let sd_input = SignedDataInput {
            digest_algorithm: DigestAlgorithm::Sha256,
            key_algorithm,
            signed_attrs_der: &signed_attrs_der,
            signature_value: &signature_value,
            end_entity: &cert,
            chain: &[],
            embed_certificate_chain: true,
            timestamp_token_der: None,
        };
        let cms_der = build_signed_data(&sd_input).unwrap();

        let parsed = parse_signed_data(&cms_der).unwrap();
        assert_eq!(parsed.certificates.len(), 1);
        assert_eq!(parsed.certificates[0], cert.der_bytes());
        assert_eq!(parsed.signer_info.message_digest, message_digest);
        assert_eq!(parsed.signer_info.digest_algorithm, DigestAlgorithm::Sha256);
        assert_eq!(parsed.signer_info.signature, signature_value);
        assert!(parsed.signer_info.signing_time.is_some());

        // The re-tagged signedAttrs must hash identically to what was signed.
        assert_eq!(DigestAlgorithm::Sha256.digest(&parsed.signer_info.signed_attrs_der), attrs_digest);
    }

    #[test]
    fn test_parse_rejects_non_signed_data_content_type() {
        let bogus = asn1::sequence(&[asn1::oid(DATA_OID), asn1::context_constructed(0, &asn1::null())].concat());
        assert!(parse_signed_data(&bogus).is_err());
    }

    #[test]
    fn test_signing_certificate_v2_omits_algorithm_for_sha256() {
        let (cert, _key) = test_support::self_signed_rsa("Jane Doe", 2048);
        let attr = build_signing_certificate_attribute(DigestAlgorithm::Sha256, &cert);
        // Without the explicit AlgorithmIdentifier, the ESSCertIDv2's first
        // field is the OCTET STRING hash, not a nested SEQUENCE.
        let fields = asn1::read_all(&attr);
        let value_set = asn1::read_all(fields[1].content);
        let cert_seq = asn1::read_tlv(value_set[0].content).unwrap();
        let certs_seq = asn1::read_all(cert_seq.content);
        let ess_cert_id_v2 = asn1::read_tlv(certs_seq[0].content).unwrap();
        let inner = asn1::read_all(ess_cert_id_v2.content);
        assert_eq!(inner[0].tag, 0x04); // OCTET STRING hash directly, no AlgorithmIdentifier
    }

    #[test]
    fn test_unsigned_timestamp_attribute_embedded() {
        let (cert, key) = test_support::self_signed_rsa("Jane Doe", 2048);
        let message_digest = DigestAlgorithm::Sha256.digest(b"bytes");
        let attrs_input = SignedAttributesInput {
            message_digest: &message_digest,
            digest_algorithm: DigestAlgorithm::Sha256,
            end_entity: &cert,
            signing_time: None,
            revocation_info_der: None,
        };
        let signed_attrs_der = build_signed_attributes(&attrs_input);
        let digest = DigestAlgorithm::Sha256.digest(&signed_attrs_der);
        let signature_value = key.sign(&digest, DigestAlgorithm::Sha256).unwrap();
        let key_algorithm = cert.public_key_info().unwrap().algorithm;

        let fake_token = asn1::sequence(&asn1::oid("1.2.3.4.5"));
        let sd_input = SignedDataInput {
            digest_algorithm: DigestAlgorithm::Sha256,
            key_algorithm,
            signed_attrs_der: &signed_attrs_der,
            signature_value: &signature_value,
            end_entity: &cert,
            chain: &[],
            embed_certificate_chain: true,
            timestamp_token_der: Some(&fake_token),
        };
        let cms_der = build_signed_data(&sd_input).unwrap();
        let parsed = parse_signed_data(&cms_der).unwrap();
        assert_eq!(parsed.signer_info.timestamp_token_der, Some(fake_token));
    }
}
