//! OCSP/CRL revocation acquisition and embedded-evidence parsing.
//!
//! A signature's `/Contents` can carry its own revocation evidence (Adobe's
//! `adbe-revocationInfoArchival` signed attribute) so a verifier never has to
//! go back online to confirm the signer's certificate wasn't revoked at
//! signing time. [`InfoArchival`] is that evidence container; [`fetch`] (via
//! a [`RevocationHook`]) is how it gets built in the first place.
//!
//! This module does not verify an OCSP responder's own signature — only the
//! certID match and status/serial are checked. Establishing responder trust
//! would mean building a second certificate chain per lookup; out of scope
//! here, same as for the CRL issuer signature.

use super::certificate::{Certificate, DigestAlgorithm, PublicKeyInfo};
use super::config::RevocationConfig;
use super::SignatureResult;
use crate::error::RevocationError;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

use super::asn1;

fn algorithm_identifier(oid_dotted: &str) -> Vec<u8> {
    asn1::sequence(&[asn1::oid(oid_dotted), asn1::null()].concat())
}

fn public_key_bits(spki_der: &[u8]) -> SignatureResult<Vec<u8>> {
    let outer = asn1::read_tlv(spki_der).ok_or_else(|| RevocationError::InvalidResponse("malformed SPKI".into()))?;
    let fields = asn1::read_all(outer.content);
    let bit_string = fields.get(1).ok_or_else(|| RevocationError::InvalidResponse("SPKI missing key bits".into()))?;
    Ok(bit_string.content.get(1..).unwrap_or_default().to_vec())
}

/// Builds a CMS/OCSP `CertID` (RFC 6960 §4.1.1), identifying a certificate by
/// a hash of its issuer's name and public key plus its own serial number.
fn build_cert_id(cert: &Certificate, issuer: &Certificate) -> SignatureResult<Vec<u8>> {
    let issuer_name_hash = DigestAlgorithm::Sha1.digest(cert.issuer_der());
    let issuer_spki = PublicKeyInfo::from_certificate_der(issuer.der_bytes())?;
    let issuer_key_hash = DigestAlgorithm::Sha1.digest(&public_key_bits(&issuer_spki.spki_der)?);

    let mut body = Vec::new();
    body.extend(algorithm_identifier(DigestAlgorithm::Sha1.oid()));
    body.extend(asn1::octet_string(&issuer_name_hash));
    body.extend(asn1::octet_string(&issuer_key_hash));
    body.extend(cert.serial_der().to_vec());
    Ok(asn1::sequence(&body))
}

fn build_ocsp_request(cert_id: &[u8]) -> Vec<u8> {
    let request = asn1::sequence(cert_id);
    let request_list = asn1::sequence(&request);
    let tbs_request = asn1::sequence(&request_list);
    asn1::sequence(&tbs_request)
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

/// Result of checking a certificate's revocation status against embedded or
/// freshly-fetched evidence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevocationStatus {
    Good,
    Revoked { revocation_time: Option<DateTime<FixedOffset>> },
    /// No evidence for this certificate was found in what's available.
    Unknown,
}

/// Extracts the single `SingleResponse` matching `cert_id` from a raw
/// `BasicOCSPResponse` DER blob, if present.
fn find_single_response_status(basic_response_der: &[u8], cert_id: &[u8]) -> Option<RevocationStatus> {
    let basic = asn1::read_tlv(basic_response_der)?;
    let basic_fields = asn1::read_all(basic.content);
    let response_data = basic_fields.first()?;
    let rd_fields = asn1::read_all(response_data.content);

    let mut idx = 0;
    if rd_fields.first()?.tag == 0xa0 {
        idx += 1; // optional version
    }
    idx += 1; // responderID (byName [1] or byKey [2])
    idx += 1; // producedAt
    let responses = rd_fields.get(idx)?;

    for single in asn1::read_all(responses.content) {
        let fields = asn1::read_all(single.content);
        let this_cert_id = fields.first()?;
        if asn1::raw(this_cert_id) != cert_id {
            continue;
        }
        let status = fields.get(1)?;
        return Some(match status.tag {
            0x80 => RevocationStatus::Good,
            0x81 => {
                let revoked_fields = asn1::read_all(status.content);
                let revocation_time = revoked_fields
                    .first()
                    .and_then(|f| std::str::from_utf8(f.content).ok())
                    .and_then(parse_generalized_time);
                RevocationStatus::Revoked { revocation_time }
            }
            _ => RevocationStatus::Unknown,
        });
    }
    None
}

/// Extracts the raw `BasicOCSPResponse` DER from an `OCSPResponse`, if the
/// responder granted a successful status.
fn extract_basic_response(ocsp_response_der: &[u8]) -> SignatureResult<Option<Vec<u8>>> {
    let outer =
        asn1::read_tlv(ocsp_response_der).ok_or_else(|| RevocationError::InvalidResponse("malformed OCSPResponse".into()))?;
    let fields = asn1::read_all(outer.content);
    let status = fields.first().map(|f| decode_integer(f.content)).unwrap_or(1);
    if status != 0 {
        return Ok(None); // not "successful"
    }
    let response_bytes = match fields.get(1) {
        Some(f) => f,
        None => return Ok(None),
    };
    let rb_outer = asn1::read_tlv(response_bytes.content)
        .ok_or_else(|| RevocationError::InvalidResponse("malformed ResponseBytes".into()))?;
    let rb_fields = asn1::read_all(rb_outer.content);
    let response_octet = rb_fields
        .get(1)
        .ok_or_else(|| RevocationError::InvalidResponse("ResponseBytes missing response".into()))?;
    Ok(Some(response_octet.content.to_vec()))
}

/// Revocation evidence container embedded as Adobe's
/// `adbe-revocationInfoArchival` signed attribute.
#[derive(Debug, Clone, Default)]
pub struct InfoArchival {
    /// Raw `BasicOCSPResponse` DER blobs.
    pub ocsp_responses: Vec<Vec<u8>>,
    /// Raw `CertificateList` (CRL) DER blobs.
    pub crls: Vec<Vec<u8>>,
}

impl InfoArchival {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ocsp_responses.is_empty() && self.crls.is_empty()
    }

    /// Combined DER byte length of the evidence, used by the placeholder
    /// sizing pass to reserve enough `/Contents` hex space.
    pub fn byte_len(&self) -> usize {
        self.ocsp_responses.iter().map(Vec::len).sum::<usize>() + self.crls.iter().map(Vec::len).sum::<usize>()
    }

    /// Builds the `RevocationInfoArchival` SEQUENCE DER for embedding as the
    /// attribute's value.
    pub fn to_der(&self) -> Vec<u8> {
        let mut body = Vec::new();
        if !self.crls.is_empty() {
            let crl_seq = asn1::sequence(&self.crls.concat());
            body.extend(asn1::context_constructed(0, &crl_seq));
        }
        if !self.ocsp_responses.is_empty() {
            let ocsp_seq = asn1::sequence(&self.ocsp_responses.concat());
            body.extend(asn1::context_constructed(1, &ocsp_seq));
        }
        asn1::sequence(&body)
    }

    /// Parses a `RevocationInfoArchival` SEQUENCE DER back into its OCSP and
    /// CRL evidence lists.
    pub fn from_der(der: &[u8]) -> SignatureResult<Self> {
        let outer = asn1::read_tlv(der).ok_or_else(|| RevocationError::InvalidResponse("malformed RevocationInfoArchival".into()))?;
        let mut ocsp_responses = Vec::new();
        let mut crls = Vec::new();
        for field in asn1::read_all(outer.content) {
            match field.tag {
                0xa0 => {
                    if let Some(seq) = asn1::read_tlv(field.content) {
                        crls = asn1::read_all(seq.content).iter().map(asn1::raw).collect();
                    }
                }
                0xa1 => {
                    if let Some(seq) = asn1::read_tlv(field.content) {
                        ocsp_responses = asn1::read_all(seq.content).iter().map(asn1::raw).collect();
                    }
                }
                _ => {}
            }
        }
        Ok(Self { ocsp_responses, crls })
    }

    /// Checks whether `cert` (whose `CertID` is built against `issuer`) is
    /// revoked according to the embedded evidence. Returns
    /// [`RevocationStatus::Unknown`] only when none of the embedded evidence
    /// mentions this certificate at all; a status is never inferred from the
    /// mere presence of revocation data.
    pub fn is_revoked(&self, cert: &Certificate, issuer: &Certificate) -> SignatureResult<RevocationStatus> {
        let cert_id = build_cert_id(cert, issuer)?;

        for ocsp_der in &self.ocsp_responses {
            if let Some(status) = find_single_response_status(ocsp_der, &cert_id) {
                return Ok(status);
            }
        }

        let target_serial = asn1::decode_integer_bytes(cert.serial_der());
        for crl_der in &self.crls {
            if let Some(status) = scan_crl_for_serial(crl_der, &target_serial)? {
                return Ok(status);
            }
        }

        Ok(RevocationStatus::Unknown)
    }
}

fn scan_crl_for_serial(crl_der: &[u8], target_serial: &[u8]) -> SignatureResult<Option<RevocationStatus>> {
    let outer = asn1::read_tlv(crl_der).ok_or_else(|| RevocationError::InvalidResponse("malformed CertificateList".into()))?;
    let fields = asn1::read_all(outer.content);
    let tbs_cert_list = fields.first().ok_or_else(|| RevocationError::InvalidResponse("CertificateList missing tbsCertList".into()))?;
    let tbs_fields = asn1::read_all(tbs_cert_list.content);

    for field in &tbs_fields {
        if field.tag != 0x30 {
            continue;
        }
        for entry in asn1::read_all(field.content) {
            let entry_fields = asn1::read_all(entry.content);
            let Some(serial_field) = entry_fields.first() else { continue };
            if serial_field.tag != 0x02 {
                continue;
            }
            if asn1::decode_integer_bytes(serial_field.content) == target_serial {
                let revocation_time = entry_fields
                    .get(1)
                    .and_then(|f| std::str::from_utf8(f.content).ok())
                    .and_then(parse_generalized_time);
                return Ok(Some(RevocationStatus::Revoked { revocation_time }));
            }
        }
    }
    Ok(None)
}

/// Caches revocation evidence across signing operations, keyed by whatever
/// the hook finds convenient (the default hook uses the certificate's
/// serial number, hex-encoded).
pub trait RevocationCache: Send + Sync {
    fn get(&self, key: &str) -> Option<InfoArchival>;
    fn put(&self, key: &str, value: InfoArchival);
}

/// An in-memory [`RevocationCache`] with no eviction or TTL, adequate for a
/// single signing run or process lifetime.
#[derive(Default)]
pub struct InMemoryRevocationCache {
    entries: Mutex<HashMap<String, InfoArchival>>,
}

impl RevocationCache for InMemoryRevocationCache {
    fn get(&self, key: &str) -> Option<InfoArchival> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn put(&self, key: &str, value: InfoArchival) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

/// Acquires revocation evidence for a certificate, given its issuer.
pub trait RevocationHook: Send + Sync {
    fn fetch(&self, cert: &Certificate, issuer: &Certificate, config: &RevocationConfig) -> SignatureResult<InfoArchival>;
}

/// The default acquisition strategy: try OCSP against the certificate's
/// first Authority Information Access URL, then fall back to its first CRL
/// distribution point. Returns an empty [`InfoArchival`] rather than an error
/// when neither is reachable, so a missing TSA/CRL never blocks signing.
#[derive(Default)]
pub struct DefaultRevocationHook {
    cache: Option<std::sync::Arc<dyn RevocationCache>>,
}

impl DefaultRevocationHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: std::sync::Arc<dyn RevocationCache>) -> Self {
        Self { cache: Some(cache) }
    }

    fn cache_key(cert: &Certificate) -> String {
        cert.serial_number().to_string()
    }

    pub(crate) fn fetch_ocsp(&self, cert: &Certificate, issuer: &Certificate, config: &RevocationConfig) -> Option<Vec<u8>> {
        let url = cert.ocsp_urls().into_iter().next()?;
        let cert_id = build_cert_id(cert, issuer).ok()?;
        let request_der = build_ocsp_request(&cert_id);

        let client = reqwest::blocking::Client::builder().timeout(config.timeout).build().ok()?;
        let response = client
            .post(&url)
            .header("Content-Type", "application/ocsp-request")
            .body(request_der)
            .send()
            .ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body = response.bytes().ok()?;
        extract_basic_response(&body).ok().flatten()
    }

    pub(crate) fn fetch_crl(&self, cert: &Certificate, config: &RevocationConfig) -> Option<Vec<u8>> {
        let url = cert.crl_distribution_points().into_iter().next()?;
        let client = reqwest::blocking::Client::builder().timeout(config.timeout).build().ok()?;
        let response = client.get(&url).send().ok()?;
        if !response.status().is_success() {
            return None;
        }
        response.bytes().ok().map(|b| b.to_vec())
    }
}

impl RevocationHook for DefaultRevocationHook {
    fn fetch(&self, cert: &Certificate, issuer: &Certificate, config: &RevocationConfig) -> SignatureResult<InfoArchival> {
        let key = Self::cache_key(cert);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&key) {
                return Ok(cached);
            }
        }

        let mut archival = InfoArchival::new();
        if let Some(ocsp) = self.fetch_ocsp(cert, issuer, config) {
            log::debug!("embedding OCSP response for certificate serial {key}");
            archival.ocsp_responses.push(ocsp);
        } else if let Some(crl) = self.fetch_crl(cert, config) {
            log::debug!("embedding CRL for certificate serial {key}");
            archival.crls.push(crl);
        } else {
            log::warn!("no revocation evidence available for certificate serial {key}");
        }

        if let Some(cache) = &self.cache {
            cache.put(&key, archival.clone());
        }
        Ok(archival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::test_support;

    #[test]
    fn test_info_archival_round_trips_der() {
        let mut archival = InfoArchival::new();
        archival.ocsp_responses.push(vec![1, 2, 3]);
        archival.crls.push(vec![4, 5, 6, 7]);

        let der = archival.to_der();
        let parsed = InfoArchival::from_der(&der).unwrap();
        assert_eq!(parsed.ocsp_responses, vec![vec![1u8, 2, 3]]);
        assert_eq!(parsed.crls, vec![vec![4u8, 5, 6, 7]]);
    }

    #[test]
    fn test_empty_archival_is_empty() {
        assert!(InfoArchival::new().is_empty());
    }

    #[test]
    fn test_is_revoked_returns_unknown_without_matching_evidence() {
        let (cert, _key) = test_support::self_signed_rsa("Leaf", 2048);
        let (issuer, _issuer_key) = test_support::self_signed_rsa("Issuer", 2048);
        let archival = InfoArchival::new();
        let status = archival.is_revoked(&cert, &issuer).unwrap();
        assert_eq!(status, RevocationStatus::Unknown);
    }

    #[test]
    fn test_scan_crl_detects_matching_serial() {
        let (cert, _key) = test_support::self_signed_rsa("Leaf", 2048);
        let serial = asn1::decode_integer_bytes(cert.serial_der());

        let revocation_date = asn1::generalized_time("20260101000000Z");
        let entry = asn1::sequence(&[asn1::integer(&serial), revocation_date].concat());
        let revoked_certificates = asn1::sequence(&entry);
        let tbs = asn1::sequence(&revoked_certificates);
        let crl = asn1::sequence(&tbs);

        let result = scan_crl_for_serial(&crl, &serial).unwrap();
        assert!(matches!(result, Some(RevocationStatus::Revoked { .. })));
    }
}
