//! Signature Verifier: walks a signed PDF's `/AcroForm` signature fields,
//! reconstructs each `/ByteRange`'s signed bytes, checks the embedded CMS
//! signature, builds a certificate chain out of the embedded certificate set,
//! and applies the policy checks a caller configured via [`VerifyOptions`].
//!
//! There is no native OS trust store here: a chain is "trusted" only when it
//! terminates at a certificate that is both self-signed and whose
//! self-signature verifies cryptographically against the embedded set
//! itself. Callers who just want "did this CMS blob verify against the
//! certificate it carries" set [`VerifyOptions::allow_untrusted_roots`].

use super::asn1;
use super::certificate::{Certificate, DigestAlgorithm, KeyAlgorithm};
use super::config::{RevocationConfig, VerifyOptions};
use super::fields;
use super::pkcs7;
use super::revocation::{DefaultRevocationHook, InfoArchival, RevocationStatus};
use super::signer::ByteRange;
use super::timestamp;
use super::SignatureResult;
use crate::error::{PolicyError, SignatureError, WriterError};
use crate::object::{Object, PdfDictionary};
use crate::parser::PdfReader;
use chrono::{DateTime, FixedOffset, Utc};
use std::path::Path;

/// Trust determination for a built certificate chain's root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustStatus {
    /// The chain terminates at a certificate that is self-signed and whose
    /// self-signature verifies.
    Trusted,
    /// The chain terminates at a self-signed certificate whose signature does
    /// not verify.
    Untrusted,
    /// The chain does not terminate at a self-signed certificate at all (an
    /// intermediate is missing from the embedded set).
    Unknown,
}

/// One certificate in a signature's chain, with the revocation check already
/// performed against it.
#[derive(Debug, Clone)]
pub struct CertificateReport {
    pub subject_name: String,
    pub issuer_name: String,
    pub serial_number: String,
    pub not_before: Option<DateTime<FixedOffset>>,
    pub not_after: Option<DateTime<FixedOffset>>,
    pub revocation_status: RevocationStatus,
    /// Whether the revocation time, if known, falls at or before the
    /// verification time, i.e. the certificate was already revoked when the
    /// signature claims to have been produced.
    pub revoked_before_signing: bool,
}

/// The result of verifying one `/Sig` or `/DocTimeStamp` field.
#[derive(Debug, Clone)]
pub struct SignatureReport {
    pub field_name: String,
    pub is_timestamp: bool,
    pub signer_name: String,
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// `genTime` of an embedded RFC 3161 token, whether this field is itself
    /// a `/DocTimeStamp` or an ordinary signature carrying one as an
    /// unsigned attribute.
    pub timestamp_gen_time: Option<DateTime<FixedOffset>>,
    pub signature_valid: bool,
    pub covers_whole_document: bool,
    pub byte_range: ByteRange,
    pub chain: Vec<CertificateReport>,
    pub trust_status: TrustStatus,
    /// Human-readable policy failures accumulated while checking this
    /// signature; an empty list means every configured policy passed.
    pub policy_errors: Vec<String>,
}

/// Every signature field found in a document, in document order.
#[derive(Debug, Clone, Default)]
pub struct VerifyResponse {
    pub signatures: Vec<SignatureReport>,
}

impl VerifyResponse {
    /// True when at least one signature was found and every one of them
    /// verified, covered the whole document, and passed every policy check.
    pub fn all_valid(&self) -> bool {
        !self.signatures.is_empty()
            && self
                .signatures
                .iter()
                .all(|s| s.signature_valid && s.covers_whole_document && s.policy_errors.is_empty())
    }
}

/// Verifies every signature field in `data` under the default policy.
pub fn verify(data: &[u8]) -> SignatureResult<VerifyResponse> {
    verify_with_options(data, &VerifyOptions::default())
}

/// Reads `path` and verifies every signature field under the default policy.
pub fn verify_file(path: &Path) -> SignatureResult<VerifyResponse> {
    let data = std::fs::read(path)?;
    verify(&data)
}

/// Verifies every signature field in `data` under the given policy.
pub fn verify_with_options(data: &[u8], options: &VerifyOptions) -> SignatureResult<VerifyResponse> {
    let reader = PdfReader::from_bytes(data.to_vec())?;
    let catalog = reader
        .catalog()
        .ok_or_else(|| WriterError::Structure("missing catalog".into()))?;

    let discovered = discover_signature_fields(&reader, &catalog);
    let mut signatures = Vec::with_capacity(discovered.len());
    for field in &discovered {
        signatures.push(verify_signature_field(data, field, options)?);
    }
    Ok(VerifyResponse { signatures })
}

fn resolve_obj(reader: &PdfReader, obj: &Object) -> Option<Object> {
    match obj {
        Object::Reference(id) => reader.resolve_reference(*id),
        other => Some(other.clone()),
    }
}

struct DiscoveredField {
    name: String,
    sig_dict: PdfDictionary,
}

/// Walks `/AcroForm/Fields`, recursing through `/Kids`, collecting every leaf
/// field whose `/FT` is `/Sig` and whose `/V` resolves to a dictionary. Field
/// names are joined with `.` the way Acrobat displays fully-qualified field
/// names, per the `/T` partial-name chain.
fn discover_signature_fields(reader: &PdfReader, catalog: &PdfDictionary) -> Vec<DiscoveredField> {
    let mut out = Vec::new();
    let Some(acroform_obj) = catalog.get("AcroForm") else {
        return out;
    };
    let Some(Object::Dictionary(acroform)) = resolve_obj(reader, acroform_obj) else {
        return out;
    };
    let Some(Object::Array(top_fields)) = acroform.get("Fields") else {
        return out;
    };

    for field_obj in top_fields.iter() {
        walk_field(reader, field_obj, "", &mut out);
    }
    out
}

fn walk_field(reader: &PdfReader, field_obj: &Object, parent_name: &str, out: &mut Vec<DiscoveredField>) {
    let Some(Object::Dictionary(field)) = resolve_obj(reader, field_obj) else {
        return;
    };

    let partial_name = match field.get("T") {
        Some(Object::String(s)) => String::from_utf8_lossy(s.as_bytes()).into_owned(),
        _ => String::new(),
    };
    let full_name = match (parent_name.is_empty(), partial_name.is_empty()) {
        (true, _) => partial_name,
        (false, true) => parent_name.to_string(),
        (false, false) => format!("{parent_name}.{partial_name}"),
    };

    let is_sig_field = matches!(field.get("FT"), Some(Object::Name(n)) if n.as_str() == fields::TYPE);
    if is_sig_field {
        if let Some(Object::Dictionary(sig_dict)) = field.get("V").and_then(|v| resolve_obj(reader, v)) {
            out.push(DiscoveredField { name: full_name.clone(), sig_dict });
        }
    }

    if let Some(Object::Array(kids)) = field.get("Kids") {
        for kid in kids.iter() {
            walk_field(reader, kid, &full_name, out);
        }
    }
}

fn read_byte_range(sig_dict: &PdfDictionary) -> SignatureResult<ByteRange> {
    let Some(Object::Array(arr)) = sig_dict.get("ByteRange") else {
        return Err(SignatureError::ByteRangeError("missing /ByteRange".into()).into());
    };
    if arr.len() != 4 {
        return Err(SignatureError::ByteRangeError("/ByteRange must have exactly 4 elements".into()).into());
    }
    let mut values = [0i64; 4];
    for (i, value) in values.iter_mut().enumerate() {
        *value = arr
            .get(i)
            .and_then(Object::as_integer)
            .ok_or_else(|| SignatureError::ByteRangeError("/ByteRange element is not an integer".into()))?;
    }
    Ok(ByteRange::new(values[0], values[1], values[2], values[3]))
}

fn read_contents(sig_dict: &PdfDictionary) -> SignatureResult<Vec<u8>> {
    match sig_dict.get("Contents") {
        Some(Object::String(s)) => Ok(s.as_bytes().to_vec()),
        _ => Err(SignatureError::InvalidFormat("missing /Contents".into()).into()),
    }
}

/// Walks a certificate's top-level DER structure to pull out the raw
/// `subject` `Name` TLV, mirroring the issuer/serial walk this crate's
/// signer already does.
fn extract_subject_der(cert_der: &[u8]) -> Option<Vec<u8>> {
    let cert = asn1::read_tlv(cert_der)?;
    let tbs = asn1::read_tlv(cert.content)?;
    let tbs_fields = asn1::read_all(tbs.content);

    let mut idx = 0;
    if tbs_fields.first().map(|f| f.tag) == Some(0xa0) {
        idx += 1;
    }
    let subject = tbs_fields.get(idx + 4)?;
    let mut subject_der = vec![0x30];
    subject_der.extend(asn1::encode_length(subject.content.len()));
    subject_der.extend_from_slice(subject.content);
    Some(subject_der)
}

struct CertParts {
    tbs_der: Vec<u8>,
    signature_alg_oid: String,
    signature: Vec<u8>,
}

/// Splits a whole certificate DER into its `tbsCertificate`, declared
/// signature algorithm, and raw signature bytes, for self-signature checks.
fn extract_cert_parts(cert_der: &[u8]) -> Option<CertParts> {
    let cert = asn1::read_tlv(cert_der)?;
    let fields = asn1::read_all(cert.content);
    let tbs = fields.first()?;
    let tbs_der = asn1::raw(tbs);

    let sig_alg_fields = asn1::read_all(fields.get(1)?.content);
    let signature_alg_oid = sig_alg_fields.first().map(|f| asn1::decode_oid(f.content)).unwrap_or_default();

    let sig_bits = fields.get(2)?;
    let signature = sig_bits.content.get(1..)?.to_vec(); // skip the unused-bits count byte

    Some(CertParts { tbs_der, signature_alg_oid, signature })
}

fn digest_algorithm_for_signature_oid(oid: &str) -> DigestAlgorithm {
    match oid {
        "1.2.840.113549.1.1.5" | "1.2.840.10045.4.1" => DigestAlgorithm::Sha1,
        "1.2.840.113549.1.1.12" | "1.2.840.10045.4.3.3" => DigestAlgorithm::Sha384,
        "1.2.840.113549.1.1.13" | "1.2.840.10045.4.3.4" => DigestAlgorithm::Sha512,
        _ => DigestAlgorithm::Sha256,
    }
}

fn is_self_signed(cert: &Certificate) -> bool {
    extract_subject_der(cert.der_bytes())
        .map(|subject| subject == cert.issuer_der())
        .unwrap_or(false)
}

/// Verifies a certificate's signature against its own embedded public key.
/// Unlike the CMS attrs signature (which signs a digest already hashed once
/// by the caller), an X.509 signature is produced over the raw
/// `tbsCertificate` bytes, so this passes them through unhashed.
fn verify_self_signature(cert: &Certificate) -> bool {
    let Some(parts) = extract_cert_parts(cert.der_bytes()) else {
        return false;
    };
    let Ok(public_key) = cert.public_key_info() else {
        return false;
    };
    let digest_algorithm = digest_algorithm_for_signature_oid(&parts.signature_alg_oid);
    public_key.verify(&parts.tbs_der, &parts.signature, digest_algorithm).unwrap_or(false)
}

/// Builds an issuer chain for `leaf` out of `pool` by repeatedly finding the
/// certificate whose subject matches the current issuer, stopping at the
/// first self-signed certificate or when no further issuer can be found.
fn build_chain(leaf: &Certificate, pool: &[Certificate]) -> Vec<Certificate> {
    let mut chain = Vec::new();
    let mut remaining: Vec<&Certificate> = pool.iter().collect();
    let mut current_issuer_der = leaf.issuer_der().to_vec();

    loop {
        let Some(pos) = remaining
            .iter()
            .position(|c| extract_subject_der(c.der_bytes()).map(|s| s == current_issuer_der).unwrap_or(false))
        else {
            break;
        };
        let next = remaining.remove(pos);
        let reached_root = is_self_signed(next);
        chain.push(next.clone());
        if reached_root {
            break;
        }
        current_issuer_der = next.issuer_der().to_vec();
    }
    chain
}

/// Trust is decided by the chain's last certificate: the leaf itself if no
/// intermediates were found, or the last intermediate otherwise.
fn determine_trust(leaf: &Certificate, chain: &[Certificate]) -> TrustStatus {
    let root = chain.last().unwrap_or(leaf);
    if !is_self_signed(root) {
        return TrustStatus::Unknown;
    }
    if verify_self_signature(root) {
        TrustStatus::Trusted
    } else {
        TrustStatus::Untrusted
    }
}

fn certificate_validity(cert: &Certificate) -> (Option<DateTime<FixedOffset>>, Option<DateTime<FixedOffset>>) {
    let Ok((_, parsed)) = x509_parser::parse_x509_certificate(cert.der_bytes()) else {
        return (None, None);
    };
    let validity = parsed.validity();
    (asn1_time_to_chrono(&validity.not_before), asn1_time_to_chrono(&validity.not_after))
}

fn asn1_time_to_chrono(time: &x509_parser::time::ASN1Time) -> Option<DateTime<FixedOffset>> {
    DateTime::from_timestamp(time.timestamp(), 0).map(|dt| dt.fixed_offset())
}

fn check_validity_period(cert: &Certificate, at: DateTime<FixedOffset>, errors: &mut Vec<String>) {
    let (not_before, not_after) = certificate_validity(cert);
    let outside = match (not_before, not_after) {
        (Some(nb), Some(na)) => at < nb || at > na,
        _ => false,
    };
    if outside {
        errors.push(PolicyError::OutsideValidityPeriod.to_string());
    }
}

fn check_key_usage(cert: &Certificate, options: &VerifyOptions, errors: &mut Vec<String>) {
    let Ok((_, parsed)) = x509_parser::parse_x509_certificate(cert.der_bytes()) else {
        return;
    };
    for ext in parsed.extensions() {
        if let x509_parser::extensions::ParsedExtension::KeyUsage(key_usage) = ext.parsed_extension() {
            if options.require_digital_signature_ku && !key_usage.digital_signature() {
                errors.push(PolicyError::KeyUsage("missing digitalSignature bit".into()).to_string());
            }
            if options.require_non_repudiation && !key_usage.non_repudiation() {
                errors.push(PolicyError::KeyUsage("missing nonRepudiation bit".into()).to_string());
            }
        }
    }
}

fn check_extended_key_usage(cert: &Certificate, options: &VerifyOptions, errors: &mut Vec<String>) {
    if options.required_ekus.is_empty() {
        return;
    }

    let Ok((_, parsed)) = x509_parser::parse_x509_certificate(cert.der_bytes()) else {
        errors.push(PolicyError::ExtendedKeyUsage("certificate could not be parsed".into()).to_string());
        return;
    };

    let eku_oids: Vec<String> = parsed
        .extensions()
        .iter()
        .find_map(|ext| match ext.parsed_extension() {
            x509_parser::extensions::ParsedExtension::ExtendedKeyUsage(eku) => {
                Some(eku.other.iter().map(|oid| oid.to_string()).collect())
            }
            _ => None,
        })
        .unwrap_or_default();

    let has_required = options.required_ekus.iter().any(|required| eku_oids.iter().any(|oid| oid == required));
    if !has_required {
        errors.push(
            PolicyError::ExtendedKeyUsage(format!(
                "certificate carries none of the required EKUs: {:?}",
                options.required_ekus
            ))
            .to_string(),
        );
    }
}

fn check_key_size(cert: &Certificate, options: &VerifyOptions, errors: &mut Vec<String>) {
    let Ok(public_key) = cert.public_key_info() else {
        return;
    };

    let algorithm_name = match public_key.algorithm {
        KeyAlgorithm::Rsa { modulus_bytes } => {
            if let Some(min_bits) = options.min_rsa_bits {
                let bits = modulus_bytes * 8;
                if bits < min_bits {
                    errors.push(format!("RSA key size {bits} bits below minimum {min_bits}"));
                }
            }
            "RSA"
        }
        KeyAlgorithm::EcdsaP256 => {
            if let Some(min_bits) = options.min_ecdsa_bits {
                if 256 < min_bits {
                    errors.push(format!("ECDSA P-256 key below minimum {min_bits} bits"));
                }
            }
            "ECDSA-P256"
        }
        KeyAlgorithm::EcdsaP384 => {
            if let Some(min_bits) = options.min_ecdsa_bits {
                if 384 < min_bits {
                    errors.push(format!("ECDSA P-384 key below minimum {min_bits} bits"));
                }
            }
            "ECDSA-P384"
        }
        KeyAlgorithm::Ed25519 => "Ed25519",
        KeyAlgorithm::Unknown => "Unknown",
    };

    if let Some(allowed) = &options.allowed_public_key_algorithms {
        if !allowed.iter().any(|a| a == algorithm_name) {
            errors.push(format!("public key algorithm {algorithm_name} is not in the allowed list"));
        }
    }
}

/// Parses an RFC 3161 `TimeStampToken` carried as an unsigned attribute and
/// checks its own `SignerInfo` signature against the TSA certificate it
/// embeds. Does not chain-validate the TSA certificate itself; this crate has
/// no trust store beyond what a signature's own CMS blob carries.
fn validate_embedded_timestamp_signature(token_der: &[u8]) -> SignatureResult<bool> {
    let parsed = pkcs7::parse_signed_data(token_der)?;
    let tsa_cert_der = parsed
        .certificates
        .first()
        .ok_or_else(|| SignatureError::CertificateChainInvalid("timestamp token carries no certificate".into()))?;
    let tsa_cert = Certificate::from_der(tsa_cert_der)?;
    let tsa_pubkey = tsa_cert.public_key_info()?;
    let attrs_digest = parsed.signer_info.digest_algorithm.digest(&parsed.signer_info.signed_attrs_der);
    tsa_pubkey.verify(&attrs_digest, &parsed.signer_info.signature, parsed.signer_info.digest_algorithm)
}

/// Resolves a certificate's revocation status, preferring evidence embedded
/// in the signature and falling back to a live OCSP/CRL fetch only when
/// [`VerifyOptions::enable_external_revocation_check`] is set and the
/// embedded evidence (if any) didn't mention this certificate at all.
fn revocation_status_for(
    cert: &Certificate,
    issuer: &Certificate,
    embedded: Option<&InfoArchival>,
    options: &VerifyOptions,
) -> SignatureResult<RevocationStatus> {
    if let Some(archival) = embedded {
        let status = archival.is_revoked(cert, issuer)?;
        if status != RevocationStatus::Unknown || !options.enable_external_revocation_check {
            return Ok(status);
        }
    }

    if !options.enable_external_revocation_check {
        return Ok(RevocationStatus::Unknown);
    }

    let hook = DefaultRevocationHook::new();
    let config = RevocationConfig { embed_in_signature: false, timeout: options.http_timeout };
    if let Some(ocsp) = hook.fetch_ocsp(cert, issuer, &config) {
        let archival = InfoArchival { ocsp_responses: vec![ocsp], crls: Vec::new() };
        return archival.is_revoked(cert, issuer);
    }
    if let Some(crl) = hook.fetch_crl(cert, &config) {
        let archival = InfoArchival { ocsp_responses: Vec::new(), crls: vec![crl] };
        return archival.is_revoked(cert, issuer);
    }
    Ok(RevocationStatus::Unknown)
}

fn verify_signature_field(data: &[u8], field: &DiscoveredField, options: &VerifyOptions) -> SignatureResult<SignatureReport> {
    let byte_range = read_byte_range(&field.sig_dict)?;
    let contents = read_contents(&field.sig_dict)?;

    if byte_range.offset1 < 0 || byte_range.length1 < 0 || byte_range.offset2 < 0 || byte_range.length2 < 0 {
        return Err(SignatureError::ByteRangeError("negative /ByteRange value".into()).into());
    }
    let (o1, l1, o2, l2) = (
        byte_range.offset1 as usize,
        byte_range.length1 as usize,
        byte_range.offset2 as usize,
        byte_range.length2 as usize,
    );
    let in_bounds = o1.checked_add(l1).map(|end| end <= data.len()).unwrap_or(false)
        && o2.checked_add(l2).map(|end| end <= data.len()).unwrap_or(false);
    if !in_bounds {
        return Err(SignatureError::ByteRangeError("/ByteRange exceeds document length".into()).into());
    }

    let covers_whole_document = byte_range.offset1 == 0 && o2 + l2 == data.len();
    let signed_bytes: Vec<u8> = data[o1..o1 + l1].iter().chain(data[o2..o2 + l2].iter()).copied().collect();

    let is_timestamp = matches!(
        field.sig_dict.get("Type"),
        Some(Object::Name(n)) if n.as_str() == fields::TYPE_DOC_TIME_STAMP
    );

    let parsed = pkcs7::parse_signed_data(&contents)?;
    let cert_pool: Vec<Certificate> =
        parsed.certificates.iter().filter_map(|der| Certificate::from_der(der).ok()).collect();
    let leaf = cert_pool
        .first()
        .cloned()
        .ok_or_else(|| SignatureError::CertificateChainInvalid("no certificates embedded in signature".into()))?;
    let leaf_pubkey = leaf.public_key_info()?;

    let attrs_digest = parsed.signer_info.digest_algorithm.digest(&parsed.signer_info.signed_attrs_der);
    let sig_ok = leaf_pubkey.verify(&attrs_digest, &parsed.signer_info.signature, parsed.signer_info.digest_algorithm)?;

    let mut timestamp_gen_time = None;
    let content_digest_ok = if is_timestamp {
        match timestamp::parse_tst_info(&contents) {
            Ok(tst_info) => {
                let hash_algorithm = DigestAlgorithm::from_oid(&tst_info.hash_algorithm_oid);
                let ok = tst_info.hashed_message == hash_algorithm.digest(&signed_bytes);
                timestamp_gen_time = tst_info.gen_time;
                ok
            }
            Err(_) => false,
        }
    } else {
        if let Some(token_der) = &parsed.signer_info.timestamp_token_der {
            timestamp_gen_time = timestamp::parse_tst_info(token_der).ok().and_then(|t| t.gen_time);
        }
        parsed.signer_info.message_digest == parsed.signer_info.digest_algorithm.digest(&signed_bytes)
    };

    let chain = build_chain(&leaf, &cert_pool[1..]);
    let trust_status = determine_trust(&leaf, &chain);

    let mut policy_errors = Vec::new();
    if trust_status != TrustStatus::Trusted && !options.allow_untrusted_roots {
        policy_errors.push(PolicyError::ChainNotTrusted(format!("{trust_status:?}")).to_string());
    }

    let verification_time = if options.trust_signature_time {
        timestamp_gen_time.or(parsed.signer_info.signing_time).unwrap_or_else(|| Utc::now().fixed_offset())
    } else {
        Utc::now().fixed_offset()
    };

    if !is_timestamp {
        check_validity_period(&leaf, verification_time, &mut policy_errors);
        check_key_usage(&leaf, options, &mut policy_errors);
        check_extended_key_usage(&leaf, options, &mut policy_errors);
    }
    check_key_size(&leaf, options, &mut policy_errors);

    if options.validate_full_chain {
        for cert in &chain {
            check_validity_period(cert, verification_time, &mut policy_errors);
            check_key_size(cert, options, &mut policy_errors);
        }
    }

    if options.validate_timestamp_certificates && !is_timestamp {
        if let Some(token_der) = &parsed.signer_info.timestamp_token_der {
            match validate_embedded_timestamp_signature(token_der) {
                Ok(true) => {}
                Ok(false) => policy_errors.push("embedded timestamp token signature failed verification".to_string()),
                Err(e) => policy_errors.push(format!("embedded timestamp token could not be verified: {e}")),
            }
        }
    }

    let archival = parsed.signer_info.revocation_info_der.as_deref().and_then(|der| InfoArchival::from_der(der).ok());

    let full_chain: Vec<&Certificate> = std::iter::once(&leaf).chain(chain.iter()).collect();
    let mut chain_reports = Vec::with_capacity(full_chain.len());
    for (i, cert_ref) in full_chain.iter().enumerate() {
        let cert = *cert_ref;
        let issuer = full_chain.get(i + 1).copied().unwrap_or(cert);
        let revocation_status = revocation_status_for(cert, issuer, archival.as_ref(), options)?;
        let revoked_before_signing = match &revocation_status {
            RevocationStatus::Revoked { revocation_time: Some(t) } => *t <= verification_time,
            _ => false,
        };
        if matches!(revocation_status, RevocationStatus::Revoked { .. }) {
            policy_errors.push(format!("certificate {} is revoked", cert.subject_name()));
        }
        let (not_before, not_after) = certificate_validity(cert);
        chain_reports.push(CertificateReport {
            subject_name: cert.subject_name().to_string(),
            issuer_name: cert.issuer_name().to_string(),
            serial_number: cert.serial_number().to_string(),
            not_before,
            not_after,
            revocation_status,
            revoked_before_signing,
        });
    }

    Ok(SignatureReport {
        field_name: field.name.clone(),
        is_timestamp,
        signer_name: leaf.subject_name().to_string(),
        signing_time: parsed.signer_info.signing_time,
        timestamp_gen_time,
        signature_valid: sig_ok && content_digest_ok,
        covers_whole_document,
        byte_range,
        chain: chain_reports,
        trust_status,
        policy_errors,
    })
}
