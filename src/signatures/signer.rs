//! Signing orchestrator: wires the Signature Dictionary Builder, AcroForm &
//! Catalog Rewriter, Visual Field Synthesizer, Placeholder Planner and CMS
//! assembler together into one incremental-update signing pass.
//!
//! A signing pass always runs in at most two attempts: the first uses the
//! [`super::placeholder::PlaceholderPlanner`]'s estimate, and only retries
//! once, with a grown reservation, if the real CMS blob didn't fit — the same
//! bounded-retry shape [`super::timestamp::timestamp_file`] uses for a bare
//! archival timestamp.

use super::appearance;
use super::catalog;
use super::certificate::{Certificate, DigestAlgorithm, Signer};
use super::config::{
    AppearanceConfig, DocMdpPermission, RevocationConfig, SignatureCategory, SignatureConfig,
    TimestampConfig,
};
use super::dictionary::{write_signature_dictionary, SignatureDictionaryParams};
use super::pkcs7::{self, SignedAttributesInput, SignedDataInput};
use super::placeholder::PlaceholderPlanner;
use super::revocation::{DefaultRevocationHook, InfoArchival, RevocationHook};
use super::timestamp::{self, hex_encode};
use super::SignatureResult;
use crate::error::{SignatureError, WriterError};
use crate::incremental::{IncrementalWriter, OriginalDocument};
use crate::object::Object;
use crate::parser::PdfReader;
use crate::types::ObjectId;
use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};

/// The `/ByteRange` four-tuple a finished signature carries: `[offset1
/// length1 offset2 length2]`, describing the two spans of the document that
/// were actually hashed (everything except the `/Contents` hex string
/// itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset1: i64,
    pub length1: i64,
    pub offset2: i64,
    pub length2: i64,
}

impl ByteRange {
    pub fn new(offset1: i64, length1: i64, offset2: i64, length2: i64) -> Self {
        Self { offset1, length1, offset2, length2 }
    }
}

/// What a successful signing pass produced, beyond the signed document
/// bytes themselves: where the new objects landed, so a caller can locate
/// them without re-parsing, and what was actually reserved in case the
/// caller wants to tune a fixed placeholder size across repeated calls.
#[derive(Debug, Clone)]
pub struct SignReport {
    pub byte_range: ByteRange,
    pub signature_object: ObjectId,
    pub widget_object: ObjectId,
    pub contents_hex_len: usize,
    pub signing_time: Option<DateTime<FixedOffset>>,
    /// The full signed PDF, including every byte of the original document
    /// unchanged plus this pass's incremental update.
    pub document: Vec<u8>,
}

/// One signing request: the capability to produce a raw signature, the
/// certificate that signature is over, and everything about how to embed it.
pub struct SignRequest {
    signer: Box<dyn Signer>,
    end_entity: Certificate,
    chain: Vec<Certificate>,
    config: SignatureConfig,
    revocation_hook: Box<dyn RevocationHook>,
}

impl SignRequest {
    /// Creates a request with the default [`SignatureConfig`] (an Approval
    /// signature with no timestamp or revocation evidence) and the default
    /// [`DefaultRevocationHook`] in case revocation is configured later.
    pub fn new(signer: Box<dyn Signer>, end_entity: Certificate) -> Self {
        Self {
            signer,
            end_entity,
            chain: Vec::new(),
            config: SignatureConfig::new(),
            revocation_hook: Box::new(DefaultRevocationHook::new()),
        }
    }

    /// Sets the intermediate certificate chain (issuer first), used both for
    /// sizing the `/Contents` placeholder and, if configured, embedding in
    /// the CMS `certificates` set.
    pub fn chain(mut self, chain: Vec<Certificate>) -> Self {
        self.chain = chain;
        self
    }

    /// Appends one intermediate certificate to the chain.
    pub fn add_chain_certificate(mut self, cert: Certificate) -> Self {
        self.chain.push(cert);
        self
    }

    /// Overrides the revocation acquisition strategy.
    pub fn revocation_hook(mut self, hook: Box<dyn RevocationHook>) -> Self {
        self.revocation_hook = hook;
        self
    }

    /// Replaces the whole signature configuration at once.
    pub fn config(mut self, config: SignatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the digest algorithm.
    pub fn digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.config = self.config.digest_algorithm(algorithm);
        self
    }

    /// Sets the signature category.
    pub fn category(mut self, category: SignatureCategory) -> Self {
        self.config = self.config.category(category);
        self
    }

    /// Sets the DocMDP permission level (only meaningful for `Certification`).
    pub fn docmdp_permission(mut self, permission: DocMdpPermission) -> Self {
        self.config = self.config.docmdp_permission(permission);
        self
    }

    /// Sets whether to embed the full certificate chain.
    pub fn embed_certificate_chain(mut self, embed: bool) -> Self {
        self.config = self.config.embed_certificate_chain(embed);
        self
    }

    /// Configures RFC 3161 timestamping of the signature value.
    pub fn timestamp(mut self, config: TimestampConfig) -> Self {
        self.config = self.config.timestamp(config);
        self
    }

    /// Configures OCSP/CRL revocation evidence acquisition.
    pub fn revocation(mut self, config: RevocationConfig) -> Self {
        self.config = self.config.revocation(config);
        self
    }

    /// Configures the visible signature widget.
    pub fn appearance(mut self, config: AppearanceConfig) -> Self {
        self.config = self.config.appearance(config);
        self
    }

    /// Sets the signer's display name (`/Name`).
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.name(name);
        self
    }

    /// Sets the reason for signing (`/Reason`).
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.config = self.config.reason(reason);
        self
    }

    /// Sets the location of signing (`/Location`).
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.config = self.config.location(location);
        self
    }

    /// Sets contact information (`/ContactInfo`).
    pub fn contact_info(mut self, contact_info: impl Into<String>) -> Self {
        self.config = self.config.contact_info(contact_info);
        self
    }
}

/// Signs `original` and returns the finished document plus a report of where
/// everything landed. At most one retry is attempted if the CMS blob didn't
/// fit the planner's initial estimate.
pub fn sign(original: &[u8], request: SignRequest) -> SignatureResult<SignReport> {
    let SignRequest { signer, end_entity, chain, config, revocation_hook } = request;
    let digest_algorithm = config.digest_algorithm;
    let category = config.category;
    let timestamp_configured = config.timestamp.is_some();

    let revocation_archival = match &config.revocation {
        Some(revocation_config) => {
            let issuer = chain.first().unwrap_or(&end_entity);
            revocation_hook.fetch(&end_entity, issuer, revocation_config)?
        }
        None => InfoArchival::new(),
    };
    let revocation_der = if revocation_archival.is_empty() { None } else { Some(revocation_archival.to_der()) };

    let mut planner = PlaceholderPlanner::new();
    let mut contents_hex_len = planner.plan(
        signer.as_ref(),
        digest_algorithm,
        &end_entity,
        &chain,
        category,
        revocation_archival.byte_len(),
        timestamp_configured,
    );

    for attempt in 0..2 {
        let original_doc = OriginalDocument::inspect(original)?;
        let reader = PdfReader::from_bytes(original.to_vec())?;
        let header_version = reader.version().as_str().to_string();
        let original_catalog = reader
            .catalog()
            .ok_or_else(|| WriterError::Structure("missing catalog".into()))?;
        let existing_sig_fields = catalog::existing_acroform_fields(&original_catalog);
        let prior_sig_flags = match original_catalog.get("AcroForm") {
            Some(Object::Dictionary(acroform)) => match acroform.get("SigFlags") {
                Some(Object::Integer(n)) => *n,
                _ => 0,
            },
            _ => 0,
        };

        if category == SignatureCategory::Certification && !existing_sig_fields.is_empty() {
            return Err(SignatureError::DocMdpViolation(
                "a Certification signature must be the document's first signature".into(),
            )
            .into());
        }

        let xref_is_stream = original_doc.xref_is_stream;
        let mut writer = IncrementalWriter::new(original, original_doc);
        let sig_id = writer.allocate_id();

        let signing_time = if timestamp_configured { None } else { Some(Utc::now().fixed_offset()) };

        let params = SignatureDictionaryParams {
            is_timestamp: false,
            category,
            docmdp_permission: config.docmdp_permission,
            contents_reserved_hex_len: contents_hex_len,
            signing_time,
            name: config.name.clone(),
            reason: config.reason.clone(),
            location: config.location.clone(),
            contact_info: config.contact_info.clone(),
        };
        let placeholders = write_signature_dictionary(&mut writer, sig_id, &params)?;

        let field_name = format!("Signature{}", existing_sig_fields.len() + 1);
        let appearance_config = config
            .appearance
            .clone()
            .unwrap_or_else(|| AppearanceConfig::invisible(0));
        let synthesized =
            appearance::synthesize_widget(&mut writer, &reader, &appearance_config, &field_name, sig_id)?;

        let sig_flags = prior_sig_flags | category.sig_flags();
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
        let byte_range_text = format!("0 {:<10} {:<10} {:<10}", l1, o2, l2);
        debug_assert_eq!(byte_range_text.len(), placeholders.byte_range_content_len);
        let br_start = placeholders.byte_range_start as usize;
        buffer[br_start..br_start + byte_range_text.len()].copy_from_slice(byte_range_text.as_bytes());

        let signed_bytes: Vec<u8> =
            buffer[..l1 as usize].iter().chain(buffer[o2 as usize..].iter()).copied().collect();
        let message_digest = digest_algorithm.digest(&signed_bytes);

        let attrs_input = SignedAttributesInput {
            message_digest: &message_digest,
            digest_algorithm,
            end_entity: &end_entity,
            signing_time,
            revocation_info_der: revocation_der.as_deref(),
        };
        let signed_attrs_der = pkcs7::build_signed_attributes(&attrs_input);
        let attrs_digest = digest_algorithm.digest(&signed_attrs_der);
        let signature_value = signer.sign(&attrs_digest, digest_algorithm)?;

        let timestamp_token_der = match &config.timestamp {
            Some(ts_config) => {
                Some(timestamp::request_timestamp_token(&signature_value, ts_config, digest_algorithm)?)
            }
            None => None,
        };

        let key_algorithm = signer.public_key().algorithm;
        let sd_input = SignedDataInput {
            digest_algorithm,
            key_algorithm,
            signed_attrs_der: &signed_attrs_der,
            signature_value: &signature_value,
            end_entity: &end_entity,
            chain: &chain,
            embed_certificate_chain: config.embed_certificate_chain,
            timestamp_token_der: timestamp_token_der.as_deref(),
        };
        let cms_der = pkcs7::build_signed_data(&sd_input)?;
        let hex = hex_encode(&cms_der);

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

        return Ok(SignReport {
            byte_range: ByteRange::new(0, l1 as i64, o2 as i64, l2 as i64),
            signature_object: sig_id,
            widget_object: synthesized.widget_id,
            contents_hex_len,
            signing_time,
            document: buffer,
        });
    }

    unreachable!("loop always returns within two attempts")
}

/// Reads `input_path`, signs it, and writes the result to `output_path`.
pub fn sign_file(input_path: &Path, output_path: &Path, request: SignRequest) -> SignatureResult<SignReport> {
    let original = std::fs::read(input_path)?;
    let report = sign(&original, request)?;
    std::fs::write(output_path, &report.document)?;
    Ok(report)
}

/// A fluent, teacher-style convenience wrapper over [`SignRequest`]/[`sign`]
/// for callers that would rather build up a signer from a certificate and
/// private key directly than construct a [`super::KeypairSigner`] themselves.
pub struct DocumentSigner {
    input_path: Option<PathBuf>,
    bytes: Option<Vec<u8>>,
    certificate: Option<Certificate>,
    chain: Vec<Certificate>,
    private_key: Option<super::certificate::PrivateKey>,
    config: SignatureConfig,
    revocation_hook: Box<dyn RevocationHook>,
}

impl DocumentSigner {
    /// Creates a signer over the bytes of an existing PDF file.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self {
            input_path: Some(path.as_ref().to_path_buf()),
            bytes: None,
            certificate: None,
            chain: Vec::new(),
            private_key: None,
            config: SignatureConfig::new(),
            revocation_hook: Box::new(DefaultRevocationHook::new()),
        }
    }

    /// Creates a signer over an in-memory PDF.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            input_path: None,
            bytes: Some(bytes),
            certificate: None,
            chain: Vec::new(),
            private_key: None,
            config: SignatureConfig::new(),
            revocation_hook: Box::new(DefaultRevocationHook::new()),
        }
    }

    /// Sets the signer's certificate.
    pub fn certificate(mut self, cert: Certificate) -> Self {
        self.certificate = Some(cert);
        self
    }

    /// Adds a certificate to the chain.
    pub fn add_chain_certificate(mut self, cert: Certificate) -> Self {
        self.chain.push(cert);
        self
    }

    /// Sets the private key.
    pub fn private_key(mut self, key: super::certificate::PrivateKey) -> Self {
        self.private_key = Some(key);
        self
    }

    /// Sets the signer's display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config = self.config.name(name);
        self
    }

    /// Sets the reason for signing.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.config = self.config.reason(reason);
        self
    }

    /// Sets the location of signing.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.config = self.config.location(location);
        self
    }

    /// Sets contact information.
    pub fn contact_info(mut self, info: impl Into<String>) -> Self {
        self.config = self.config.contact_info(info);
        self
    }

    /// Sets the full signature configuration at once.
    pub fn config(mut self, config: SignatureConfig) -> Self {
        self.config = config;
        self
    }

    /// Overrides the revocation acquisition strategy.
    pub fn revocation_hook(mut self, hook: Box<dyn RevocationHook>) -> Self {
        self.revocation_hook = hook;
        self
    }

    fn into_request(self) -> SignatureResult<(Vec<u8>, SignRequest)> {
        let certificate = self
            .certificate
            .ok_or_else(|| SignatureError::SigningFailed("certificate not set".to_string()))?;
        let private_key = self
            .private_key
            .ok_or_else(|| SignatureError::SigningFailed("private key not set".to_string()))?;
        let bytes = match self.bytes {
            Some(bytes) => bytes,
            None => {
                let path = self
                    .input_path
                    .ok_or_else(|| SignatureError::SigningFailed("no input document set".to_string()))?;
                std::fs::read(path)?
            }
        };

        let keypair_signer = super::certificate::KeypairSigner::new(private_key, &certificate)?;
        let request = SignRequest {
            signer: Box::new(keypair_signer),
            end_entity: certificate,
            chain: self.chain,
            config: self.config,
            revocation_hook: self.revocation_hook,
        };
        Ok((bytes, request))
    }

    /// Signs the document and returns the finished bytes plus a report.
    pub fn sign(self) -> SignatureResult<SignReport> {
        let (bytes, request) = self.into_request()?;
        sign(&bytes, request)
    }

    /// Signs the document and writes the result to `output_path`.
    pub fn sign_to_file(self, output_path: impl AsRef<Path>) -> SignatureResult<SignReport> {
        let report = self.sign()?;
        std::fs::write(output_path, &report.document)?;
        Ok(report)
    }
}
