//! PAdES-style digital signature support: append a CMS/PKCS#7 detached
//! signature (optionally RFC 3161 timestamped, optionally carrying OCSP/CRL
//! revocation evidence) to an existing PDF via incremental update, and
//! verify the result.
//!
//! Every signing operation here is one incremental update: the original
//! file's bytes are never touched, new indirect objects are appended after
//! them, and a new xref/trailer section chains back to the original via
//! `/Prev`. See [`crate::incremental`] for the low-level append mechanism
//! this module drives.
//!
//! ## Signing an existing PDF
//!
//! ```ignore
//! use pdf_signer::signatures::{sign_file, SignRequest, KeypairSigner, Certificate, PrivateKey};
//!
//! let cert = Certificate::from_pem_file("cert.pem")?;
//! let key = PrivateKey::from_pem_file("key.pem")?;
//! let signer = KeypairSigner::new(key, &cert)?;
//!
//! let request = SignRequest::new(Box::new(signer), cert)
//!     .reason("Approved")
//!     .location("Remote");
//!
//! sign_file("input.pdf".as_ref(), "signed.pdf".as_ref(), request)?;
//! # Ok::<(), pdf_signer::error::PdfError>(())
//! ```

mod appearance;
mod asn1;
mod catalog;
mod certificate;
mod config;
mod dictionary;
mod pkcs7;
mod placeholder;
mod revocation;
mod signer;
#[cfg(test)]
mod test_support;
mod timestamp;
mod verify;

pub use certificate::{
    Certificate, DigestAlgorithm, KeyAlgorithm, KeyType, KeypairSigner, PrivateKey, PublicKeyInfo,
    Signer,
};
pub use config::{
    AppearanceConfig, DocMdpPermission, RevocationConfig, SignatureCategory, SignatureConfig,
    TimestampConfig, VerifyOptions, DEFAULT_DOCUMENT_SIGNING_EKU,
};
pub use revocation::{
    DefaultRevocationHook, InMemoryRevocationCache, InfoArchival, RevocationCache, RevocationHook,
    RevocationStatus,
};
pub use signer::{sign, sign_file, ByteRange, DocumentSigner, SignRequest, SignReport};
pub use timestamp::timestamp_file;
pub use verify::{
    verify, verify_file, verify_with_options, CertificateReport, SignatureReport, TrustStatus,
    VerifyResponse,
};

/// Result type used throughout the signing and verification pipeline.
pub type SignatureResult<T> = crate::error::PdfResult<T>;

/// PDF signature dictionary field name constants, kept for callers that
/// build or inspect signature dictionaries directly rather than through
/// [`sign`]/[`verify`].
pub mod fields {
    /// Signature type.
    pub const TYPE: &str = "Sig";
    /// Archival timestamp type.
    pub const TYPE_DOC_TIME_STAMP: &str = "DocTimeStamp";
    /// Filter name (Adobe.PPKLite).
    pub const FILTER: &str = "Adobe.PPKLite";
    /// Sub-filter for PKCS#7 detached.
    pub const SUB_FILTER_PKCS7_DETACHED: &str = "adbe.pkcs7.detached";
    /// Sub-filter for a bare RFC 3161 archival timestamp.
    pub const SUB_FILTER_ETSI_RFC3161: &str = "ETSI.RFC3161";
}

#[cfg(test)]
pub(crate) use test_support as fixtures;
