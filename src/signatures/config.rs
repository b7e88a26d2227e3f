//! Signature configuration: what kind of signature to produce, and what
//! policy a verifier should enforce when checking one.

use super::certificate::DigestAlgorithm;
use std::time::Duration;

/// What category of signature a [`super::SignRequest`] produces, each with
/// its own `/Reference`/`TransformParams` shape and `/SigFlags` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureCategory {
    /// An author signature establishing a DocMDP permission level. Only one
    /// may exist per document, and it must be the first signature applied.
    Certification,
    /// A co-signer or approval signature; does not alter DocMDP permissions.
    Approval,
    /// A usage rights signature (`/Reference /UR3`) granting Reader
    /// extensions rather than asserting document integrity.
    UsageRights,
    /// An archival timestamp with no signing keypair: a bare RFC 3161 token
    /// embedded as a `/DocTimeStamp`.
    TimeStampOnly,
}

impl SignatureCategory {
    /// The `/SigFlags` value the AcroForm & Catalog Rewriter must set for a
    /// document carrying a signature of this category.
    pub fn sig_flags(&self) -> i64 {
        match self {
            SignatureCategory::UsageRights => 1,
            SignatureCategory::Certification | SignatureCategory::Approval | SignatureCategory::TimeStampOnly => 3,
        }
    }
}

/// DocMDP permission level a Certification signature establishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocMdpPermission {
    /// No further changes of any kind are permitted.
    NoChanges,
    /// Form fill-in and digital signatures are permitted.
    FormFillingAndSigning,
    /// Form fill-in, digital signatures, and annotations are permitted.
    FormFillingSigningAndAnnotations,
}

impl DocMdpPermission {
    /// The integer `P` value carried in the `DocMDP` `TransformParams`.
    pub fn p_value(&self) -> i64 {
        match self {
            DocMdpPermission::NoChanges => 1,
            DocMdpPermission::FormFillingAndSigning => 2,
            DocMdpPermission::FormFillingSigningAndAnnotations => 3,
        }
    }
}

/// Configuration for contacting an RFC 3161 timestamp authority.
#[derive(Debug, Clone)]
pub struct TimestampConfig {
    /// The TSA's HTTP(S) URL.
    pub url: String,
    /// Optional HTTP Basic Auth username.
    pub username: Option<String>,
    /// Optional HTTP Basic Auth password.
    pub password: Option<String>,
    /// Request timeout.
    pub timeout: Duration,
}

impl TimestampConfig {
    /// Creates a timestamp configuration pointed at the given TSA URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets HTTP Basic Auth credentials.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for acquiring revocation evidence (OCSP/CRL) before
/// finalizing the placeholder reservation.
#[derive(Debug, Clone, Default)]
pub struct RevocationConfig {
    /// Whether to embed revocation evidence in the `/Contents` CMS blob via
    /// the Adobe revocation-info signed attribute.
    pub embed_in_signature: bool,
    /// Request timeout for OCSP/CRL fetches.
    pub timeout: Duration,
}

impl RevocationConfig {
    /// Creates a revocation configuration that embeds evidence with the
    /// default 10-second fetch timeout.
    pub fn new() -> Self {
        Self {
            embed_in_signature: true,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sets the fetch timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Configuration for the visible signature widget the Visual Field
/// Synthesizer draws, if any.
#[derive(Debug, Clone)]
pub struct AppearanceConfig {
    /// Page index (0-based) the widget is placed on.
    pub page_index: usize,
    /// Widget rectangle in default user space.
    pub rect: crate::types::Rectangle,
    /// Free text rendered in the widget (signer name, reason, date, ...).
    /// `None` draws an invisible widget (no `/AP`).
    pub text: Option<String>,
    /// Raw RGB image bytes to draw as a background, if any.
    #[cfg(feature = "images")]
    pub image: Option<Vec<u8>>,
}

impl AppearanceConfig {
    /// Creates a visible text-only appearance at the given rectangle.
    pub fn visible(page_index: usize, rect: crate::types::Rectangle, text: impl Into<String>) -> Self {
        Self {
            page_index,
            rect,
            text: Some(text.into()),
            #[cfg(feature = "images")]
            image: None,
        }
    }

    /// Creates an invisible signature field: a widget with a zero-size
    /// rectangle and no appearance stream.
    pub fn invisible(page_index: usize) -> Self {
        Self {
            page_index,
            rect: crate::types::Rectangle::new(0.0, 0.0, 0.0, 0.0),
            text: None,
            #[cfg(feature = "images")]
            image: None,
        }
    }
}

/// Full configuration for one [`super::sign`]/[`super::sign_file`] call.
#[derive(Debug, Clone)]
pub struct SignatureConfig {
    /// Digest algorithm used for the message digest and signed attributes.
    pub digest_algorithm: DigestAlgorithm,
    /// The signature's category (Certification/Approval/UsageRights/TimeStampOnly).
    pub category: SignatureCategory,
    /// DocMDP permission level; only meaningful for `Certification`.
    pub docmdp_permission: DocMdpPermission,
    /// Whether to embed the full certificate chain (not just the signer's
    /// own certificate) in the CMS `certificates` set.
    pub embed_certificate_chain: bool,
    /// RFC 3161 timestamping, if configured.
    pub timestamp: Option<TimestampConfig>,
    /// Revocation evidence acquisition, if configured.
    pub revocation: Option<RevocationConfig>,
    /// Visible signature widget appearance, if configured.
    pub appearance: Option<AppearanceConfig>,
    /// Signer's display name (`/Name`).
    pub name: Option<String>,
    /// Reason for signing (`/Reason`).
    pub reason: Option<String>,
    /// Location of signing (`/Location`).
    pub location: Option<String>,
    /// Contact information (`/ContactInfo`).
    pub contact_info: Option<String>,
}

impl SignatureConfig {
    /// Creates a default Approval-category signature configuration.
    pub fn new() -> Self {
        Self {
            digest_algorithm: DigestAlgorithm::default(),
            category: SignatureCategory::Approval,
            docmdp_permission: DocMdpPermission::FormFillingAndSigning,
            embed_certificate_chain: true,
            timestamp: None,
            revocation: None,
            appearance: None,
            name: None,
            reason: None,
            location: None,
            contact_info: None,
        }
    }

    /// Sets the digest algorithm.
    pub fn digest_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.digest_algorithm = algorithm;
        self
    }

    /// Sets the signature category.
    pub fn category(mut self, category: SignatureCategory) -> Self {
        self.category = category;
        self
    }

    /// Sets the DocMDP permission level.
    pub fn docmdp_permission(mut self, permission: DocMdpPermission) -> Self {
        self.docmdp_permission = permission;
        self
    }

    /// Sets whether to embed the full certificate chain.
    pub fn embed_certificate_chain(mut self, embed: bool) -> Self {
        self.embed_certificate_chain = embed;
        self
    }

    /// Configures RFC 3161 timestamping.
    pub fn timestamp(mut self, config: TimestampConfig) -> Self {
        self.timestamp = Some(config);
        self
    }

    /// Configures revocation evidence acquisition.
    pub fn revocation(mut self, config: RevocationConfig) -> Self {
        self.revocation = Some(config);
        self
    }

    /// Configures the visible signature widget.
    pub fn appearance(mut self, config: AppearanceConfig) -> Self {
        self.appearance = Some(config);
        self
    }

    /// Sets the signer's display name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the reason for signing.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Sets the location of signing.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets contact information.
    pub fn contact_info(mut self, contact_info: impl Into<String>) -> Self {
        self.contact_info = Some(contact_info.into());
        self
    }
}

impl Default for SignatureConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The default required extended key usage OID (`id-kp-documentSigning`),
/// applied unless the verifier configures `allowed_ekus` instead.
pub const DEFAULT_DOCUMENT_SIGNING_EKU: &str = "1.3.6.1.5.5.7.3.36";

/// Policy a [`super::verify`]/[`super::verify_with_options`] call enforces.
#[derive(Debug, Clone)]
pub struct VerifyOptions {
    /// EKU OIDs of which the signing certificate must carry at least one.
    /// Defaults to `[id-kp-documentSigning]`.
    pub required_ekus: Vec<String>,
    /// EKU OIDs that are acceptable in addition to `required_ekus` without
    /// being mandatory; an EKU outside both lists produces a non-fatal
    /// warning rather than a hard failure.
    pub allowed_ekus: Vec<String>,
    /// Whether the signing certificate must carry the Digital Signature key
    /// usage bit.
    pub require_digital_signature_ku: bool,
    /// Whether the signing certificate must carry the Non-Repudiation key
    /// usage bit.
    pub require_non_repudiation: bool,
    /// Use the signature's own claimed signing time (or a valid embedded
    /// timestamp) as the verification clock instead of current time.
    pub trust_signature_time: bool,
    /// Validate the certificate chain of an embedded RFC 3161 timestamp
    /// token, not just the leaf signature.
    pub validate_timestamp_certificates: bool,
    /// Allow a chain that does not terminate at a system-trusted root,
    /// falling back to treating the embedded certificate set as trust
    /// anchors.
    pub allow_untrusted_roots: bool,
    /// Perform a live OCSP/CRL fetch during verification rather than relying
    /// solely on revocation evidence embedded in the signature.
    pub enable_external_revocation_check: bool,
    /// Minimum acceptable RSA modulus size in bits, if the leaf key is RSA.
    pub min_rsa_bits: Option<usize>,
    /// Minimum acceptable ECDSA curve size in bits, if the leaf key is ECDSA.
    pub min_ecdsa_bits: Option<usize>,
    /// Restrict acceptable leaf public key algorithms; `None` accepts any
    /// algorithm this crate can parse.
    pub allowed_public_key_algorithms: Option<Vec<String>>,
    /// Apply key-size/algorithm policy to every certificate in the chain,
    /// not just the leaf.
    pub validate_full_chain: bool,
    /// Timeout for any network request (TSA, OCSP, CRL) made during
    /// verification.
    pub http_timeout: Duration,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            required_ekus: vec![DEFAULT_DOCUMENT_SIGNING_EKU.to_string()],
            allowed_ekus: Vec::new(),
            require_digital_signature_ku: true,
            require_non_repudiation: false,
            trust_signature_time: false,
            validate_timestamp_certificates: true,
            allow_untrusted_roots: false,
            enable_external_revocation_check: false,
            min_rsa_bits: None,
            min_ecdsa_bits: None,
            allowed_public_key_algorithms: None,
            validate_full_chain: false,
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl VerifyOptions {
    /// Sets the required EKU list.
    pub fn required_ekus(mut self, ekus: Vec<String>) -> Self {
        self.required_ekus = ekus;
        self
    }

    /// Sets the additionally-allowed EKU list.
    pub fn allowed_ekus(mut self, ekus: Vec<String>) -> Self {
        self.allowed_ekus = ekus;
        self
    }

    /// Sets whether to trust the signature's own claimed or timestamped time.
    pub fn trust_signature_time(mut self, trust: bool) -> Self {
        self.trust_signature_time = trust;
        self
    }

    /// Sets whether an untrusted root chain should still be accepted by
    /// retrying against the embedded certificate set as trust anchors.
    pub fn allow_untrusted_roots(mut self, allow: bool) -> Self {
        self.allow_untrusted_roots = allow;
        self
    }

    /// Enables a live OCSP/CRL fetch during verification.
    pub fn enable_external_revocation_check(mut self, enable: bool) -> Self {
        self.enable_external_revocation_check = enable;
        self
    }

    /// Sets the minimum acceptable RSA modulus size, in bits.
    pub fn min_rsa_bits(mut self, bits: usize) -> Self {
        self.min_rsa_bits = Some(bits);
        self
    }

    /// Sets the minimum acceptable ECDSA curve size, in bits.
    pub fn min_ecdsa_bits(mut self, bits: usize) -> Self {
        self.min_ecdsa_bits = Some(bits);
        self
    }

    /// Sets the HTTP timeout applied to every network request.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_category_sig_flags() {
        assert_eq!(SignatureCategory::UsageRights.sig_flags(), 1);
        assert_eq!(SignatureCategory::Certification.sig_flags(), 3);
        assert_eq!(SignatureCategory::Approval.sig_flags(), 3);
        assert_eq!(SignatureCategory::TimeStampOnly.sig_flags(), 3);
    }

    #[test]
    fn test_docmdp_permission_p_value() {
        assert_eq!(DocMdpPermission::NoChanges.p_value(), 1);
        assert_eq!(DocMdpPermission::FormFillingAndSigning.p_value(), 2);
        assert_eq!(DocMdpPermission::FormFillingSigningAndAnnotations.p_value(), 3);
    }

    #[test]
    fn test_signature_config_builder() {
        let config = SignatureConfig::new()
            .name("Jane Doe")
            .reason("Approval")
            .category(SignatureCategory::Certification)
            .docmdp_permission(DocMdpPermission::NoChanges);

        assert_eq!(config.name, Some("Jane Doe".to_string()));
        assert_eq!(config.category, SignatureCategory::Certification);
        assert_eq!(config.docmdp_permission, DocMdpPermission::NoChanges);
    }

    #[test]
    fn test_verify_options_default() {
        let options = VerifyOptions::default();
        assert_eq!(options.required_ekus, vec![DEFAULT_DOCUMENT_SIGNING_EKU.to_string()]);
        assert!(options.require_digital_signature_ku);
        assert!(!options.require_non_repudiation);
        assert!(!options.trust_signature_time);
        assert!(options.validate_timestamp_certificates);
        assert!(!options.allow_untrusted_roots);
        assert!(!options.enable_external_revocation_check);
        assert!(!options.validate_full_chain);
        assert_eq!(options.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_appearance_config_invisible_has_zero_rect() {
        let config = AppearanceConfig::invisible(0);
        assert_eq!(config.rect.width(), 0.0);
        assert_eq!(config.rect.height(), 0.0);
        assert!(config.text.is_none());
    }
}
