//! X.509 certificate and private key handling, plus the [`Signer`] capability
//! trait that decouples the signing pipeline from where a private key lives.

use super::asn1;
use super::SignatureResult;
use crate::error::SignatureError;
use std::fs;
use std::path::Path;

/// An X.509 certificate for PDF signing.
#[derive(Debug, Clone)]
pub struct Certificate {
    /// The raw DER-encoded certificate bytes.
    der_bytes: Vec<u8>,
    /// The certificate subject name (common name).
    subject_name: String,
    /// The certificate issuer name.
    issuer_name: String,
    /// Serial number as hex string.
    serial_number: String,
    /// Raw DER bytes of the issuer `Name`, used for the ESS `IssuerSerial`
    /// and for chain-building comparisons.
    issuer_der: Vec<u8>,
    /// Raw DER bytes of the `INTEGER` serial number.
    serial_der: Vec<u8>,
}

impl Certificate {
    /// Loads a certificate from a PEM file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> SignatureResult<Self> {
        let pem_data = fs::read_to_string(path.as_ref()).map_err(|e| {
            SignatureError::CertificateLoadFailed(format!("Failed to read file: {}", e))
        })?;

        Self::from_pem(&pem_data)
    }

    /// Loads a certificate from PEM data.
    pub fn from_pem(pem_data: &str) -> SignatureResult<Self> {
        let der_bytes = pem_to_der(pem_data, "CERTIFICATE")?;
        Self::from_der(&der_bytes)
    }

    /// Loads a certificate from DER bytes.
    pub fn from_der(der_bytes: &[u8]) -> SignatureResult<Self> {
        use der::Decode;
        use x509_cert::Certificate as X509Cert;

        let cert = X509Cert::from_der(der_bytes).map_err(|e| {
            SignatureError::CertificateLoadFailed(format!("Failed to parse certificate: {}", e))
        })?;

        let subject_name = extract_common_name(&cert.tbs_certificate.subject)
            .unwrap_or_else(|| "Unknown".to_string());
        let issuer_name = extract_common_name(&cert.tbs_certificate.issuer)
            .unwrap_or_else(|| "Unknown".to_string());
        let serial_bytes = cert.tbs_certificate.serial_number.as_bytes();
        let serial_number = serial_bytes.iter().map(|b| format!("{:02X}", b)).collect();

        // Re-derive the raw issuer Name and serial INTEGER TLVs directly from
        // the DER so the ESS IssuerSerial / chain comparisons use exactly the
        // bytes the certificate carries, not a re-encoding.
        let (issuer_der, serial_der) = extract_issuer_and_serial_der(der_bytes)
            .unwrap_or_else(|| (Vec::new(), asn1::integer(serial_bytes)));

        Ok(Self {
            der_bytes: der_bytes.to_vec(),
            subject_name,
            issuer_name,
            serial_number,
            issuer_der,
            serial_der,
        })
    }

    /// Returns the subject name (common name).
    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    /// Returns the issuer name.
    pub fn issuer_name(&self) -> &str {
        &self.issuer_name
    }

    /// Returns the serial number as hex string.
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    /// Returns the raw DER-encoded bytes.
    pub fn der_bytes(&self) -> &[u8] {
        &self.der_bytes
    }

    /// Raw DER bytes of the issuer `Name` SEQUENCE (for `IssuerAndSerialNumber`).
    pub fn issuer_der(&self) -> &[u8] {
        &self.issuer_der
    }

    /// Raw DER bytes of the serial number `INTEGER`.
    pub fn serial_der(&self) -> &[u8] {
        &self.serial_der
    }

    /// Extracts this certificate's public key algorithm and raw key material,
    /// used by the placeholder planner and the CMS signer.
    pub fn public_key_info(&self) -> SignatureResult<PublicKeyInfo> {
        PublicKeyInfo::from_certificate_der(&self.der_bytes)
    }

    /// `OCSPServer` URLs from the Authority Information Access extension, if
    /// present.
    pub fn ocsp_urls(&self) -> Vec<String> {
        x509_parser::parse_x509_certificate(&self.der_bytes)
            .ok()
            .and_then(|(_, cert)| cert.authority_info_access().ok().flatten())
            .map(|aia| {
                aia.value
                    .accessdescs
                    .iter()
                    .filter(|ad| ad.access_method == x509_parser::oid_registry::OID_PKIX_ACCESS_DESCRIPTOR_OCSP)
                    .filter_map(|ad| match &ad.access_location {
                        x509_parser::extensions::GeneralName::URI(uri) => Some(uri.to_string()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `CRLDistributionPoint` URLs, if present.
    pub fn crl_distribution_points(&self) -> Vec<String> {
        x509_parser::parse_x509_certificate(&self.der_bytes)
            .ok()
            .and_then(|(_, cert)| cert.extensions().iter().find_map(|ext| match ext.parsed_extension() {
                x509_parser::extensions::ParsedExtension::CRLDistributionPoints(points) => Some(
                    points
                        .iter()
                        .filter_map(|point| point.distribution_point.as_ref())
                        .filter_map(|name| match name {
                            x509_parser::extensions::DistributionPointName::FullName(names) => {
                                names.iter().find_map(|n| match n {
                                    x509_parser::extensions::GeneralName::URI(uri) => Some(uri.to_string()),
                                    _ => None,
                                })
                            }
                            _ => None,
                        })
                        .collect::<Vec<_>>(),
                ),
                _ => None,
            }))
            .unwrap_or_default()
    }
}

/// The digest algorithm used when hashing the signed bytes and signed
/// attributes of a CMS `SignerInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestAlgorithm {
    /// SHA-1 (legacy; kept for `ESSCertID` v1 compatibility).
    Sha1,
    /// SHA-256 (default).
    #[default]
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl DigestAlgorithm {
    /// The `AlgorithmIdentifier` OID for this digest.
    pub fn oid(&self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "1.3.14.3.2.26",
            DigestAlgorithm::Sha256 => "2.16.840.1.101.3.4.2.1",
            DigestAlgorithm::Sha384 => "2.16.840.1.101.3.4.2.2",
            DigestAlgorithm::Sha512 => "2.16.840.1.101.3.4.2.3",
        }
    }

    /// The digest's output length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Hashes `data` with this algorithm.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        use sha2::Digest as _;
        match self {
            DigestAlgorithm::Sha1 => {
                use sha1::Digest as _;
                sha1::Sha1::digest(data).to_vec()
            }
            DigestAlgorithm::Sha256 => sha2::Sha256::digest(data).to_vec(),
            DigestAlgorithm::Sha384 => sha2::Sha384::digest(data).to_vec(),
            DigestAlgorithm::Sha512 => sha2::Sha512::digest(data).to_vec(),
        }
    }

    /// Parses from an OID string, defaulting to SHA-256 for unrecognized
    /// values (used when reading back an RFC 3161 message imprint algorithm).
    pub fn from_oid(oid: &str) -> Self {
        match oid {
            "1.3.14.3.2.26" => DigestAlgorithm::Sha1,
            "2.16.840.1.101.3.4.2.2" => DigestAlgorithm::Sha384,
            "2.16.840.1.101.3.4.2.3" => DigestAlgorithm::Sha512,
            _ => DigestAlgorithm::Sha256,
        }
    }
}

/// The public-key algorithm and size of a certificate or signer, used by the
/// placeholder planner (§4.3) and by the CMS signature algorithm identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// RSA with the given modulus size in bytes (`N/8`).
    Rsa { modulus_bytes: usize },
    /// ECDSA over NIST P-256.
    EcdsaP256,
    /// ECDSA over NIST P-384.
    EcdsaP384,
    /// Ed25519.
    Ed25519,
    /// A key type this crate does not recognize; sizing falls back to a
    /// generous constant rather than guessing.
    Unknown,
}

impl KeyAlgorithm {
    /// Raw signature byte length this key type produces, per the placeholder
    /// planner's table in §4.3. Regression guard: this MUST be derived from
    /// the key itself, never from a CA's certificate signature algorithm.
    pub fn raw_signature_len(&self) -> usize {
        match self {
            KeyAlgorithm::Rsa { modulus_bytes } => *modulus_bytes,
            KeyAlgorithm::EcdsaP256 => 2 * ((256 + 7) / 8) + 9,
            KeyAlgorithm::EcdsaP384 => 2 * ((384 + 7) / 8) + 9,
            KeyAlgorithm::Ed25519 => 64,
            KeyAlgorithm::Unknown => 8192,
        }
    }

    /// The `signatureAlgorithm` OID for this key type under the given digest.
    pub fn signature_oid(&self, digest: DigestAlgorithm) -> SignatureResult<&'static str> {
        Ok(match self {
            KeyAlgorithm::Rsa { .. } => match digest {
                DigestAlgorithm::Sha1 => "1.2.840.113549.1.1.5",
                DigestAlgorithm::Sha256 => "1.2.840.113549.1.1.11",
                DigestAlgorithm::Sha384 => "1.2.840.113549.1.1.12",
                DigestAlgorithm::Sha512 => "1.2.840.113549.1.1.13",
            },
            KeyAlgorithm::EcdsaP256 | KeyAlgorithm::EcdsaP384 => match digest {
                DigestAlgorithm::Sha1 => "1.2.840.10045.4.1",
                DigestAlgorithm::Sha256 => "1.2.840.10045.4.3.2",
                DigestAlgorithm::Sha384 => "1.2.840.10045.4.3.3",
                DigestAlgorithm::Sha512 => "1.2.840.10045.4.3.4",
            },
            KeyAlgorithm::Ed25519 => "1.3.101.112",
            KeyAlgorithm::Unknown => {
                return Err(SignatureError::UnsupportedAlgorithm(
                    "unknown key algorithm".into(),
                ))
            }
        })
    }
}

/// Algorithm and raw key material for a certificate or signer's public key.
#[derive(Debug, Clone)]
pub struct PublicKeyInfo {
    /// The key's algorithm and size.
    pub algorithm: KeyAlgorithm,
    /// The `SubjectPublicKeyInfo` DER bytes, as carried in the certificate.
    pub spki_der: Vec<u8>,
}

impl PublicKeyInfo {
    /// Extracts the public key algorithm from a certificate's DER bytes by
    /// walking its `SubjectPublicKeyInfo`.
    pub fn from_certificate_der(cert_der: &[u8]) -> SignatureResult<Self> {
        use der::Decode;
        use x509_cert::Certificate as X509Cert;

        let cert = X509Cert::from_der(cert_der).map_err(|e| {
            SignatureError::CertificateLoadFailed(format!("Failed to parse certificate: {}", e))
        })?;

        let spki = &cert.tbs_certificate.subject_public_key_info;
        let alg_oid = spki.algorithm.oid.to_string();
        let params_oid = spki
            .algorithm
            .parameters
            .as_ref()
            .and_then(|any| any.decode_as::<der::asn1::ObjectIdentifier>().ok())
            .map(|oid| oid.to_string());
        let key_bits = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| SignatureError::CertificateLoadFailed("non-octet public key bits".into()))?;

        let algorithm = classify_key_algorithm(&alg_oid, params_oid.as_deref(), key_bits);

        Ok(Self {
            algorithm,
            spki_der: spki
                .to_der()
                .map_err(|e| SignatureError::CertificateLoadFailed(e.to_string()))?,
        })
    }

    /// Verifies a raw signature over `message_digest` against this public
    /// key, dispatching on key type exactly the way [`PrivateKey::sign`]
    /// dispatches on the way out. Used by the verifier to check a CMS
    /// `SignerInfo`'s signature against the embedded end-entity certificate,
    /// and by the timestamp verifier against a TSA certificate.
    pub fn verify(
        &self,
        message_digest: &[u8],
        signature_bytes: &[u8],
        digest_algorithm: DigestAlgorithm,
    ) -> SignatureResult<bool> {
        match self.algorithm {
            KeyAlgorithm::Rsa { .. } => self.verify_rsa(message_digest, signature_bytes, digest_algorithm),
            KeyAlgorithm::EcdsaP256 => self.verify_ecdsa_p256(message_digest, signature_bytes),
            KeyAlgorithm::EcdsaP384 => self.verify_ecdsa_p384(message_digest, signature_bytes),
            KeyAlgorithm::Ed25519 => self.verify_ed25519(message_digest, signature_bytes),
            KeyAlgorithm::Unknown => Err(SignatureError::UnsupportedAlgorithm("unknown key algorithm".into())),
        }
    }

    fn verify_rsa(&self, data: &[u8], signature_bytes: &[u8], digest_algorithm: DigestAlgorithm) -> SignatureResult<bool> {
        use pkcs8::DecodePublicKey;
        use rsa::RsaPublicKey;
        use signature::Verifier as _;

        let public_key = RsaPublicKey::from_public_key_der(&self.spki_der)
            .map_err(|e| SignatureError::VerificationFailed(format!("failed to parse RSA public key: {}", e)))?;
        let signature = rsa::pkcs1v15::Signature::try_from(signature_bytes)
            .map_err(|e| SignatureError::VerificationFailed(format!("malformed RSA signature: {}", e)))?;

        let ok = match digest_algorithm {
            DigestAlgorithm::Sha1 => {
                rsa::pkcs1v15::VerifyingKey::<sha1::Sha1>::new(public_key).verify(data, &signature).is_ok()
            }
            DigestAlgorithm::Sha256 => {
                rsa::pkcs1v15::VerifyingKey::<sha2::Sha256>::new(public_key).verify(data, &signature).is_ok()
            }
            DigestAlgorithm::Sha384 => {
                rsa::pkcs1v15::VerifyingKey::<sha2::Sha384>::new(public_key).verify(data, &signature).is_ok()
            }
            DigestAlgorithm::Sha512 => {
                rsa::pkcs1v15::VerifyingKey::<sha2::Sha512>::new(public_key).verify(data, &signature).is_ok()
            }
        };
        Ok(ok)
    }

    fn verify_ecdsa_p256(&self, data: &[u8], signature_bytes: &[u8]) -> SignatureResult<bool> {
        use p256::ecdsa::{Signature, VerifyingKey};
        use pkcs8::DecodePublicKey;
        use signature::Verifier as _;

        let verifying_key = VerifyingKey::from_public_key_der(&self.spki_der)
            .map_err(|e| SignatureError::VerificationFailed(format!("failed to parse ECDSA P-256 public key: {}", e)))?;
        let signature = Signature::from_der(signature_bytes)
            .map_err(|e| SignatureError::VerificationFailed(format!("malformed ECDSA signature: {}", e)))?;
        Ok(verifying_key.verify(data, &signature).is_ok())
    }

    fn verify_ecdsa_p384(&self, data: &[u8], signature_bytes: &[u8]) -> SignatureResult<bool> {
        use p384::ecdsa::{Signature, VerifyingKey};
        use pkcs8::DecodePublicKey;
        use signature::Verifier as _;

        let verifying_key = VerifyingKey::from_public_key_der(&self.spki_der)
            .map_err(|e| SignatureError::VerificationFailed(format!("failed to parse ECDSA P-384 public key: {}", e)))?;
        let signature = Signature::from_der(signature_bytes)
            .map_err(|e| SignatureError::VerificationFailed(format!("malformed ECDSA signature: {}", e)))?;
        Ok(verifying_key.verify(data, &signature).is_ok())
    }

    fn verify_ed25519(&self, data: &[u8], signature_bytes: &[u8]) -> SignatureResult<bool> {
        use ed25519_dalek::{Signature, Verifier as _, VerifyingKey};
        use pkcs8::DecodePublicKey;

        let verifying_key = VerifyingKey::from_public_key_der(&self.spki_der)
            .map_err(|e| SignatureError::VerificationFailed(format!("failed to parse Ed25519 public key: {}", e)))?;
        let signature = Signature::from_slice(signature_bytes)
            .map_err(|e| SignatureError::VerificationFailed(format!("malformed Ed25519 signature: {}", e)))?;
        Ok(verifying_key.verify(data, &signature).is_ok())
    }
}

fn classify_key_algorithm(alg_oid: &str, params_oid: Option<&str>, key_bits: &[u8]) -> KeyAlgorithm {
    const RSA_OID: &str = "1.2.840.113549.1.1.1";
    const EC_OID: &str = "1.2.840.10045.2.1";
    const ED25519_OID: &str = "1.3.101.112";
    const P256_OID: &str = "1.2.840.10045.3.1.7";
    const P384_OID: &str = "1.3.132.0.34";

    match alg_oid {
        RSA_OID => {
            let modulus_bytes = rsa_modulus_len(key_bits).unwrap_or(256);
            KeyAlgorithm::Rsa { modulus_bytes }
        }
        EC_OID => match params_oid {
            Some(P256_OID) => KeyAlgorithm::EcdsaP256,
            Some(P384_OID) => KeyAlgorithm::EcdsaP384,
            _ => KeyAlgorithm::Unknown,
        },
        ED25519_OID => KeyAlgorithm::Ed25519,
        _ => KeyAlgorithm::Unknown,
    }
}

/// Reads the modulus length, in bytes, out of a DER `RSAPublicKey` structure
/// (`SEQUENCE { INTEGER n, INTEGER e }`).
fn rsa_modulus_len(rsa_public_key_der: &[u8]) -> Option<usize> {
    let outer = asn1::read_tlv(rsa_public_key_der)?;
    let fields = asn1::read_all(outer.content);
    let modulus = fields.first()?;
    Some(asn1::decode_integer_bytes(modulus.content).len())
}

/// Capability trait for something that can produce a raw signature over a
/// digest, independent of where the private key material lives. The default
/// in-process implementation is [`KeypairSigner`]; HSM/KMS-backed signers
/// implement this trait themselves.
pub trait Signer {
    /// The public key this signer will produce signatures for; used for
    /// placeholder sizing and for matching against the embedded certificate.
    fn public_key(&self) -> &PublicKeyInfo;

    /// Produces a raw signature over `digest`, which has already been hashed
    /// with `digest_algorithm` for algorithms that sign pre-hashed input
    /// (RSA, ECDSA); signers whose scheme hashes the message itself
    /// (Ed25519) are free to treat `digest` as the message to hash.
    fn sign(&self, digest: &[u8], digest_algorithm: DigestAlgorithm) -> SignatureResult<Vec<u8>>;
}

/// Default [`Signer`] implementation wrapping an in-process [`PrivateKey`].
pub struct KeypairSigner {
    private_key: PrivateKey,
    public_key: PublicKeyInfo,
}

impl KeypairSigner {
    /// Builds a signer from a private key and the certificate carrying its
    /// matching public key.
    pub fn new(private_key: PrivateKey, certificate: &Certificate) -> SignatureResult<Self> {
        let public_key = certificate.public_key_info()?;
        Ok(Self {
            private_key,
            public_key,
        })
    }
}

impl Signer for KeypairSigner {
    fn public_key(&self) -> &PublicKeyInfo {
        &self.public_key
    }

    fn sign(&self, digest: &[u8], digest_algorithm: DigestAlgorithm) -> SignatureResult<Vec<u8>> {
        self.private_key.sign(digest, digest_algorithm)
    }
}

/// A private key for PDF signing.
#[derive(Clone)]
pub struct PrivateKey {
    /// The key type.
    key_type: KeyType,
    /// Raw key bytes (DER encoded, PKCS#8 unless noted otherwise).
    der_bytes: Vec<u8>,
}

/// The type of private key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// RSA private key.
    Rsa,
    /// ECDSA P-256 private key.
    EcdsaP256,
    /// ECDSA P-384 private key.
    EcdsaP384,
    /// Ed25519 private key.
    Ed25519,
}

impl PrivateKey {
    /// Loads a private key from a PEM file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> SignatureResult<Self> {
        let pem_data = fs::read_to_string(path.as_ref()).map_err(|e| {
            SignatureError::PrivateKeyLoadFailed(format!("Failed to read file: {}", e))
        })?;

        Self::from_pem(&pem_data)
    }

    /// Loads a private key from PEM data.
    pub fn from_pem(pem_data: &str) -> SignatureResult<Self> {
        // Try PKCS#8 format first; this is the only form that carries an
        // algorithm OID unambiguous enough to cover all four key types.
        if pem_data.contains("BEGIN PRIVATE KEY") {
            let der_bytes = pem_to_der(pem_data, "PRIVATE KEY")?;
            return Self::from_pkcs8_der(&der_bytes);
        }

        // Legacy RSA private key format (PKCS#1).
        if pem_data.contains("BEGIN RSA PRIVATE KEY") {
            let der_bytes = pem_to_der(pem_data, "RSA PRIVATE KEY")?;
            let pkcs8_der = wrap_pkcs1_rsa_as_pkcs8(&der_bytes)?;
            return Ok(Self {
                key_type: KeyType::Rsa,
                der_bytes: pkcs8_der,
            });
        }

        // Legacy SEC1 EC private key format; only P-256 is unambiguous
        // without decoding the embedded curve OID parameter, which SEC1
        // carries optionally.
        if pem_data.contains("BEGIN EC PRIVATE KEY") {
            let der_bytes = pem_to_der(pem_data, "EC PRIVATE KEY")?;
            let pkcs8_der = wrap_sec1_ec_as_pkcs8(&der_bytes)?;
            return Ok(Self {
                key_type: KeyType::EcdsaP256,
                der_bytes: pkcs8_der,
            });
        }

        Err(SignatureError::PrivateKeyLoadFailed(
            "Unsupported private key format".to_string(),
        ))
    }

    /// Loads a private key from PKCS#8 DER bytes.
    pub(crate) fn from_pkcs8_der(der_bytes: &[u8]) -> SignatureResult<Self> {
        use der::Decode;
        use pkcs8::PrivateKeyInfo;

        let key_info = PrivateKeyInfo::from_der(der_bytes).map_err(|e| {
            SignatureError::PrivateKeyLoadFailed(format!("Failed to parse PKCS#8 key: {}", e))
        })?;

        let oid = key_info.algorithm.oid;
        let rsa_oid = const_oid::ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
        let ec_oid = const_oid::ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");
        let ed25519_oid = const_oid::ObjectIdentifier::new_unwrap("1.3.101.112");
        let p256_oid = const_oid::ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
        let p384_oid = const_oid::ObjectIdentifier::new_unwrap("1.3.132.0.34");

        let key_type = if oid == rsa_oid {
            KeyType::Rsa
        } else if oid == ec_oid {
            let curve_oid = key_info
                .algorithm
                .parameters
                .as_ref()
                .and_then(|p| p.decode_as::<der::asn1::ObjectIdentifier>().ok());
            match curve_oid {
                Some(c) if c == p256_oid => KeyType::EcdsaP256,
                Some(c) if c == p384_oid => KeyType::EcdsaP384,
                _ => {
                    return Err(SignatureError::PrivateKeyLoadFailed(
                        "unsupported or missing EC curve parameter".into(),
                    ))
                }
            }
        } else if oid == ed25519_oid {
            KeyType::Ed25519
        } else {
            return Err(SignatureError::PrivateKeyLoadFailed(format!(
                "Unsupported key algorithm OID: {}",
                oid
            )));
        };

        Ok(Self {
            key_type,
            der_bytes: der_bytes.to_vec(),
        })
    }

    /// Returns the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Returns the raw DER-encoded bytes (PKCS#8).
    pub fn der_bytes(&self) -> &[u8] {
        &self.der_bytes
    }

    /// Signs `digest` (pre-hashed for RSA/ECDSA, raw message for Ed25519)
    /// under the given digest algorithm.
    pub fn sign(&self, digest: &[u8], digest_algorithm: DigestAlgorithm) -> SignatureResult<Vec<u8>> {
        match self.key_type {
            KeyType::Rsa => self.sign_rsa(digest, digest_algorithm),
            KeyType::EcdsaP256 => self.sign_ecdsa_p256(digest),
            KeyType::EcdsaP384 => self.sign_ecdsa_p384(digest),
            KeyType::Ed25519 => self.sign_ed25519(digest),
        }
    }

    fn sign_rsa(&self, data: &[u8], digest_algorithm: DigestAlgorithm) -> SignatureResult<Vec<u8>> {
        use pkcs8::DecodePrivateKey;
        use rsa::RsaPrivateKey;
        use signature::{SignatureEncoding, Signer as _};

        let private_key = RsaPrivateKey::from_pkcs8_der(&self.der_bytes)
            .map_err(|e| SignatureError::SigningFailed(format!("Failed to parse RSA key: {}", e)))?;

        let signature = match digest_algorithm {
            DigestAlgorithm::Sha1 => {
                rsa::pkcs1v15::SigningKey::<sha1::Sha1>::new(private_key).sign(data).to_bytes().to_vec()
            }
            DigestAlgorithm::Sha256 => {
                rsa::pkcs1v15::SigningKey::<sha2::Sha256>::new(private_key).sign(data).to_bytes().to_vec()
            }
            DigestAlgorithm::Sha384 => {
                rsa::pkcs1v15::SigningKey::<sha2::Sha384>::new(private_key).sign(data).to_bytes().to_vec()
            }
            DigestAlgorithm::Sha512 => {
                rsa::pkcs1v15::SigningKey::<sha2::Sha512>::new(private_key).sign(data).to_bytes().to_vec()
            }
        };

        Ok(signature)
    }

    fn sign_ecdsa_p256(&self, data: &[u8]) -> SignatureResult<Vec<u8>> {
        use p256::ecdsa::{Signature, SigningKey};
        use pkcs8::DecodePrivateKey;
        use signature::Signer as _;

        let signing_key = SigningKey::from_pkcs8_der(&self.der_bytes)
            .map_err(|e| SignatureError::SigningFailed(format!("Failed to parse ECDSA P-256 key: {}", e)))?;
        let signature: Signature = signing_key.sign(data);
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn sign_ecdsa_p384(&self, data: &[u8]) -> SignatureResult<Vec<u8>> {
        use p384::ecdsa::{Signature, SigningKey};
        use pkcs8::DecodePrivateKey;
        use signature::Signer as _;

        let signing_key = SigningKey::from_pkcs8_der(&self.der_bytes)
            .map_err(|e| SignatureError::SigningFailed(format!("Failed to parse ECDSA P-384 key: {}", e)))?;
        let signature: Signature = signing_key.sign(data);
        Ok(signature.to_der().as_bytes().to_vec())
    }

    fn sign_ed25519(&self, data: &[u8]) -> SignatureResult<Vec<u8>> {
        use ed25519_dalek::{Signer as _, SigningKey};
        use pkcs8::DecodePrivateKey;

        let signing_key = SigningKey::from_pkcs8_der(&self.der_bytes)
            .map_err(|e| SignatureError::SigningFailed(format!("Failed to parse Ed25519 key: {}", e)))?;
        let signature = signing_key.sign(data);
        Ok(signature.to_bytes().to_vec())
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("key_type", &self.key_type)
            .field("der_bytes_len", &self.der_bytes.len())
            .finish()
    }
}

/// Wraps a PKCS#1 `RSAPrivateKey` DER blob in a minimal PKCS#8
/// `PrivateKeyInfo` so the rest of the pipeline only ever deals with PKCS#8.
fn wrap_pkcs1_rsa_as_pkcs8(pkcs1_der: &[u8]) -> SignatureResult<Vec<u8>> {
    let algorithm = asn1::sequence(&[asn1::oid("1.2.840.113549.1.1.1"), asn1::null()].concat());
    let key = asn1::octet_string(pkcs1_der);
    let body = [asn1::integer_u64(0), algorithm, key].concat();
    Ok(asn1::sequence(&body))
}

/// Wraps a SEC1 `ECPrivateKey` DER blob (assumed P-256, the only curve this
/// crate accepts via the legacy `EC PRIVATE KEY` PEM label) as PKCS#8.
fn wrap_sec1_ec_as_pkcs8(sec1_der: &[u8]) -> SignatureResult<Vec<u8>> {
    let curve_oid = asn1::oid("1.2.840.10045.3.1.7");
    let algorithm = asn1::sequence(&[asn1::oid("1.2.840.10045.2.1"), curve_oid].concat());
    let key = asn1::octet_string(sec1_der);
    let body = [asn1::integer_u64(0), algorithm, key].concat();
    Ok(asn1::sequence(&body))
}

/// Extracts the common name from an X.509 name.
fn extract_common_name(name: &x509_cert::name::Name) -> Option<String> {
    use const_oid::db::rfc4519::CN;

    for rdn in name.0.iter() {
        for attr in rdn.0.iter() {
            if attr.oid == CN {
                if let Ok(s) = std::str::from_utf8(attr.value.value()) {
                    return Some(s.to_string());
                }
            }
        }
    }
    None
}

/// Walks a certificate's top-level DER structure to pull out the raw
/// `issuer` `Name` and `serialNumber` `INTEGER` TLVs verbatim, for use in
/// `IssuerAndSerialNumber` and `ESSCertID` comparisons.
fn extract_issuer_and_serial_der(cert_der: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
    let cert = asn1::read_tlv(cert_der)?;
    let tbs = asn1::read_tlv(cert.content)?;
    let fields = asn1::read_all(tbs.content);

    // tbsCertificate ::= SEQUENCE {
    //   version [0] EXPLICIT Version DEFAULT v1,  -- optional, tag 0xa0
    //   serialNumber INTEGER,
    //   signature AlgorithmIdentifier,
    //   issuer Name,
    //   ...
    // }
    let mut idx = 0;
    if fields.first().map(|f| f.tag) == Some(0xa0) {
        idx += 1;
    }
    let serial = fields.get(idx)?;
    let issuer = fields.get(idx + 2)?;

    let mut serial_der = vec![0x02];
    serial_der.extend(asn1::encode_length(serial.content.len()));
    serial_der.extend_from_slice(serial.content);

    let mut issuer_der = vec![0x30];
    issuer_der.extend(asn1::encode_length(issuer.content.len()));
    issuer_der.extend_from_slice(issuer.content);

    Some((issuer_der, serial_der))
}

/// Converts PEM data to DER bytes.
fn pem_to_der(pem_data: &str, expected_label: &str) -> SignatureResult<Vec<u8>> {
    let begin_marker = format!("-----BEGIN {}-----", expected_label);
    let end_marker = format!("-----END {}-----", expected_label);

    let start = pem_data
        .find(&begin_marker)
        .ok_or_else(|| SignatureError::CertificateLoadFailed(format!("Missing {} PEM header", expected_label)))?;
    let end = pem_data
        .find(&end_marker)
        .ok_or_else(|| SignatureError::CertificateLoadFailed(format!("Missing {} PEM footer", expected_label)))?;

    let base64_data: String = pem_data[start + begin_marker.len()..end]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| SignatureError::CertificateLoadFailed(format!("Invalid base64 in PEM: {}", e)))
}
