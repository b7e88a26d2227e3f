//! Test-only helpers for building genuinely valid, throwaway self-signed
//! certificates and matching private keys.
//!
//! Fixtures are generated fresh each test run (never checked in as binary
//! blobs) by hand-assembling a minimal `TBSCertificate` with this crate's
//! own [`super::asn1`] primitives and signing it for real with freshly
//! generated RSA/ECDSA key material, so unit tests exercise genuine DER
//! structures rather than opaque recorded bytes.

#![cfg(test)]

use super::asn1;
use super::certificate::{Certificate, PrivateKey};
use crate::document::DocumentBuilder;
use crate::page::PageBuilder;

fn build_name(common_name: &str) -> Vec<u8> {
    let cn_oid = asn1::oid("2.5.4.3");
    let cn_value = {
        let mut tlv = vec![0x13]; // PrintableString
        tlv.extend(asn1::encode_length(common_name.len()));
        tlv.extend_from_slice(common_name.as_bytes());
        tlv
    };
    let atv = asn1::sequence(&[cn_oid, cn_value].concat());
    let rdn = asn1::set(&atv);
    asn1::sequence(&rdn)
}

fn build_validity() -> Vec<u8> {
    let not_before = asn1::utc_time("240101000000Z");
    let not_after = asn1::utc_time("340101000000Z");
    asn1::sequence(&[not_before, not_after].concat())
}

fn build_tbs(
    serial: u64,
    signature_alg_oid: &str,
    name_der: &[u8],
    spki_der: &[u8],
) -> Vec<u8> {
    let version = asn1::context_constructed(0, &asn1::integer_u64(2));
    let serial_der = asn1::integer_u64(serial);
    let signature_alg = asn1::sequence(&[asn1::oid(signature_alg_oid), asn1::null()].concat());
    let validity = build_validity();

    let body = [
        version,
        serial_der,
        signature_alg,
        name_der.to_vec(),
        validity,
        name_der.to_vec(),
        spki_der.to_vec(),
    ]
    .concat();
    asn1::sequence(&body)
}

fn wrap_certificate(tbs_der: Vec<u8>, signature_alg_oid: &str, signature: Vec<u8>) -> Vec<u8> {
    let signature_alg = asn1::sequence(&[asn1::oid(signature_alg_oid), asn1::null()].concat());
    let sig_bits = asn1::bit_string(&signature);
    asn1::sequence(&[tbs_der, signature_alg, sig_bits].concat())
}

/// Builds a self-signed RSA certificate of the given modulus size (bits)
/// plus its matching PKCS#8 private key, genuinely self-signed with
/// RSA-PKCS#1v1.5/SHA-256.
pub fn self_signed_rsa(common_name: &str, bits: usize) -> (Certificate, PrivateKey) {
    use pkcs8::EncodePrivateKey;
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;
    use signature::{SignatureEncoding, Signer as _};

    let mut rng = rand::thread_rng();
    let key = RsaPrivateKey::new(&mut rng, bits).expect("rsa keygen");
    let public = key.to_public_key();

    let n = public.n().to_bytes_be();
    let e = public.e().to_bytes_be();
    let rsa_pub_der = asn1::sequence(&[asn1::integer(&n), asn1::integer(&e)].concat());

    let rsa_alg_oid = "1.2.840.113549.1.1.1";
    let spki_alg = asn1::sequence(&[asn1::oid(rsa_alg_oid), asn1::null()].concat());
    let spki_der = asn1::sequence(&[spki_alg, asn1::bit_string(&rsa_pub_der)].concat());

    let name_der = build_name(common_name);
    let sha256_rsa_oid = "1.2.840.113549.1.1.11";
    let tbs_der = build_tbs(1, sha256_rsa_oid, &name_der, &spki_der);

    let signing_key = rsa::pkcs1v15::SigningKey::<sha2::Sha256>::new(key.clone());
    let signature = signing_key.sign(&tbs_der).to_bytes().to_vec();

    let cert_der = wrap_certificate(tbs_der, sha256_rsa_oid, signature);
    let certificate = Certificate::from_der(&cert_der).expect("self-signed fixture cert must parse");

    let pkcs8_der = key.to_pkcs8_der().expect("pkcs8 encode").as_bytes().to_vec();
    let private_key = PrivateKey::from_pkcs8_der(&pkcs8_der).expect("pkcs8 key must parse");

    (certificate, private_key)
}

/// Builds a self-signed ECDSA P-256 certificate plus its matching PKCS#8
/// private key, genuinely self-signed with ECDSA/SHA-256.
pub fn self_signed_ecdsa_p256(common_name: &str) -> (Certificate, PrivateKey) {
    use p256::ecdsa::{Signature, SigningKey};
    use p256::elliptic_curve::sec1::ToEncodedPoint;
    use pkcs8::EncodePrivateKey;
    use signature::Signer as _;

    let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
    let verifying_point = signing_key.verifying_key().to_encoded_point(false);
    let pub_bytes = verifying_point.as_bytes();

    let p256_oid = "1.2.840.10045.3.1.7";
    let ec_oid = "1.2.840.10045.2.1";
    let spki_alg = asn1::sequence(&[asn1::oid(ec_oid), asn1::oid(p256_oid)].concat());
    let spki_der = asn1::sequence(&[spki_alg, asn1::bit_string(pub_bytes)].concat());

    let name_der = build_name(common_name);
    let ecdsa_sha256_oid = "1.2.840.10045.4.3.2";
    let tbs_der = build_tbs(1, ecdsa_sha256_oid, &name_der, &spki_der);

    let signature: Signature = signing_key.sign(&tbs_der);
    let cert_der = wrap_certificate(tbs_der, ecdsa_sha256_oid, signature.to_der().as_bytes().to_vec());
    let certificate = Certificate::from_der(&cert_der).expect("self-signed fixture cert must parse");

    let pkcs8_der = signing_key.to_pkcs8_der().expect("pkcs8 encode").as_bytes().to_vec();
    let private_key = PrivateKey::from_pkcs8_der(&pkcs8_der).expect("pkcs8 key must parse");

    (certificate, private_key)
}

/// Builds a self-signed ECDSA P-384 certificate plus its matching PKCS#8
/// private key, genuinely self-signed with ECDSA/SHA-384.
pub fn self_signed_ecdsa_p384(common_name: &str) -> (Certificate, PrivateKey) {
    use p384::ecdsa::{Signature, SigningKey};
    use p384::elliptic_curve::sec1::ToEncodedPoint;
    use pkcs8::EncodePrivateKey;
    use signature::Signer as _;

    let signing_key = SigningKey::random(&mut rand::rngs::OsRng);
    let verifying_point = signing_key.verifying_key().to_encoded_point(false);
    let pub_bytes = verifying_point.as_bytes();

    let p384_oid = "1.3.132.0.34";
    let ec_oid = "1.2.840.10045.2.1";
    let spki_alg = asn1::sequence(&[asn1::oid(ec_oid), asn1::oid(p384_oid)].concat());
    let spki_der = asn1::sequence(&[spki_alg, asn1::bit_string(pub_bytes)].concat());

    let name_der = build_name(common_name);
    let ecdsa_sha384_oid = "1.2.840.10045.4.3.3";
    let tbs_der = build_tbs(1, ecdsa_sha384_oid, &name_der, &spki_der);

    let signature: Signature = signing_key.sign(&tbs_der);
    let cert_der = wrap_certificate(tbs_der, ecdsa_sha384_oid, signature.to_der().as_bytes().to_vec());
    let certificate = Certificate::from_der(&cert_der).expect("self-signed fixture cert must parse");

    let pkcs8_der = signing_key.to_pkcs8_der().expect("pkcs8 encode").as_bytes().to_vec();
    let private_key = PrivateKey::from_pkcs8_der(&pkcs8_der).expect("pkcs8 key must parse");

    (certificate, private_key)
}

/// Builds a minimal single-page PDF suitable as the "original document"
/// input to a signing pass: one A4 page, no existing `/AcroForm`.
pub fn minimal_signable_pdf() -> Vec<u8> {
    let page = PageBuilder::a4().build();
    let doc = DocumentBuilder::new().page(page).build().expect("minimal document must build");
    doc.save_to_bytes().expect("minimal document must serialize")
}
