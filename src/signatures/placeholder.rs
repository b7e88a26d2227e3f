//! Placeholder Planner: sizes the `/Contents` hex reservation before the
//! CMS signature it will eventually hold has been produced.

use super::certificate::{Certificate, DigestAlgorithm, KeyAlgorithm, Signer};
use super::config::SignatureCategory;

/// Fixed slack, in raw bytes (doubled for hex like everything else), added
/// when a TSA is configured: an RFC 3161 token plus its own certificate
/// chain is unpredictable up front, so a generous fixed budget is used
/// instead of trying to model it precisely.
const TIMESTAMP_SLACK_BYTES: usize = 9000;

/// A generous fallback reservation, in raw bytes, used whenever a
/// contribution cannot be computed from a concrete key/cert (§4.3: "the only
/// safe fallback on an unrecognized key type is a generous constant").
const UNKNOWN_FALLBACK_BYTES: usize = 8192;

/// Computes the `/Contents` placeholder's hex-nibble length.
///
/// Sizing is strictly derived from the end-entity signer's own public key —
/// never from a CA's certificate signature algorithm — per the Open
/// Question decision recorded in `DESIGN.md`.
#[derive(Debug, Default)]
pub struct PlaceholderPlanner {
    /// Raw (pre-hex) byte contributions accumulated so far, for diagnostics.
    raw_bytes: usize,
}

impl PlaceholderPlanner {
    /// Creates an empty planner.
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the reserved `/Contents` hex length (the number of hex
    /// characters, i.e. twice the raw byte estimate) for a regular
    /// signature or timestamp-only category.
    #[allow(clippy::too_many_arguments)]
    pub fn plan(
        &mut self,
        signer: &dyn Signer,
        digest_algorithm: DigestAlgorithm,
        end_entity: &Certificate,
        chain: &[Certificate],
        category: SignatureCategory,
        revocation_bytes: usize,
        timestamp_configured: bool,
    ) -> usize {
        let raw_signature_len = signer.public_key().algorithm.raw_signature_len();
        let digest_len = digest_algorithm.output_len();

        let mut raw = 0usize;
        raw += raw_signature_len;
        raw += digest_len * 2; // file digest + ESS signing-cert hash
        raw += end_entity.der_bytes().len();
        raw += end_entity.issuer_der().len();
        for intermediate in chain {
            raw += intermediate.der_bytes().len();
        }
        raw += revocation_bytes;
        if timestamp_configured {
            raw += TIMESTAMP_SLACK_BYTES;
        }

        // A little overhead for SignedData/SignerInfo DER wrapping itself
        // (sequence tags, attribute OIDs, algorithm identifiers) that isn't
        // worth modeling byte-exactly.
        raw += 1024;

        if category == SignatureCategory::TimeStampOnly {
            raw = raw.max(UNKNOWN_FALLBACK_BYTES);
        }

        self.raw_bytes = raw;
        raw * 2
    }

    /// Grows a previously computed hex reservation by `shortfall_hex_chars +
    /// 2`, per the bounded one-retry rule in §4.3/§4.8 (shortfall is counted
    /// in hex characters, so the `+1` raw byte from the spec becomes `+2`
    /// hex characters here).
    pub fn grow(current_hex_len: usize, actual_hex_len: usize) -> usize {
        let shortfall = actual_hex_len.saturating_sub(current_hex_len);
        current_hex_len + shortfall + 2
    }

    /// The raw (non-hex) byte estimate from the last `plan` call, for
    /// diagnostics and tests.
    pub fn last_raw_bytes(&self) -> usize {
        self.raw_bytes
    }
}

/// Falls back to [`UNKNOWN_FALLBACK_BYTES`] (doubled for hex) whenever a key
/// algorithm could not be classified, matching the "generous constant"
/// requirement independent of any particular [`PlaceholderPlanner::plan`]
/// call.
pub fn unknown_key_fallback_hex_len() -> usize {
    UNKNOWN_FALLBACK_BYTES * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signatures::certificate::PublicKeyInfo;
    use crate::signatures::test_support;

    struct FixedSigner {
        public_key: PublicKeyInfo,
    }

    impl Signer for FixedSigner {
        fn public_key(&self) -> &PublicKeyInfo {
            &self.public_key
        }

        fn sign(&self, _digest: &[u8], _digest_algorithm: DigestAlgorithm) -> super::super::SignatureResult<Vec<u8>> {
            Ok(vec![0u8; self.public_key.algorithm.raw_signature_len()])
        }
    }

    fn fixed_signer(algorithm: KeyAlgorithm) -> FixedSigner {
        FixedSigner {
            public_key: PublicKeyInfo {
                algorithm,
                spki_der: Vec::new(),
            },
        }
    }

    #[test]
    fn test_plan_uses_signer_key_not_ca_algorithm() {
        // Regression guard for the known bug: an RSA-3072 (384-byte) signer
        // key under a CA whose own signature algorithm is SHA256-RSA must
        // be sized for 384 bytes, never silently shrunk.
        let signer = fixed_signer(KeyAlgorithm::Rsa { modulus_bytes: 384 });
        let (cert, _key) = test_support::self_signed_rsa("Jane Doe", 1024);
        let mut planner = PlaceholderPlanner::new();
        let hex_len = planner.plan(
            &signer,
            DigestAlgorithm::Sha256,
            &cert,
            &[],
            SignatureCategory::Approval,
            0,
            false,
        );
        assert!(planner.last_raw_bytes() >= 384);
        assert_eq!(hex_len, planner.last_raw_bytes() * 2);
    }

    #[test]
    fn test_plan_adds_timestamp_slack() {
        let signer = fixed_signer(KeyAlgorithm::EcdsaP256);
        let (cert, _key) = test_support::self_signed_ecdsa_p256("Jane Doe");
        let mut planner = PlaceholderPlanner::new();
        let without_tsa = planner.plan(&signer, DigestAlgorithm::Sha256, &cert, &[], SignatureCategory::Approval, 0, false);
        let with_tsa = planner.plan(&signer, DigestAlgorithm::Sha256, &cert, &[], SignatureCategory::Approval, 0, true);
        assert!(with_tsa > without_tsa);
        assert!(with_tsa - without_tsa >= TIMESTAMP_SLACK_BYTES * 2);
    }

    #[test]
    fn test_grow_adds_shortfall_plus_two() {
        assert_eq!(PlaceholderPlanner::grow(100, 150), 152);
        assert_eq!(PlaceholderPlanner::grow(200, 150), 202);
    }
}
