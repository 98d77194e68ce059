//! LinkedIn webhook signature validation and challenge handling.
//!
//! LinkedIn signs notification deliveries with an `x-li-signature` header of
//! the form `hmacsha256=<hex digest>`. The digest is HMAC-SHA256 keyed by the
//! application's client secret — but computed over the literal string
//! `hmacsha256=` concatenated with the raw request body, not over the body
//! alone. This prefixing is undocumented upstream and is an interop contract:
//! it must be preserved exactly.
//!
//! Reference: https://learn.microsoft.com/en-us/linkedin/shared/api-guide/webhook-validation

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub use entity::validation_status::ValidationStatus;

type HmacSha256 = Hmac<Sha256>;

/// Literal prefix used both on the signature header and on the string-to-sign.
const SIGNATURE_PREFIX: &str = "hmacsha256=";

/// Computes the expected signature for a raw request body: lowercase hex of
/// `HMAC-SHA256(key = secret, message = "hmacsha256=" || payload)`.
pub fn compute_signature(payload: &[u8], secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(SIGNATURE_PREFIX.as_bytes());
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Resolves the tri-state validation outcome for a notification delivery.
///
/// A missing header short-circuits to `NoSignature` without attempting any
/// HMAC work. Otherwise the header's `hmacsha256=` prefix is stripped when
/// present (the bare digest is accepted verbatim too) and compared against
/// the computed digest: exact, case-sensitive, constant time. This never
/// fails — an invalid signature is an expected outcome, not an error.
pub fn validate(payload: &[u8], signature_header: Option<&str>, secret: &str) -> ValidationStatus {
    let header = match signature_header {
        Some(header) => header,
        None => return ValidationStatus::NoSignature,
    };

    let signature_hash = header.strip_prefix(SIGNATURE_PREFIX).unwrap_or(header);
    let expected = compute_signature(payload, secret);

    if expected.as_bytes().ct_eq(signature_hash.as_bytes()).into() {
        ValidationStatus::Valid
    } else {
        ValidationStatus::Invalid
    }
}

/// POST challenge flow: LinkedIn expects the challenge code echoed back
/// unchanged as plain text.
pub fn handle_challenge(challenge_code: &str) -> &str {
    challenge_code
}

/// GET challenge flow: LinkedIn expects the lowercase hex digest of
/// `HMAC-SHA256(key = secret, message = challengeCode)` alongside the
/// original code. Unlike notification signing, no prefix is involved here.
pub fn challenge_response(challenge_code: &str, secret: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(challenge_code.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "WPL_AP1.x7kPt3mQzR9vJwYc";

    #[test]
    fn correct_prefixed_signature_is_valid() {
        let payload = br#"{"organizationalEntity":"urn:li:organization:2414183"}"#;
        let header = format!("hmacsha256={}", compute_signature(payload, SECRET));

        assert_eq!(
            validate(payload, Some(&header), SECRET),
            ValidationStatus::Valid
        );
    }

    #[test]
    fn bare_digest_without_prefix_is_valid() {
        let payload = b"some raw payload";
        let digest = compute_signature(payload, SECRET);

        assert_eq!(
            validate(payload, Some(&digest), SECRET),
            ValidationStatus::Valid
        );
    }

    #[test]
    fn corrupted_signature_is_invalid() {
        let payload = b"some raw payload";
        let mut digest = compute_signature(payload, SECRET);
        digest.replace_range(0..1, if digest.starts_with('0') { "1" } else { "0" });

        assert_eq!(
            validate(payload, Some(&digest), SECRET),
            ValidationStatus::Invalid
        );
    }

    #[test]
    fn uppercase_digest_is_rejected() {
        // The comparison is an exact string match; we never case-fold
        let payload = b"payload";
        let digest = compute_signature(payload, SECRET).to_uppercase();

        assert_eq!(
            validate(payload, Some(&digest), SECRET),
            ValidationStatus::Invalid
        );
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let payload = b"payload";
        let header = format!("hmacsha256={}", compute_signature(payload, SECRET));

        assert_eq!(
            validate(payload, Some(&header), "a-different-secret"),
            ValidationStatus::Invalid
        );
    }

    #[test]
    fn missing_header_short_circuits_to_no_signature() {
        assert_eq!(
            validate(b"payload", None, SECRET),
            ValidationStatus::NoSignature
        );
    }

    #[test]
    fn signature_covers_the_prefix_plus_raw_body() {
        // Pin the string-to-sign construction: signing the bare payload must
        // NOT produce the accepted digest
        let payload = b"raw body bytes";

        let mut bare = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        bare.update(payload);
        let bare_digest = hex::encode(bare.finalize().into_bytes());

        assert_eq!(
            validate(payload, Some(&bare_digest), SECRET),
            ValidationStatus::Invalid
        );

        let mut prefixed = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        prefixed.update(b"hmacsha256=");
        prefixed.update(payload);
        let prefixed_digest = hex::encode(prefixed.finalize().into_bytes());

        assert_eq!(compute_signature(payload, SECRET), prefixed_digest);
    }

    #[test]
    fn challenge_echo_is_identity() {
        assert_eq!(handle_challenge("abc123"), "abc123");
    }

    #[test]
    fn challenge_response_is_unprefixed_hmac_of_the_code() {
        let mut mac = HmacSha256::new_from_slice(SECRET.as_bytes()).unwrap();
        mac.update(b"Xw4tJQ");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(challenge_response("Xw4tJQ", SECRET), expected);
    }
}
