//! Service-SAS minting for read-only blob links.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNED_VERSION: &str = "2021-08-06";

/// Mint a read-only service SAS query string for one blob.
///
/// Returns `None` when the account key is absent or not valid base64; the
/// publisher then degrades to an unsigned URL.
pub fn blob_read_token(
    account_name: &str,
    account_key: &str,
    container: &str,
    blob_name: &str,
    expiry: DateTime<Utc>,
) -> Option<String> {
    if account_key.trim().is_empty() {
        return None;
    }
    let key = BASE64.decode(account_key).ok()?;

    let signed_expiry = expiry.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let canonicalized_resource = format!("/blob/{}/{}/{}", account_name, container, blob_name);

    // Field order fixed by the service-SAS signing contract for this
    // signed version: permissions, start, expiry, resource, identifier,
    // IP, protocol, version, resource type, snapshot, encryption scope,
    // then the five response-header overrides.
    let string_to_sign = format!(
        "r\n\n{}\n{}\n\n\n\n{}\nb\n\n\n\n\n\n",
        signed_expiry, canonicalized_resource, SIGNED_VERSION
    );

    let mut mac = HmacSha256::new_from_slice(&key).ok()?;
    mac.update(string_to_sign.as_bytes());
    let signature = BASE64.encode(mac.finalize().into_bytes());

    Some(format!(
        "sv={}&sp=r&sr=b&se={}&sig={}",
        SIGNED_VERSION,
        urlencoding::encode(&signed_expiry),
        urlencoding::encode(&signature)
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn fixed_expiry() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn token_carries_read_permission_version_and_signature() {
        let token = blob_read_token(
            "devstore",
            &BASE64.encode(b"storage account key"),
            "word-reports",
            "20250701_120000_report.docx",
            fixed_expiry(),
        )
        .unwrap();

        assert!(token.contains("sp=r"));
        assert!(token.contains("sr=b"));
        assert!(token.contains(&format!("sv={}", SIGNED_VERSION)));
        assert!(token.contains("se=2025-07-01T12%3A00%3A00Z"));
        assert!(token.contains("sig="));
    }

    #[test]
    fn minting_is_deterministic_for_fixed_inputs() {
        let key = BASE64.encode(b"storage account key");
        let a = blob_read_token("devstore", &key, "c", "b.docx", fixed_expiry());
        let b = blob_read_token("devstore", &key, "c", "b.docx", fixed_expiry());
        assert_eq!(a, b);
    }

    #[test]
    fn absent_or_malformed_key_degrades_to_none() {
        assert!(blob_read_token("devstore", "", "c", "b.docx", fixed_expiry()).is_none());
        assert!(blob_read_token("devstore", "   ", "c", "b.docx", fixed_expiry()).is_none());
        assert!(
            blob_read_token("devstore", "not base64!!", "c", "b.docx", fixed_expiry()).is_none()
        );
    }
}
