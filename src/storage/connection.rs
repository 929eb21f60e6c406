//! Storage connection-descriptor parsing.
//!
//! Validation happens before any network call and reports every missing
//! required part by name.

const REQUIRED_PARTS: [&str; 2] = ["AccountName=", "AccountKey="];

const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

#[derive(Debug, Clone)]
pub struct ConnectionString {
    pub account_name: String,
    /// May be empty after parsing; SAS minting degrades in that case.
    pub account_key: String,
    pub endpoint_suffix: String,
    pub blob_endpoint: Option<String>,
}

/// Check the descriptor for the required markers.
pub fn validate(connection_string: &str) -> Result<(), String> {
    if connection_string.trim().is_empty() {
        return Err("연결 문자열이 비어있습니다.".to_string());
    }

    let missing: Vec<&str> = REQUIRED_PARTS
        .iter()
        .filter(|part| !connection_string.contains(*part))
        .copied()
        .collect();

    if !missing.is_empty() {
        return Err(format!(
            "연결 문자열에 필수 요소가 누락되었습니다: {}",
            missing.join(", ")
        ));
    }

    Ok(())
}

impl ConnectionString {
    pub fn parse(raw: &str) -> Result<Self, String> {
        validate(raw)?;

        let mut account_name = String::new();
        let mut account_key = String::new();
        let mut endpoint_suffix = DEFAULT_ENDPOINT_SUFFIX.to_string();
        let mut blob_endpoint = None;

        for part in raw.split(';') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            // split at the first '='; base64 key padding stays in the value
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            match key {
                "AccountName" => account_name = value.to_string(),
                "AccountKey" => account_key = value.to_string(),
                "EndpointSuffix" => endpoint_suffix = value.to_string(),
                "BlobEndpoint" => blob_endpoint = Some(value.to_string()),
                _ => {}
            }
        }

        Ok(ConnectionString {
            account_name,
            account_key,
            endpoint_suffix,
            blob_endpoint,
        })
    }

    /// Base URL of the blob service for this account.
    pub fn blob_base_url(&self) -> String {
        match &self.blob_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!(
                "https://{}.blob.{}",
                self.account_name, self.endpoint_suffix
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_account_key_is_named() {
        let err = validate("AccountName=devstore;EndpointSuffix=core.windows.net").unwrap_err();
        assert!(err.contains("AccountKey="));
        assert!(!err.contains("AccountName="));
    }

    #[test]
    fn empty_descriptor_is_rejected() {
        assert_eq!(validate("  "), Err("연결 문자열이 비어있습니다.".to_string()));
    }

    #[test]
    fn parse_extracts_fields_and_keeps_padded_keys_intact() {
        let conn = ConnectionString::parse(
            "DefaultEndpointsProtocol=https;AccountName=devstore;AccountKey=a2V5cGFkZGluZw==;EndpointSuffix=core.windows.net",
        )
        .unwrap();

        assert_eq!(conn.account_name, "devstore");
        assert_eq!(conn.account_key, "a2V5cGFkZGluZw==");
        assert_eq!(
            conn.blob_base_url(),
            "https://devstore.blob.core.windows.net"
        );
    }

    #[test]
    fn explicit_blob_endpoint_wins() {
        let conn = ConnectionString::parse(
            "AccountName=devstore;AccountKey=a2V5;BlobEndpoint=http://127.0.0.1:10000/devstore/",
        )
        .unwrap();
        assert_eq!(conn.blob_base_url(), "http://127.0.0.1:10000/devstore");
    }

    #[test]
    fn empty_account_key_value_still_validates() {
        let conn = ConnectionString::parse("AccountName=devstore;AccountKey=").unwrap();
        assert_eq!(conn.account_key, "");
    }
}
