//! Blob publishing over the storage REST interface.
//!
//! One publish call validates the connection descriptor, makes sure the
//! target container exists, uploads the artifact under a timestamped name
//! with overwrite semantics, and hands back a 24-hour read link.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use sha2::Sha256;

use super::connection::ConnectionString;
use super::sas;
use crate::core::errors::ApiError;

type HmacSha256 = Hmac<Sha256>;

const SAS_VALIDITY_HOURS: i64 = 24;

/// Fixed-shape publishing outcome: `(success, url, error)`.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    pub success: bool,
    pub url: Option<String>,
    pub error: Option<String>,
}

impl PublishOutcome {
    fn failure(error: String) -> Self {
        PublishOutcome {
            success: false,
            url: None,
            error: Some(error),
        }
    }
}

#[derive(Clone)]
pub struct BlobPublisher {
    connection_string: String,
    account_name_override: Option<String>,
    container: String,
    client: Client,
}

impl BlobPublisher {
    pub fn new(
        connection_string: String,
        account_name: Option<String>,
        container: String,
    ) -> Self {
        Self {
            connection_string,
            account_name_override: account_name,
            container,
            client: Client::new(),
        }
    }

    /// Upload a local artifact and return its download link.
    pub async fn publish_file(&self, path: &Path, target_name: &str) -> PublishOutcome {
        // descriptor problems are reported before any I/O happens
        let conn = match ConnectionString::parse(&self.connection_string) {
            Ok(conn) => conn,
            Err(message) => {
                return PublishOutcome::failure(format!("연결 문자열 오류: {}", message))
            }
        };

        let account_name = self
            .account_name_override
            .clone()
            .unwrap_or_else(|| conn.account_name.clone());

        let content = match std::fs::read(path) {
            Ok(content) => content,
            Err(err) => {
                return PublishOutcome::failure(format!("보고서 파일을 읽을 수 없습니다: {}", err))
            }
        };

        if let Err(err) = self.ensure_container(&conn, &account_name).await {
            return PublishOutcome::failure(format!("컨테이너 접근 오류: {}", err));
        }

        let blob_name = blob_name_for(Utc::now(), target_name);
        if let Err(err) = self
            .upload_blob(&conn, &account_name, &blob_name, content)
            .await
        {
            return PublishOutcome::failure(err.to_string());
        }

        let url = self.download_url(&conn, &account_name, &blob_name, Utc::now());

        PublishOutcome {
            success: true,
            url: Some(url),
            error: None,
        }
    }

    async fn ensure_container(
        &self,
        conn: &ConnectionString,
        account_name: &str,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/{}?restype=container",
            conn.blob_base_url(),
            self.container
        );
        let resource = format!("/{}/{}\nrestype:container", account_name, self.container);

        let res = self
            .signed_request(conn, account_name, reqwest::Method::GET, &url, &resource, None)
            .await?;

        match res.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND => {
                let res = self
                    .signed_request(
                        conn,
                        account_name,
                        reqwest::Method::PUT,
                        &url,
                        &resource,
                        None,
                    )
                    .await?;
                // racing a concurrent create is fine
                if res.status().is_success() || res.status() == StatusCode::CONFLICT {
                    tracing::info!("created blob container {}", self.container);
                    Ok(())
                } else {
                    Err(ApiError::Internal(format!(
                        "container create failed: {}",
                        res.status()
                    )))
                }
            }
            status => Err(ApiError::Internal(format!(
                "container check failed: {}",
                status
            ))),
        }
    }

    async fn upload_blob(
        &self,
        conn: &ConnectionString,
        account_name: &str,
        blob_name: &str,
        content: Vec<u8>,
    ) -> Result<(), ApiError> {
        let url = format!(
            "{}/{}/{}",
            conn.blob_base_url(),
            self.container,
            urlencoding::encode(blob_name)
        );
        let resource = format!("/{}/{}/{}", account_name, self.container, blob_name);

        let res = self
            .signed_request(
                conn,
                account_name,
                reqwest::Method::PUT,
                &url,
                &resource,
                Some(content),
            )
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Internal(format!(
                "blob upload failed ({}): {}",
                status, text
            )));
        }

        Ok(())
    }

    async fn signed_request(
        &self,
        conn: &ConnectionString,
        account_name: &str,
        method: reqwest::Method,
        url: &str,
        canonicalized_resource: &str,
        body: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, ApiError> {
        let date = Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string();
        let is_blob_put = body.is_some();
        let content_length = body.as_ref().map(|b| b.len()).unwrap_or(0);

        let canonicalized_headers = if is_blob_put {
            format!(
                "x-ms-blob-type:BlockBlob\nx-ms-date:{}\nx-ms-version:{}\n",
                date,
                sas::SIGNED_VERSION
            )
        } else {
            format!(
                "x-ms-date:{}\nx-ms-version:{}\n",
                date,
                sas::SIGNED_VERSION
            )
        };

        let length_field = if content_length > 0 {
            content_length.to_string()
        } else {
            String::new()
        };
        let content_type = if is_blob_put { "application/octet-stream" } else { "" };

        let string_to_sign = format!(
            "{}\n\n\n{}\n\n{}\n\n\n\n\n\n\n{}{}",
            method.as_str(),
            length_field,
            content_type,
            canonicalized_headers,
            canonicalized_resource
        );

        let signature = sign(&conn.account_key, &string_to_sign)?;
        let authorization = format!("SharedKey {}:{}", account_name, signature);

        let mut request = self
            .client
            .request(method, url)
            .header("x-ms-date", &date)
            .header("x-ms-version", sas::SIGNED_VERSION)
            .header("Authorization", authorization);

        if let Some(body) = body {
            request = request
                .header("x-ms-blob-type", "BlockBlob")
                .header("Content-Type", "application/octet-stream")
                .body(body);
        }

        request.send().await.map_err(ApiError::internal)
    }

    fn download_url(
        &self,
        conn: &ConnectionString,
        account_name: &str,
        blob_name: &str,
        now: DateTime<Utc>,
    ) -> String {
        let base = format!(
            "{}/{}/{}",
            conn.blob_base_url(),
            self.container,
            urlencoding::encode(blob_name)
        );

        let expiry = now + Duration::hours(SAS_VALIDITY_HOURS);
        match sas::blob_read_token(
            account_name,
            &conn.account_key,
            &self.container,
            blob_name,
            expiry,
        ) {
            Some(token) => format!("{}?{}", base, token),
            // no usable account key: degraded, unsigned URL
            None => base,
        }
    }
}

/// `{UTC timestamp}_{target}` keeps uploads collision-free and overwrite
/// semantics harmless.
fn blob_name_for(now: DateTime<Utc>, target_name: &str) -> String {
    format!("{}_{}", now.format("%Y%m%d_%H%M%S"), target_name)
}

fn sign(account_key: &str, string_to_sign: &str) -> Result<String, ApiError> {
    let key = BASE64
        .decode(account_key)
        .map_err(|e| ApiError::internal(format!("account key is not valid base64: {}", e)))?;
    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| ApiError::internal(format!("account key rejected: {}", e)))?;
    mac.update(string_to_sign.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[tokio::test]
    async fn malformed_descriptor_fails_before_any_upload() {
        let publisher = BlobPublisher::new(
            "AccountName=devstore;EndpointSuffix=core.windows.net".to_string(),
            None,
            "word-reports".to_string(),
        );

        // the artifact path does not even exist; validation must trip first
        let outcome = publisher
            .publish_file(Path::new("missing-report.docx"), "report.docx")
            .await;

        assert!(!outcome.success);
        assert_eq!(outcome.url, None);
        let error = outcome.error.unwrap();
        assert!(error.contains("AccountKey="));
    }

    #[test]
    fn blob_names_are_timestamped() {
        let now = Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 5).unwrap();
        assert_eq!(
            blob_name_for(now, "iap-report-7.docx"),
            "20250701_093005_iap-report-7.docx"
        );
    }

    #[test]
    fn download_url_degrades_without_account_key() {
        let publisher = BlobPublisher::new(String::new(), None, "word-reports".to_string());
        let conn = ConnectionString {
            account_name: "devstore".to_string(),
            account_key: String::new(),
            endpoint_suffix: "core.windows.net".to_string(),
            blob_endpoint: None,
        };

        let url = publisher.download_url(
            &conn,
            "devstore",
            "20250701_093005_report.docx",
            Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 5).unwrap(),
        );

        assert_eq!(
            url,
            "https://devstore.blob.core.windows.net/word-reports/20250701_093005_report.docx"
        );
    }

    #[test]
    fn download_url_embeds_sas_token_when_key_present() {
        let publisher = BlobPublisher::new(String::new(), None, "word-reports".to_string());
        let conn = ConnectionString {
            account_name: "devstore".to_string(),
            account_key: BASE64.encode(b"storage account key"),
            endpoint_suffix: "core.windows.net".to_string(),
            blob_endpoint: None,
        };

        let url = publisher.download_url(
            &conn,
            "devstore",
            "report.docx",
            Utc.with_ymd_and_hms(2025, 7, 1, 9, 30, 5).unwrap(),
        );

        assert!(url.starts_with(
            "https://devstore.blob.core.windows.net/word-reports/report.docx?sv="
        ));
        assert!(url.contains("sp=r"));
        // 24-hour validity window
        assert!(url.contains("se=2025-07-02T09%3A30%3A05Z"));
    }
}
