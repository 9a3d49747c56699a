//! DTOs for bundle endpoints

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smushit_domain::{BatchRequest, BundleError, BundleReceipt};
use utoipa::ToSchema;

/// Request body for the bundle endpoint
///
/// Parsed leniently: unknown fields are ignored, missing fields take their
/// empty value, a non-string `filename` counts as empty and non-string
/// entries in `urls` are skipped.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct BundleRequest {
    /// Desired archive name; `.zip` is appended when missing
    #[schema(example = "photos")]
    #[serde(deserialize_with = "string_or_empty")]
    pub filename: String,
    /// URLs of the files to bundle
    #[schema(value_type = Vec<Object>, example = json!(["https://example.com/a.jpg", "https://example.com/b"]))]
    pub urls: Vec<Value>,
}

impl BundleRequest {
    /// Parse a raw request body
    pub fn from_body(body: &[u8]) -> Result<Self, BundleError> {
        let invalid = || BundleError::invalid_request("Invalid request body");

        // serde would also accept a positional array for a struct
        match serde_json::from_slice::<Value>(body) {
            Ok(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// Convert into a domain batch, dropping every non-string URL
    pub fn into_batch(self) -> Result<BatchRequest, BundleError> {
        let urls = self
            .urls
            .into_iter()
            .filter_map(|value| match value {
                Value::String(url) => Some(url),
                _ => None,
            })
            .collect();

        BatchRequest::new(self.filename, urls)
    }
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(value) => Ok(value),
        _ => Ok(String::new()),
    }
}

/// Response body for a successful bundle
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BundleResponse {
    /// Success message naming the archive
    #[schema(example = "Successfully uploaded photos.zip")]
    pub message: String,
    /// Presigned download link
    #[schema(example = "https://smushit.s3.amazonaws.com/900150983cd24fb0d6963f7d28e17f72/photos.zip?X-Amz-Expires=86400")]
    pub download_url: String,
    /// When the download link stops working (RFC 3339)
    #[schema(example = "2024-05-18T13:45:30Z")]
    pub expires_at: String,
    /// Number of files in the archive
    #[schema(example = 2)]
    pub downloaded: usize,
    /// Number of URLs that could not be fetched
    #[schema(example = 0)]
    pub failed: usize,
}

impl From<&BundleReceipt> for BundleResponse {
    fn from(receipt: &BundleReceipt) -> Self {
        Self {
            message: format!("Successfully uploaded {}", receipt.archive_name()),
            download_url: receipt.link().url().to_string(),
            expires_at: receipt.link().expires_at().to_rfc3339(),
            downloaded: receipt.downloaded(),
            failed: receipt.failed(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "No files were successfully downloaded")]
    pub error: String,
}
