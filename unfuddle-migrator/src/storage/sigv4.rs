//! AWS Signature Version 4 for S3 requests.

use super::StorageError;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// Header carrying the hex SHA-256 of the payload.
pub const CONTENT_SHA256_HEADER: &str = "x-amz-content-sha256";
/// Header carrying the signing timestamp.
pub const DATE_HEADER: &str = "x-amz-date";
/// Header carrying a temporary session token.
pub const SECURITY_TOKEN_HEADER: &str = "x-amz-security-token";

/// Access key pair used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Signs S3 requests for one region.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: AwsCredentials,
    region: String,
}

/// Headers to add to a signed request, `authorization` included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub headers: Vec<(&'static str, String)>,
    /// The bare signature, for diagnostics.
    pub signature: String,
}

impl SigV4Signer {
    /// Creates a signer for `region`.
    pub fn new(credentials: AwsCredentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    /// Signs a request.
    ///
    /// `headers` are the request headers to include in the signature besides
    /// `host`, the payload hash, the date and the session token, which are
    /// always signed. The URL path must already be percent-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Signing`] if the URL has no host.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &[(&str, &str)],
        payload_hash: &str,
        time: DateTime<Utc>,
    ) -> Result<SignedHeaders, StorageError> {
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(StorageError::Signing {
                    message: format!("URL has no host: {url}"),
                })
            }
        };
        let amz_date = time.format("%Y%m%dT%H%M%SZ").to_string();
        let date = time.format("%Y%m%d").to_string();
        let scope = format!("{date}/{}/{SERVICE}/aws4_request", self.region);

        let mut canonical: Vec<(String, String)> = headers
            .iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value.trim().to_string()))
            .collect();
        canonical.push(("host".to_string(), host));
        canonical.push((CONTENT_SHA256_HEADER.to_string(), payload_hash.to_string()));
        canonical.push((DATE_HEADER.to_string(), amz_date.clone()));
        if let Some(token) = &self.credentials.session_token {
            canonical.push((SECURITY_TOKEN_HEADER.to_string(), token.clone()));
        }
        canonical.sort();

        let signed_headers = canonical
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");
        let header_block: String = canonical
            .iter()
            .map(|(name, value)| format!("{name}:{value}\n"))
            .collect();

        let canonical_request = format!(
            "{method}\n{}\n{}\n{header_block}\n{signed_headers}\n{payload_hash}",
            url.path(),
            canonical_query(url),
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let secret = format!("AWS4{}", self.credentials.secret_access_key);
        let mut key = hmac(secret.as_bytes(), &date)?;
        for part in [self.region.as_str(), SERVICE, "aws4_request"] {
            key = hmac(&key, part)?;
        }
        let signature = hex::encode(hmac(&key, &string_to_sign)?);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key_id
        );

        let mut out = vec![
            ("authorization", authorization),
            (CONTENT_SHA256_HEADER, payload_hash.to_string()),
            (DATE_HEADER, amz_date),
        ];
        if let Some(token) = &self.credentials.session_token {
            out.push((SECURITY_TOKEN_HEADER, token.clone()));
        }
        Ok(SignedHeaders {
            headers: out,
            signature,
        })
    }
}

/// Hex SHA-256 of a payload.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn hmac(key: &[u8], data: &str) -> Result<Vec<u8>, StorageError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| StorageError::Signing {
        message: e.to_string(),
    })?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn canonical_query(url: &Url) -> String {
    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(name, value)| {
            (
                urlencoding::encode(&name).into_owned(),
                urlencoding::encode(&value).into_owned(),
            )
        })
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&")
}
