//! S3-compatible object store speaking plain HTTP `PUT`.

use super::sigv4::{sha256_hex, SigV4Signer};
use super::{encode_key, ObjectStore, StorageError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Request};
use tracing::debug;
use url::Url;

/// Header granting anonymous read access to the uploaded object.
const ACL_HEADER: &str = "x-amz-acl";
const PUBLIC_READ: &str = "public-read";

/// Object store issuing `PUT <endpoint>/<bucket>/<key>` requests.
///
/// Requests are SigV4-signed when a signer is configured and sent anonymously
/// otherwise.
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: Client,
    endpoint: Url,
    signer: Option<SigV4Signer>,
}

impl HttpObjectStore {
    /// Creates a store for an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidEndpoint`] if the URL cannot be used as
    /// a base for object paths (e.g. `mailto:`).
    pub fn new(
        client: Client,
        endpoint: Url,
        signer: Option<SigV4Signer>,
    ) -> Result<Self, StorageError> {
        if endpoint.cannot_be_a_base() || endpoint.host_str().is_none() {
            return Err(StorageError::InvalidEndpoint {
                endpoint: endpoint.to_string(),
            });
        }
        Ok(Self {
            client,
            endpoint,
            signer,
        })
    }

    /// Builds the request URL of an object.
    #[must_use]
    pub fn object_url(&self, bucket: &str, key: &str) -> Url {
        let mut url = self.endpoint.clone();
        let base = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!(
            "{base}/{}/{}",
            urlencoding::encode(bucket),
            encode_key(key)
        ));
        url
    }

    /// Builds the `PUT` request for an object, signed at `time`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Signing`] or [`StorageError::HttpError`] if
    /// the request cannot be assembled.
    pub fn put_request(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
        time: DateTime<Utc>,
    ) -> Result<Request, StorageError> {
        let url = self.object_url(bucket, key);
        let mut request = self
            .client
            .put(url.clone())
            .header(CONTENT_TYPE, content_type)
            .header(ACL_HEADER, PUBLIC_READ);

        if let Some(signer) = &self.signer {
            let signed = signer.sign(
                "PUT",
                &url,
                &[("content-type", content_type), (ACL_HEADER, PUBLIC_READ)],
                &sha256_hex(&bytes),
                time,
            )?;
            for (name, value) in signed.headers {
                request = request.header(name, value);
            }
        }

        Ok(request.body(bytes).build()?)
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        let request = self.put_request(bucket, key, bytes, content_type, Utc::now())?;
        debug!(
            url = %request.url(),
            size,
            content_type,
            signed = self.signer.is_some(),
            "Putting object"
        );

        let response = self.client.execute(request).await?;
        if !response.status().is_success() {
            return Err(StorageError::Status {
                key: key.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}
