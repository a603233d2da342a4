//! Remote object storage capability and key layout.

mod error;
mod http;
mod sigv4;

pub use error::StorageError;
pub use http::HttpObjectStore;
pub use sigv4::{AwsCredentials, SigV4Signer, SignedHeaders};

use async_trait::async_trait;

/// Default prefix for attachment keys.
pub const DEFAULT_KEY_PREFIX: &str = "unfuddle_imports";

/// Write access to an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` under `key` in `bucket`.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}

/// Where attachments go and how their public URLs look.
///
/// Public URLs are derived from the layout alone, never from the store's
/// response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    bucket: String,
    key_prefix: String,
    public_base_url: String,
}

impl StorageLayout {
    /// Creates a layout. Without an explicit base URL the S3 virtual-host
    /// URL of the bucket is used.
    pub fn new(
        bucket: impl Into<String>,
        key_prefix: impl Into<String>,
        public_base_url: Option<String>,
    ) -> Self {
        let bucket = bucket.into();
        let public_base_url =
            public_base_url.unwrap_or_else(|| format!("http://{bucket}.s3.amazonaws.com"));
        Self {
            bucket,
            key_prefix: key_prefix.into(),
            public_base_url,
        }
    }

    /// Target bucket.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key for an attachment filename.
    ///
    /// Keys depend on the filename only, so equally named attachments share
    /// one object.
    #[must_use]
    pub fn key_for(&self, filename: &str) -> String {
        let prefix = self.key_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{prefix}/{filename}")
        }
    }

    /// Public URL of a stored key.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            encode_key(key)
        )
    }
}

/// Percent-encodes every segment of an object key, keeping the `/` separators.
///
/// Only unreserved characters stay literal, which is also the encoding S3
/// expects in a signed request path.
#[must_use]
pub fn encode_key(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_public_url_uses_bucket_host() {
        let layout = StorageLayout::new("testing-joe", DEFAULT_KEY_PREFIX, None);
        let key = layout.key_for("diagram.png");

        assert_eq!(key, "unfuddle_imports/diagram.png");
        assert_eq!(
            layout.public_url(&key),
            "http://testing-joe.s3.amazonaws.com/unfuddle_imports/diagram.png"
        );
    }

    #[test]
    fn custom_base_url_and_empty_prefix() {
        let layout = StorageLayout::new(
            "files",
            "",
            Some("https://cdn.example.com/files/".to_string()),
        );

        assert_eq!(layout.key_for("a.txt"), "a.txt");
        assert_eq!(layout.public_url("a.txt"), "https://cdn.example.com/files/a.txt");
    }

    #[test]
    fn public_url_encodes_reserved_filename_characters() {
        let layout = StorageLayout::new("bucket", DEFAULT_KEY_PREFIX, None);

        assert_eq!(
            layout.public_url(&layout.key_for("Screen Shot 2012.png")),
            "http://bucket.s3.amazonaws.com/unfuddle_imports/Screen%20Shot%202012.png"
        );
        assert_eq!(
            layout.public_url(&layout.key_for("notes#1.txt")),
            "http://bucket.s3.amazonaws.com/unfuddle_imports/notes%231.txt"
        );
        assert_eq!(
            layout.public_url(&layout.key_for("a?b.png")),
            "http://bucket.s3.amazonaws.com/unfuddle_imports/a%3Fb.png"
        );
    }

    #[test]
    fn public_url_parses_back_to_the_stored_key() {
        let layout = StorageLayout::new("bucket", DEFAULT_KEY_PREFIX, None);
        let key = layout.key_for("notes#1 (final)?.txt");

        let url = url::Url::parse(&layout.public_url(&key)).unwrap();
        let decoded: Vec<String> = url
            .path_segments()
            .unwrap()
            .map(|segment| urlencoding::decode(segment).unwrap().into_owned())
            .collect();

        assert_eq!(decoded.join("/"), key);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.query(), None);
    }

    #[test]
    fn encode_key_keeps_separators_and_unreserved_characters() {
        assert_eq!(encode_key("a/b-c_d.e~f"), "a/b-c_d.e~f");
        assert_eq!(encode_key("test$file.text"), "test%24file.text");
    }

    #[test]
    fn same_filename_maps_to_same_key() {
        let layout = StorageLayout::new("b", "imports/", None);

        assert_eq!(layout.key_for("log.txt"), layout.key_for("log.txt"));
        assert_eq!(layout.key_for("log.txt"), "imports/log.txt");
    }
}
