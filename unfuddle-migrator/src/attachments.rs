//! Attachment relocation to object storage.
//!
//! Each attachment is read from the backup, stored under a key derived from
//! its filename and referenced by a public URL derived from the storage
//! layout. Sibling attachments upload concurrently and are joined before the
//! owning issue or comment body is finalized.

use crate::backup::SourceAttachment;
use crate::content_type::content_type_for;
use crate::pipeline::{MigrationContext, MigrationError};
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info};

/// Uploads one attachment and returns its public URL.
///
/// # Errors
///
/// Returns [`MigrationError::Io`] if the local file cannot be read and
/// [`MigrationError::Upload`] if the store rejects it.
pub async fn relocate_attachment(
    ctx: &MigrationContext<'_>,
    attachment: &SourceAttachment,
) -> Result<String, MigrationError> {
    let options = ctx.options();
    let path = attachment.local_path(options.attachments_dir());
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|source| MigrationError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let layout = options.layout();
    let key = layout.key_for(&attachment.filename);
    let url = layout.public_url(&key);
    let content_type = content_type_for(&attachment.filename);
    let size = bytes.len();
    debug!(attachment_id = %attachment.id, key = %key, content_type, size, "Relocating attachment");

    if !ctx.dry_run() {
        ctx.store()
            .put_object(layout.bucket(), &key, bytes, content_type)
            .await
            .map_err(|source| MigrationError::Upload {
                key: key.clone(),
                source,
            })?;
    }

    info!(size, "{}Uploaded {key} to storage", ctx.log_prefix());
    Ok(url)
}

/// Uploads a group of sibling attachments concurrently.
///
/// URLs are returned in completion order. The first failure aborts the group.
///
/// # Errors
///
/// Returns the first [`MigrationError`] raised by any upload.
pub async fn relocate_attachments(
    ctx: &MigrationContext<'_>,
    attachments: &[SourceAttachment],
) -> Result<Vec<String>, MigrationError> {
    if attachments.is_empty() {
        return Ok(Vec::new());
    }

    stream::iter(attachments)
        .map(|attachment| relocate_attachment(ctx, attachment))
        .buffer_unordered(ctx.options().concurrency())
        .try_collect()
        .await
}
