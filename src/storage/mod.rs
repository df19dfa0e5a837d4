pub mod disk;

pub use disk::DiskObjectStorage;

use std::future::Future;

use crate::error::ChatError;

/// External object storage for attachments. The one contract: a successful
/// put returns a stable URL the file can be fetched from afterwards.
pub trait ObjectStorage: Send + Sync + 'static {
    fn put(
        &self,
        bytes: &[u8],
        mime_type: &str,
        original_name: &str,
    ) -> impl Future<Output = Result<String, ChatError>> + Send;
}
