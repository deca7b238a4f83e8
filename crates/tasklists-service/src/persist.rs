//! Reading and writing the collection blob.

use bytes::Bytes;
use tasklists_core::Collection;
use tasklists_store::{ObjectStore, LISTS_KEY};
use tracing::{debug, warn};

use crate::ServiceError;

pub fn encode(collection: &Collection) -> Result<Bytes, ServiceError> {
    Ok(Bytes::from(serde_json::to_vec(collection)?))
}

/// Parse and validate a persisted blob.
pub fn decode(data: &[u8]) -> Result<Collection, ServiceError> {
    let collection: Collection = serde_json::from_slice(data)?;
    collection.validate()?;
    Ok(collection)
}

/// The persisted collection, or `None` when it is missing, unreadable or
/// invalid. Never fails; callers start from an empty collection instead.
pub async fn load(store: &dyn ObjectStore) -> Option<Collection> {
    let data = match store.get_opt(LISTS_KEY).await {
        Ok(Some(data)) => data,
        Ok(None) => {
            debug!("no persisted lists");
            return None;
        }
        Err(e) => {
            warn!("reading persisted lists failed: {e}");
            return None;
        }
    };
    match decode(&data) {
        Ok(collection) => Some(collection),
        Err(e) => {
            warn!("ignoring persisted lists: {e}");
            None
        }
    }
}

/// Overwrite the stored blob with the full collection.
pub async fn save(store: &dyn ObjectStore, collection: &Collection) -> Result<(), ServiceError> {
    let data = encode(collection)?;
    store.put(LISTS_KEY, data).await?;
    Ok(())
}
