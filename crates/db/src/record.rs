use serde::de::DeserializeOwned;
use serde::Serialize;

/// Core trait that any storable record must implement
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Key under which the collection is written in the backing file
    /// (e.g. `"books"`).
    const COLLECTION: &'static str;

    /// Integer identifier, unique within the collection
    fn id(&self) -> u64;
}
