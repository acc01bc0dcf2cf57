//! Image attachment records kept on shops and items.

use serde::{Deserialize, Serialize};

/// One stored rendition of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageVersion {
    /// Public URL of the rendition.
    pub location: String,
    /// Storage key used when deleting it.
    pub key: String,
}

/// Attachment record persisted as a JSON column.
///
/// `versions` lists every stored rendition; all of them are deleted from the
/// image store when the owning row is destroyed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageFile {
    #[serde(default)]
    pub versions: Vec<ImageVersion>,
}
