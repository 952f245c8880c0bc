//! Source and published item entities
//!
//! A [`SourceItem`] is a media file discovered while walking the source
//! store's folder tree. A [`PublishedItem`] is an entry already present in
//! the publish target's catalog. The two are matched through
//! [`SourceItem::publish_key`]: the display name with its final extension
//! stripped, which is the name this system stamps onto uploads.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Returns true for MIME kinds the scanner treats as uploadable media.
///
/// Everything under `video/` counts; other kinds (documents, images,
/// shortcuts) are ignored during the store walk.
pub fn is_media_kind(mime_kind: &str) -> bool {
    mime_kind.starts_with("video/")
}

/// Strips the final extension (including the dot) from a file name.
///
/// A leading dot is not treated as an extension separator, so hidden
/// files like `.config` pass through unchanged.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

/// A media file enumerated from the source store.
///
/// Immutable once read; identity is `remote_id`. Metadata fields carry
/// everything the publish step needs so no second store round-trip is
/// required per item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    /// Store-assigned identifier of the file
    pub remote_id: String,
    /// File name as shown in the store (extension included)
    pub display_name: String,
    /// MIME kind reported by the store (e.g. `video/mp4`)
    pub mime_kind: String,
    /// Size in bytes when the store reports one
    pub size_hint: Option<u64>,
    /// Free-text description attached to the file, if any
    pub description: Option<String>,
    /// File-level key/value properties; keys double as upload tags
    pub properties: BTreeMap<String, String>,
    /// Taxonomy label ids attached to the file (resolved to titles later)
    pub label_refs: Vec<String>,
    /// Id of the folder the file was found in
    pub parent_folder_id: String,
    /// Audience declaration; defaults to false when the store carries none
    pub made_for_kids: bool,
}

impl SourceItem {
    /// The reconciliation key: display name with its extension stripped.
    ///
    /// This equals the publish identifier the system assigns when the
    /// post-upload action is `rename`, which is what makes re-runs skip
    /// already-published files.
    pub fn publish_key(&self) -> &str {
        strip_extension(&self.display_name)
    }

    /// The file extension including the leading dot, or `""` if none.
    pub fn extension(&self) -> &str {
        match self.display_name.rfind('.') {
            Some(idx) if idx > 0 => &self.display_name[idx..],
            _ => "",
        }
    }
}

/// An item already present in the publish target's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedItem {
    /// Identifier assigned by the publish target
    pub publish_id: String,
    /// Title as shown in the catalog
    pub title: String,
}
