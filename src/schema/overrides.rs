//! Sparse overrides documents mirroring [`ManifestDocument`](super::ManifestDocument).
//!
//! Every field is optional. Collection-valued fields are wrapped in an
//! [`OverrideSelection`]; nested records carry their own override record so
//! they can be patched field by field.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::{FileVersion, ManifestLinks, OtherLink};

/// Edit applied to one collection-valued field.
///
/// Precedence is `replace` > `remove` > `add`; only the highest present
/// selection takes effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideSelection<T> {
    /// Elements appended to the base collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add: Option<T>,
    /// Keys of base elements to drop.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove: Option<BTreeSet<String>>,
    /// Collection used instead of the base collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<T>,
}

impl<T> Default for OverrideSelection<T> {
    fn default() -> Self {
        Self {
            add: None,
            remove: None,
            replace: None,
        }
    }
}

impl<T> OverrideSelection<T> {
    /// Selection that appends `elements`.
    #[must_use]
    pub fn add(elements: T) -> Self {
        Self {
            add: Some(elements),
            ..Self::default()
        }
    }

    /// Selection that drops base elements with the given keys.
    #[must_use]
    pub fn remove<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            remove: Some(keys.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Selection that swaps the whole collection for `elements`.
    #[must_use]
    pub fn replace(elements: T) -> Self {
        Self {
            replace: Some(elements),
            ..Self::default()
        }
    }
}

/// Overrides for a whole manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManifestOverrides {
    #[serde(alias = "indexVersion", skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fancy_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curse_forge_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modrinth_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<LinksOverrides>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub files: Option<FilesOverride>,
}

/// Overrides for [`ManifestLinks`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinksOverrides {
    /// Replaces the links record wholesale; field overrides are then ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<ManifestLinks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_control: Option<String>,
    /// Keyed by `linkName` for removal.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub others: Option<OverrideSelection<Vec<OtherLink>>>,
}

/// Overrides for the manifest's file list.
///
/// The list-level selection runs first (files keyed by short hash), then each
/// patch is merged onto the surviving file with the same short hash. A
/// list-level `replace` discards the patches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesOverride {
    #[serde(flatten)]
    pub selection: OverrideSelection<Vec<FileVersion>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub patch: Vec<FileOverride>,
}

/// Field-by-field overrides for one file version, addressed by short hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileOverride {
    /// Short hash of the file this patch targets.
    #[serde(rename = "shortSha512Hash", alias = "shortHash")]
    pub short_hash: String,
    /// Replaces the file record wholesale; field overrides are then ignored.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<FileVersion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(rename = "mcVersions", skip_serializing_if = "Option::is_none")]
    pub compatible_versions: Option<OverrideSelection<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_urls: Option<OverrideSelection<Vec<String>>>,
    #[serde(
        rename = "curseDownloadAvailable",
        skip_serializing_if = "Option::is_none"
    )]
    pub available: Option<bool>,
    #[serde(
        rename = "relationsToOtherMods",
        skip_serializing_if = "Option::is_none"
    )]
    pub relations: Option<RelationsOverrides>,
}

/// Overrides for a file's relations, keyed by generic identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationsOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<OverrideSelection<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incompatible: Option<OverrideSelection<Vec<String>>>,
}
