//! Per-mod manifest documents (`{loader}/{name}.json`).

use serde::{Deserialize, Serialize};

use crate::identifier::short_hash;

use super::ManifestOverrides;

/// A mod's manifest: descriptive metadata plus every known file version.
///
/// The same mod built for different loaders has a separate manifest per loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    /// Version of the manifest schema.
    #[serde(alias = "indexVersion")]
    pub schema_version: String,
    /// The `loader:name` this manifest describes.
    pub generic_identifier: String,
    /// Human-readable project name.
    pub fancy_name: String,
    /// Author or publisher.
    pub author: String,
    /// License name, or a URL for custom licenses.
    #[serde(default)]
    pub license: Option<String>,
    /// Numeric CurseForge project id.
    #[serde(default)]
    pub curse_forge_id: Option<i64>,
    /// Modrinth project id (not the slug).
    #[serde(default)]
    pub modrinth_id: Option<String>,
    /// Links related to the mod.
    #[serde(default)]
    pub links: ManifestLinks,
    /// Known file versions, in publication order.
    #[serde(default)]
    pub files: Vec<FileVersion>,
}

/// Links related to a mod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestLinks {
    /// Issue tracker.
    #[serde(default)]
    pub issue: Option<String>,
    /// Canonical source repository, without suffixes such as `.git`.
    #[serde(default)]
    pub source_control: Option<String>,
    /// Any other links, e.g. Discord or a wiki.
    #[serde(default)]
    pub others: Vec<OtherLink>,
}

/// A named link such as `discord` or `wiki`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherLink {
    pub link_name: String,
    pub url: String,
}

/// One concrete file version of a mod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileVersion {
    /// File name as published; not suitable for version comparisons.
    pub file_name: String,
    /// Game versions this file is compatible with.
    #[serde(rename = "mcVersions", default)]
    pub compatible_versions: Vec<String>,
    /// First 15 characters of the file's SHA-512 hash.
    #[serde(rename = "shortSha512Hash", alias = "shortHash")]
    pub short_hash: String,
    /// Direct download locations.
    #[serde(default)]
    pub download_urls: Vec<String>,
    /// Whether the file can be fetched through CurseForge.
    #[serde(rename = "curseDownloadAvailable", default)]
    pub available: bool,
    /// Dependencies and conflicts.
    #[serde(rename = "relationsToOtherMods", default)]
    pub relations: Relations,
}

impl FileVersion {
    /// Returns true if this file's short hash matches `hash` after normalization
    /// and truncation.
    #[must_use]
    pub fn matches_short_hash(&self, hash: &str) -> bool {
        short_hash(&self.short_hash) == short_hash(hash)
    }
}

/// Relations to other mods, as generic identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relations {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub incompatible: Vec<String>,
}

impl ManifestDocument {
    /// Decodes a manifest from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the codec error when the payload is not a valid manifest.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Returns the first file whose short hash matches `hash`.
    #[must_use]
    pub fn find_file(&self, hash: &str) -> Option<&FileVersion> {
        self.files.iter().find(|file| file.matches_short_hash(hash))
    }

    /// Returns every file whose short hash matches `hash`.
    pub fn files_with_short_hash<'a>(
        &'a self,
        hash: &'a str,
    ) -> impl Iterator<Item = &'a FileVersion> + 'a {
        self.files
            .iter()
            .filter(move |file| file.matches_short_hash(hash))
    }
}

/// A manifest as served together with its optional embedded overrides.
///
/// Most consumers want [`ManifestDocument`]; overrides matter to tooling that
/// maintains the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestWithOverrides {
    #[serde(flatten)]
    pub manifest: ManifestDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<ManifestOverrides>,
}

impl ManifestWithOverrides {
    /// Decodes a manifest and its embedded overrides from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the codec error when the payload is not a valid manifest.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
