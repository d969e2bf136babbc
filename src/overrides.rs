//! Merging overrides documents onto manifests.
//!
//! Scalars present in the overrides replace the base value. Collections are
//! edited through [`OverrideSelection`] with precedence `replace` > `remove` >
//! `add`; `add` appends without de-duplicating against the base. Nested
//! records (links, file versions, relations) are merged field by field unless
//! their own `replace` is set.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::identifier::{normalize, short_hash};
use crate::schema::{
    FileOverride, FileVersion, FilesOverride, LinksOverrides, ManifestDocument, ManifestLinks,
    ManifestOverrides, ManifestWithOverrides, OtherLink, OverrideSelection, Relations,
    RelationsOverrides,
};

/// Returns the effective manifest after applying `overrides` onto `base`.
///
/// With no overrides the base manifest is returned unchanged.
#[must_use]
pub fn apply_overrides(
    base: ManifestDocument,
    overrides: Option<&ManifestOverrides>,
) -> ManifestDocument {
    let Some(overrides) = overrides else {
        return base;
    };
    let mut merged = base;

    replace_if_present(&mut merged.schema_version, overrides.schema_version.as_ref());
    replace_if_present(
        &mut merged.generic_identifier,
        overrides.generic_identifier.as_ref(),
    );
    replace_if_present(&mut merged.fancy_name, overrides.fancy_name.as_ref());
    replace_if_present(&mut merged.author, overrides.author.as_ref());
    set_if_present(&mut merged.license, overrides.license.as_ref());
    set_if_present(&mut merged.curse_forge_id, overrides.curse_forge_id.as_ref());
    set_if_present(&mut merged.modrinth_id, overrides.modrinth_id.as_ref());

    if let Some(links) = &overrides.links {
        merged.links = merge_links(merged.links, links);
    }
    if let Some(files) = &overrides.files {
        merged.files = merge_files(merged.files, files, &merged.generic_identifier);
    }
    merged
}

impl ManifestWithOverrides {
    /// Consumes the document and returns the manifest with its overrides applied.
    #[must_use]
    pub fn into_effective(self) -> ManifestDocument {
        apply_overrides(self.manifest, self.overrides.as_ref())
    }
}

/// Elements removable by key from an overridden collection.
trait OverrideKey {
    fn raw_key(&self) -> &str;

    /// Canonical form used on both sides of a `remove` comparison.
    fn canonical_key(key: &str) -> String;
}

impl OverrideKey for FileVersion {
    fn raw_key(&self) -> &str {
        &self.short_hash
    }

    fn canonical_key(key: &str) -> String {
        short_hash(key)
    }
}

impl OverrideKey for OtherLink {
    fn raw_key(&self) -> &str {
        &self.link_name
    }

    fn canonical_key(key: &str) -> String {
        key.trim().to_lowercase()
    }
}

impl OverrideKey for String {
    fn raw_key(&self) -> &str {
        self
    }

    fn canonical_key(key: &str) -> String {
        normalize(key)
    }
}

fn apply_selection<E>(base: Vec<E>, selection: Option<&OverrideSelection<Vec<E>>>) -> Vec<E>
where
    E: OverrideKey + Clone,
{
    let Some(selection) = selection else {
        return base;
    };
    if let Some(replacement) = &selection.replace {
        return replacement.clone();
    }
    if let Some(keys) = &selection.remove {
        let keys: HashSet<String> = keys.iter().map(|key| E::canonical_key(key)).collect();
        return base
            .into_iter()
            .filter(|element| !keys.contains(&E::canonical_key(element.raw_key())))
            .collect();
    }
    if let Some(additions) = &selection.add {
        let mut merged = base;
        merged.extend(additions.iter().cloned());
        return merged;
    }
    base
}

fn replace_if_present<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

fn set_if_present<T: Clone>(target: &mut Option<T>, value: Option<&T>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

fn merge_links(base: ManifestLinks, overrides: &LinksOverrides) -> ManifestLinks {
    if let Some(replacement) = &overrides.replace {
        return replacement.clone();
    }
    let mut merged = base;
    set_if_present(&mut merged.issue, overrides.issue.as_ref());
    set_if_present(&mut merged.source_control, overrides.source_control.as_ref());
    merged.others = apply_selection(merged.others, overrides.others.as_ref());
    merged
}

fn merge_files(
    base: Vec<FileVersion>,
    overrides: &FilesOverride,
    generic_identifier: &str,
) -> Vec<FileVersion> {
    if overrides.selection.replace.is_some() {
        if !overrides.patch.is_empty() {
            debug!(
                manifest = generic_identifier,
                patches = overrides.patch.len(),
                "File list replaced; ignoring per-file patches"
            );
        }
        return apply_selection(base, Some(&overrides.selection));
    }

    let mut merged = apply_selection(base, Some(&overrides.selection));
    for patch in &overrides.patch {
        let mut matched = false;
        for file in merged.iter_mut().filter(|file| file.matches_short_hash(&patch.short_hash)) {
            *file = merge_file(file.clone(), patch);
            matched = true;
        }
        if !matched {
            warn!(
                manifest = generic_identifier,
                short_hash = %patch.short_hash,
                "Override patch targets a file the manifest does not list"
            );
        }
    }
    merged
}

fn merge_file(base: FileVersion, overrides: &FileOverride) -> FileVersion {
    if let Some(replacement) = &overrides.replace {
        return replacement.clone();
    }
    let mut merged = base;
    replace_if_present(&mut merged.file_name, overrides.file_name.as_ref());
    replace_if_present(&mut merged.available, overrides.available.as_ref());
    merged.compatible_versions = apply_selection(
        merged.compatible_versions,
        overrides.compatible_versions.as_ref(),
    );
    merged.download_urls = apply_selection(merged.download_urls, overrides.download_urls.as_ref());
    if let Some(relations) = &overrides.relations {
        merged.relations = merge_relations(merged.relations, relations);
    }
    merged
}

fn merge_relations(base: Relations, overrides: &RelationsOverrides) -> Relations {
    Relations {
        required: apply_selection(base.required, overrides.required.as_ref()),
        incompatible: apply_selection(base.incompatible, overrides.incompatible.as_ref()),
    }
}
