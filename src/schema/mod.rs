//! Typed documents served by a mod index repository.
//!
//! Schema revisions differ in field names and optionality; every such
//! difference is absorbed here (serde aliases, defaults, and a raw
//! intermediate for the index) so resolution code only ever sees one shape.
//!
//! - [`IndexDocument`] - `index.json`, the set of known full identifiers
//! - [`ManifestDocument`] - `{loader}/{name}.json`, one mod's file versions
//! - [`ManifestOverrides`] - sparse patch merged onto a manifest

mod index;
mod manifest;
mod overrides;

pub use index::IndexDocument;
pub use manifest::{
    FileVersion, ManifestDocument, ManifestLinks, ManifestWithOverrides, OtherLink, Relations,
};
pub use overrides::{
    FileOverride, FilesOverride, LinksOverrides, ManifestOverrides, OverrideSelection,
    RelationsOverrides,
};
