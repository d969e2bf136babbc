//! Canned index and manifest documents.

use crate::schema::{FileVersion, ManifestDocument, ManifestLinks, OtherLink, Relations};

pub const FAKEMOD_IDENTIFIER: &str = "bricks:fakemod:1c88ae7e3799f75";

pub fn file_version(file_name: &str, short_hash: &str) -> FileVersion {
    FileVersion {
        file_name: file_name.to_string(),
        compatible_versions: Vec::new(),
        short_hash: short_hash.to_string(),
        download_urls: Vec::new(),
        available: false,
        relations: Relations::default(),
    }
}

pub fn fakemod_manifest() -> ManifestDocument {
    ManifestDocument {
        schema_version: "5.0.0".to_string(),
        generic_identifier: "bricks:fakemod".to_string(),
        fancy_name: "Fake Mod".to_string(),
        author: "ReviversMC".to_string(),
        license: Some("MIT".to_string()),
        curse_forge_id: Some(123_456),
        modrinth_id: Some("AbCdEf".to_string()),
        links: ManifestLinks {
            issue: Some("https://example.com/fakemod/issues".to_string()),
            source_control: Some("https://example.com/fakemod".to_string()),
            others: vec![OtherLink {
                link_name: "discord".to_string(),
                url: "https://discord.example.com/fakemod".to_string(),
            }],
        },
        files: vec![FileVersion {
            file_name: "fakemod-1.0.0.jar".to_string(),
            compatible_versions: vec!["1.18.2".to_string(), "1.19".to_string()],
            short_hash: "1c88ae7e3799f75".to_string(),
            download_urls: vec!["https://cdn.example.com/fakemod-1.0.0.jar".to_string()],
            available: false,
            relations: Relations {
                required: vec!["bricks:api".to_string()],
                incompatible: Vec::new(),
            },
        }],
    }
}

/// Minimal manifest for `generic` listing one file per short hash.
pub fn manifest_for(generic: &str, short_hashes: &[&str]) -> ManifestDocument {
    ManifestDocument {
        schema_version: "5.0.0".to_string(),
        generic_identifier: generic.to_string(),
        fancy_name: generic.to_string(),
        author: "tester".to_string(),
        license: None,
        curse_forge_id: None,
        modrinth_id: None,
        links: ManifestLinks::default(),
        files: short_hashes
            .iter()
            .map(|hash| file_version(&format!("{generic}-{hash}.jar"), hash))
            .collect(),
    }
}

pub fn index_json(identifiers: &[&str]) -> Vec<u8> {
    serde_json::json!({
        "schemaVersion": "5.0.0",
        "identifiers": identifiers,
    })
    .to_string()
    .into_bytes()
}

pub fn manifest_json(manifest: &ManifestDocument) -> Vec<u8> {
    serde_json::to_vec(manifest).unwrap_or_default()
}
