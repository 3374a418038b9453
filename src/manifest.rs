//! Optional record of the paths a run produced.
//!
//! Staleness never depends on this file: the directory listing taken at the
//! start of each run is authoritative, so hand edits to the output tree are
//! always reconciled. When enabled (`manifest = true`), the manifest lets a
//! run tell its own leftovers apart from files someone placed in the output
//! directory by hand, and warn before deleting the latter.
//!
//! ## Storage
//!
//! A JSON file at `<output_root>/.datagen-manifest.json`. It is excluded from
//! snapshots, so it is never considered stale itself.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};

/// Name of the manifest file within the output root.
pub const MANIFEST_FILENAME: &str = ".datagen-manifest.json";

/// Version of the manifest format. A mismatch loads as "no manifest".
const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PathManifest {
    pub version: u32,
    /// Output paths relative to the output root, `/`-separated.
    pub paths: BTreeSet<String>,
}

impl PathManifest {
    pub fn new(paths: BTreeSet<String>) -> Self {
        Self {
            version: MANIFEST_VERSION,
            paths,
        }
    }

    /// Load from the output root. Returns `None` when the file is missing,
    /// unreadable, corrupt, or from another format version.
    pub fn load(output_root: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(manifest_path(output_root)).ok()?;
        let manifest: Self = serde_json::from_str(&content).ok()?;
        (manifest.version == MANIFEST_VERSION).then_some(manifest)
    }

    pub fn save(&self, output_root: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(manifest_path(output_root), json + "\n")
    }

    /// Whether `relative` was recorded by the run that wrote this manifest.
    pub fn contains(&self, relative: &Path) -> bool {
        self.paths.contains(&to_manifest_key(relative))
    }

    /// Paths in `deletions` this manifest does not list: files about to be
    /// removed that the previous run did not produce.
    pub fn unrecorded(&self, deletions: &BTreeSet<PathBuf>) -> Vec<PathBuf> {
        deletions
            .iter()
            .filter(|path| !self.contains(path))
            .cloned()
            .collect()
    }
}

/// Manifest key for a relative path: components joined with `/`.
pub fn to_manifest_key(relative: &Path) -> String {
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn manifest_path(output_root: &Path) -> PathBuf {
    output_root.join(MANIFEST_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(paths: &[&str]) -> PathManifest {
        PathManifest::new(paths.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn save_and_load() {
        let tmp = TempDir::new().unwrap();
        let m = manifest(&["tfc/rocks/granite.json", "tfc/lang/en_us.json"]);
        m.save(tmp.path()).unwrap();
        assert_eq!(PathManifest::load(tmp.path()), Some(m));
    }

    #[test]
    fn load_missing_is_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(PathManifest::load(tmp.path()), None);
    }

    #[test]
    fn load_corrupt_is_none() {
        let tmp = TempDir::new().unwrap();
        fs::write(manifest_path(tmp.path()), "not json").unwrap();
        assert_eq!(PathManifest::load(tmp.path()), None);
    }

    #[test]
    fn load_wrong_version_is_none() {
        let tmp = TempDir::new().unwrap();
        let json = format!(r#"{{"version": {}, "paths": ["a.json"]}}"#, MANIFEST_VERSION + 1);
        fs::write(manifest_path(tmp.path()), json).unwrap();
        assert_eq!(PathManifest::load(tmp.path()), None);
    }

    #[test]
    fn contains_uses_slash_keys() {
        let m = manifest(&["tfc/rocks/granite.json"]);
        let relative: PathBuf = ["tfc", "rocks", "granite.json"].iter().collect();
        assert!(m.contains(&relative));
        assert!(!m.contains(Path::new("tfc/rocks/basalt.json")));
    }

    #[test]
    fn unrecorded_lists_only_paths_missing_from_manifest() {
        let m = manifest(&["tfc/rocks/granite.json"]);
        let deletions: BTreeSet<PathBuf> = [
            PathBuf::from("tfc/rocks/granite.json"),
            PathBuf::from("tfc/rocks/hand_made.json"),
        ]
        .into();
        assert_eq!(
            m.unrecorded(&deletions),
            vec![PathBuf::from("tfc/rocks/hand_made.json")]
        );
    }
}
