//! Stale-output tracking.
//!
//! The output directory is listed exactly once, before any generator runs.
//! After generation, every listed file the run did not produce is stale:
//!
//! ```text
//! deletions = snapshot − written
//! ```
//!
//! Because the snapshot is taken up front, writes made during the run can
//! never change what counts as stale. Running twice in a row with unchanged
//! generators therefore deletes nothing the second time.
//!
//! Only regular files are tracked. Directories are never deleted directly;
//! once their stale files are gone, any directory left empty is pruned,
//! deepest first, up to (but never including) the output root.

use crate::error::ResourceError;
use crate::manifest::MANIFEST_FILENAME;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Relative paths of every regular file under `root`.
///
/// A missing root is an empty snapshot. The path manifest at the root is
/// bookkeeping, not output, and is left out.
pub fn snapshot(root: &Path) -> Result<BTreeSet<PathBuf>, ResourceError> {
    let mut paths = BTreeSet::new();
    if !root.exists() {
        return Ok(paths);
    }
    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            ResourceError::io(path, io::Error::from(err))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if relative == Path::new(MANIFEST_FILENAME) {
            continue;
        }
        paths.insert(relative.to_path_buf());
    }
    Ok(paths)
}

/// Files present before the run that the run did not produce.
pub fn compute_deletions(
    existing: &BTreeSet<PathBuf>,
    written: &BTreeSet<PathBuf>,
) -> BTreeSet<PathBuf> {
    existing.difference(written).cloned().collect()
}

/// What [`apply_deletions`] removed, relative to the output root.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub deleted: Vec<PathBuf>,
    pub pruned: Vec<PathBuf>,
}

/// Delete `deletions` under `root`, then prune directories they left empty.
///
/// Files that are already gone are skipped. Any other filesystem error stops
/// the clean immediately; nothing already removed is restored.
pub fn apply_deletions(
    root: &Path,
    deletions: &BTreeSet<PathBuf>,
) -> Result<CleanReport, ResourceError> {
    let mut report = CleanReport::default();
    let mut parents = BTreeSet::new();

    for relative in deletions {
        let path = root.join(relative);
        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::debug!(path = %relative.display(), "deleted stale file");
                report.deleted.push(relative.clone());
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(ResourceError::io(path, err)),
        }
        parents.extend(
            relative
                .ancestors()
                .skip(1)
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf),
        );
    }

    // Children sort after their parents, so reverse order is deepest first.
    for relative in parents.iter().rev() {
        let dir = root.join(relative);
        if is_empty_dir(&dir)? {
            fs::remove_dir(&dir).map_err(|err| ResourceError::io(&dir, err))?;
            tracing::debug!(path = %relative.display(), "pruned empty directory");
            report.pruned.push(relative.clone());
        }
    }

    Ok(report)
}

fn is_empty_dir(dir: &Path) -> Result<bool, ResourceError> {
    if !dir.is_dir() {
        return Ok(false);
    }
    let mut entries = fs::read_dir(dir).map_err(|err| ResourceError::io(dir, err))?;
    Ok(entries.next().is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    fn set(paths: &[&str]) -> BTreeSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn snapshot_missing_root_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(snapshot(&tmp.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn snapshot_lists_files_recursively() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "tfc/rocks/granite.json");
        touch(tmp.path(), "tfc/tags/blocks/rock.json");
        fs::create_dir_all(tmp.path().join("tfc/empty")).unwrap();

        assert_eq!(
            snapshot(tmp.path()).unwrap(),
            set(&["tfc/rocks/granite.json", "tfc/tags/blocks/rock.json"])
        );
    }

    #[test]
    fn snapshot_skips_manifest() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), MANIFEST_FILENAME);
        touch(tmp.path(), "tfc/lang/en_us.json");
        assert_eq!(snapshot(tmp.path()).unwrap(), set(&["tfc/lang/en_us.json"]));
    }

    #[test]
    fn deletions_are_set_difference() {
        let existing = set(&["a.json", "b/c.json", "d.json"]);
        let written = set(&["a.json", "e.json"]);
        assert_eq!(
            compute_deletions(&existing, &written),
            set(&["b/c.json", "d.json"])
        );
    }

    #[test]
    fn no_deletions_when_everything_rewritten() {
        let existing = set(&["a.json", "b/c.json"]);
        assert!(compute_deletions(&existing, &existing).is_empty());
    }

    #[test]
    fn apply_removes_file_and_empty_parents() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "tfc/recipes/old/stale.json");
        touch(tmp.path(), "tfc/rocks/granite.json");

        let report = apply_deletions(tmp.path(), &set(&["tfc/recipes/old/stale.json"])).unwrap();

        assert!(!tmp.path().join("tfc/recipes").exists());
        assert!(tmp.path().join("tfc/rocks/granite.json").exists());
        assert_eq!(report.deleted, vec![PathBuf::from("tfc/recipes/old/stale.json")]);
        assert_eq!(
            report.pruned,
            vec![PathBuf::from("tfc/recipes/old"), PathBuf::from("tfc/recipes")]
        );
    }

    #[test]
    fn apply_keeps_non_empty_parents() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "tfc/rocks/granite.json");
        touch(tmp.path(), "tfc/rocks/basalt.json");

        let report = apply_deletions(tmp.path(), &set(&["tfc/rocks/basalt.json"])).unwrap();

        assert!(tmp.path().join("tfc/rocks/granite.json").exists());
        assert!(report.pruned.is_empty());
    }

    #[test]
    fn apply_never_removes_root() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "only.json");
        apply_deletions(tmp.path(), &set(&["only.json"])).unwrap();
        assert!(tmp.path().is_dir());
    }

    #[test]
    fn apply_tolerates_already_missing_files() {
        let tmp = TempDir::new().unwrap();
        let report = apply_deletions(tmp.path(), &set(&["gone/missing.json"])).unwrap();
        assert!(report.deleted.is_empty());
        assert!(report.pruned.is_empty());
    }
}
