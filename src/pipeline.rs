//! The flush/clean driver.
//!
//! One [`GenerationRun`] is one invocation of the pipeline. It moves through
//! an explicit state machine:
//!
//! ```text
//! Init ──► Cleaning ──► Generating ──► Flushing ──► Done
//!   │          │             │             │
//!   └──────────┴─────────────┴─────────────┴──────► Failed
//! ```
//!
//! - **Init**: snapshot the output directory (see [`crate::stale`]).
//! - **Cleaning**: with [`CleanPolicy::Eager`], delete every snapshot file.
//!   With [`CleanPolicy::Deferred`] (the default) do nothing yet, so a run
//!   that fails later leaves the previous output tree intact.
//! - **Generating**: call each generator once, in declared order, with the
//!   run's [`ResourceManager`]. The first error fails the run and nothing is
//!   flushed.
//! - **Flushing**: write every pending resource, then delete stale files and
//!   prune empty directories. Writes always come before deletions, so a
//!   failure mid-flush never removes a live file before its replacement
//!   exists. There is no rollback of files already written.
//!
//! Files whose bytes are already identical on disk are not rewritten, which
//! keeps modification times stable across no-op runs.

use crate::buffer::PendingWrite;
use crate::config::{CleanPolicy, DatagenConfig};
use crate::error::{MergeConflict, ResourceError};
use crate::manager::ResourceManager;
use crate::manifest::{MANIFEST_FILENAME, PathManifest, manifest_path, to_manifest_key};
use crate::stale;
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A routine that issues writes through the manager.
///
/// Generators receive the manager by `&mut` for the duration of one call and
/// cannot hold on to it afterwards.
pub trait Generator {
    fn name(&self) -> &str;

    fn generate(&self, rm: &mut ResourceManager) -> Result<(), ResourceError>;
}

/// Adapts a closure into a [`Generator`].
pub struct FnGenerator<F> {
    name: String,
    f: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(&mut ResourceManager) -> Result<(), ResourceError>,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Generator for FnGenerator<F>
where
    F: Fn(&mut ResourceManager) -> Result<(), ResourceError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn generate(&self, rm: &mut ResourceManager) -> Result<(), ResourceError> {
        (self.f)(rm)
    }
}

/// Boxed closure generator, for building ordered generator lists.
pub fn generator<'a, F>(name: &str, f: F) -> Box<dyn Generator + 'a>
where
    F: Fn(&mut ResourceManager) -> Result<(), ResourceError> + 'a,
{
    Box::new(FnGenerator::new(name, f))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Cleaning,
    Generating,
    Flushing,
    Done,
    Failed,
}

#[derive(Error, Debug)]
pub enum RunError {
    #[error("snapshot failed: {0}")]
    Snapshot(#[source] ResourceError),
    #[error("clean failed: {0}")]
    Clean(#[source] ResourceError),
    #[error("generator #{index} ({name}) failed: {source}")]
    Generator {
        index: usize,
        name: String,
        #[source]
        source: ResourceError,
    },
    #[error("flush failed: {0}")]
    Flush(#[source] ResourceError),
}

/// Settings for one run, usually taken from [`DatagenConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub output_root: PathBuf,
    pub locale: String,
    pub indent: usize,
    pub clean: CleanPolicy,
    pub manifest: bool,
}

impl RunOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self::from(&DatagenConfig::default()).with_output_root(output_root)
    }

    pub fn with_output_root(mut self, output_root: impl Into<PathBuf>) -> Self {
        self.output_root = output_root.into();
        self
    }
}

impl From<&DatagenConfig> for RunOptions {
    fn from(config: &DatagenConfig) -> Self {
        Self {
            output_root: config.output.root.clone(),
            locale: config.locale.clone(),
            indent: config.output.indent,
            clean: config.output.clean,
            manifest: config.output.manifest,
        }
    }
}

/// What flushing did (or, for a dry run, would do) to one output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Created,
    Modified,
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome {
    /// Output path relative to the root, `/`-separated.
    pub path: String,
    pub status: FileStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSummary {
    pub name: String,
    /// Handles first staged by this generator.
    pub resources: usize,
}

/// Summary of file changes for a run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FlushStats {
    pub created: usize,
    pub modified: usize,
    pub unchanged: usize,
    pub deleted: usize,
}

impl FlushStats {
    fn record(&mut self, status: FileStatus) {
        match status {
            FileStatus::Created => self.created += 1,
            FileStatus::Modified => self.modified += 1,
            FileStatus::Unchanged => self.unchanged += 1,
        }
    }

    pub fn written(&self) -> usize {
        self.created + self.modified + self.unchanged
    }
}

impl fmt::Display for FlushStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files: {} created, {} modified, {} unchanged, {} deleted",
            self.written(),
            self.created,
            self.modified,
            self.unchanged,
            self.deleted
        )
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RunReport {
    pub dry_run: bool,
    pub generators: Vec<GeneratorSummary>,
    pub files: Vec<FileOutcome>,
    pub deleted: Vec<PathBuf>,
    /// Deleted files missing from the previous run's manifest.
    pub unrecorded: Vec<PathBuf>,
    pub pruned: Vec<PathBuf>,
    pub conflicts: Vec<MergeConflict>,
    pub stats: FlushStats,
}

pub struct GenerationRun<'a> {
    options: RunOptions,
    generators: Vec<Box<dyn Generator + 'a>>,
    state: RunState,
}

impl<'a> GenerationRun<'a> {
    pub fn new(options: RunOptions, generators: Vec<Box<dyn Generator + 'a>>) -> Self {
        Self {
            options,
            generators,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the whole pipeline against the output directory.
    pub fn run(&mut self) -> Result<RunReport, RunError> {
        self.execute(false)
    }

    /// Run the generators and report what a flush would change, without
    /// touching the output directory.
    pub fn dry_run(&mut self) -> Result<RunReport, RunError> {
        self.execute(true)
    }

    fn execute(&mut self, dry_run: bool) -> Result<RunReport, RunError> {
        self.state = RunState::Init;
        let result = self.execute_stages(dry_run);
        match &result {
            Ok(_) => self.transition(RunState::Done),
            Err(err) => {
                tracing::error!(state = ?self.state, error = %err, "run failed");
                self.transition(RunState::Failed);
            }
        }
        result
    }

    fn execute_stages(&mut self, dry_run: bool) -> Result<RunReport, RunError> {
        let root = self.options.output_root.clone();
        let mut report = RunReport {
            dry_run,
            ..RunReport::default()
        };

        let existing = stale::snapshot(&root).map_err(RunError::Snapshot)?;
        let previous = if self.options.manifest {
            PathManifest::load(&root)
        } else {
            None
        };
        tracing::info!(root = %root.display(), files = existing.len(), "snapshot taken");

        self.transition(RunState::Cleaning);
        if self.options.clean == CleanPolicy::Eager && !dry_run {
            let cleaned = stale::apply_deletions(&root, &existing).map_err(RunError::Clean)?;
            tracing::info!(files = cleaned.deleted.len(), "eager clean removed previous output");
        }

        self.transition(RunState::Generating);
        let rm = self.generate(&mut report)?;
        report.conflicts = rm.conflicts().to_vec();

        self.transition(RunState::Flushing);
        for write in rm.buffer().iter() {
            let status = flush_write(&root, write, self.options.indent, dry_run)
                .map_err(RunError::Flush)?;
            report.stats.record(status);
            report.files.push(FileOutcome {
                path: write.handle.to_path(),
                status,
            });
        }

        let written = rm.written_paths();
        let mut deletions = stale::compute_deletions(&existing, &written);
        if let Some(previous) = &previous {
            report.unrecorded = previous.unrecorded(&deletions);
            for path in &report.unrecorded {
                tracing::warn!(path = %path.display(), "removing file not produced by the previous run");
            }
        }
        // snapshots skip the manifest, so a disabled one is removed here
        if !self.options.manifest && manifest_path(&root).is_file() {
            deletions.insert(PathBuf::from(MANIFEST_FILENAME));
        }
        report.stats.deleted = deletions.len();
        report.deleted = deletions.iter().cloned().collect();

        if !dry_run {
            let cleaned = stale::apply_deletions(&root, &deletions).map_err(RunError::Flush)?;
            report.pruned = cleaned.pruned;
            if self.options.manifest {
                save_manifest(&root, &written).map_err(RunError::Flush)?;
            }
        }

        tracing::info!(stats = %report.stats, dry_run, "flush complete");
        Ok(report)
    }

    fn generate(&self, report: &mut RunReport) -> Result<ResourceManager, RunError> {
        let mut rm = ResourceManager::new(&self.options.locale);
        for (index, generator) in self.generators.iter().enumerate() {
            let name = generator.name();
            let before = rm.buffer().len();
            rm.enter_generator(index, name);
            generator
                .generate(&mut rm)
                .map_err(|source| RunError::Generator {
                    index,
                    name: name.to_string(),
                    source,
                })?;
            rm.exit_generator();
            let resources = rm.buffer().len() - before;
            tracing::debug!(generator = name, resources, "generator finished");
            report.generators.push(GeneratorSummary {
                name: name.to_string(),
                resources,
            });
        }
        Ok(rm)
    }

    fn transition(&mut self, next: RunState) {
        tracing::debug!(from = ?self.state, to = ?next, "run state");
        self.state = next;
    }
}

/// Run `generators` against `options.output_root`.
pub fn run<'a>(
    options: RunOptions,
    generators: Vec<Box<dyn Generator + 'a>>,
) -> Result<RunReport, RunError> {
    GenerationRun::new(options, generators).run()
}

/// Compare a pending write against disk and, unless `dry_run`, write it.
fn flush_write(
    root: &Path,
    write: &PendingWrite,
    indent: usize,
    dry_run: bool,
) -> Result<FileStatus, ResourceError> {
    let bytes = write.render(indent)?;
    let dest = root.join(write.handle.relative_path());
    let status = match fs::read(&dest) {
        Ok(current) if current == bytes => FileStatus::Unchanged,
        Ok(_) => FileStatus::Modified,
        Err(err) if err.kind() == io::ErrorKind::NotFound => FileStatus::Created,
        Err(err) => return Err(ResourceError::io(dest, err)),
    };
    if status != FileStatus::Unchanged && !dry_run {
        write_file(&dest, &bytes)?;
    }
    Ok(status)
}

/// Write via a sibling temp file and rename, so readers never see a
/// half-written file.
fn write_file(dest: &Path, bytes: &[u8]) -> Result<(), ResourceError> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|err| ResourceError::io(parent, err))?;
    }
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("resource");
    let tmp_path = dest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!(".{file_name}.tmp"));
    fs::write(&tmp_path, bytes).map_err(|err| ResourceError::io(&tmp_path, err))?;
    fs::rename(&tmp_path, dest).map_err(|err| ResourceError::io(dest, err))?;
    Ok(())
}

fn save_manifest(root: &Path, written: &BTreeSet<PathBuf>) -> Result<(), ResourceError> {
    let manifest = PathManifest::new(written.iter().map(|p| to_manifest_key(p)).collect());
    fs::create_dir_all(root).map_err(|err| ResourceError::io(root, err))?;
    manifest
        .save(root)
        .map_err(|err| ResourceError::io(manifest_path(root), err))
}
