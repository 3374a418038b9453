//! # tfc-datagen
//!
//! Build-time generator for TFC resource files. Domain tables (rocks, metals,
//! ores, ore veins) go in; a tree of JSON data and asset files comes out,
//! laid out as `<output>/<namespace>/<category>/<path>.json`.
//!
//! # Architecture: Buffer, Then Flush
//!
//! Generators never touch the filesystem. They issue writes through a
//! [`manager::ResourceManager`], which validates each target path and stages
//! the payload in memory. Only after every generator has succeeded does the
//! [`pipeline`] write files:
//!
//! ```text
//! 1. Snapshot   output/      →  existing paths
//! 2. Generate   generators   →  write buffer        (no I/O)
//! 3. Flush      write buffer →  output/             (writes, then deletions)
//! ```
//!
//! Anything in the snapshot that the run did not produce is stale and is
//! deleted after the writes, along with directories left empty.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`handle`] | Validated `(namespace, category, path)` triples and their output paths |
//! | [`buffer`] | Pending writes keyed by handle; merge and collision rules |
//! | [`manager`] | Typed write helpers used by generators |
//! | [`stale`] | Output snapshots, stale-set computation, deletion and pruning |
//! | [`manifest`] | Optional record of the paths the last run produced |
//! | [`pipeline`] | `Generator` trait and the run state machine |
//! | [`domain`] | Built-in rock, metal, ore and vein tables |
//! | [`generators`] | Built-in generator routines |
//! | [`naming`] | Display names and lang keys |
//! | [`config`] | `datagen.toml` loading, merging and validation |
//! | [`output`] | CLI summary formatting |
//! | [`error`] | Shared error and diagnostic types |
//!
//! # Design Decisions
//!
//! ## Merge Policy by Category
//!
//! Tags and lang tables are written to by many generators, so writes to them
//! merge: tags as a set union, lang tables key by key with the later value
//! winning (and logged). Every other resource has exactly one writer, and a
//! second write to the same handle is an error naming both call sites.
//!
//! ## Deferred Cleaning
//!
//! Stale files are removed after the new tree is written, not before. A run
//! that fails during generation leaves the previous output exactly as it
//! was. `clean = "eager"` restores delete-first behaviour.
//!
//! ## Unchanged Files Stay Untouched
//!
//! Each rendered file is compared with what is on disk and only written if it
//! differs, so a no-op run leaves every modification time alone.

pub mod buffer;
pub mod config;
pub mod domain;
pub mod error;
pub mod generators;
pub mod handle;
pub mod manager;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod stale;
