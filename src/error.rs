//! Error types shared by the resource manager and its collaborators.
//!
//! Every error a generator can trigger through the manager is a
//! [`ResourceError`]. All variants are fatal to the run. Lang key collisions
//! are not errors at all: they resolve last-writer-wins and are reported as
//! [`MergeConflict`] warnings.

use std::fmt;
use std::panic::Location;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("invalid resource handle: {field} {value:?} {reason}")]
    InvalidHandle {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("duplicate resource {handle}: first written by {first}, written again by {second}")]
    DuplicateResource {
        handle: String,
        first: WriteOrigin,
        second: WriteOrigin,
    },
    #[error("cannot serialize {handle}: {source}")]
    Serialization {
        handle: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Generator(String),
}

impl ResourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ResourceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Generator that was running when a write was issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorId {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for GeneratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generator #{} ({})", self.index, self.name)
    }
}

/// Source location of a manager call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
        }
    }
}

/// Where a write came from: the calling source location and, when the write
/// happened inside a pipeline run, the active generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOrigin {
    pub call_site: CallSite,
    pub generator: Option<GeneratorId>,
}

impl fmt::Display for WriteOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.call_site.file, self.call_site.line)?;
        if let Some(generator) = &self.generator {
            write!(f, " in {generator}")?;
        }
        Ok(())
    }
}

/// A lang key written twice with different values. The later value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub handle: String,
    pub key: String,
    pub previous: String,
    pub value: String,
    pub origin: WriteOrigin,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: key {:?} changed from {:?} to {:?} by {}",
            self.handle, self.key, self.previous, self.value, self.origin
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(line: u32, generator: Option<(usize, &str)>) -> WriteOrigin {
        WriteOrigin {
            call_site: CallSite {
                file: "src/generators/rocks.rs",
                line,
            },
            generator: generator.map(|(index, name)| GeneratorId {
                index,
                name: name.to_string(),
            }),
        }
    }

    #[test]
    fn origin_display_includes_generator() {
        let o = origin(12, Some((1, "rocks")));
        assert_eq!(o.to_string(), "src/generators/rocks.rs:12 in generator #1 (rocks)");
    }

    #[test]
    fn origin_display_without_generator() {
        assert_eq!(origin(7, None).to_string(), "src/generators/rocks.rs:7");
    }

    #[test]
    fn duplicate_message_names_both_sites() {
        let err = ResourceError::DuplicateResource {
            handle: "tfc/recipes/x.json".into(),
            first: origin(3, Some((5, "collapse"))),
            second: origin(9, Some((5, "collapse"))),
        };
        let msg = err.to_string();
        assert!(msg.contains("tfc/recipes/x.json"));
        assert!(msg.contains("rocks.rs:3"));
        assert!(msg.contains("rocks.rs:9"));
    }

    #[test]
    fn invalid_handle_message() {
        let err = ResourceError::InvalidHandle {
            field: "path segment",
            value: "Granite".into(),
            reason: "contains a disallowed character",
        };
        assert_eq!(
            err.to_string(),
            "invalid resource handle: path segment \"Granite\" contains a disallowed character"
        );
    }
}
