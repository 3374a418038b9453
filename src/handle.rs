//! Resource handles and their canonical output paths.
//!
//! A [`ResourceHandle`] names one generated artifact by `(domain, category,
//! path)`. Every output file lives at
//!
//! ```text
//! <output_root>/<domain>/<category>/<seg1>/.../<segN>.json
//! ```
//!
//! ## Character Set
//!
//! The domain, the category and every path segment are restricted to
//! lowercase ASCII letters, digits and `_`. A segment can never be empty or
//! contain `/` or `.`, so no directory can be named like an output file
//! (`a.json`) or a flush temp file, and `.`/`..` cannot occur. Because the
//! manager does the joining, two distinct handles can never map to the same
//! file or to a file and a directory:
//!
//! - `("tfc", "tags", ["blocks", "rock"])` → `tfc/tags/blocks/rock.json`
//! - `("tfc", "tags", ["blocks_rock"])` → `tfc/tags/blocks_rock.json`
//!
//! Callers usually spell paths as `"blocks/rock"`; [`ResourceHandle::parse`]
//! splits that form on `/` before validation. Empty pieces (`"a//b"`,
//! `"a/"`) are rejected rather than silently dropped.

use crate::error::ResourceError;
use std::fmt;
use std::path::PathBuf;

/// File extension of every generated resource.
pub const EXTENSION: &str = "json";

/// Canonical identity of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle {
    domain: String,
    category: String,
    path: Vec<String>,
}

impl ResourceHandle {
    /// Build a handle from already-split path segments.
    pub fn new<S: AsRef<str>>(
        domain: &str,
        category: &str,
        path: &[S],
    ) -> Result<Self, ResourceError> {
        validate_segment("domain", domain)?;
        validate_segment("category", category)?;
        if path.is_empty() {
            return Err(ResourceError::InvalidHandle {
                field: "path",
                value: String::new(),
                reason: "must have at least one segment",
            });
        }
        for segment in path {
            validate_segment("path segment", segment.as_ref())?;
        }
        Ok(Self {
            domain: domain.to_string(),
            category: category.to_string(),
            path: path.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    /// Build a handle from a slash-separated name like `"blocks/rock"`.
    pub fn parse(domain: &str, category: &str, name: &str) -> Result<Self, ResourceError> {
        let segments: Vec<&str> = name.split('/').collect();
        Self::new(domain, category, &segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.path
    }

    /// Output path relative to the output root, always `/`-separated.
    pub fn to_path(&self) -> String {
        format!(
            "{}/{}/{}.{}",
            self.domain,
            self.category,
            self.path.join("/"),
            EXTENSION
        )
    }

    /// Same layout as [`to_path`](Self::to_path), as a platform path.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::from(&self.domain);
        path.push(&self.category);
        path.extend(&self.path);
        path.set_extension(EXTENSION);
        path
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

fn validate_segment(field: &'static str, value: &str) -> Result<(), ResourceError> {
    let reason = if value.is_empty() {
        Some("is empty")
    } else if !value.chars().all(is_allowed_char) {
        Some("contains a disallowed character")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(ResourceError::InvalidHandle {
            field,
            value: value.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}
