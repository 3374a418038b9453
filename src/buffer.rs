//! In-memory staging of pending writes.
//!
//! Generators never touch the filesystem. Each write lands in the
//! [`WriteBuffer`] keyed by its [`ResourceHandle`], and nothing is persisted
//! until the pipeline flushes. A handle resolves to exactly one content blob
//! by the time generation ends.
//!
//! # Collision Policy
//!
//! | Policy | Existing entry | Result |
//! |--------|----------------|--------|
//! | any | none | entry created |
//! | `Replace` | any | [`ResourceError::DuplicateResource`] |
//! | `Merge` | tag | set union of entries |
//! | `Merge` | lang | keys overwritten, last writer wins, [`MergeConflict`] recorded |
//! | `Merge` | different kind or data | [`ResourceError::DuplicateResource`] |
//!
//! The buffer is a `BTreeMap`, and tag entries and lang keys are sorted
//! containers, so the rendered bytes never depend on insertion order.

use crate::error::{MergeConflict, ResourceError, WriteOrigin};
use crate::handle::ResourceHandle;
use serde::Serialize;
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};

/// How a write treats an existing entry for the same handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// Single writer; a second write is a programmer error.
    #[default]
    Replace,
    /// Multiple writers accumulate into one artifact.
    Merge,
}

/// Logical kind of a pending write. Selects the merge rule and serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Tag,
    Lang,
    Data,
}

/// Staged payload for one handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Tag(BTreeSet<String>),
    Lang(BTreeMap<String, String>),
    Data(Value),
}

impl Content {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Content::Tag(_) => ResourceKind::Tag,
            Content::Lang(_) => ResourceKind::Lang,
            Content::Data(_) => ResourceKind::Data,
        }
    }

    /// JSON tree written to disk for this content.
    pub fn to_json(&self) -> Value {
        match self {
            Content::Tag(values) => json!({
                "replace": false,
                "values": values,
            }),
            Content::Lang(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect::<Map<_, _>>(),
            ),
            Content::Data(value) => value.clone(),
        }
    }
}

/// One buffered resource, owned by the buffer until flush.
#[derive(Debug, Clone)]
pub struct PendingWrite {
    pub handle: ResourceHandle,
    pub content: Content,
    /// The write that created this entry.
    pub origin: WriteOrigin,
}

impl PendingWrite {
    /// Serialize to the bytes that will be written to disk.
    ///
    /// `indent == 0` renders compact JSON; otherwise pretty JSON with that
    /// many spaces. Output always ends with a newline.
    pub fn render(&self, indent: usize) -> Result<Vec<u8>, ResourceError> {
        let value = self.content.to_json();
        let mut out = Vec::new();
        let result = if indent == 0 {
            serde_json::to_writer(&mut out, &value)
        } else {
            let indent = " ".repeat(indent);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut serializer)
        };
        result.map_err(|source| ResourceError::Serialization {
            handle: self.handle.to_string(),
            source,
        })?;
        out.push(b'\n');
        Ok(out)
    }
}

/// Pending writes for one generation run.
#[derive(Debug, Default)]
pub struct WriteBuffer {
    entries: BTreeMap<ResourceHandle, PendingWrite>,
    conflicts: Vec<MergeConflict>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `content` under `handle` according to `policy`.
    ///
    /// On error the buffer is left exactly as it was.
    pub fn stage(
        &mut self,
        handle: ResourceHandle,
        content: Content,
        policy: MergePolicy,
        origin: WriteOrigin,
    ) -> Result<(), ResourceError> {
        let Some(existing) = self.entries.get_mut(&handle) else {
            self.entries.insert(
                handle.clone(),
                PendingWrite {
                    handle,
                    content,
                    origin,
                },
            );
            return Ok(());
        };

        let duplicate = |existing: &PendingWrite, origin: WriteOrigin| {
            ResourceError::DuplicateResource {
                handle: existing.handle.to_string(),
                first: existing.origin.clone(),
                second: origin,
            }
        };

        let mergeable = matches!(
            (existing.content.kind(), content.kind()),
            (ResourceKind::Tag, ResourceKind::Tag) | (ResourceKind::Lang, ResourceKind::Lang)
        );
        if policy == MergePolicy::Replace || !mergeable {
            return Err(duplicate(existing, origin));
        }

        match (&mut existing.content, content) {
            (Content::Tag(values), Content::Tag(incoming)) => {
                values.extend(incoming);
            }
            (Content::Lang(entries), Content::Lang(incoming)) => {
                for (key, value) in incoming {
                    if let Some(previous) = entries.get(&key)
                        && *previous != value
                    {
                        record_conflict(
                            &mut self.conflicts,
                            MergeConflict {
                                handle: handle.to_string(),
                                key: key.clone(),
                                previous: previous.clone(),
                                value: value.clone(),
                                origin: origin.clone(),
                            },
                        );
                    }
                    entries.insert(key, value);
                }
            }
            // kinds checked above
            _ => {}
        }
        Ok(())
    }

    pub fn get(&self, handle: &ResourceHandle) -> Option<&PendingWrite> {
        self.entries.get(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pending writes in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.entries.values()
    }

    /// Lang key collisions recorded so far, in the order they happened.
    pub fn conflicts(&self) -> &[MergeConflict] {
        &self.conflicts
    }
}

fn record_conflict(conflicts: &mut Vec<MergeConflict>, conflict: MergeConflict) {
    tracing::warn!(%conflict, "lang key overwritten");
    conflicts.push(conflict);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CallSite, GeneratorId};

    fn origin(line: u32) -> WriteOrigin {
        WriteOrigin {
            call_site: CallSite {
                file: "test.rs",
                line,
            },
            generator: Some(GeneratorId {
                index: 0,
                name: "test".into(),
            }),
        }
    }

    fn tag(entries: &[&str]) -> Content {
        Content::Tag(entries.iter().map(|s| s.to_string()).collect())
    }

    fn lang(entries: &[(&str, &str)]) -> Content {
        Content::Lang(
            entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn handle(category: &str, name: &str) -> ResourceHandle {
        ResourceHandle::parse("tfc", category, name).unwrap()
    }

    #[test]
    fn first_write_creates_entry() {
        let mut buf = WriteBuffer::new();
        let h = handle("recipes", "x");
        buf.stage(h.clone(), Content::Data(json!({"a": 1})), MergePolicy::Replace, origin(1))
            .unwrap();
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.get(&h).unwrap().content, Content::Data(json!({"a": 1})));
    }

    #[test]
    fn replace_collision_is_error_and_keeps_first() {
        let mut buf = WriteBuffer::new();
        let h = handle("recipes", "x");
        buf.stage(h.clone(), Content::Data(json!("A")), MergePolicy::Replace, origin(1))
            .unwrap();
        let err = buf
            .stage(h.clone(), Content::Data(json!("B")), MergePolicy::Replace, origin(2))
            .unwrap_err();
        match err {
            ResourceError::DuplicateResource {
                handle,
                first,
                second,
            } => {
                assert_eq!(handle, "tfc/recipes/x.json");
                assert_eq!(first.call_site.line, 1);
                assert_eq!(second.call_site.line, 2);
            }
            other => panic!("expected DuplicateResource, got {other:?}"),
        }
        assert_eq!(buf.get(&h).unwrap().content, Content::Data(json!("A")));
    }

    #[test]
    fn replace_onto_merged_tag_is_error() {
        let mut buf = WriteBuffer::new();
        let h = handle("tags", "rock");
        buf.stage(h.clone(), tag(&["a"]), MergePolicy::Merge, origin(1))
            .unwrap();
        assert!(buf.stage(h, tag(&["b"]), MergePolicy::Replace, origin(2)).is_err());
    }

    #[test]
    fn tag_merge_is_set_union() {
        let mut buf = WriteBuffer::new();
        let h = handle("tags", "rock");
        buf.stage(h.clone(), tag(&["a", "b"]), MergePolicy::Merge, origin(1))
            .unwrap();
        buf.stage(h.clone(), tag(&["b", "c"]), MergePolicy::Merge, origin(2))
            .unwrap();
        assert_eq!(buf.get(&h).unwrap().content, tag(&["a", "b", "c"]));
        assert!(buf.conflicts().is_empty());
    }

    #[test]
    fn tag_merge_is_order_insensitive() {
        let mut first = WriteBuffer::new();
        let mut second = WriteBuffer::new();
        let h = handle("tags", "rock");
        first.stage(h.clone(), tag(&["c", "a"]), MergePolicy::Merge, origin(1)).unwrap();
        first.stage(h.clone(), tag(&["b"]), MergePolicy::Merge, origin(2)).unwrap();
        second.stage(h.clone(), tag(&["b", "a"]), MergePolicy::Merge, origin(1)).unwrap();
        second.stage(h.clone(), tag(&["c", "c"]), MergePolicy::Merge, origin(2)).unwrap();
        assert_eq!(
            first.get(&h).unwrap().render(2).unwrap(),
            second.get(&h).unwrap().render(2).unwrap()
        );
    }

    #[test]
    fn lang_merge_last_writer_wins_with_conflict() {
        let mut buf = WriteBuffer::new();
        let h = handle("lang", "en_us");
        buf.stage(h.clone(), lang(&[("k", "one"), ("a", "x")]), MergePolicy::Merge, origin(1))
            .unwrap();
        buf.stage(h.clone(), lang(&[("k", "two")]), MergePolicy::Merge, origin(2))
            .unwrap();
        assert_eq!(
            buf.get(&h).unwrap().content,
            lang(&[("a", "x"), ("k", "two")])
        );
        assert_eq!(buf.conflicts().len(), 1);
        let conflict = &buf.conflicts()[0];
        assert_eq!(conflict.key, "k");
        assert_eq!(conflict.previous, "one");
        assert_eq!(conflict.value, "two");
        assert_eq!(conflict.origin.call_site.line, 2);
    }

    #[test]
    fn lang_identical_rewrite_is_not_a_conflict() {
        let mut buf = WriteBuffer::new();
        let h = handle("lang", "en_us");
        buf.stage(h.clone(), lang(&[("k", "v")]), MergePolicy::Merge, origin(1))
            .unwrap();
        buf.stage(h, lang(&[("k", "v")]), MergePolicy::Merge, origin(2))
            .unwrap();
        assert!(buf.conflicts().is_empty());
    }

    #[test]
    fn merging_different_kinds_is_error() {
        let mut buf = WriteBuffer::new();
        let h = handle("tags", "rock");
        buf.stage(h.clone(), tag(&["a"]), MergePolicy::Merge, origin(1))
            .unwrap();
        let err = buf
            .stage(h, lang(&[("k", "v")]), MergePolicy::Merge, origin(2))
            .unwrap_err();
        assert!(matches!(err, ResourceError::DuplicateResource { .. }));
    }

    #[test]
    fn merging_data_is_error() {
        let mut buf = WriteBuffer::new();
        let h = handle("rocks", "granite");
        buf.stage(h.clone(), Content::Data(json!(1)), MergePolicy::Merge, origin(1))
            .unwrap();
        assert!(buf
            .stage(h, Content::Data(json!(2)), MergePolicy::Merge, origin(2))
            .is_err());
    }

    #[test]
    fn iter_is_handle_ordered() {
        let mut buf = WriteBuffer::new();
        for name in ["zinc", "bismuth", "copper"] {
            buf.stage(handle("metals", name), Content::Data(json!(name)), MergePolicy::Replace, origin(1))
                .unwrap();
        }
        let paths: Vec<String> = buf.iter().map(|w| w.handle.to_path()).collect();
        assert_eq!(
            paths,
            vec![
                "tfc/metals/bismuth.json",
                "tfc/metals/copper.json",
                "tfc/metals/zinc.json"
            ]
        );
    }

    #[test]
    fn render_tag_format() {
        let write = PendingWrite {
            handle: handle("tags", "rock"),
            content: tag(&["tfc:granite", "tfc:basalt"]),
            origin: origin(1),
        };
        let text = String::from_utf8(write.render(2).unwrap()).unwrap();
        assert_eq!(
            text,
            "{\n  \"replace\": false,\n  \"values\": [\n    \"tfc:basalt\",\n    \"tfc:granite\"\n  ]\n}\n"
        );
    }

    #[test]
    fn render_compact() {
        let write = PendingWrite {
            handle: handle("lang", "en_us"),
            content: lang(&[("b", "B"), ("a", "A")]),
            origin: origin(1),
        };
        assert_eq!(write.render(0).unwrap(), b"{\"a\":\"A\",\"b\":\"B\"}\n");
    }

    #[test]
    fn render_custom_indent() {
        let write = PendingWrite {
            handle: handle("rocks", "granite"),
            content: Content::Data(json!({"category": "igneous_intrusive"})),
            origin: origin(1),
        };
        assert_eq!(
            write.render(4).unwrap(),
            b"{\n    \"category\": \"igneous_intrusive\"\n}\n"
        );
    }
}
