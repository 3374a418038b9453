//! The resource manager: the only surface generators write through.
//!
//! Every typed helper (`write_tag`, `write_recipe`, `write_lang`,
//! `write_data`, and the model/heat/blockstate helpers built on
//! `write_data`) does the same three things in the same order:
//!
//! 1. build and validate a [`ResourceHandle`], failing with
//!    [`ResourceError::InvalidHandle`] before anything is buffered;
//! 2. convert the payload to a JSON tree, failing with
//!    [`ResourceError::Serialization`];
//! 3. stage it in the [`WriteBuffer`] with the category's merge policy.
//!
//! No helper performs I/O. The helpers are `#[track_caller]`, so a
//! duplicate-write error points at the generator lines that collided rather
//! than at this module.

use crate::buffer::{Content, MergePolicy, WriteBuffer};
use crate::error::{GeneratorId, MergeConflict, ResourceError, WriteOrigin};
use crate::handle::ResourceHandle;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::{BTreeMap, BTreeSet};
use std::panic::Location;
use std::path::PathBuf;

pub const TAGS: &str = "tags";
pub const RECIPES: &str = "recipes";
pub const LANG: &str = "lang";
pub const ITEM_HEATS: &str = "item_heats";
pub const MODELS: &str = "models";
pub const BLOCKSTATES: &str = "blockstates";

/// Heat profile of an item, as consumed by the runtime's heating system.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemHeat {
    pub ingredient: Value,
    pub heat_capacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forging_temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub welding_temperature: Option<f64>,
}

#[derive(Debug)]
pub struct ResourceManager {
    locale: String,
    buffer: WriteBuffer,
    current: Option<GeneratorId>,
}

impl Default for ResourceManager {
    fn default() -> Self {
        Self::new("en_us")
    }
}

impl ResourceManager {
    /// A manager whose lang writes go to `<domain>/lang/<locale>.json`.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: locale.to_string(),
            buffer: WriteBuffer::new(),
            current: None,
        }
    }

    pub(crate) fn enter_generator(&mut self, index: usize, name: &str) {
        self.current = Some(GeneratorId {
            index,
            name: name.to_string(),
        });
    }

    pub(crate) fn exit_generator(&mut self) {
        self.current = None;
    }

    /// Add `entries` to the tag `tag_name`. Repeated and overlapping writes
    /// accumulate as a set.
    #[track_caller]
    pub fn write_tag<I, S>(
        &mut self,
        domain: &str,
        tag_name: &str,
        entries: I,
    ) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handle = ResourceHandle::parse(domain, TAGS, tag_name)?;
        let entries: BTreeSet<String> = entries.into_iter().map(Into::into).collect();
        self.stage(handle, Content::Tag(entries), MergePolicy::Merge)
    }

    #[track_caller]
    pub fn write_recipe<T: Serialize + ?Sized>(
        &mut self,
        domain: &str,
        recipe_name: &str,
        definition: &T,
    ) -> Result<(), ResourceError> {
        self.write_data(domain, RECIPES, recipe_name, definition)
    }

    /// Set one key in the domain's lang table. Last writer wins.
    #[track_caller]
    pub fn write_lang(&mut self, domain: &str, key: &str, value: &str) -> Result<(), ResourceError> {
        self.write_lang_entries(domain, [(key, value)])
    }

    #[track_caller]
    pub fn write_lang_entries<I, K, V>(&mut self, domain: &str, entries: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let handle = ResourceHandle::new(domain, LANG, &[&self.locale])?;
        let mut entries = entries
            .into_iter()
            .map(|(k, v)| -> (String, String) { (k.into(), v.into()) })
            .peekable();
        if entries.peek().is_none() {
            return self.stage(handle, Content::Lang(BTreeMap::new()), MergePolicy::Merge);
        }
        // one key at a time, so a key repeated within this call is a conflict too
        for (key, value) in entries {
            self.stage(
                handle.clone(),
                Content::Lang(BTreeMap::from([(key, value)])),
                MergePolicy::Merge,
            )?;
        }
        Ok(())
    }

    /// Single-writer write of an arbitrary JSON-serializable descriptor.
    #[track_caller]
    pub fn write_data<T: Serialize + ?Sized>(
        &mut self,
        domain: &str,
        category: &str,
        path: &str,
        payload: &T,
    ) -> Result<(), ResourceError> {
        let handle = ResourceHandle::parse(domain, category, path)?;
        let value = serde_json::to_value(payload).map_err(|source| ResourceError::Serialization {
            handle: handle.to_string(),
            source,
        })?;
        self.stage(handle, Content::Data(value), MergePolicy::Replace)
    }

    #[track_caller]
    pub fn write_item_heat(
        &mut self,
        domain: &str,
        name: &str,
        heat: &ItemHeat,
    ) -> Result<(), ResourceError> {
        self.write_data(domain, ITEM_HEATS, name, heat)
    }

    /// Block model at `models/block/<name>` inheriting from `parent`.
    #[track_caller]
    pub fn write_block_model(
        &mut self,
        domain: &str,
        name: &str,
        parent: &str,
        textures: &BTreeMap<String, String>,
    ) -> Result<(), ResourceError> {
        let payload = json!({
            "parent": parent,
            "textures": textures,
        });
        self.write_data(domain, MODELS, &format!("block/{name}"), &payload)
    }

    /// Flat generated item model at `models/item/<name>`, one texture per layer.
    #[track_caller]
    pub fn write_item_model(
        &mut self,
        domain: &str,
        name: &str,
        layers: &[String],
    ) -> Result<(), ResourceError> {
        let textures: BTreeMap<String, &String> = layers
            .iter()
            .enumerate()
            .map(|(i, texture)| (format!("layer{i}"), texture))
            .collect();
        let payload = json!({
            "parent": "item/generated",
            "textures": textures,
        });
        self.write_data(domain, MODELS, &format!("item/{name}"), &payload)
    }

    /// Single-variant blockstate pointing at `model`.
    #[track_caller]
    pub fn write_blockstate(
        &mut self,
        domain: &str,
        name: &str,
        model: &str,
    ) -> Result<(), ResourceError> {
        let payload = json!({
            "variants": { "": { "model": model } },
        });
        self.write_data(domain, BLOCKSTATES, name, &payload)
    }

    #[track_caller]
    fn stage(
        &mut self,
        handle: ResourceHandle,
        content: Content,
        policy: MergePolicy,
    ) -> Result<(), ResourceError> {
        let origin = WriteOrigin {
            call_site: Location::caller().into(),
            generator: self.current.clone(),
        };
        self.buffer.stage(handle, content, policy, origin)
    }

    pub fn buffer(&self) -> &WriteBuffer {
        &self.buffer
    }

    pub fn conflicts(&self) -> &[MergeConflict] {
        self.buffer.conflicts()
    }

    /// Relative output paths of everything staged so far.
    pub fn written_paths(&self) -> BTreeSet<PathBuf> {
        self.buffer.iter().map(|w| w.handle.relative_path()).collect()
    }
}
