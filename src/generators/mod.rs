//! Built-in generator routines.
//!
//! Each routine reads the [`Domain`] tables and issues writes through the
//! [`ResourceManager`]. None of them keep state between calls or touch the
//! filesystem.
//!
//! | Generator | Writes |
//! |-----------|--------|
//! | `ore_veins` | `ore_veins/<vein>` |
//! | `rocks` | `rocks/<rock>`, the `rock` tag |
//! | `metals` | `metals/<metal>` |
//! | `item_heats` | `item_heats/metal/<item>/<metal>` |
//! | `metal_items` | `metal_items/<item>/<metal>` |
//! | `collapse` | `recipes/collapse/<rock>` |
//! | `stone_assets` | rock blockstates, block and item models |
//! | `metal_assets` | metal item models |
//! | `lang_names` | ore, rock and metal names |
//! | `lang_items` | rock block and metal item names |
//! | `vanilla_tags` | `minecraft` block tags |
//!
//! Order matters only where lang keys collide (last writer wins) and for
//! which generator a duplicate write is reported against.

pub mod assets;
pub mod data;
pub mod lang;
pub mod recipes;
pub mod tags;

use crate::domain::Domain;
use crate::error::ResourceError;
use crate::pipeline::{Generator, generator};

/// Resource location `<ns>:<path>`.
pub(crate) fn id(ns: &str, path: &str) -> String {
    format!("{ns}:{path}")
}

pub(crate) fn unknown(kind: &str, name: &str, referenced_by: &str) -> ResourceError {
    ResourceError::Generator(format!("{referenced_by} references unknown {kind} {name:?}"))
}

/// The full generator list, in run order.
pub fn standard<'a>(domain: &'a Domain, ns: &'a str) -> Vec<Box<dyn Generator + 'a>> {
    vec![
        generator("ore_veins", move |rm| data::ore_veins(rm, domain, ns)),
        generator("rocks", move |rm| data::rocks(rm, domain, ns)),
        generator("metals", move |rm| data::metals(rm, domain, ns)),
        generator("item_heats", move |rm| data::item_heats(rm, domain, ns)),
        generator("metal_items", move |rm| data::metal_items(rm, domain, ns)),
        generator("collapse", move |rm| recipes::collapse(rm, domain, ns)),
        generator("stone_assets", move |rm| assets::stones(rm, domain, ns)),
        generator("metal_assets", move |rm| assets::metals(rm, domain, ns)),
        generator("lang_names", move |rm| lang::names(rm, domain, ns)),
        generator("lang_items", move |rm| lang::items(rm, domain, ns)),
        generator("vanilla_tags", move |rm| tags::vanilla(rm, domain, ns)),
    ]
}

/// Veins, rocks, metals and their names only.
pub fn core<'a>(domain: &'a Domain, ns: &'a str) -> Vec<Box<dyn Generator + 'a>> {
    vec![
        generator("ore_veins", move |rm| data::ore_veins(rm, domain, ns)),
        generator("rocks", move |rm| data::rocks(rm, domain, ns)),
        generator("metals", move |rm| data::metals(rm, domain, ns)),
        generator("lang_names", move |rm| lang::names(rm, domain, ns)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ResourceManager;

    fn run_all(generators: &[Box<dyn Generator + '_>]) -> ResourceManager {
        let mut rm = ResourceManager::default();
        for (index, g) in generators.iter().enumerate() {
            rm.enter_generator(index, g.name());
            g.generate(&mut rm)
                .unwrap_or_else(|e| panic!("{} failed: {e}", g.name()));
        }
        rm
    }

    #[test]
    fn standard_generators_run_cleanly_on_stock_tables() {
        let domain = Domain::tfc();
        let rm = run_all(&standard(&domain, "tfc"));
        assert!(rm.conflicts().is_empty(), "{:?}", rm.conflicts());
        assert!(rm.buffer().len() > 100);
    }

    #[test]
    fn standard_order_matches_names() {
        let domain = Domain::default();
        let names: Vec<String> = standard(&domain, "tfc")
            .iter()
            .map(|g| g.name().to_string())
            .collect();
        assert_eq!(names.first().map(String::as_str), Some("ore_veins"));
        assert_eq!(names.last().map(String::as_str), Some("vanilla_tags"));
        assert_eq!(names.len(), 11);
    }

    #[test]
    fn core_lists_minimal_generators() {
        let domain = Domain::default();
        let names: Vec<String> = core(&domain, "tfc").iter().map(|g| g.name().to_string()).collect();
        assert_eq!(names, ["ore_veins", "rocks", "metals", "lang_names"]);
    }

    #[test]
    fn id_format() {
        assert_eq!(id("tfc", "rock/raw/granite"), "tfc:rock/raw/granite");
    }
}
