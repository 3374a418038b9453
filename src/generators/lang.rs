use super::assets::ROCK_BLOCKS;
use super::data::METAL_ITEMS;
use crate::domain::Domain;
use crate::error::ResourceError;
use crate::manager::ResourceManager;
use crate::naming::{display_name, lang_key};

/// Display names for every ore, rock and metal.
pub fn names(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    let ores = domain
        .ores
        .iter()
        .map(|o| (lang_key("ore", ns, o.name), display_name(o.name)));
    let rocks = domain
        .rocks
        .iter()
        .map(|r| (lang_key("rock", ns, r.name), display_name(r.name)));
    let metals = domain
        .metals
        .iter()
        .map(|m| (lang_key("metal", ns, m.name), display_name(m.name)));
    rm.write_lang_entries(ns, ores.chain(rocks).chain(metals))
}

/// Block names for rock variants, item names for metal items, and rock
/// category names.
pub fn items(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    let mut entries = Vec::new();
    for rock in &domain.rocks {
        for kind in ROCK_BLOCKS {
            entries.push((
                lang_key("block", ns, &format!("rock/{kind}/{}", rock.name)),
                format!("{} {}", display_name(kind), display_name(rock.name)),
            ));
        }
        let category = rock.category.name();
        entries.push((
            lang_key("rock_category", ns, category),
            display_name(category),
        ));
    }
    for metal in &domain.metals {
        for (item, _, _) in METAL_ITEMS {
            entries.push((
                lang_key("item", ns, &format!("metal/{item}/{}", metal.name)),
                format!("{} {}", display_name(metal.name), display_name(item)),
            ));
        }
    }
    rm.write_lang_entries(ns, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Content;
    use crate::domain::{Metal, Ore, Rock, RockCategory};
    use crate::handle::ResourceHandle;
    use std::collections::BTreeMap;

    fn domain() -> Domain {
        Domain {
            rocks: vec![
                Rock {
                    name: "granite",
                    category: RockCategory::IgneousIntrusive,
                },
                Rock {
                    name: "diorite",
                    category: RockCategory::IgneousIntrusive,
                },
            ],
            metals: vec![Metal {
                name: "bismuth_bronze",
                tier: 2,
                melt_temperature: 985.0,
                heat_capacity: 0.35,
            }],
            ores: vec![Ore {
                name: "native_copper",
                metal: None,
                graded: true,
            }],
            veins: vec![],
        }
    }

    fn table(rm: &ResourceManager) -> BTreeMap<String, String> {
        let handle = ResourceHandle::parse("tfc", "lang", "en_us").unwrap();
        match &rm.buffer().get(&handle).unwrap().content {
            Content::Lang(entries) => entries.clone(),
            other => panic!("expected lang, got {other:?}"),
        }
    }

    #[test]
    fn names_cover_ores_rocks_and_metals() {
        let mut rm = ResourceManager::default();
        names(&mut rm, &domain(), "tfc").unwrap();
        let lang = table(&rm);
        assert_eq!(lang["ore.tfc.native_copper"], "Native Copper");
        assert_eq!(lang["rock.tfc.diorite"], "Diorite");
        assert_eq!(lang["metal.tfc.bismuth_bronze"], "Bismuth Bronze");
        assert_eq!(lang.len(), 4);
    }

    #[test]
    fn item_names() {
        let mut rm = ResourceManager::default();
        items(&mut rm, &domain(), "tfc").unwrap();
        let lang = table(&rm);
        assert_eq!(lang["block.tfc.rock.raw.granite"], "Raw Granite");
        assert_eq!(
            lang["item.tfc.metal.double_ingot.bismuth_bronze"],
            "Bismuth Bronze Double Ingot"
        );
        assert_eq!(
            lang["rock_category.tfc.igneous_intrusive"],
            "Igneous Intrusive"
        );
    }

    #[test]
    fn shared_category_name_is_not_a_conflict() {
        let mut rm = ResourceManager::default();
        items(&mut rm, &domain(), "tfc").unwrap();
        assert!(rm.conflicts().is_empty());
    }

    #[test]
    fn both_generators_share_one_table() {
        let mut rm = ResourceManager::default();
        names(&mut rm, &domain(), "tfc").unwrap();
        items(&mut rm, &domain(), "tfc").unwrap();
        assert_eq!(rm.buffer().len(), 1);
        assert!(table(&rm).contains_key("rock.tfc.granite"));
    }
}
