//! Server-side data: ore veins, rocks, metals, item heats, metal items.

use super::{id, unknown};
use crate::domain::{Domain, Metal, Ore};
use crate::error::ResourceError;
use crate::manager::{ItemHeat, ResourceManager};
use serde_json::{Value, json};

/// Items made from every metal: `(name, metal units, heat capacity factor)`.
pub const METAL_ITEMS: &[(&str, u32, f64)] = &[
    ("ingot", 100, 1.0),
    ("double_ingot", 200, 2.0),
    ("sheet", 200, 2.0),
    ("double_sheet", 400, 4.0),
];

/// Ore grades with their weight inside a vein.
const GRADES: &[(&str, u32)] = &[("poor", 20), ("normal", 50), ("rich", 30)];

pub fn ore_veins(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for vein in &domain.veins {
        let ore = domain
            .ore(vein.ore)
            .ok_or_else(|| unknown("ore", vein.ore, vein.name))?;
        let mut blocks = Vec::with_capacity(vein.rocks.len());
        for &rock in &vein.rocks {
            if domain.rock(rock).is_none() {
                return Err(unknown("rock", rock, vein.name));
            }
            blocks.push(json!({
                "stone": [id(ns, &format!("rock/raw/{rock}"))],
                "ore": ore_blocks(ns, ore, rock),
            }));
        }
        rm.write_data(
            ns,
            "ore_veins",
            vein.name,
            &json!({
                "type": id(ns, "cluster_vein"),
                "rarity": vein.rarity,
                "min_y": vein.min_y,
                "max_y": vein.max_y,
                "size": vein.size,
                "density": vein.density,
                "blocks": blocks,
            }),
        )?;
    }
    Ok(())
}

fn ore_blocks(ns: &str, ore: &Ore, rock: &str) -> Vec<Value> {
    if ore.graded {
        GRADES
            .iter()
            .map(|(grade, weight)| {
                json!({
                    "weight": weight,
                    "block": id(ns, &format!("ore/{grade}_{}/{rock}", ore.name)),
                })
            })
            .collect()
    } else {
        vec![json!({ "block": id(ns, &format!("ore/{}/{rock}", ore.name)) })]
    }
}

/// One descriptor per rock, plus the `rock` tag listing every rock.
pub fn rocks(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for rock in &domain.rocks {
        let blocks: serde_json::Map<String, Value> = ["raw", "cobble", "gravel", "smooth"]
            .iter()
            .map(|kind| (kind.to_string(), json!(id(ns, &format!("rock/{kind}/{}", rock.name)))))
            .collect();
        rm.write_data(
            ns,
            "rocks",
            rock.name,
            &json!({
                "category": rock.category,
                "blocks": blocks,
            }),
        )?;
    }
    rm.write_tag(ns, "rock", domain.rocks.iter().map(|r| id(ns, r.name)))
}

pub fn metals(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for metal in &domain.metals {
        rm.write_data(
            ns,
            "metals",
            metal.name,
            &json!({
                "tier": metal.tier,
                "fluid": id(ns, &format!("metal/{}", metal.name)),
                "melt_temperature": metal.melt_temperature,
                "heat_capacity": metal.heat_capacity,
                "ingots": { "tag": format!("forge:ingots/{}", metal.name) },
                "sheets": { "tag": format!("forge:sheets/{}", metal.name) },
            }),
        )?;
    }
    Ok(())
}

pub fn item_heats(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for metal in &domain.metals {
        for &(item, _, factor) in METAL_ITEMS {
            rm.write_item_heat(
                ns,
                &format!("metal/{item}/{}", metal.name),
                &metal_heat(ns, metal, item, factor),
            )?;
        }
    }
    for ore in &domain.ores {
        let Some(metal_name) = ore.metal else {
            continue;
        };
        let metal = domain
            .metal(metal_name)
            .ok_or_else(|| unknown("metal", metal_name, ore.name))?;
        rm.write_item_heat(
            ns,
            &format!("ore/{}", ore.name),
            &ItemHeat {
                ingredient: json!({ "tag": id(ns, &format!("ores/{}", ore.name)) }),
                heat_capacity: metal.heat_capacity,
                forging_temperature: None,
                welding_temperature: None,
            },
        )?;
    }
    Ok(())
}

fn metal_heat(ns: &str, metal: &Metal, item: &str, factor: f64) -> ItemHeat {
    ItemHeat {
        ingredient: json!({ "item": id(ns, &format!("metal/{item}/{}", metal.name)) }),
        heat_capacity: metal.heat_capacity * factor,
        forging_temperature: Some(metal.forging_temperature()),
        welding_temperature: Some(metal.welding_temperature()),
    }
}

/// How much metal each metal item melts into.
pub fn metal_items(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for metal in &domain.metals {
        for &(item, units, _) in METAL_ITEMS {
            rm.write_data(
                ns,
                "metal_items",
                &format!("{item}/{}", metal.name),
                &json!({
                    "ingredient": { "item": id(ns, &format!("metal/{item}/{}", metal.name)) },
                    "metal": id(ns, metal.name),
                    "amount": units,
                }),
            )?;
        }
    }
    Ok(())
}
