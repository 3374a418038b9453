//! Client assets: blockstates, block models and item models.

use super::data::METAL_ITEMS;
use super::id;
use crate::domain::Domain;
use crate::error::ResourceError;
use crate::manager::ResourceManager;
use std::collections::BTreeMap;

/// Rock block variants that render as a full cube.
pub const ROCK_BLOCKS: &[&str] = &["raw", "cobble", "smooth", "gravel"];

/// Per rock and variant: a blockstate, a `cube_all` block model, and an item
/// model inheriting the block model.
pub fn stones(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for rock in &domain.rocks {
        for kind in ROCK_BLOCKS {
            let name = format!("rock/{kind}/{}", rock.name);
            let block_model = id(ns, &format!("block/{name}"));
            let textures = BTreeMap::from([("all".to_string(), block_model.clone())]);

            rm.write_blockstate(ns, &name, &block_model)?;
            rm.write_block_model(ns, &name, "block/cube_all", &textures)?;
            rm.write_data(
                ns,
                "models",
                &format!("item/{name}"),
                &serde_json::json!({ "parent": block_model }),
            )?;
        }
    }
    Ok(())
}

/// Flat item models for every metal item.
pub fn metals(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for metal in &domain.metals {
        for (item, _, _) in METAL_ITEMS {
            let name = format!("metal/{item}/{}", metal.name);
            rm.write_item_model(ns, &name, &[id(ns, &format!("item/{name}"))])?;
        }
    }
    Ok(())
}
