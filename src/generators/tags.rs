use super::id;
use crate::domain::Domain;
use crate::error::ResourceError;
use crate::manager::ResourceManager;

pub const VANILLA: &str = "minecraft";

/// Hooks rock blocks into the vanilla block tags.
pub fn vanilla(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    let rock_block = |kind: &str, rock: &str| id(ns, &format!("rock/{kind}/{rock}"));

    rm.write_tag(
        VANILLA,
        "blocks/base_stone_overworld",
        domain.rocks.iter().map(|r| rock_block("raw", r.name)),
    )?;
    for kind in ["raw", "cobble", "smooth"] {
        rm.write_tag(
            VANILLA,
            "blocks/mineable/pickaxe",
            domain.rocks.iter().map(|r| rock_block(kind, r.name)),
        )?;
    }
    rm.write_tag(
        VANILLA,
        "blocks/mineable/shovel",
        domain.rocks.iter().map(|r| rock_block("gravel", r.name)),
    )
}
