//! Built-in domain tables: rocks, metals, ores and ore veins.
//!
//! These are plain data. Generators read them and issue writes; nothing here
//! knows about output paths. [`Domain::tfc`] returns the stock tables the
//! binary generates from. Tests build their own, smaller [`Domain`] values.

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RockCategory {
    IgneousIntrusive,
    IgneousExtrusive,
    Sedimentary,
    Metamorphic,
}

impl RockCategory {
    pub fn name(self) -> &'static str {
        match self {
            RockCategory::IgneousIntrusive => "igneous_intrusive",
            RockCategory::IgneousExtrusive => "igneous_extrusive",
            RockCategory::Sedimentary => "sedimentary",
            RockCategory::Metamorphic => "metamorphic",
        }
    }
}

/// Serialized as [`RockCategory::name`], the same string lang keys use.
impl Serialize for RockCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rock {
    pub name: &'static str,
    pub category: RockCategory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Metal {
    pub name: &'static str,
    pub tier: u8,
    /// Melting point in °C.
    pub melt_temperature: f64,
    pub heat_capacity: f64,
}

impl Metal {
    /// Items can be worked on an anvil above 60% of the melting point.
    pub fn forging_temperature(&self) -> f64 {
        (self.melt_temperature * 0.6).round()
    }

    /// Items can be welded above 80% of the melting point.
    pub fn welding_temperature(&self) -> f64 {
        (self.melt_temperature * 0.8).round()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ore {
    pub name: &'static str,
    /// Metal the ore smelts into, if any.
    pub metal: Option<&'static str>,
    /// Graded ores come in poor/normal/rich variants.
    pub graded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OreVein {
    pub name: &'static str,
    pub ore: &'static str,
    /// Host rocks the vein may spawn in.
    pub rocks: Vec<&'static str>,
    /// One vein per `rarity` chunks on average.
    pub rarity: u32,
    pub min_y: i32,
    pub max_y: i32,
    pub size: u32,
    /// Fraction of vein blocks that are ore, 0-1.
    pub density: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Domain {
    pub rocks: Vec<Rock>,
    pub metals: Vec<Metal>,
    pub ores: Vec<Ore>,
    pub veins: Vec<OreVein>,
}

impl Domain {
    pub fn rock(&self, name: &str) -> Option<&Rock> {
        self.rocks.iter().find(|r| r.name == name)
    }

    pub fn metal(&self, name: &str) -> Option<&Metal> {
        self.metals.iter().find(|m| m.name == name)
    }

    pub fn ore(&self, name: &str) -> Option<&Ore> {
        self.ores.iter().find(|o| o.name == name)
    }

    /// The stock tables.
    pub fn tfc() -> Self {
        use RockCategory::*;

        let rock = |name, category| Rock { name, category };
        let metal = |name, tier, melt_temperature, heat_capacity| Metal {
            name,
            tier,
            melt_temperature,
            heat_capacity,
        };
        let ore = |name, metal, graded| Ore {
            name,
            metal,
            graded,
        };

        let igneous = vec!["granite", "diorite", "gabbro", "rhyolite", "basalt", "andesite", "dacite"];
        let sedimentary = vec![
            "shale",
            "claystone",
            "limestone",
            "conglomerate",
            "dolomite",
            "chert",
            "chalk",
        ];
        let metamorphic = vec!["quartzite", "slate", "phyllite", "schist", "gneiss", "marble"];

        Self {
            rocks: vec![
                rock("granite", IgneousIntrusive),
                rock("diorite", IgneousIntrusive),
                rock("gabbro", IgneousIntrusive),
                rock("shale", Sedimentary),
                rock("claystone", Sedimentary),
                rock("limestone", Sedimentary),
                rock("conglomerate", Sedimentary),
                rock("dolomite", Sedimentary),
                rock("chert", Sedimentary),
                rock("chalk", Sedimentary),
                rock("rhyolite", IgneousExtrusive),
                rock("basalt", IgneousExtrusive),
                rock("andesite", IgneousExtrusive),
                rock("dacite", IgneousExtrusive),
                rock("quartzite", Metamorphic),
                rock("slate", Metamorphic),
                rock("phyllite", Metamorphic),
                rock("schist", Metamorphic),
                rock("gneiss", Metamorphic),
                rock("marble", Metamorphic),
            ],
            metals: vec![
                metal("bismuth", 1, 270.0, 0.14),
                metal("tin", 1, 230.0, 0.14),
                metal("zinc", 1, 420.0, 0.21),
                metal("copper", 1, 1080.0, 0.35),
                metal("gold", 1, 1060.0, 0.35),
                metal("silver", 1, 961.0, 0.35),
                metal("bronze", 2, 950.0, 0.35),
                metal("bismuth_bronze", 2, 985.0, 0.35),
                metal("black_bronze", 2, 1070.0, 0.35),
                metal("brass", 2, 930.0, 0.35),
                metal("rose_gold", 2, 960.0, 0.35),
                metal("sterling_silver", 2, 950.0, 0.35),
                metal("nickel", 3, 1453.0, 0.48),
                metal("wrought_iron", 3, 1535.0, 0.35),
                metal("pig_iron", 3, 1535.0, 0.35),
                metal("steel", 4, 1540.0, 0.35),
            ],
            ores: vec![
                ore("native_copper", Some("copper"), true),
                ore("native_gold", Some("gold"), true),
                ore("native_silver", Some("silver"), true),
                ore("cassiterite", Some("tin"), true),
                ore("bismuthinite", Some("bismuth"), true),
                ore("sphalerite", Some("zinc"), true),
                ore("garnierite", Some("nickel"), true),
                ore("hematite", Some("pig_iron"), true),
                ore("malachite", Some("copper"), true),
                ore("tetrahedrite", Some("copper"), true),
                ore("bituminous_coal", None, false),
                ore("graphite", None, false),
            ],
            veins: vec![
                OreVein {
                    name: "normal_native_copper",
                    ore: "native_copper",
                    rocks: igneous,
                    rarity: 60,
                    min_y: 30,
                    max_y: 120,
                    size: 20,
                    density: 0.25,
                },
                OreVein {
                    name: "normal_cassiterite",
                    ore: "cassiterite",
                    rocks: vec!["granite", "diorite", "gabbro"],
                    rarity: 80,
                    min_y: 10,
                    max_y: 90,
                    size: 18,
                    density: 0.25,
                },
                OreVein {
                    name: "normal_hematite",
                    ore: "hematite",
                    rocks: vec!["rhyolite", "basalt", "andesite", "dacite"],
                    rarity: 90,
                    min_y: 5,
                    max_y: 70,
                    size: 25,
                    density: 0.3,
                },
                OreVein {
                    name: "normal_malachite",
                    ore: "malachite",
                    rocks: vec!["marble", "limestone", "chalk", "dolomite"],
                    rarity: 70,
                    min_y: 30,
                    max_y: 100,
                    size: 20,
                    density: 0.25,
                },
                OreVein {
                    name: "normal_sphalerite",
                    ore: "sphalerite",
                    rocks: metamorphic,
                    rarity: 80,
                    min_y: 10,
                    max_y: 80,
                    size: 18,
                    density: 0.2,
                },
                OreVein {
                    name: "bituminous_coal",
                    ore: "bituminous_coal",
                    rocks: sedimentary,
                    rarity: 40,
                    min_y: 20,
                    max_y: 110,
                    size: 30,
                    density: 0.35,
                },
            ],
        }
    }
}
