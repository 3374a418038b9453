use super::id;
use crate::domain::Domain;
use crate::error::ResourceError;
use crate::manager::ResourceManager;
use serde_json::json;

/// Raw and smooth rock collapse into cobble; cobble collapses into gravel.
const COLLAPSES: &[(&str, &str)] = &[("raw", "cobble"), ("smooth", "cobble"), ("cobble", "gravel")];

/// One `collapse` recipe per rock, mapping unsupported blocks to what they
/// fall as.
pub fn collapse(rm: &mut ResourceManager, domain: &Domain, ns: &str) -> Result<(), ResourceError> {
    for rock in &domain.rocks {
        let recipes: Vec<_> = COLLAPSES
            .iter()
            .map(|(from, to)| {
                json!({
                    "ingredient": id(ns, &format!("rock/{from}/{}", rock.name)),
                    "result": id(ns, &format!("rock/{to}/{}", rock.name)),
                })
            })
            .collect();
        rm.write_recipe(
            ns,
            &format!("collapse/{}", rock.name),
            &json!({
                "type": id(ns, "collapse"),
                "collapses": recipes,
            }),
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Content;
    use crate::domain::{Rock, RockCategory};
    use crate::handle::ResourceHandle;

    #[test]
    fn one_recipe_per_rock() {
        let domain = Domain {
            rocks: vec![
                Rock {
                    name: "granite",
                    category: RockCategory::IgneousIntrusive,
                },
                Rock {
                    name: "chalk",
                    category: RockCategory::Sedimentary,
                },
            ],
            ..Domain::default()
        };
        let mut rm = ResourceManager::default();
        collapse(&mut rm, &domain, "tfc").unwrap();
        assert_eq!(rm.buffer().len(), 2);

        let handle = ResourceHandle::parse("tfc", "recipes", "collapse/chalk").unwrap();
        let Content::Data(recipe) = &rm.buffer().get(&handle).unwrap().content else {
            panic!("expected data");
        };
        assert_eq!(recipe["type"], "tfc:collapse");
        assert_eq!(
            recipe["collapses"][2],
            json!({"ingredient": "tfc:rock/cobble/chalk", "result": "tfc:rock/gravel/chalk"})
        );
    }

    #[test]
    fn empty_domain_writes_nothing() {
        let mut rm = ResourceManager::default();
        collapse(&mut rm, &Domain::default(), "tfc").unwrap();
        assert!(rm.buffer().is_empty());
    }
}
