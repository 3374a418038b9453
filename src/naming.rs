//! Human-readable names for lang entries.
//!
//! Registry names are `snake_case` (`native_copper`, `bismuth_bronze`). The
//! lang generators turn them into display names by splitting on `_` and
//! capitalizing each word:
//!
//! - `native_copper` → "Native Copper"
//! - `bismuth_bronze` → "Bismuth Bronze"
//! - `granite` → "Granite"

/// Display name for a `snake_case` registry name.
pub fn display_name(name: &str) -> String {
    name.split('_')
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lang key for a registry entry: `<prefix>.<domain>.<path with / as .>`.
///
/// `lang_key("block", "tfc", "rock/raw/granite")` → `block.tfc.rock.raw.granite`
pub fn lang_key(prefix: &str, domain: &str, path: &str) -> String {
    format!("{}.{}.{}", prefix, domain, path.replace('/', "."))
}
