use std::collections::BTreeMap;
use std::path::Path;

use rand::rngs::StdRng;
use serde_json::Value;

use crate::access::{ListProperty, MultiPropertyAccess, TopLevelProperty};
use crate::companion::shuffle_with_companions;
use crate::cross::cross_shuffle;
use crate::groups::for_each_subdirectory;
use crate::materialize::Materializer;
use crate::property::shuffle_properties;
use crate::tiles::{shuffle_tiles, TileGrid};
use crate::whole_file::{shuffle_files, JsonTransform};
use crate::Result;

pub type Feature = fn(&Materializer, &mut StdRng) -> Result<usize>;

const LOOT_TABLES: &str = "data/minecraft/loot_tables";
const RECIPES: &str = "data/minecraft/recipes";
const TAGS: &str = "data/minecraft/tags";
const MODELS: &str = "assets/minecraft/models";
const BLOCKSTATES: &str = "assets/minecraft/blockstates";
const BLOCK_TEXTURES: &str = "assets/minecraft/textures/block";
const ITEM_TEXTURES: &str = "assets/minecraft/textures/item";
const SOUNDS: &str = "assets/minecraft/sounds";
const FONT_ATLAS: &str = "assets/minecraft/textures/font/ascii.png";
const PARTICLE_ATLAS: &str = "assets/minecraft/textures/particle/particles.png";

const TEXTURE_META_SUFFIX: &str = ".mcmeta";
const GLYPH_GRID: TileGrid = TileGrid::new(8, 8, 16, 16);
const PARTICLE_GRID: TileGrid = TileGrid::new(8, 8, 16, 16);

pub fn registry() -> BTreeMap<&'static str, Feature> {
    let mut features: BTreeMap<&'static str, Feature> = BTreeMap::new();
    features.insert("lootTables", loot_tables);
    features.insert("recipes", recipes);
    features.insert("models", models);
    features.insert("tags", tags);
    features.insert("blockstates", blockstates);
    features.insert("blockTextures", block_textures);
    features.insert("itemTextures", item_textures);
    features.insert("sounds", sounds);
    features.insert("font", font);
    features.insert("particles", particles);
    features
}

pub fn names() -> Vec<&'static str> {
    registry().into_keys().collect()
}

fn loot_tables(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    let transform: JsonTransform<'_> = &strip_entry_conditions;
    shuffle_files(io, Path::new(LOOT_TABLES), Some(transform), rng)
}

fn recipes(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    shuffle_properties(io, Path::new(RECIPES), &TopLevelProperty, &["result"], rng)
}

fn models(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    for_each_subdirectory(io, Path::new(MODELS), |sub| {
        shuffle_properties(io, sub, &TopLevelProperty, &["parent", "textures"], &mut *rng)
    })
}

fn tags(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    let values = ListProperty::new("values");
    for_each_subdirectory(io, Path::new(TAGS), |sub| cross_shuffle(io, sub, &values, &mut *rng))
}

fn blockstates(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    cross_shuffle(io, Path::new(BLOCKSTATES), &VariantModels, rng)
}

fn block_textures(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    shuffle_with_companions(io, Path::new(BLOCK_TEXTURES), TEXTURE_META_SUFFIX, rng)
}

fn item_textures(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    shuffle_with_companions(io, Path::new(ITEM_TEXTURES), TEXTURE_META_SUFFIX, rng)
}

fn sounds(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    shuffle_files(io, Path::new(SOUNDS), None, rng)
}

fn font(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    Ok(shuffle_tiles(io, Path::new(FONT_ATLAS), &GLYPH_GRID, rng))
}

fn particles(io: &Materializer, rng: &mut StdRng) -> Result<usize> {
    Ok(shuffle_tiles(io, Path::new(PARTICLE_ATLAS), &PARTICLE_GRID, rng))
}

/// Drops the `conditions` guard from every entry of every pool of a loot
/// table so that shuffled drops are always rolled.
pub fn strip_entry_conditions(mut doc: Value) -> Value {
    let Some(pools) = doc.get_mut("pools").and_then(Value::as_array_mut) else {
        return doc;
    };
    for pool in pools.iter_mut() {
        let Some(entries) = pool.get_mut("entries").and_then(Value::as_array_mut) else {
            continue;
        };
        for entry in entries.iter_mut() {
            if let Some(obj) = entry.as_object_mut() {
                obj.remove("conditions");
            }
        }
    }
    doc
}

/// The `model` of every variant (or multipart `apply`) in a blockstate
/// file. A variant is either one model object or a weighted list of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariantModels;

fn push_models<'a>(target: &'a Value, out: &mut Vec<&'a Value>) {
    match target {
        Value::Array(choices) => out.extend(choices.iter().filter_map(|c| c.get("model"))),
        other => out.extend(other.get("model")),
    }
}

fn push_models_mut<'a>(target: &'a mut Value, out: &mut Vec<&'a mut Value>) {
    if target.is_array() {
        if let Some(choices) = target.as_array_mut() {
            out.extend(choices.iter_mut().filter_map(|c| c.get_mut("model")));
        }
    } else if let Some(model) = target.get_mut("model") {
        out.push(model);
    }
}

impl MultiPropertyAccess for VariantModels {
    fn extract_all(&self, doc: &Value) -> Vec<Value> {
        let Some(root) = doc.as_object() else {
            return Vec::new();
        };
        let mut slots = Vec::new();
        for (key, section) in root {
            match key.as_str() {
                "variants" => {
                    if let Some(variants) = section.as_object() {
                        for variant in variants.values() {
                            push_models(variant, &mut slots);
                        }
                    }
                }
                "multipart" => {
                    if let Some(parts) = section.as_array() {
                        for apply in parts.iter().filter_map(|p| p.get("apply")) {
                            push_models(apply, &mut slots);
                        }
                    }
                }
                _ => {}
            }
        }
        slots.into_iter().cloned().collect()
    }

    fn inject_all(&self, doc: &mut Value, pool: &mut Vec<Value>) {
        let Some(root) = doc.as_object_mut() else {
            return;
        };
        let mut slots = Vec::new();
        for (key, section) in root.iter_mut() {
            match key.as_str() {
                "variants" => {
                    if let Some(variants) = section.as_object_mut() {
                        for variant in variants.values_mut() {
                            push_models_mut(variant, &mut slots);
                        }
                    }
                }
                "multipart" => {
                    if let Some(parts) = section.as_array_mut() {
                        for apply in parts.iter_mut().filter_map(|p| p.get_mut("apply")) {
                            push_models_mut(apply, &mut slots);
                        }
                    }
                }
                _ => {}
            }
        }
        for slot in slots {
            if let Some(value) = pool.pop() {
                *slot = value;
            }
        }
    }
}
