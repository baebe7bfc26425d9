//! Material identifiers and their vanilla properties.
//!
//! A [`Material`] is a namespaced key of the form `namespace:path`
//! (e.g. `minecraft:coal_ore`). Keys are ordered lexically by
//! `(namespace, path)` so configuration dumps and logs stay stable across runs.
//!
//! Vanilla properties (fuel capability, stack limits, whether a material can
//! exist as an item) are answered from static tables. Materials from other
//! namespaces fall back to the generic defaults.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Namespace assumed when a key omits one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Stack size used for any material without an explicit limit.
pub const DEFAULT_MAX_STACK: u32 = 64;

/// Error returned when parsing an invalid [`Material`] key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The input was empty or whitespace.
    #[error("material key cannot be empty")]
    Empty,
    /// The namespace part was empty, too long or used invalid characters.
    #[error("invalid material namespace '{0}' (allowed: a-z0-9_.-, max 64)")]
    InvalidNamespace(String),
    /// The path part was empty, too long or used invalid characters.
    #[error("invalid material path '{0}' (allowed: a-z0-9_./-, max 128)")]
    InvalidPath(String),
}

/// A block or item type, identified by a namespaced key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Material {
    namespace: String,
    path: String,
}

impl Material {
    /// Parse a key, accepting either `namespace:path` or a bare `path`.
    ///
    /// Input is trimmed and lowercased before validation, so `COAL_ORE`
    /// parses to `minecraft:coal_ore`.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(KeyError::Empty);
        }

        let lowered = input.to_ascii_lowercase();
        let (namespace, path) = lowered
            .split_once(':')
            .unwrap_or((DEFAULT_NAMESPACE, lowered.as_str()));

        let namespace = namespace.trim();
        let path = path.trim();

        if !valid_namespace(namespace) {
            return Err(KeyError::InvalidNamespace(namespace.to_string()));
        }
        if !valid_path(path) {
            return Err(KeyError::InvalidPath(path.to_string()));
        }

        Ok(Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        })
    }

    /// Vanilla material by path, e.g. `Material::vanilla("furnace")`.
    ///
    /// Intended for compile-time constant paths; the path is lowercased but not
    /// otherwise validated.
    pub fn vanilla(path: &str) -> Self {
        debug_assert!(valid_path(&path.to_ascii_lowercase()), "bad path {path}");
        Self {
            namespace: DEFAULT_NAMESPACE.to_string(),
            path: path.to_ascii_lowercase(),
        }
    }

    /// The empty material.
    pub fn air() -> Self {
        Self::vanilla("air")
    }

    /// Key namespace.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Key path.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn vanilla_path(&self) -> Option<&str> {
        (self.namespace == DEFAULT_NAMESPACE).then_some(self.path.as_str())
    }

    /// True for the air variants, which never occupy a slot.
    pub fn is_air(&self) -> bool {
        matches!(self.vanilla_path(), Some("air" | "cave_air" | "void_air"))
    }

    /// True when a vanilla furnace would burn this material.
    pub fn is_fuel(&self) -> bool {
        let Some(path) = self.vanilla_path() else {
            return false;
        };
        FUEL_MATERIALS.contains(&path) || FUEL_SUFFIXES.iter().any(|s| path.ends_with(s))
    }

    /// True when the material can exist as an item stack.
    pub fn is_item(&self) -> bool {
        if self.is_air() {
            return false;
        }
        match self.vanilla_path() {
            Some(path) => !BLOCK_ONLY_MATERIALS.contains(&path),
            None => true,
        }
    }

    /// Stack limit a fresh stack of this material gets.
    pub fn default_max_stack_size(&self) -> u32 {
        let Some(path) = self.vanilla_path() else {
            return DEFAULT_MAX_STACK;
        };
        if UNSTACKABLE_MATERIALS.contains(&path)
            || UNSTACKABLE_SUFFIXES.iter().any(|s| path.ends_with(s))
        {
            1
        } else if SIXTEEN_STACK_MATERIALS.contains(&path) || path.ends_with("_sign") {
            16
        } else {
            DEFAULT_MAX_STACK
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Material {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Material {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Material {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Material::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn valid_namespace(ns: &str) -> bool {
    !ns.is_empty()
        && ns.len() <= 64
        && ns
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.'))
}

fn valid_path(path: &str) -> bool {
    !path.is_empty()
        && path.len() <= 128
        && path
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '_' | '-' | '.' | '/'))
}

const FUEL_MATERIALS: &[&str] = &[
    "coal",
    "charcoal",
    "coal_block",
    "lava_bucket",
    "blaze_rod",
    "dried_kelp_block",
    "stick",
    "bamboo",
    "scaffolding",
    "bookshelf",
    "chest",
    "trapped_chest",
    "crafting_table",
    "barrel",
    "ladder",
    "bow",
    "fishing_rod",
    "composter",
    "lectern",
    "note_block",
    "jukebox",
    "loom",
    "cartography_table",
    "fletching_table",
    "smithing_table",
];

const FUEL_SUFFIXES: &[&str] = &[
    "_log",
    "_wood",
    "_planks",
    "_sapling",
    "_boat",
    "_wool",
    "_carpet",
];

const BLOCK_ONLY_MATERIALS: &[&str] = &[
    "water",
    "lava",
    "fire",
    "soul_fire",
    "nether_portal",
    "end_portal",
    "end_gateway",
    "moving_piston",
    "piston_head",
    "bubble_column",
];

const UNSTACKABLE_MATERIALS: &[&str] = &[
    "water_bucket",
    "lava_bucket",
    "milk_bucket",
    "powder_snow_bucket",
    "bow",
    "crossbow",
    "trident",
    "shield",
    "elytra",
    "fishing_rod",
    "flint_and_steel",
    "shears",
    "saddle",
    "totem_of_undying",
    "potion",
    "splash_potion",
    "lingering_potion",
    "enchanted_book",
    "writable_book",
    "mushroom_stew",
    "rabbit_stew",
    "beetroot_soup",
    "cake",
];

const UNSTACKABLE_SUFFIXES: &[&str] = &[
    "_sword",
    "_pickaxe",
    "_axe",
    "_shovel",
    "_hoe",
    "_helmet",
    "_chestplate",
    "_leggings",
    "_boots",
    "_shulker_box",
    "_bed",
];

const SIXTEEN_STACK_MATERIALS: &[&str] = &[
    "ender_pearl",
    "snowball",
    "egg",
    "bucket",
    "honey_bottle",
    "armor_stand",
    "banner",
];
